//! Raw text retrieval from the upstream agencies.

pub mod error;
pub mod raw_fetcher;
