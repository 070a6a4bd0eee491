//! Flat-file CSV cache and the in-process memo used by the client.

pub mod csv_store;
pub mod error;
pub mod memory;
