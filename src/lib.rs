pub mod cache;
mod climate_indices;
pub mod decode;
pub mod derive;
mod error;
pub mod fetch;
pub mod indices;
mod types;
mod utils;

pub use climate_indices::*;
pub use error::ClimateIndexError;

pub use cache::csv_store::CsvStore;
pub use cache::error::CacheError;
pub use decode::error::DecodeError;
pub use decode::DecodeWarning;
pub use fetch::error::FetchError;
pub use fetch::raw_fetcher::RawFetcher;
pub use indices::asymsam::SamFeeds;
pub use indices::IndexSource;

pub use types::climate_index::{ClimateIndex, EnsoSelector};
pub use types::index_frame::IndexLazyFrame;
pub use types::index_table::*;
pub use types::month::{Month, Period, Season};
pub use types::period::{AnyMonth, MonthPeriod, StartEndMonth, Year, YearMonth};
pub use types::phase::{Phase, PHASE_THRESHOLD};
pub use types::sam_table::*;
