pub mod climate_index;
pub mod index_frame;
pub mod index_table;
pub mod month;
pub mod period;
pub mod phase;
pub mod sam_table;
