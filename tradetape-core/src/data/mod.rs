//! Trade-log ingestion

pub mod ingest;
pub mod raw;
pub mod schema;

pub use ingest::{parse_datetime, DataError, TradeLogReader};
pub use raw::RawRow;
pub use schema::{ColumnIndex, ColumnMap, SchemaError};
