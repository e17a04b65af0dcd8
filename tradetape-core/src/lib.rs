//! tradetape core — domain types, trade-log ingestion and trade pairing.
//!
//! This crate turns a platform trade-log export into an ordered collection of
//! [`Trade`](domain::Trade) records:
//! - Domain types (trade, direction, leg type, trade id)
//! - CSV ingestion against a configurable column contract
//! - Entry/exit reduction with a data-quality filter for malformed groups
//!
//! Nothing here computes statistics; see `tradetape-runner`.

pub mod data;
pub mod domain;
pub mod reducer;
pub mod trade_log;

pub use reducer::{reduce, reduce_rows, DropReason, Reduction};
pub use trade_log::{filter_direction, TradeLog};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: domain and ingestion types are Send + Sync so the
    /// runner can compute summaries on worker threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Trade>();
        require_sync::<domain::Trade>();
        require_send::<domain::TradeId>();
        require_sync::<domain::TradeId>();
        require_send::<domain::LegType>();
        require_sync::<domain::LegType>();
        require_send::<data::RawRow>();
        require_sync::<data::RawRow>();
        require_send::<data::ColumnMap>();
        require_sync::<data::ColumnMap>();
        require_send::<TradeLog>();
        require_sync::<TradeLog>();
        require_send::<Reduction>();
        require_sync::<Reduction>();
    }

    /// Architecture contract: the reducer is a pure function of its rows.
    #[test]
    fn reducer_takes_rows_only() {
        fn _check(rows: &[data::RawRow]) -> Vec<domain::Trade> {
            reduce_rows(rows)
        }
    }
}
