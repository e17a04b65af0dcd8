//! Domain types for tradetape

pub mod ids;
pub mod leg;
pub mod trade;

pub use ids::TradeId;
pub use leg::{Direction, LegParseError, LegRole, LegType};
pub use trade::Trade;
