//! Raw trade-log row, one per leg, before pairing.

use crate::domain::{LegParseError, LegType, TradeId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the export (a single entry or exit leg).
///
/// `kind` keeps the raw `Type` text; it is parsed by the reducer via
/// [`RawRow::leg_type`]. Empty cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub trade_id: TradeId,
    pub kind: String,
    pub signal: Option<String>,
    pub time: Option<NaiveDateTime>,
    pub price: Option<f64>,
    pub contracts: Option<f64>,
    pub profit: Option<f64>,
    pub profit_percent: Option<f64>,
    pub drawdown: Option<f64>,
    pub drawdown_percent: Option<f64>,
    pub run_up: Option<f64>,
    pub run_up_percent: Option<f64>,
    pub cumulative_profit: Option<f64>,
    pub cumulative_profit_percent: Option<f64>,
}

impl RawRow {
    /// A row with only the identifying columns filled in.
    pub fn new(trade_id: impl Into<TradeId>, kind: impl Into<String>) -> Self {
        Self {
            trade_id: trade_id.into(),
            kind: kind.into(),
            signal: None,
            time: None,
            price: None,
            contracts: None,
            profit: None,
            profit_percent: None,
            drawdown: None,
            drawdown_percent: None,
            run_up: None,
            run_up_percent: None,
            cumulative_profit: None,
            cumulative_profit_percent: None,
        }
    }

    pub fn leg_type(&self) -> Result<LegType, LegParseError> {
        self.kind.parse()
    }
}
