//! Trade — one round trip reduced from an entry/exit row pair.

use super::leg::Direction;
use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// A round-trip trade as recorded by the export.
///
/// Exit-side and per-trade result fields are optional: an open trade has no
/// exit, and older exports omit some columns. Nothing here is ever a sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub direction: Direction,

    // ── Entry ──
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
    pub entry_signal: Option<String>,

    // ── Exit ──
    pub exit_time: Option<NaiveDateTime>,
    pub exit_price: Option<f64>,
    pub exit_signal: Option<String>,

    // ── Size ──
    /// Absent for a trade that is still open.
    pub contract_size: Option<f64>,

    // ── Result ──
    pub profit: Option<f64>,
    pub profit_percent: Option<f64>,

    // ── Excursion ──
    /// Magnitude of the worst adverse move while the trade was open.
    pub drawdown: Option<f64>,
    pub drawdown_percent: Option<f64>,
    /// Magnitude of the best favorable move while the trade was open.
    pub run_up: Option<f64>,
    pub run_up_percent: Option<f64>,

    // ── Running totals ──
    pub cumulative_profit: Option<f64>,
    pub cumulative_profit_percent: Option<f64>,
}

impl Trade {
    /// A trade with only its entry side known.
    pub fn open(
        direction: Direction,
        entry_time: NaiveDateTime,
        entry_price: f64,
    ) -> Self {
        Self {
            direction,
            entry_time,
            entry_price,
            entry_signal: None,
            exit_time: None,
            exit_price: None,
            exit_signal: None,
            contract_size: None,
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

    /// Open trades carry no contract size.
    pub fn is_open(&self) -> bool {
        self.contract_size.is_none()
    }

    pub fn is_winner(&self) -> bool {
        self.profit.is_some_and(|p| p > 0.0)
    }

    pub fn is_loser(&self) -> bool {
        self.profit.is_some_and(|p| p < 0.0)
    }

    /// Entry notional: `entry_price × contract_size`.
    pub fn entry_value(&self) -> Option<f64> {
        self.contract_size.map(|c| self.entry_price * c)
    }

    /// Time between entry and exit, when the exit is known.
    pub fn duration(&self) -> Option<TimeDelta> {
        self.exit_time.map(|exit| exit - self.entry_time)
    }
}
