//! TradeLog — the ordered trade collection built from one export.

use crate::data::{ColumnMap, DataError, RawRow, TradeLogReader};
use crate::domain::{Direction, Trade, TradeId};
use crate::reducer::{reduce, DropReason};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Trades in export order, plus the ids the reducer excluded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeLog {
    trades: Vec<Trade>,
    #[serde(skip)]
    dropped: Vec<(TradeId, DropReason)>,
}

impl TradeLog {
    pub fn new(trades: Vec<Trade>) -> Self {
        Self {
            trades,
            dropped: Vec::new(),
        }
    }

    pub fn from_rows(rows: &[RawRow]) -> Self {
        let reduction = reduce(rows);
        Self {
            trades: reduction.trades,
            dropped: reduction.dropped,
        }
    }

    pub fn from_reader<R: Read>(reader: R, columns: &ColumnMap) -> Result<Self, DataError> {
        let rows = TradeLogReader::new(columns.clone()).read(reader)?;
        Ok(Self::from_rows(&rows))
    }

    pub fn from_csv_path(path: &Path, columns: &ColumnMap) -> Result<Self, DataError> {
        let rows = TradeLogReader::new(columns.clone()).read_path(path)?;
        Ok(Self::from_rows(&rows))
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn dropped(&self) -> &[(TradeId, DropReason)] {
        &self.dropped
    }

    /// Dropped ids other than still-open positions.
    pub fn malformed(&self) -> impl Iterator<Item = &(TradeId, DropReason)> {
        self.dropped
            .iter()
            .filter(|(_, reason)| !reason.is_open_position())
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    /// Trades of one direction, in log order.
    pub fn side(&self, direction: Direction) -> Vec<Trade> {
        filter_direction(&self.trades, direction)
    }
}

/// Keep trades of one direction, preserving order.
pub fn filter_direction(trades: &[Trade], direction: Direction) -> Vec<Trade> {
    trades
        .iter()
        .filter(|t| t.direction == direction)
        .cloned()
        .collect()
}

impl From<Vec<Trade>> for TradeLog {
    fn from(trades: Vec<Trade>) -> Self {
        Self::new(trades)
    }
}
