//! Trade reduction — pairs raw entry/exit rows into [`Trade`] records.
//!
//! Pure function: raw rows in export order → trades in first-seen order.
//! Groups that are not exactly one entry leg plus one exit leg are dropped and
//! reported in [`Reduction::dropped`]; they never abort the reduction.

use crate::data::RawRow;
use crate::domain::{LegParseError, LegRole, LegType, Trade, TradeId};
use std::collections::HashMap;
use std::fmt;

/// Why a trade id produced no record.
#[derive(Debug, Clone, PartialEq)]
pub enum DropReason {
    /// The id had this many rows instead of two.
    LegCount(usize),
    /// A `Type` cell could not be parsed.
    BadType(LegParseError),
    /// Two rows, but not one entry and one exit.
    RoleMismatch,
    /// The entry row is missing its timestamp or price.
    IncompleteEntry,
}

impl DropReason {
    /// A lone leg: the position was still open when the export was taken.
    pub fn is_open_position(&self) -> bool {
        matches!(self, DropReason::LegCount(1))
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::LegCount(n) => write!(f, "expected 2 legs, found {n}"),
            DropReason::BadType(e) => write!(f, "{e}"),
            DropReason::RoleMismatch => f.write_str("legs are not one entry and one exit"),
            DropReason::IncompleteEntry => f.write_str("entry leg has no time or price"),
        }
    }
}

/// Output of [`reduce`]: the trades plus every id that was excluded.
#[derive(Debug, Clone, Default)]
pub struct Reduction {
    pub trades: Vec<Trade>,
    pub dropped: Vec<(TradeId, DropReason)>,
}

/// Pair rows into trades, keeping the drop report.
pub fn reduce(rows: &[RawRow]) -> Reduction {
    let mut reduction = Reduction::default();

    for (id, legs) in group_by_trade(rows) {
        match pair_legs(&legs) {
            Ok(trade) => reduction.trades.push(trade),
            Err(reason) => {
                if reason.is_open_position() {
                    tracing::debug!(trade = %id, %reason, "dropping open trade");
                } else {
                    tracing::warn!(trade = %id, %reason, "dropping malformed trade group");
                }
                reduction.dropped.push((id, reason));
            }
        }
    }

    tracing::debug!(
        trades = reduction.trades.len(),
        dropped = reduction.dropped.len(),
        "reduced trade log"
    );
    reduction
}

/// Pair rows into trades, discarding malformed groups.
pub fn reduce_rows(rows: &[RawRow]) -> Vec<Trade> {
    reduce(rows).trades
}

/// Group rows by trade id, preserving the order in which ids first appear.
fn group_by_trade(rows: &[RawRow]) -> Vec<(TradeId, Vec<&RawRow>)> {
    let mut groups: Vec<(TradeId, Vec<&RawRow>)> = Vec::new();
    let mut slot: HashMap<TradeId, usize> = HashMap::new();

    for row in rows {
        match slot.get(&row.trade_id) {
            Some(&i) => groups[i].1.push(row),
            None => {
                slot.insert(row.trade_id, groups.len());
                groups.push((row.trade_id, vec![row]));
            }
        }
    }
    groups
}

/// Build a trade from one id's legs.
///
/// Legs are identified by their `Type` role, not by position: the export
/// lists the exit before the entry, but a reordered file must not swap them.
fn pair_legs(legs: &[&RawRow]) -> Result<Trade, DropReason> {
    let [first, second] = legs else {
        return Err(DropReason::LegCount(legs.len()));
    };

    let first_type = first.leg_type().map_err(DropReason::BadType)?;
    let second_type = second.leg_type().map_err(DropReason::BadType)?;

    let (entry, entry_type, exit) = match (first_type.role, second_type.role) {
        (LegRole::Exit, LegRole::Entry) => (*second, second_type, *first),
        (LegRole::Entry, LegRole::Exit) => (*first, first_type, *second),
        _ => return Err(DropReason::RoleMismatch),
    };

    build_trade(entry, entry_type, exit)
}

fn build_trade(entry: &RawRow, entry_type: LegType, exit: &RawRow) -> Result<Trade, DropReason> {
    let (Some(entry_time), Some(entry_price)) = (entry.time, entry.price) else {
        return Err(DropReason::IncompleteEntry);
    };

    Ok(Trade {
        direction: entry_type.direction,
        entry_time,
        entry_price,
        entry_signal: entry.signal.clone(),
        exit_time: exit.time,
        exit_price: exit.price,
        exit_signal: exit.signal.clone(),
        contract_size: entry.contracts,
        profit: entry.profit,
        profit_percent: entry.profit_percent,
        drawdown: entry.drawdown,
        drawdown_percent: entry.drawdown_percent,
        run_up: entry.run_up,
        run_up_percent: entry.run_up_percent,
        cumulative_profit: entry.cumulative_profit,
        cumulative_profit_percent: entry.cumulative_profit_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 6, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn leg(id: u64, kind: &str, hour: u32, price: f64) -> RawRow {
        RawRow {
            time: Some(at(hour)),
            price: Some(price),
            contracts: Some(1.0),
            profit: Some(5.0),
            ..RawRow::new(id, kind)
        }
    }

    #[test]
    fn pairs_exit_then_entry() {
        let rows = vec![
            RawRow {
                signal: Some("TP".into()),
                ..leg(1, "Exit Short", 12, 95.0)
            },
            RawRow {
                signal: Some("Sell".into()),
                ..leg(1, "Entry Short", 9, 100.0)
            },
        ];
        let trades = reduce_rows(&rows);
        assert_eq!(trades.len(), 1);
        let t = &trades[0];
        assert_eq!(t.direction, Direction::Short);
        assert_eq!(t.entry_time, at(9));
        assert_eq!(t.exit_time, Some(at(12)));
        assert_eq!(t.entry_price, 100.0);
        assert_eq!(t.exit_price, Some(95.0));
        assert_eq!(t.entry_signal.as_deref(), Some("Sell"));
        assert_eq!(t.exit_signal.as_deref(), Some("TP"));
    }

    #[test]
    fn pairs_by_role_when_entry_comes_first() {
        let rows = vec![leg(1, "Entry Long", 9, 100.0), leg(1, "Exit Long", 12, 110.0)];
        let trades = reduce_rows(&rows);
        assert_eq!(trades[0].entry_price, 100.0);
        assert_eq!(trades[0].exit_price, Some(110.0));
    }

    #[test]
    fn entry_side_fields_come_from_entry_row() {
        let rows = vec![
            RawRow {
                profit: Some(-1.0),
                contracts: Some(9.0),
                ..leg(1, "Exit Long", 12, 110.0)
            },
            RawRow {
                profit: Some(10.0),
                drawdown: Some(2.0),
                run_up: Some(12.0),
                cumulative_profit: Some(10.0),
                ..leg(1, "Entry Long", 9, 100.0)
            },
        ];
        let t = &reduce_rows(&rows)[0];
        assert_eq!(t.profit, Some(10.0));
        assert_eq!(t.contract_size, Some(1.0));
        assert_eq!(t.drawdown, Some(2.0));
        assert_eq!(t.run_up, Some(12.0));
        assert_eq!(t.cumulative_profit, Some(10.0));
    }

    #[test]
    fn preserves_first_seen_order() {
        let rows = vec![
            leg(2, "Exit Long", 14, 1.0),
            leg(1, "Exit Long", 12, 1.0),
            leg(2, "Entry Long", 13, 1.0),
            leg(1, "Entry Long", 9, 1.0),
        ];
        let trades = reduce_rows(&rows);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].entry_time, at(13));
        assert_eq!(trades[1].entry_time, at(9));
    }

    #[test]
    fn drops_single_leg_group() {
        let rows = vec![leg(1, "Entry Long", 9, 100.0)];
        let reduction = reduce(&rows);
        assert!(reduction.trades.is_empty());
        assert_eq!(reduction.dropped, vec![(TradeId(1), DropReason::LegCount(1))]);
    }

    #[test]
    fn drops_three_leg_group() {
        let rows = vec![
            leg(1, "Exit Long", 12, 110.0),
            leg(1, "Entry Long", 9, 100.0),
            leg(1, "Entry Long", 10, 101.0),
        ];
        let reduction = reduce(&rows);
        assert!(reduction.trades.is_empty());
        assert_eq!(reduction.dropped[0].1, DropReason::LegCount(3));
    }

    #[test]
    fn only_lone_legs_are_open_positions() {
        assert!(DropReason::LegCount(1).is_open_position());
        assert!(!DropReason::LegCount(3).is_open_position());
        assert!(!DropReason::RoleMismatch.is_open_position());
        assert!(!DropReason::IncompleteEntry.is_open_position());
    }

    #[test]
    fn drops_two_entries() {
        let rows = vec![leg(1, "Entry Long", 9, 100.0), leg(1, "Entry Long", 10, 101.0)];
        assert_eq!(reduce(&rows).dropped[0].1, DropReason::RoleMismatch);
    }

    #[test]
    fn drops_unparseable_type() {
        let rows = vec![leg(1, "Exit Flat", 12, 110.0), leg(1, "Entry Long", 9, 100.0)];
        let reduction = reduce(&rows);
        assert!(matches!(reduction.dropped[0].1, DropReason::BadType(_)));
    }

    #[test]
    fn drops_entry_without_price() {
        let rows = vec![
            leg(1, "Exit Long", 12, 110.0),
            RawRow {
                price: None,
                ..leg(1, "Entry Long", 9, 100.0)
            },
        ];
        assert_eq!(reduce(&rows).dropped[0].1, DropReason::IncompleteEntry);
    }

    #[test]
    fn open_exit_leg_keeps_absent_fields() {
        let rows = vec![
            RawRow::new(1u64, "Exit Long"),
            RawRow {
                contracts: None,
                profit: None,
                ..leg(1, "Entry Long", 9, 100.0)
            },
        ];
        let t = &reduce_rows(&rows)[0];
        assert!(t.is_open());
        assert_eq!(t.exit_time, None);
        assert_eq!(t.exit_price, None);
        assert_eq!(t.profit, None);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let reduction = reduce(&[]);
        assert!(reduction.trades.is_empty());
        assert!(reduction.dropped.is_empty());
    }
}
