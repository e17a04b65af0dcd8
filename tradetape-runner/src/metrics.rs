//! Performance metrics — pure functions over an ordered trade collection.
//!
//! Every metric is a pure function: trade slice in, one value out. Order
//! matters only for the metrics anchored on the first or last trade
//! (`initial_capital`, buy and hold).
//!
//! Undefined results are `None`. That covers an empty slice, an empty
//! winner/loser subset, and a first trade without a contract size (no
//! normalization base). Sums over nothing are `0.0` and counts are `0`.
//! Trades with an absent field are skipped by any aggregate over that field.

use chrono::TimeDelta;
use tradetape_core::domain::Trade;

// ─── Capital base ───────────────────────────────────────────────────

/// Entry notional of the first trade, the base for every `%` metric.
///
/// Taken from the first trade of whatever slice is passed in, so a filtered
/// subset is normalized against its own first trade.
pub fn initial_capital(trades: &[Trade]) -> Option<f64> {
    trades.first().and_then(Trade::entry_value)
}

fn percent_of_capital(value: f64, trades: &[Trade]) -> Option<f64> {
    ratio(value, initial_capital(trades)?).map(|r| r * 100.0)
}

// ─── Profitability ──────────────────────────────────────────────────

/// Sum of all recorded profits.
pub fn net_profit(trades: &[Trade]) -> f64 {
    trades.iter().filter_map(|t| t.profit).sum()
}

pub fn net_profit_percent(trades: &[Trade]) -> Option<f64> {
    percent_of_capital(net_profit(trades), trades)
}

/// Sum of positive profits (always ≥ 0).
pub fn gross_profit(trades: &[Trade]) -> f64 {
    winners(trades).filter_map(|t| t.profit).sum()
}

pub fn gross_profit_percent(trades: &[Trade]) -> Option<f64> {
    percent_of_capital(gross_profit(trades), trades)
}

/// Sum of negative profits (always ≤ 0).
pub fn gross_loss(trades: &[Trade]) -> f64 {
    losers(trades).filter_map(|t| t.profit).sum()
}

pub fn gross_loss_percent(trades: &[Trade]) -> Option<f64> {
    percent_of_capital(gross_loss(trades), trades)
}

/// Gross profit over the magnitude of gross loss.
///
/// Zero when there is no gross profit. With no losses the ratio falls back to
/// the gross profit itself rather than infinity.
pub fn profit_factor(trades: &[Trade]) -> f64 {
    let profit = gross_profit(trades);
    let loss = gross_loss(trades).abs();
    if profit == 0.0 || loss == 0.0 {
        return profit;
    }
    profit / loss
}

// ─── Excursion ──────────────────────────────────────────────────────

pub fn max_run_up(trades: &[Trade]) -> Option<f64> {
    max_of(trades.iter().filter_map(|t| t.run_up))
}

pub fn max_run_up_percent(trades: &[Trade]) -> Option<f64> {
    max_of(trades.iter().filter_map(|t| t.run_up_percent))
}

/// Largest recorded drawdown, reported as a negative number.
pub fn max_draw_down(trades: &[Trade]) -> Option<f64> {
    max_of(trades.iter().filter_map(|t| t.drawdown)).map(|d| -d)
}

pub fn max_draw_down_percent(trades: &[Trade]) -> Option<f64> {
    max_of(trades.iter().filter_map(|t| t.drawdown_percent)).map(|d| -d)
}

// ─── Benchmark ──────────────────────────────────────────────────────

/// Profit of holding the first trade's size from the first entry price to the
/// last exit price (or the last entry price if that trade is still open).
pub fn buy_and_hold(trades: &[Trade]) -> Option<f64> {
    let first = trades.first()?;
    let last = trades.last()?;
    let last_price = last.exit_price.unwrap_or(last.entry_price);
    Some((last_price - first.entry_price) * first.contract_size?)
}

pub fn buy_and_hold_percent(trades: &[Trade]) -> Option<f64> {
    percent_of_capital(buy_and_hold(trades)?, trades)
}

// ─── Counts ─────────────────────────────────────────────────────────

pub fn max_contract_held(trades: &[Trade]) -> Option<f64> {
    max_of(trades.iter().filter_map(|t| t.contract_size))
}

pub fn total_closed_trades(trades: &[Trade]) -> usize {
    trades.iter().filter(|t| !t.is_open()).count()
}

pub fn total_open_trades(trades: &[Trade]) -> usize {
    trades.iter().filter(|t| t.is_open()).count()
}

/// Closed trades with a positive profit. Breakeven trades are neither
/// winners nor losers.
pub fn number_winning_trades(trades: &[Trade]) -> usize {
    winners(trades).filter(|t| !t.is_open()).count()
}

pub fn number_losing_trades(trades: &[Trade]) -> usize {
    losers(trades).filter(|t| !t.is_open()).count()
}

// ─── Averages ───────────────────────────────────────────────────────

pub fn avg_trade(trades: &[Trade]) -> Option<f64> {
    mean_of(trades.iter().filter_map(|t| t.profit))
}

pub fn avg_trade_percent(trades: &[Trade]) -> Option<f64> {
    mean_of(trades.iter().filter_map(|t| t.profit_percent))
}

pub fn avg_winning_trade(trades: &[Trade]) -> Option<f64> {
    mean_of(winners(trades).filter_map(|t| t.profit))
}

pub fn avg_winning_trade_percent(trades: &[Trade]) -> Option<f64> {
    mean_of(winners(trades).filter_map(|t| t.profit_percent))
}

pub fn avg_losing_trade(trades: &[Trade]) -> Option<f64> {
    mean_of(losers(trades).filter_map(|t| t.profit))
}

pub fn avg_losing_trade_percent(trades: &[Trade]) -> Option<f64> {
    mean_of(losers(trades).filter_map(|t| t.profit_percent))
}

/// Average winner over the magnitude of the average loser.
pub fn ratio_avg_win_avg_loss(trades: &[Trade]) -> Option<f64> {
    ratio(avg_winning_trade(trades)?, avg_losing_trade(trades)?.abs())
}

// ─── Extremes ───────────────────────────────────────────────────────

pub fn largest_winning_trade(trades: &[Trade]) -> Option<f64> {
    max_of(winners(trades).filter_map(|t| t.profit))
}

pub fn largest_winning_trade_percent(trades: &[Trade]) -> Option<f64> {
    max_of(winners(trades).filter_map(|t| t.profit_percent))
}

/// Most negative profit among losers.
pub fn largest_losing_trade(trades: &[Trade]) -> Option<f64> {
    min_of(losers(trades).filter_map(|t| t.profit))
}

pub fn largest_losing_trade_percent(trades: &[Trade]) -> Option<f64> {
    min_of(losers(trades).filter_map(|t| t.profit_percent))
}

// ─── Duration ───────────────────────────────────────────────────────

/// Mean time in trade, rounded to the nearest second (ties to even).
/// Trades without an exit time are skipped.
pub fn avg_bars_in_trades(trades: &[Trade]) -> Option<TimeDelta> {
    mean_duration(trades.iter())
}

pub fn avg_bars_in_winning_trades(trades: &[Trade]) -> Option<TimeDelta> {
    mean_duration(winners(trades))
}

pub fn avg_bars_in_losing_trades(trades: &[Trade]) -> Option<TimeDelta> {
    mean_duration(losers(trades))
}

// ─── Helpers ────────────────────────────────────────────────────────

fn winners(trades: &[Trade]) -> impl Iterator<Item = &Trade> + '_ {
    trades.iter().filter(|t| t.is_winner())
}

fn losers(trades: &[Trade]) -> impl Iterator<Item = &Trade> + '_ {
    trades.iter().filter(|t| t.is_loser())
}

/// `numerator / denominator`, undefined for a zero denominator.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}

pub(crate) fn mean_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

pub(crate) fn max_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
}

pub(crate) fn min_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))))
}

const NANOS_PER_SEC: i128 = 1_000_000_000;

fn mean_duration<'a>(trades: impl Iterator<Item = &'a Trade>) -> Option<TimeDelta> {
    let (total, count) = trades
        .filter_map(Trade::duration)
        .fold((0i128, 0i128), |(sum, n), d| {
            let nanos = d.num_seconds() as i128 * NANOS_PER_SEC + d.subsec_nanos() as i128;
            (sum + nanos, n + 1)
        });
    if count == 0 {
        return None;
    }
    let secs = round_half_even(total, count * NANOS_PER_SEC);
    TimeDelta::try_seconds(i64::try_from(secs).ok()?)
}

/// `numerator / denominator` rounded to the nearest integer, ties to even.
/// `denominator` must be positive.
pub(crate) fn round_half_even(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator.div_euclid(denominator);
    let twice_rem = 2 * numerator.rem_euclid(denominator);
    if twice_rem > denominator || (twice_rem == denominator && quotient % 2 != 0) {
        quotient + 1
    } else {
        quotient
    }
}
