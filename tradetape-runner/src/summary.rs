//! Performance summary — the fixed 32-statistic record for one trade set.
//!
//! [`PerformanceSummary::compute`] evaluates every metric in
//! [`crate::metrics`] over the same slice. [`Statistic`] fixes the row order
//! and labels shared by every rendering of a summary.

use crate::metrics;
use chrono::TimeDelta;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use tradetape_core::domain::{Direction, Trade};
use tradetape_core::filter_direction;

/// One statistic's value, or the single undefined marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    Number(f64),
    Count(usize),
    Duration(TimeDelta),
    Undefined,
}

impl MetricValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, MetricValue::Undefined)
    }

    /// Numeric view: counts as floats, durations as seconds.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            MetricValue::Number(v) => Some(v),
            MetricValue::Count(n) => Some(n as f64),
            MetricValue::Duration(d) => Some(d.num_seconds() as f64),
            MetricValue::Undefined => None,
        }
    }

    pub fn as_duration(&self) -> Option<TimeDelta> {
        match *self {
            MetricValue::Duration(d) => Some(d),
            _ => None,
        }
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Number(v)
    }
}

impl From<Option<f64>> for MetricValue {
    fn from(v: Option<f64>) -> Self {
        v.map_or(MetricValue::Undefined, MetricValue::Number)
    }
}

impl From<usize> for MetricValue {
    fn from(n: usize) -> Self {
        MetricValue::Count(n)
    }
}

impl From<Option<TimeDelta>> for MetricValue {
    fn from(d: Option<TimeDelta>) -> Self {
        d.map_or(MetricValue::Undefined, MetricValue::Duration)
    }
}

/// Durations serialize as whole seconds, undefined as `null`.
impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            MetricValue::Number(v) if v.is_finite() => serializer.serialize_f64(v),
            MetricValue::Number(_) => serializer.serialize_none(),
            MetricValue::Count(n) => serializer.serialize_u64(n as u64),
            MetricValue::Duration(d) => serializer.serialize_i64(d.num_seconds()),
            MetricValue::Undefined => serializer.serialize_none(),
        }
    }
}

/// The statistics of a summary, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statistic {
    NetProfit,
    NetProfitPercent,
    GrossProfit,
    GrossProfitPercent,
    GrossLoss,
    GrossLossPercent,
    MaxRunUp,
    MaxRunUpPercent,
    MaxDrawDown,
    MaxDrawDownPercent,
    BuyAndHold,
    BuyAndHoldPercent,
    ProfitFactor,
    MaxContractHeld,
    TotalClosedTrades,
    TotalOpenTrades,
    NumberWinningTrades,
    NumberLosingTrades,
    AvgTrade,
    AvgTradePercent,
    AvgWinningTrade,
    AvgWinningTradePercent,
    AvgLosingTrade,
    AvgLosingTradePercent,
    RatioAvgWinAvgLoss,
    LargestWinningTrade,
    LargestWinningTradePercent,
    LargestLosingTrade,
    LargestLosingTradePercent,
    AvgBarsInTrades,
    AvgBarsInWinningTrades,
    AvgBarsInLosingTrades,
}

impl Statistic {
    pub const ALL: [Statistic; 32] = [
        Statistic::NetProfit,
        Statistic::NetProfitPercent,
        Statistic::GrossProfit,
        Statistic::GrossProfitPercent,
        Statistic::GrossLoss,
        Statistic::GrossLossPercent,
        Statistic::MaxRunUp,
        Statistic::MaxRunUpPercent,
        Statistic::MaxDrawDown,
        Statistic::MaxDrawDownPercent,
        Statistic::BuyAndHold,
        Statistic::BuyAndHoldPercent,
        Statistic::ProfitFactor,
        Statistic::MaxContractHeld,
        Statistic::TotalClosedTrades,
        Statistic::TotalOpenTrades,
        Statistic::NumberWinningTrades,
        Statistic::NumberLosingTrades,
        Statistic::AvgTrade,
        Statistic::AvgTradePercent,
        Statistic::AvgWinningTrade,
        Statistic::AvgWinningTradePercent,
        Statistic::AvgLosingTrade,
        Statistic::AvgLosingTradePercent,
        Statistic::RatioAvgWinAvgLoss,
        Statistic::LargestWinningTrade,
        Statistic::LargestWinningTradePercent,
        Statistic::LargestLosingTrade,
        Statistic::LargestLosingTradePercent,
        Statistic::AvgBarsInTrades,
        Statistic::AvgBarsInWinningTrades,
        Statistic::AvgBarsInLosingTrades,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Statistic::NetProfit => "Net Profit",
            Statistic::NetProfitPercent => "Net Profit %",
            Statistic::GrossProfit => "Gross Profit",
            Statistic::GrossProfitPercent => "Gross Profit %",
            Statistic::GrossLoss => "Gross Loss",
            Statistic::GrossLossPercent => "Gross Loss %",
            Statistic::MaxRunUp => "Max Run Up",
            Statistic::MaxRunUpPercent => "Max Run Up %",
            Statistic::MaxDrawDown => "Max Draw Down",
            Statistic::MaxDrawDownPercent => "Max Draw Down %",
            Statistic::BuyAndHold => "Buy and Hold",
            Statistic::BuyAndHoldPercent => "Buy and Hold %",
            Statistic::ProfitFactor => "Profit Factor",
            Statistic::MaxContractHeld => "Max Contract Held",
            Statistic::TotalClosedTrades => "Total Closed Trades",
            Statistic::TotalOpenTrades => "Total Open Trades",
            Statistic::NumberWinningTrades => "Number Winning Trades",
            Statistic::NumberLosingTrades => "Number Losing Trades",
            Statistic::AvgTrade => "Avg Trade",
            Statistic::AvgTradePercent => "Avg Trade %",
            Statistic::AvgWinningTrade => "Avg Winning Trade",
            Statistic::AvgWinningTradePercent => "Avg Winning Trade %",
            Statistic::AvgLosingTrade => "Avg Losing Trade",
            Statistic::AvgLosingTradePercent => "Avg Losing Trade %",
            Statistic::RatioAvgWinAvgLoss => "Ratio Avg Win Avg Loss",
            Statistic::LargestWinningTrade => "Largest Winning Trade",
            Statistic::LargestWinningTradePercent => "Largest Winning Trade %",
            Statistic::LargestLosingTrade => "Largest Losing Trade",
            Statistic::LargestLosingTradePercent => "Largest Losing Trade %",
            Statistic::AvgBarsInTrades => "Avg Bars in Trades",
            Statistic::AvgBarsInWinningTrades => "Avg Bars in Winning Trades",
            Statistic::AvgBarsInLosingTrades => "Avg Bars in Losing Trades",
        }
    }

    /// Look a statistic up by its report label.
    pub fn from_label(label: &str) -> Option<Statistic> {
        Statistic::ALL.into_iter().find(|s| s.label() == label)
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// All statistics for one trade set.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceSummary {
    pub net_profit: f64,
    pub net_profit_percent: Option<f64>,
    pub gross_profit: f64,
    pub gross_profit_percent: Option<f64>,
    pub gross_loss: f64,
    pub gross_loss_percent: Option<f64>,
    pub max_run_up: Option<f64>,
    pub max_run_up_percent: Option<f64>,
    pub max_draw_down: Option<f64>,
    pub max_draw_down_percent: Option<f64>,
    pub buy_and_hold: Option<f64>,
    pub buy_and_hold_percent: Option<f64>,
    pub profit_factor: f64,
    pub max_contract_held: Option<f64>,
    pub total_closed_trades: usize,
    pub total_open_trades: usize,
    pub number_winning_trades: usize,
    pub number_losing_trades: usize,
    pub avg_trade: Option<f64>,
    pub avg_trade_percent: Option<f64>,
    pub avg_winning_trade: Option<f64>,
    pub avg_winning_trade_percent: Option<f64>,
    pub avg_losing_trade: Option<f64>,
    pub avg_losing_trade_percent: Option<f64>,
    pub ratio_avg_win_avg_loss: Option<f64>,
    pub largest_winning_trade: Option<f64>,
    pub largest_winning_trade_percent: Option<f64>,
    pub largest_losing_trade: Option<f64>,
    pub largest_losing_trade_percent: Option<f64>,
    pub avg_bars_in_trades: Option<TimeDelta>,
    pub avg_bars_in_winning_trades: Option<TimeDelta>,
    pub avg_bars_in_losing_trades: Option<TimeDelta>,
}

impl PerformanceSummary {
    /// Compute every statistic over `trades`, in the given order.
    pub fn compute(trades: &[Trade]) -> Self {
        Self {
            net_profit: metrics::net_profit(trades),
            net_profit_percent: metrics::net_profit_percent(trades),
            gross_profit: metrics::gross_profit(trades),
            gross_profit_percent: metrics::gross_profit_percent(trades),
            gross_loss: metrics::gross_loss(trades),
            gross_loss_percent: metrics::gross_loss_percent(trades),
            max_run_up: metrics::max_run_up(trades),
            max_run_up_percent: metrics::max_run_up_percent(trades),
            max_draw_down: metrics::max_draw_down(trades),
            max_draw_down_percent: metrics::max_draw_down_percent(trades),
            buy_and_hold: metrics::buy_and_hold(trades),
            buy_and_hold_percent: metrics::buy_and_hold_percent(trades),
            profit_factor: metrics::profit_factor(trades),
            max_contract_held: metrics::max_contract_held(trades),
            total_closed_trades: metrics::total_closed_trades(trades),
            total_open_trades: metrics::total_open_trades(trades),
            number_winning_trades: metrics::number_winning_trades(trades),
            number_losing_trades: metrics::number_losing_trades(trades),
            avg_trade: metrics::avg_trade(trades),
            avg_trade_percent: metrics::avg_trade_percent(trades),
            avg_winning_trade: metrics::avg_winning_trade(trades),
            avg_winning_trade_percent: metrics::avg_winning_trade_percent(trades),
            avg_losing_trade: metrics::avg_losing_trade(trades),
            avg_losing_trade_percent: metrics::avg_losing_trade_percent(trades),
            ratio_avg_win_avg_loss: metrics::ratio_avg_win_avg_loss(trades),
            largest_winning_trade: metrics::largest_winning_trade(trades),
            largest_winning_trade_percent: metrics::largest_winning_trade_percent(trades),
            largest_losing_trade: metrics::largest_losing_trade(trades),
            largest_losing_trade_percent: metrics::largest_losing_trade_percent(trades),
            avg_bars_in_trades: metrics::avg_bars_in_trades(trades),
            avg_bars_in_winning_trades: metrics::avg_bars_in_winning_trades(trades),
            avg_bars_in_losing_trades: metrics::avg_bars_in_losing_trades(trades),
        }
    }

    pub fn get(&self, stat: Statistic) -> MetricValue {
        match stat {
            Statistic::NetProfit => self.net_profit.into(),
            Statistic::NetProfitPercent => self.net_profit_percent.into(),
            Statistic::GrossProfit => self.gross_profit.into(),
            Statistic::GrossProfitPercent => self.gross_profit_percent.into(),
            Statistic::GrossLoss => self.gross_loss.into(),
            Statistic::GrossLossPercent => self.gross_loss_percent.into(),
            Statistic::MaxRunUp => self.max_run_up.into(),
            Statistic::MaxRunUpPercent => self.max_run_up_percent.into(),
            Statistic::MaxDrawDown => self.max_draw_down.into(),
            Statistic::MaxDrawDownPercent => self.max_draw_down_percent.into(),
            Statistic::BuyAndHold => self.buy_and_hold.into(),
            Statistic::BuyAndHoldPercent => self.buy_and_hold_percent.into(),
            Statistic::ProfitFactor => self.profit_factor.into(),
            Statistic::MaxContractHeld => self.max_contract_held.into(),
            Statistic::TotalClosedTrades => self.total_closed_trades.into(),
            Statistic::TotalOpenTrades => self.total_open_trades.into(),
            Statistic::NumberWinningTrades => self.number_winning_trades.into(),
            Statistic::NumberLosingTrades => self.number_losing_trades.into(),
            Statistic::AvgTrade => self.avg_trade.into(),
            Statistic::AvgTradePercent => self.avg_trade_percent.into(),
            Statistic::AvgWinningTrade => self.avg_winning_trade.into(),
            Statistic::AvgWinningTradePercent => self.avg_winning_trade_percent.into(),
            Statistic::AvgLosingTrade => self.avg_losing_trade.into(),
            Statistic::AvgLosingTradePercent => self.avg_losing_trade_percent.into(),
            Statistic::RatioAvgWinAvgLoss => self.ratio_avg_win_avg_loss.into(),
            Statistic::LargestWinningTrade => self.largest_winning_trade.into(),
            Statistic::LargestWinningTradePercent => self.largest_winning_trade_percent.into(),
            Statistic::LargestLosingTrade => self.largest_losing_trade.into(),
            Statistic::LargestLosingTradePercent => self.largest_losing_trade_percent.into(),
            Statistic::AvgBarsInTrades => self.avg_bars_in_trades.into(),
            Statistic::AvgBarsInWinningTrades => self.avg_bars_in_winning_trades.into(),
            Statistic::AvgBarsInLosingTrades => self.avg_bars_in_losing_trades.into(),
        }
    }

    /// `(label, value)` pairs in report order.
    pub fn entries(&self) -> Vec<(&'static str, MetricValue)> {
        Statistic::ALL
            .iter()
            .map(|&s| (s.label(), self.get(s)))
            .collect()
    }
}

/// Serializes as a label-keyed map in report order.
impl Serialize for PerformanceSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Statistic::ALL.len()))?;
        for stat in Statistic::ALL {
            map.serialize_entry(stat.label(), &self.get(stat))?;
        }
        map.end()
    }
}

/// Summary over all trades.
pub fn performance_summary(trades: &[Trade]) -> PerformanceSummary {
    PerformanceSummary::compute(trades)
}

/// Summary over long trades only; `%` metrics use the first long trade.
pub fn performance_summary_long(trades: &[Trade]) -> PerformanceSummary {
    PerformanceSummary::compute(&filter_direction(trades, Direction::Long))
}

/// Summary over short trades only; `%` metrics use the first short trade.
pub fn performance_summary_short(trades: &[Trade]) -> PerformanceSummary {
    PerformanceSummary::compute(&filter_direction(trades, Direction::Short))
}
