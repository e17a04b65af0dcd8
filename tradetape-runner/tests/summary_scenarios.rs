//! Integration tests for performance summaries built from trade-log exports.
//!
//! Tests cover:
//! 1. Two profitable trades — net profit, winner count, profit factor fallback
//! 2. Open trades — counted as open, excluded from closed-trade aggregates
//! 3. Buy and hold — first entry to last exit, first trade's size
//! 4. Duration rounding — half-second means round to even
//! 5. Empty logs — zero sums and counts, everything else undefined
//! 6. Side summaries — each side normalized by its own first trade

use chrono::TimeDelta;
use tradetape_core::data::ColumnMap;
use tradetape_core::TradeLog;
use tradetape_runner::{
    performance_summary, performance_summary_long, performance_summary_short, MetricValue,
    Statistic,
};

const HEADER: &str = "Trade #,Type,Signal,Date/Time,Price,Contracts,Profit USDT,Profit %,Drawdown USDT,Drawdown %,Run-up USDT,Run-up %,Cum. Profit USDT,Cum. Profit %";

fn load(body: &str) -> TradeLog {
    let csv = format!("{HEADER}\n{body}");
    TradeLog::from_reader(csv.as_bytes(), &ColumnMap::default()).unwrap()
}

// ── 1. Two profitable trades ─────────────────────────────────────────

#[test]
fn two_profitable_trades() {
    let log = load(
        "\
1,Exit Long,TP,2022-06-01 15:00,110,1,10,10,2,2,12,12,10,10
1,Entry Long,Buy,2022-06-01 09:00,100,1,10,10,2,2,12,12,10,10
2,Exit Short,TP,2022-06-02 15:00,190,1,10,5,1,0.5,15,7.5,20,20
2,Entry Short,Sell,2022-06-02 09:00,200,1,10,5,1,0.5,15,7.5,20,20
",
    );
    let s = performance_summary(log.trades());

    assert_eq!(s.net_profit, 20.0);
    assert_eq!(s.gross_profit, 20.0);
    assert_eq!(s.gross_loss, 0.0);
    assert_eq!(s.number_winning_trades, 2);
    assert_eq!(s.number_losing_trades, 0);
    assert_eq!(s.profit_factor, 20.0);
    assert_eq!(s.total_closed_trades, 2);
    assert_eq!(s.total_open_trades, 0);
    assert_eq!(s.max_run_up, Some(15.0));
    assert_eq!(s.max_draw_down, Some(-2.0));
    assert_eq!(s.max_draw_down_percent, Some(-2.0));
    assert_eq!(s.largest_winning_trade, Some(10.0));
    assert_eq!(s.avg_winning_trade_percent, Some(7.5));
    // Capital base: 100 × 1
    assert!((s.net_profit_percent.unwrap() - 20.0).abs() < 1e-12);
    assert_eq!(s.avg_bars_in_trades, Some(TimeDelta::hours(6)));
    assert!(s.get(Statistic::AvgLosingTrade).is_undefined());
}

// ── 2. Open trades ───────────────────────────────────────────────────

#[test]
fn single_open_trade() {
    let log = load(
        "\
1,Exit Long,,,,,,,,,,,,
1,Entry Long,Buy,2022-06-01 09:00,100,,,,,,,,,
",
    );
    assert_eq!(log.len(), 1);
    let s = performance_summary(log.trades());

    assert_eq!(s.total_open_trades, 1);
    assert_eq!(s.total_closed_trades, 0);
    assert_eq!(s.net_profit, 0.0);
    assert_eq!(s.number_winning_trades, 0);
    assert_eq!(s.avg_trade, None);
    assert_eq!(s.avg_bars_in_trades, None);
    assert_eq!(s.max_contract_held, None);
    // No contract size on the first trade: no capital base
    assert_eq!(s.net_profit_percent, None);
}

#[test]
fn open_trade_alongside_closed() {
    let log = load(
        "\
1,Exit Long,TP,2022-06-01 15:00,110,1,10,10,,,,,10,10
1,Entry Long,Buy,2022-06-01 09:00,100,1,10,10,,,,,10,10
2,Exit Long,,,,,,,,,,,,
2,Entry Long,Buy,2022-06-03 09:00,105,,,,,,,,,
",
    );
    let s = performance_summary(log.trades());
    assert_eq!(s.total_closed_trades, 1);
    assert_eq!(s.total_open_trades, 1);
    assert_eq!(s.net_profit, 10.0);
    assert_eq!(s.avg_trade, Some(10.0));
    assert_eq!(s.avg_bars_in_trades, Some(TimeDelta::hours(6)));
    // Last trade is open: buy and hold runs to its entry price
    assert_eq!(s.buy_and_hold, Some(5.0));
}

// ── 3. Buy and hold ──────────────────────────────────────────────────

#[test]
fn buy_and_hold_uses_first_size_and_last_exit() {
    let log = load(
        "\
1,Exit Long,TP,2022-06-01 15:00,104,2,8,4,,,,,8,4
1,Entry Long,Buy,2022-06-01 09:00,100,2,8,4,,,,,8,4
2,Exit Short,SL,2022-06-02 15:00,90,5,-20,-2,,,,,-12,-6
2,Entry Short,Sell,2022-06-02 09:00,86,5,-20,-2,,,,,-12,-6
",
    );
    let s = performance_summary(log.trades());
    assert_eq!(s.buy_and_hold, Some(-20.0));
    assert!((s.buy_and_hold_percent.unwrap() + 10.0).abs() < 1e-12);
    assert_eq!(s.max_contract_held, Some(5.0));
}

// ── 4. Duration rounding ─────────────────────────────────────────────

#[test]
fn avg_duration_rounds_half_to_even_down() {
    // 2s and 3s: mean 2.5s → 2s
    let log = load(
        "\
1,Exit Long,,2022-06-01 09:00:02,101,1,1,1,,,,,,
1,Entry Long,,2022-06-01 09:00:00,100,1,1,1,,,,,,
2,Exit Long,,2022-06-01 10:00:03,101,1,1,1,,,,,,
2,Entry Long,,2022-06-01 10:00:00,100,1,1,1,,,,,,
",
    );
    let s = performance_summary(log.trades());
    assert_eq!(s.avg_bars_in_trades, Some(TimeDelta::seconds(2)));
}

#[test]
fn avg_duration_rounds_half_to_even_up() {
    // 3s and 4s: mean 3.5s → 4s
    let log = load(
        "\
1,Exit Long,,2022-06-01 09:00:03,99,1,-1,-1,,,,,,
1,Entry Long,,2022-06-01 09:00:00,100,1,-1,-1,,,,,,
2,Exit Long,,2022-06-01 10:00:04,99,1,-1,-1,,,,,,
2,Entry Long,,2022-06-01 10:00:00,100,1,-1,-1,,,,,,
",
    );
    let s = performance_summary(log.trades());
    assert_eq!(s.avg_bars_in_trades, Some(TimeDelta::seconds(4)));
    assert_eq!(s.avg_bars_in_losing_trades, Some(TimeDelta::seconds(4)));
    assert_eq!(s.avg_bars_in_winning_trades, None);
}

// ── 5. Empty logs ────────────────────────────────────────────────────

#[test]
fn empty_log_summary() {
    let log = load("");
    let s = performance_summary(log.trades());
    for (label, value) in s.entries() {
        match label {
            "Net Profit" | "Gross Profit" | "Gross Loss" | "Profit Factor" => {
                assert_eq!(value, MetricValue::Number(0.0), "{label}")
            }
            "Total Closed Trades" | "Total Open Trades" | "Number Winning Trades"
            | "Number Losing Trades" => assert_eq!(value, MetricValue::Count(0), "{label}"),
            _ => assert!(value.is_undefined(), "{label} should be undefined"),
        }
    }
}

// ── 6. Side summaries ────────────────────────────────────────────────

#[test]
fn side_summaries_normalize_independently() {
    let log = load(
        "\
1,Exit Long,TP,2022-06-01 15:00,110,1,10,10,,,,,10,10
1,Entry Long,Buy,2022-06-01 09:00,100,1,10,10,,,,,10,10
2,Exit Short,SL,2022-06-02 15:00,410,1,-10,-2.5,,,,,0,0
2,Entry Short,Sell,2022-06-02 09:00,400,1,-10,-2.5,,,,,0,0
",
    );
    let long = performance_summary_long(log.trades());
    let short = performance_summary_short(log.trades());

    assert_eq!(long.total_closed_trades, 1);
    assert_eq!(short.total_closed_trades, 1);
    assert!((long.net_profit_percent.unwrap() - 10.0).abs() < 1e-12);
    assert!((short.net_profit_percent.unwrap() + 2.5).abs() < 1e-12);
    assert_eq!(short.profit_factor, 0.0);
    assert_eq!(short.largest_losing_trade, Some(-10.0));
}
