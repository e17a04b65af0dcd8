//! Monthly breakdown — one summary per calendar month of entry time.
//!
//! Buckets are keyed by the entry month and labelled by that month's last
//! day. Only months with at least one trade appear, in chronological order.
//! With the side split enabled each month yields three rows: all trades, then
//! `Long`, then `Short`. A side with no trades that month still gets its row,
//! with zero sums and counts and every other statistic undefined.

use crate::summary::PerformanceSummary;
use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use tradetape_core::domain::{Direction, Trade};
use tradetape_core::filter_direction;

/// One row of a monthly table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRow {
    pub label: String,
    /// Last calendar day of the bucket's month.
    pub period: NaiveDate,
    /// `None` for the all-trades row.
    pub side: Option<Direction>,
    pub summary: PerformanceSummary,
}

/// Ordered monthly summaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyTable {
    rows: Vec<MonthlyRow>,
}

impl MonthlyTable {
    pub fn rows(&self) -> &[MonthlyRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn get(&self, label: &str) -> Option<&PerformanceSummary> {
        self.rows
            .iter()
            .find(|r| r.label == label)
            .map(|r| &r.summary)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MonthlyRow> {
        self.rows.iter()
    }
}

impl IntoIterator for MonthlyTable {
    type Item = MonthlyRow;
    type IntoIter = std::vec::IntoIter<MonthlyRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Summarize each entry month of `trades`.
pub fn monthly_performance(trades: &[Trade], separate_long_short: bool) -> MonthlyTable {
    let buckets = bucket_by_month(trades);
    tracing::debug!(months = buckets.len(), "computing monthly summaries");

    let rows = buckets
        .iter()
        .flat_map(|(period, bucket)| summarize_bucket(*period, bucket, separate_long_short))
        .collect();
    MonthlyTable { rows }
}

/// Same table as [`monthly_performance`], with months summarized on the rayon
/// pool. Row order is unaffected.
pub fn monthly_performance_par(trades: &[Trade], separate_long_short: bool) -> MonthlyTable {
    let buckets = bucket_by_month(trades);
    tracing::debug!(months = buckets.len(), "computing monthly summaries in parallel");

    let per_month: Vec<Vec<MonthlyRow>> = buckets
        .par_iter()
        .map(|(period, bucket)| summarize_bucket(*period, bucket, separate_long_short))
        .collect();
    MonthlyTable {
        rows: per_month.into_iter().flatten().collect(),
    }
}

/// Last day of `date`'s month.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = match date.month() {
        12 => (date.year() + 1, 1),
        m => (date.year(), m + 1),
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(NaiveDate::MAX)
}

/// Row label: the month-end date, optionally suffixed with the side.
pub fn period_label(period: NaiveDate, side: Option<Direction>) -> String {
    let date = period.format("%Y-%m-%d");
    match side {
        Some(direction) => format!("{date} {direction}"),
        None => date.to_string(),
    }
}

/// Group trades by entry month, keeping collection order inside each month.
fn bucket_by_month(trades: &[Trade]) -> Vec<(NaiveDate, Vec<Trade>)> {
    let mut months: BTreeMap<(i32, u32), Vec<Trade>> = BTreeMap::new();
    for trade in trades {
        let day = trade.entry_time.date();
        months
            .entry((day.year(), day.month()))
            .or_default()
            .push(trade.clone());
    }

    months
        .into_values()
        .filter_map(|bucket| {
            let first = bucket.first()?;
            Some((month_end(first.entry_time.date()), bucket))
        })
        .collect()
}

fn summarize_bucket(
    period: NaiveDate,
    bucket: &[Trade],
    separate_long_short: bool,
) -> Vec<MonthlyRow> {
    let mut rows = vec![MonthlyRow {
        label: period_label(period, None),
        period,
        side: None,
        summary: PerformanceSummary::compute(bucket),
    }];

    if separate_long_short {
        for direction in [Direction::Long, Direction::Short] {
            let side = filter_direction(bucket, direction);
            rows.push(MonthlyRow {
                label: period_label(period, Some(direction)),
                period,
                side: Some(direction),
                summary: PerformanceSummary::compute(&side),
            });
        }
    }
    rows
}
