//! Reporting and export — text, CSV and JSON renderings of summaries.
//!
//! - **Text**: aligned label/value listing for the terminal
//! - **CSV**: one row per summary, `Period` followed by the 32 statistic labels
//! - **JSON**: label-keyed objects, durations in whole seconds
//!
//! Undefined values render as `NaN` (numbers) or `NaT` (durations) in text,
//! as an empty cell in CSV and as `null` in JSON.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::TimeDelta;
use serde::Serialize;

use crate::monthly::MonthlyTable;
use crate::summary::{MetricValue, PerformanceSummary, Statistic};

// ─── Text ───────────────────────────────────────────────────────────

/// Aligned two-column listing of one summary.
pub fn render_summary_text(summary: &PerformanceSummary, precision: usize) -> String {
    let width = label_width();
    let mut out = String::new();
    for stat in Statistic::ALL {
        let value = format_text(stat, summary.get(stat), precision);
        let _ = writeln!(out, "{:<width$}  {value:>20}", stat.label());
    }
    out
}

/// One titled block per monthly row.
pub fn render_monthly_text(table: &MonthlyTable, precision: usize) -> String {
    let mut out = String::new();
    for (i, row) in table.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "── {} ──", row.label);
        out.push_str(&render_summary_text(&row.summary, precision));
    }
    out
}

fn label_width() -> usize {
    Statistic::ALL
        .iter()
        .map(|s| s.label().len())
        .max()
        .unwrap_or(0)
}

fn format_text(stat: Statistic, value: MetricValue, precision: usize) -> String {
    match value {
        MetricValue::Number(v) => format!("{v:.precision$}"),
        MetricValue::Count(n) => n.to_string(),
        MetricValue::Duration(d) => format_duration(d),
        MetricValue::Undefined if is_duration(stat) => "NaT".into(),
        MetricValue::Undefined => "NaN".into(),
    }
}

fn is_duration(stat: Statistic) -> bool {
    matches!(
        stat,
        Statistic::AvgBarsInTrades
            | Statistic::AvgBarsInWinningTrades
            | Statistic::AvgBarsInLosingTrades
    )
}

/// `D days HH:MM:SS`, with a leading `-` for negative spans.
pub fn format_duration(d: TimeDelta) -> String {
    let sign = if d < TimeDelta::zero() { "-" } else { "" };
    let total = d.num_seconds().unsigned_abs();
    let days = total / 86_400;
    let hours = total % 86_400 / 3_600;
    let minutes = total % 3_600 / 60;
    let seconds = total % 60;
    format!("{sign}{days} days {hours:02}:{minutes:02}:{seconds:02}")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// One summary as a header plus a single row labelled `period`.
pub fn export_summary_csv(summary: &PerformanceSummary, period: &str) -> Result<String> {
    write_csv([(period, summary)])
}

/// Every monthly row under a shared header.
pub fn export_monthly_csv(table: &MonthlyTable) -> Result<String> {
    write_csv(table.iter().map(|row| (row.label.as_str(), &row.summary)))
}

fn write_csv<'a>(
    rows: impl IntoIterator<Item = (&'a str, &'a PerformanceSummary)>,
) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["Period"];
    header.extend(Statistic::ALL.iter().map(|s| s.label()));
    wtr.write_record(&header).context("failed to write CSV header")?;

    for (period, summary) in rows {
        let mut record = Vec::with_capacity(header.len());
        record.push(period.to_string());
        record.extend(Statistic::ALL.iter().map(|&s| format_csv(summary.get(s))));
        wtr.write_record(&record)
            .with_context(|| format!("failed to write CSV row {period}"))?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

fn format_csv(value: MetricValue) -> String {
    match value {
        MetricValue::Number(v) if v.is_finite() => v.to_string(),
        MetricValue::Number(_) | MetricValue::Undefined => String::new(),
        MetricValue::Count(n) => n.to_string(),
        MetricValue::Duration(d) => d.num_seconds().to_string(),
    }
}

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize one summary to pretty JSON, keys in report order.
pub fn export_summary_json(summary: &PerformanceSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).context("failed to serialize summary to JSON")
}

#[derive(Serialize)]
struct MonthlyJsonRow<'a> {
    period: &'a str,
    #[serde(flatten)]
    summary: &'a PerformanceSummary,
}

/// Serialize a monthly table to a JSON array of label-keyed objects.
pub fn export_monthly_json(table: &MonthlyTable) -> Result<String> {
    let rows: Vec<MonthlyJsonRow<'_>> = table
        .iter()
        .map(|row| MonthlyJsonRow {
            period: &row.label,
            summary: &row.summary,
        })
        .collect();
    serde_json::to_string_pretty(&rows).context("failed to serialize monthly table to JSON")
}

// ─── Output ─────────────────────────────────────────────────────────

/// Write a rendered report to `path`, creating parent directories.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output dir: {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = content.len(), "wrote report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monthly::monthly_performance;
    use crate::summary::performance_summary;
    use chrono::NaiveDate;
    use tradetape_core::domain::{Direction, Trade};

    fn sample_trades() -> Vec<Trade> {
        let entry = NaiveDate::from_ymd_opt(2022, 6, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        vec![Trade {
            exit_time: Some(entry + TimeDelta::seconds(27_898)),
            exit_price: Some(110.0),
            contract_size: Some(1.0),
            profit: Some(10.0),
            profit_percent: Some(10.0),
            ..Trade::open(Direction::Long, entry, 100.0)
        }]
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(TimeDelta::seconds(27_898)), "0 days 07:44:58");
        assert_eq!(format_duration(TimeDelta::seconds(90_061)), "1 days 01:01:01");
        assert_eq!(format_duration(TimeDelta::seconds(-61)), "-0 days 00:01:01");
    }

    #[test]
    fn text_lists_every_label() {
        let text = render_summary_text(&performance_summary(&sample_trades()), 2);
        assert_eq!(text.lines().count(), 32);
        assert!(text.lines().next().unwrap().starts_with("Net Profit "));
        assert!(text.contains("10.00"));
        assert!(text.contains("0 days 07:44:58"));
    }

    #[test]
    fn text_marks_undefined() {
        let text = render_summary_text(&performance_summary(&[]), 2);
        let line = |label: &str| {
            text.lines()
                .find(|l| l.starts_with(&format!("{label} ")))
                .unwrap()
                .to_string()
        };
        assert!(line("Avg Trade").ends_with("NaN"));
        assert!(line("Avg Bars in Trades").ends_with("NaT"));
        assert!(line("Net Profit").ends_with("0.00"));
    }

    #[test]
    fn summary_csv_has_header_and_row() {
        let csv = export_summary_csv(&performance_summary(&sample_trades()), "All").unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Period,Net Profit,Net Profit %"));
        assert!(lines[1].starts_with("All,10,"));
        assert!(lines[1].ends_with(",27898,27898,"));
    }

    #[test]
    fn monthly_csv_one_row_per_label() {
        let table = monthly_performance(&sample_trades(), true);
        let csv = export_monthly_csv(&table).unwrap();
        let mut rdr = csv::Reader::from_reader(csv.as_bytes());
        let periods: Vec<String> = rdr
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(
            periods,
            vec!["2022-06-30", "2022-06-30 Long", "2022-06-30 Short"]
        );
    }

    #[test]
    fn summary_json_nulls_undefined() {
        let json = export_summary_json(&performance_summary(&sample_trades())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Profit Factor"], serde_json::json!(10.0));
        assert_eq!(value["Avg Bars in Winning Trades"], serde_json::json!(27_898));
        assert!(value["Avg Losing Trade %"].is_null());
        // Keys keep report order in the text
        assert!(json.find("\"Net Profit\"").unwrap() < json.find("\"Profit Factor\"").unwrap());
    }

    #[test]
    fn monthly_json_rows_carry_period() {
        let table = monthly_performance(&sample_trades(), false);
        let json = export_monthly_json(&table).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["period"], "2022-06-30");
        assert_eq!(value[0]["Net Profit"], serde_json::json!(10.0));
    }

    #[test]
    fn write_report_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("summary.txt");
        write_report(&path, "hello").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
