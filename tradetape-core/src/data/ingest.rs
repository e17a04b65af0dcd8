//! CSV ingestion of a trade-log export into [`RawRow`]s.
//!
//! Column presence is checked once against the header row. Cells are parsed
//! leniently: empty and `NaN` cells become `None`, anything else that fails to
//! parse is a hard error carrying the row and column.

use crate::data::raw::RawRow;
use crate::data::schema::{ColumnIndex, ColumnMap, SchemaError};
use crate::domain::TradeId;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Reads trade-log CSV files using a [`ColumnMap`].
#[derive(Debug, Clone, Default)]
pub struct TradeLogReader {
    columns: ColumnMap,
}

impl TradeLogReader {
    pub fn new(columns: ColumnMap) -> Self {
        Self { columns }
    }

    /// Ingest a CSV file from disk.
    pub fn read_path(&self, path: &Path) -> Result<Vec<RawRow>, DataError> {
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rows = self.read(file)?;
        tracing::debug!(path = %path.display(), rows = rows.len(), "ingested trade log");
        Ok(rows)
    }

    /// Ingest CSV from any reader. The first record must be the header row.
    pub fn read<R: Read>(&self, reader: R) -> Result<Vec<RawRow>, DataError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let index = self.columns.resolve(rdr.headers()?.iter())?;

        let mut rows = Vec::new();
        for (i, record) in rdr.records().enumerate() {
            let record = record?;
            let line = record.position().map_or(i as u64 + 2, |p| p.line());
            rows.push(self.parse_record(&record, &index, line)?);
        }
        Ok(rows)
    }

    fn parse_record(
        &self,
        record: &csv::StringRecord,
        index: &ColumnIndex,
        line: u64,
    ) -> Result<RawRow, DataError> {
        let cells = Cells {
            record,
            columns: &self.columns,
            line,
        };

        let id_text = cells
            .text(Some(index.trade_id))
            .ok_or_else(|| cells.missing(&self.columns.trade_id))?;
        let trade_id: TradeId = id_text
            .parse()
            .map_err(|_| cells.invalid(&self.columns.trade_id, id_text))?;
        let kind = cells
            .text(Some(index.kind))
            .ok_or_else(|| cells.missing(&self.columns.kind))?;

        Ok(RawRow {
            trade_id,
            kind: kind.to_string(),
            signal: cells.text(index.signal).map(str::to_string),
            time: cells.time(index.time)?,
            price: cells.number(Some(index.price), &self.columns.price)?,
            contracts: cells.number(Some(index.contracts), &self.columns.contracts)?,
            profit: cells.number(index.profit, "Profit")?,
            profit_percent: cells.number(index.profit_percent, "Profit %")?,
            drawdown: cells.number(index.drawdown, "Drawdown")?,
            drawdown_percent: cells.number(index.drawdown_percent, "Drawdown %")?,
            run_up: cells.number(index.run_up, "Run-up")?,
            run_up_percent: cells.number(index.run_up_percent, "Run-up %")?,
            cumulative_profit: cells.number(index.cumulative_profit, "Cum. Profit")?,
            cumulative_profit_percent: cells
                .number(index.cumulative_profit_percent, "Cum. Profit %")?,
        })
    }
}

/// Cell accessors for one record.
struct Cells<'a> {
    record: &'a csv::StringRecord,
    columns: &'a ColumnMap,
    line: u64,
}

impl<'a> Cells<'a> {
    fn text(&self, idx: Option<usize>) -> Option<&'a str> {
        idx.and_then(|i| self.record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn number(&self, idx: Option<usize>, column: &str) -> Result<Option<f64>, DataError> {
        let Some(raw) = self.text(idx) else {
            return Ok(None);
        };
        if raw.eq_ignore_ascii_case("nan") {
            return Ok(None);
        }
        raw.replace(',', "")
            .parse::<f64>()
            .map(Some)
            .map_err(|_| self.invalid(column, raw))
    }

    fn time(&self, idx: usize) -> Result<Option<NaiveDateTime>, DataError> {
        let Some(raw) = self.text(Some(idx)) else {
            return Ok(None);
        };
        parse_datetime(raw, self.columns.datetime_format.as_deref())
            .map(Some)
            .ok_or_else(|| self.invalid(&self.columns.time, raw))
    }

    fn missing(&self, column: &str) -> DataError {
        DataError::MissingValue {
            line: self.line,
            column: column.to_string(),
        }
    }

    fn invalid(&self, column: &str, value: &str) -> DataError {
        DataError::InvalidCell {
            line: self.line,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}

/// Parse an export timestamp; date-only values resolve to midnight.
pub fn parse_datetime(raw: &str, extra_format: Option<&str>) -> Option<NaiveDateTime> {
    if let Some(parsed) = extra_format.and_then(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(parsed);
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("line {line}: column {column:?} is empty")]
    MissingValue { line: u64, column: String },

    #[error("line {line}: column {column:?} has invalid value {value:?}")]
    InvalidCell {
        line: u64,
        column: String,
        value: String,
    },
}
