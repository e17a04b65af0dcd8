//! Column contract with the trade-log export.
//!
//! The export names its money columns with the quote currency
//! (`Profit USDT`, `Drawdown USDT`, ...). [`ColumnMap`] holds the names,
//! [`ColumnMap::resolve`] turns a header row into column positions.

use serde::{Deserialize, Serialize};

/// Header names of the export. Every field has a default matching the
/// TradingView "List of Trades" CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub trade_id: String,
    pub kind: String,
    pub signal: String,
    pub time: String,
    pub price: String,
    pub contracts: String,
    /// Suffix of the money columns, e.g. `USDT` in `Profit USDT`.
    pub currency: String,
    /// Extra `chrono` format tried before the built-in ones.
    pub datetime_format: Option<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            trade_id: "Trade #".into(),
            kind: "Type".into(),
            signal: "Signal".into(),
            time: "Date/Time".into(),
            price: "Price".into(),
            contracts: "Contracts".into(),
            currency: "USDT".into(),
            datetime_format: None,
        }
    }
}

impl ColumnMap {
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    fn money(&self, name: &str) -> String {
        format!("{name} {}", self.currency)
    }

    /// Locate every known column in `headers`.
    ///
    /// Fails on the first missing required column. Optional columns that are
    /// absent resolve to `None`.
    pub fn resolve<'a, I>(&self, headers: I) -> Result<ColumnIndex, SchemaError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<String> = headers.into_iter().map(normalize_header).collect();
        let find = |name: &str| headers.iter().position(|h| h == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
        };

        let price = match find(&self.price) {
            Some(idx) => idx,
            None => find(&self.money(&self.price))
                .ok_or_else(|| SchemaError::MissingColumn(self.price.clone()))?,
        };

        Ok(ColumnIndex {
            trade_id: require(&self.trade_id)?,
            kind: require(&self.kind)?,
            time: require(&self.time)?,
            price,
            contracts: require(&self.contracts)?,
            signal: find(&self.signal),
            profit: find(&self.money("Profit")),
            profit_percent: find("Profit %"),
            drawdown: find(&self.money("Drawdown")),
            drawdown_percent: find("Drawdown %"),
            run_up: find(&self.money("Run-up")),
            run_up_percent: find("Run-up %"),
            cumulative_profit: find(&self.money("Cum. Profit")),
            cumulative_profit_percent: find("Cum. Profit %"),
        })
    }
}

/// Column positions resolved from a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndex {
    pub trade_id: usize,
    pub kind: usize,
    pub time: usize,
    pub price: usize,
    pub contracts: usize,
    pub signal: Option<usize>,
    pub profit: Option<usize>,
    pub profit_percent: Option<usize>,
    pub drawdown: Option<usize>,
    pub drawdown_percent: Option<usize>,
    pub run_up: Option<usize>,
    pub run_up_percent: Option<usize>,
    pub cumulative_profit: Option<usize>,
    pub cumulative_profit_percent: Option<usize>,
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}').trim().to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Missing required column: {0}")]
    MissingColumn(String),
}
