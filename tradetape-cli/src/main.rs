//! tradetape CLI — performance reports from a TradingView trade-log export.
//!
//! Commands:
//! - `summary` — one performance summary over all, long or short trades
//! - `monthly` — one summary per entry month, optionally split by side

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tradetape_core::domain::Trade;
use tradetape_core::TradeLog;
use tradetape_runner::export::{
    export_monthly_csv, export_monthly_json, export_summary_csv, export_summary_json,
    render_monthly_text, render_summary_text, write_report,
};
use tradetape_runner::{
    monthly_performance, monthly_performance_par, performance_summary, performance_summary_long,
    performance_summary_short, ReportConfig,
};

#[derive(Parser)]
#[command(
    name = "tradetape",
    about = "tradetape — performance statistics for TradingView trade logs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize every trade in the export.
    Summary {
        /// Trade-log CSV exported from the strategy tester.
        file: PathBuf,

        /// Which trades to summarize.
        #[arg(long, value_enum, default_value_t = Side::All)]
        side: Side,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// Summarize each calendar month of entry time.
    Monthly {
        /// Trade-log CSV exported from the strategy tester.
        file: PathBuf,

        /// Add Long and Short rows under each month.
        #[arg(long, default_value_t = false)]
        separate_long_short: bool,

        /// Summarize months on the thread pool.
        #[arg(long, default_value_t = false)]
        parallel: bool,

        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Path to a TOML report config.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Quote currency suffix of the money columns (overrides the config).
    #[arg(long)]
    currency: Option<String>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Side {
    All,
    Long,
    Short,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Csv,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { file, side, common } => run_summary(&file, side, &common),
        Commands::Monthly {
            file,
            separate_long_short,
            parallel,
            common,
        } => run_monthly(&file, separate_long_short, parallel, &common),
    }
}

fn run_summary(file: &Path, side: Side, common: &CommonArgs) -> Result<()> {
    let config = load_config(common)?;
    let log = load_log(file, &config)?;

    let (summary, period) = match side {
        Side::All => (performance_summary(log.trades()), "All"),
        Side::Long => (performance_summary_long(log.trades()), "Long"),
        Side::Short => (performance_summary_short(log.trades()), "Short"),
    };

    let report = match common.format {
        Format::Text => render_summary_text(&summary, config.report.precision),
        Format::Csv => export_summary_csv(&summary, period)?,
        Format::Json => export_summary_json(&summary)?,
    };
    emit(common.output.as_deref(), &report)
}

fn run_monthly(
    file: &Path,
    separate_long_short: bool,
    parallel: bool,
    common: &CommonArgs,
) -> Result<()> {
    let mut config = load_config(common)?;
    config.report.separate_long_short |= separate_long_short;
    config.report.parallel |= parallel;

    let log = load_log(file, &config)?;
    let trades: &[Trade] = log.trades();
    let table = if config.report.parallel {
        monthly_performance_par(trades, config.report.separate_long_short)
    } else {
        monthly_performance(trades, config.report.separate_long_short)
    };
    tracing::info!(rows = table.len(), "monthly table built");

    let report = match common.format {
        Format::Text => render_monthly_text(&table, config.report.precision),
        Format::Csv => export_monthly_csv(&table)?,
        Format::Json => export_monthly_json(&table)?,
    };
    emit(common.output.as_deref(), &report)
}

/// Config file (if any) with command-line overrides applied.
fn load_config(common: &CommonArgs) -> Result<ReportConfig> {
    let config = match &common.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    };
    match &common.currency {
        Some(currency) => Ok(config.with_currency(currency.as_str())?),
        None => Ok(config),
    }
}

fn load_log(file: &Path, config: &ReportConfig) -> Result<TradeLog> {
    let log = TradeLog::from_csv_path(file, &config.columns)
        .with_context(|| format!("failed to load trade log {}", file.display()))?;

    let malformed = log.malformed().count();
    if malformed > 0 {
        tracing::warn!(malformed, "skipped malformed trade ids");
    }
    tracing::debug!(dropped = log.dropped().len(), "trade ids without a trade");
    tracing::info!(path = %file.display(), trades = log.len(), "loaded trade log");
    Ok(log)
}

fn emit(output: Option<&Path>, report: &str) -> Result<()> {
    match output {
        Some(path) => write_report(path, report),
        None => {
            print!("{report}");
            Ok(())
        }
    }
}
