//! tradetape runner — performance statistics over reduced trade logs.
//!
//! This crate builds on `tradetape-core` to provide:
//! - The metric formula library (pure functions over a trade slice)
//! - The 32-statistic performance summary, overall and per side
//! - Monthly breakdowns, sequential or on the rayon pool
//! - TOML report configuration
//! - Text, CSV and JSON export

pub mod config;
pub mod export;
pub mod metrics;
pub mod monthly;
pub mod summary;

pub use config::{ConfigError, ReportConfig, ReportOptions};
pub use monthly::{monthly_performance, monthly_performance_par, MonthlyRow, MonthlyTable};
pub use summary::{
    performance_summary, performance_summary_long, performance_summary_short, MetricValue,
    PerformanceSummary, Statistic,
};
