//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use quant_backtest::DayCount;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quant")]
#[command(author, version, about = "Backtest simulation and performance analytics")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (defaults to the [logging] section, then info)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a synthetic backtest and report its metrics
    Backtest(BacktestArgs),
    /// Validate configuration
    ValidateConfig,
    /// Print the effective configuration as TOML
    ShowConfig,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Flags override the matching configuration keys.
#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Strategy identifier
    #[arg(short, long)]
    pub strategy: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Initial capital
    #[arg(long)]
    pub capital: Option<Decimal>,

    /// Seed for the synthetic return stream
    #[arg(long)]
    pub seed: Option<u64>,

    /// Mean daily return
    #[arg(long)]
    pub drift: Option<f64>,

    /// Daily return standard deviation
    #[arg(long)]
    pub volatility: Option<f64>,

    /// Commission rate on traded notional
    #[arg(long)]
    pub commission: Option<Decimal>,

    /// Slippage rate on traded notional
    #[arg(long)]
    pub slippage: Option<Decimal>,

    /// Day-count policy (calendar, weekdays)
    #[arg(long)]
    pub day_count: Option<DayCount>,

    /// Annual risk-free rate
    #[arg(long)]
    pub risk_free_rate: Option<f64>,

    /// Return periods per year for annualization (defaults to the day-count policy)
    #[arg(long)]
    pub periods_per_year: Option<f64>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the JSON result to a file
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Write the equity curve as CSV
    #[arg(long)]
    pub equity_csv: Option<PathBuf>,

    /// Skip narrative commentary
    #[arg(long)]
    pub no_narrative: bool,
}
