//! Validate configuration command.

use anyhow::Result;
use quant_config::load_config;
use quant_core::traits::TradingCalendar;
use std::path::Path;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    };

    if let Err(e) = config.validate() {
        println!("Configuration error: {}", e);
        return Err(e.into());
    }

    let backtest = &config.backtest;
    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!("Strategy: {}", backtest.strategy_id);
    println!("Period: {} to {} ({})", backtest.start_date, backtest.end_date, backtest.day_count);
    println!("Initial capital: {}", backtest.initial_capital);
    println!(
        "Costs: commission {} / slippage {}",
        backtest.commission_rate, backtest.slippage_rate
    );
    println!("Risk-free rate: {}", config.analysis.risk_free_rate);
    match config.analysis.periods_per_year {
        Some(periods) => println!("Periods per year: {}", periods),
        None => println!(
            "Periods per year: {} (from day count)",
            backtest.day_count.periods_per_year()
        ),
    }
    println!(
        "Narrative: {} ({:?})",
        if config.narrative.enabled { "enabled" } else { "disabled" },
        config.narrative.provider
    );

    Ok(())
}
