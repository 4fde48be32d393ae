//! Backtest command implementation.

use anyhow::{Context, Result};
use quant_backtest::{
    BacktestReport, BacktestRunner, EquityCurveSimulator, PerformanceAnalyzer, SyntheticReturns,
};
use quant_config::{load_config, AppConfig, NarrativeProvider, NarrativeSettings};
use quant_core::error::EngineResult;
use quant_core::traits::Narrator;
use quant_narrative::{
    attach_narratives, GeminiConfig, GeminiNarrator, TemplateNarrator, UnavailableNarrator,
};
use std::path::Path;
use tracing::{info, warn};

use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, config_path: &Path) -> Result<()> {
    let mut config = if config_path.exists() {
        load_config(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?
    } else {
        warn!("Config file {:?} not found, using defaults", config_path);
        AppConfig::default()
    };
    apply_overrides(&mut config, &args);
    config.validate().context("Invalid backtest settings")?;

    let backtest_config = config.backtest.to_backtest_config();
    let settings = config.backtest.clone();
    let analysis = config.analysis;

    info!(
        strategy = %backtest_config.strategy_id,
        start = %backtest_config.start_date,
        end = %backtest_config.end_date,
        day_count = %settings.day_count,
        seed = settings.seed,
        "Running backtest"
    );

    // Simulation and analysis are CPU-bound; keep them off the runtime threads
    let result = tokio::task::spawn_blocking(move || -> EngineResult<_> {
        let analyzer = PerformanceAnalyzer::new(analysis)?;
        let runner =
            BacktestRunner::new(EquityCurveSimulator::with_calendar(settings.day_count), analyzer);
        let mut source =
            SyntheticReturns::new(settings.seed, settings.drift, settings.volatility)?;
        runner.run(&backtest_config, &mut source, None)
    })
    .await
    .context("Backtest task panicked")?
    .context("Backtest failed")?;

    let result = if config.narrative.enabled && !args.no_narrative {
        let narrator = build_narrator(&config.narrative);
        info!(narrator = narrator.name(), "Requesting commentary");
        attach_narratives(result, narrator.as_ref(), config.narrative.timeout()).await
    } else {
        result
    };

    let report = BacktestReport::new(&result);
    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        std::fs::write(save_path, report.to_json()?)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    if let Some(csv_path) = &args.equity_csv {
        report
            .save_equity_csv(csv_path)
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
        info!("Equity curve saved to {:?}", csv_path);
    }

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, args: &BacktestArgs) {
    let backtest = &mut config.backtest;
    if let Some(strategy) = &args.strategy {
        backtest.strategy_id = strategy.clone();
    }
    if let Some(start) = args.start {
        backtest.start_date = start;
    }
    if let Some(end) = args.end {
        backtest.end_date = end;
    }
    if let Some(capital) = args.capital {
        backtest.initial_capital = capital;
    }
    if let Some(seed) = args.seed {
        backtest.seed = seed;
    }
    if let Some(drift) = args.drift {
        backtest.drift = drift;
    }
    if let Some(volatility) = args.volatility {
        backtest.volatility = volatility;
    }
    if let Some(commission) = args.commission {
        backtest.commission_rate = commission;
    }
    if let Some(slippage) = args.slippage {
        backtest.slippage_rate = slippage;
    }
    if let Some(day_count) = args.day_count {
        backtest.day_count = day_count;
    }
    if let Some(rate) = args.risk_free_rate {
        config.analysis.risk_free_rate = rate;
    }
    if let Some(periods) = args.periods_per_year {
        config.analysis.periods_per_year = Some(periods);
    }
}

/// Build the configured narrator.
///
/// A provider that cannot be built degrades to one that always fails, so the
/// run still completes with fallback commentary.
fn build_narrator(settings: &NarrativeSettings) -> Box<dyn Narrator> {
    match settings.provider {
        NarrativeProvider::Template => Box::new(TemplateNarrator::new()),
        NarrativeProvider::Gemini => {
            let narrator = GeminiConfig::from_env(&settings.api_key_env).and_then(|config| {
                GeminiNarrator::new(
                    config
                        .with_model(settings.model.clone())
                        .with_base_url(settings.base_url.clone())
                        .with_timeout(settings.timeout()),
                )
            });
            match narrator {
                Ok(narrator) => Box::new(narrator),
                Err(e) => {
                    warn!(error = %e, "Gemini narrator unavailable");
                    Box::new(UnavailableNarrator::new(e.to_string()))
                }
            }
        }
    }
}
