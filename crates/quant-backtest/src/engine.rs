//! Backtest runner composing simulation and analysis.

use quant_core::error::EngineResult;
use quant_core::traits::ReturnSource;
use quant_core::types::{BacktestConfig, BacktestResult, TradeRecord};
use tracing::info;
use uuid::Uuid;

use crate::simulator::EquityCurveSimulator;
use crate::statistics::{trade_stats, PerformanceAnalyzer};

/// Runs one backtest: simulate, then analyze.
///
/// Synchronous and free of shared state; a caller wanting a responsive UI
/// offloads `run` onto a worker thread.
#[derive(Default)]
pub struct BacktestRunner {
    simulator: EquityCurveSimulator,
    analyzer: PerformanceAnalyzer,
    benchmark: Option<Vec<f64>>,
}

impl BacktestRunner {
    /// Create a new runner.
    pub fn new(simulator: EquityCurveSimulator, analyzer: PerformanceAnalyzer) -> Self {
        Self {
            simulator,
            analyzer,
            benchmark: None,
        }
    }

    /// Measure beta against a daily benchmark return series.
    pub fn with_benchmark(mut self, returns: Vec<f64>) -> Self {
        self.benchmark = Some(returns);
        self
    }

    /// Analyzer in use.
    pub fn analyzer(&self) -> &PerformanceAnalyzer {
        &self.analyzer
    }

    /// Run a backtest.
    ///
    /// Fails fast on any configuration or simulation error; the returned
    /// result carries no narrative.
    pub fn run(
        &self,
        config: &BacktestConfig,
        source: &mut dyn ReturnSource,
        trades: Option<&[TradeRecord]>,
    ) -> EngineResult<BacktestResult> {
        let run_id = Uuid::new_v4();
        info!(%run_id, strategy = %config.strategy_id, "Starting backtest");

        // Annualize on the same day count the curve was built with
        let analyzer = self.analyzer.for_calendar(self.simulator.calendar());

        let equity_curve = self.simulator.simulate(config, source)?;
        let metrics = analyzer.analyze(&equity_curve, config.initial_capital, trades)?;
        let risk = analyzer.analyze_risk(&equity_curve, self.benchmark.as_deref());

        info!(
            %run_id,
            points = equity_curve.len(),
            total_return = metrics.total_return,
            max_drawdown = metrics.max_drawdown,
            sharpe = metrics.sharpe_ratio,
            "Backtest complete"
        );

        Ok(BacktestResult {
            run_id,
            config: config.clone(),
            equity_curve,
            metrics,
            risk,
            trade_stats: trades.and_then(trade_stats),
            narrative: None,
            risk_narrative: None,
        })
    }
}
