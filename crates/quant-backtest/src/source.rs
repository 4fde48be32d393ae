//! Return sources feeding the simulator.

use chrono::NaiveDate;
use quant_core::error::{BacktestError, EngineResult};
use quant_core::traits::{DailyStep, ReturnSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Seeded Gaussian daily returns for synthetic and demo runs.
///
/// Carries no explicit trades, so the simulator applies no costs; the
/// upward bias lives in the drift.
#[derive(Debug, Clone)]
pub struct SyntheticReturns {
    seed: u64,
    drift: f64,
    volatility: f64,
    rng: StdRng,
    dist: Normal<f64>,
}

impl SyntheticReturns {
    /// Mean daily return of the demo generator.
    pub const DEFAULT_DRIFT: f64 = 0.0004;
    /// Daily standard deviation of the demo generator.
    pub const DEFAULT_VOLATILITY: f64 = 0.0058;

    /// Create a generator with the given seed, daily drift and daily volatility.
    pub fn new(seed: u64, drift: f64, volatility: f64) -> EngineResult<Self> {
        if !drift.is_finite() {
            return Err(BacktestError::InvalidParameter(format!(
                "drift must be finite, got {}",
                drift
            )));
        }
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(BacktestError::InvalidParameter(format!(
                "volatility must be finite and non-negative, got {}",
                volatility
            )));
        }
        let dist = Normal::new(drift, volatility).map_err(|e| {
            BacktestError::InvalidParameter(format!("volatility {}: {}", volatility, e))
        })?;

        Ok(Self {
            seed,
            drift,
            volatility,
            rng: StdRng::seed_from_u64(seed),
            dist,
        })
    }

    /// Create the demo generator with the default drift and volatility.
    pub fn demo(seed: u64) -> EngineResult<Self> {
        Self::new(seed, Self::DEFAULT_DRIFT, Self::DEFAULT_VOLATILITY)
    }

    /// Seed in use.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Daily drift.
    pub fn drift(&self) -> f64 {
        self.drift
    }

    /// Daily volatility.
    pub fn volatility(&self) -> f64 {
        self.volatility
    }
}

impl ReturnSource for SyntheticReturns {
    fn next_step(&mut self, _date: NaiveDate) -> EngineResult<DailyStep> {
        Ok(DailyStep::hold(self.dist.sample(&mut self.rng)))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Deterministic strategy-driven daily steps.
#[derive(Debug, Clone)]
pub struct StrategyReturns {
    name: String,
    steps: Vec<DailyStep>,
    cursor: usize,
}

impl StrategyReturns {
    /// Create a source from precomputed steps.
    pub fn new(name: impl Into<String>, steps: Vec<DailyStep>) -> Self {
        Self {
            name: name.into(),
            steps,
            cursor: 0,
        }
    }

    /// Create a source from plain daily returns without trading activity.
    pub fn from_returns(name: impl Into<String>, returns: &[f64]) -> Self {
        Self::new(name, returns.iter().map(|r| DailyStep::hold(*r)).collect())
    }

    /// Derive steps from a price series and the exposure held over each step.
    ///
    /// `prices` has one entry per equity point; `exposures[k]` is the fraction
    /// of equity held long between `prices[k]` and `prices[k + 1]` (negative
    /// for short). The position is flat before the first step, so the first
    /// step's turnover is the size of the initial entry.
    pub fn from_exposures(
        name: impl Into<String>,
        prices: &[f64],
        exposures: &[f64],
    ) -> EngineResult<Self> {
        if prices.len() < 2 {
            return Err(BacktestError::InvalidParameter(
                "need at least two prices".to_string(),
            ));
        }
        if exposures.len() != prices.len() - 1 {
            return Err(BacktestError::InvalidParameter(format!(
                "expected {} exposures for {} prices, got {}",
                prices.len() - 1,
                prices.len(),
                exposures.len()
            )));
        }
        if let Some(p) = prices.iter().find(|p| !p.is_finite() || **p <= 0.0) {
            return Err(BacktestError::InvalidParameter(format!(
                "prices must be positive and finite, got {}",
                p
            )));
        }
        if let Some(e) = exposures.iter().find(|e| !e.is_finite()) {
            return Err(BacktestError::InvalidParameter(format!(
                "exposures must be finite, got {}",
                e
            )));
        }

        let mut previous = 0.0;
        let steps = prices
            .windows(2)
            .zip(exposures)
            .map(|(w, &exposure)| {
                let price_return = w[1] / w[0] - 1.0;
                let step = DailyStep::new(exposure * price_return, (exposure - previous).abs());
                previous = exposure;
                step
            })
            .collect();

        Ok(Self::new(name, steps))
    }

    /// Total number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the source holds no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl ReturnSource for StrategyReturns {
    fn next_step(&mut self, date: NaiveDate) -> EngineResult<DailyStep> {
        let step = self
            .steps
            .get(self.cursor)
            .copied()
            .ok_or(BacktestError::SourceExhausted {
                required: self.cursor + 1,
                available: self.steps.len(),
            })?;
        if !step.ret.is_finite() {
            return Err(BacktestError::InvalidReturn {
                date,
                reason: format!("return {} is not finite", step.ret),
            });
        }
        self.cursor += 1;
        Ok(step)
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.steps.len() - self.cursor)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
