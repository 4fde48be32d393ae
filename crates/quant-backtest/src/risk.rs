//! Tail and downside risk metrics.

use quant_core::types::{MetricValue, RiskMetrics};
use statrs::statistics::{Data, OrderStatistics, Statistics};

use crate::returns::DailyReturns;
use crate::statistics::{AnalyzerConfig, STDEV_EPSILON};

/// Percentile of the return distribution used for VaR.
const VAR_PERCENTILE: usize = 5;

/// Compute risk metrics from daily returns.
///
/// VaR and CVaR are historical, one-day, 95% confidence, reported as
/// non-negative loss fractions. Beta needs `benchmark`, a daily return
/// series paired with `returns` by position.
pub fn risk_metrics(
    returns: &DailyReturns,
    config: &AnalyzerConfig,
    benchmark: Option<&[f64]>,
) -> RiskMetrics {
    let values = returns.values();
    if values.is_empty() {
        return RiskMetrics {
            var_95: MetricValue::NotComputed,
            cvar_95: MetricValue::NotComputed,
            sortino_ratio: 0.0,
            downside_deviation: 0.0,
            beta: MetricValue::NotComputed,
        };
    }

    let mut data = Data::new(values.to_vec());
    let cutoff = data.percentile(VAR_PERCENTILE);
    let tail: Vec<f64> = values.iter().copied().filter(|r| *r <= cutoff).collect();
    let tail_mean = if tail.is_empty() { cutoff } else { tail.mean() };

    let (sortino_ratio, downside_deviation) = sortino(values, config);

    RiskMetrics {
        var_95: as_loss(cutoff),
        cvar_95: as_loss(tail_mean),
        sortino_ratio,
        downside_deviation,
        beta: beta(values, benchmark),
    }
}

/// Sample covariance with the benchmark over the benchmark's sample variance,
/// using the overlapping prefix of both series.
fn beta(values: &[f64], benchmark: Option<&[f64]>) -> MetricValue {
    let Some(benchmark) = benchmark else {
        return MetricValue::NotComputed;
    };
    let n = values.len().min(benchmark.len());
    if n < 2 {
        return MetricValue::NotComputed;
    }
    let (values, benchmark) = (&values[..n], &benchmark[..n]);

    let variance = benchmark.variance();
    if !variance.is_finite() || variance.sqrt() <= STDEV_EPSILON {
        return MetricValue::NotComputed;
    }
    let beta = values.covariance(benchmark) / variance;
    if beta.is_finite() {
        MetricValue::Computed(beta)
    } else {
        MetricValue::NotComputed
    }
}

fn as_loss(ret: f64) -> MetricValue {
    if ret.is_finite() {
        MetricValue::Computed((-ret).max(0.0))
    } else {
        MetricValue::NotComputed
    }
}

/// Annualized Sortino ratio and downside deviation.
///
/// Downside deviation is the root mean square of shortfalls below the
/// periodic risk-free rate, averaged over the shortfall days only.
fn sortino(values: &[f64], config: &AnalyzerConfig) -> (f64, f64) {
    let target = config.periodic_risk_free();
    let shortfalls: Vec<f64> = values
        .iter()
        .filter(|r| **r < target)
        .map(|r| (r - target).powi(2))
        .collect();
    if shortfalls.is_empty() {
        return (0.0, 0.0);
    }

    let downside = shortfalls.mean().sqrt();
    if !downside.is_finite() || downside <= STDEV_EPSILON {
        return (0.0, 0.0);
    }

    let excess = values.mean() - target;
    let ratio = excess / downside * config.annualization_factor();
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    (ratio, downside * config.annualization_factor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quant_core::types::EquityCurve;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn returns(values: &[Decimal]) -> DailyReturns {
        let curve =
            EquityCurve::from_values(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), values).unwrap();
        DailyReturns::from_curve(&curve)
    }

    fn risk(values: &[Decimal]) -> RiskMetrics {
        risk_metrics(&returns(values), &AnalyzerConfig::default(), None)
    }

    #[test]
    fn test_no_returns_not_computed() {
        let risk = risk(&[dec!(100)]);
        assert_eq!(risk.var_95, MetricValue::NotComputed);
        assert_eq!(risk.cvar_95, MetricValue::NotComputed);
        assert_eq!(risk.sortino_ratio, 0.0);
        assert_eq!(risk.beta, MetricValue::NotComputed);
    }

    #[test]
    fn test_beta_needs_benchmark() {
        let risk = risk(&[dec!(100), dec!(102), dec!(99), dec!(104)]);
        assert_eq!(risk.beta, MetricValue::NotComputed);
    }

    #[test]
    fn test_beta_against_benchmark() {
        // returns: +2%, -1%, +3%
        let r = returns(&[dec!(100), dec!(102), dec!(100.98), dec!(104.0094)]);
        let config = AnalyzerConfig::default();

        let same = risk_metrics(&r, &config, Some(r.values()));
        assert!((same.beta.value().unwrap() - 1.0).abs() < 1e-9);

        // Benchmark moving twice as far gives half the sensitivity
        let doubled: Vec<f64> = r.values().iter().map(|v| v * 2.0).collect();
        let half = risk_metrics(&r, &config, Some(doubled.as_slice()));
        assert!((half.beta.value().unwrap() - 0.5).abs() < 1e-9);

        // Longer benchmark is cut to the overlapping days
        let mut longer = r.values().to_vec();
        longer.extend([0.5, -0.5]);
        let cut = risk_metrics(&r, &config, Some(longer.as_slice()));
        assert!((cut.beta.value().unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_flat_or_short_benchmark_not_computed() {
        let r = returns(&[dec!(100), dec!(102), dec!(99), dec!(104)]);
        let config = AnalyzerConfig::default();
        let flat = risk_metrics(&r, &config, Some(&[0.001, 0.001, 0.001][..]));
        assert_eq!(flat.beta, MetricValue::NotComputed);
        let short = risk_metrics(&r, &config, Some(&[0.01][..]));
        assert_eq!(short.beta, MetricValue::NotComputed);
    }

    #[test]
    fn test_rising_curve_has_no_tail_loss() {
        let risk = risk(&[dec!(100), dec!(101), dec!(103), dec!(104)]);
        assert_eq!(risk.var_95, MetricValue::Computed(0.0));
        assert_eq!(risk.cvar_95, MetricValue::Computed(0.0));
        assert_eq!(risk.sortino_ratio, 0.0);
        assert_eq!(risk.downside_deviation, 0.0);
    }

    #[test]
    fn test_cvar_at_least_var() {
        let values: Vec<Decimal> = [100, 98, 101, 95, 97, 102, 90, 93, 96, 99, 94, 100, 97]
            .iter()
            .map(|v| Decimal::from(*v))
            .collect();
        let risk = risk(&values);
        let var = risk.var_95.value().unwrap();
        let cvar = risk.cvar_95.value().unwrap();
        assert!(var > 0.0);
        assert!(cvar >= var);
        assert!(risk.downside_deviation > 0.0);
    }

    #[test]
    fn test_sortino_sign_follows_mean() {
        let losing = risk(&[dec!(100), dec!(95), dec!(96), dec!(90)]);
        assert!(losing.sortino_ratio < 0.0);

        let winning = risk(&[dec!(100), dec!(110), dec!(108), dec!(120)]);
        assert!(winning.sortino_ratio > 0.0);
    }
}
