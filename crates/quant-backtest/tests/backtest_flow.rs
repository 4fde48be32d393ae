//! End-to-end runs through the public API.

use chrono::NaiveDate;
use quant_backtest::{
    AnalyzerConfig, BacktestReport, BacktestRunner, DayCount, EquityCurveSimulator,
    PerformanceAnalyzer, StrategyReturns, SyntheticReturns,
};
use quant_core::types::{BacktestConfig, MetricValue, Side, TradeRecord};
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_synthetic_run_is_reproducible() {
    let config = BacktestConfig::new("demo", dec!(100000), date(2023, 1, 1), date(2023, 12, 31));
    let runner = BacktestRunner::default();

    let a = runner
        .run(&config, &mut SyntheticReturns::demo(2024).unwrap(), None)
        .unwrap();
    let b = runner
        .run(&config, &mut SyntheticReturns::demo(2024).unwrap(), None)
        .unwrap();

    assert_eq!(a.equity_curve, b.equity_curve);
    assert_eq!(a.metrics, b.metrics);
    assert_eq!(a.risk, b.risk);
    assert_ne!(a.run_id, b.run_id);
    assert_eq!(a.equity_curve.len(), 365);
}

#[test]
fn test_strategy_run_with_trade_log() {
    let prices = [10.0, 10.5, 10.2, 10.8, 11.0, 10.6];
    let exposures = [1.0, 1.0, 0.0, 0.5, 0.5];
    let mut source = StrategyReturns::from_exposures("ma_crossover", &prices, &exposures).unwrap();

    let config = BacktestConfig::new("ma_crossover", dec!(100000), date(2023, 3, 1), date(2023, 3, 6))
        .with_commission_rate(dec!(0.0003))
        .with_slippage_rate(dec!(0.0005));

    let trades = vec![
        TradeRecord::new(date(2023, 3, 1), "600036", Side::Buy, dec!(10), dec!(10000)),
        TradeRecord::new(date(2023, 3, 3), "600036", Side::Sell, dec!(10.2), dec!(10000))
            .with_pnl(dec!(2000)),
        TradeRecord::new(date(2023, 3, 4), "600036", Side::Buy, dec!(10.8), dec!(4600)),
        TradeRecord::new(date(2023, 3, 6), "600036", Side::Sell, dec!(10.6), dec!(4600))
            .with_pnl(dec!(-920)),
    ];

    let runner = BacktestRunner::default();
    let result = runner.run(&config, &mut source, Some(&trades)).unwrap();

    assert_eq!(result.equity_curve.len(), 6);
    assert_eq!(result.metrics.trades, 4);
    assert_eq!(result.metrics.win_rate, MetricValue::Computed(0.25));
    let stats = result.trade_stats.as_ref().unwrap();
    assert_eq!(stats.winning_trades, 1);
    assert_eq!(stats.losing_trades, 1);

    // Costs make the run strictly worse than the frictionless one
    let mut frictionless = StrategyReturns::from_exposures("ma_crossover", &prices, &exposures).unwrap();
    let free_config = BacktestConfig::new("ma_crossover", dec!(100000), date(2023, 3, 1), date(2023, 3, 6));
    let free = runner.run(&free_config, &mut frictionless, None).unwrap();
    assert!(result.final_equity() < free.final_equity());
}

#[test]
fn test_weekday_runner() {
    let simulator = EquityCurveSimulator::with_calendar(DayCount::Weekdays);
    let analyzer = PerformanceAnalyzer::new(AnalyzerConfig {
        risk_free_rate: 0.02,
        periods_per_year: Some(252.0),
    })
    .unwrap();
    let runner = BacktestRunner::new(simulator, analyzer);

    let config = BacktestConfig::new("demo", dec!(50000), date(2023, 1, 1), date(2023, 1, 31));
    let result = runner
        .run(&config, &mut SyntheticReturns::demo(1).unwrap(), None)
        .unwrap();
    assert_eq!(result.equity_curve.len(), 22);
    assert_eq!(runner.analyzer().config().risk_free_rate, 0.02);
}

#[test]
fn test_concurrent_runs_are_independent() {
    let config = BacktestConfig::new("demo", dec!(100000), date(2023, 1, 1), date(2023, 6, 30));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = config.clone();
            std::thread::spawn(move || {
                BacktestRunner::default()
                    .run(&config, &mut SyntheticReturns::demo(7).unwrap(), None)
                    .unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for result in &results[1..] {
        assert_eq!(result.equity_curve, results[0].equity_curve);
        assert_eq!(result.metrics, results[0].metrics);
    }
}

#[test]
fn test_report_outputs() {
    let config = BacktestConfig::new("demo", dec!(100000), date(2023, 1, 1), date(2023, 1, 10));
    let result = BacktestRunner::default()
        .run(&config, &mut SyntheticReturns::demo(3).unwrap(), None)
        .unwrap();
    let report = BacktestReport::new(&result);

    assert!(report.summary().contains("BACKTEST REPORT"));
    assert_eq!(report.equity_to_csv().unwrap().lines().count(), 11);
    assert!(report.to_json().unwrap().contains("\"strategy_id\": \"demo\""));
}
