//! Backtest report generation.

use quant_core::types::BacktestResult;
use std::path::Path;

/// Read-only presentation of a result.
pub struct BacktestReport<'a> {
    result: &'a BacktestResult,
}

impl<'a> BacktestReport<'a> {
    /// Wrap a result.
    pub fn new(result: &'a BacktestResult) -> Self {
        Self { result }
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let r = self.result;
        let m = &r.metrics;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                     BACKTEST REPORT                        \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("RUN\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Run ID:              {}\n", r.run_id));
        s.push_str(&format!("  Strategy:            {}\n", r.config.strategy_id));
        s.push_str(&format!(
            "  Period:              {} to {}\n",
            r.config.start_date, r.config.end_date
        ));
        s.push_str(&format!(
            "  Equity Points:       {}\n",
            r.equity_curve.len()
        ));
        s.push('\n');

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Initial Capital:     ${:.2}\n",
            r.config.initial_capital
        ));
        s.push_str(&format!("  Final Equity:        ${:.2}\n", r.final_equity()));
        s.push_str(&format!(
            "  Total Return:        {:.2}%\n",
            m.total_return * 100.0
        ));
        s.push_str(&format!(
            "  Annualized Return:   {}\n",
            m.annualized_return.display_pct()
        ));
        s.push_str(&format!(
            "  Max Drawdown:        {:.2}%\n",
            m.max_drawdown * 100.0
        ));
        s.push('\n');

        s.push_str("RISK METRICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Sharpe Ratio:        {:.2}\n", m.sharpe_ratio));
        s.push_str(&format!(
            "  Volatility:          {:.2}%\n",
            m.volatility * 100.0
        ));
        s.push_str(&format!(
            "  Sortino Ratio:       {:.2}\n",
            r.risk.sortino_ratio
        ));
        s.push_str(&format!(
            "  VaR (95%, 1d):       {}\n",
            r.risk.var_95.display_pct()
        ));
        s.push_str(&format!(
            "  CVaR (95%, 1d):      {}\n",
            r.risk.cvar_95.display_pct()
        ));
        s.push_str(&format!(
            "  Beta:                {}\n",
            r.risk.beta.display_ratio()
        ));
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total Trades:        {}\n", m.trades));
        s.push_str(&format!(
            "  Win Rate:            {}\n",
            m.win_rate.display_pct()
        ));
        if let Some(stats) = &r.trade_stats {
            s.push_str(&format!(
                "  Winning Trades:      {}\n",
                stats.winning_trades
            ));
            s.push_str(&format!("  Losing Trades:       {}\n", stats.losing_trades));
            s.push_str(&format!(
                "  Breakeven Trades:    {}\n",
                stats.breakeven_trades
            ));
            s.push_str(&format!("  Avg Win:             ${:.2}\n", stats.avg_win));
            s.push_str(&format!("  Avg Loss:            ${:.2}\n", stats.avg_loss));
            s.push_str(&format!(
                "  Profit Factor:       {}\n",
                stats.profit_factor
            ));
        }
        s.push('\n');

        if r.narrative.is_some() || r.risk_narrative.is_some() {
            s.push_str("COMMENTARY\n");
            s.push_str("───────────────────────────────────────────────────────────\n");
            if let Some(narrative) = &r.narrative {
                s.push_str(&format!("  {}\n", narrative.text));
            }
            if let Some(narrative) = &r.risk_narrative {
                s.push_str(&format!("  {}\n", narrative.text));
            }
            s.push('\n');
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self.result)
    }

    /// Export the equity curve as CSV.
    pub fn equity_to_csv(&self) -> Result<String, csv::Error> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        self.write_equity(&mut writer)?;
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write the equity curve as CSV to a file.
    pub fn save_equity_csv(&self, path: &Path) -> Result<(), csv::Error> {
        let mut writer = csv::Writer::from_path(path)?;
        self.write_equity(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_equity<W: std::io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), csv::Error> {
        writer.write_record(["date", "equity"])?;
        for point in self.result.equity_curve.points() {
            writer.write_record([point.date.to_string(), point.value.to_string()])?;
        }
        Ok(())
    }
}
