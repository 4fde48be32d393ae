//! Trading calendar trait definition.

use chrono::NaiveDate;

/// Exchange trading days per year.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Decides which days produce an equity point.
pub trait TradingCalendar: Send + Sync {
    /// Whether `date` is a trading day.
    fn is_trading_day(&self, date: NaiveDate) -> bool;

    /// All trading days in `[start, end]`, oldest first.
    fn trading_days(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        start
            .iter_days()
            .take_while(|d| *d <= end)
            .filter(|d| self.is_trading_day(*d))
            .collect()
    }

    /// Return periods per year on this calendar, used to annualize daily
    /// statistics.
    fn periods_per_year(&self) -> f64 {
        TRADING_DAYS_PER_YEAR
    }

    /// Get the calendar name.
    fn name(&self) -> &str;
}
