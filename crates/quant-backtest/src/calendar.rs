//! Day-count policies and trading calendars.

use chrono::{Datelike, NaiveDate, Weekday};
use quant_core::traits::{TradingCalendar, TRADING_DAYS_PER_YEAR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Calendar days per year.
pub const CALENDAR_DAYS_PER_YEAR: f64 = 365.0;

/// Built-in day-count policy.
///
/// `Calendar` yields `(end - start) + 1` points; `Weekdays` yields one point
/// per Monday-Friday in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayCount {
    #[default]
    Calendar,
    Weekdays,
}

impl TradingCalendar for DayCount {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        match self {
            DayCount::Calendar => true,
            DayCount::Weekdays => is_weekday(date),
        }
    }

    fn periods_per_year(&self) -> f64 {
        match self {
            DayCount::Calendar => CALENDAR_DAYS_PER_YEAR,
            DayCount::Weekdays => TRADING_DAYS_PER_YEAR,
        }
    }

    fn name(&self) -> &str {
        match self {
            DayCount::Calendar => "calendar",
            DayCount::Weekdays => "weekdays",
        }
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "calendar" => Ok(DayCount::Calendar),
            "weekdays" | "trading" => Ok(DayCount::Weekdays),
            other => Err(format!("unknown day count policy: {}", other)),
        }
    }
}

/// Weekdays minus an explicit holiday list.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    name: String,
    holidays: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Create a calendar from a holiday list.
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            name: name.into(),
            holidays: holidays.into_iter().collect(),
        }
    }
}

impl TradingCalendar for HolidayCalendar {
    fn is_trading_day(&self, date: NaiveDate) -> bool {
        is_weekday(date) && !self.holidays.contains(&date)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_calendar_policy_counts_every_day() {
        let days = DayCount::Calendar.trading_days(date(2023, 1, 1), date(2023, 1, 10));
        assert_eq!(days.len(), 10);
        assert_eq!(days.first(), Some(&date(2023, 1, 1)));
        assert_eq!(days.last(), Some(&date(2023, 1, 10)));
    }

    #[test]
    fn test_weekday_policy_skips_weekends() {
        // 2023-01-01 is a Sunday
        let days = DayCount::Weekdays.trading_days(date(2023, 1, 1), date(2023, 1, 10));
        assert_eq!(days.len(), 7);
        assert_eq!(days.first(), Some(&date(2023, 1, 2)));
    }

    #[test]
    fn test_periods_per_year_follow_policy() {
        assert_eq!(DayCount::Calendar.periods_per_year(), 365.0);
        assert_eq!(DayCount::Weekdays.periods_per_year(), 252.0);
    }

    #[test]
    fn test_holiday_calendar() {
        let calendar = HolidayCalendar::new("cn", [date(2023, 1, 2), date(2023, 1, 3)]);
        let days = calendar.trading_days(date(2023, 1, 1), date(2023, 1, 10));
        assert_eq!(days.len(), 5);
        assert_eq!(calendar.name(), "cn");
        assert_eq!(calendar.periods_per_year(), 252.0);
    }

    #[test]
    fn test_parse_day_count() {
        assert_eq!("calendar".parse::<DayCount>(), Ok(DayCount::Calendar));
        assert_eq!("Weekdays".parse::<DayCount>(), Ok(DayCount::Weekdays));
        assert!("monthly".parse::<DayCount>().is_err());
    }
}
