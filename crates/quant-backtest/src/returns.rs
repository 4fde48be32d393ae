//! Daily return series derived from an equity curve.

use num_traits::ToPrimitive;
use quant_core::types::EquityCurve;
use rust_decimal::Decimal;

/// Day-over-day returns with undefined days removed.
///
/// A return is undefined when the previous value is zero (or the ratio
/// cannot be represented); such days are counted and excluded so that no
/// NaN or infinity reaches the statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReturns {
    values: Vec<f64>,
    excluded: usize,
}

impl DailyReturns {
    /// Compute returns for every consecutive pair of points.
    pub fn from_curve(curve: &EquityCurve) -> Self {
        let mut values = Vec::with_capacity(curve.len().saturating_sub(1));
        let mut excluded = 0;

        for w in curve.points().windows(2) {
            match daily_return(w[0].value, w[1].value) {
                Some(r) => values.push(r),
                None => excluded += 1,
            }
        }

        Self { values, excluded }
    }

    /// Usable returns, oldest first.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of days excluded as undefined.
    pub fn excluded(&self) -> usize {
        self.excluded
    }

    /// Number of usable returns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no usable returns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn daily_return(previous: Decimal, current: Decimal) -> Option<f64> {
    if previous.is_zero() {
        return None;
    }
    current
        .checked_sub(previous)?
        .checked_div(previous)?
        .to_f64()
        .filter(|r| r.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn curve(values: &[Decimal]) -> EquityCurve {
        EquityCurve::from_values(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), values).unwrap()
    }

    #[test]
    fn test_returns() {
        let returns = DailyReturns::from_curve(&curve(&[dec!(100), dec!(110), dec!(99)]));
        assert_eq!(returns.len(), 2);
        assert_eq!(returns.excluded(), 0);
        assert!((returns.values()[0] - 0.10).abs() < 1e-12);
        assert!((returns.values()[1] + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_zero_previous_value_excluded() {
        let returns = DailyReturns::from_curve(&curve(&[dec!(100), dec!(0), dec!(50)]));
        assert_eq!(returns.values(), &[-1.0]);
        assert_eq!(returns.excluded(), 1);
    }

    #[test]
    fn test_single_point_has_no_returns() {
        let returns = DailyReturns::from_curve(&curve(&[dec!(100)]));
        assert!(returns.is_empty());
    }
}
