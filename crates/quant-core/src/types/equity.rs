//! Equity curve types.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BacktestError, EngineResult};

/// Portfolio value on a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

impl EquityPoint {
    /// Create a new equity point.
    pub fn new(date: NaiveDate, value: Decimal) -> Self {
        Self { date, value }
    }
}

/// Non-empty, strictly date-ordered series of equity points.
///
/// Values may be zero or negative (total capital loss); only the ordering
/// and non-emptiness are enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<EquityPoint>", into = "Vec<EquityPoint>")]
pub struct EquityCurve {
    points: Vec<EquityPoint>,
}

impl EquityCurve {
    /// Create a curve from points, validating order.
    pub fn new(points: Vec<EquityPoint>) -> EngineResult<Self> {
        if points.is_empty() {
            return Err(BacktestError::EmptyCurve);
        }
        if let Some(index) = points
            .windows(2)
            .position(|w| w[1].date <= w[0].date)
        {
            return Err(BacktestError::UnorderedCurve { index: index + 1 });
        }
        Ok(Self { points })
    }

    /// Create a curve of consecutive calendar days starting at `start`.
    pub fn from_values(start: NaiveDate, values: &[Decimal]) -> EngineResult<Self> {
        let points = values
            .iter()
            .enumerate()
            .map(|(i, value)| {
                start
                    .checked_add_days(Days::new(i as u64))
                    .map(|date| EquityPoint::new(date, *value))
                    .ok_or_else(|| {
                        BacktestError::InvalidParameter(format!("date overflow at index {}", i))
                    })
            })
            .collect::<EngineResult<Vec<_>>>()?;
        Self::new(points)
    }

    /// All points, oldest first.
    pub fn points(&self) -> &[EquityPoint] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First point.
    pub fn first(&self) -> &EquityPoint {
        &self.points[0]
    }

    /// Last point.
    pub fn last(&self) -> &EquityPoint {
        &self.points[self.points.len() - 1]
    }

    /// Iterate over values.
    pub fn values(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Inclusive day count from the first to the last point.
    pub fn span_days(&self) -> i64 {
        (self.last().date - self.first().date).num_days() + 1
    }
}

impl TryFrom<Vec<EquityPoint>> for EquityCurve {
    type Error = BacktestError;

    fn try_from(points: Vec<EquityPoint>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<EquityCurve> for Vec<EquityPoint> {
    fn from(curve: EquityCurve) -> Self {
        curve.points
    }
}
