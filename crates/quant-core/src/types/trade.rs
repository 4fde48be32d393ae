//! Trade log types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Trade side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// A discrete trade event.
///
/// Opening trades usually carry no P&L; closing trades carry the realized
/// P&L of the closed quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub symbol: String,
    pub side: Side,
    pub price: Decimal,
    pub quantity: Decimal,
    pub pnl: Option<Decimal>,
}

impl TradeRecord {
    /// Create a trade without realized P&L.
    pub fn new(
        date: NaiveDate,
        symbol: impl Into<String>,
        side: Side,
        price: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            symbol: symbol.into(),
            side,
            price,
            quantity,
            pnl: None,
        }
    }

    /// Attach realized P&L.
    pub fn with_pnl(mut self, pnl: Decimal) -> Self {
        self.pnl = Some(pnl);
        self
    }

    /// Whether the trade realized a positive P&L.
    pub fn is_win(&self) -> bool {
        self.pnl.is_some_and(|pnl| pnl > Decimal::ZERO)
    }
}
