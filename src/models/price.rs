use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// US dollar amount held as whole cents
///
/// Serialized as a plain number of dollars (`539.99`) so catalog files and
/// price responses read naturally, but summed as integers so totals are exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Price {
    cents: i64,
}

impl Price {
    pub const ZERO: Price = Price { cents: 0 };

    /// Create a price from a cent amount. Negative amounts clamp to zero.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents: cents.max(0) }
    }

    /// Convert a dollar amount, rounding to the nearest cent
    ///
    /// Returns `None` for negative, NaN or infinite input.
    pub fn from_dollars(dollars: f64) -> Option<Self> {
        if !dollars.is_finite() || dollars < 0.0 {
            return None;
        }
        let cents = (dollars * 100.0).round();
        if cents > i64::MAX as f64 {
            return None;
        }
        Some(Self { cents: cents as i64 })
    }

    pub fn cents(&self) -> i64 {
        self.cents
    }

    pub fn as_dollars(&self) -> f64 {
        self.cents as f64 / 100.0
    }
}

impl TryFrom<f64> for Price {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Price::from_dollars(value).ok_or_else(|| format!("invalid price: {}", value))
    }
}

impl From<Price> for f64 {
    fn from(price: Price) -> Self {
        price.as_dollars()
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}
