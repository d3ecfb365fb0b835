//! Gold-piece prices with two decimal places.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Seven digits, two of them after the decimal point.
const MAX_CENTS: u32 = 9_999_999;

/// A non-negative price in gold pieces, held as whole hundredths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct GoldCost(u32);

impl GoldCost {
    pub const ZERO: GoldCost = GoldCost(0);
    pub const MAX: GoldCost = GoldCost(MAX_CENTS);

    /// Parse a gold-piece amount, rounding to the nearest hundredth.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for negative, non-finite or
    /// over-sized amounts.
    pub fn from_gp(gp: f64) -> Result<Self, DomainError> {
        if !gp.is_finite() {
            return Err(DomainError::validation("Cost must be a finite number"));
        }
        if gp < 0.0 {
            return Err(DomainError::validation("Cost cannot be negative"));
        }
        let cents = (gp * 100.0).round();
        if cents > f64::from(MAX_CENTS) {
            return Err(DomainError::validation(format!(
                "Cost cannot exceed {}",
                GoldCost::MAX
            )));
        }
        Ok(Self(cents as u32))
    }

    /// Build from hundredths of a gold piece.
    pub fn from_cents(cents: i64) -> Result<Self, DomainError> {
        let cents = u32::try_from(cents)
            .ok()
            .filter(|c| *c <= MAX_CENTS)
            .ok_or_else(|| {
                DomainError::validation(format!("Cost out of range: {} hundredths", cents))
            })?;
        Ok(Self(cents))
    }

    pub fn cents(&self) -> i64 {
        i64::from(self.0)
    }

    pub fn as_gp(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for GoldCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl TryFrom<f64> for GoldCost {
    type Error = DomainError;

    fn try_from(gp: f64) -> Result<Self, Self::Error> {
        Self::from_gp(gp)
    }
}

impl From<GoldCost> for f64 {
    fn from(cost: GoldCost) -> f64 {
        cost.as_gp()
    }
}
