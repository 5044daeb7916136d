//! Donation amount in major currency units.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::DomainError;

/// A strictly positive, finite donation amount.
///
/// The currency is implied by the provider the donation was routed through
/// (USD for card payments, ETB for the regional gateway), so only the
/// magnitude is stored here.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "f64", into = "f64")]
#[schema(value_type = f64, example = 50.0)]
pub struct Amount(f64);

impl Amount {
    /// Creates a new Amount, rejecting zero, negative and non-finite values.
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DomainError::InvalidAmount);
        }
        Ok(Self(value))
    }

    /// Returns the amount in major units.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Returns the amount in minor units (cents), rounded to the nearest integer.
    pub fn minor_units(&self) -> i64 {
        (self.0 * 100.0).round() as i64
    }
}

impl TryFrom<f64> for Amount {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_amount() {
        let amount = Amount::new(50.0).unwrap();
        assert_eq!(amount.value(), 50.0);
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        assert!(matches!(Amount::new(0.0), Err(DomainError::InvalidAmount)));
        assert!(matches!(Amount::new(-5.0), Err(DomainError::InvalidAmount)));
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(Amount::new(f64::NAN).is_err());
        assert!(Amount::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_minor_units_rounding() {
        assert_eq!(Amount::new(50.0).unwrap().minor_units(), 5000);
        assert_eq!(Amount::new(19.99).unwrap().minor_units(), 1999);
        assert_eq!(Amount::new(0.125).unwrap().minor_units(), 13);
        assert_eq!(Amount::new(10.004).unwrap().minor_units(), 1000);
    }

    #[test]
    fn test_deserialize_validates() {
        let amount: Amount = serde_json::from_str("25.5").unwrap();
        assert_eq!(amount.value(), 25.5);
        assert!(serde_json::from_str::<Amount>("-1").is_err());
    }
}
