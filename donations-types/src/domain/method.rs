//! Supported payment methods.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DomainError;

/// The payment providers a donation can be routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card payments via Stripe payment intents
    Stripe,
    /// Regional gateway (Chapa hosted checkout)
    Chapa,
    /// Mobile money, confirmed manually
    Telebirr,
    /// Bank transfer, confirmed manually
    Manual,
}

impl PaymentMethod {
    /// Every supported method, in dispatch order.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Stripe,
        PaymentMethod::Chapa,
        PaymentMethod::Telebirr,
        PaymentMethod::Manual,
    ];

    /// Returns the lowercase tag stored with donations.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Stripe => "stripe",
            PaymentMethod::Chapa => "chapa",
            PaymentMethod::Telebirr => "telebirr",
            PaymentMethod::Manual => "manual",
        }
    }

    /// Returns the human-facing provider name.
    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Stripe => "Stripe",
            PaymentMethod::Chapa => "Chapa",
            PaymentMethod::Telebirr => "Telebirr",
            PaymentMethod::Manual => "Manual",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = DomainError;

    /// Case-insensitive; `bank` is an alias for `manual`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stripe" => Ok(PaymentMethod::Stripe),
            "chapa" => Ok(PaymentMethod::Chapa),
            "telebirr" => Ok(PaymentMethod::Telebirr),
            "manual" | "bank" => Ok(PaymentMethod::Manual),
            _ => Err(DomainError::UnsupportedMethod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("STRIPE".parse::<PaymentMethod>().unwrap(), PaymentMethod::Stripe);
        assert_eq!("Chapa".parse::<PaymentMethod>().unwrap(), PaymentMethod::Chapa);
        assert_eq!(" telebirr ".parse::<PaymentMethod>().unwrap(), PaymentMethod::Telebirr);
    }

    #[test]
    fn test_bank_is_manual() {
        assert_eq!("bank".parse::<PaymentMethod>().unwrap(), PaymentMethod::Manual);
        assert_eq!("MANUAL".parse::<PaymentMethod>().unwrap(), PaymentMethod::Manual);
    }

    #[test]
    fn test_unknown_method() {
        let err = "paypal".parse::<PaymentMethod>().unwrap_err();
        assert!(matches!(err, DomainError::UnsupportedMethod(ref m) if m == "paypal"));
        assert_eq!(err.to_string(), "Unsupported payment method");
    }

    #[test]
    fn test_tag_roundtrips_through_display() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.to_string().parse::<PaymentMethod>().unwrap(), method);
        }
    }
}
