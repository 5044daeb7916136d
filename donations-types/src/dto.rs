//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Amount, Donation, PaymentMethod, User};
use crate::error::DomainError;

// ─────────────────────────────────────────────────────────────────────────────
// Donation DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Request to submit a donation.
///
/// Every field is optional at the wire level so that missing fields are
/// reported by validation rather than by the JSON decoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonateRequest {
    /// Donor display name
    #[schema(example = "Jane")]
    pub name: Option<String>,
    /// Positive amount, as a number or numeric string
    #[schema(value_type = Option<f64>, example = 50)]
    pub amount: Option<AmountInput>,
    /// One of `stripe`, `chapa`, `telebirr`, `manual` (or `bank`), any case
    #[schema(example = "manual")]
    pub method: Option<String>,
    /// Provider-specific extras
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_data: Option<PaymentMethodData>,
}

/// A raw amount as clients send it: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// True for values a client would consider "not provided": `0` or a blank string.
    pub fn is_blank(&self) -> bool {
        match self {
            AmountInput::Number(n) => *n == 0.0,
            AmountInput::Text(s) => s.trim().is_empty(),
        }
    }

    /// Parses into a validated [`Amount`].
    pub fn parse(&self) -> Result<Amount, DomainError> {
        let value = match self {
            AmountInput::Number(n) => *n,
            AmountInput::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| DomainError::InvalidAmount)?,
        };
        Amount::new(value)
    }
}

/// Optional provider inputs supplied by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PaymentMethodData {
    /// Payer email, used by the regional gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    /// Where the gateway redirects after checkout
    #[serde(default, alias = "callbackUrl", skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Provider-specific response fields, flattened into [`DonateResponse`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProviderData {
    /// Stripe PaymentIntent client secret
    #[serde(rename = "clientSecret", skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Raw response from the regional gateway
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub chapa: Option<serde_json::Value>,
    /// Instructions for manually confirmed methods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Response after a donation is recorded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DonateResponse {
    pub success: bool,
    pub provider: PaymentMethod,
    pub donation: Donation,
    #[serde(flatten)]
    pub data: ProviderData,
}

/// Response listing donations, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DonationsResponse {
    pub success: bool,
    pub donations: Vec<Donation>,
}

// ─────────────────────────────────────────────────────────────────────────────
// User / misc DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Response listing users.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsersResponse {
    pub success: bool,
    pub users: Vec<User>,
}

/// Liveness probe body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = true)]
    pub ok: bool,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Unsupported payment method")]
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_input_accepts_numbers_and_strings() {
        let req: DonateRequest =
            serde_json::from_str(r#"{"name":"A","amount":"12.5","method":"manual"}"#).unwrap();
        assert_eq!(req.amount.unwrap().parse().unwrap().value(), 12.5);

        let req: DonateRequest =
            serde_json::from_str(r#"{"name":"A","amount":7,"method":"manual"}"#).unwrap();
        assert_eq!(req.amount.unwrap().parse().unwrap().value(), 7.0);
    }

    #[test]
    fn test_amount_input_blank() {
        assert!(AmountInput::Number(0.0).is_blank());
        assert!(AmountInput::Text("  ".into()).is_blank());
        assert!(!AmountInput::Text("abc".into()).is_blank());
        assert!(matches!(
            AmountInput::Text("abc".into()).parse(),
            Err(DomainError::InvalidAmount)
        ));
    }

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let req: DonateRequest = serde_json::from_str(r#"{"amount":null}"#).unwrap();
        assert!(req.name.is_none());
        assert!(req.amount.is_none());
        assert!(req.method.is_none());
        assert!(req.payment_method_data.is_none());
    }

    #[test]
    fn test_payment_method_data_accepts_both_spellings() {
        let a: PaymentMethodData =
            serde_json::from_str(r#"{"callback_url":"https://a.example"}"#).unwrap();
        let b: PaymentMethodData =
            serde_json::from_str(r#"{"callbackUrl":"https://a.example"}"#).unwrap();
        assert_eq!(a.callback_url, b.callback_url);
    }

    #[test]
    fn test_provider_data_flattens_into_response() {
        let data = ProviderData {
            client_secret: Some("pi_1_secret".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json, serde_json::json!({"clientSecret": "pi_1_secret"}));
        assert_eq!(
            serde_json::to_value(ProviderData::default()).unwrap(),
            serde_json::json!({})
        );
    }
}
