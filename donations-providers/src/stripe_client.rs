//! Card payments through Stripe PaymentIntents.

use std::collections::HashMap;

use async_trait::async_trait;
use donations_types::{
    InitiateRequest, Initiation, PaymentMethod, PaymentProvider, ProviderData, ProviderError,
};

pub struct StripeProvider {
    client: Option<stripe::Client>,
    currency: stripe::Currency,
}

impl StripeProvider {
    /// Without a secret key every initiation fails with `NotConfigured`.
    pub fn new(secret_key: Option<&str>, currency: stripe::Currency) -> Self {
        Self {
            client: secret_key
                .filter(|key| !key.is_empty())
                .map(stripe::Client::new),
            currency,
        }
    }

    /// Same as `new`, but talks to `api_base` instead of api.stripe.com.
    pub fn with_api_base(
        secret_key: Option<&str>,
        api_base: &str,
        currency: stripe::Currency,
    ) -> Result<Self, ProviderError> {
        // `Client::from_url` panics on a bad URL.
        reqwest::Url::parse(api_base)
            .map_err(|e| ProviderError::Call(format!("invalid Stripe API base {api_base:?}: {e}")))?;

        Ok(Self {
            client: secret_key
                .filter(|key| !key.is_empty())
                .map(|key| stripe::Client::from_url(api_base, key)),
            currency,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

/// Parses an ISO currency code such as `usd` or `EUR` into Stripe's enum.
pub fn parse_currency(code: &str) -> Result<stripe::Currency, ProviderError> {
    // Stripe's wire format is the lowercase code, which is what the enum deserializes from.
    serde_json::from_value(serde_json::Value::String(code.trim().to_ascii_lowercase()))
        .map_err(|_| ProviderError::Call(format!("unsupported Stripe currency: {code}")))
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Stripe
    }

    async fn initiate(&self, request: &InitiateRequest) -> Result<Initiation, ProviderError> {
        let client = self
            .client
            .as_ref()
            .ok_or(ProviderError::NotConfigured(PaymentMethod::Stripe))?;

        let mut params =
            stripe::CreatePaymentIntent::new(request.amount.minor_units(), self.currency);
        params.metadata = Some(HashMap::from([(
            "donor".to_string(),
            request.name.clone(),
        )]));

        let intent = stripe::PaymentIntent::create(client, params)
            .await
            .map_err(|e| ProviderError::Call(format!("Stripe API: {e}")))?;

        tracing::info!(intent_id = %intent.id, "created Stripe payment intent");

        Ok(Initiation {
            reference: intent.id.to_string(),
            data: ProviderData {
                client_secret: intent.client_secret,
                ..Default::default()
            },
        })
    }
}
