//! Payment provider port.
//!
//! One implementation per payment method. Implementations may call a
//! third-party API or simply mint a local reference.

use crate::domain::{Amount, PaymentMethod};
use crate::dto::{PaymentMethodData, ProviderData};

/// Error type for provider operations.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{} not configured", .0.display_name())]
    NotConfigured(PaymentMethod),

    #[error("Provider call failed: {0}")]
    Call(String),

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

/// Provider-agnostic view of a donation being initiated.
#[derive(Debug, Clone)]
pub struct InitiateRequest {
    pub name: String,
    pub amount: Amount,
    pub payment_method_data: PaymentMethodData,
}

/// What a provider hands back after a successful initiation.
#[derive(Debug, Clone)]
pub struct Initiation {
    /// Identifier to store with the donation
    pub reference: String,
    /// Provider-specific fields surfaced to the client
    pub data: ProviderData,
}

/// Port trait for payment providers.
#[async_trait::async_trait]
pub trait PaymentProvider: Send + Sync {
    /// The method this provider serves.
    fn method(&self) -> PaymentMethod;

    /// Starts a payment. Single-shot: no retries, no multi-step negotiation.
    async fn initiate(&self, request: &InitiateRequest) -> Result<Initiation, ProviderError>;
}
