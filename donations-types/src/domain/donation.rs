//! Donation domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::amount::Amount;
use super::method::PaymentMethod;
use crate::error::DomainError;

/// Unique identifier for a Donation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct DonationId(Uuid);

impl DonationId {
    /// Creates a new random DonationId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a DonationId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the UUID value.
    pub fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl Default for DonationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DonationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DonationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A validated donation that has not been stored yet.
///
/// The repository assigns `id` and `created_at` when it persists one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDonation {
    pub name: String,
    pub amount: Amount,
    pub method: PaymentMethod,
    pub reference: String,
}

impl NewDonation {
    /// Builds a new donation, enforcing a non-empty donor name and reference.
    pub fn new(
        name: impl Into<String>,
        amount: Amount,
        method: PaymentMethod,
        reference: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::MissingFields);
        }

        let reference = reference.into();
        if reference.is_empty() {
            return Err(DomainError::EmptyReference);
        }

        Ok(Self {
            name,
            amount,
            method,
            reference,
        })
    }
}

/// A recorded donation.
///
/// Donations are immutable once created; there is no update or delete path.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    /// Unique identifier
    #[schema(value_type = String, example = "123e4567-e89b-12d3-a456-426614174000")]
    pub id: DonationId,
    /// Donor display name
    #[schema(example = "Jane")]
    pub name: String,
    pub amount: Amount,
    pub method: PaymentMethod,
    /// Provider transaction id, checkout URL, or a local `<method>_<millis>` token
    #[schema(example = "manual_1718000000000")]
    pub reference: String,
    /// When the donation was stored
    pub created_at: DateTime<Utc>,
}

impl Donation {
    /// Reconstructs a donation from stored fields.
    pub fn from_parts(
        id: DonationId,
        donation: NewDonation,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: donation.name,
            amount: donation.amount,
            method: donation.method,
            reference: donation.reference,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount() -> Amount {
        Amount::new(50.0).unwrap()
    }

    #[test]
    fn test_new_donation() {
        let d = NewDonation::new("Jane", amount(), PaymentMethod::Manual, "manual_1").unwrap();
        assert_eq!(d.name, "Jane");
        assert_eq!(d.reference, "manual_1");
    }

    #[test]
    fn test_new_donation_requires_reference() {
        let err = NewDonation::new("Jane", amount(), PaymentMethod::Manual, "").unwrap_err();
        assert!(matches!(err, DomainError::EmptyReference));
    }

    #[test]
    fn test_new_donation_requires_name() {
        let err = NewDonation::new("  ", amount(), PaymentMethod::Manual, "ref").unwrap_err();
        assert!(matches!(err, DomainError::MissingFields));
    }

    #[test]
    fn test_serializes_camel_case() {
        let new = NewDonation::new("Jane", amount(), PaymentMethod::Telebirr, "telebirr_1").unwrap();
        let donation = Donation::from_parts(DonationId::new(), new, Utc::now());
        let json = serde_json::to_value(&donation).unwrap();

        assert_eq!(json["method"], "telebirr");
        assert_eq!(json["amount"], 50.0);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
