//! Donation Application Service
//!
//! Validates donation requests, dispatches them to the matching payment
//! provider, and records the outcome through the repository port.
//! Contains NO infrastructure logic - pure business orchestration.

use std::sync::Arc;

use donations_types::{
    Amount, AppError, DomainError, DonateRequest, DonateResponse, Donation, DonationRepository,
    InitiateRequest, NewDonation, PaymentMethod, PaymentMethodData, PaymentProvider, User,
};

/// Dispatch table from payment method to provider adapter.
///
/// One slot per [`PaymentMethod`] variant, so every method has exactly one
/// provider and adding a method is a compile error until it is wired here.
pub struct Providers {
    stripe: Arc<dyn PaymentProvider>,
    chapa: Arc<dyn PaymentProvider>,
    telebirr: Arc<dyn PaymentProvider>,
    manual: Arc<dyn PaymentProvider>,
}

impl Providers {
    pub fn new(
        stripe: Arc<dyn PaymentProvider>,
        chapa: Arc<dyn PaymentProvider>,
        telebirr: Arc<dyn PaymentProvider>,
        manual: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            stripe,
            chapa,
            telebirr,
            manual,
        }
    }

    /// Returns the provider serving `method`.
    pub fn get(&self, method: PaymentMethod) -> &dyn PaymentProvider {
        match method {
            PaymentMethod::Stripe => self.stripe.as_ref(),
            PaymentMethod::Chapa => self.chapa.as_ref(),
            PaymentMethod::Telebirr => self.telebirr.as_ref(),
            PaymentMethod::Manual => self.manual.as_ref(),
        }
    }
}

/// A donation request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidDonation {
    pub name: String,
    pub amount: Amount,
    pub method: PaymentMethod,
    pub payment_method_data: PaymentMethodData,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Checks required fields, then parses the amount and the method.
pub fn validate(req: DonateRequest) -> Result<ValidDonation, DomainError> {
    let name = present(req.name.as_deref());
    let method = present(req.method.as_deref());
    let amount = req.amount.as_ref().filter(|a| !a.is_blank());

    let (Some(name), Some(amount), Some(method)) = (name, amount, method) else {
        return Err(DomainError::MissingFields);
    };

    let amount = amount.parse()?;
    let method: PaymentMethod = method.parse()?;

    Ok(ValidDonation {
        name: name.to_string(),
        amount,
        method,
        payment_method_data: req.payment_method_data.unwrap_or_default(),
    })
}

/// Application service for donation operations.
///
/// Generic over `R: DonationRepository` - the adapter is injected at compile time.
pub struct DonationService<R: DonationRepository> {
    repo: R,
    providers: Providers,
}

impl<R: DonationRepository> DonationService<R> {
    /// Creates a new donation service with the given repository and providers.
    pub fn new(repo: R, providers: Providers) -> Self {
        Self { repo, providers }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Donations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Validates, initiates the payment with the selected provider, and
    /// records the donation.
    ///
    /// Nothing is stored unless the provider step succeeds. A failed write
    /// after a successful provider call is not compensated.
    pub async fn submit_donation(&self, req: DonateRequest) -> Result<DonateResponse, AppError> {
        let valid = validate(req)?;
        let provider = self.providers.get(valid.method);

        let initiation = provider
            .initiate(&InitiateRequest {
                name: valid.name.clone(),
                amount: valid.amount,
                payment_method_data: valid.payment_method_data,
            })
            .await?;

        let donation = NewDonation::new(valid.name, valid.amount, valid.method, initiation.reference)?;
        let donation = self.repo.create_donation(donation).await?;

        tracing::info!(
            donation_id = %donation.id,
            method = %donation.method,
            reference = %donation.reference,
            "donation recorded"
        );

        Ok(DonateResponse {
            success: true,
            provider: valid.method,
            donation,
            data: initiation.data,
        })
    }

    /// Lists all donations, newest first.
    pub async fn list_donations(&self) -> Result<Vec<Donation>, AppError> {
        self.repo.list_donations().await.map_err(Into::into)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────────

    /// Lists all users.
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repo.list_users().await.map_err(Into::into)
    }
}
