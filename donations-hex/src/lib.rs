//! # Donations Hex
//!
//! Application service layer and HTTP adapter for the donations service.
//!
//! ## Architecture
//!
//! - `service` - Application service (validation, provider dispatch, persistence)
//! - `inbound/` - HTTP adapter (Axum server)
//! - `openapi` - OpenAPI document served next to the API
//!
//! The service is generic over `R: DonationRepository`, and payment
//! providers are injected as trait objects through [`Providers`].

pub mod inbound;
pub mod openapi;
pub mod service;


pub use service::{DonationService, Providers, ValidDonation, validate};
