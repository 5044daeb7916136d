//! # Donations Types
//!
//! Domain types and port traits for the donation intake service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Donation, User, PaymentMethod, Amount)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{Amount, Donation, DonationId, NewDonation, PaymentMethod, User, UserId};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{
    Clock, DonationRepository, InitiateRequest, Initiation, PaymentProvider, ProviderError,
    SystemClock,
};
