//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod clock;
mod provider;
mod repository;

pub use clock::{Clock, SystemClock};
pub use provider::{InitiateRequest, Initiation, PaymentProvider, ProviderError};
pub use repository::DonationRepository;
