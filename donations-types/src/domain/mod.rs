//! Domain models for the donation service.

pub mod amount;
pub mod donation;
pub mod method;
pub mod user;

pub use amount::Amount;
pub use donation::{Donation, DonationId, NewDonation};
pub use method::PaymentMethod;
pub use user::{User, UserId};
