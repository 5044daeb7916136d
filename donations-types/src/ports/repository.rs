//! Repository port trait.
//!
//! Adapters (Postgres, SQLite, in-memory mocks) implement this trait.

use crate::domain::{Donation, NewDonation, User};
use crate::error::RepoError;

/// The persistence port for donations and users.
///
/// Donations are append-only: there is no update or delete operation.
#[async_trait::async_trait]
pub trait DonationRepository: Send + Sync + 'static {
    /// Stores a donation, assigning its id and creation timestamp.
    async fn create_donation(&self, donation: NewDonation) -> Result<Donation, RepoError>;

    /// Lists every donation, newest first.
    async fn list_donations(&self) -> Result<Vec<Donation>, RepoError>;

    /// Lists every user.
    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
}
