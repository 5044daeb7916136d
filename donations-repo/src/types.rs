//! Database row structs and their mapping to domain types.
//!
//! Postgres stores native UUID / TIMESTAMPTZ columns; SQLite stores both as
//! TEXT, so each backend gets its own row struct.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use donations_types::{
    Amount, Donation, DonationId, NewDonation, PaymentMethod, RepoError, User, UserId,
};

// ─────────────────────────────────────────────────────────────────────────────
// Shared conversions
// ─────────────────────────────────────────────────────────────────────────────

fn donation_from_columns(
    id: Uuid,
    name: String,
    amount: f64,
    method: &str,
    reference: String,
    created_at: DateTime<Utc>,
) -> Result<Donation, RepoError> {
    let amount = Amount::new(amount).map_err(|e| RepoError::Database(e.to_string()))?;
    let method: PaymentMethod = method
        .parse()
        .map_err(|_| RepoError::Database(format!("unknown payment method in row: {method}")))?;

    Ok(Donation::from_parts(
        DonationId::from_uuid(id),
        NewDonation {
            name,
            amount,
            method,
            reference,
        },
        created_at,
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// PostgreSQL rows
// ─────────────────────────────────────────────────────────────────────────────

/// Donation row from PostgreSQL.
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgDonation {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub method: String,
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(feature = "postgres")]
impl PgDonation {
    pub fn into_domain(self) -> Result<Donation, RepoError> {
        donation_from_columns(
            self.id,
            self.name,
            self.amount,
            &self.method,
            self.reference,
            self.created_at,
        )
    }
}

/// User row from PostgreSQL.
#[cfg(feature = "postgres")]
#[derive(FromRow)]
pub struct PgUser {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(feature = "postgres")]
impl PgUser {
    pub fn into_domain(self) -> User {
        User {
            id: UserId::from_uuid(self.id),
            name: self.name,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SQLite rows
// ─────────────────────────────────────────────────────────────────────────────

/// Formats a timestamp for a SQLite TEXT column.
///
/// Fixed-width microsecond precision keeps lexicographic order equal to
/// chronological order, which `ORDER BY created_at` relies on.
#[cfg(feature = "sqlite")]
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[cfg(feature = "sqlite")]
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RepoError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepoError::Database(e.to_string()))
}

#[cfg(feature = "sqlite")]
fn parse_uuid(raw: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(raw).map_err(|e| RepoError::Database(e.to_string()))
}

/// Donation row from SQLite.
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqliteDonation {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub method: String,
    pub reference: String,
    pub created_at: String,
}

#[cfg(feature = "sqlite")]
impl SqliteDonation {
    pub fn into_domain(self) -> Result<Donation, RepoError> {
        donation_from_columns(
            parse_uuid(&self.id)?,
            self.name,
            self.amount,
            &self.method,
            self.reference,
            parse_timestamp(&self.created_at)?,
        )
    }
}

/// User row from SQLite.
#[cfg(feature = "sqlite")]
#[derive(FromRow)]
pub struct SqliteUser {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: String,
}

#[cfg(feature = "sqlite")]
impl SqliteUser {
    pub fn into_domain(self) -> Result<User, RepoError> {
        Ok(User {
            id: UserId::from_uuid(parse_uuid(&self.id)?),
            name: self.name,
            email: self.email,
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}
