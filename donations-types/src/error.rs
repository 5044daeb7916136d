//! Error types for the donation service.

use crate::ports::ProviderError;

/// Domain-level errors (business rule violations).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Missing required fields: name, amount, method")]
    MissingFields,

    #[error("Amount must be a positive number")]
    InvalidAmount,

    #[error("Unsupported payment method")]
    UnsupportedMethod(String),

    #[error("Donation reference cannot be empty")]
    EmptyReference,
}

/// Repository-level errors (data access failures).
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(String),
}

/// Application-level errors (for HTTP responses).
///
/// Maps cleanly to HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Operator misconfiguration; the message is safe to show to clients.
    #[error("{0}")]
    ProviderNotConfigured(String),

    /// Anything else. The detail is logged, never sent to clients.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::EmptyReference => AppError::Internal(err.to_string()),
            e => AppError::BadRequest(e.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Domain(e) => AppError::Internal(e.to_string()),
            RepoError::Database(e) => AppError::Internal(e),
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotConfigured(method) => {
                AppError::ProviderNotConfigured(format!("{} not configured", method.display_name()))
            }
            e => AppError::Internal(e.to_string()),
        }
    }
}
