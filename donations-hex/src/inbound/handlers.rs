//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use donations_types::{
    AppError, DonateRequest, DonationRepository, DonationsResponse, ErrorResponse,
    HealthResponse, UsersResponse,
};

use crate::DonationService;

/// Message sent to clients for every internal failure.
pub const SERVER_ERROR: &str = "Server error";

/// Application state shared across handlers.
pub struct AppState<R: DonationRepository> {
    pub service: DonationService<R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::ProviderNotConfigured(msg) => {
                tracing::error!(error = %msg, "payment provider not configured");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR.to_string())
            }
        };

        error_response(status, message)
    }
}

/// Builds the `{ "error": ... }` body used by every failure path.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Liveness probe.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// Submit a donation.
#[tracing::instrument(skip_all, fields(method = tracing::field::Empty))]
pub async fn donate<R: DonationRepository>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<DonateRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = match payload {
        Ok(json) => json,
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Ok(error_response(StatusCode::PAYLOAD_TOO_LARGE, "Payload too large"));
        }
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "rejected donation body");
            return Err(AppError::BadRequest("Invalid JSON body".into()).into());
        }
    };

    if let Some(method) = req.method.as_deref() {
        tracing::Span::current().record("method", method);
    }

    let response = state.service.submit_donation(req).await?;
    Ok(Json(response).into_response())
}

/// List all donations, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_donations<R: DonationRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<DonationsResponse>, ApiError> {
    let donations = state.service.list_donations().await?;
    Ok(Json(DonationsResponse {
        success: true,
        donations,
    }))
}

/// List all users.
#[tracing::instrument(skip(state))]
pub async fn list_users<R: DonationRepository>(
    State(state): State<Arc<AppState<R>>>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.service.list_users().await?;
    Ok(Json(UsersResponse {
        success: true,
        users,
    }))
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}
