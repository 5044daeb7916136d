//! OpenAPI specification and documentation.

#![allow(dead_code)] // Path functions are only used by utoipa for documentation generation

use donations_types::{
    DonateRequest, DonateResponse, Donation, DonationId, DonationsResponse, ErrorResponse,
    HealthResponse, PaymentMethod, PaymentMethodData, ProviderData, User, UserId, UsersResponse,
};
use utoipa::OpenApi;

// Stand-ins carrying path documentation; the real handlers are generic
// over the repository and live in `inbound::handlers`.

/// Liveness probe
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse, example = json!({"ok": true}))
    )
)]
async fn health() {}

/// Submit a donation
///
/// Validates the request, initiates the payment with the provider for
/// `method`, and records the donation. Provider-specific fields
/// (`clientSecret`, `chapa`, `message`) appear next to `donation`.
#[utoipa::path(
    post,
    path = "/api/donate",
    tag = "donations",
    request_body = DonateRequest,
    responses(
        (status = 200, description = "Donation recorded", body = DonateResponse),
        (status = 400, description = "Missing fields, invalid amount, unsupported method or malformed JSON", body = ErrorResponse),
        (status = 403, description = "Origin not allowed", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded"),
        (status = 500, description = "Provider not configured or server error", body = ErrorResponse)
    )
)]
async fn donate() {}

/// List donations, newest first
#[utoipa::path(
    get,
    path = "/api/donate",
    tag = "donations",
    responses(
        (status = 200, description = "All donations", body = DonationsResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
async fn list_donations() {}

/// List users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = UsersResponse),
        (status = 500, description = "Server error", body = ErrorResponse)
    )
)]
async fn list_users() {}

/// OpenAPI documentation for the Donations API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Donations API",
        version = "1.0.0",
        description = "Accepts donations through Stripe, Chapa, Telebirr or manual bank transfer and records them.\n\nBrowser calls are accepted from a single configured origin. Every client is limited to a fixed number of requests per 15 minutes.",
        license(name = "MIT"),
    ),
    paths(health, donate, list_donations, list_users),
    components(
        schemas(
            DonateRequest,
            PaymentMethodData,
            DonateResponse,
            ProviderData,
            DonationsResponse,
            UsersResponse,
            HealthResponse,
            ErrorResponse,
            Donation,
            DonationId,
            User,
            UserId,
            PaymentMethod,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "donations", description = "Submit and list donations"),
        (name = "users", description = "Registered users"),
    )
)]
pub struct ApiDoc;
