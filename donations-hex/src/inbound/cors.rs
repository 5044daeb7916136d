//! Single-origin CORS policy.
//!
//! Requests without an `Origin` header (server-to-server, curl) pass through.
//! A request from the configured origin gets the usual CORS response headers
//! from tower-http. Anything else is rejected before it reaches a handler.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderValue, Method, Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use super::handlers::error_response;
use super::server::HEALTH_PATH;

/// The one browser origin allowed to call the API.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allowed_origin: HeaderValue,
}

impl CorsPolicy {
    pub fn new(allowed_origin: &str) -> anyhow::Result<Self> {
        let allowed_origin = HeaderValue::from_str(allowed_origin.trim())
            .map_err(|e| anyhow::anyhow!("invalid allowed origin {allowed_origin:?}: {e}"))?;
        Ok(Self { allowed_origin })
    }

    /// Exact, case-sensitive comparison. No wildcard or suffix matching.
    pub fn allows(&self, origin: Option<&HeaderValue>) -> bool {
        match origin {
            None => true,
            Some(origin) => *origin == self.allowed_origin,
        }
    }

    /// Response-header layer for allowed origins.
    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::exact(self.allowed_origin.clone()))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(AllowHeaders::mirror_request())
    }
}

/// Rejects requests whose `Origin` is present and not the allowed one.
pub async fn cors_guard(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == HEALTH_PATH {
        return next.run(request).await;
    }

    let origin = request.headers().get(header::ORIGIN);
    if !policy.allows(origin) {
        tracing::warn!(origin = ?origin, "blocked cross-origin request");
        return error_response(StatusCode::FORBIDDEN, "Not allowed by CORS");
    }

    next.run(request).await
}
