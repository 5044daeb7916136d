//! HTTP Server configuration and startup.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, header},
    middleware,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use donations_types::DonationRepository;

use super::cors::{CorsPolicy, cors_guard};
use super::handlers::{self, AppState};
use super::rate_limit::{DEFAULT_MAX, DEFAULT_WINDOW, RateLimiterState, rate_limit_middleware};
use crate::DonationService;
use crate::openapi::ApiDoc;

/// Liveness probe path, exempt from CORS and rate limiting.
pub const HEALTH_PATH: &str = "/healthz";

/// JSON request bodies above this size are rejected.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// Options for the HTTP adapter.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub allowed_origin: String,
    pub rate_limit_max: NonZeroU32,
    pub rate_limit_window: Duration,
    /// Key rate limits on `X-Forwarded-For` instead of the socket peer
    pub trust_proxy: bool,
}

impl HttpOptions {
    pub fn new(allowed_origin: impl Into<String>) -> Self {
        Self {
            allowed_origin: allowed_origin.into(),
            rate_limit_max: NonZeroU32::MIN.saturating_add(DEFAULT_MAX - 1),
            rate_limit_window: DEFAULT_WINDOW,
            trust_proxy: false,
        }
    }

    pub fn with_rate_limit(mut self, max: NonZeroU32) -> Self {
        self.rate_limit_max = max;
        self
    }

    pub fn with_trust_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }
}

/// HTTP Server for the Donations API.
pub struct HttpServer<R: DonationRepository> {
    state: Arc<AppState<R>>,
    rate_limiter: Arc<RateLimiterState>,
    cors: Arc<CorsPolicy>,
}

impl<R: DonationRepository> HttpServer<R> {
    /// Creates a new HTTP server with the given service.
    pub fn new(service: DonationService<R>, options: HttpOptions) -> anyhow::Result<Self> {
        Ok(Self {
            state: Arc::new(AppState { service }),
            rate_limiter: Arc::new(
                RateLimiterState::new(options.rate_limit_max, options.rate_limit_window)
                    .trust_forwarded_for(options.trust_proxy),
            ),
            cors: Arc::new(CorsPolicy::new(&options.allowed_origin)?),
        })
    }

    /// Returns the application service.
    pub fn service(&self) -> &DonationService<R> {
        &self.state.service
    }

    /// Builds the Axum router with all routes.
    pub fn router(&self) -> Router {
        let security_headers = ServiceBuilder::new()
            .layer(security_header(header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
            .layer(security_header(header::X_FRAME_OPTIONS, "SAMEORIGIN"))
            .layer(security_header(header::REFERRER_POLICY, "no-referrer"))
            .layer(security_header(
                header::STRICT_TRANSPORT_SECURITY,
                "max-age=15552000; includeSubDomains",
            ))
            .layer(security_header(
                HeaderName::from_static("cross-origin-resource-policy"),
                "same-origin",
            ))
            .layer(security_header(header::X_DNS_PREFETCH_CONTROL, "off"));

        // Layers run outside-in from the bottom of this chain.
        Router::new()
            .route(HEALTH_PATH, get(handlers::health))
            .route(
                "/api/donate",
                get(handlers::list_donations::<R>).post(handlers::donate::<R>),
            )
            .route("/api/users", get(handlers::list_users::<R>))
            .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
            .fallback(handlers::not_found)
            .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
            .layer(middleware::from_fn_with_state(
                self.rate_limiter.clone(),
                rate_limit_middleware,
            ))
            .layer(self.cors.layer())
            .layer(middleware::from_fn_with_state(self.cors.clone(), cors_guard))
            .layer(security_headers)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Runs the server on the given address until `shutdown` resolves.
    pub async fn run(
        &self,
        addr: &str,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", listener.local_addr()?);

        let pruner = tokio::spawn(self.rate_limiter.clone().prune_periodically());

        let served = axum::serve(
            listener,
            self.router()
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await;

        pruner.abort();
        served?;

        Ok(())
    }
}

fn security_header(
    name: HeaderName,
    value: &'static str,
) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
