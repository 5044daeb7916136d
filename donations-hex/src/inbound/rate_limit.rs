//! Rate limiting middleware.
//!
//! Implements per-client fixed-window limiting: each client gets at most
//! `max` requests per window, and the count resets when its window ends.

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::json;
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};

use donations_types::{Clock, SystemClock};

use super::server::HEALTH_PATH;

/// Default window: 15 minutes.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Default number of requests per window.
pub const DEFAULT_MAX: u32 = 200;

/// One client's current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    started: DateTime<Utc>,
    hits: u32,
}

/// Quota left after an allowed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowance {
    pub remaining: u32,
    /// Time until the client's window resets
    pub reset: Duration,
}

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// Per-client windows
    windows: DashMap<String, Window>,
    max: NonZeroU32,
    window: Duration,
    /// Whether `X-Forwarded-For` identifies the client
    trust_forwarded_for: bool,
    clock: Arc<dyn Clock>,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(NonZeroU32::MIN.saturating_add(DEFAULT_MAX - 1), DEFAULT_WINDOW)
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `max` - Number of requests allowed per window
    /// * `window` - Length of each client's window
    pub fn new(max: NonZeroU32, window: Duration) -> Self {
        Self {
            windows: DashMap::new(),
            max,
            window,
            trust_forwarded_for: false,
            clock: Arc::new(SystemClock),
        }
    }

    /// Keys clients by the first `X-Forwarded-For` hop. Only enable behind a
    /// proxy that overwrites the header.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn max(&self) -> u32 {
        self.max.get()
    }

    fn elapsed(&self, since: DateTime<Utc>) -> Duration {
        // A clock that stepped backwards counts as no time passed.
        (self.clock.now() - since).to_std().unwrap_or_default()
    }

    /// Records a request from `key`.
    /// Returns the wait until the window resets when the client is over quota.
    pub fn check(&self, key: &str) -> Result<Allowance, Duration> {
        let now = self.clock.now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            hits: 0,
        });

        let mut elapsed = self.elapsed(entry.started);
        if elapsed >= self.window {
            *entry = Window {
                started: now,
                hits: 0,
            };
            elapsed = Duration::ZERO;
        }
        let reset = self.window.saturating_sub(elapsed);

        if entry.hits >= self.max.get() {
            return Err(reset);
        }
        entry.hits += 1;

        Ok(Allowance {
            remaining: self.max.get() - entry.hits,
            reset,
        })
    }

    /// Drops clients whose window has ended.
    pub fn prune(&self) {
        self.windows
            .retain(|_, window| self.elapsed(window.started) < self.window);
    }

    /// Number of clients currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    /// Prunes expired windows once per window, forever.
    pub async fn prune_periodically(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.window.max(Duration::from_secs(1)));
        loop {
            interval.tick().await;
            self.prune();
        }
    }

    /// Identifies the client: the socket peer, or the first `X-Forwarded-For`
    /// hop when forwarded headers are trusted.
    pub fn client_key(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        let forwarded = self
            .trust_forwarded_for
            .then(|| {
                headers
                    .get("x-forwarded-for")
                    .and_then(|h| h.to_str().ok())
                    .and_then(|v| v.split(',').next())
                    .map(str::trim)
                    .filter(|hop| !hop.is_empty())
                    .map(str::to_owned)
            })
            .flatten();

        forwarded
            .or_else(|| peer.map(|addr| addr.ip().to_string()))
            .unwrap_or_else(|| "unknown".to_string())
    }
}

fn whole_seconds(duration: Duration) -> u64 {
    duration.as_secs_f64().ceil() as u64
}

/// Rate limiting middleware. The health probe is never limited.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == HEALTH_PATH {
        return next.run(request).await;
    }

    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = limiter.client_key(request.headers(), peer);

    let limit = HeaderValue::from(limiter.max());

    match limiter.check(&key) {
        Ok(allowance) => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert("ratelimit-limit", limit);
            headers.insert("ratelimit-remaining", HeaderValue::from(allowance.remaining));
            headers.insert("ratelimit-reset", HeaderValue::from(whole_seconds(allowance.reset)));
            response
        }
        Err(wait) => {
            let retry_after = whole_seconds(wait).max(1);
            tracing::warn!(client = %key, retry_after, "rate limit exceeded");

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({
                    "error": "Too many requests, please try again later.",
                    "retry_after_seconds": retry_after
                })),
            )
                .into_response();

            let headers = response.headers_mut();
            headers.insert("retry-after", HeaderValue::from(retry_after));
            headers.insert("ratelimit-limit", limit);
            headers.insert("ratelimit-remaining", HeaderValue::from(0u32));
            headers.insert("ratelimit-reset", HeaderValue::from(retry_after));
            response
        }
    }
}
