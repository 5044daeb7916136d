//! # Donations Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize the repository adapter
//! - Build the payment providers
//! - Start the HTTP server, closing the database pool on shutdown

mod config;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use donations_hex::{
    DonationService, Providers,
    inbound::{HttpOptions, HttpServer, shutdown_signal},
};
use donations_providers::{
    ChapaConfig, ChapaProvider, ManualProvider, ReferenceGenerator, StripeProvider,
    TelebirrProvider,
};
use donations_repo::build_repo;

use config::{Config, LogFormat};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,donations_app=debug,donations_hex=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn build_providers(config: &Config) -> Providers {
    let references = Arc::new(ReferenceGenerator::system());

    let stripe = StripeProvider::new(config.stripe_secret_key.as_deref(), config.stripe_currency);
    if !stripe.is_configured() {
        tracing::warn!("STRIPE_SECRET_KEY not set, stripe donations will be refused");
    }

    if config.chapa_secret_key.is_none() {
        tracing::warn!("CHAPA_SECRET_KEY not set, chapa donations will be refused");
    }
    let chapa = ChapaProvider::new(
        ChapaConfig {
            secret_key: config.chapa_secret_key.clone(),
            currency: config.chapa_currency.clone(),
            base_url: config.chapa_base_url.clone(),
            frontend_url: config.frontend_url.clone(),
        },
        references.clone(),
    );

    Providers::new(
        Arc::new(stripe),
        Arc::new(chapa),
        Arc::new(TelebirrProvider::new(references.clone())),
        Arc::new(ManualProvider::new(references)),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.log_format);

    tracing::info!("Starting donations server on port {}", config.port);
    tracing::info!(allowed_origin = %config.allowed_origin, "CORS origin");

    // Build repository (handles connection and migration)
    let repo = build_repo(&config.database_url)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to connect to database"))?;
    tracing::info!("database connected");

    let service = DonationService::new(repo, build_providers(&config));

    if config.trust_proxy {
        tracing::info!("rate limiting on X-Forwarded-For");
    }
    let options = HttpOptions::new(config.allowed_origin.clone())
        .with_rate_limit(config.rate_limit_max)
        .with_trust_proxy(config.trust_proxy);
    let server = HttpServer::new(service, options)?;
    let addr = format!("0.0.0.0:{}", config.port);

    let result = server.run(&addr, shutdown_signal()).await;

    server.service().repo().close().await;
    tracing::info!("database connection closed");

    result
}
