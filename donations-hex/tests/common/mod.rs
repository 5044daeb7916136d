//! Shared setup for router-level tests.

#![allow(dead_code)]

use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response};
use http_body_util::BodyExt;

use donations_hex::{
    DonationService, Providers,
    inbound::{HttpOptions, HttpServer},
};
use donations_providers::{
    ChapaConfig, ChapaProvider, ManualProvider, ReferenceGenerator, StripeProvider,
    TelebirrProvider, parse_currency,
};
use donations_repo::SqliteRepo;

pub const ORIGIN: &str = "https://donate.example.org";

/// Server over in-memory SQLite with no Stripe or Chapa keys configured.
pub async fn create_test_server(rate_limit_max: u32) -> HttpServer<SqliteRepo> {
    let options =
        HttpOptions::new(ORIGIN).with_rate_limit(NonZeroU32::new(rate_limit_max).unwrap());
    create_test_server_with(options).await
}

pub async fn create_test_server_with(options: HttpOptions) -> HttpServer<SqliteRepo> {
    let repo = SqliteRepo::new("sqlite::memory:").await.unwrap();
    let references = Arc::new(ReferenceGenerator::system());

    let providers = Providers::new(
        Arc::new(StripeProvider::new(None, parse_currency("usd").unwrap())),
        Arc::new(ChapaProvider::new(ChapaConfig::default(), references.clone())),
        Arc::new(TelebirrProvider::new(references.clone())),
        Arc::new(ManualProvider::new(references)),
    );

    HttpServer::new(DonationService::new(repo, providers), options).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn donate(body: serde_json::Value) -> Request<Body> {
    donate_raw(body.to_string())
}

pub fn donate_raw(body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/donate")
        .header("Content-Type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
