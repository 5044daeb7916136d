//! Hosted checkout through the Chapa payment gateway.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::warn;

use donations_types::{
    InitiateRequest, Initiation, PaymentMethod, PaymentProvider, ProviderData, ProviderError,
};

use crate::reference::ReferenceGenerator;

pub const DEFAULT_CHAPA_BASE_URL: &str = "https://api.chapa.co";

/// Email sent to the gateway when the donor did not provide one.
pub const DEFAULT_DONOR_EMAIL: &str = "donor@example.com";

/// Chapa gateway configuration.
#[derive(Debug, Clone)]
pub struct ChapaConfig {
    /// API secret key; `None` leaves the provider unconfigured
    pub secret_key: Option<String>,
    /// Currency code sent with every initialization (e.g. ETB)
    pub currency: String,
    /// API base URL (defaults to https://api.chapa.co)
    pub base_url: String,
    /// Frontend origin used to build the default callback URL
    pub frontend_url: Option<String>,
}

impl Default for ChapaConfig {
    fn default() -> Self {
        Self {
            secret_key: None,
            currency: "ETB".to_string(),
            base_url: DEFAULT_CHAPA_BASE_URL.to_string(),
            frontend_url: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct InitializePayload<'a> {
    amount: f64,
    currency: &'a str,
    email: &'a str,
    first_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    callback_url: Option<String>,
    reference: &'a str,
}

pub struct ChapaProvider {
    config: ChapaConfig,
    client: Client,
    references: Arc<ReferenceGenerator>,
}

impl ChapaProvider {
    pub fn new(config: ChapaConfig, references: Arc<ReferenceGenerator>) -> Self {
        Self {
            config,
            client: Client::new(),
            references,
        }
    }

    fn secret_key(&self) -> Option<&str> {
        self.config.secret_key.as_deref().filter(|k| !k.is_empty())
    }

    fn default_callback_url(&self) -> Option<String> {
        self.config
            .frontend_url
            .as_deref()
            .map(|url| format!("{}/donation-success", url.trim_end_matches('/')))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl PaymentProvider for ChapaProvider {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Chapa
    }

    async fn initiate(&self, request: &InitiateRequest) -> Result<Initiation, ProviderError> {
        let secret_key = self
            .secret_key()
            .ok_or(ProviderError::NotConfigured(PaymentMethod::Chapa))?;

        let local_reference = self.references.next(PaymentMethod::Chapa);
        let extras = &request.payment_method_data;

        let payload = InitializePayload {
            amount: request.amount.value(),
            currency: &self.config.currency,
            email: non_empty(extras.email.as_deref()).unwrap_or(DEFAULT_DONOR_EMAIL),
            first_name: &request.name,
            callback_url: non_empty(extras.callback_url.as_deref())
                .map(str::to_owned)
                .or_else(|| self.default_callback_url()),
            reference: &local_reference,
        };

        let url = format!(
            "{}/v1/transaction/initialize",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(secret_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProviderError::Call(format!("Chapa request failed: {e}")))?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Chapa body: {e}")))?;

        // The donation is recorded even when the gateway reports a failure.
        if !status.is_success() {
            warn!(%status, reference = %local_reference, "Chapa returned a non-success status");
        }

        let reference = body
            .pointer("/data/checkout_url")
            .and_then(serde_json::Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_owned)
            .unwrap_or(local_reference);

        Ok(Initiation {
            reference,
            data: ProviderData {
                chapa: Some(body),
                ..Default::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::{
        Json, Router,
        extract::State,
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Response},
        routing::post,
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::testing::{FixedClock, request};

    /// Stand-in for the Chapa initialize endpoint.
    struct Stub {
        status: StatusCode,
        body: Option<Value>,
        seen: Mutex<Vec<(Option<String>, Value)>>,
    }

    async fn initialize(
        State(stub): State<Arc<Stub>>,
        headers: HeaderMap,
        Json(payload): Json<Value>,
    ) -> Response {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        stub.seen.lock().unwrap().push((auth, payload));

        match &stub.body {
            Some(body) => (stub.status, Json(body.clone())).into_response(),
            None => (stub.status, "<html>bad gateway</html>").into_response(),
        }
    }

    async fn spawn_stub(status: StatusCode, body: Option<Value>) -> (String, Arc<Stub>) {
        let stub = Arc::new(Stub {
            status,
            body,
            seen: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .route("/v1/transaction/initialize", post(initialize))
            .with_state(stub.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), stub)
    }

    fn provider(base_url: String, secret_key: Option<&str>) -> ChapaProvider {
        let config = ChapaConfig {
            secret_key: secret_key.map(str::to_owned),
            base_url,
            frontend_url: Some("https://donate.example/".to_string()),
            ..Default::default()
        };
        let references = Arc::new(ReferenceGenerator::new(Arc::new(FixedClock::at_millis(
            1_700_000_000_000,
        ))));
        ChapaProvider::new(config, references)
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let provider = provider("http://127.0.0.1:9".to_string(), None);
        let err = provider.initiate(&request("Abebe", 100.0)).await.unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(PaymentMethod::Chapa)));
    }

    #[tokio::test]
    async fn test_checkout_url_becomes_reference() {
        let body = json!({
            "status": "success",
            "data": { "checkout_url": "https://checkout.chapa.co/pay/abc" }
        });
        let (base_url, stub) = spawn_stub(StatusCode::OK, Some(body.clone())).await;
        let provider = provider(base_url, Some("CHASECK-test"));

        let initiation = provider.initiate(&request("Abebe", 100.0)).await.unwrap();

        assert_eq!(initiation.reference, "https://checkout.chapa.co/pay/abc");
        assert_eq!(initiation.data.chapa, Some(body));

        let seen = stub.seen.lock().unwrap();
        let (auth, payload) = &seen[0];
        assert_eq!(auth.as_deref(), Some("Bearer CHASECK-test"));
        assert_eq!(payload["amount"], 100.0);
        assert_eq!(payload["currency"], "ETB");
        assert_eq!(payload["email"], DEFAULT_DONOR_EMAIL);
        assert_eq!(payload["first_name"], "Abebe");
        assert_eq!(payload["callback_url"], "https://donate.example/donation-success");
        assert_eq!(payload["reference"], "chapa_1700000000000");
    }

    #[tokio::test]
    async fn test_client_extras_override_defaults() {
        let (base_url, stub) = spawn_stub(StatusCode::OK, Some(json!({"status": "success"}))).await;
        let provider = provider(base_url, Some("key"));

        let mut req = request("Abebe", 5.0);
        req.payment_method_data.email = Some("abebe@example.et".into());
        req.payment_method_data.callback_url = Some("https://app.example/done".into());
        provider.initiate(&req).await.unwrap();

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen[0].1["email"], "abebe@example.et");
        assert_eq!(seen[0].1["callback_url"], "https://app.example/done");
    }

    #[tokio::test]
    async fn test_failed_status_still_yields_local_reference() {
        let body = json!({ "status": "failed", "message": "Invalid currency" });
        let (base_url, _stub) = spawn_stub(StatusCode::BAD_REQUEST, Some(body.clone())).await;
        let provider = provider(base_url, Some("key"));

        let initiation = provider.initiate(&request("Abebe", 100.0)).await.unwrap();

        assert_eq!(initiation.reference, "chapa_1700000000000");
        assert_eq!(initiation.data.chapa, Some(body));
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let (base_url, _stub) = spawn_stub(StatusCode::BAD_GATEWAY, None).await;
        let provider = provider(base_url, Some("key"));

        let err = provider.initiate(&request("Abebe", 100.0)).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_call_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = provider(format!("http://{}", addr), Some("key"));
        let err = provider.initiate(&request("Abebe", 100.0)).await.unwrap_err();
        assert!(matches!(err, ProviderError::Call(_)));
    }
}
