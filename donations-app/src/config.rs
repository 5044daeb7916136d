//! Configuration loading from environment.

use std::env;
use std::num::NonZeroU32;

use donations_hex::inbound::DEFAULT_MAX;
use donations_providers::{DEFAULT_CHAPA_BASE_URL, StripeCurrency, parse_currency};

/// Browser origin allowed when neither `ALLOWED_ORIGIN` nor `FRONTEND_URL` is set.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://kuraa-galaan-website.vercel.app";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration.
#[derive(Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub allowed_origin: String,
    pub frontend_url: Option<String>,
    pub stripe_secret_key: Option<String>,
    pub stripe_currency: StripeCurrency,
    pub chapa_secret_key: Option<String>,
    pub chapa_currency: String,
    pub chapa_base_url: String,
    pub rate_limit_max: NonZeroU32,
    /// Rate limit on the first `X-Forwarded-For` hop instead of the peer
    pub trust_proxy: bool,
    pub log_format: LogFormat,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match var("PORT") {
            Some(port) => port
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid PORT {port:?}: {e}"))?,
            None => 3000,
        };

        let database_url = var("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let frontend_url = var("FRONTEND_URL");
        let allowed_origin = var("ALLOWED_ORIGIN")
            .or_else(|| frontend_url.clone())
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());

        let stripe_currency = parse_currency(&var("STRIPE_CURRENCY").unwrap_or_else(|| "usd".into()))?;

        let rate_limit_max = match var("RATE_LIMIT_MAX") {
            Some(max) => max
                .parse::<NonZeroU32>()
                .map_err(|e| anyhow::anyhow!("invalid RATE_LIMIT_MAX {max:?}: {e}"))?,
            None => NonZeroU32::MIN.saturating_add(DEFAULT_MAX - 1),
        };

        let trust_proxy = match var("TRUST_PROXY").map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("false" | "0") => false,
            Some("true" | "1") => true,
            Some(other) => anyhow::bail!("invalid TRUST_PROXY {other:?}: expected true or false"),
        };

        let log_format = match var("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => anyhow::bail!("invalid LOG_FORMAT {other:?}: expected pretty or json"),
        };

        Ok(Self {
            port,
            database_url,
            allowed_origin,
            frontend_url,
            stripe_secret_key: var("STRIPE_SECRET_KEY"),
            stripe_currency,
            chapa_secret_key: var("CHAPA_SECRET_KEY"),
            chapa_currency: var("CHAPA_CURRENCY").unwrap_or_else(|| "ETB".into()),
            chapa_base_url: var("CHAPA_BASE_URL").unwrap_or_else(|| DEFAULT_CHAPA_BASE_URL.into()),
            rate_limit_max,
            trust_proxy,
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("DATABASE_URL", "postgres://localhost/donations")]).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.allowed_origin, DEFAULT_ALLOWED_ORIGIN);
        assert_eq!(config.frontend_url, None);
        assert_eq!(config.stripe_secret_key, None);
        assert_eq!(config.stripe_currency, parse_currency("usd").unwrap());
        assert_eq!(config.chapa_secret_key, None);
        assert_eq!(config.chapa_currency, "ETB");
        assert_eq!(config.chapa_base_url, "https://api.chapa.co");
        assert_eq!(config.rate_limit_max.get(), 200);
        assert!(!config.trust_proxy);
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_database_url_required() {
        let err = load(&[("PORT", "8080")]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_allowed_origin_falls_back_to_frontend_url() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("FRONTEND_URL", "https://donate.example.org"),
        ])
        .unwrap();
        assert_eq!(config.allowed_origin, "https://donate.example.org");
        assert_eq!(config.frontend_url.as_deref(), Some("https://donate.example.org"));

        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("FRONTEND_URL", "https://donate.example.org"),
            ("ALLOWED_ORIGIN", "https://admin.example.org"),
        ])
        .unwrap();
        assert_eq!(config.allowed_origin, "https://admin.example.org");
    }

    #[test]
    fn test_blank_keys_are_unset() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("STRIPE_SECRET_KEY", "  "),
            ("CHAPA_SECRET_KEY", ""),
        ])
        .unwrap();

        assert!(config.stripe_secret_key.is_none());
        assert!(config.chapa_secret_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "8080"),
            ("STRIPE_SECRET_KEY", "sk_test_123"),
            ("STRIPE_CURRENCY", "EUR"),
            ("CHAPA_SECRET_KEY", "CHASECK_TEST"),
            ("CHAPA_BASE_URL", "http://127.0.0.1:9000"),
            ("RATE_LIMIT_MAX", "50"),
            ("TRUST_PROXY", "true"),
            ("LOG_FORMAT", "json"),
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.stripe_secret_key.as_deref(), Some("sk_test_123"));
        assert_eq!(config.stripe_currency, parse_currency("eur").unwrap());
        assert_eq!(config.chapa_secret_key.as_deref(), Some("CHASECK_TEST"));
        assert_eq!(config.chapa_base_url, "http://127.0.0.1:9000");
        assert_eq!(config.rate_limit_max.get(), 50);
        assert!(config.trust_proxy);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_values_fail() {
        let base = ("DATABASE_URL", "sqlite::memory:");

        assert!(load(&[base, ("PORT", "eighty")]).is_err());
        assert!(load(&[base, ("RATE_LIMIT_MAX", "0")]).is_err());
        assert!(load(&[base, ("RATE_LIMIT_MAX", "-1")]).is_err());
        assert!(load(&[base, ("STRIPE_CURRENCY", "doubloons")]).is_err());
        assert!(load(&[base, ("LOG_FORMAT", "xml")]).is_err());
        assert!(load(&[base, ("TRUST_PROXY", "yes please")]).is_err());
    }
}
