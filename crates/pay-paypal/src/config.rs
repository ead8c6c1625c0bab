//! # PayPal Configuration
//!
//! Client credentials and endpoint for the PayPal REST API.

use pay_core::PaymentError;
use std::env;
use std::fmt;
use std::time::Duration;

/// PayPal API configuration
#[derive(Clone)]
pub struct PayPalConfig {
    /// API base URL (sandbox or live)
    pub api_base_url: String,

    /// OAuth2 client id
    pub client_id: String,

    /// OAuth2 client secret
    pub client_secret: String,

    /// Reuse bearer tokens until shortly before they expire
    pub cache_tokens: bool,

    /// Per-request timeout for the HTTP client
    pub timeout: Duration,
}

impl PayPalConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `PAYPAL_API`
    /// - `PAYPAL_CLIENT_ID`
    /// - `PAYPAL_SECRET`
    ///
    /// Optional:
    /// - `PAYPAL_TOKEN_CACHE` (`false` fetches a fresh token for every call)
    pub fn from_env() -> Result<Self, PaymentError> {
        dotenvy::dotenv().ok();

        let required = |name: &str| {
            env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PaymentError::Configuration(format!("{} not set", name)))
        };

        let api_base_url = required("PAYPAL_API")?;
        let client_id = required("PAYPAL_CLIENT_ID")?;
        let client_secret = required("PAYPAL_SECRET")?;

        let cache_tokens = env::var("PAYPAL_TOKEN_CACHE")
            .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"))
            .unwrap_or(true);

        Ok(Self::new(api_base_url, client_id, client_secret).with_token_cache(cache_tokens))
    }

    /// Create config with explicit values (for testing)
    pub fn new(
        api_base_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            cache_tokens: true,
            timeout: Duration::from_secs(30),
        }
    }

    /// Builder: toggle token caching
    pub fn with_token_cache(mut self, enabled: bool) -> Self {
        self.cache_tokens = enabled;
        self
    }

    /// Builder: set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check if pointed at the sandbox
    pub fn is_sandbox(&self) -> bool {
        self.api_base_url.contains("sandbox")
    }
}

impl fmt::Debug for PayPalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayPalConfig")
            .field("api_base_url", &self.api_base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("cache_tokens", &self.cache_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}
