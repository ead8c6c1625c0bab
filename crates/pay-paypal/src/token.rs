//! # Access Tokens
//!
//! OAuth2 client-credentials exchange against `/v1/oauth2/token`.

use crate::config::PayPalConfig;
use crate::PROVIDER;
use chrono::{DateTime, Duration, Utc};
use pay_core::{PaymentError, PaymentResult};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, error, instrument};

/// Tokens are refreshed this long before the provider says they expire
const EXPIRY_MARGIN_SECS: i64 = 60;

/// A bearer credential for the Orders API
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        self.expires_at.map(|exp| exp > Utc::now()).unwrap_or(false)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Obtains bearer tokens, optionally caching them until near expiry
pub struct AccessTokenProvider {
    config: PayPalConfig,
    client: Client,
    cached: RwLock<Option<AccessToken>>,
}

impl AccessTokenProvider {
    pub fn new(config: PayPalConfig, client: Client) -> Self {
        Self {
            config,
            client,
            cached: RwLock::new(None),
        }
    }

    /// Return a usable bearer token
    pub async fn fetch_token(&self) -> PaymentResult<String> {
        if !self.config.cache_tokens {
            return Ok(self.request_token().await?.value);
        }

        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
                return Ok(token.value.clone());
            }
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *self.cached.write().await = Some(token);
        Ok(value)
    }

    /// Drop the cached token if it is the one the provider rejected.
    ///
    /// A newer token cached by a concurrent request is kept.
    pub async fn invalidate(&self, rejected: &str) {
        let mut cached = self.cached.write().await;
        if cached.as_ref().is_some_and(|t| t.value == rejected) {
            *cached = None;
        }
    }

    #[instrument(skip(self))]
    async fn request_token(&self) -> PaymentResult<AccessToken> {
        let url = format!("{}/v1/oauth2/token", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("PayPal token exchange failed: status={}, body={}", status, body);
            return Err(PaymentError::provider(
                PROVIDER,
                format!("token exchange failed with HTTP {}", status),
            ));
        }

        let token: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse PayPal token: {}", e))
        })?;

        let expires_at = token
            .expires_in
            .filter(|secs| *secs > EXPIRY_MARGIN_SECS)
            .map(|secs| Utc::now() + Duration::seconds(secs - EXPIRY_MARGIN_SECS));

        debug!("Obtained PayPal access token, expires_at={:?}", expires_at);

        Ok(AccessToken {
            value: token.access_token,
            expires_at,
        })
    }
}
