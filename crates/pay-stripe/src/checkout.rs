//! # Stripe Checkout Sessions
//!
//! Implementation of Stripe Checkout Sessions API.
//! One line item per session, priced from the catalog.

use crate::config::StripeConfig;
use async_trait::async_trait;
use pay_core::{
    CatalogEntry, CheckoutSession, CheckoutStrategy, Currency, PaymentError, PaymentResult,
};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Sub-resources expanded when retrieving a session
const SESSION_EXPANSIONS: [&str; 3] = ["customer_details", "line_items", "payment_intent"];

/// Stripe Checkout Session strategy
///
/// Uses Stripe's hosted checkout page for secure payments.
pub struct StripeCheckoutStrategy {
    config: StripeConfig,
    client: Client,
    currency: Currency,
}

impl StripeCheckoutStrategy {
    /// Create a new Stripe checkout strategy
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            currency: Currency::default(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    /// Form body for `POST /v1/checkout/sessions`
    fn session_form(
        &self,
        entry: &CatalogEntry,
        success_url: &str,
        cancel_url: &str,
    ) -> PaymentResult<Vec<(&'static str, String)>> {
        let unit_amount = entry.unit_amount(self.currency)?;

        Ok(vec![
            ("mode", "payment".to_string()),
            ("payment_method_types[0]", "card".to_string()),
            ("line_items[0][price_data][currency]", self.currency.as_str().to_string()),
            ("line_items[0][price_data][product_data][name]", entry.name.clone()),
            ("line_items[0][price_data][unit_amount]", unit_amount.to_string()),
            ("line_items[0][quantity]", "1".to_string()),
            ("customer_creation", "always".to_string()),
            ("success_url", success_url.to_string()),
            ("cancel_url", cancel_url.to_string()),
        ])
    }

    fn session_url(&self, session_id: &str) -> PaymentResult<Url> {
        let mut url = Url::parse(&format!("{}/v1/checkout/sessions", self.config.api_base_url))
            .map_err(|e| PaymentError::Configuration(format!("Stripe API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::Configuration("Stripe API base URL cannot be a base".into()))?
            .push(session_id);
        Ok(url)
    }

    /// Read the body, turning non-2xx answers into `ProviderError`
    async fn read_body(response: Response) -> PaymentResult<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::provider(PROVIDER, error_response.error.message));
            }

            return Err(PaymentError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        Ok(body)
    }
}

#[async_trait]
impl CheckoutStrategy for StripeCheckoutStrategy {
    #[instrument(skip(self, entry), fields(category = %entry.category, product_id = entry.product_id))]
    async fn create_session(
        &self,
        entry: &CatalogEntry,
        success_url: &str,
        cancel_url: &str,
    ) -> PaymentResult<CheckoutSession> {
        let form_params = self.session_form(entry, success_url, cancel_url)?;
        debug!("Creating Stripe checkout session for {}", entry.name);

        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let body = Self::read_body(response).await?;

        let session_response: StripeCheckoutSessionResponse =
            serde_json::from_str(&body).map_err(|e| {
                PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
            })?;

        let checkout_url = session_response.url.ok_or_else(|| {
            PaymentError::provider(
                PROVIDER,
                format!("session {} has no hosted checkout url", session_response.id),
            )
        })?;

        info!(
            "Created Stripe checkout session: id={}, url={}",
            session_response.id, checkout_url
        );

        Ok(CheckoutSession::new(session_response.id, checkout_url))
    }

    #[instrument(skip(self))]
    async fn get_session(&self, session_id: &str) -> PaymentResult<serde_json::Value> {
        let url = self.session_url(session_id)?;
        let expand: Vec<(&str, &str)> = SESSION_EXPANSIONS
            .iter()
            .map(|field| ("expand[]", *field))
            .collect();

        let response = self
            .client
            .get(url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .query(&expand)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let body = Self::read_body(response).await?;

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe session: {}", e))
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
