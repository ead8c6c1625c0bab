//! # PayPal Orders
//!
//! Orders v2: create with `CAPTURE` intent, then capture once the buyer
//! has approved it in the PayPal popup.

use crate::config::PayPalConfig;
use crate::token::AccessTokenProvider;
use crate::PROVIDER;
use async_trait::async_trait;
use pay_core::{
    CatalogEntry, Currency, OrderStrategy, PaymentError, PaymentResult, ProviderOrder,
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

/// PayPal Orders strategy
pub struct PayPalOrdersStrategy {
    config: PayPalConfig,
    client: Client,
    tokens: AccessTokenProvider,
    currency: Currency,
}

impl PayPalOrdersStrategy {
    pub fn new(config: PayPalConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self {
            tokens: AccessTokenProvider::new(config.clone(), client.clone()),
            config,
            client,
            currency: Currency::default(),
        })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        Self::new(PayPalConfig::from_env()?)
    }

    fn order_request<'a>(&self, entry: &'a CatalogEntry) -> CreateOrderRequest<'a> {
        CreateOrderRequest {
            intent: "CAPTURE",
            purchase_units: [PurchaseUnit {
                description: &entry.name,
                amount: Amount {
                    currency_code: self.currency.code(),
                    value: self.currency.format_amount(entry.price),
                },
            }],
        }
    }

    fn capture_url(&self, order_id: &str) -> PaymentResult<Url> {
        let mut url = Url::parse(&format!("{}/v2/checkout/orders", self.config.api_base_url))
            .map_err(|e| PaymentError::Configuration(format!("PayPal API base URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| PaymentError::Configuration("PayPal API base URL cannot be a base".into()))?
            .push(order_id)
            .push("capture");
        Ok(url)
    }

    /// Read the body, turning non-2xx answers into `ProviderError`
    async fn read_body(&self, response: Response, token: &str) -> PaymentResult<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("PayPal API error: status={}, body={}", status, body);

            if status == StatusCode::UNAUTHORIZED {
                self.tokens.invalidate(token).await;
            }

            let message = serde_json::from_str::<PayPalErrorResponse>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| format!("HTTP {}: {}", status, body));

            return Err(PaymentError::provider(PROVIDER, message));
        }

        Ok(body)
    }
}

#[async_trait]
impl OrderStrategy for PayPalOrdersStrategy {
    #[instrument(skip(self, entry), fields(category = %entry.category, product_id = entry.product_id))]
    async fn create_order(&self, entry: &CatalogEntry) -> PaymentResult<ProviderOrder> {
        let token = self.tokens.fetch_token().await?;
        let request = self.order_request(entry);
        debug!("Creating PayPal order: {:?}", request);

        let url = format!("{}/v2/checkout/orders", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&token)
            .json(&request)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let body = self.read_body(response, &token).await?;

        let order: ProviderOrder = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse PayPal order: {}", e))
        })?;

        info!("Created PayPal order: id={}, status={:?}", order.id, order.status);
        Ok(order)
    }

    #[instrument(skip(self))]
    async fn capture_order(&self, order_id: &str) -> PaymentResult<serde_json::Value> {
        let url = self.capture_url(order_id)?;
        let token = self.tokens.fetch_token().await?;

        let response = self
            .client
            .post(url)
            .bearer_auth(&token)
            .json(&serde_json::json!({}))
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let body = self.read_body(response, &token).await?;

        serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse PayPal capture: {}", e))
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// PayPal API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    intent: &'static str,
    purchase_units: [PurchaseUnit<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PurchaseUnit<'a> {
    description: &'a str,
    amount: Amount,
}

#[derive(Debug, Serialize)]
struct Amount {
    currency_code: &'static str,
    value: String,
}

#[derive(Debug, Deserialize)]
struct PayPalErrorResponse {
    #[serde(default)]
    message: Option<String>,
}
