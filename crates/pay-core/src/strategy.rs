//! # Provider Strategies
//!
//! One trait per provider flow. The gateway talks to these, never to a
//! concrete HTTP client, so providers can be swapped or faked.
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │ CheckoutStrategy (trait) │      │  OrderStrategy (trait)   │
//! │  ├── create_session()    │      │  ├── create_order()      │
//! │  └── get_session()       │      │  └── capture_order()     │
//! └────────────▲─────────────┘      └────────────▲─────────────┘
//!              │                                 │
//!     ┌────────┴─────────┐             ┌─────────┴──────────┐
//!     │ StripeCheckout   │             │ PayPalOrders       │
//!     │   Strategy       │             │   Strategy         │
//!     └──────────────────┘             └────────────────────┘
//! ```

use crate::catalog::CatalogEntry;
use crate::error::PaymentResult;
use crate::session::{CheckoutSession, ProviderOrder};
use async_trait::async_trait;
use std::sync::Arc;

/// Card provider: hosted checkout sessions.
#[async_trait]
pub trait CheckoutStrategy: Send + Sync {
    /// Create a one-time payment session for a single catalog entry.
    ///
    /// # Arguments
    /// * `entry` - Catalog-resolved product (name and price)
    /// * `success_url` - Redirect after payment, may carry the provider's session placeholder
    /// * `cancel_url` - Redirect if the customer backs out
    async fn create_session(
        &self,
        entry: &CatalogEntry,
        success_url: &str,
        cancel_url: &str,
    ) -> PaymentResult<CheckoutSession>;

    /// Retrieve a session with customer details, line items and payment
    /// intent expanded. Returns the provider payload as-is.
    async fn get_session(&self, session_id: &str) -> PaymentResult<serde_json::Value>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Wallet provider: two-phase create/capture orders.
#[async_trait]
pub trait OrderStrategy: Send + Sync {
    /// Create a capture-intent order for a single catalog entry.
    async fn create_order(&self, entry: &CatalogEntry) -> PaymentResult<ProviderOrder>;

    /// Capture a previously created order. Returns the provider payload as-is.
    async fn capture_order(&self, order_id: &str) -> PaymentResult<serde_json::Value>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

pub type BoxedCheckoutStrategy = Arc<dyn CheckoutStrategy>;
pub type BoxedOrderStrategy = Arc<dyn OrderStrategy>;

/// Placeholder the card provider substitutes with the real session id
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Redirect URLs handed to the card provider
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Storefront page that handles both outcomes
    pub return_url: String,
}

impl CheckoutUrls {
    pub fn new(return_url: impl Into<String>) -> Self {
        Self {
            return_url: return_url.into(),
        }
    }

    fn separator(&self) -> char {
        if self.return_url.contains('?') {
            '&'
        } else {
            '?'
        }
    }

    pub fn success_url(&self, product_id: u32) -> String {
        format!(
            "{}{}id={}&status=success&session_id={}",
            self.return_url,
            self.separator(),
            product_id,
            SESSION_ID_PLACEHOLDER
        )
    }

    pub fn cancel_url(&self, product_id: u32) -> String {
        format!(
            "{}{}id={}&status=cancel",
            self.return_url,
            self.separator(),
            product_id
        )
    }
}

impl Default for CheckoutUrls {
    fn default() -> Self {
        Self::new("https://artist-client-m7h7.vercel.app/Payments")
    }
}
