//! # Payment Gateway
//!
//! Resolves products against the catalog before any provider call, then
//! delegates to the card or wallet strategy.

use crate::catalog::Catalog;
use crate::error::{PaymentError, PaymentResult};
use crate::session::{payment_status, CheckoutSession, ProviderOrder, PAID_STATUS};
use crate::strategy::{BoxedCheckoutStrategy, BoxedOrderStrategy, CheckoutUrls};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Entry point for every checkout flow
#[derive(Clone)]
pub struct PaymentGateway {
    catalog: Arc<Catalog>,
    checkout: BoxedCheckoutStrategy,
    orders: BoxedOrderStrategy,
    urls: CheckoutUrls,
}

impl PaymentGateway {
    pub fn new(
        catalog: Catalog,
        checkout: BoxedCheckoutStrategy,
        orders: BoxedOrderStrategy,
        urls: CheckoutUrls,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            checkout,
            orders,
            urls,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Names of the configured providers, card first
    pub fn providers(&self) -> [&'static str; 2] {
        [self.checkout.provider_name(), self.orders.provider_name()]
    }

    /// Create a hosted checkout session for a catalog product
    #[instrument(skip(self))]
    pub async fn create_session(
        &self,
        category: &str,
        product_id: &str,
    ) -> PaymentResult<CheckoutSession> {
        let entry = self.catalog.resolve(category, product_id)?;

        let session = self
            .checkout
            .create_session(
                entry,
                &self.urls.success_url(entry.product_id),
                &self.urls.cancel_url(entry.product_id),
            )
            .await?;

        info!(
            "Created {} session {} for {}/{}",
            self.checkout.provider_name(),
            session.session_id,
            entry.category,
            entry.product_id
        );
        Ok(session)
    }

    /// Fetch a session and only hand it back once it is paid
    #[instrument(skip(self))]
    pub async fn get_session(&self, session_id: &str) -> PaymentResult<serde_json::Value> {
        let session = self.checkout.get_session(session_id).await?;

        match payment_status(&session) {
            Some(PAID_STATUS) => Ok(session),
            status => {
                let status = status.unwrap_or("missing").to_string();
                warn!("Session {} not paid: {}", session_id, status);
                Err(PaymentError::PaymentNotCompleted {
                    session_id: session_id.to_string(),
                    payment_status: status,
                })
            }
        }
    }

    /// Create a wallet order for a catalog product
    #[instrument(skip(self))]
    pub async fn create_order(
        &self,
        category: &str,
        product_id: &str,
    ) -> PaymentResult<ProviderOrder> {
        let entry = self.catalog.resolve(category, product_id)?;
        let order = self.orders.create_order(entry).await?;

        info!(
            "Created {} order {} for {}/{}",
            self.orders.provider_name(),
            order.id,
            entry.category,
            entry.product_id
        );
        Ok(order)
    }

    /// Capture a wallet order. The id is not checked locally.
    #[instrument(skip(self))]
    pub async fn capture_order(&self, order_id: &str) -> PaymentResult<serde_json::Value> {
        let capture = self.orders.capture_order(order_id).await?;
        info!("Captured {} order {}", self.orders.provider_name(), order_id);
        Ok(capture)
    }
}
