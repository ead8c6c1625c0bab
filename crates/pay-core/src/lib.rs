//! # pay-core
//!
//! Core types and traits for the storefront payment proxy.
//!
//! This crate provides:
//! - `Catalog` and `CatalogEntry`, the only source of names and prices
//! - `CheckoutStrategy` / `OrderStrategy` traits for the card and wallet providers
//! - `PaymentGateway`, which resolves products before any provider call
//! - `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use pay_core::{Catalog, CheckoutUrls, PaymentGateway};
//!
//! let gateway = PaymentGateway::new(Catalog::default(), cards, wallet, CheckoutUrls::default());
//!
//! // Card flow: redirect the customer to session.checkout_url
//! let session = gateway.create_session("albums", "1").await?;
//!
//! // Wallet flow: the client approves the order, then we capture it
//! let order = gateway.create_order("merch", "2").await?;
//! let capture = gateway.capture_order(&order.id).await?;
//! ```

pub mod catalog;
pub mod error;
pub mod gateway;
pub mod session;
pub mod strategy;

// Re-exports for convenience
pub use catalog::{Catalog, CatalogEntry, Category, Currency};
pub use error::{PaymentError, PaymentResult};
pub use gateway::PaymentGateway;
pub use session::{payment_status, CheckoutSession, ProviderOrder, PAID_STATUS};
pub use strategy::{
    BoxedCheckoutStrategy, BoxedOrderStrategy, CheckoutStrategy, CheckoutUrls, OrderStrategy,
    SESSION_ID_PLACEHOLDER,
};
