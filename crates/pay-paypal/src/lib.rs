//! # pay-paypal
//!
//! PayPal wallet-payment adapter for storefront-pay-rs.
//!
//! - **AccessTokenProvider** exchanges client credentials for a bearer token
//! - **PayPalOrdersStrategy** creates `CAPTURE` orders from catalog entries
//!   and captures them after buyer approval
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_paypal::PayPalOrdersStrategy;
//! use pay_core::OrderStrategy;
//!
//! let strategy = PayPalOrdersStrategy::from_env()?;
//!
//! let order = strategy.create_order(&entry).await?;
//! // ...buyer approves order.id in the PayPal popup...
//! let capture = strategy.capture_order(&order.id).await?;
//! ```

pub mod config;
pub mod orders;
pub mod token;

pub(crate) const PROVIDER: &str = "paypal";

// Re-exports
pub use config::PayPalConfig;
pub use orders::PayPalOrdersStrategy;
pub use token::{AccessToken, AccessTokenProvider};
