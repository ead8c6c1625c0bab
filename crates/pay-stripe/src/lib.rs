//! # pay-stripe
//!
//! Stripe card-payment adapter for storefront-pay-rs.
//!
//! **StripeCheckoutStrategy** drives the Checkout Sessions API:
//! - one catalog-priced line item per session, one-time `payment` mode
//! - a customer record is always created
//! - sessions are read back with customer details, line items and the
//!   payment intent expanded
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pay_stripe::StripeCheckoutStrategy;
//! use pay_core::CheckoutStrategy;
//!
//! let strategy = StripeCheckoutStrategy::from_env()?;
//!
//! let session = strategy.create_session(
//!     &entry,
//!     "https://example.com/pay?id=1&status=success&session_id={CHECKOUT_SESSION_ID}",
//!     "https://example.com/pay?id=1&status=cancel",
//! ).await?;
//!
//! // Redirect user to session.checkout_url
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::StripeCheckoutStrategy;
pub use config::StripeConfig;
