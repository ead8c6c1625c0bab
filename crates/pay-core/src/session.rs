//! # Provider Resources
//!
//! Identifiers handed back by the providers. Neither resource is stored
//! locally; both are round-tripped through the client.

use serde::{Deserialize, Serialize};

/// Payment status the card provider reports for a settled session
pub const PAID_STATUS: &str = "paid";

/// A hosted checkout session created by the card provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID
    pub session_id: String,

    /// URL to redirect customer to for payment
    pub checkout_url: String,
}

impl CheckoutSession {
    pub fn new(session_id: impl Into<String>, checkout_url: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            checkout_url: checkout_url.into(),
        }
    }
}

/// An order created by the wallet provider, awaiting capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOrder {
    /// Opaque order id issued by the provider
    pub id: String,

    /// Provider-side status (e.g. "CREATED"), when reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ProviderOrder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: None,
        }
    }
}

/// Read `payment_status` out of a raw session payload
pub fn payment_status(session: &serde_json::Value) -> Option<&str> {
    session.get("payment_status").and_then(|v| v.as_str())
}
