//! # Payment Error Types
//!
//! Typed error handling for the storefront payment proxy.
//! All catalog and provider operations return `Result<T, PaymentError>`.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid catalog)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Unknown category, or product id absent within the category
    #[error("Product not found: {category}/{product_id}")]
    InvalidProduct {
        category: String,
        product_id: String,
    },

    /// Checkout session exists but has not been paid
    #[error("Payment not completed for session {session_id}: {payment_status}")]
    PaymentNotCompleted {
        session_id: String,
        payment_status: String,
    },

    /// Payment provider answered with a non-2xx status
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Provider response could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Build an `InvalidProduct` from whatever the client sent
    pub fn invalid_product(category: impl Into<String>, product_id: impl Into<String>) -> Self {
        PaymentError::InvalidProduct {
            category: category.into(),
            product_id: product_id.into(),
        }
    }

    /// Shorthand for a `ProviderError`
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        PaymentError::ProviderError {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns true if the failure happened while talking to a provider
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            PaymentError::ProviderError { .. }
                | PaymentError::NetworkError(_)
                | PaymentError::Serialization(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidProduct { .. } => 400,
            PaymentError::PaymentNotCompleted { .. } => 400,
            PaymentError::ProviderError { .. } => 500,
            PaymentError::NetworkError(_) => 500,
            PaymentError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
