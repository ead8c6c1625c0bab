//! # Application State
//!
//! Shared state for the Axum application.
//! Built once at startup and handed to every handler.

use pay_core::{Catalog, CheckoutUrls, PaymentGateway};
use pay_paypal::PayPalOrdersStrategy;
use pay_stripe::StripeCheckoutStrategy;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Storefront page the card provider redirects back to
    pub checkout_redirect_url: String,
    /// Explicit catalog file, if any
    pub catalog_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            checkout_redirect_url: std::env::var("CHECKOUT_REDIRECT_URL")
                .unwrap_or_else(|_| CheckoutUrls::default().return_url),
            catalog_path: std::env::var_os("CATALOG_PATH").map(PathBuf::from),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Catalog plus both provider strategies
    pub gateway: Arc<PaymentGateway>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState with Stripe and PayPal configured from the environment
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let catalog = load_catalog(config.catalog_path.as_deref())?;

        let checkout = StripeCheckoutStrategy::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;
        let orders = PayPalOrdersStrategy::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize PayPal: {}", e))?;

        let gateway = PaymentGateway::new(
            catalog,
            Arc::new(checkout),
            Arc::new(orders),
            CheckoutUrls::new(&config.checkout_redirect_url),
        );

        Ok(Self::with_gateway(config, gateway))
    }

    /// Assemble state from an already-built gateway
    pub fn with_gateway(config: AppConfig, gateway: PaymentGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            config,
        }
    }
}

/// Load the catalog: explicit path, then `config/catalog.toml`, then the built-in table
pub fn load_catalog(explicit: Option<&Path>) -> anyhow::Result<Catalog> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
        let catalog = Catalog::from_toml(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
        tracing::info!("Loaded {} catalog entries from {}", catalog.len(), path.display());
        return Ok(catalog);
    }

    let config_paths = [
        "config/catalog.toml",
        "../config/catalog.toml",
        "../../config/catalog.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let catalog = Catalog::from_toml(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded {} catalog entries from {}", catalog.len(), path);
            return Ok(catalog);
        }
    }

    tracing::warn!("No catalog file found, using built-in catalog");
    Ok(Catalog::default())
}
