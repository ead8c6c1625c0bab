//! # Storefront Pay
//!
//! Checkout backend for the artist storefront: Stripe hosted checkout and
//! PayPal orders, priced from a server-side catalog.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export PAYPAL_API=https://api-m.sandbox.paypal.com
//! export PAYPAL_CLIENT_ID=...
//! export PAYPAL_SECRET=...
//!
//! # Run the server
//! storefront-pay
//! ```

use pay_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Catalog entries: {}", state.gateway.catalog().len());
    info!("Payment providers: {:?}", state.gateway.providers());

    let app = routes::create_router(state);

    info!("Servidor backend en http://{}", addr);

    if !is_prod {
        info!("💳 Stripe: POST http://{}/api/stripe", addr);
        info!("🅿️  PayPal: POST http://{}/create-order", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` filters, `LOG_FORMAT=json` switches to structured output
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}
