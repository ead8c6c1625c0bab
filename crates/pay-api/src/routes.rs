//! # Routes
//!
//! Axum router configuration for the payment API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - Card provider:
///   - POST /api/stripe - Create hosted checkout session
///   - GET  /api/session/{id} - Read back a paid session
///
/// - Wallet provider:
///   - POST /create-order - Create order
///   - POST /capture-order - Capture approved order
///
/// - Health:
///   - GET /health, GET /
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from a different origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let stripe_routes = Router::new()
        .route("/stripe", post(handlers::create_stripe_session))
        .route("/session/{id}", get(handlers::get_session));

    let paypal_routes = Router::new()
        .route("/create-order", post(handlers::create_order))
        .route("/capture-order", post(handlers::capture_order));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api", stripe_routes)
        .merge(paypal_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}
