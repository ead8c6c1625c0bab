//! # pay-api
//!
//! HTTP API layer for storefront-pay-rs.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/api/stripe` | Create Stripe checkout session, returns `{url}` |
//! | GET | `/api/session/{id}` | Paid Stripe session, verbatim |
//! | POST | `/create-order` | Create PayPal order, returns `{id}` |
//! | POST | `/capture-order` | Capture PayPal order, verbatim |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
