//! # Request Handlers
//!
//! Axum request handlers for the payment API.
//!
//! The card endpoints answer errors as JSON `{ "error": ... }`; the wallet
//! endpoints answer errors as plain text. Existing storefront clients rely on
//! both shapes and on the exact message strings below.

use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use pay_core::PaymentError;
use serde::{Deserialize, Serialize};
use tracing::{error, instrument, warn};

const PRODUCT_NOT_FOUND: &str = "Producto no encontrado";
const PAYMENT_NOT_PROCESSED: &str = "pago no procesadu";
const SESSION_NOT_RETRIEVED: &str = "no se recuperó la sesión";
const INVALID_PRODUCT: &str = "Producto no válido";
const ORDER_CREATION_FAILED: &str = "Error creando la orden";
const CAPTURE_FAILED: &str = "Error capturando el pago";

// =============================================================================
// Request/Response Types
// =============================================================================

/// Body of both product checkout endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub category: Option<String>,
    /// Number or numeric string
    #[serde(rename = "productId", default)]
    pub product_id: Option<serde_json::Value>,
}

impl ProductRequest {
    fn category(&self) -> &str {
        self.category.as_deref().unwrap_or_default()
    }

    fn product_id(&self) -> String {
        self.product_id
            .as_ref()
            .and_then(scalar_key)
            .unwrap_or_default()
    }
}

/// Body of `POST /capture-order`
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    /// String or number, forwarded as text
    #[serde(rename = "orderID", default)]
    pub order_id: Option<serde_json::Value>,
}

impl CaptureRequest {
    fn order_id(&self) -> Option<String> {
        self.order_id.as_ref().and_then(scalar_key)
    }
}

/// Text key for a JSON string or number. Integral numbers use their
/// integer form, so `1.0` and `1` name the same key.
fn scalar_key(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(number_key(n)),
        _ => None,
    }
}

fn number_key(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_u64() {
        return i.to_string();
    }
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}

/// Hosted checkout redirect
#[derive(Debug, Serialize)]
pub struct CheckoutUrlResponse {
    pub url: String,
}

/// Wallet order created
#[derive(Debug, Serialize)]
pub struct OrderCreatedResponse {
    pub id: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

type JsonError = (StatusCode, Json<ErrorResponse>);
type TextError = (StatusCode, &'static str);

fn status_of(err: &PaymentError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Malformed bodies are treated like an empty body
fn product_request(body: Result<Json<ProductRequest>, JsonRejection>) -> ProductRequest {
    match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!("Unreadable request body: {}", rejection);
            ProductRequest::default()
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-pay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// `POST /api/stripe` - create a hosted card checkout session
#[instrument(skip(state, body))]
pub async fn create_stripe_session(
    State(state): State<AppState>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<CheckoutUrlResponse>, JsonError> {
    let request = product_request(body);

    let session = state
        .gateway
        .create_session(request.category(), &request.product_id())
        .await
        .map_err(|e| match e {
            PaymentError::InvalidProduct { .. } => {
                warn!("Stripe checkout rejected: {}", e);
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(PRODUCT_NOT_FOUND)))
            }
            PaymentError::ProviderError { message, .. } => {
                error!("Error en Stripe: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(message)))
            }
            other => {
                error!("Error en Stripe: {}", other);
                (status_of(&other), Json(ErrorResponse::new(other.to_string())))
            }
        })?;

    Ok(Json(CheckoutUrlResponse {
        url: session.checkout_url,
    }))
}

/// `GET /api/session/{id}` - return a session only once it is paid
#[instrument(skip(state))]
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>, JsonError> {
    let session = state.gateway.get_session(&session_id).await.map_err(|e| match e {
        PaymentError::PaymentNotCompleted { .. } => {
            warn!("{}", e);
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(PAYMENT_NOT_PROCESSED)))
        }
        other => {
            error!("Failed to retrieve session {}: {}", session_id, other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(SESSION_NOT_RETRIEVED)),
            )
        }
    })?;

    Ok(Json(session))
}

/// `POST /create-order` - create a wallet order
#[instrument(skip(state, body))]
pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<OrderCreatedResponse>, TextError> {
    let request = product_request(body);

    let order = state
        .gateway
        .create_order(request.category(), &request.product_id())
        .await
        .map_err(|e| match e {
            PaymentError::InvalidProduct { .. } => {
                warn!("Order rejected: {}", e);
                (StatusCode::BAD_REQUEST, INVALID_PRODUCT)
            }
            other => {
                error!("Failed to create order: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, ORDER_CREATION_FAILED)
            }
        })?;

    Ok(Json(OrderCreatedResponse { id: order.id }))
}

/// `POST /capture-order` - capture an approved wallet order, payload passed through
#[instrument(skip(state, body))]
pub async fn capture_order(
    State(state): State<AppState>,
    body: Result<Json<CaptureRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, TextError> {
    let order_id = match body {
        Ok(Json(request)) => match request.order_id() {
            Some(id) => id,
            None => {
                error!("Capture requested without orderID");
                return Err((StatusCode::INTERNAL_SERVER_ERROR, CAPTURE_FAILED));
            }
        },
        Err(rejection) => {
            error!("Unreadable capture body: {}", rejection);
            return Err((StatusCode::INTERNAL_SERVER_ERROR, CAPTURE_FAILED));
        }
    };

    let capture = state.gateway.capture_order(&order_id).await.map_err(|e| {
        error!("Failed to capture order {}: {}", order_id, e);
        (StatusCode::INTERNAL_SERVER_ERROR, CAPTURE_FAILED)
    })?;

    Ok(Json(capture))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_id_forms() {
        let numeric: ProductRequest =
            serde_json::from_value(json!({ "category": "albums", "productId": 2 })).unwrap();
        assert_eq!(numeric.category(), "albums");
        assert_eq!(numeric.product_id(), "2");

        let text: ProductRequest =
            serde_json::from_value(json!({ "category": "albums", "productId": "2" })).unwrap();
        assert_eq!(text.product_id(), "2");

        let missing: ProductRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.category(), "");
        assert_eq!(missing.product_id(), "");

        let odd: ProductRequest =
            serde_json::from_value(json!({ "category": "albums", "productId": [1] })).unwrap();
        assert_eq!(odd.product_id(), "");
    }

    #[test]
    fn test_integral_float_product_id() {
        let float: ProductRequest =
            serde_json::from_str(r#"{ "category": "albums", "productId": 1.0 }"#).unwrap();
        assert_eq!(float.product_id(), "1");

        let fractional: ProductRequest =
            serde_json::from_str(r#"{ "category": "albums", "productId": 1.5 }"#).unwrap();
        assert_eq!(fractional.product_id(), "1.5");

        let padded: ProductRequest =
            serde_json::from_value(json!({ "category": "albums", "productId": "01" })).unwrap();
        assert_eq!(padded.product_id(), "01");
    }

    #[test]
    fn test_order_id_forms() {
        let text: CaptureRequest = serde_json::from_value(json!({ "orderID": "5O19" })).unwrap();
        assert_eq!(text.order_id().as_deref(), Some("5O19"));

        let numeric: CaptureRequest = serde_json::from_value(json!({ "orderID": 12345 })).unwrap();
        assert_eq!(numeric.order_id().as_deref(), Some("12345"));

        let missing: CaptureRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing.order_id(), None);

        let object: CaptureRequest =
            serde_json::from_value(json!({ "orderID": { "id": "x" } })).unwrap();
        assert_eq!(object.order_id(), None);
    }

    #[test]
    fn test_status_of() {
        let err = PaymentError::invalid_product("albums", "9");
        assert_eq!(status_of(&err), StatusCode::BAD_REQUEST);

        let err = PaymentError::provider("stripe", "down");
        assert_eq!(status_of(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
