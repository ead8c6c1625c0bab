use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use pay_api::{create_router, AppConfig, AppState};
use pay_core::{
    Catalog, CatalogEntry, CheckoutSession, CheckoutStrategy, CheckoutUrls, Currency,
    OrderStrategy, PaymentError, PaymentGateway, PaymentResult, ProviderOrder,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

// =============================================================================
// Fake providers
// =============================================================================

#[derive(Default)]
struct FakeStripe {
    sessions: Mutex<Vec<(CatalogEntry, String, String)>>,
    lookups: Mutex<Vec<String>>,
    payment_status: Option<&'static str>,
    down: bool,
}

#[async_trait]
impl CheckoutStrategy for FakeStripe {
    async fn create_session(
        &self,
        entry: &CatalogEntry,
        success_url: &str,
        cancel_url: &str,
    ) -> PaymentResult<CheckoutSession> {
        if self.down {
            return Err(PaymentError::provider("stripe", "Invalid API Key provided"));
        }
        self.sessions.lock().unwrap().push((
            entry.clone(),
            success_url.to_string(),
            cancel_url.to_string(),
        ));
        Ok(CheckoutSession::new(
            "cs_test_a1",
            "https://checkout.stripe.com/c/pay/cs_test_a1",
        ))
    }

    async fn get_session(&self, session_id: &str) -> PaymentResult<Value> {
        self.lookups.lock().unwrap().push(session_id.to_string());
        if self.down {
            return Err(PaymentError::provider("stripe", "HTTP 404: No such checkout.session"));
        }
        Ok(json!({
            "id": session_id,
            "payment_status": self.payment_status,
            "customer_details": { "email": "fan@example.com" },
            "amount_total": 1500
        }))
    }

    fn provider_name(&self) -> &'static str {
        "stripe"
    }
}

#[derive(Default)]
struct FakePayPal {
    orders: Mutex<Vec<CatalogEntry>>,
    captures: Mutex<Vec<String>>,
    down: bool,
}

fn capture_payload(order_id: &str) -> Value {
    json!({
        "id": order_id,
        "status": "COMPLETED",
        "payer": { "payer_id": "QYR5Z8XDVJNXQ", "name": { "given_name": "Ana" } },
        "purchase_units": [{
            "payments": { "captures": [{ "id": "3C679366HH908993F", "amount": { "value": "25.00" } }] }
        }]
    })
}

#[async_trait]
impl OrderStrategy for FakePayPal {
    async fn create_order(&self, entry: &CatalogEntry) -> PaymentResult<ProviderOrder> {
        if self.down {
            return Err(PaymentError::provider("paypal", "token exchange failed with HTTP 401"));
        }
        self.orders.lock().unwrap().push(entry.clone());
        Ok(ProviderOrder::new("5O190127TN364715T"))
    }

    async fn capture_order(&self, order_id: &str) -> PaymentResult<Value> {
        self.captures.lock().unwrap().push(order_id.to_string());
        if self.down {
            return Err(PaymentError::NetworkError("connection reset".into()));
        }
        Ok(capture_payload(order_id))
    }

    fn provider_name(&self) -> &'static str {
        "paypal"
    }
}

fn server(stripe: Arc<FakeStripe>, paypal: Arc<FakePayPal>) -> TestServer {
    let config = AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        checkout_redirect_url: "https://shop.test/Payments".to_string(),
        catalog_path: None,
    };
    let gateway = PaymentGateway::new(
        Catalog::default(),
        stripe,
        paypal,
        CheckoutUrls::new(&config.checkout_redirect_url),
    );
    TestServer::new(create_router(AppState::with_gateway(config, gateway))).unwrap()
}

fn paid(status: Option<&'static str>) -> Arc<FakeStripe> {
    Arc::new(FakeStripe {
        payment_status: status,
        ..Default::default()
    })
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_service() {
    let server = server(Arc::default(), Arc::default());

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

// =============================================================================
// POST /api/stripe
// =============================================================================

#[tokio::test]
async fn stripe_checkout_returns_url() {
    let stripe = Arc::new(FakeStripe::default());
    let server = server(stripe.clone(), Arc::default());

    let response = server
        .post("/api/stripe")
        .json(&json!({ "category": "albums", "productId": 1 }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "url": "https://checkout.stripe.com/c/pay/cs_test_a1" }));

    let sessions = stripe.sessions.lock().unwrap();
    let (entry, success, cancel) = &sessions[0];
    assert_eq!(entry.name, "Album A");
    assert_eq!(entry.unit_amount(Currency::USD).unwrap(), 1500);
    assert_eq!(
        success,
        "https://shop.test/Payments?id=1&status=success&session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(cancel, "https://shop.test/Payments?id=1&status=cancel");
}

#[tokio::test]
async fn stripe_checkout_accepts_string_product_id() {
    let stripe = Arc::new(FakeStripe::default());
    let server = server(stripe.clone(), Arc::default());

    server
        .post("/api/stripe")
        .json(&json!({ "category": "products", "productId": "2" }))
        .await
        .assert_status_ok();

    let sessions = stripe.sessions.lock().unwrap();
    assert_eq!(sessions[0].0.unit_amount(Currency::USD).unwrap(), 1200);
}

#[tokio::test]
async fn stripe_checkout_unknown_product_is_400() {
    let stripe = Arc::new(FakeStripe::default());
    let server = server(stripe.clone(), Arc::default());

    for body in [
        json!({ "category": "vinyl", "productId": 1 }),
        json!({ "category": "albums", "productId": 99 }),
        json!({ "productId": 1 }),
        json!({}),
    ] {
        let response = server.post("/api/stripe").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Producto no encontrado" }));
    }

    assert!(stripe.sessions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn stripe_checkout_provider_failure_is_500() {
    let stripe = Arc::new(FakeStripe {
        down: true,
        ..Default::default()
    });
    let server = server(stripe, Arc::default());

    let response = server
        .post("/api/stripe")
        .json(&json!({ "category": "merch", "productId": 2 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "Invalid API Key provided" }));
}

#[tokio::test]
async fn stripe_checkout_integral_float_product_id() {
    let stripe = Arc::new(FakeStripe::default());
    let server = server(stripe.clone(), Arc::default());

    server
        .post("/api/stripe")
        .text(r#"{ "category": "albums", "productId": 1.0 }"#)
        .content_type("application/json")
        .await
        .assert_status_ok();

    let sessions = stripe.sessions.lock().unwrap();
    assert_eq!(sessions[0].0.name, "Album A");
}

#[tokio::test]
async fn stripe_checkout_non_canonical_product_id_is_400() {
    let stripe = Arc::new(FakeStripe::default());
    let server = server(stripe.clone(), Arc::default());

    for product_id in ["01", "+1", " 1 ", "1.0"] {
        let response = server
            .post("/api/stripe")
            .json(&json!({ "category": "albums", "productId": product_id }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Producto no encontrado" }));
    }

    assert!(stripe.sessions.lock().unwrap().is_empty());
}

// =============================================================================
// GET /api/session/{id}
// =============================================================================

#[tokio::test]
async fn paid_session_is_returned_verbatim() {
    let server = server(paid(Some("paid")), Arc::default());

    let response = server.get("/api/session/cs_test_a1").await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "id": "cs_test_a1",
        "payment_status": "paid",
        "customer_details": { "email": "fan@example.com" },
        "amount_total": 1500
    }));
}

#[tokio::test]
async fn unpaid_session_is_400() {
    for status in [Some("unpaid"), Some("no_payment_required"), None] {
        let stripe = paid(status);
        let server = server(stripe.clone(), Arc::default());

        let response = server.get("/api/session/cs_test_a1").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "pago no procesadu" }));
        assert_eq!(stripe.lookups.lock().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn session_retrieval_failure_is_500() {
    let stripe = Arc::new(FakeStripe {
        down: true,
        ..Default::default()
    });
    let server = server(stripe, Arc::default());

    let response = server.get("/api/session/cs_missing").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({ "error": "no se recuperó la sesión" }));
}

// =============================================================================
// POST /create-order
// =============================================================================

#[tokio::test]
async fn create_order_returns_id() {
    let paypal = Arc::new(FakePayPal::default());
    let server = server(Arc::default(), paypal.clone());

    let response = server
        .post("/create-order")
        .json(&json!({ "category": "merch", "productId": 1 }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({ "id": "5O190127TN364715T" }));
}

#[tokio::test]
async fn create_order_ignores_client_price_and_name() {
    let paypal = Arc::new(FakePayPal::default());
    let server = server(Arc::default(), paypal.clone());

    server
        .post("/create-order")
        .json(&json!({
            "category": "merch",
            "productId": 1,
            "price": 0.01,
            "name": "Free stuff"
        }))
        .await
        .assert_status_ok();

    let orders = paypal.orders.lock().unwrap();
    assert_eq!(orders[0].name, "Camiseta");
    assert_eq!(Currency::USD.format_amount(orders[0].price), "25.00");
}

#[tokio::test]
async fn create_order_unknown_product_is_plain_400() {
    let paypal = Arc::new(FakePayPal::default());
    let server = server(Arc::default(), paypal.clone());

    let response = server
        .post("/create-order")
        .json(&json!({ "category": "albums", "productId": 5 }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_text("Producto no válido");
    assert!(paypal.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_order_malformed_body_is_400() {
    let paypal = Arc::new(FakePayPal::default());
    let server = server(Arc::default(), paypal.clone());

    let response = server
        .post("/create-order")
        .text("{not json")
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_text("Producto no válido");
    assert!(paypal.orders.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_order_provider_failure_is_plain_500() {
    let paypal = Arc::new(FakePayPal {
        down: true,
        ..Default::default()
    });
    let server = server(Arc::default(), paypal);

    let response = server
        .post("/create-order")
        .json(&json!({ "category": "products", "productId": 1 }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_text("Error creando la orden");
}

// =============================================================================
// POST /capture-order
// =============================================================================

#[tokio::test]
async fn capture_forwards_provider_payload() {
    let paypal = Arc::new(FakePayPal::default());
    let server = server(Arc::default(), paypal.clone());

    let response = server
        .post("/capture-order")
        .json(&json!({ "orderID": "5O190127TN364715T" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&capture_payload("5O190127TN364715T"));
    assert_eq!(*paypal.captures.lock().unwrap(), vec!["5O190127TN364715T".to_string()]);
}

#[tokio::test]
async fn capture_accepts_numeric_order_id() {
    let paypal = Arc::new(FakePayPal::default());
    let server = server(Arc::default(), paypal.clone());

    let response = server
        .post("/capture-order")
        .json(&json!({ "orderID": 12345 }))
        .await;

    response.assert_status_ok();
    assert_eq!(*paypal.captures.lock().unwrap(), vec!["12345".to_string()]);
}

#[tokio::test]
async fn capture_failure_is_plain_500() {
    let paypal = Arc::new(FakePayPal {
        down: true,
        ..Default::default()
    });
    let server = server(Arc::default(), paypal);

    let response = server
        .post("/capture-order")
        .json(&json!({ "orderID": "5O190127TN364715T" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_text("Error capturando el pago");
}

#[tokio::test]
async fn capture_without_order_id_skips_provider() {
    let paypal = Arc::new(FakePayPal::default());
    let server = server(Arc::default(), paypal.clone());

    let response = server.post("/capture-order").json(&json!({})).await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_text("Error capturando el pago");
    assert!(paypal.captures.lock().unwrap().is_empty());
}
