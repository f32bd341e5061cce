//! Integration tests for the checkout wizard.
//!
//! These tests drive a guest checkout end to end against a mock backend:
//! stage navigation, shipping methods, failed and successful submissions.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;
use storefront_sdk::cart::Cart;
use storefront_sdk::checkout::{CheckoutData, CheckoutError, CheckoutStage, CheckoutWizard};
use storefront_sdk::models::{CartEntry, PaymentMethod, Product};
use storefront_sdk::notify::{MemoryNotifier, NoticeLevel};
use storefront_sdk::storage::{KeyValueStore, MemoryStore, CART_KEY, CHECKOUT_DATA_KEY};
use storefront_sdk::{ApiBaseUrl, HttpClient, HttpError, StorefrontConfig, UserSession};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Harness {
    server: MockServer,
    config: StorefrontConfig,
    client: Arc<HttpClient>,
    store: Arc<MemoryStore>,
    notifier: Arc<MemoryNotifier>,
}

async fn setup() -> Harness {
    let server = MockServer::start().await;
    let config = StorefrontConfig::builder()
        .api_base_url(ApiBaseUrl::new(server.uri()).unwrap())
        .build()
        .unwrap();
    let store = Arc::new(MemoryStore::new());
    let client = Arc::new(HttpClient::new(&config, store.clone()).unwrap());
    Harness {
        server,
        config,
        client,
        store,
        notifier: Arc::new(MemoryNotifier::new()),
    }
}

impl Harness {
    fn session(&self) -> UserSession {
        UserSession::new(self.client.clone(), self.notifier.clone())
    }

    /// A guest cart holding two units at 10.
    async fn cart(&self) -> Cart {
        let mut cart = Cart::new(self.client.clone(), self.notifier.clone(), &self.config);
        let product = Product {
            id: "a".into(),
            name: "Linen Shirt".into(),
            price: Decimal::from(10),
            ..Product::default()
        };
        cart.add(CartEntry::for_product(&product, "M", 2)).await.unwrap();
        cart
    }

    fn wizard(&self, cart: &Cart, session: &UserSession) -> CheckoutWizard {
        CheckoutWizard::open(
            self.client.clone(),
            self.notifier.clone(),
            &self.config,
            cart,
            session,
        )
        .unwrap()
    }
}

fn fill(wizard: &mut CheckoutWizard) {
    let form = wizard.form_mut();
    form.first_name = "Jane".into();
    form.last_name = "Doe".into();
    form.email = "jane@example.com".into();
    form.phone = "555-0100".into();
    form.street = "1 Main St".into();
    form.city = "Springfield".into();
    form.state = "IL".into();
    form.postal_code = "62701".into();
    form.country = "US".into();
}

fn to_review(wizard: &mut CheckoutWizard) {
    fill(wizard);
    assert_eq!(wizard.next().unwrap(), CheckoutStage::Payment);
    assert_eq!(wizard.next().unwrap(), CheckoutStage::Review);
}

// ============================================================================
// Opening and Navigation
// ============================================================================

#[tokio::test]
async fn test_empty_cart_cannot_open_checkout() {
    let h = setup().await;
    let cart = Cart::new(h.client.clone(), h.notifier.clone(), &h.config);

    let result = CheckoutWizard::open(
        h.client.clone(),
        h.notifier.clone(),
        &h.config,
        &cart,
        &h.session(),
    );

    assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    let notice = h.notifier.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Your cart is empty");
}

#[tokio::test]
async fn test_shipping_stage_blocks_on_invalid_form() {
    let h = setup().await;
    let cart = h.cart().await;
    let mut wizard = h.wizard(&cart, &h.session());

    let err = wizard.next().unwrap_err();
    assert!(matches!(err, CheckoutError::InvalidForm { .. }));
    assert_eq!(wizard.stage(), CheckoutStage::Shipping);
    assert_eq!(wizard.field_errors()["firstName"], "First name is required");

    fill(&mut wizard);
    wizard.form_mut().email = "not-an-email".into();
    wizard.next().unwrap_err();
    assert_eq!(wizard.field_errors().len(), 1);
    assert_eq!(wizard.field_errors()["email"], "Please enter a valid email address");

    wizard.form_mut().email = "jane@example.com".into();
    assert_eq!(wizard.next().unwrap(), CheckoutStage::Payment);
    assert!(wizard.field_errors().is_empty());

    assert_eq!(wizard.back(), CheckoutStage::Shipping);
    assert_eq!(wizard.back(), CheckoutStage::Shipping);
}

#[tokio::test]
async fn test_submit_outside_review_is_rejected() {
    let h = setup().await;
    let mut cart = h.cart().await;
    let session = h.session();
    let mut wizard = h.wizard(&cart, &session);

    let err = wizard.submit(&mut cart, &session).await.unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::NotReady {
            stage: CheckoutStage::Shipping
        }
    ));
}

#[tokio::test]
async fn test_handoff_from_cart_view_is_picked_up() {
    let h = setup().await;
    let cart = h.cart().await;
    CheckoutData::from_cart(&cart, &h.config)
        .stash(h.store.as_ref())
        .unwrap();

    let wizard = h.wizard(&cart, &h.session());
    let handoff = wizard.handoff().unwrap();

    assert_eq!(handoff.items.len(), 1);
    assert_eq!(handoff.summary.subtotal, Decimal::from(20));
    assert_eq!(handoff.summary.shipping, Decimal::from(10));
    assert_eq!(handoff.summary.total, Decimal::from(32));
}

// ============================================================================
// Shipping Methods
// ============================================================================

#[tokio::test]
async fn test_backend_shipping_methods_replace_defaults() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/shipping-methods"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shippingMethods": [
                {"_id": "pickup", "name": "Store Pickup", "price": 0, "deliveryTime": "Same day", "isFree": true},
                {"_id": "courier", "name": "Courier", "price": 7.5, "deliveryTime": "Next day", "isFree": false}
            ]
        })))
        .mount(&h.server)
        .await;

    let cart = h.cart().await;
    let mut wizard = h.wizard(&cart, &h.session());
    assert_eq!(wizard.selected_shipping().id, "standard");

    wizard.refresh_shipping_methods().await;
    assert_eq!(wizard.shipping_methods().len(), 2);
    assert_eq!(wizard.selected_shipping().id, "pickup");

    wizard.select_shipping("courier").unwrap();
    let summary = wizard.summary(&cart);
    assert_eq!(summary.shipping, Decimal::new(75, 1));
    assert_eq!(summary.tax, Decimal::from(2));
    assert_eq!(summary.total, Decimal::new(2950, 2));
}

#[tokio::test]
async fn test_shipping_methods_fall_back_to_defaults() {
    let h = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/shipping-methods"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&h.server)
        .await;

    let cart = h.cart().await;
    let mut wizard = h.wizard(&cart, &h.session());
    wizard.select_shipping("express").unwrap();
    wizard.refresh_shipping_methods().await;

    assert_eq!(wizard.shipping_methods().len(), 3);
    assert_eq!(wizard.selected_shipping().id, "express");
    assert!(matches!(
        wizard.select_shipping("teleport"),
        Err(CheckoutError::UnknownShippingMethod { .. })
    ));
    assert_eq!(wizard.selected_shipping().id, "express");
}

// ============================================================================
// Submission
// ============================================================================

#[tokio::test]
async fn test_failed_order_keeps_cart_and_stays_on_review() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Invalid email",
            "errors": {"customerEmail": "Email is already used by another account"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut cart = h.cart().await;
    let session = h.session();
    let mut wizard = h.wizard(&cart, &session);
    to_review(&mut wizard);

    let err = wizard.submit(&mut cart, &session).await.unwrap_err();

    assert!(matches!(err, CheckoutError::Http(HttpError::Validation { .. })));
    assert_eq!(wizard.stage(), CheckoutStage::Review);
    assert_eq!(wizard.last_error(), Some("Invalid email"));
    assert_eq!(
        wizard.field_errors()["email"],
        "Email is already used by another account"
    );
    assert!(!wizard.is_submitting());

    assert_eq!(cart.count(), 2);
    assert!(h.store.get(CART_KEY).unwrap().is_some());
    assert_eq!(h.notifier.last().unwrap().message, "Invalid email");
}

#[tokio::test]
async fn test_successful_order_empties_cart() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_partial_json(json!({
            "paymentMethod": "cod",
            "shippingMethod": "standard",
            "itemsPrice": 20.0,
            "shippingPrice": 5.99,
            "taxPrice": 2.0,
            "totalPrice": 27.99,
            "customerName": "Jane Doe",
            "customerEmail": "jane@example.com",
            "shippingAddress": {"street": "1 Main St", "city": "Springfield"},
            "orderItems": [{"product": "a", "quantity": 2, "price": 10.0, "size": "M"}]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "order": {"_id": "65f0c0ffee1234567890abcd", "totalPrice": 27.99, "status": "processing"}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut cart = h.cart().await;
    CheckoutData::from_cart(&cart, &h.config)
        .stash(h.store.as_ref())
        .unwrap();
    let session = h.session();
    let mut wizard = h.wizard(&cart, &session);
    to_review(&mut wizard);
    wizard.set_payment_method(PaymentMethod::Cod);

    let confirmation = wizard.submit(&mut cart, &session).await.unwrap();

    assert_eq!(confirmation.order.short_id(), "90abcd");
    assert_eq!(confirmation.summary.total, Decimal::new(2799, 2));
    assert_eq!(confirmation.shipping_method.id, "standard");

    assert!(cart.is_empty());
    assert!(h.store.get(CART_KEY).unwrap().is_none());
    assert!(h.store.get(CHECKOUT_DATA_KEY).unwrap().is_none());
    assert!(wizard.handoff().is_none());
    assert_eq!(h.notifier.last().unwrap().message, "Order placed successfully!");

    let err = wizard.submit(&mut cart, &session).await.unwrap_err();
    assert!(matches!(err, CheckoutError::AlreadySubmitted));
}

#[tokio::test]
async fn test_retry_after_failure_places_order_once() {
    let h = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({"message": "Payment gateway unavailable"})))
        .up_to_n_times(1)
        .expect(1)
        .mount(&h.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "order": {"_id": "o-2", "totalPrice": 27.99}
        })))
        .expect(1)
        .mount(&h.server)
        .await;

    let mut cart = h.cart().await;
    let session = h.session();
    let mut wizard = h.wizard(&cart, &session);
    to_review(&mut wizard);

    wizard.submit(&mut cart, &session).await.unwrap_err();
    assert_eq!(wizard.last_error(), Some("Payment gateway unavailable"));
    assert!(!wizard.is_submitting());
    assert_eq!(cart.count(), 2);

    let confirmation = wizard.submit(&mut cart, &session).await.unwrap();
    assert_eq!(confirmation.order.id, "o-2");
    assert!(wizard.last_error().is_none());
    assert!(cart.is_empty());
}

#[tokio::test]
async fn test_signed_in_customer_prefills_form() {
    let h = setup().await;
    h.store
        .set(storefront_sdk::storage::USER_TOKEN_KEY, "user-token")
        .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {
                "_id": "u1",
                "name": "Jane Q Doe",
                "email": "jane@example.com",
                "phone": "555-0100",
                "address": {"street": "1 Main St", "city": "Springfield", "state": "IL", "zipCode": "62701", "country": "US"}
            }
        })))
        .mount(&h.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"product": {"_id": "a", "name": "Linen Shirt", "price": 10}, "quantity": 1, "size": "M"}]
        })))
        .mount(&h.server)
        .await;

    let mut session = h.session();
    session.check_auth().await.unwrap();
    let mut cart = Cart::new(h.client.clone(), h.notifier.clone(), &h.config);
    cart.sync_session(&session).await.unwrap();

    let mut wizard = h.wizard(&cart, &session);
    let form = wizard.form();
    assert_eq!(form.first_name, "Jane");
    assert_eq!(form.last_name, "Q Doe");
    assert_eq!(form.postal_code, "62701");

    assert_eq!(wizard.next().unwrap(), CheckoutStage::Payment);
}
