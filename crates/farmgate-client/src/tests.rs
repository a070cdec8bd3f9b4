//! Tests for the API client, wire types, and cart aggregate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::float_cmp)]

use std::sync::Arc;

use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;

use farmgate_core::role::Role;
use farmgate_core::session::{Session, SessionStore};

use crate::cart::Cart;
use crate::client::{server_message, ApiClient};
use crate::error::ApiError;
use crate::types::{
    CartLine, CartUpdate, NewAccount, Order, OrderStatus, PendingPage, Product, ProductPatch,
    Statistics, UserDetails, UsersPage,
};

fn store_in(dir: &tempfile::TempDir) -> Arc<SessionStore> {
    Arc::new(SessionStore::open(dir.path().join("session.json")))
}

fn client_with(store: Arc<SessionStore>) -> ApiClient {
    ApiClient::new("http://localhost:5000", store).unwrap()
}

fn customer_session() -> Session {
    Session {
        token: "tok-abc".into(),
        user_id: 3,
        role: Role::Customer,
    }
}

// =============================================================================
// Client construction tests
// =============================================================================

#[test]
fn empty_base_url_returns_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ApiClient::new("", store_in(&dir)).unwrap_err();
    assert!(matches!(err, ApiError::Config(_)));
}

#[test]
fn trailing_slash_stripped_from_base_url() {
    let dir = tempfile::tempdir().unwrap();
    let client = ApiClient::new("http://localhost:5000/", store_in(&dir)).unwrap();
    assert_eq!(client.api_url("/products"), "http://localhost:5000/api/products");
}

#[test]
fn api_url_constructed_correctly() {
    let dir = tempfile::tempdir().unwrap();
    let client = client_with(store_in(&dir));
    assert_eq!(client.api_url("/cart/7"), "http://localhost:5000/api/cart/7");
    assert_eq!(
        client.api_url("/admin/products/12/validate"),
        "http://localhost:5000/api/admin/products/12/validate"
    );
}

// =============================================================================
// Bearer injection and the 401 interceptor
// =============================================================================

#[test]
fn no_session_means_no_authorization_header() {
    let dir = tempfile::tempdir().unwrap();
    let client = client_with(store_in(&dir));
    let req = client
        .authed(reqwest::Client::new().get("http://localhost:5000/api/cart"))
        .build()
        .unwrap();
    assert!(req.headers().get(AUTHORIZATION).is_none());
}

#[test]
fn session_token_is_attached_as_bearer() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.establish(customer_session()).unwrap();
    let client = client_with(store);
    let req = client
        .authed(reqwest::Client::new().get("http://localhost:5000/api/cart"))
        .build()
        .unwrap();
    let header = req.headers().get(AUTHORIZATION).unwrap();
    assert_eq!(header.to_str().unwrap(), "Bearer tok-abc");
}

#[test]
fn unauthorized_clears_session_and_strips_bearer() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.establish(customer_session()).unwrap();
    let client = client_with(Arc::clone(&store));

    let err = client.error_for(StatusCode::UNAUTHORIZED, "");
    assert!(matches!(err, ApiError::Unauthorized));
    assert!(store.current().is_none());

    // Subsequent requests carry no Authorization header.
    let req = client
        .authed(reqwest::Client::new().get("http://localhost:5000/api/orders"))
        .build()
        .unwrap();
    assert!(req.headers().get(AUTHORIZATION).is_none());
}

#[test]
fn rejection_carries_status_and_server_message() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    store.establish(customer_session()).unwrap();
    let client = client_with(Arc::clone(&store));

    let err = client.error_for(StatusCode::BAD_REQUEST, r#"{"error":"Stock insuffisant"}"#);
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Stock insuffisant");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    // Business rejections leave the session alone.
    assert!(store.current().is_some());
    assert!(client
        .error_for(StatusCode::BAD_REQUEST, "{}")
        .is_rejection());
}

#[test]
fn server_message_falls_back_to_raw_body() {
    assert_eq!(server_message(r#"{"error":"Panier vide"}"#), "Panier vide");
    assert_eq!(server_message("Internal Server Error"), "Internal Server Error");
    assert_eq!(server_message(""), "");
}

// =============================================================================
// Deserialization tests
// =============================================================================

#[test]
fn deserialize_product_full() {
    let json = r#"{
        "id": 4,
        "name": "Tomates",
        "description": "Tomates bio",
        "price": 2.5,
        "quantity": 120,
        "unit": "kg",
        "seller_id": 9,
        "peeling_available": true,
        "peeling_price": 0.5,
        "image_data": "aGVsbG8=",
        "validated_by_admin": true,
        "validation_date": "2026-03-01T10:00:00"
    }"#;
    let p: Product = serde_json::from_str(json).unwrap();
    assert_eq!(p.id, 4);
    assert_eq!(p.unit, "kg");
    assert!(p.peeling_available);
    assert!(p.purchasable());
}

#[test]
fn deserialize_product_minimal_is_not_purchasable() {
    let json = r#"{
        "id": 5,
        "name": "Oignons",
        "price": 1.2,
        "quantity": 40,
        "unit": "kg",
        "seller_id": 9
    }"#;
    let p: Product = serde_json::from_str(json).unwrap();
    assert!(p.description.is_none());
    assert!(p.image_data.is_none());
    assert!(!p.validated_by_admin);
    assert!(!p.purchasable());
}

#[test]
fn validated_product_without_stock_is_not_purchasable() {
    let json = r#"{
        "id": 6,
        "name": "Fraises",
        "price": 4.0,
        "quantity": 0,
        "unit": "barquette",
        "seller_id": 2,
        "validated_by_admin": true
    }"#;
    let p: Product = serde_json::from_str(json).unwrap();
    assert!(!p.purchasable());
}

#[test]
fn deserialize_cart_line() {
    let json = r#"{
        "id": 11,
        "product_id": 4,
        "product_name": "Tomates",
        "quantity": 3,
        "price_per_unit": 2.5,
        "total_price": 7.5,
        "seller_name": "Ferme du Nord",
        "created_at": "2026-03-02T08:30:00"
    }"#;
    let line: CartLine = serde_json::from_str(json).unwrap();
    assert_eq!(line.quantity, 3);
    assert_eq!(line.total_price, 7.5);
    assert_eq!(line.seller_name, "Ferme du Nord");
}

#[test]
fn deserialize_order_with_status() {
    let json = r#"{
        "id": 21,
        "product_id": 4,
        "quantity": 2,
        "total_price": 6.0,
        "peeling_requested": true,
        "status": "shipped",
        "delivery_address": "12 rue des Lilas",
        "created_at": "2026-03-03T09:00:00"
    }"#;
    let order: Order = serde_json::from_str(json).unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);
    assert!(order.peeling_requested);
}

#[test]
fn unknown_order_status_is_rejected() {
    let json = r#"{
        "id": 21,
        "product_id": 4,
        "quantity": 2,
        "total_price": 6.0,
        "status": "awaiting_payment",
        "delivery_address": "12 rue des Lilas",
        "created_at": "2026-03-03T09:00:00"
    }"#;
    assert!(serde_json::from_str::<Order>(json).is_err());
}

#[test]
fn deserialize_pending_page() {
    let json = r#"{
        "products": [{
            "id": 7,
            "name": "Carottes",
            "price": 1.8,
            "quantity": 60,
            "unit": "kg",
            "seller_id": 9,
            "seller_name": "Ferme du Nord",
            "created_at": "2026-03-01T07:00:00"
        }],
        "total_pages": 3,
        "current_page": 1,
        "total_products": 25
    }"#;
    let page: PendingPage = serde_json::from_str(json).unwrap();
    assert_eq!(page.products.len(), 1);
    assert_eq!(page.products[0].seller_name, "Ferme du Nord");
    assert_eq!(page.total_pages, 3);
}

#[test]
fn deserialize_statistics_ignores_unknown_fields() {
    // The backend also reports a legacy "merchants" count; unknown
    // fields are skipped.
    let json = r#"{
        "users": {"total": 40, "farmers": 12, "merchants": 3, "customers": 25},
        "sales": {
            "total_orders": 90,
            "total_revenue": 1234.5,
            "orders_by_status": {"pending": 10, "delivered": 70},
            "monthly": {"revenue": 200.0, "orders": 14}
        },
        "top_sellers": [
            {"name": "Ferme du Nord", "total_orders": 30, "total_sales": 600.0}
        ]
    }"#;
    let stats: Statistics = serde_json::from_str(json).unwrap();
    assert_eq!(stats.users.farmers, 12);
    assert_eq!(stats.sales.orders_by_status["delivered"], 70);
    assert_eq!(stats.top_sellers[0].name, "Ferme du Nord");
}

#[test]
fn deserialize_users_page() {
    let json = r#"{
        "users": [{
            "id": 9,
            "email": "ferme@nord.fr",
            "name": "Ferme du Nord",
            "user_type": "farmer",
            "phone": "0600000000",
            "address": "Route des Champs",
            "created_at": "2026-01-15T12:00:00",
            "active": false
        }, {
            "id": 3,
            "email": "client@mail.fr",
            "name": "Claire",
            "user_type": "customer",
            "created_at": "2026-02-01T09:00:00"
        }],
        "total_pages": 2,
        "current_page": 1,
        "total_users": 17
    }"#;
    let page: UsersPage = serde_json::from_str(json).unwrap();
    assert_eq!(page.users.len(), 2);
    assert_eq!(page.users[0].user_type, "farmer");
    assert!(!page.users[0].active);
    // Accounts predating the active flag default to active.
    assert!(page.users[1].active);
    assert!(page.users[1].phone.is_none());
    assert_eq!(page.total_users, 17);
}

#[test]
fn deserialize_user_details_farmer_totals() {
    let json = r#"{
        "id": 9,
        "email": "ferme@nord.fr",
        "name": "Ferme du Nord",
        "user_type": "farmer",
        "created_at": "2026-01-15T12:00:00",
        "active": true,
        "total_products": 14,
        "total_sales": 840.5
    }"#;
    let details: UserDetails = serde_json::from_str(json).unwrap();
    assert_eq!(details.total_products, Some(14));
    assert_eq!(details.total_sales, Some(840.5));
    assert!(details.total_orders.is_none());
    assert!(details.total_spent.is_none());
}

#[test]
fn deserialize_user_details_buyer_totals() {
    let json = r#"{
        "id": 3,
        "email": "client@mail.fr",
        "name": "Claire",
        "user_type": "customer",
        "created_at": "2026-02-01T09:00:00",
        "total_orders": 6,
        "total_spent": 92.3
    }"#;
    let details: UserDetails = serde_json::from_str(json).unwrap();
    assert_eq!(details.total_orders, Some(6));
    assert_eq!(details.total_spent, Some(92.3));
    assert!(details.total_products.is_none());
    assert!(details.active);
}

// =============================================================================
// Serialization tests
// =============================================================================

#[test]
fn cart_update_omits_unset_fields() {
    let update = CartUpdate {
        quantity: Some(5),
        ..CartUpdate::default()
    };
    let json = serde_json::to_string(&update).unwrap();
    assert_eq!(json, r#"{"quantity":5}"#);

    let toggle = CartUpdate {
        peeling_requested: Some(true),
        ..CartUpdate::default()
    };
    assert_eq!(
        serde_json::to_string(&toggle).unwrap(),
        r#"{"peeling_requested":true}"#
    );
}

#[test]
fn product_patch_serializes_only_changed_fields() {
    let patch = ProductPatch {
        price: Some(3.0),
        quantity: Some(80),
        ..ProductPatch::default()
    };
    let json = serde_json::to_string(&patch).unwrap();
    assert_eq!(json, r#"{"price":3.0,"quantity":80}"#);
}

#[test]
fn new_account_skips_absent_optionals() {
    let account = NewAccount {
        email: "a@b.c".into(),
        password: "pw".into(),
        user_type: Role::Farmer.as_str().into(),
        name: "Alice".into(),
        phone: None,
        address: None,
    };
    let json = serde_json::to_string(&account).unwrap();
    assert!(!json.contains("phone"));
    assert!(!json.contains("address"));
    assert!(json.contains("\"user_type\":\"farmer\""));
}

// =============================================================================
// Cart aggregate local guards
// =============================================================================

#[tokio::test]
async fn add_zero_quantity_is_rejected_locally() {
    let dir = tempfile::tempdir().unwrap();
    // Unroutable base: if the guard missed, the test would surface a
    // transport error instead of InvalidInput.
    let client = Arc::new(ApiClient::new("http://127.0.0.1:1", store_in(&dir)).unwrap());
    let mut cart = Cart::new(client);
    let err = cart.add(4, 0).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert!(cart.lines().is_empty());
}

#[tokio::test]
async fn update_to_zero_quantity_is_rejected_locally() {
    let dir = tempfile::tempdir().unwrap();
    let client = Arc::new(ApiClient::new("http://127.0.0.1:1", store_in(&dir)).unwrap());
    let mut cart = Cart::new(client);
    let err = cart.update_quantity(11, 0).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn checkout_with_empty_address_never_calls_the_network() {
    let dir = tempfile::tempdir().unwrap();
    let client = Arc::new(ApiClient::new("http://127.0.0.1:1", store_in(&dir)).unwrap());
    let mut cart = Cart::new(client);

    for address in ["", "   ", "\t\n"] {
        let err = cart.checkout(address).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidInput(_)), "{address:?}");
    }
    assert!(cart.lines().is_empty());
    assert_eq!(cart.total(), 0.0);
}

// =============================================================================
// Cart cache discipline
// =============================================================================
//
// The cache is only ever assigned from a completed refetch, so whichever
// refetch finishes last is what the cache holds. These tests pin the
// failure half: an errored mutation or refetch must leave the previous
// server-confirmed lines in place.

fn tomato_line() -> CartLine {
    CartLine {
        id: 11,
        product_id: 4,
        product_name: "Tomates".into(),
        quantity: 3,
        price_per_unit: 2.5,
        total_price: 7.5,
        seller_name: "Ferme du Nord".into(),
        created_at: "2026-03-02T08:30:00".into(),
    }
}

#[tokio::test]
async fn failed_refresh_keeps_previous_lines() {
    let dir = tempfile::tempdir().unwrap();
    let client = Arc::new(ApiClient::new("http://127.0.0.1:1", store_in(&dir)).unwrap());
    let mut cart = Cart::with_lines(client, vec![tomato_line()]);

    let err = cart.refresh().await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.total(), 7.5);
}

#[tokio::test]
async fn failed_mutation_keeps_previous_lines() {
    let dir = tempfile::tempdir().unwrap();
    let client = Arc::new(ApiClient::new("http://127.0.0.1:1", store_in(&dir)).unwrap());
    let mut cart = Cart::with_lines(client, vec![tomato_line()]);

    assert!(cart.update_quantity(11, 5).await.is_err());
    assert!(cart.remove(11).await.is_err());
    assert!(cart.checkout("12 rue des Lilas").await.is_err());

    // Still the last server-confirmed view.
    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines()[0].quantity, 3);
}

// =============================================================================
// Error display tests
// =============================================================================

#[test]
fn api_error_display() {
    let err = ApiError::Api {
        status: 400,
        message: "Quantité insuffisante".into(),
    };
    assert_eq!(err.to_string(), "API error (400): Quantité insuffisante");
}

#[test]
fn unauthorized_display_mentions_cleared_session() {
    assert_eq!(
        ApiError::Unauthorized.to_string(),
        "not authenticated (session cleared)"
    );
}

#[test]
fn invalid_input_is_not_a_rejection() {
    assert!(!ApiError::InvalidInput("x".into()).is_rejection());
    assert!(!ApiError::Unauthorized.is_rejection());
}
