mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use std::sync::Arc;
use storefront::infrastructure::cache::NullCache;

fn order_body(items: Value) -> Value {
    json!({
        "customer": { "name": "Ada Lovelace", "email": "ada@example.com", "phone": "+44 20 7946 0000" },
        "shipping": {
            "line1": "12 Analytical Row",
            "city": "London",
            "postal_code": "N1 9GU",
            "country": "GB"
        },
        "items": items
    })
}

fn setup() -> (TestServer, Arc<common::InMemoryStore>) {
    let store = Arc::new(common::InMemoryStore::seeded());
    let state = common::create_state(store.clone(), Arc::new(NullCache::new()));
    (TestServer::new(common::test_router(state)).unwrap(), store)
}

#[tokio::test]
async fn test_place_order() {
    let (server, store) = setup();

    let response = server
        .post("/api/orders")
        .json(&order_body(json!([
            { "product_id": 1, "quantity": 2 },
            { "product_id": 3, "quantity": 1 }
        ])))
        .await;

    response.assert_status(StatusCode::CREATED);
    let json = response.json::<Value>();

    assert!(json["number"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(json["status"], "pending");
    assert_eq!(json["total_cents"], 2 * 1299 + 2500);
    assert_eq!(json["items"][0]["line_total_cents"], 2598);
    assert_eq!(json["items"][1]["product_slug"], "dinner-plate");
    assert_eq!(json["customer"]["email"], "ada@example.com");
    assert_eq!(json["shipping"]["country"], "GB");

    assert_eq!(store.stock_of(1), 3);
    assert_eq!(store.stock_of(3), 11);
    assert_eq!(store.order_count(), 1);
}

#[tokio::test]
async fn test_duplicate_lines_become_one_item() {
    let (server, store) = setup();

    let json = server
        .post("/api/orders")
        .json(&order_body(json!([
            { "product_id": 1, "quantity": 1 },
            { "product_id": 1, "quantity": 2 }
        ])))
        .await
        .json::<Value>();

    assert_eq!(json["items"].as_array().unwrap().len(), 1);
    assert_eq!(json["items"][0]["quantity"], 3);
    assert_eq!(store.stock_of(1), 2);
}

#[tokio::test]
async fn test_client_prices_are_ignored() {
    let (server, _store) = setup();

    let json = server
        .post("/api/orders")
        .json(&order_body(json!([
            { "product_id": 1, "quantity": 1, "unit_price_cents": 1 }
        ])))
        .await
        .json::<Value>();

    assert_eq!(json["total_cents"], 1299);
}

#[tokio::test]
async fn test_insufficient_stock_is_conflict() {
    let (server, store) = setup();

    let response = server
        .post("/api/orders")
        .json(&order_body(json!([
            { "product_id": 1, "quantity": 1 },
            { "product_id": 4, "quantity": 4 }
        ])))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let json = response.json::<Value>();

    assert_eq!(json["error"]["code"], "conflict");
    assert_eq!(json["error"]["details"]["valid"], false);
    assert_eq!(json["error"]["details"]["lines"][1]["status"], "insufficient_stock");

    assert_eq!(store.stock_of(1), 5);
    assert_eq!(store.stock_of(4), 3);
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_hidden_product_cannot_be_ordered() {
    let (server, store) = setup();

    server
        .post("/api/orders")
        .json(&order_body(json!([{ "product_id": 5, "quantity": 1 }])))
        .await
        .assert_status(StatusCode::CONFLICT);

    assert_eq!(store.stock_of(5), 10);
}

#[tokio::test]
async fn test_last_units_then_sold_out() {
    let (server, store) = setup();
    let body = order_body(json!([{ "product_id": 4, "quantity": 3 }]));

    server
        .post("/api/orders")
        .json(&body)
        .await
        .assert_status(StatusCode::CREATED);
    assert_eq!(store.stock_of(4), 0);

    server
        .post("/api/orders")
        .json(&body)
        .await
        .assert_status(StatusCode::CONFLICT);
    assert_eq!(store.order_count(), 1);
}

#[tokio::test]
async fn test_invalid_customer_rejected() {
    let (server, store) = setup();

    let mut body = order_body(json!([{ "product_id": 1, "quantity": 1 }]));
    body["customer"]["email"] = json!("not-an-email");

    let response = server.post("/api/orders").json(&body).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    assert_eq!(store.order_count(), 0);
}

#[tokio::test]
async fn test_invalid_shipping_rejected() {
    let (server, _store) = setup();

    let mut body = order_body(json!([{ "product_id": 1, "quantity": 1 }]));
    body["shipping"]["country"] = json!("United Kingdom");

    server
        .post("/api/orders")
        .json(&body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_empty_order_rejected() {
    let (server, _store) = setup();

    server
        .post("/api/orders")
        .json(&order_body(json!([])))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_invalidates_product_cache() {
    let store = Arc::new(common::InMemoryStore::seeded());
    let cache = Arc::new(common::MemoryCache::default());
    cache.put("catalog:product:blue-mug", "{}");

    let state = common::create_state(store, cache.clone());
    let server = TestServer::new(common::test_router(state)).unwrap();

    server
        .post("/api/orders")
        .json(&order_body(json!([{ "product_id": 1, "quantity": 1 }])))
        .await
        .assert_status(StatusCode::CREATED);

    assert!(!cache.contains("catalog:product:blue-mug"));
    assert_eq!(cache.invalidated(), vec!["catalog:product:blue-mug".to_string()]);
}
