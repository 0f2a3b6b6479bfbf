//! Integration tests for the catalog and session cart endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use florist_integration_tests::TestApp;
use serde_json::json;

// ============================================================================
// Health & Catalog
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::accepting();
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_catalog_listing_in_order() {
    let app = TestApp::accepting();
    let (status, body) = app.get("/api/catalog").await;

    assert_eq!(status, StatusCode::OK);
    let products = body.as_array().unwrap();
    assert_eq!(products.len(), 6);

    let ids: Vec<i64> = products.iter().map(|p| p["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [1, 2, 3, 4, 5, 6]);
    assert_eq!(body[2]["price"], "2 800 ₽");
    assert_eq!(body[2]["priceAmount"], 2800);
}

#[tokio::test]
async fn test_catalog_product() {
    let app = TestApp::accepting();

    let (status, body) = app.get("/api/catalog/4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 4);
    assert_eq!(body["priceAmount"], 3900);

    let (status, _) = app.get("/api/catalog/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_new_session_has_empty_cart() {
    let app = TestApp::accepting();
    let (status, body) = app.get("/api/cart").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["totalCount"], 0);
    assert_eq!(body["totalPriceDisplay"], "0 ₽");
    assert_eq!(app.cart_count().await, 0);
    assert!(app.cookie().is_none());
}

#[tokio::test]
async fn test_add_sets_session_cookie() {
    let app = TestApp::accepting();
    let (status, body) = app.add_to_cart(1).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["added"]["productId"], 1);
    assert_eq!(body["added"]["quantity"], 1);
    assert!(app.cookie().unwrap().starts_with("fl_session="));
}

#[tokio::test]
async fn test_add_twice_merges_line() {
    let app = TestApp::accepting();
    app.add_to_cart(2).await;
    let (_, body) = app.add_to_cart(2).await;

    assert_eq!(body["added"]["quantity"], 2);
    assert_eq!(body["cart"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["cart"]["totalCount"], 2);
}

#[tokio::test]
async fn test_add_unknown_product() {
    let app = TestApp::accepting();
    let (status, _) = app.add_to_cart(99).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.cart_count().await, 0);
}

#[tokio::test]
async fn test_cart_totals_end_to_end() {
    let app = TestApp::accepting();
    app.add_to_cart(3).await;
    app.add_to_cart(2).await;
    app.add_to_cart(2).await;

    let (_, cart) = app.get("/api/cart").await;

    assert_eq!(cart["totalCount"], 3);
    assert_eq!(cart["totalPrice"], 11_200);
    assert_eq!(cart["totalPriceDisplay"], "11 200 ₽");
    assert_eq!(cart["items"][0]["productId"], 3);
    assert_eq!(cart["items"][1]["lineTotalDisplay"], "8 400 ₽");
}

#[tokio::test]
async fn test_update_clamps_quantity() {
    let app = TestApp::accepting();
    app.add_to_cart(1).await;

    let (status, cart) = app
        .post("/api/cart/update", json!({ "productId": 1, "quantity": 5 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["quantity"], 5);
    assert_eq!(cart["totalPrice"], 17_500);

    let (_, cart) = app
        .post("/api/cart/update", json!({ "productId": 1, "quantity": 0 }))
        .await;
    assert_eq!(cart["items"][0]["quantity"], 1);

    let (_, cart) = app
        .post("/api/cart/update", json!({ "productId": 1, "quantity": -3 }))
        .await;
    assert_eq!(cart["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_update_absent_product_is_noop() {
    let app = TestApp::accepting();
    app.add_to_cart(1).await;

    let (status, cart) = app
        .post("/api/cart/update", json!({ "productId": 6, "quantity": 3 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["totalCount"], 1);
}

#[tokio::test]
async fn test_remove() {
    let app = TestApp::accepting();
    app.add_to_cart(1).await;
    app.add_to_cart(5).await;

    let (status, cart) = app.post("/api/cart/remove", json!({ "productId": 1 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["productId"], 5);

    // Removing again changes nothing
    let (_, again) = app.post("/api/cart/remove", json!({ "productId": 1 })).await;
    assert_eq!(again, cart);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let app = TestApp::accepting();
    let other = app.new_browser();

    app.add_to_cart(1).await;
    app.add_to_cart(1).await;
    other.add_to_cart(4).await;

    assert_eq!(app.cart_count().await, 2);
    assert_eq!(other.cart_count().await, 1);
}
