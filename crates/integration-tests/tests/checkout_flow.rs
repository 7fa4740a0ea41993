//! End-to-end checkout flow: browse, resolve, order, pay.

use std::time::Duration;

use url::Url;

use ucdrop_core::ProductId;
use ucdrop_integration_tests::{KNOWN_PLAYER_ID, KNOWN_PLAYER_NAME, TestContext};
use ucdrop_storefront::checkout::{Checkout, CheckoutState, HttpBackend};

fn backend_for(ctx: &TestContext) -> HttpBackend {
    let base = Url::parse(&ctx.base_url).expect("base url");
    HttpBackend::new(reqwest::Client::new(), base)
}

#[tokio::test]
async fn test_health_and_readiness() {
    let ctx = TestContext::spawn().await;

    let health = ctx.client.get(ctx.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);

    let ready = ctx.client.get(ctx.url("/health/ready")).send().await.unwrap();
    assert_eq!(ready.status(), 200);
}

#[tokio::test]
async fn test_products_listing_envelope() {
    let ctx = TestContext::spawn().await;

    let body: serde_json::Value = ctx
        .client
        .get(ctx.url("/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 6);
    // camelCase wire format with string-encoded decimals
    assert!(products[0]["ucAmount"].is_number());
    assert!(products[0]["discountPrice"].is_string());
}

#[tokio::test]
async fn test_player_resolve_endpoint() {
    let ctx = TestContext::spawn().await;

    let ok: serde_json::Value = ctx
        .client
        .get(ctx.url(&format!("/player/resolve?id={KNOWN_PLAYER_ID}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ok["success"], true);
    assert_eq!(ok["data"]["playerName"], KNOWN_PLAYER_NAME);

    // Too short: rejected locally with the contract code
    let short = ctx
        .client
        .get(ctx.url("/player/resolve?id=123"))
        .send()
        .await
        .unwrap();
    assert_eq!(short.status(), 400);
    let body: serde_json::Value = short.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_player_id");

    // Unknown account
    let missing = ctx
        .client
        .get(ctx.url("/player/resolve?id=abcdefgh"))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
    let body: serde_json::Value = missing.json().await.unwrap();
    assert_eq!(body["code"], "player_not_found");
}

#[tokio::test]
async fn test_full_checkout_flow() {
    let ctx = TestContext::spawn().await;
    let checkout = Checkout::with_debounce(backend_for(&ctx), Duration::from_millis(50));

    checkout.select_product(ProductId::new("uc-660")).await;

    // Short input is rejected before any lookup
    checkout.input_player_id("123").await.unwrap();
    assert_eq!(checkout.state().await, CheckoutState::PlayerInvalid);

    // Full id resolves through the live server once the debounce elapses
    checkout.input_player_id(KNOWN_PLAYER_ID).await.unwrap();
    checkout.settled().await;
    assert_eq!(checkout.state().await, CheckoutState::PlayerValid);
    assert_eq!(
        checkout.player_name().await.as_deref(),
        Some(KNOWN_PLAYER_NAME)
    );

    // Confirm: an order exists, pending, with a gateway redirect
    let redirect = checkout.confirm().await.unwrap();
    assert_eq!(checkout.state().await, CheckoutState::Redirected);
    assert!(redirect.payment_url.contains("/payment/gateway?orderId="));

    let order: serde_json::Value = ctx
        .client
        .get(ctx.url(&format!("/orders/{}", redirect.order_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(order["data"]["status"], "pending");
    assert_eq!(order["data"]["playerName"], KNOWN_PLAYER_NAME);
    // The charge is the catalog's discounted price, not client-supplied
    assert_eq!(order["data"]["amount"], "329.99");

    // The gateway page renders for the pending order
    let gateway = ctx.client.get(&redirect.payment_url).send().await.unwrap();
    assert_eq!(gateway.status(), 200);

    // Simulate a successful payment; the buyer lands on the success page
    let paid = ctx
        .client
        .post(ctx.url("/payment/gateway/pay"))
        .form(&[
            ("orderId", redirect.order_id.to_string().as_str()),
            ("outcome", "success"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(paid.status(), 200);
    assert!(paid.url().path().ends_with("/payment/success"));

    // The order is finalized with a mock transaction id
    let order: serde_json::Value = ctx
        .client
        .get(ctx.url(&format!("/orders/{}", redirect.order_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(order["data"]["status"], "success");
    let txn = order["data"]["transactionId"].as_str().unwrap();
    assert!(txn.starts_with("MOCK_TXN_"));
}

#[tokio::test]
async fn test_order_fail_page_shows_error_param() {
    let ctx = TestContext::spawn().await;

    let page = ctx
        .client
        .get(ctx.url("/order/fail?orderId=abc&error=Card%20declined"))
        .send()
        .await
        .unwrap();
    assert_eq!(page.status(), 200);
    let html = page.text().await.unwrap();
    assert!(html.contains("Card declined"));

    // Without the parameter the page falls back to the generic message
    let fallback = ctx.client.get(ctx.url("/order/fail")).send().await.unwrap();
    let html = fallback.text().await.unwrap();
    assert!(html.contains("The order could not be created."));
}

#[tokio::test]
async fn test_order_creation_rejects_unknown_product() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .client
        .post(ctx.url("/orders"))
        .json(&serde_json::json!({
            "productId": "uc-999",
            "playerId": KNOWN_PLAYER_ID,
            "playerName": KNOWN_PLAYER_NAME,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "product_not_found");
}
