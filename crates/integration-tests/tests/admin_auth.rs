//! Admin login and dashboard access.

use ucdrop_core::AdminRole;
use ucdrop_integration_tests::{ADMIN_EMAIL, ADMIN_PASSWORD, TestContext};

#[tokio::test]
async fn test_login_returns_token_and_opens_dashboard() {
    let ctx = TestContext::spawn().await;

    let response = ctx.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user"]["email"], ADMIN_EMAIL);
    assert_eq!(body["data"]["user"]["role"], "admin");
    // Opaque URL-safe token, 32 bytes unpadded
    assert_eq!(body["data"]["token"].as_str().unwrap().len(), 43);

    // The session cookie from login authorizes the dashboard
    let dashboard = ctx
        .client
        .get(ctx.url("/admin/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(dashboard.status(), 200);
    let html = dashboard.text().await.unwrap();
    assert!(html.contains(ADMIN_EMAIL));
}

#[tokio::test]
async fn test_login_accepts_username_field() {
    let ctx = TestContext::spawn().await;

    let response = ctx
        .client
        .post(ctx.url("/auth/login"))
        .json(&serde_json::json!({
            "username": ADMIN_EMAIL,
            "password": ADMIN_PASSWORD,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_dashboard_requires_session() {
    let ctx = TestContext::spawn().await;

    // API-style request gets a JSON 401
    let api = ctx
        .client
        .get(ctx.url("/admin/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(api.status(), 401);
    let body: serde_json::Value = api.json().await.unwrap();
    assert_eq!(body["code"], "unauthorized");

    // Browser-style request is redirected to the login page
    let browser = ctx
        .client
        .get(ctx.url("/admin/dashboard"))
        .header("accept", "text/html")
        .send()
        .await
        .unwrap();
    assert_eq!(browser.status(), 200);
    assert!(browser.url().path().ends_with("/admin/login"));
}

#[tokio::test]
async fn test_wrong_password_is_invalid_credentials() {
    let ctx = TestContext::spawn().await;

    let response = ctx.login(ADMIN_EMAIL, "not-the-password").await;
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_credentials");
}

#[tokio::test]
async fn test_unknown_email_is_invalid_credentials() {
    let ctx = TestContext::spawn().await;

    let response = ctx.login("ghost@ucdrop.example", ADMIN_PASSWORD).await;
    assert_eq!(response.status(), 401);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["code"], "invalid_credentials");
}

#[tokio::test]
async fn test_viewer_role_is_refused_with_distinct_code() {
    let ctx = TestContext::spawn_configured(|config| {
        config.admin.role = AdminRole::Viewer;
    })
    .await;

    let response = ctx.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(response.status(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "forbidden_role");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let ctx = TestContext::spawn().await;
    ctx.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let logout = ctx
        .client
        .post(ctx.url("/auth/logout"))
        .send()
        .await
        .unwrap();
    assert_eq!(logout.status(), 200);

    let after = ctx
        .client
        .get(ctx.url("/admin/dashboard"))
        .send()
        .await
        .unwrap();
    assert_eq!(after.status(), 401);
}
