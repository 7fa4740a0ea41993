//! Integration tests for UC Drop.
//!
//! Each test spawns the full storefront (router, sessions, middleware) on an
//! ephemeral port and drives it over real HTTP with reqwest. The player
//! resolver is the deterministic mock with a known roster entry, so no
//! external services are needed.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use ucdrop_core::AdminRole;
use ucdrop_storefront::catalog::Catalog;
use ucdrop_storefront::config::{
    AdminAccountConfig, PaymentConfig, PlayerProviderConfig, StorefrontConfig,
};
use ucdrop_storefront::services::auth::hash_password;
use ucdrop_storefront::services::player::MockResolver;
use ucdrop_storefront::state::AppState;

/// Admin account the test server is provisioned with.
pub const ADMIN_EMAIL: &str = "admin@ucdrop.example";
/// Password behind the provisioned account's hash.
pub const ADMIN_PASSWORD: &str = "orchid-penguin-47-barrel";

/// Player id the mock resolver knows by roster.
pub const KNOWN_PLAYER_ID: &str = "123456789";
/// Account name the roster entry resolves to.
pub const KNOWN_PLAYER_NAME: &str = "PlayerX";

/// A running storefront instance plus a cookie-keeping HTTP client.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestContext {
    /// Spawn a storefront with the default test configuration.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn() -> Self {
        Self::spawn_configured(|_| {}).await
    }

    /// Spawn a storefront, letting the caller tweak the configuration first.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn spawn_configured(tweak: impl FnOnce(&mut StorefrontConfig)) -> Self {
        let listener = tokio::net::TcpListener::bind((IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let base_url = format!("http://{addr}/");

        let mut config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: base_url.clone(),
            session_secret: SecretString::from("kT9mQ4vR7wXz2pLnB8cJfH3sD6gY1aEu"),
            admin: AdminAccountConfig {
                email: ADMIN_EMAIL.to_string(),
                password_hash: hash_password(ADMIN_PASSWORD)
                    .expect("hash test password")
                    .into(),
                role: AdminRole::Admin,
            },
            catalog_path: None,
            player: PlayerProviderConfig::default(),
            payment: PaymentConfig {
                // Keep the simulated gateway latency out of test runtime
                mock_delay: Duration::from_millis(10),
                callback_token: None,
            },
            sentry_dsn: None,
            sentry_environment: None,
        };
        tweak(&mut config);

        let resolver = Arc::new(MockResolver::with_roster([(
            KNOWN_PLAYER_ID,
            KNOWN_PLAYER_NAME,
        )]));
        let state = AppState::with_resolver(config, Catalog::seeded(), resolver)
            .expect("build app state");

        let app = ucdrop_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("build http client");

        Self { client, base_url }
    }

    /// Absolute URL for a server path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Create an order for the known player and return the response body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the response is not the success
    /// envelope.
    pub async fn create_order(&self, product_id: &str) -> serde_json::Value {
        let body = self
            .client
            .post(self.url("/orders"))
            .json(&serde_json::json!({
                "productId": product_id,
                "playerId": KNOWN_PLAYER_ID,
                "playerName": KNOWN_PLAYER_NAME,
            }))
            .send()
            .await
            .expect("create order request")
            .json::<serde_json::Value>()
            .await
            .expect("create order body");
        assert_eq!(body["success"], true, "order creation failed: {body}");
        body
    }

    /// Log in as the provisioned admin and return the response body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("login request")
    }
}
