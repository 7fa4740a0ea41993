//! Session middleware configuration.
//!
//! Sets up in-memory sessions using tower-sessions. There is one admin
//! account per deployment and no other session state, so a memory store is
//! the right weight; sessions simply reset on restart. Cookies are signed
//! with a key derived from `STOREFRONT_SESSION_SECRET` so a tampered
//! session id is rejected before any store lookup.

use secrecy::ExposeSecret;
use tower_sessions::cookie::Key;
use tower_sessions::service::SignedCookie;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "ucdrop_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer with an in-memory store and signed cookies.
///
/// # Panics
///
/// Panics if the session secret is shorter than 32 bytes; configuration
/// validation rejects such secrets before this point.
#[must_use]
pub fn create_session_layer(
    config: &StorefrontConfig,
) -> SessionManagerLayer<MemoryStore, SignedCookie> {
    let store = MemoryStore::default();
    let key = Key::derive_from(config.session_secret.expose_secret().as_bytes());

    // Determine if we're in production (HTTPS)
    let is_secure = config.base_url.starts_with("https://");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(is_secure)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
        .with_signed(key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use secrecy::SecretString;
    use ucdrop_core::AdminRole;

    use super::*;
    use crate::config::{AdminAccountConfig, PaymentConfig, PlayerProviderConfig};

    fn test_config(secret: &str) -> StorefrontConfig {
        StorefrontConfig {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            base_url: "http://localhost:3000/".to_string(),
            session_secret: SecretString::from(secret),
            admin: AdminAccountConfig {
                email: "admin@ucdrop.example".to_string(),
                password_hash: SecretString::from("$argon2id$stub"),
                role: AdminRole::Admin,
            },
            catalog_path: None,
            player: PlayerProviderConfig::default(),
            payment: PaymentConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_layer_derives_signing_key_from_secret() {
        // A validated-length secret must build a signed layer without panicking
        let config = test_config("kT9mQ4vR7wXz2pLnB8cJfH3sD6gY1aEu");
        let _layer = create_session_layer(&config);
    }

    #[test]
    fn test_key_derivation_is_deterministic() {
        let secret = "kT9mQ4vR7wXz2pLnB8cJfH3sD6gY1aEu";
        // Restarting with the same secret must yield the same signing key,
        // or existing cookies would be invalidated on every deploy
        assert_eq!(
            Key::derive_from(secret.as_bytes()),
            Key::derive_from(secret.as_bytes())
        );
    }
}
