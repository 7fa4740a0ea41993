//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (payment redirect
//!   URLs are built against this)
//! - `STOREFRONT_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `ADMIN_EMAIL` - Admin account email
//! - `ADMIN_PASSWORD_HASH` - Argon2 PHC hash of the admin password
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `ADMIN_ROLE` - Role of the configured account (default: admin)
//! - `CATALOG_PATH` - JSON file overriding the built-in product seed
//! - `PLAYER_PROVIDER_URL` - Identity provider base URL (mock resolver when unset)
//! - `PLAYER_CACHE_TTL_SECS` - Resolution cache TTL (default: 300)
//! - `PLAYER_REQUEST_TIMEOUT_SECS` - Provider request timeout (default: 5)
//! - `PAYMENT_MOCK_DELAY_MS` - Simulated provider latency (default: 2000)
//! - `PAYMENT_CALLBACK_TOKEN` - Shared secret required on `/payment/callback`
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use ucdrop_core::AdminRole;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Admin account configuration
    pub admin: AdminAccountConfig,
    /// Optional catalog JSON file overriding the built-in seed
    pub catalog_path: Option<PathBuf>,
    /// Player identity provider configuration
    pub player: PlayerProviderConfig,
    /// Mock payment gateway configuration
    pub payment: PaymentConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Admin account configuration.
///
/// Implements `Debug` manually to redact the password hash.
#[derive(Clone)]
pub struct AdminAccountConfig {
    /// Admin account email
    pub email: String,
    /// Argon2 PHC hash of the admin password
    pub password_hash: SecretString,
    /// Role of the configured account
    pub role: AdminRole,
}

impl std::fmt::Debug for AdminAccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccountConfig")
            .field("email", &self.email)
            .field("password_hash", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

/// Player identity provider configuration.
#[derive(Debug, Clone)]
pub struct PlayerProviderConfig {
    /// Provider base URL; the deterministic mock resolver is used when unset
    pub provider_url: Option<String>,
    /// TTL for cached successful resolutions
    pub cache_ttl: Duration,
    /// Timeout for provider requests
    pub request_timeout: Duration,
}

impl Default for PlayerProviderConfig {
    fn default() -> Self {
        Self {
            provider_url: None,
            cache_ttl: Duration::from_secs(300),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Mock payment gateway configuration.
///
/// Implements `Debug` manually to redact the callback token.
#[derive(Clone)]
pub struct PaymentConfig {
    /// Simulated provider latency before the callback is applied
    pub mock_delay: Duration,
    /// Shared secret required on the webhook callback when set
    pub callback_token: Option<SecretString>,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            mock_delay: Duration::from_millis(2000),
            callback_token: None,
        }
    }
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("mock_delay", &self.mock_delay)
            .field(
                "callback_token",
                &self.callback_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("STOREFRONT_BASE_URL")?;
        let session_secret = get_validated_secret("STOREFRONT_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "STOREFRONT_SESSION_SECRET")?;

        let admin = AdminAccountConfig::from_env()?;
        let catalog_path = get_optional_env("CATALOG_PATH").map(PathBuf::from);
        let player = PlayerProviderConfig::from_env()?;
        let payment = PaymentConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            base_url,
            session_secret,
            admin,
            catalog_path,
            player,
            payment,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AdminAccountConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let email = get_required_env("ADMIN_EMAIL")?;
        // PHC strings are not placeholder-shaped, so only presence is checked
        let password_hash = SecretString::from(get_required_env("ADMIN_PASSWORD_HASH")?);
        let role = get_env_or_default("ADMIN_ROLE", "admin")
            .parse::<AdminRole>()
            .map_err(|e| ConfigError::InvalidEnvVar("ADMIN_ROLE".to_string(), e))?;

        Ok(Self {
            email,
            password_hash,
            role,
        })
    }
}

impl PlayerProviderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let provider_url = get_optional_env("PLAYER_PROVIDER_URL");
        let cache_ttl = get_duration_secs("PLAYER_CACHE_TTL_SECS", 300)?;
        let request_timeout = get_duration_secs("PLAYER_REQUEST_TIMEOUT_SECS", 5)?;

        Ok(Self {
            provider_url,
            cache_ttl,
            request_timeout,
        })
    }
}

impl PaymentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mock_delay_ms = get_env_or_default("PAYMENT_MOCK_DELAY_MS", "2000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PAYMENT_MOCK_DELAY_MS".to_string(), e.to_string())
            })?;
        let callback_token = get_optional_env("PAYMENT_CALLBACK_TOKEN").map(SecretString::from);

        Ok(Self {
            mock_delay: Duration::from_millis(mock_delay_ms),
            callback_token,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a duration in whole seconds from an environment variable.
fn get_duration_secs(key: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    let secs = std::env::var(key)
        .map_or(Ok(default_secs), |v| v.parse::<u64>())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(Duration::from_secs(secs))
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        let result = validate_secret_strength("changeme123", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_session_secret_valid_length() {
        let secret = SecretString::from("a".repeat(32));
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            admin: AdminAccountConfig {
                email: "admin@ucdrop.test".to_string(),
                password_hash: SecretString::from("$argon2id$v=19$..."),
                role: AdminRole::Admin,
            },
            catalog_path: None,
            player: PlayerProviderConfig::default(),
            payment: PaymentConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_admin_config_debug_redacts_hash() {
        let config = AdminAccountConfig {
            email: "admin@ucdrop.test".to_string(),
            password_hash: SecretString::from("super_secret_hash"),
            role: AdminRole::Admin,
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("admin@ucdrop.test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_hash"));
    }

    #[test]
    fn test_payment_config_debug_redacts_token() {
        let config = PaymentConfig {
            mock_delay: Duration::from_millis(10),
            callback_token: Some(SecretString::from("gateway_token_value")),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("gateway_token_value"));
    }
}
