//! Admin Session Gate.
//!
//! A single-tenant credential check: the admin account comes from the
//! environment, passwords are verified against their Argon2 hash, and a
//! successful login mints an opaque bearer token plus a server-side session.
//! Only the `admin` role may log in; a valid credential with a lesser role
//! is refused with a distinct error so operators can tell the two apart.

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use ucdrop_core::{AdminRole, Email, EmailError};

use crate::config::AdminAccountConfig;
use crate::models::api::AdminUserView;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password. Deliberately indistinct.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The credentials are valid but the account's role may not log in here.
    #[error("role {0} is not permitted to access the admin panel")]
    RoleNotPermitted(AdminRole),

    /// The stored hash could not be parsed or the hasher failed.
    #[error("password hash error")]
    PasswordHash,
}

/// A configured admin account.
#[derive(Clone)]
pub struct AdminAccount {
    pub email: Email,
    pub password_hash: SecretString,
    pub role: AdminRole,
}

impl std::fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccount")
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// Directory of admin accounts known to this deployment.
#[derive(Debug, Clone, Default)]
pub struct AdminDirectory {
    accounts: Vec<AdminAccount>,
}

impl AdminDirectory {
    /// Build the directory from the configured admin account.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the configured email is malformed.
    pub fn from_config(config: &AdminAccountConfig) -> Result<Self, EmailError> {
        Ok(Self {
            accounts: vec![AdminAccount {
                email: Email::parse(&config.email)?,
                password_hash: config.password_hash.clone(),
                role: config.role,
            }],
        })
    }

    /// Directory from explicit accounts, for tests and local tooling.
    #[must_use]
    pub fn from_accounts(accounts: Vec<AdminAccount>) -> Self {
        Self { accounts }
    }

    fn find(&self, email: &str) -> Option<&AdminAccount> {
        self.accounts
            .iter()
            .find(|a| a.email.as_str().eq_ignore_ascii_case(email))
    }
}

/// Outcome of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Opaque bearer token handed to the client.
    pub token: SecretString,
    /// The authenticated admin, as exposed over the API.
    pub user: AdminUserView,
    /// Session identity, stored server-side.
    pub email: Email,
    pub role: AdminRole,
}

/// Verify a candidate login against the directory.
///
/// Verification runs the full Argon2 check before any role decision; an
/// unknown email and a wrong password collapse to the same error.
///
/// # Errors
///
/// Returns `AuthError::InvalidCredentials` on unknown email or wrong
/// password, `AuthError::RoleNotPermitted` for non-admin roles, and
/// `AuthError::PasswordHash` if the stored hash is malformed.
pub fn login(
    directory: &AdminDirectory,
    email: &str,
    password: &SecretString,
) -> Result<LoginOutcome, AuthError> {
    let account = directory.find(email).ok_or(AuthError::InvalidCredentials)?;

    let parsed = PasswordHash::new(account.password_hash.expose_secret())
        .map_err(|_| AuthError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.expose_secret().as_bytes(), &parsed)
        .map_err(|_| AuthError::InvalidCredentials)?;

    if account.role != AdminRole::Admin {
        return Err(AuthError::RoleNotPermitted(account.role));
    }

    Ok(LoginOutcome {
        token: generate_token(),
        user: AdminUserView {
            email: account.email.as_str().to_string(),
            role: account.role,
        },
        email: account.email.clone(),
        role: account.role,
    })
}

/// Mint an opaque session token from 32 bytes of OS randomness.
fn generate_token() -> SecretString {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes).into()
}

/// Hash a password for storage. Used by tests and provisioning tooling.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| AuthError::PasswordHash)
}
