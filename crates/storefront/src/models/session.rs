//! Session-related types.
//!
//! Types stored in the session for authentication state. The session is the
//! authoritative record of admin identity; the opaque login token returned
//! to the client is display data and never an authorization input.

use serde::{Deserialize, Serialize};

use ucdrop_core::{AdminRole, Email};

/// Session-stored admin identity.
///
/// Minimal data stored in the session to identify the logged-in admin.
/// The role is re-checked from here on every privileged request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's email address.
    pub email: Email,
    /// Admin's role.
    pub role: AdminRole,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}
