//! Session-related types.
//!
//! Types stored in the cookie session for authentication state. There is no
//! global "current user" anywhere; handlers read this and pass explicit
//! context into the services.

use serde::{Deserialize, Serialize};

use galleria_core::{Email, Role, Uid};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Identity uid.
    pub uid: Uid,
    /// Account email.
    pub email: Email,
    /// Role as resolved at login time.
    pub role: Role,
}

/// Session keys for authentication data.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";
}
