//! Account domain types.
//!
//! A registered account is three records spread across two collaborators:
//! the identity held by the identity provider, the profile document keyed by
//! uid, and the email mapping document keyed by email. The mapping is a
//! secondary index; it is written alongside the profile with no transaction,
//! so the pair can disagree after a partial failure (see DESIGN.md).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use galleria_core::{Email, Role, Uid};

/// An account identity issued by the identity provider.
///
/// Immutable once created; the uid is the key for everything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Provider-assigned opaque unique id.
    pub uid: Uid,
    /// The email the identity was created with.
    pub email: Email,
}

/// A stored profile, keyed by uid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Identity uid this profile belongs to.
    pub uid: Uid,
    /// Account email; unique across profiles.
    pub email: Email,
    /// Stored role; mutated only by admin approval.
    pub role: Role,
    /// When the profile was created (backend-assigned).
    pub created_at: DateTime<Utc>,
}

/// An email mapping, keyed by email.
///
/// Enforces email uniqueness independent of the identity provider and lets
/// login route by role before touching the provider. The uid is optional on
/// read: the backend is schemaless and older documents may lack it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMapping {
    /// The email this mapping is keyed by.
    pub email: Email,
    /// The uid the email resolves to, when recorded.
    pub uid: Option<Uid>,
    /// Role copy; must be kept in step with the profile's role.
    pub role: Role,
}
