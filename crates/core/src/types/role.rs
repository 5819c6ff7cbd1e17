//! Account roles and registration role hints.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The role stored on a profile and its email mapping.
///
/// The backend is schemaless, so a role read back from it is not guaranteed
/// to be one of the three known values. Unknown strings are preserved in
/// [`Role::Unknown`] rather than dropped; the login resolver turns them into
/// an explicit `UnknownRole` failure instead of guessing a landing view.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// A regular shopper account.
    User,
    /// A mall administrator.
    Admin,
    /// A pending admin application; functions as `user` until approved.
    AdminRequest,
    /// Any other value found in the backend, kept verbatim for diagnostics.
    Unknown(String),
}

impl Role {
    /// Parse a role from its stored string form. Never fails: values other
    /// than the three known roles become [`Role::Unknown`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "user" => Self::User,
            "admin" => Self::Admin,
            "admin_request" => Self::AdminRequest,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// The stored string form of this role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::AdminRequest => "admin_request",
            Self::Unknown(other) => other,
        }
    }

    /// Whether this role grants access to the admin landing view.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// The role intent carried by the register form's `?role=` hint.
///
/// Self-service registration can never mint an `admin` role directly: an
/// explicit admin hint is recorded as `admin_request` and sits in the
/// approval queue until an existing admin promotes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleHint {
    /// Register as a regular shopper.
    #[default]
    User,
    /// Apply for admin access.
    Admin,
}

impl RoleHint {
    /// Parse the hint from a query/form value; anything but `"admin"` is a
    /// user registration.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        if s == "admin" { Self::Admin } else { Self::User }
    }

    /// The role actually recorded for a registration with this hint.
    #[must_use]
    pub const fn requested_role(self) -> Role {
        match self {
            Self::User => Role::User,
            Self::Admin => Role::AdminRequest,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("admin"), Role::Admin);
        assert_eq!(Role::parse("admin_request"), Role::AdminRequest);
    }

    #[test]
    fn test_parse_preserves_unknown() {
        let role = Role::parse("moderator");
        assert_eq!(role, Role::Unknown("moderator".to_owned()));
        assert_eq!(role.as_str(), "moderator");
    }

    #[test]
    fn test_display_matches_stored_form() {
        assert_eq!(Role::AdminRequest.to_string(), "admin_request");
        assert_eq!(Role::Unknown("x".to_owned()).to_string(), "x");
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Role::AdminRequest).unwrap();
        assert_eq!(json, "\"admin_request\"");

        let parsed: Role = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(parsed, Role::Unknown("moderator".to_owned()));
    }

    #[test]
    fn test_admin_hint_requests_admin_request() {
        assert_eq!(RoleHint::parse("admin"), RoleHint::Admin);
        assert_eq!(RoleHint::parse("user"), RoleHint::User);
        assert_eq!(RoleHint::parse(""), RoleHint::User);

        // Self-service registration never records `admin` directly.
        assert_eq!(RoleHint::Admin.requested_role(), Role::AdminRequest);
        assert_eq!(RoleHint::User.requested_role(), Role::User);
    }
}
