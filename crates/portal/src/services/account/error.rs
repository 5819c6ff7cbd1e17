//! Account service error types.

use thiserror::Error;

use galleria_core::Role;

use crate::gateway::GatewayError;

/// Which of the two account-creation writes failed.
///
/// Mapping and profile are written sequentially with no rollback; the stage
/// tells an operator which half of the pair exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    /// The email mapping write failed; neither record exists.
    EmailMapping,
    /// The profile write failed; the email mapping already exists.
    Profile,
}

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Structurally invalid email submitted to a form.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] galleria_core::EmailError),

    /// Registration for an email that already has an account.
    #[error("email already registered as {existing_role}")]
    DuplicateAccount {
        /// Role of the account already holding the email.
        existing_role: Role,
    },

    /// The identity provider rejected identity creation.
    #[error("{0}")]
    IdentityCreationFailed(String),

    /// Login for an email with no profile; credentials were never checked.
    #[error("no account found for this email")]
    NoAccount,

    /// Email/password pair did not verify.
    #[error("invalid credentials")]
    InvalidCredential,

    /// The stored role is none of the three known values.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// Admin approval for an email with no mapping.
    #[error("email not found")]
    EmailNotFound,

    /// One of the two account-creation writes failed mid-pair.
    #[error("account record write failed ({stage:?}): {source}")]
    ProfileWriteFailed {
        /// Which write failed.
        stage: WriteStage,
        /// The underlying gateway failure.
        source: GatewayError,
    },

    /// Backend/directory error outside the taxonomy above.
    #[error("backend error: {0}")]
    Gateway(#[from] GatewayError),
}
