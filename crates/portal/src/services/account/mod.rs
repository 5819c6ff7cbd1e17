//! Account service: registration, login, logout, and admin approval.
//!
//! The decision core of the portal. Each operation takes explicit input,
//! resolves against the identity gateway and profile directory, and returns
//! a typed outcome; the HTTP layer only renders what comes back. Every
//! outcome - success or failure - is audit-logged with best-effort
//! semantics, under a fixed action vocabulary (`loginSuccess`,
//! `registerAttemptDuplicateEmail`, ...) that log tooling can rely on.

mod error;

pub use error::{AccountError, WriteStage};

use std::sync::Arc;

use serde_json::json;

use galleria_core::{Email, Role, RoleHint, Uid};

use crate::gateway::{IdentityError, IdentityGateway, ProfileDirectory};
use crate::models::{EmailMapping, Identity};
use crate::services::audit::AuditLog;

/// Which landing view a successful login routes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    /// The admin dashboard.
    Admin,
    /// The user dashboard; `pending_approval` shows the "admin request
    /// pending" notice for accounts still in the approval queue.
    User {
        /// True for `admin_request` accounts.
        pending_approval: bool,
    },
}

/// A successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    /// The newly created identity.
    pub identity: Identity,
    /// The role actually recorded (never `admin` from self-service).
    pub role: Role,
}

/// A successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    /// The verified identity.
    pub identity: Identity,
    /// The role the account logged in as.
    pub role: Role,
    /// Where to route.
    pub landing: Landing,
}

/// Account service.
///
/// Cheap to clone; holds shared handles to its collaborators.
#[derive(Clone)]
pub struct AccountService {
    identity: Arc<dyn IdentityGateway>,
    directory: Arc<dyn ProfileDirectory>,
    audit: AuditLog,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(
        identity: Arc<dyn IdentityGateway>,
        directory: Arc<dyn ProfileDirectory>,
        audit: AuditLog,
    ) -> Self {
        Self {
            identity,
            directory,
            audit,
        }
    }

    /// Register a new account.
    ///
    /// The duplicate check runs against the email mapping before anything is
    /// created; a hit means no identity and no records are written. After
    /// identity creation, mapping and profile are written sequentially with
    /// no rollback - a failure between the two surfaces as
    /// [`AccountError::ProfileWriteFailed`] rather than being masked.
    ///
    /// # Errors
    ///
    /// `InvalidEmail`, `DuplicateAccount`, `IdentityCreationFailed`,
    /// `ProfileWriteFailed`, or `Gateway`.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        hint: RoleHint,
    ) -> Result<Registration, AccountError> {
        let email = Email::parse(email)?;

        if let Some(existing) = self.directory.get_by_email(&email).await? {
            self.audit.record(
                None,
                "registerAttemptDuplicateEmail",
                json!({ "email": email.as_str(), "existingRole": existing.role.as_str() }),
            );
            return Err(AccountError::DuplicateAccount {
                existing_role: existing.role,
            });
        }

        let identity = match self.identity.create_identity(&email, password).await {
            Ok(identity) => identity,
            Err(err) => {
                self.audit.record(
                    None,
                    "registerFailed",
                    json!({ "email": email.as_str(), "error": err.to_string() }),
                );
                return Err(register_failure(err));
            }
        };
        self.audit.record(Some(identity.uid.clone()), "register", json!({}));

        let role = hint.requested_role();

        // Two independent writes, mapping first. No rollback: a profile
        // failure leaves the mapping in place (see DESIGN.md).
        if let Err(source) = self
            .directory
            .create_mapping(&email, &identity.uid, &role)
            .await
        {
            self.audit.record(
                Some(identity.uid.clone()),
                "registerFailed",
                json!({ "email": email.as_str(), "error": source.to_string() }),
            );
            return Err(AccountError::ProfileWriteFailed {
                stage: WriteStage::EmailMapping,
                source,
            });
        }

        if let Err(source) = self
            .directory
            .create_profile(&identity.uid, &email, &role)
            .await
        {
            self.audit.record(
                Some(identity.uid.clone()),
                "registerFailed",
                json!({ "email": email.as_str(), "error": source.to_string() }),
            );
            return Err(AccountError::ProfileWriteFailed {
                stage: WriteStage::Profile,
                source,
            });
        }

        self.audit.record(
            Some(identity.uid.clone()),
            "createProfile",
            json!({ "email": email.as_str(), "role": role.as_str() }),
        );

        Ok(Registration { identity, role })
    }

    /// Log an account in and resolve its landing view.
    ///
    /// The mapping lookup runs first; an unknown email fails with
    /// [`AccountError::NoAccount`] without ever reaching the identity
    /// provider, so the response does not leak whether the password would
    /// have been valid.
    ///
    /// # Errors
    ///
    /// `InvalidEmail`, `NoAccount`, `InvalidCredential`, `UnknownRole`, or
    /// `Gateway`.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSuccess, AccountError> {
        let email = Email::parse(email)?;

        let Some(mapping) = self.directory.get_by_email(&email).await? else {
            self.audit.record(
                None,
                "loginFailedNoProfile",
                json!({ "email": email.as_str() }),
            );
            return Err(AccountError::NoAccount);
        };

        let identity = match self.identity.verify_identity(&email, password).await {
            Ok(identity) => identity,
            Err(err) => {
                self.audit.record(
                    None,
                    "loginFailed",
                    json!({ "email": email.as_str(), "error": err.to_string() }),
                );
                return Err(login_failure(err));
            }
        };
        self.audit.record(Some(identity.uid.clone()), "login", json!({}));

        let landing = match &mapping.role {
            Role::Admin => Landing::Admin,
            Role::User => Landing::User {
                pending_approval: false,
            },
            Role::AdminRequest => Landing::User {
                pending_approval: true,
            },
            Role::Unknown(other) => {
                self.audit.record(
                    Some(identity.uid.clone()),
                    "loginFailed",
                    json!({ "email": email.as_str(), "role": other }),
                );
                return Err(AccountError::UnknownRole(other.clone()));
            }
        };

        self.audit.record(
            Some(identity.uid.clone()),
            "loginSuccess",
            json!({ "role": mapping.role.as_str() }),
        );

        Ok(LoginSuccess {
            identity,
            role: mapping.role,
            landing,
        })
    }

    /// End the current session and log the prior uid (or none).
    ///
    /// # Errors
    ///
    /// `Gateway` if the identity provider sign-out fails.
    pub async fn logout(&self, uid: Option<&Uid>) -> Result<(), AccountError> {
        self.identity
            .end_session(uid)
            .await
            .map_err(|err| AccountError::Gateway(crate::gateway::GatewayError::Backend(
                err.to_string(),
            )))?;

        self.audit.record(uid.cloned(), "logout", json!({}));
        Ok(())
    }

    /// Promote a pending admin request.
    ///
    /// Updates the email mapping first, then the profile when the mapping
    /// carries a uid - in that order, sequentially, with no transaction. A
    /// crash between the two leaves the pair disagreeing (see DESIGN.md).
    ///
    /// # Errors
    ///
    /// `InvalidEmail`, `EmailNotFound`, or `Gateway`.
    pub async fn approve_admin(&self, email: &str) -> Result<(), AccountError> {
        let email = Email::parse(email)?;

        let Some(mapping) = self.directory.get_by_email(&email).await? else {
            return Err(AccountError::EmailNotFound);
        };

        self.directory
            .set_mapping_role(&email, &Role::Admin)
            .await
            .map_err(|err| match err {
                crate::gateway::GatewayError::NotFound => AccountError::EmailNotFound,
                other => AccountError::Gateway(other),
            })?;

        if let Some(uid) = &mapping.uid {
            self.directory.set_role(uid, &Role::Admin).await?;
        }

        self.audit.record(
            None,
            "approveAdmin",
            json!({ "email": email.as_str() }),
        );
        Ok(())
    }

    /// The email mappings currently awaiting admin approval.
    ///
    /// # Errors
    ///
    /// `Gateway` if the directory listing fails.
    pub async fn admin_requests(&self) -> Result<Vec<EmailMapping>, AccountError> {
        Ok(self.directory.admin_requests().await?)
    }
}

/// Map an identity-provider failure during registration.
///
/// Every provider-level rejection surfaces as `IdentityCreationFailed` with
/// the provider's message passed through.
fn register_failure(err: IdentityError) -> AccountError {
    AccountError::IdentityCreationFailed(err.to_string())
}

/// Map an identity-provider failure during login.
fn login_failure(err: IdentityError) -> AccountError {
    match err {
        IdentityError::InvalidCredential => AccountError::InvalidCredential,
        other => AccountError::Gateway(crate::gateway::GatewayError::Backend(other.to_string())),
    }
}
