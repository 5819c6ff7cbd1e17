//! Gateway contracts for the external managed backend.
//!
//! Everything the portal persists or verifies lives behind these traits:
//! the identity provider, the profile/email-mapping directory, the shop and
//! offer collections, and the audit log. The portal core never talks to a
//! concrete backend type - handlers and services hold `Arc<dyn ...>` and the
//! binary decides what plugs in (currently the in-memory backend in
//! [`memory`]).

pub mod memory;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

use galleria_core::{Email, OfferId, Role, ShopId, Uid};

use crate::models::audit::{AuditEvent, LogEntry};
use crate::models::{
    EmailMapping, Identity, NewOffer, NewShop, Offer, OfferUpdate, Profile, Shop, ShopUpdate,
};

/// Errors from the document-store gateways.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend call itself failed (network, quota, ...).
    #[error("backend error: {0}")]
    Backend(String),

    /// Requested document was not found.
    #[error("not found")]
    NotFound,

    /// Uniqueness violation (e.g. email mapping already exists).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored document does not match the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Errors from the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// The provider already has an identity for this email.
    #[error("email already in use")]
    EmailInUse,

    /// The password does not meet the provider's requirements.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// The provider rejected the email as malformed.
    #[error("malformed email: {0}")]
    Malformed(String),

    /// Email/password pair did not verify.
    #[error("invalid credentials")]
    InvalidCredential,

    /// The provider call itself failed.
    #[error("identity provider error: {0}")]
    Backend(String),
}

/// A session transition published by the identity provider.
///
/// The application boundary subscribes once and logs transitions; no global
/// current-user state is derived from this.
#[derive(Debug, Clone)]
pub enum SessionChange {
    /// A credential verified and a session began.
    SignedIn(Identity),
    /// A session ended (uid when one was known).
    SignedOut(Option<Uid>),
}

/// The identity provider: credential issuance and verification.
#[async_trait]
pub trait IdentityGateway: Send + Sync {
    /// Create a new identity for an email/password pair.
    ///
    /// # Errors
    ///
    /// `EmailInUse`, `WeakPassword`, or `Malformed` for provider-level
    /// rejections; `Backend` if the call itself fails.
    async fn create_identity(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, IdentityError>;

    /// Verify an email/password pair and begin a session.
    ///
    /// # Errors
    ///
    /// `InvalidCredential` on mismatch or unknown email (the provider does
    /// not distinguish the two); `Backend` if the call itself fails.
    async fn verify_identity(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, IdentityError>;

    /// End the current session, if any.
    ///
    /// # Errors
    ///
    /// `Backend` if the call itself fails.
    async fn end_session(&self, uid: Option<&Uid>) -> Result<(), IdentityError>;

    /// Subscribe to session transitions (sign-in, sign-out).
    fn subscribe(&self) -> broadcast::Receiver<SessionChange>;
}

/// The profile directory: profiles keyed by uid plus the email mapping
/// secondary index.
///
/// Mapping and profile writes are independent operations with no transaction
/// across them; callers sequence them and surface partial failures.
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Fetch a profile by uid.
    async fn get(&self, uid: &Uid) -> Result<Option<Profile>, GatewayError>;

    /// Fetch the email mapping for an email, if any.
    async fn get_by_email(&self, email: &Email) -> Result<Option<EmailMapping>, GatewayError>;

    /// Write the email mapping for a new account.
    ///
    /// # Errors
    ///
    /// `Conflict` if a mapping already exists for this email.
    async fn create_mapping(
        &self,
        email: &Email,
        uid: &Uid,
        role: &Role,
    ) -> Result<(), GatewayError>;

    /// Write the profile for a new account. The store assigns `created_at`.
    async fn create_profile(
        &self,
        uid: &Uid,
        email: &Email,
        role: &Role,
    ) -> Result<Profile, GatewayError>;

    /// Update the role on an email mapping.
    ///
    /// # Errors
    ///
    /// `NotFound` if no mapping exists for this email.
    async fn set_mapping_role(&self, email: &Email, role: &Role) -> Result<(), GatewayError>;

    /// Update the role on a profile.
    ///
    /// # Errors
    ///
    /// `NotFound` if no profile exists for this uid.
    async fn set_role(&self, uid: &Uid, role: &Role) -> Result<(), GatewayError>;

    /// List the email mappings whose role is `admin_request`.
    async fn admin_requests(&self) -> Result<Vec<EmailMapping>, GatewayError>;
}

/// The shop/offer collections.
///
/// List operations return the full unfiltered collection; all filtering and
/// comparison happens in memory in `services::catalog`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Create a shop; the store assigns the id and timestamps.
    async fn create_shop(&self, shop: NewShop) -> Result<ShopId, GatewayError>;

    /// List every shop.
    async fn list_shops(&self) -> Result<Vec<Shop>, GatewayError>;

    /// Update a shop's mutable fields.
    ///
    /// # Errors
    ///
    /// `NotFound` if the shop does not exist.
    async fn update_shop(&self, id: &ShopId, update: ShopUpdate) -> Result<(), GatewayError>;

    /// Delete a shop by id. Deleting a missing shop is not an error.
    async fn delete_shop(&self, id: &ShopId) -> Result<(), GatewayError>;

    /// Create an offer; the store assigns the id and timestamps.
    async fn create_offer(&self, offer: NewOffer) -> Result<OfferId, GatewayError>;

    /// List every offer.
    async fn list_offers(&self) -> Result<Vec<Offer>, GatewayError>;

    /// Update an offer's mutable fields.
    ///
    /// # Errors
    ///
    /// `NotFound` if the offer does not exist.
    async fn update_offer(&self, id: &OfferId, update: OfferUpdate) -> Result<(), GatewayError>;

    /// Delete an offer by id. Deleting a missing offer is not an error.
    async fn delete_offer(&self, id: &OfferId) -> Result<(), GatewayError>;
}

/// The append-only audit log collection.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Append an event; the store assigns the timestamp.
    async fn record(&self, event: AuditEvent) -> Result<(), GatewayError>;

    /// The most recent entries, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<LogEntry>, GatewayError>;
}
