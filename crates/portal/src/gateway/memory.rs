//! In-memory backend implementing every gateway contract.
//!
//! Backs the portal when no managed backend is wired in: development, demos,
//! and the service-level tests. Passwords are hashed with Argon2id exactly as
//! a real identity provider would, so the verify path is not a stub.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, broadcast};
use uuid::Uuid;

use galleria_core::{Email, OfferId, Price, Role, ShopId, Uid};

use super::{
    AuditStore, CatalogStore, GatewayError, IdentityError, IdentityGateway, ProfileDirectory,
    SessionChange,
};
use crate::models::audit::{AuditEvent, LogEntry};
use crate::models::{
    EmailMapping, Identity, NewOffer, NewShop, Offer, OfferUpdate, Product, Profile, Shop,
    ShopUpdate,
};

/// Minimum password length accepted by the in-memory provider.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Capacity of the session-change broadcast channel.
const SESSION_CHANNEL_CAPACITY: usize = 16;

/// A stored identity: uid plus the password hash.
struct StoredIdentity {
    uid: Uid,
    password_hash: String,
}

/// In-memory implementation of all four gateway contracts.
///
/// Collections are plain maps/vectors behind async mutexes; list order is
/// insertion order. The `verify_calls` / `create_calls` counters let tests
/// assert that a flow never reached the provider.
pub struct MemoryBackend {
    identities: Mutex<HashMap<String, StoredIdentity>>,
    profiles: Mutex<HashMap<String, Profile>>,
    mappings: Mutex<HashMap<String, EmailMapping>>,
    shops: Mutex<Vec<Shop>>,
    offers: Mutex<Vec<Offer>>,
    logs: Mutex<Vec<LogEntry>>,
    session_tx: broadcast::Sender<SessionChange>,
    verify_calls: AtomicU64,
    create_calls: AtomicU64,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        let (session_tx, _) = broadcast::channel(SESSION_CHANNEL_CAPACITY);
        Self {
            identities: Mutex::new(HashMap::new()),
            profiles: Mutex::new(HashMap::new()),
            mappings: Mutex::new(HashMap::new()),
            shops: Mutex::new(Vec::new()),
            offers: Mutex::new(Vec::new()),
            logs: Mutex::new(Vec::new()),
            session_tx,
            verify_calls: AtomicU64::new(0),
            create_calls: AtomicU64::new(0),
        }
    }
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times `verify_identity` has been called.
    #[must_use]
    pub fn verify_calls(&self) -> u64 {
        self.verify_calls.load(Ordering::Relaxed)
    }

    /// How many times `create_identity` has been called.
    #[must_use]
    pub fn create_calls(&self) -> u64 {
        self.create_calls.load(Ordering::Relaxed)
    }

    fn publish(&self, change: SessionChange) {
        // Nobody listening is fine; the subscription is optional.
        let _ = self.session_tx.send(change);
    }

    /// Seed demo accounts and a small catalog.
    ///
    /// Development/demo only, behind `GALLERIA_SEED_DEMO`. Credentials:
    /// `admin@galleria.test` / `demo-admin-pass` and
    /// `shopper@galleria.test` / `demo-shopper-pass`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Backend` if any seed write fails.
    pub async fn seed_demo(&self) -> Result<(), GatewayError> {
        let admin = self
            .seed_account("admin@galleria.test", "demo-admin-pass", &Role::Admin)
            .await?;
        self.seed_account("shopper@galleria.test", "demo-shopper-pass", &Role::User)
            .await?;

        let voltage = self
            .create_shop(NewShop {
                name: "Voltage".to_owned(),
                category: "Electronics".to_owned(),
                floor: "2".to_owned(),
                description: "Consumer electronics and accessories".to_owned(),
                owner_uid: admin.uid.clone(),
            })
            .await?;
        let circuit_city = self
            .create_shop(NewShop {
                name: "Circuit City".to_owned(),
                category: "Electronics".to_owned(),
                floor: "1".to_owned(),
                description: "Gadgets, cables, and repairs".to_owned(),
                owner_uid: admin.uid.clone(),
            })
            .await?;
        let bean_there = self
            .create_shop(NewShop {
                name: "Bean There".to_owned(),
                category: "Food".to_owned(),
                floor: "1".to_owned(),
                description: "Coffee and cake".to_owned(),
                owner_uid: admin.uid.clone(),
            })
            .await?;

        let offers = [
            (&voltage, "Weekend deal", "Wireless Headphones", "129.99", Some("Noise cancelling")),
            (&circuit_city, "Clearance", "Wireless Headphones", "99.99", None),
            (&voltage, "New arrival", "Espresso Machine", "249", Some("15 bar pump")),
            (&bean_there, "Morning special", "Espresso", "3.50", Some("Double shot")),
        ];
        for (shop_id, title, product, price, features) in offers {
            let price = Price::parse(price)
                .map_err(|e| GatewayError::Backend(format!("seed price: {e}")))?;
            self.create_offer(NewOffer {
                shop_id: shop_id.clone(),
                title: (*title).to_owned(),
                product: Product {
                    name: (*product).to_owned(),
                    price,
                    features: features.map(str::to_owned),
                },
                created_by: admin.uid.clone(),
            })
            .await?;
        }

        Ok(())
    }

    async fn seed_account(
        &self,
        email: &str,
        password: &str,
        role: &Role,
    ) -> Result<Identity, GatewayError> {
        let email = Email::parse(email)
            .map_err(|e| GatewayError::Backend(format!("seed email: {e}")))?;
        let identity = self
            .create_identity(&email, password)
            .await
            .map_err(|e| GatewayError::Backend(format!("seed identity: {e}")))?;

        self.create_mapping(&email, &identity.uid, role).await?;
        self.create_profile(&identity.uid, &email, role).await?;
        Ok(identity)
    }
}

#[async_trait]
impl IdentityGateway for MemoryBackend {
    async fn create_identity(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        self.create_calls.fetch_add(1, Ordering::Relaxed);

        validate_password(password)?;

        let mut identities = self.identities.lock().await;
        if identities.contains_key(email.as_str()) {
            return Err(IdentityError::EmailInUse);
        }

        let uid = Uid::new(Uuid::new_v4().to_string());
        let password_hash = hash_password(password)?;
        identities.insert(
            email.as_str().to_owned(),
            StoredIdentity {
                uid: uid.clone(),
                password_hash,
            },
        );

        Ok(Identity {
            uid,
            email: email.clone(),
        })
    }

    async fn verify_identity(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<Identity, IdentityError> {
        self.verify_calls.fetch_add(1, Ordering::Relaxed);

        let identities = self.identities.lock().await;
        let stored = identities
            .get(email.as_str())
            .ok_or(IdentityError::InvalidCredential)?;

        verify_password(password, &stored.password_hash)?;

        let identity = Identity {
            uid: stored.uid.clone(),
            email: email.clone(),
        };
        drop(identities);

        self.publish(SessionChange::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn end_session(&self, uid: Option<&Uid>) -> Result<(), IdentityError> {
        self.publish(SessionChange::SignedOut(uid.cloned()));
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.session_tx.subscribe()
    }
}

#[async_trait]
impl ProfileDirectory for MemoryBackend {
    async fn get(&self, uid: &Uid) -> Result<Option<Profile>, GatewayError> {
        Ok(self.profiles.lock().await.get(uid.as_str()).cloned())
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<EmailMapping>, GatewayError> {
        Ok(self.mappings.lock().await.get(email.as_str()).cloned())
    }

    async fn create_mapping(
        &self,
        email: &Email,
        uid: &Uid,
        role: &Role,
    ) -> Result<(), GatewayError> {
        let mut mappings = self.mappings.lock().await;
        if mappings.contains_key(email.as_str()) {
            return Err(GatewayError::Conflict("email mapping exists".to_owned()));
        }

        mappings.insert(
            email.as_str().to_owned(),
            EmailMapping {
                email: email.clone(),
                uid: Some(uid.clone()),
                role: role.clone(),
            },
        );
        Ok(())
    }

    async fn create_profile(
        &self,
        uid: &Uid,
        email: &Email,
        role: &Role,
    ) -> Result<Profile, GatewayError> {
        let profile = Profile {
            uid: uid.clone(),
            email: email.clone(),
            role: role.clone(),
            created_at: Utc::now(),
        };

        self.profiles
            .lock()
            .await
            .insert(uid.as_str().to_owned(), profile.clone());
        Ok(profile)
    }

    async fn set_mapping_role(&self, email: &Email, role: &Role) -> Result<(), GatewayError> {
        let mut mappings = self.mappings.lock().await;
        let mapping = mappings
            .get_mut(email.as_str())
            .ok_or(GatewayError::NotFound)?;
        mapping.role = role.clone();
        Ok(())
    }

    async fn set_role(&self, uid: &Uid, role: &Role) -> Result<(), GatewayError> {
        let mut profiles = self.profiles.lock().await;
        let profile = profiles
            .get_mut(uid.as_str())
            .ok_or(GatewayError::NotFound)?;
        profile.role = role.clone();
        Ok(())
    }

    async fn admin_requests(&self) -> Result<Vec<EmailMapping>, GatewayError> {
        let mappings = self.mappings.lock().await;
        let mut requests: Vec<EmailMapping> = mappings
            .values()
            .filter(|m| m.role == Role::AdminRequest)
            .cloned()
            .collect();
        // Map iteration order is arbitrary; keep the listing stable.
        requests.sort_by(|a, b| a.email.as_str().cmp(b.email.as_str()));
        Ok(requests)
    }
}

#[async_trait]
impl CatalogStore for MemoryBackend {
    async fn create_shop(&self, shop: NewShop) -> Result<ShopId, GatewayError> {
        let id = ShopId::new(Uuid::new_v4().to_string());
        let now = Utc::now();

        self.shops.lock().await.push(Shop {
            id: id.clone(),
            name: shop.name,
            category: shop.category,
            floor: shop.floor,
            description: shop.description,
            owner_uid: shop.owner_uid,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn list_shops(&self) -> Result<Vec<Shop>, GatewayError> {
        Ok(self.shops.lock().await.clone())
    }

    async fn update_shop(&self, id: &ShopId, update: ShopUpdate) -> Result<(), GatewayError> {
        let mut shops = self.shops.lock().await;
        let shop = shops
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or(GatewayError::NotFound)?;

        shop.name = update.name;
        shop.category = update.category;
        shop.floor = update.floor;
        shop.description = update.description;
        shop.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_shop(&self, id: &ShopId) -> Result<(), GatewayError> {
        self.shops.lock().await.retain(|s| &s.id != id);
        Ok(())
    }

    async fn create_offer(&self, offer: NewOffer) -> Result<OfferId, GatewayError> {
        let id = OfferId::new(Uuid::new_v4().to_string());
        let now = Utc::now();

        self.offers.lock().await.push(Offer {
            id: id.clone(),
            shop_id: offer.shop_id,
            title: offer.title,
            product: offer.product,
            created_by: offer.created_by,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn list_offers(&self) -> Result<Vec<Offer>, GatewayError> {
        Ok(self.offers.lock().await.clone())
    }

    async fn update_offer(&self, id: &OfferId, update: OfferUpdate) -> Result<(), GatewayError> {
        let mut offers = self.offers.lock().await;
        let offer = offers
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or(GatewayError::NotFound)?;

        offer.shop_id = update.shop_id;
        offer.title = update.title;
        offer.product = update.product;
        offer.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_offer(&self, id: &OfferId) -> Result<(), GatewayError> {
        self.offers.lock().await.retain(|o| &o.id != id);
        Ok(())
    }
}

#[async_trait]
impl AuditStore for MemoryBackend {
    async fn record(&self, event: AuditEvent) -> Result<(), GatewayError> {
        self.logs.lock().await.push(LogEntry {
            uid: event.uid,
            action: event.action,
            meta: event.meta,
            ts: Utc::now(),
        });
        Ok(())
    }

    async fn recent(&self, limit: usize) -> Result<Vec<LogEntry>, GatewayError> {
        let logs = self.logs.lock().await;
        Ok(logs.iter().rev().take(limit).cloned().collect())
    }
}

/// Validate a password meets the provider's requirements.
fn validate_password(password: &str) -> Result<(), IdentityError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(IdentityError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::Backend(format!("password hashing failed: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), IdentityError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| IdentityError::InvalidCredential)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| IdentityError::InvalidCredential)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email(s: &str) -> Email {
        Email::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_identity_rejects_duplicate_email() {
        let backend = MemoryBackend::new();
        backend
            .create_identity(&email("a@x.com"), "long-enough-pw")
            .await
            .unwrap();

        let err = backend
            .create_identity(&email("a@x.com"), "another-long-pw")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::EmailInUse));
    }

    #[tokio::test]
    async fn test_create_identity_rejects_short_password() {
        let backend = MemoryBackend::new();
        let err = backend
            .create_identity(&email("a@x.com"), "short")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::WeakPassword(_)));
    }

    #[tokio::test]
    async fn test_verify_identity_roundtrip() {
        let backend = MemoryBackend::new();
        let created = backend
            .create_identity(&email("a@x.com"), "long-enough-pw")
            .await
            .unwrap();

        let verified = backend
            .verify_identity(&email("a@x.com"), "long-enough-pw")
            .await
            .unwrap();
        assert_eq!(verified.uid, created.uid);

        let err = backend
            .verify_identity(&email("a@x.com"), "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, IdentityError::InvalidCredential));
    }

    #[tokio::test]
    async fn test_session_changes_are_broadcast() {
        let backend = MemoryBackend::new();
        let mut rx = backend.subscribe();

        backend
            .create_identity(&email("a@x.com"), "long-enough-pw")
            .await
            .unwrap();
        let identity = backend
            .verify_identity(&email("a@x.com"), "long-enough-pw")
            .await
            .unwrap();

        match rx.recv().await.unwrap() {
            SessionChange::SignedIn(signed_in) => assert_eq!(signed_in.uid, identity.uid),
            other => panic!("expected SignedIn, got {other:?}"),
        }

        backend.end_session(Some(&identity.uid)).await.unwrap();
        match rx.recv().await.unwrap() {
            SessionChange::SignedOut(uid) => assert_eq!(uid, Some(identity.uid)),
            other => panic!("expected SignedOut, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mapping_uniqueness() {
        let backend = MemoryBackend::new();
        let uid = Uid::new("u1");
        backend
            .create_mapping(&email("a@x.com"), &uid, &Role::User)
            .await
            .unwrap();

        let err = backend
            .create_mapping(&email("a@x.com"), &Uid::new("u2"), &Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_admin_requests_filters_by_role() {
        let backend = MemoryBackend::new();
        backend
            .create_mapping(&email("b@x.com"), &Uid::new("u2"), &Role::AdminRequest)
            .await
            .unwrap();
        backend
            .create_mapping(&email("a@x.com"), &Uid::new("u1"), &Role::User)
            .await
            .unwrap();
        backend
            .create_mapping(&email("c@x.com"), &Uid::new("u3"), &Role::AdminRequest)
            .await
            .unwrap();

        let requests = backend.admin_requests().await.unwrap();
        let emails: Vec<&str> = requests.iter().map(|m| m.email.as_str()).collect();
        assert_eq!(emails, vec!["b@x.com", "c@x.com"]);
    }

    #[tokio::test]
    async fn test_shop_crud() {
        let backend = MemoryBackend::new();
        let id = backend
            .create_shop(NewShop {
                name: "Bean There".to_owned(),
                category: "Food".to_owned(),
                floor: "1".to_owned(),
                description: "Coffee".to_owned(),
                owner_uid: Uid::new("admin"),
            })
            .await
            .unwrap();

        backend
            .update_shop(
                &id,
                ShopUpdate {
                    name: "Bean There".to_owned(),
                    category: "Food".to_owned(),
                    floor: "2".to_owned(),
                    description: "Coffee and cake".to_owned(),
                },
            )
            .await
            .unwrap();

        let shops = backend.list_shops().await.unwrap();
        assert_eq!(shops.len(), 1);
        assert_eq!(shops.first().unwrap().floor, "2");

        backend.delete_shop(&id).await.unwrap();
        assert!(backend.list_shops().await.unwrap().is_empty());

        // Deleting again is not an error.
        backend.delete_shop(&id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_offer_is_not_found() {
        let backend = MemoryBackend::new();
        let err = backend
            .update_offer(
                &OfferId::new("nope"),
                OfferUpdate {
                    shop_id: ShopId::new("s1"),
                    title: "t".to_owned(),
                    product: Product {
                        name: "p".to_owned(),
                        price: Price::parse("1").unwrap(),
                        features: None,
                    },
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::NotFound));
    }

    #[tokio::test]
    async fn test_recent_logs_newest_first() {
        let backend = MemoryBackend::new();
        for action in ["first", "second", "third"] {
            backend
                .record(AuditEvent {
                    uid: None,
                    action: action.to_owned(),
                    meta: serde_json::json!({}),
                })
                .await
                .unwrap();
        }

        let recent = backend.recent(2).await.unwrap();
        let actions: Vec<&str> = recent.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(actions, vec!["third", "second"]);
    }
}
