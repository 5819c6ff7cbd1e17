//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::PortalConfig;
use crate::gateway::{AuditStore, CatalogStore, IdentityGateway, ProfileDirectory};
use crate::services::account::AccountService;
use crate::services::audit::AuditLog;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; holds the configuration, the gateway
/// handles, and the services built on top of them. A single backend object
/// typically implements every gateway trait, but nothing here assumes that.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    catalog: Arc<dyn CatalogStore>,
    audit_store: Arc<dyn AuditStore>,
    audit: AuditLog,
    accounts: AccountService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Spawns the audit drain task and wires the account service to the
    /// given gateways.
    #[must_use]
    pub fn new(
        config: PortalConfig,
        identity: Arc<dyn IdentityGateway>,
        directory: Arc<dyn ProfileDirectory>,
        catalog: Arc<dyn CatalogStore>,
        audit_store: Arc<dyn AuditStore>,
    ) -> Self {
        let audit = AuditLog::spawn(audit_store.clone());
        let accounts = AccountService::new(identity, directory, audit.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                audit_store,
                audit,
                accounts,
            }),
        }
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog store gateway.
    #[must_use]
    pub fn catalog(&self) -> &Arc<dyn CatalogStore> {
        &self.inner.catalog
    }

    /// Get a reference to the audit store gateway (log viewer reads).
    #[must_use]
    pub fn audit_store(&self) -> &Arc<dyn AuditStore> {
        &self.inner.audit_store
    }

    /// Get the audit recording handle.
    #[must_use]
    pub fn audit(&self) -> &AuditLog {
        &self.inner.audit
    }

    /// Get a reference to the account service.
    #[must_use]
    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }
}
