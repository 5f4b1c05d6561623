//! In-memory credential store for single-node deployments and tests.

use std::path::Path;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use authd_core::error::AuthError;
use authd_core::result::AuthResult;
use authd_entity::credential::CredentialRecord;
use authd_entity::identity::{AccountStatus, Identity};

use crate::adapter::CredentialStore;

/// One seed-file entry: an identity plus its current credential record.
///
/// Seed files carry hashed representations only; a raw secret never
/// appears on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedEntry {
    /// The enrolled identity.
    pub identity: Identity,
    /// Its current credential record.
    pub credential: CredentialRecord,
}

/// In-memory credential store backed by dashmap tables.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    /// Identities by id.
    identities: DashMap<String, Identity>,
    /// Current credential record per identity.
    credentials: DashMap<String, CredentialRecord>,
    /// Consecutive-failure counters.
    failures: DashMap<String, u32>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a JSON seed file of enrolled identities.
    pub async fn from_seed_file(path: impl AsRef<Path>) -> AuthResult<Self> {
        let raw = tokio::fs::read_to_string(path.as_ref()).await.map_err(|e| {
            AuthError::configuration(format!(
                "Failed to read identity seed '{}': {e}",
                path.as_ref().display()
            ))
        })?;

        let entries: Vec<SeedEntry> = serde_json::from_str(&raw)?;

        let store = Self::new();
        for entry in entries {
            store.enroll(entry.identity, entry.credential);
        }

        info!(identities = store.identities.len(), "Identity seed loaded");
        Ok(store)
    }

    /// Register an identity and its credential record.
    ///
    /// Replaces any previous enrollment for the same id and clears the
    /// failure counter.
    pub fn enroll(&self, identity: Identity, credential: CredentialRecord) {
        self.failures.remove(&identity.id);
        self.credentials.insert(identity.id.clone(), credential);
        self.identities.insert(identity.id.clone(), identity);
    }

    /// Replace the credential record for an identity and bump its current
    /// credential version, as an out-of-band rotation would.
    pub fn rotate_credential(&self, identity_ref: &str, credential: CredentialRecord) {
        if let Some(mut identity) = self.identities.get_mut(identity_ref) {
            identity.credential_version = credential.version;
        }
        self.credentials.insert(identity_ref.to_string(), credential);
    }

    /// Number of enrolled identities.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Whether no identities are enrolled.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn load_identity(&self, identity_ref: &str) -> AuthResult<Option<Identity>> {
        Ok(self.identities.get(identity_ref).map(|i| i.clone()))
    }

    async fn load_credential(&self, identity_ref: &str) -> AuthResult<Option<CredentialRecord>> {
        Ok(self.credentials.get(identity_ref).map(|c| c.clone()))
    }

    async fn increment_failure(&self, identity_ref: &str) -> AuthResult<u32> {
        let mut counter = self.failures.entry(identity_ref.to_string()).or_insert(0);
        *counter += 1;
        Ok(*counter)
    }

    async fn reset_failures(&self, identity_ref: &str) -> AuthResult<()> {
        self.failures.remove(identity_ref);
        Ok(())
    }

    async fn set_locked(&self, identity_ref: &str) -> AuthResult<()> {
        match self.identities.get_mut(identity_ref) {
            Some(mut identity) => {
                identity.status = AccountStatus::Locked;
                Ok(())
            }
            None => {
                warn!(identity = %identity_ref, "Lock requested for unknown identity");
                Ok(())
            }
        }
    }
}
