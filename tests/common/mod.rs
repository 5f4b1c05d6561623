//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use authd_auth::policy::PolicyEngine;
use authd_auth::session::SessionManager;
use authd_auth::token::{SigningKeyRing, TokenCodec};
use authd_auth::verifier::{CredentialVerifier, SecretHasher};
use authd_core::config::credential::CredentialConfig;
use authd_core::config::session::SessionConfig;
use authd_core::config::token::TokenConfig;
use authd_entity::credential::{CredentialKind, CredentialRecord};
use authd_entity::identity::{AccountStatus, Identity};
use authd_entity::policy::PolicyRule;
use authd_ipc::Dispatcher;
use authd_store::{CredentialStore, MemoryCredentialStore};

/// A fully wired daemon core over an in-memory store.
pub struct TestAuthd {
    pub store: Arc<MemoryCredentialStore>,
    pub verifier: Arc<CredentialVerifier>,
    pub sessions: Arc<SessionManager>,
    pub ring: Arc<SigningKeyRing>,
    pub codec: Arc<TokenCodec>,
    pub policy: Arc<PolicyEngine>,
    pub dispatcher: Dispatcher,
}

/// Tunables for a test daemon; defaults are test-friendly.
pub struct TestConfig {
    pub credential: CredentialConfig,
    pub session: SessionConfig,
    pub token: TokenConfig,
    pub rules: Vec<PolicyRule>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            credential: CredentialConfig {
                lockout_threshold: 3,
                store_timeout_ms: 500,
            },
            session: SessionConfig {
                ttl_seconds: 60,
                max_per_identity: 0,
                sweep_interval_seconds: 1,
                audit_retention_seconds: 0,
            },
            token: TokenConfig {
                signing_secret: "integration-test-secret".to_string(),
                rotation_period_seconds: 0,
                retention_seconds: 3600,
            },
            rules: Vec::new(),
        }
    }
}

impl TestAuthd {
    /// Wires a daemon core from the given tunables.
    pub fn with(config: TestConfig) -> Self {
        let store = Arc::new(MemoryCredentialStore::new());
        Self::with_store(config, store.clone(), store)
    }

    /// Wires a daemon core over an arbitrary store implementation, keeping
    /// a handle to the in-memory store used for enrollment when there is
    /// one.
    pub fn with_store(
        config: TestConfig,
        memory: Arc<MemoryCredentialStore>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        let verifier = Arc::new(CredentialVerifier::new(store, config.credential));
        let sessions = Arc::new(SessionManager::new(config.session));
        let ring = Arc::new(SigningKeyRing::new(&config.token));
        let codec = Arc::new(TokenCodec::new(Arc::clone(&ring)));
        let policy = Arc::new(PolicyEngine::new(&config.rules));

        let dispatcher = Dispatcher::new(
            Arc::clone(&verifier),
            Arc::clone(&sessions),
            Arc::clone(&codec),
            Arc::clone(&policy),
        );

        Self {
            store: memory,
            verifier,
            sessions,
            ring,
            codec,
            policy,
            dispatcher,
        }
    }

    /// Wires a daemon core with default tunables.
    pub fn new() -> Self {
        Self::with(TestConfig::default())
    }

    /// Enrolls an active identity with a passphrase credential.
    pub fn enroll(&self, id: &str, secret: &str, groups: &[&str]) {
        enroll_into(&self.store, id, secret, groups, AccountStatus::Active);
    }

    /// Enrolls an identity in the given account status.
    pub fn enroll_with_status(
        &self,
        id: &str,
        secret: &str,
        groups: &[&str],
        status: AccountStatus,
    ) {
        enroll_into(&self.store, id, secret, groups, status);
    }
}

/// Hashes a secret and enrolls identity plus credential into a store.
pub fn enroll_into(
    store: &MemoryCredentialStore,
    id: &str,
    secret: &str,
    groups: &[&str],
    status: AccountStatus,
) {
    let hasher = SecretHasher::new();
    let hash = hasher
        .hash(CredentialKind::Passphrase, secret)
        .expect("hashing test secret");

    let identity = Identity {
        id: id.to_string(),
        groups: groups.iter().map(|g| g.to_string()).collect(),
        status,
        credential_version: 1,
    };
    let credential = CredentialRecord {
        identity: id.to_string(),
        kind: CredentialKind::Passphrase,
        hash,
        version: 1,
    };

    store.enroll(identity, credential);
}

/// A policy rule literal for tests.
pub fn rule(subject: &str, resource: &str, action: &str, effect: &str) -> PolicyRule {
    PolicyRule {
        subject: subject.to_string(),
        resource: resource.to_string(),
        action: action.to_string(),
        effect: effect.parse().expect("test rule effect"),
    }
}
