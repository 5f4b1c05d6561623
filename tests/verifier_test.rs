//! Integration tests for credential verification and lockout.

mod common;

use std::sync::Arc;

use async_trait::async_trait;

use authd_auth::verifier::{CredentialVerifier, RejectReason, VerifyResult};
use authd_core::config::credential::CredentialConfig;
use authd_core::error::AuthError;
use authd_core::result::AuthResult;
use authd_entity::credential::{CredentialKind, CredentialRecord};
use authd_entity::identity::{AccountStatus, Identity};
use authd_store::CredentialStore;

use common::{TestAuthd, TestConfig};

#[tokio::test]
async fn test_correct_secret_verifies() {
    let authd = TestAuthd::new();
    authd.enroll("alice", "correct horse", &["users"]);

    match authd.verifier.verify("alice", "correct horse").await {
        VerifyResult::Verified(identity) => assert_eq!(identity.id, "alice"),
        other => panic!("expected Verified, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_identity_rejected() {
    let authd = TestAuthd::new();

    match authd.verifier.verify("nobody", "secret").await {
        VerifyResult::Rejected(RejectReason::UnknownIdentity) => {}
        other => panic!("expected UnknownIdentity, got {other:?}"),
    }
}

#[tokio::test]
async fn test_disabled_account_rejected_even_with_correct_secret() {
    let authd = TestAuthd::new();
    authd.enroll_with_status("mallory", "pw", &[], AccountStatus::Disabled);

    match authd.verifier.verify("mallory", "pw").await {
        VerifyResult::Rejected(RejectReason::AccountDisabled) => {}
        other => panic!("expected AccountDisabled, got {other:?}"),
    }
}

#[tokio::test]
async fn test_consecutive_mismatches_lock_the_account() {
    // Threshold 3 via the default test config.
    let authd = TestAuthd::new();
    authd.enroll("bob", "right", &[]);

    for _ in 0..3 {
        match authd.verifier.verify("bob", "wrong").await {
            VerifyResult::Rejected(RejectReason::CredentialMismatch) => {}
            other => panic!("expected CredentialMismatch, got {other:?}"),
        }
    }

    // The account is now locked; the correct secret no longer verifies.
    match authd.verifier.verify("bob", "right").await {
        VerifyResult::Rejected(RejectReason::AccountLocked) => {}
        other => panic!("expected AccountLocked, got {other:?}"),
    }
}

#[tokio::test]
async fn test_success_resets_the_consecutive_count() {
    let authd = TestAuthd::new();
    authd.enroll("carol", "right", &[]);

    for _ in 0..2 {
        authd.verifier.verify("carol", "wrong").await;
    }
    match authd.verifier.verify("carol", "right").await {
        VerifyResult::Verified(_) => {}
        other => panic!("expected Verified, got {other:?}"),
    }

    // Two more mismatches: still below the threshold after the reset.
    for _ in 0..2 {
        authd.verifier.verify("carol", "wrong").await;
    }
    match authd.verifier.verify("carol", "right").await {
        VerifyResult::Verified(_) => {}
        other => panic!("account locked despite counter reset: {other:?}"),
    }
}

#[tokio::test]
async fn test_credential_version_mismatch_rejected() {
    let authd = TestAuthd::new();

    // Identity expects version 2; the loadable record still carries 1.
    let identity = Identity {
        id: "dave".to_string(),
        groups: vec![],
        status: AccountStatus::Active,
        credential_version: 2,
    };
    let credential = CredentialRecord {
        identity: "dave".to_string(),
        kind: CredentialKind::Passphrase,
        hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        version: 1,
    };
    authd.store.enroll(identity, credential);

    match authd.verifier.verify("dave", "anything").await {
        VerifyResult::Rejected(RejectReason::CredentialRotated) => {}
        other => panic!("expected CredentialRotated, got {other:?}"),
    }
}

/// A store whose every call fails.
struct FailingStore;

#[async_trait]
impl CredentialStore for FailingStore {
    async fn load_identity(&self, _identity_ref: &str) -> AuthResult<Option<Identity>> {
        Err(AuthError::internal("store offline"))
    }

    async fn load_credential(&self, _identity_ref: &str) -> AuthResult<Option<CredentialRecord>> {
        Err(AuthError::internal("store offline"))
    }

    async fn increment_failure(&self, _identity_ref: &str) -> AuthResult<u32> {
        Err(AuthError::internal("store offline"))
    }

    async fn reset_failures(&self, _identity_ref: &str) -> AuthResult<()> {
        Err(AuthError::internal("store offline"))
    }

    async fn set_locked(&self, _identity_ref: &str) -> AuthResult<()> {
        Err(AuthError::internal("store offline"))
    }
}

/// A store whose every call hangs past any reasonable timeout.
struct HangingStore;

#[async_trait]
impl CredentialStore for HangingStore {
    async fn load_identity(&self, _identity_ref: &str) -> AuthResult<Option<Identity>> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok(None)
    }

    async fn load_credential(&self, _identity_ref: &str) -> AuthResult<Option<CredentialRecord>> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok(None)
    }

    async fn increment_failure(&self, _identity_ref: &str) -> AuthResult<u32> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok(0)
    }

    async fn reset_failures(&self, _identity_ref: &str) -> AuthResult<()> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok(())
    }

    async fn set_locked(&self, _identity_ref: &str) -> AuthResult<()> {
        tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        Ok(())
    }
}

#[tokio::test]
async fn test_store_failure_is_indeterminate_not_rejected() {
    let config = CredentialConfig {
        lockout_threshold: 3,
        store_timeout_ms: 500,
    };
    let verifier = CredentialVerifier::new(Arc::new(FailingStore), config);

    match verifier.verify("alice", "secret").await {
        VerifyResult::Indeterminate => {}
        other => panic!("expected Indeterminate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_store_timeout_is_indeterminate() {
    let config = CredentialConfig {
        lockout_threshold: 3,
        store_timeout_ms: 50,
    };
    let verifier = CredentialVerifier::new(Arc::new(HangingStore), config);

    match verifier.verify("alice", "secret").await {
        VerifyResult::Indeterminate => {}
        other => panic!("expected Indeterminate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_identity_does_not_count_toward_lockout() {
    let authd = TestAuthd::with(TestConfig::default());
    authd.enroll("erin", "right", &[]);

    // Probing a different, unknown identity never advances erin's counter,
    // and probing erin's own record only counts actual mismatches.
    for _ in 0..5 {
        authd.verifier.verify("not-erin", "x").await;
    }
    match authd.verifier.verify("erin", "right").await {
        VerifyResult::Verified(_) => {}
        other => panic!("expected Verified, got {other:?}"),
    }
}
