//! The credential verification contract.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use authd_core::audit::{self, AuditEvent};
use authd_core::config::credential::CredentialConfig;
use authd_core::error::ErrorKind;
use authd_core::result::AuthResult;
use authd_entity::identity::{AccountStatus, Identity};
use authd_store::CredentialStore;

use super::hasher::SecretHasher;

/// Why a verification was rejected.
///
/// These reasons are internal: the dispatcher collapses all of them to a
/// single generic authentication failure before they reach a caller, so
/// the daemon never becomes an identity-enumeration oracle. The audit
/// stream keeps the distinction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No identity with the given reference exists.
    UnknownIdentity,
    /// The account is locked.
    AccountLocked,
    /// The account is disabled.
    AccountDisabled,
    /// The presented secret did not match.
    CredentialMismatch,
    /// The credential record version did not match the identity's current
    /// version; a rotation is in flight.
    CredentialRotated,
}

impl RejectReason {
    /// The error kind this reason maps to internally.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownIdentity => ErrorKind::UnknownIdentity,
            Self::AccountLocked => ErrorKind::AccountLocked,
            Self::AccountDisabled => ErrorKind::AccountDisabled,
            Self::CredentialMismatch => ErrorKind::CredentialMismatch,
            Self::CredentialRotated => ErrorKind::CredentialRotated,
        }
    }
}

/// Outcome of a credential verification.
#[derive(Debug, Clone)]
pub enum VerifyResult {
    /// Exact match against an active account.
    Verified(Identity),
    /// The verification was decided negatively.
    Rejected(RejectReason),
    /// The store could not be consulted; not a negative identity
    /// assertion. Callers fail closed without counting a failure.
    Indeterminate,
}

/// Verifies presented credentials against the store adapter.
///
/// The store is the one potentially slow external dependency in the
/// daemon, so every call is bounded by a timeout; a timeout or I/O error
/// surfaces as [`VerifyResult::Indeterminate`], never as a rejection.
/// Lockout after consecutive mismatches is enforced here, not in the
/// policy engine, because it protects the authentication path itself.
pub struct CredentialVerifier {
    /// The credential store adapter.
    store: Arc<dyn CredentialStore>,
    /// Secret hasher.
    hasher: SecretHasher,
    /// Verifier configuration.
    config: CredentialConfig,
}

impl CredentialVerifier {
    /// Creates a new verifier over the given store.
    pub fn new(store: Arc<dyn CredentialStore>, config: CredentialConfig) -> Self {
        Self {
            store,
            hasher: SecretHasher::new(),
            config,
        }
    }

    /// Verifies a presented secret for an identity reference.
    ///
    /// The presented secret is dropped when this call returns; it is
    /// never logged or retained.
    pub async fn verify(&self, identity_ref: &str, presented_secret: &str) -> VerifyResult {
        let identity = match self.bounded(self.store.load_identity(identity_ref)).await {
            Ok(Some(identity)) => identity,
            Ok(None) => return VerifyResult::Rejected(RejectReason::UnknownIdentity),
            Err(e) => {
                warn!(identity = %identity_ref, error = %e, "Identity load failed");
                return VerifyResult::Indeterminate;
            }
        };

        match identity.status {
            AccountStatus::Locked => {
                return VerifyResult::Rejected(RejectReason::AccountLocked);
            }
            AccountStatus::Disabled => {
                return VerifyResult::Rejected(RejectReason::AccountDisabled);
            }
            AccountStatus::Active => {}
        }

        let record = match self.bounded(self.store.load_credential(identity_ref)).await {
            Ok(Some(record)) => record,
            Ok(None) => return VerifyResult::Rejected(RejectReason::UnknownIdentity),
            Err(e) => {
                warn!(identity = %identity_ref, error = %e, "Credential load failed");
                return VerifyResult::Indeterminate;
            }
        };

        if record.version != identity.credential_version {
            return VerifyResult::Rejected(RejectReason::CredentialRotated);
        }

        let matched = match self.hasher.verify(&record, presented_secret) {
            Ok(matched) => matched,
            Err(e) => {
                warn!(identity = %identity_ref, error = %e, "Stored hash unusable");
                return VerifyResult::Indeterminate;
            }
        };

        if !matched {
            // The outcome is decided; the counter commit happens here and
            // is not rolled back if the caller goes away.
            self.record_mismatch(identity_ref).await;
            return VerifyResult::Rejected(RejectReason::CredentialMismatch);
        }

        if let Err(e) = self.bounded(self.store.reset_failures(identity_ref)).await {
            warn!(identity = %identity_ref, error = %e, "Failure counter reset failed");
        }

        VerifyResult::Verified(identity)
    }

    /// Commits a mismatch to the failure counter and locks the account
    /// when the consecutive count reaches the threshold.
    async fn record_mismatch(&self, identity_ref: &str) {
        let count = match self.bounded(self.store.increment_failure(identity_ref)).await {
            Ok(count) => count,
            Err(e) => {
                warn!(identity = %identity_ref, error = %e, "Failure counter commit failed");
                return;
            }
        };

        if count >= self.config.lockout_threshold {
            match self.bounded(self.store.set_locked(identity_ref)).await {
                Ok(()) => {
                    info!(
                        identity = %identity_ref,
                        failures = count,
                        "Account locked after consecutive mismatches"
                    );
                    audit::record(&AuditEvent::AccountAutoLocked {
                        identity: identity_ref.to_string(),
                        failures: count,
                    });
                }
                Err(e) => {
                    warn!(identity = %identity_ref, error = %e, "Account lock failed");
                }
            }
        }
    }

    /// Bounds a store call by the configured timeout, mapping a timeout
    /// to an indeterminate error.
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = AuthResult<T>>,
    ) -> AuthResult<T> {
        let limit = Duration::from_millis(self.config.store_timeout_ms);
        match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(authd_core::AuthError::indeterminate(
                "credential store call timed out",
            )),
        }
    }
}
