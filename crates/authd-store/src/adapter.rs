//! Credential store adapter trait.

use async_trait::async_trait;

use authd_core::result::AuthResult;
use authd_entity::credential::CredentialRecord;
use authd_entity::identity::Identity;

/// The narrow read/write contract between the verifier and whatever
/// persists identity and credential records.
///
/// Implementations must be thread-safe. Every method may be slow or fail;
/// the verifier wraps each call in a bounded timeout and maps failure to
/// an indeterminate outcome rather than a rejection. Identities are
/// written only through `increment_failure`-driven lockout; enrollment
/// and rotation happen out of band.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Load an identity by its stable identifier.
    async fn load_identity(&self, identity_ref: &str) -> AuthResult<Option<Identity>>;

    /// Load the current credential record for an identity.
    async fn load_credential(&self, identity_ref: &str) -> AuthResult<Option<CredentialRecord>>;

    /// Increment the consecutive-failure counter. Returns the new count.
    async fn increment_failure(&self, identity_ref: &str) -> AuthResult<u32>;

    /// Reset the consecutive-failure counter to zero.
    async fn reset_failures(&self, identity_ref: &str) -> AuthResult<()>;

    /// Transition the identity to the locked state.
    async fn set_locked(&self, identity_ref: &str) -> AuthResult<()>;
}
