//! Credential record entity model.

use serde::{Deserialize, Serialize};

use super::kind::CredentialKind;

/// One verifiable secret bound to an identity.
///
/// Only the salted, hashed representation is ever stored or moved around;
/// the raw secret exists solely inside a verification call. The version
/// counter increases on every rotation, invalidating verifications that
/// loaded the record mid-rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// The identity this credential belongs to.
    pub identity: String,
    /// How the hash was derived.
    pub kind: CredentialKind,
    /// The hashed representation: a PHC string for passphrases, or
    /// `"<salt-hex>$<digest-hex>"` for access keys.
    pub hash: String,
    /// Monotonically increasing rotation counter.
    pub version: u64,
}
