//! Identity entity model.

use serde::{Deserialize, Serialize};

use super::status::AccountStatus;

/// A principal known to the daemon.
///
/// Identities are created by an out-of-band enrollment process; the core
/// components only ever read them. The credential version ties the identity
/// to its current [`crate::credential::CredentialRecord`] so that records
/// loaded mid-rotation are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// Stable, unique identifier.
    pub id: String,
    /// Group and role labels used by policy subject patterns.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Account status.
    pub status: AccountStatus,
    /// Version of the identity's current credential record.
    pub credential_version: u64,
}

impl Identity {
    /// Check whether this identity is a member of the given group.
    pub fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}
