//! Credential verification configuration.

use serde::{Deserialize, Serialize};

/// Settings for the credential verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialConfig {
    /// Consecutive mismatches before the account is locked.
    #[serde(default = "default_lockout_threshold")]
    pub lockout_threshold: u32,
    /// Bound on each credential store call, in milliseconds. A store call
    /// exceeding this maps to an indeterminate verification outcome.
    #[serde(default = "default_store_timeout")]
    pub store_timeout_ms: u64,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            lockout_threshold: default_lockout_threshold(),
            store_timeout_ms: default_store_timeout(),
        }
    }
}

fn default_lockout_threshold() -> u32 {
    5
}

fn default_store_timeout() -> u64 {
    2000
}
