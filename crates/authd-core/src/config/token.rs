//! Token signing configuration.

use serde::{Deserialize, Serialize};

/// Settings for the token codec and its signing key ring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Initial HMAC signing secret. Replaced by generated key material on
    /// the first rotation.
    #[serde(default = "default_signing_secret")]
    pub signing_secret: String,
    /// Period between automatic signing-key rotations, in seconds.
    /// `0` disables the rotation task.
    #[serde(default)]
    pub rotation_period_seconds: u64,
    /// How long a retired signing key keeps verifying tokens minted under
    /// it before being discarded, in seconds.
    #[serde(default = "default_retention")]
    pub retention_seconds: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            signing_secret: default_signing_secret(),
            rotation_period_seconds: 0,
            retention_seconds: default_retention(),
        }
    }
}

fn default_signing_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_retention() -> u64 {
    3600
}
