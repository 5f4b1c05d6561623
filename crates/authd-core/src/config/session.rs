//! Session lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Settings for the session manager and its sweeper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session time-to-live in seconds. Refresh extends expiry by this
    /// amount from the time of the refresh.
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Maximum concurrent live sessions per identity. `0` means unlimited.
    #[serde(default)]
    pub max_per_identity: u32,
    /// Interval between expiry sweeps, in seconds.
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
    /// How long expired or revoked sessions are retained for audit before
    /// the sweeper removes them, in seconds.
    #[serde(default = "default_audit_retention")]
    pub audit_retention_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            max_per_identity: 0,
            sweep_interval_seconds: default_sweep_interval(),
            audit_retention_seconds: default_audit_retention(),
        }
    }
}

fn default_ttl() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_audit_retention() -> u64 {
    600
}
