//! Daemon process configuration.

use serde::{Deserialize, Serialize};

/// Settings for the daemon process itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Path of the Unix socket the dispatcher listens on.
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
    /// Optional JSON seed file of enrolled identities (hashed records only).
    #[serde(default)]
    pub identity_seed: Option<String>,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            socket_path: default_socket_path(),
            identity_seed: None,
        }
    }
}

fn default_socket_path() -> String {
    "/run/superos/authd.sock".to_string()
}
