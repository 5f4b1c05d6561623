//! Daemon configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every tunable is static at process start; the policy rule
//! list is the one section that may be re-read at runtime, and its
//! replacement goes through the engine's atomic snapshot swap.

pub mod credential;
pub mod daemon;
pub mod logging;
pub mod policy;
pub mod session;
pub mod token;

use serde::{Deserialize, Serialize};

use self::credential::CredentialConfig;
use self::daemon::DaemonConfig;
use self::logging::LoggingConfig;
use self::policy::PolicyConfig;
use self::session::SessionConfig;
use self::token::TokenConfig;

use crate::error::AuthError;

/// Root daemon configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration (default file + environment overrides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthdConfig {
    /// Daemon process settings (socket path, seed file).
    #[serde(default)]
    pub daemon: DaemonConfig,
    /// Credential verification settings.
    #[serde(default)]
    pub credential: CredentialConfig,
    /// Session lifecycle settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Token signing settings.
    #[serde(default)]
    pub token: TokenConfig,
    /// Declarative policy rules.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AuthdConfig {
    /// Load configuration from a TOML file plus environment overrides.
    ///
    /// Environment variables prefixed with `AUTHD` (separator `__`)
    /// override file values, e.g. `AUTHD__SESSION__TTL_SECONDS=120`.
    pub fn load(path: &str) -> Result<Self, AuthError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("AUTHD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AuthError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AuthError::configuration(format!("Failed to deserialize config: {e}")))
    }
}

impl Default for AuthdConfig {
    fn default() -> Self {
        Self {
            daemon: DaemonConfig::default(),
            credential: CredentialConfig::default(),
            session: SessionConfig::default(),
            token: TokenConfig::default(),
            policy: PolicyConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
