//! Credential kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a credential's hashed representation was derived, and therefore how
/// a presented secret is recomputed for comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialKind {
    /// Passphrase-derived: Argon2id, stored as a PHC string.
    Passphrase,
    /// Raw access-key material: salted SHA-256 digest, compared in
    /// constant time.
    AccessKey,
}

impl CredentialKind {
    /// Return the kind as a kebab-case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passphrase => "passphrase",
            Self::AccessKey => "access-key",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CredentialKind {
    type Err = authd_core::AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "passphrase" => Ok(Self::Passphrase),
            "access-key" => Ok(Self::AccessKey),
            _ => Err(authd_core::AuthError::configuration(format!(
                "Invalid credential kind: '{s}'. Expected one of: passphrase, access-key"
            ))),
        }
    }
}
