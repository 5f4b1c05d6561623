//! Token claims payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims embedded in every minted token.
///
/// The payload is self-contained enough to check integrity and freshness
/// without the session table, but liveness always gets a second,
/// authoritative check against the session manager.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// The session this token represents.
    pub sid: Uuid,
    /// Subject — the identity reference.
    pub sub: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch); equals the session's
    /// expiry at mint time.
    pub exp: i64,
}

impl TokenClaims {
    /// Returns the session id.
    pub fn session_id(&self) -> Uuid {
        self.sid
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    /// Checks whether this token has expired.
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }
}
