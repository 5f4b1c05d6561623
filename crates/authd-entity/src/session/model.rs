//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A live authentication bound to one identity.
///
/// Sessions are created on login and leave the live set on revocation,
/// logout, or expiry. The session manager is the only writer; everything
/// else sees clones. Revocation is irreversible and sticky past expiry,
/// and the record stays in the table until the sweeper's audit retention
/// window has passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Unguessable session identifier, generated fresh per session and
    /// never reused within a process lifetime.
    pub id: Uuid,
    /// The identity this session belongs to.
    pub identity: String,
    /// Group labels captured at creation. Policy decisions use this
    /// snapshot; membership changes apply from the next login.
    pub groups: Vec<String>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Last refresh or creation time.
    pub last_activity: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
    /// Whether the session has been revoked.
    pub revoked: bool,
    /// When the session was revoked.
    pub revoked_at: Option<DateTime<Utc>>,
    /// Why the session was revoked.
    pub revoked_reason: Option<String>,
}

impl Session {
    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Check whether the session is live: present, not revoked, and not
    /// past expiry.
    pub fn is_live(&self) -> bool {
        !self.revoked && !self.is_expired()
    }
}
