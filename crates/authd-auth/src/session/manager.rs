//! The in-memory session table and its lifecycle operations.

use std::collections::HashSet;

use chrono::{Duration, Utc};
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use authd_core::audit::{self, AuditEvent};
use authd_core::config::session::SessionConfig;
use authd_core::error::AuthError;
use authd_core::result::AuthResult;
use authd_entity::identity::Identity;
use authd_entity::session::Session;

/// Owns the full set of sessions for the process lifetime.
///
/// All mutation goes through this type. Entry-level exclusive access on
/// the session table serializes concurrent `refresh`/`revoke` on the same
/// id, and the sticky revocation flag makes revoke win any interleaving:
/// once set, no later refresh observes the session unrevoked, and an
/// earlier refresh changes nothing about the flag. Reads take a
/// consistent snapshot of one entry and never remove anything; removal
/// belongs to the sweeper alone.
pub struct SessionManager {
    /// The live session table.
    sessions: DashMap<Uuid, Session>,
    /// Session ids per identity, for cap enforcement. The entry guard
    /// doubles as the per-identity creation lock.
    by_identity: DashMap<String, HashSet<Uuid>>,
    /// Session configuration.
    config: SessionConfig,
}

impl SessionManager {
    /// Creates an empty session manager.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            by_identity: DashMap::new(),
            config,
        }
    }

    /// Creates a session for a verified identity.
    ///
    /// Fails with `CapacityExceeded` when the per-identity cap is reached.
    /// No session is ever evicted to make room; the caller must revoke one
    /// of its sessions explicitly first.
    pub fn create(&self, identity: &Identity) -> AuthResult<Session> {
        let mut index = self
            .by_identity
            .entry(identity.id.clone())
            .or_default();

        let cap = self.config.max_per_identity;
        if cap > 0 {
            let live = index
                .iter()
                .filter(|id| {
                    self.sessions
                        .get(id)
                        .map(|s| s.is_live())
                        .unwrap_or(false)
                })
                .count();
            if live >= cap as usize {
                return Err(AuthError::capacity_exceeded(format!(
                    "Identity '{}' already has {live} live sessions (cap {cap})",
                    identity.id
                )));
            }
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            identity: identity.id.clone(),
            groups: identity.groups.clone(),
            created_at: now,
            last_activity: now,
            expires_at: now + Duration::seconds(self.config.ttl_seconds as i64),
            revoked: false,
            revoked_at: None,
            revoked_reason: None,
        };

        self.sessions.insert(session.id, session.clone());
        index.insert(session.id);
        drop(index);

        info!(
            session_id = %session.id,
            identity = %session.identity,
            expires_at = %session.expires_at,
            "Session created"
        );
        audit::record(&AuditEvent::SessionCreated {
            session_id: session.id,
            identity: session.identity.clone(),
        });

        Ok(session)
    }

    /// Extends a session's expiry from now.
    ///
    /// Revoked and expired sessions are rejected; there is no
    /// resurrection path.
    pub fn refresh(&self, session_id: Uuid) -> AuthResult<Session> {
        let mut entry = self
            .sessions
            .get_mut(&session_id)
            .ok_or_else(|| AuthError::session_not_found(format!("No session {session_id}")))?;

        if entry.revoked {
            return Err(AuthError::session_revoked(format!(
                "Session {session_id} is revoked"
            )));
        }
        if entry.is_expired() {
            return Err(AuthError::session_expired(format!(
                "Session {session_id} has expired"
            )));
        }

        let now = Utc::now();
        entry.last_activity = now;
        entry.expires_at = now + Duration::seconds(self.config.ttl_seconds as i64);
        let session = entry.clone();
        drop(entry);

        audit::record(&AuditEvent::SessionRefreshed { session_id });

        Ok(session)
    }

    /// Revokes a session.
    ///
    /// Idempotent, and succeeds for unknown ids. Returns whether state
    /// actually changed, for audit purposes. The record stays in the
    /// table until the sweeper's audit retention window passes.
    pub fn revoke(&self, session_id: Uuid, reason: &str) -> bool {
        let Some(mut entry) = self.sessions.get_mut(&session_id) else {
            return false;
        };

        if entry.revoked {
            return false;
        }

        entry.revoked = true;
        entry.revoked_at = Some(Utc::now());
        entry.revoked_reason = Some(reason.to_string());
        drop(entry);

        info!(session_id = %session_id, reason = %reason, "Session revoked");
        audit::record(&AuditEvent::SessionRevoked {
            session_id,
            reason: reason.to_string(),
        });

        true
    }

    /// Whether the session is present, not revoked, and not past expiry.
    ///
    /// Authoritative and immediately consistent regardless of sweep
    /// timing: an expired session reads as dead even before the sweeper
    /// removes it.
    pub fn is_live(&self, session_id: Uuid) -> bool {
        self.sessions
            .get(&session_id)
            .map(|s| s.is_live())
            .unwrap_or(false)
    }

    /// Returns a snapshot of a session, live or not.
    pub fn get(&self, session_id: Uuid) -> Option<Session> {
        self.sessions.get(&session_id).map(|s| s.clone())
    }

    /// Number of sessions currently in the table, including dead records
    /// awaiting sweep.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Removes sessions that are past expiry, keeping revoked records
    /// until the audit retention window after revocation has elapsed.
    ///
    /// Returns the number of sessions removed. Runs only from the
    /// background sweeper cadence; read paths never remove entries.
    pub fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let retention = Duration::seconds(self.config.audit_retention_seconds as i64);
        let mut removed: Vec<(Uuid, String)> = Vec::new();

        self.sessions.retain(|id, session| {
            let gone = match session.revoked_at {
                Some(revoked_at) => now >= revoked_at + retention,
                None => session.is_expired(),
            };
            if gone {
                removed.push((*id, session.identity.clone()));
            }
            !gone
        });

        for (id, identity) in &removed {
            if let Some(mut index) = self.by_identity.get_mut(identity) {
                index.remove(id);
            }
        }
        self.by_identity.retain(|_, ids| !ids.is_empty());

        if !removed.is_empty() {
            info!(removed = removed.len(), "Expired sessions swept");
            audit::record(&AuditEvent::SessionsSwept {
                removed: removed.len(),
            });
        }

        removed.len()
    }
}
