//! Audit event stream.
//!
//! The dispatcher collapses identity-distinguishing authentication errors
//! before they reach callers, so the audit stream is the only place the
//! distinct outcome survives. Events are emitted as structured records on
//! the dedicated `audit` tracing target, which deployments route to a
//! separate sink from operational logs.

use serde::Serialize;
use uuid::Uuid;

use crate::error::ErrorKind;

/// Target name audit records are emitted under.
pub const AUDIT_TARGET: &str = "audit";

/// A security-relevant state transition or decision.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A credential verification succeeded.
    LoginVerified {
        /// The authenticated identity.
        identity: String,
    },
    /// A credential verification was rejected, with the internal reason.
    LoginRejected {
        /// The identity reference presented by the caller.
        identity: String,
        /// The internally-distinguished rejection kind.
        reason: ErrorKind,
    },
    /// Consecutive mismatches reached the threshold and the account locked.
    AccountAutoLocked {
        /// The locked identity.
        identity: String,
        /// The consecutive failure count at lock time.
        failures: u32,
    },
    /// A session was created.
    SessionCreated {
        /// The session identifier.
        session_id: Uuid,
        /// The owning identity.
        identity: String,
    },
    /// A session's expiry was extended.
    SessionRefreshed {
        /// The session identifier.
        session_id: Uuid,
    },
    /// A session was revoked. Emitted only when state actually changed.
    SessionRevoked {
        /// The session identifier.
        session_id: Uuid,
        /// Why the session was revoked.
        reason: String,
    },
    /// The sweeper removed sessions past expiry and audit retention.
    SessionsSwept {
        /// Number of sessions removed.
        removed: usize,
    },
    /// A presented token was rejected.
    TokenRejected {
        /// The rejection kind (`Tampered`, `TokenExpired`, ...).
        reason: ErrorKind,
    },
    /// The signing key ring rotated.
    SigningKeyRotated {
        /// Identifier of the new current key.
        key_id: String,
        /// Number of retired keys discarded by this rotation.
        discarded: usize,
    },
    /// A policy decision was rendered.
    DecisionRendered {
        /// The session identifier the decision was made for.
        session_id: Uuid,
        /// The resource the caller asked about.
        resource: String,
        /// The action the caller asked about.
        action: String,
        /// `"allow"`, `"deny"`, or `"indeterminate"`.
        decision: String,
    },
    /// The active policy rule set was replaced.
    PolicyReplaced {
        /// Number of rules in the new set.
        rules: usize,
    },
}

/// Record an audit event on the audit target.
pub fn record(event: &AuditEvent) {
    match serde_json::to_string(event) {
        Ok(json) => tracing::info!(target: AUDIT_TARGET, event = %json),
        Err(e) => {
            tracing::warn!(target: AUDIT_TARGET, error = %e, "Failed to serialize audit event")
        }
    }
}
