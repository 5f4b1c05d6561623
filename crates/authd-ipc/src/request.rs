//! Wire types for the dispatcher surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use authd_core::error::{AuthError, ErrorKind};
use authd_entity::policy::Decision;

/// One operation a caller can request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request {
    /// Verify a credential and open a session.
    Login {
        /// The identity reference.
        identity: String,
        /// The presented secret, consumed by the verification call.
        secret: String,
    },
    /// Check a token and report the session it represents.
    Authenticate {
        /// The bearer token.
        token: String,
    },
    /// Extend the session behind a token; returns a replacement token.
    Refresh {
        /// The bearer token.
        token: String,
    },
    /// Revoke the session behind a token.
    Logout {
        /// The bearer token.
        token: String,
    },
    /// Render a policy decision for the session behind a token.
    Authorize {
        /// The bearer token.
        token: String,
        /// The resource being acted on.
        resource: String,
        /// The action being performed.
        action: String,
    },
}

/// The tagged result of an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Response {
    /// Login succeeded.
    LoggedIn {
        /// The minted bearer token.
        token: String,
        /// The new session's identifier.
        session_id: Uuid,
        /// When the session expires.
        expires_at: DateTime<Utc>,
    },
    /// The token is valid and its session is live.
    Authenticated {
        /// The session identifier.
        session_id: Uuid,
        /// The identity the session belongs to.
        identity: String,
        /// When the session expires.
        expires_at: DateTime<Utc>,
    },
    /// The session was extended and a replacement token minted.
    Refreshed {
        /// The replacement token; the prior token ages out on its own
        /// embedded expiry.
        token: String,
        /// The session identifier.
        session_id: Uuid,
        /// The new expiry.
        expires_at: DateTime<Utc>,
    },
    /// The session behind the token was revoked.
    LoggedOut {
        /// Whether revocation changed state (`false` if already revoked).
        revoked: bool,
    },
    /// A policy decision. `indeterminate` must be treated as deny by the
    /// caller.
    Authorized {
        /// The decision.
        decision: Decision,
    },
    /// The operation failed.
    Error {
        /// The error kind.
        kind: ErrorKind,
        /// Human-readable description.
        message: String,
    },
}

impl From<AuthError> for Response {
    fn from(err: AuthError) -> Self {
        Self::Error {
            kind: err.kind,
            message: err.message,
        }
    }
}
