//! Unified error types for the auth daemon.
//!
//! All crates map their internal errors into [`AuthError`] for consistent
//! propagation through the ? operator. The kind taxonomy deliberately keeps
//! authentication-time rejections distinct from token/session-time
//! diagnostics: the former are collapsed to [`ErrorKind::AuthenticationFailed`]
//! at the dispatcher boundary, the latter propagate to callers unchanged.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The referenced identity is not known to the credential store.
    UnknownIdentity,
    /// The account is locked (too many consecutive failures, or by an operator).
    AccountLocked,
    /// The account has been disabled by an operator.
    AccountDisabled,
    /// The presented secret did not match the stored credential.
    CredentialMismatch,
    /// The credential record version did not match an in-flight rotation.
    CredentialRotated,
    /// Generic authentication failure surfaced to callers in place of any of
    /// the identity-distinguishing kinds above.
    AuthenticationFailed,
    /// The token's integrity tag did not verify, or it was signed with an
    /// unknown or discarded key.
    Tampered,
    /// The token's embedded expiry has passed.
    TokenExpired,
    /// The referenced session has been revoked.
    SessionRevoked,
    /// The referenced session exists but its expiry has passed.
    SessionExpired,
    /// The referenced session is not present in the live table.
    SessionNotFound,
    /// Session creation refused: the per-identity concurrent-session cap is
    /// reached. The caller must revoke an existing session to make room.
    CapacityExceeded,
    /// Infrastructure failure or no applicable policy rule. Always treated
    /// as the unsafe case (deny / not authenticated) by callers.
    Indeterminate,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// An internal daemon error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIdentity => write!(f, "UNKNOWN_IDENTITY"),
            Self::AccountLocked => write!(f, "ACCOUNT_LOCKED"),
            Self::AccountDisabled => write!(f, "ACCOUNT_DISABLED"),
            Self::CredentialMismatch => write!(f, "CREDENTIAL_MISMATCH"),
            Self::CredentialRotated => write!(f, "CREDENTIAL_ROTATED"),
            Self::AuthenticationFailed => write!(f, "AUTHENTICATION_FAILED"),
            Self::Tampered => write!(f, "TAMPERED"),
            Self::TokenExpired => write!(f, "TOKEN_EXPIRED"),
            Self::SessionRevoked => write!(f, "SESSION_REVOKED"),
            Self::SessionExpired => write!(f, "SESSION_EXPIRED"),
            Self::SessionNotFound => write!(f, "SESSION_NOT_FOUND"),
            Self::CapacityExceeded => write!(f, "CAPACITY_EXCEEDED"),
            Self::Indeterminate => write!(f, "INDETERMINATE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

impl ErrorKind {
    /// Whether this kind distinguishes identities at authentication time.
    ///
    /// Kinds in this class are never surfaced verbatim past the verifier
    /// boundary; the dispatcher collapses them to
    /// [`ErrorKind::AuthenticationFailed`].
    pub fn is_identity_distinguishing(&self) -> bool {
        matches!(
            self,
            Self::UnknownIdentity
                | Self::AccountLocked
                | Self::AccountDisabled
                | Self::CredentialMismatch
                | Self::CredentialRotated
        )
    }
}

/// The unified error used throughout the auth daemon.
///
/// Crate-specific errors are mapped into `AuthError` using `From` impls or
/// explicit `.map_err()` calls, giving a single error type at the daemon
/// boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AuthError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AuthError {
    /// Create a new error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an unknown-identity error.
    pub fn unknown_identity(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownIdentity, message)
    }

    /// Create an account-locked error.
    pub fn account_locked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountLocked, message)
    }

    /// Create an account-disabled error.
    pub fn account_disabled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AccountDisabled, message)
    }

    /// Create a credential-mismatch error.
    pub fn credential_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CredentialMismatch, message)
    }

    /// Create the generic authentication-failed error surfaced to callers.
    pub fn authentication_failed() -> Self {
        Self::new(
            ErrorKind::AuthenticationFailed,
            "authentication failed",
        )
    }

    /// Create a tampered-token error.
    pub fn tampered(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Tampered, message)
    }

    /// Create a token-expired error.
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TokenExpired, message)
    }

    /// Create a session-revoked error.
    pub fn session_revoked(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionRevoked, message)
    }

    /// Create a session-expired error.
    pub fn session_expired(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionExpired, message)
    }

    /// Create a session-not-found error.
    pub fn session_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SessionNotFound, message)
    }

    /// Create a capacity-exceeded error.
    pub fn capacity_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CapacityExceeded, message)
    }

    /// Create an indeterminate (fail-closed) error.
    pub fn indeterminate(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Indeterminate, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl Clone for AuthError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AuthError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
