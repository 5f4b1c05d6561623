//! Routes dispatcher operations through the core components.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use authd_auth::policy::PolicyEngine;
use authd_auth::session::SessionManager;
use authd_auth::token::TokenCodec;
use authd_auth::verifier::{CredentialVerifier, VerifyResult};
use authd_core::audit::{self, AuditEvent};
use authd_core::error::AuthError;
use authd_core::result::AuthResult;
use authd_entity::session::Session;

use crate::request::{Request, Response};

/// Stateless router from requests to the core components.
///
/// Holds the one piece of propagation policy the core does not: every
/// identity-distinguishing rejection from the verifier leaves here as the
/// single generic `AuthenticationFailed`, with the distinct reason going
/// to the audit stream instead of the caller.
pub struct Dispatcher {
    /// Credential verifier (login path).
    verifier: Arc<CredentialVerifier>,
    /// Session table owner.
    sessions: Arc<SessionManager>,
    /// Token codec.
    codec: Arc<TokenCodec>,
    /// Policy decision engine.
    policy: Arc<PolicyEngine>,
}

impl Dispatcher {
    /// Creates a dispatcher over the assembled components.
    pub fn new(
        verifier: Arc<CredentialVerifier>,
        sessions: Arc<SessionManager>,
        codec: Arc<TokenCodec>,
        policy: Arc<PolicyEngine>,
    ) -> Self {
        Self {
            verifier,
            sessions,
            codec,
            policy,
        }
    }

    /// Handles one request, producing its tagged response.
    pub async fn handle(&self, request: Request) -> Response {
        match request {
            Request::Login { identity, secret } => self.login(&identity, &secret).await,
            Request::Authenticate { token } => self.authenticate(&token),
            Request::Refresh { token } => self.refresh(&token),
            Request::Logout { token } => self.logout(&token),
            Request::Authorize {
                token,
                resource,
                action,
            } => self.authorize(&token, &resource, &action),
        }
    }

    /// Login: verify the credential, open a session, mint a token.
    async fn login(&self, identity_ref: &str, secret: &str) -> Response {
        match self.verifier.verify(identity_ref, secret).await {
            VerifyResult::Verified(identity) => {
                audit::record(&AuditEvent::LoginVerified {
                    identity: identity.id.clone(),
                });

                let session = match self.sessions.create(&identity) {
                    Ok(session) => session,
                    // CapacityExceeded is not identity-distinguishing and
                    // propagates unchanged.
                    Err(e) => return e.into(),
                };

                match self.codec.mint(&session) {
                    Ok(token) => {
                        info!(identity = %identity.id, session_id = %session.id, "Login completed");
                        Response::LoggedIn {
                            token,
                            session_id: session.id,
                            expires_at: session.expires_at,
                        }
                    }
                    Err(e) => {
                        // The session exists but no token reached the
                        // caller; revoke it rather than leak a live orphan.
                        self.sessions.revoke(session.id, "mint failed");
                        e.into()
                    }
                }
            }
            VerifyResult::Rejected(reason) => {
                debug!(identity = %identity_ref, reason = %reason.kind(), "Login rejected");
                audit::record(&AuditEvent::LoginRejected {
                    identity: identity_ref.to_string(),
                    reason: reason.kind(),
                });
                AuthError::authentication_failed().into()
            }
            VerifyResult::Indeterminate => {
                AuthError::indeterminate("credential store unavailable").into()
            }
        }
    }

    /// Authenticate: token structure plus session liveness.
    fn authenticate(&self, token: &str) -> Response {
        match self.live_session(token) {
            Ok(session) => Response::Authenticated {
                session_id: session.id,
                identity: session.identity,
                expires_at: session.expires_at,
            },
            Err(e) => e.into(),
        }
    }

    /// Refresh: extend the session and mint a replacement token.
    fn refresh(&self, token: &str) -> Response {
        let session = match self.live_session(token) {
            Ok(session) => session,
            Err(e) => return e.into(),
        };

        // The manager re-checks revocation and expiry under the entry
        // lock, so a racing revoke between the two calls still wins.
        let session = match self.sessions.refresh(session.id) {
            Ok(session) => session,
            Err(e) => return e.into(),
        };

        match self.codec.mint(&session) {
            Ok(token) => Response::Refreshed {
                token,
                session_id: session.id,
                expires_at: session.expires_at,
            },
            Err(e) => e.into(),
        }
    }

    /// Logout: revoke the session behind a structurally valid token.
    fn logout(&self, token: &str) -> Response {
        let claims = match self.codec.authenticate(token) {
            Ok(claims) => claims,
            Err(e) => {
                audit::record(&AuditEvent::TokenRejected { reason: e.kind });
                return e.into();
            }
        };

        let revoked = self.sessions.revoke(claims.sid, "logout");
        Response::LoggedOut { revoked }
    }

    /// Authorize: render a policy decision for a live session.
    fn authorize(&self, token: &str, resource: &str, action: &str) -> Response {
        let session = match self.live_session(token) {
            Ok(session) => session,
            Err(e) => return e.into(),
        };

        let decision = self
            .policy
            .decide(&session.identity, &session.groups, resource, action);

        audit::record(&AuditEvent::DecisionRendered {
            session_id: session.id,
            resource: resource.to_string(),
            action: action.to_string(),
            decision: decision.as_str().to_string(),
        });

        Response::Authorized { decision }
    }

    /// Authenticates a token and confirms its session is live.
    ///
    /// Both checks are deliberate defense in depth: the codec attests the
    /// token's own integrity and freshness, the session manager rules on
    /// liveness. Dead sessions are classified distinctly (revoked,
    /// missing, or aged out) for audit precision.
    fn live_session(&self, token: &str) -> AuthResult<Session> {
        let claims = self.codec.authenticate(token).map_err(|e| {
            audit::record(&AuditEvent::TokenRejected { reason: e.kind });
            e
        })?;

        let session = self
            .sessions
            .get(claims.sid)
            .ok_or_else(|| session_error(claims.sid, SessionState::Missing))?;

        if session.revoked {
            return Err(session_error(claims.sid, SessionState::Revoked));
        }
        if session.is_expired() {
            // Token expiry equals session expiry at mint, so a token that
            // outlived its session was superseded by a refresh.
            return Err(session_error(claims.sid, SessionState::Expired));
        }

        Ok(session)
    }
}

/// Dead-session classification used by [`Dispatcher::live_session`].
enum SessionState {
    Missing,
    Revoked,
    Expired,
}

fn session_error(session_id: Uuid, state: SessionState) -> AuthError {
    let err = match state {
        SessionState::Missing => {
            AuthError::session_not_found(format!("No session {session_id}"))
        }
        SessionState::Revoked => {
            AuthError::session_revoked(format!("Session {session_id} is revoked"))
        }
        SessionState::Expired => {
            AuthError::token_expired(format!("Session {session_id} has expired"))
        }
    };
    audit::record(&AuditEvent::TokenRejected { reason: err.kind });
    err
}
