//! Token minting and authentication.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{Algorithm, Header, Validation, decode, decode_header, encode};

use authd_core::error::AuthError;
use authd_core::result::AuthResult;
use authd_entity::session::Session;

use super::claims::TokenClaims;
use super::keyring::SigningKeyRing;

/// Mints and authenticates opaque bearer tokens for sessions.
///
/// A token is independently verifiable (integrity tag and embedded
/// expiry) without touching the session table. That check is necessary
/// but not sufficient: the session manager remains the final authority on
/// liveness, and both checks stay in place independently.
pub struct TokenCodec {
    /// The signing key ring.
    ring: Arc<SigningKeyRing>,
}

impl TokenCodec {
    /// Creates a codec over the given key ring.
    pub fn new(ring: Arc<SigningKeyRing>) -> Self {
        Self { ring }
    }

    /// Mints a token representing the session, signed with the current
    /// key and expiring when the session does.
    pub fn mint(&self, session: &Session) -> AuthResult<String> {
        let snapshot = self.ring.snapshot();
        let key = snapshot.current();

        let claims = TokenClaims {
            sid: session.id,
            sub: session.identity.clone(),
            iat: Utc::now().timestamp(),
            exp: session.expires_at.timestamp(),
        };

        let mut header = Header::new(Algorithm::HS256);
        header.kid = Some(key.id.clone());

        encode(&header, &claims, &key.encoding_key())
            .map_err(|e| AuthError::internal(format!("Failed to encode token: {e}")))
    }

    /// Authenticates a presented token string.
    ///
    /// Checks, in order:
    /// 1. Header parses and names a key that is current or retired within
    ///    its retention window (`Tampered` otherwise)
    /// 2. The integrity tag verifies (`Tampered`)
    /// 3. The embedded expiry has not passed (`TokenExpired`), checked
    ///    here independently of the session table
    ///
    /// Returns the claims; the caller must still confirm session liveness
    /// with the session manager.
    pub fn authenticate(&self, token: &str) -> AuthResult<TokenClaims> {
        let header = decode_header(token)
            .map_err(|e| AuthError::tampered(format!("Malformed token header: {e}")))?;
        let key_id = header
            .kid
            .ok_or_else(|| AuthError::tampered("Token header carries no key id"))?;

        let snapshot = self.ring.snapshot();
        let key = snapshot.find(&key_id, Utc::now()).ok_or_else(|| {
            AuthError::tampered("Token signed with an unknown or discarded key")
        })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // Single-host daemon: no cross-machine clock skew to absorb.
        validation.leeway = 0;

        let data = decode::<TokenClaims>(token, &key.decoding_key(), &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AuthError::token_expired("Token has expired")
                }
                _ => AuthError::tampered(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(data.claims)
    }
}
