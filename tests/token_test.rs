//! Integration tests for the token codec and signing key ring.

mod common;

use std::sync::Arc;
use std::time::Duration;

use authd_auth::token::{SigningKeyRing, TokenCodec};
use authd_core::config::token::TokenConfig;
use authd_core::error::ErrorKind;
use authd_entity::identity::{AccountStatus, Identity};

use common::{TestAuthd, TestConfig};

fn identity(id: &str) -> Identity {
    Identity {
        id: id.to_string(),
        groups: vec![],
        status: AccountStatus::Active,
        credential_version: 1,
    }
}

/// Flips one character inside the payload segment of a compact token.
fn corrupt_payload(token: &str) -> String {
    let mut parts: Vec<String> = token.split('.').map(String::from).collect();
    assert_eq!(parts.len(), 3, "compact token should have three segments");

    let payload = &mut parts[1];
    let mid = payload.len() / 2;
    let original = payload.as_bytes()[mid];
    let replacement = if original == b'A' { b'B' } else { b'A' };
    payload.replace_range(mid..mid + 1, std::str::from_utf8(&[replacement]).unwrap());

    parts.join(".")
}

#[tokio::test]
async fn test_round_trip_for_live_session() {
    let authd = TestAuthd::new();
    let session = authd.sessions.create(&identity("u1")).unwrap();

    let token = authd.codec.mint(&session).unwrap();
    let claims = authd.codec.authenticate(&token).unwrap();

    assert_eq!(claims.session_id(), session.id);
    assert_eq!(claims.sub, "u1");
    assert_eq!(claims.exp, session.expires_at.timestamp());
}

#[tokio::test]
async fn test_corrupted_payload_is_tampered() {
    let authd = TestAuthd::new();
    let session = authd.sessions.create(&identity("u1")).unwrap();
    let token = authd.codec.mint(&session).unwrap();

    let err = authd.codec.authenticate(&corrupt_payload(&token)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Tampered);
}

#[tokio::test]
async fn test_garbage_is_tampered() {
    let authd = TestAuthd::new();
    let err = authd.codec.authenticate("not a token at all").unwrap_err();
    assert_eq!(err.kind, ErrorKind::Tampered);
}

#[tokio::test]
async fn test_foreign_signature_is_tampered() {
    let authd = TestAuthd::new();
    let session = authd.sessions.create(&identity("u1")).unwrap();

    // A token from a ring with different key material and key ids.
    let foreign_ring = Arc::new(SigningKeyRing::new(&TokenConfig {
        signing_secret: "some other secret".to_string(),
        rotation_period_seconds: 0,
        retention_seconds: 3600,
    }));
    let foreign_codec = TokenCodec::new(foreign_ring);
    let foreign_token = foreign_codec.mint(&session).unwrap();

    let err = authd.codec.authenticate(&foreign_token).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Tampered);
}

#[tokio::test]
async fn test_token_without_key_id_is_tampered() {
    let authd = TestAuthd::new();
    let session = authd.sessions.create(&identity("u1")).unwrap();

    // Same secret as the test ring, but the header names no key.
    let claims = authd_auth::token::TokenClaims {
        sid: session.id,
        sub: session.identity.clone(),
        iat: chrono::Utc::now().timestamp(),
        exp: session.expires_at.timestamp(),
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(b"integration-test-secret"),
    )
    .unwrap();

    let err = authd.codec.authenticate(&token).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Tampered);
}

#[tokio::test]
async fn test_embedded_expiry_checked_without_session_table() {
    let mut config = TestConfig::default();
    config.session.ttl_seconds = 1;
    let authd = TestAuthd::with(config);

    let session = authd.sessions.create(&identity("u1")).unwrap();
    let token = authd.codec.mint(&session).unwrap();

    // Unix-second truncation means the token can read as valid for up to
    // a second past its nominal expiry; sleep past the worst case.
    tokio::time::sleep(Duration::from_millis(2200)).await;

    let err = authd.codec.authenticate(&token).unwrap_err();
    assert_eq!(err.kind, ErrorKind::TokenExpired);
}

#[tokio::test]
async fn test_token_survives_one_rotation_inside_retention() {
    let authd = TestAuthd::new();
    let session = authd.sessions.create(&identity("u1")).unwrap();
    let token = authd.codec.mint(&session).unwrap();

    authd.ring.rotate();

    let claims = authd.codec.authenticate(&token).unwrap();
    assert_eq!(claims.session_id(), session.id);
}

#[tokio::test]
async fn test_token_rejected_after_retention_window_elapses() {
    let mut config = TestConfig::default();
    config.token.retention_seconds = 1;
    let authd = TestAuthd::with(config);

    let session = authd.sessions.create(&identity("u1")).unwrap();
    let token = authd.codec.mint(&session).unwrap();

    authd.ring.rotate();
    tokio::time::sleep(Duration::from_millis(1200)).await;

    // The payload is still well-formed and unexpired; only the key is
    // gone. Rejection is Tampered, forcing re-authentication.
    let err = authd.codec.authenticate(&token).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Tampered);
}

#[tokio::test]
async fn test_fresh_tokens_use_the_rotated_key() {
    let authd = TestAuthd::new();
    let session = authd.sessions.create(&identity("u1")).unwrap();

    authd.ring.rotate();
    let token = authd.codec.mint(&session).unwrap();

    let claims = authd.codec.authenticate(&token).unwrap();
    assert_eq!(claims.session_id(), session.id);
}
