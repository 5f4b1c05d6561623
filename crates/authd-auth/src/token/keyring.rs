//! Process-wide signing key ring with rotation and bounded retention.

use std::sync::{Arc, RwLock};

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey};
use tracing::info;
use uuid::Uuid;

use authd_core::audit::{self, AuditEvent};
use authd_core::config::token::TokenConfig;

/// Generated key material length, in bytes.
const KEY_LEN: usize = 32;

/// One HMAC signing key, current or retired.
#[derive(Clone)]
pub struct SigningKey {
    /// Short identifier carried in token headers.
    pub id: String,
    /// Raw key material.
    secret: Vec<u8>,
    /// When the key became current.
    pub created_at: DateTime<Utc>,
    /// When the key was retired, if it no longer signs new tokens.
    pub retired_at: Option<DateTime<Utc>>,
}

impl SigningKey {
    fn generate(now: DateTime<Utc>) -> Self {
        let mut secret = vec![0u8; KEY_LEN];
        OsRng.fill_bytes(&mut secret);
        Self {
            id: short_id(),
            secret,
            created_at: now,
            retired_at: None,
        }
    }

    /// The encoding key for minting.
    pub fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.secret)
    }

    /// The decoding key for verification.
    pub fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.secret)
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .field("retired_at", &self.retired_at)
            .finish()
    }
}

/// An immutable generation of the key ring.
///
/// Token checks in flight hold one snapshot and complete against it;
/// rotation swaps the whole snapshot atomically.
#[derive(Debug, Clone)]
pub struct KeyRingSnapshot {
    /// The key minting new tokens.
    current: SigningKey,
    /// Retired keys still inside their retention window at the last
    /// rotation.
    retired: Vec<SigningKey>,
    /// Retention window for retired keys.
    retention: Duration,
}

impl KeyRingSnapshot {
    /// The key new tokens are signed with.
    pub fn current(&self) -> &SigningKey {
        &self.current
    }

    /// Resolves a key id to a usable verification key.
    ///
    /// A retired key past its retention window is no longer usable even
    /// if rotation has not pruned it yet; a token signed with it is
    /// permanently rejected.
    pub fn find(&self, key_id: &str, now: DateTime<Utc>) -> Option<&SigningKey> {
        if self.current.id == key_id {
            return Some(&self.current);
        }
        self.retired.iter().find(|key| {
            key.id == key_id
                && key
                    .retired_at
                    .map(|at| now < at + self.retention)
                    .unwrap_or(false)
        })
    }
}

/// The process-wide signing key ring.
///
/// Readers clone an `Arc` snapshot and never block rotation; rotation
/// builds the next generation and swaps it in one store.
pub struct SigningKeyRing {
    /// The active generation.
    active: RwLock<Arc<KeyRingSnapshot>>,
}

impl SigningKeyRing {
    /// Creates a ring whose initial current key wraps the configured
    /// secret.
    pub fn new(config: &TokenConfig) -> Self {
        let snapshot = KeyRingSnapshot {
            current: SigningKey {
                id: short_id(),
                secret: config.signing_secret.as_bytes().to_vec(),
                created_at: Utc::now(),
                retired_at: None,
            },
            retired: Vec::new(),
            retention: Duration::seconds(config.retention_seconds as i64),
        };
        Self {
            active: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Returns the active generation.
    pub fn snapshot(&self) -> Arc<KeyRingSnapshot> {
        self.active
            .read()
            .expect("key ring lock poisoned")
            .clone()
    }

    /// Rotates the ring: a fresh random key becomes current, the prior
    /// current key retires, and retired keys past the retention window
    /// are discarded.
    ///
    /// Returns the new current key id.
    pub fn rotate(&self) -> String {
        let now = Utc::now();
        let mut guard = self.active.write().expect("key ring lock poisoned");
        let old = guard.clone();

        let mut retiring = old.current.clone();
        retiring.retired_at = Some(now);

        let mut retired: Vec<SigningKey> = old
            .retired
            .iter()
            .filter(|key| {
                key.retired_at
                    .map(|at| now < at + old.retention)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        let discarded = old.retired.len() - retired.len();
        retired.push(retiring);

        let next = KeyRingSnapshot {
            current: SigningKey::generate(now),
            retired,
            retention: old.retention,
        };
        let key_id = next.current.id.clone();
        *guard = Arc::new(next);
        drop(guard);

        info!(key_id = %key_id, discarded, "Signing key rotated");
        audit::record(&AuditEvent::SigningKeyRotated {
            key_id: key_id.clone(),
            discarded,
        });

        key_id
    }
}

/// Short key identifier derived from a fresh UUID.
fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(retention_seconds: u64) -> TokenConfig {
        TokenConfig {
            signing_secret: "test-secret".to_string(),
            rotation_period_seconds: 0,
            retention_seconds,
        }
    }

    #[test]
    fn test_rotation_retires_current() {
        let ring = SigningKeyRing::new(&config(3600));
        let before = ring.snapshot().current().id.clone();

        let after = ring.rotate();
        let snapshot = ring.snapshot();

        assert_ne!(before, after);
        assert_eq!(snapshot.current().id, after);
        assert!(snapshot.find(&before, Utc::now()).is_some());
    }

    #[test]
    fn test_retired_key_unusable_after_retention() {
        let ring = SigningKeyRing::new(&config(0));
        let before = ring.snapshot().current().id.clone();

        ring.rotate();
        let snapshot = ring.snapshot();

        // Zero retention: the retired key is dead the moment it retires.
        assert!(snapshot.find(&before, Utc::now()).is_none());
    }

    #[test]
    fn test_unknown_key_id() {
        let ring = SigningKeyRing::new(&config(3600));
        assert!(ring.snapshot().find("deadbeef", Utc::now()).is_none());
    }
}
