//! Secret hashing and constant-time verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString,
        rand_core::{OsRng, RngCore},
    },
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use authd_core::error::AuthError;
use authd_entity::credential::{CredentialKind, CredentialRecord};

/// Salt length for access-key digests, in bytes.
const ACCESS_KEY_SALT_LEN: usize = 16;

/// Hashes presented secrets and verifies them against stored records.
///
/// Passphrases go through Argon2id and are stored as PHC strings.
/// Access keys are salted SHA-256 digests stored as
/// `"<salt-b64>$<digest-b64>"`; comparison is constant time.
#[derive(Debug, Clone)]
pub struct SecretHasher;

impl SecretHasher {
    /// Creates a new hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hashes a raw secret into the stored representation for the given
    /// kind, with a fresh random salt.
    pub fn hash(&self, kind: CredentialKind, secret: &str) -> Result<String, AuthError> {
        match kind {
            CredentialKind::Passphrase => self.hash_passphrase(secret),
            CredentialKind::AccessKey => Ok(self.hash_access_key(secret)),
        }
    }

    /// Verifies a presented secret against a stored credential record.
    ///
    /// Returns `Ok(true)` if the secret matches, `Ok(false)` if not.
    /// A malformed stored hash is an error, not a mismatch.
    pub fn verify(&self, record: &CredentialRecord, secret: &str) -> Result<bool, AuthError> {
        match record.kind {
            CredentialKind::Passphrase => self.verify_passphrase(secret, &record.hash),
            CredentialKind::AccessKey => self.verify_access_key(secret, &record.hash),
        }
    }

    /// Hashes a passphrase using Argon2id with a random salt.
    fn hash_passphrase(&self, secret: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|e| AuthError::internal(format!("Passphrase hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Verifies a passphrase against a stored Argon2id PHC string.
    fn verify_passphrase(&self, secret: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AuthError::internal(format!("Invalid passphrase hash format: {e}")))?;

        let argon2 = Argon2::default();
        match argon2.verify_password(secret.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::internal(format!(
                "Passphrase verification failed: {e}"
            ))),
        }
    }

    /// Hashes raw access-key material with a fresh salt.
    fn hash_access_key(&self, secret: &str) -> String {
        let mut salt = [0u8; ACCESS_KEY_SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let digest = access_key_digest(&salt, secret);
        format!("{}${}", B64.encode(salt), B64.encode(digest))
    }

    /// Recomputes the salted digest and compares in constant time.
    fn verify_access_key(&self, secret: &str, hash: &str) -> Result<bool, AuthError> {
        let (salt_b64, digest_b64) = hash
            .split_once('$')
            .ok_or_else(|| AuthError::internal("Invalid access-key hash format"))?;

        let salt = B64
            .decode(salt_b64)
            .map_err(|e| AuthError::internal(format!("Invalid access-key salt: {e}")))?;
        let stored = B64
            .decode(digest_b64)
            .map_err(|e| AuthError::internal(format!("Invalid access-key digest: {e}")))?;

        let computed = access_key_digest(&salt, secret);
        Ok(computed.ct_eq(stored.as_slice()).into())
    }
}

impl Default for SecretHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA-256 over salt followed by the raw key material.
fn access_key_digest(salt: &[u8], secret: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(secret.as_bytes());
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use authd_entity::credential::CredentialRecord;

    fn record(kind: CredentialKind, hash: String) -> CredentialRecord {
        CredentialRecord {
            identity: "u1".to_string(),
            kind,
            hash,
            version: 1,
        }
    }

    #[test]
    fn test_passphrase_round_trip() {
        let hasher = SecretHasher::new();
        let hash = hasher.hash(CredentialKind::Passphrase, "correct horse").unwrap();
        let rec = record(CredentialKind::Passphrase, hash);

        assert!(hasher.verify(&rec, "correct horse").unwrap());
        assert!(!hasher.verify(&rec, "wrong horse").unwrap());
    }

    #[test]
    fn test_access_key_round_trip() {
        let hasher = SecretHasher::new();
        let hash = hasher.hash(CredentialKind::AccessKey, "AKIA-material").unwrap();
        let rec = record(CredentialKind::AccessKey, hash);

        assert!(hasher.verify(&rec, "AKIA-material").unwrap());
        assert!(!hasher.verify(&rec, "AKIA-other").unwrap());
    }

    #[test]
    fn test_access_key_salts_differ() {
        let hasher = SecretHasher::new();
        let a = hasher.hash(CredentialKind::AccessKey, "same").unwrap();
        let b = hasher.hash(CredentialKind::AccessKey, "same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_stored_hash_is_error() {
        let hasher = SecretHasher::new();
        let rec = record(CredentialKind::AccessKey, "no-separator".to_string());
        assert!(hasher.verify(&rec, "anything").is_err());
    }
}
