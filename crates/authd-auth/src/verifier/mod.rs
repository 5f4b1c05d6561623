//! Credential verification against the store adapter.

pub mod hasher;
pub mod verify;

pub use hasher::SecretHasher;
pub use verify::{CredentialVerifier, RejectReason, VerifyResult};
