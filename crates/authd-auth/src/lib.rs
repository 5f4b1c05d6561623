//! # authd-auth
//!
//! The security core of the SuperOS auth daemon:
//!
//! - `verifier` — credential verification against the store adapter,
//!   with consecutive-failure lockout
//! - `session` — session lifecycle (create, refresh, revoke) and the
//!   background expiry sweeper
//! - `token` — self-authenticating bearer tokens and the rotatable
//!   signing key ring
//! - `policy` — declarative allow/deny decisions over an atomically
//!   replaceable rule set
//!
//! Nothing in this crate holds elevated authority: it decides and
//! attests, and an external authority enforces.

pub mod policy;
pub mod session;
pub mod token;
pub mod verifier;

pub use policy::PolicyEngine;
pub use session::{SessionManager, SessionSweeper};
pub use token::{SigningKeyRing, TokenCodec};
pub use verifier::{CredentialVerifier, RejectReason, VerifyResult};
