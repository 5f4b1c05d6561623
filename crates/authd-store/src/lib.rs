//! # authd-store
//!
//! The credential store adapter: the narrow contract the verifier reads
//! identity and credential records through, plus the in-memory
//! implementation the daemon runs against. Persistence beyond process
//! lifetime is a deployment concern; anything satisfying
//! [`CredentialStore`] can be substituted without the core noticing.

pub mod adapter;
pub mod memory;

pub use adapter::CredentialStore;
pub use memory::MemoryCredentialStore;
