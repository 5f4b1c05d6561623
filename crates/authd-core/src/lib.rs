//! # authd-core
//!
//! Core crate for the SuperOS auth daemon. Contains configuration
//! schemas, the unified error system, and audit event definitions.
//!
//! This crate has **no** internal dependencies on other authd crates.

pub mod audit;
pub mod config;
pub mod error;
pub mod result;

pub use error::AuthError;
pub use result::AuthResult;
