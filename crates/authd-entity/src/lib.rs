//! # authd-entity
//!
//! Domain entity models for the SuperOS auth daemon. Every struct in this
//! crate is a value object shared between the core components and the
//! dispatcher surface. All entities derive `Debug`, `Clone`, `Serialize`,
//! and `Deserialize`.

pub mod credential;
pub mod identity;
pub mod policy;
pub mod session;
