//! Self-authenticating bearer tokens and the rotatable signing key ring.

pub mod claims;
pub mod codec;
pub mod keyring;

pub use claims::TokenClaims;
pub use codec::TokenCodec;
pub use keyring::SigningKeyRing;
