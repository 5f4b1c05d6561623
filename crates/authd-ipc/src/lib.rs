//! # authd-ipc
//!
//! The dispatcher-facing request surface of the auth daemon: the typed
//! operation set with its tagged results, the dispatcher that routes
//! operations through the core components, and a line-delimited JSON
//! server over a Unix socket.
//!
//! The dispatcher owns no authentication state of its own: every
//! decision comes from the verifier, session manager, token codec, or
//! policy engine.

pub mod dispatcher;
pub mod request;
pub mod server;

pub use dispatcher::Dispatcher;
pub use request::{Request, Response};
pub use server::IpcServer;
