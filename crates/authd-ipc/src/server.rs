//! Line-delimited JSON server over a Unix socket.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::watch;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, error, info, warn};

use authd_core::error::{AuthError, ErrorKind};
use authd_core::result::AuthResult;

use crate::dispatcher::Dispatcher;
use crate::request::{Request, Response};

/// Upper bound on one request line.
const MAX_LINE_LEN: usize = 64 * 1024;

/// Serves the dispatcher over a Unix socket, one JSON request and
/// response per line.
///
/// The transport layer stays thin: framing, parse errors, and connection
/// lifecycle. Everything with security meaning happens in the dispatcher
/// and below.
pub struct IpcServer {
    /// Socket path to bind.
    socket_path: PathBuf,
    /// The request router.
    dispatcher: Arc<Dispatcher>,
}

impl IpcServer {
    /// Creates a server for the given socket path.
    pub fn new(socket_path: impl AsRef<Path>, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            socket_path: socket_path.as_ref().to_path_buf(),
            dispatcher,
        }
    }

    /// Binds the socket and serves until the shutdown channel flips.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> AuthResult<()> {
        // A stale socket file from an unclean exit blocks the bind.
        if self.socket_path.exists() {
            tokio::fs::remove_file(&self.socket_path).await?;
        }
        if let Some(parent) = self.socket_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let listener = UnixListener::bind(&self.socket_path).map_err(|e| {
            AuthError::internal(format!(
                "Failed to bind {}: {e}",
                self.socket_path.display()
            ))
        })?;

        info!(socket = %self.socket_path.display(), "IPC server listening");

        loop {
            tokio::select! {
                accepted = listener.accept() => {
                    match accepted {
                        Ok((stream, _addr)) => {
                            let dispatcher = Arc::clone(&self.dispatcher);
                            let conn_shutdown = shutdown.clone();
                            tokio::spawn(async move {
                                handle_connection(stream, dispatcher, conn_shutdown).await;
                            });
                        }
                        Err(e) => {
                            error!(error = %e, "Accept failed");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("IPC server stopping");
                        break;
                    }
                }
            }
        }

        if let Err(e) = tokio::fs::remove_file(&self.socket_path).await {
            warn!(error = %e, "Failed to remove socket file");
        }

        Ok(())
    }
}

/// Serves one connection until it closes or shutdown begins.
///
/// A caller disconnecting mid-request has no effect on state changes
/// already applied; the response is simply never delivered.
async fn handle_connection(
    stream: UnixStream,
    dispatcher: Arc<Dispatcher>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut framed = Framed::new(stream, LinesCodec::new_with_max_length(MAX_LINE_LEN));

    loop {
        let line = tokio::select! {
            line = framed.next() => line,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        };

        let line = match line {
            Some(Ok(line)) => line,
            Some(Err(e)) => {
                debug!(error = %e, "Connection framing error");
                break;
            }
            None => break,
        };

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => dispatcher.handle(request).await,
            Err(e) => Response::Error {
                kind: ErrorKind::Serialization,
                message: format!("Malformed request: {e}"),
            },
        };

        let payload = match serde_json::to_string(&response) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "Response serialization failed");
                break;
            }
        };

        if let Err(e) = framed.send(payload).await {
            debug!(error = %e, "Connection write failed");
            break;
        }
    }
}
