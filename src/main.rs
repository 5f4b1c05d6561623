//! SuperOS Auth Daemon
//!
//! User-space authentication and identity service. The daemon verifies
//! caller identity, issues and tracks session credentials, and renders
//! policy decisions for other services. It holds no kernel authority:
//! it decides and attests, and a separate authority enforces.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use authd_auth::policy::{PolicyEngine, rules_from_config};
use authd_auth::session::{SessionManager, SessionSweeper};
use authd_auth::token::{SigningKeyRing, TokenCodec};
use authd_auth::verifier::CredentialVerifier;
use authd_core::config::AuthdConfig;
use authd_core::error::AuthError;
use authd_ipc::{Dispatcher, IpcServer};
use authd_store::{CredentialStore, MemoryCredentialStore};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Daemon error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AuthdConfig, AuthError> {
    let config_path =
        std::env::var("AUTHD_CONFIG").unwrap_or_else(|_| "config/default".to_string());

    AuthdConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AuthdConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main daemon run function
async fn run(config: AuthdConfig) -> Result<(), AuthError> {
    tracing::info!("Starting authd v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Credential store ─────────────────────────────────
    let store: Arc<dyn CredentialStore> = match &config.daemon.identity_seed {
        Some(path) => {
            tracing::info!(seed = %path, "Loading identity seed");
            Arc::new(MemoryCredentialStore::from_seed_file(path).await?)
        }
        None => {
            tracing::warn!("No identity seed configured; starting with an empty store");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    // ── Step 2: Core components ──────────────────────────────────
    let verifier = Arc::new(CredentialVerifier::new(
        Arc::clone(&store),
        config.credential.clone(),
    ));
    let sessions = Arc::new(SessionManager::new(config.session.clone()));
    let key_ring = Arc::new(SigningKeyRing::new(&config.token));
    let codec = Arc::new(TokenCodec::new(Arc::clone(&key_ring)));

    let rules = rules_from_config(&config.policy.rules)?;
    let policy = Arc::new(PolicyEngine::new(&rules));
    tracing::info!(rules = rules.len(), "Policy engine initialized");

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&verifier),
        Arc::clone(&sessions),
        Arc::clone(&codec),
        Arc::clone(&policy),
    ));

    // ── Step 3: Shutdown channel ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    let signal_tx = Arc::clone(&shutdown_tx);
    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = signal_tx.send(true);
    });

    // ── Step 4: Background sweeper ───────────────────────────────
    let sweeper = SessionSweeper::new(Arc::clone(&sessions), &config.session);
    let sweeper_handle = tokio::spawn(sweeper.run(shutdown_rx.clone()));

    // ── Step 5: Signing key rotation ─────────────────────────────
    let rotation_handle = if config.token.rotation_period_seconds > 0 {
        let ring = Arc::clone(&key_ring);
        let period = std::time::Duration::from_secs(config.token.rotation_period_seconds);
        let mut rotation_shutdown = shutdown_rx.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // interval fires immediately; skip so the initial key serves
            // one full period.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        ring.rotate();
                    }
                    _ = rotation_shutdown.changed() => {
                        if *rotation_shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        }))
    } else {
        tracing::info!("Signing key rotation disabled");
        None
    };

    // ── Step 6: SIGHUP policy reload ─────────────────────────────
    #[cfg(unix)]
    {
        let policy = Arc::clone(&policy);
        let mut reload_shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            let mut hangup =
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::hangup()) {
                    Ok(signal) => signal,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to install SIGHUP handler");
                        return;
                    }
                };
            loop {
                tokio::select! {
                    _ = hangup.recv() => {
                        match reload_policy(&policy) {
                            Ok(count) => tracing::info!(rules = count, "Policy reloaded"),
                            Err(e) => tracing::error!(error = %e, "Policy reload failed"),
                        }
                    }
                    _ = reload_shutdown.changed() => {
                        if *reload_shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
        });
    }

    // ── Step 7: Serve ────────────────────────────────────────────
    let server = IpcServer::new(&config.daemon.socket_path, dispatcher);
    let serve_result = server.run(shutdown_rx.clone()).await;

    // ── Step 8: Wait for background tasks ────────────────────────
    let _ = shutdown_tx.send(true);
    let _ = tokio::time::timeout(std::time::Duration::from_secs(10), sweeper_handle).await;
    if let Some(handle) = rotation_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(10), handle).await;
    }

    tracing::info!("authd shut down");
    serve_result
}

/// Re-read the configuration and swap the policy rule set.
fn reload_policy(policy: &PolicyEngine) -> Result<usize, AuthError> {
    let config = load_configuration()?;
    let rules = rules_from_config(&config.policy.rules)?;
    Ok(policy.replace(&rules))
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
