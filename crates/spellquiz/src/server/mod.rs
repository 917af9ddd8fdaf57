//! HTTP server: routes, shared state and lifecycle.
//!
//! The quiz page and its JSON API are served by a single axum [`Router`].
//! Storage is a blocking SQLite connection, so every database call runs on
//! the blocking pool behind a mutex.

/// Tracing target for server startup events.
pub const TRACING_TARGET_STARTUP: &str = "spellquiz::server::startup";

/// Tracing target for server shutdown events.
pub const TRACING_TARGET_SHUTDOWN: &str = "spellquiz::server::shutdown";

/// Tracing target for request handling.
pub const TRACING_TARGET_HANDLER: &str = "spellquiz::server::handler";

mod client_ip;
mod error;
mod extract;
mod handlers;
mod shutdown;

use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub use client_ip::{resolve_client_ip, ClientIp, UNKNOWN_CLIENT};
pub use error::{ApiError, ErrorResponse};
pub use extract::Json;
pub use handlers::{CheckRequest, CheckResponse, QuizResponse};
pub use shutdown::shutdown_signal;

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::quiz::WordBank;
use crate::storage::Storage;

/// State shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    storage: Arc<Mutex<Storage>>,
    word_bank: Arc<WordBank>,
    trust_forwarded_for: bool,
}

impl AppState {
    /// Create state around an open store and a word bank.
    #[must_use]
    pub fn new(storage: Storage, word_bank: WordBank) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            word_bank: Arc::new(word_bank),
            trust_forwarded_for: true,
        }
    }

    /// Set whether `X-Forwarded-For` is used for the client address.
    #[must_use]
    pub fn with_trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Whether `X-Forwarded-For` is used for the client address.
    #[must_use]
    pub fn trust_forwarded_for(&self) -> bool {
        self.trust_forwarded_for
    }

    /// The word bank quizzes are drawn from.
    #[must_use]
    pub fn word_bank(&self) -> &WordBank {
        &self.word_bank
    }

    /// Run `f` against the store on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or an internal error if the lock
    /// is poisoned or the blocking task fails.
    pub async fn with_storage<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Storage) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let storage = Arc::clone(&self.storage);
        tokio::task::spawn_blocking(move || {
            let mut guard = storage
                .lock()
                .map_err(|_| Error::internal("storage lock poisoned"))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| Error::internal(format!("storage task failed: {e}")))?
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/quiz", get(handlers::get_quiz))
        .route("/api/check", post(handlers::check))
        .route("/api/stats", get(handlers::stats))
        .fallback(handlers::not_found)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

/// Bind and serve until a shutdown signal arrives.
///
/// After the signal, in-flight requests get `shutdown_timeout_secs` to
/// finish before the server stops waiting for them.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails
/// while running.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = config.server_addr();

    let listener = TcpListener::bind(addr).await.map_err(|source| {
        tracing::error!(
            target: TRACING_TARGET_STARTUP,
            addr = %addr,
            error = %source,
            "Failed to bind to address"
        );
        Error::Bind {
            address: addr.to_string(),
            source,
        }
    })?;

    tracing::info!(
        target: TRACING_TARGET_STARTUP,
        addr = %addr,
        trust_forwarded_for = state.trust_forwarded_for(),
        words = state.word_bank().word_count(),
        "Server is ready and listening for connections"
    );

    if config.binds_to_all_interfaces() {
        tracing::warn!(
            target: TRACING_TARGET_STARTUP,
            "Server is bound to all interfaces. Ensure firewall rules are properly configured."
        );
    }

    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
    let shutdown = async move {
        shutdown_signal().await;
        let _ = signalled_tx.send(());
    };

    let app = router(state);
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .into_future();

    let timeout = config.shutdown_timeout();
    let deadline = async move {
        if signalled_rx.await.is_ok() {
            tokio::time::sleep(timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => {
            result.map_err(|err| {
                tracing::error!(
                    target: TRACING_TARGET_SHUTDOWN,
                    error = %err,
                    "Server encountered an error"
                );
                Error::Io(err)
            })?;
            tracing::info!(target: TRACING_TARGET_SHUTDOWN, "Server shut down gracefully");
        }
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SHUTDOWN,
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout elapsed, dropping remaining connections"
            );
        }
    }

    Ok(())
}
