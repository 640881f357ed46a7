//! Documentation of the blog gateway.
//!
//! Sits in front of the blog's page server and decides who gets to see which page.
//! Pages themselves and the blog API live elsewhere, this only routes.
//!
//!
//!
//! # General Infrastructure
//! - User hits the gateway's public endpoint
//! - Gateway checks the path against the exclusion list (API, `_next` assets, favicon)
//! - Excluded requests go straight to the page server
//! - Everything else goes through the access guard first
//! - Guard either redirects (`/login` or `/dashboard`) or lets the request through
//! - Let through means forwarded to the page server as is
//!
//!
//!
//! # Session Cookie
//!
//! **Goal**: Keep logged out users off the dashboard and logged in users off the login page.
//!
//! - Backend sets a `token` cookie on login/signup and clears it on logout
//! - Gateway only asks whether a non-empty `token` is there
//! - No signature check, no expiry check, no decoding
//! - Real verification happens on the backend when the page calls `/api/v1/*`
//!
//!
//!
//! # Routes
//!
//! | Path                      | Kind      |
//! |---------------------------|-----------|
//! | `/`                       | public    |
//! | `/login`, `/signup`       | auth-only |
//! | `/dashboard`, `/posts/..` | protected |
//! | anything else             | protected |
//!
//!
//!
//! # Configuration
//!
//! | Variable              | Default                                     |
//! |-----------------------|---------------------------------------------|
//! | `RUST_PORT`           | `3000`                                      |
//! | `UPSTREAM_URL`        | `http://127.0.0.1:3001`                     |
//! | `BACKEND_URL`         | `http://127.0.0.1:8000`                     |
//! | `GUARD_EXCLUDE`       | `api,_next/static,_next/image,favicon.ico`  |
//! | `UPSTREAM_TIMEOUT_MS` | `10000`                                     |
//!
//!
//!
//! # Setup
//!
//! Run with logs.
//! ```sh
//! RUST_LOG=server=debug,tower_http=debug cargo run -p blog -- serve
//! ```
//!
//! Check a single path without starting anything.
//! ```sh
//! cargo run -p blog -- check /dashboard --cookie
//! ```
use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state};
#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::{net::TcpListener, signal::ctrl_c};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod guard;
pub mod matcher;
pub mod proxy;
pub mod routes;
pub mod state;

use config::Config;
use guard::access_guard;
use routes::forward_handler;
use state::State;

pub fn app(state: Arc<State>) -> Router {
    Router::new()
        .fallback(forward_handler)
        .layer(from_fn_with_state(state.clone(), access_guard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config)?;

    info!("Forwarding to {}", state.config.upstream_url);
    info!("Skipping guard for {:?}", state.matcher.excluded());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
