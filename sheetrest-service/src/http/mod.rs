//! REST surface: router, state, server loop.

mod error;
mod handlers;

pub use error::{ApiError, ErrorBody};
pub use handlers::ACCESS_TOKEN_HEADER;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use sheetrest_core::config::SheetRestConfig;
use sheetrest_core::error::Result;
use sheetrest_core::traits::GridBackend;

use crate::rows::RowService;

/// Shared state handed to every handler.
pub struct AppState<B> {
    /// The CRUD orchestrator.
    pub rows: Arc<RowService<B>>,
    /// Startup configuration.
    pub config: Arc<SheetRestConfig>,
}

impl<B> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            config: Arc::clone(&self.config),
        }
    }
}

impl<B: GridBackend + 'static> AppState<B> {
    /// Builds the state from a backend and configuration.
    pub fn new(backend: B, config: SheetRestConfig) -> Self {
        Self {
            rows: Arc::new(RowService::new(backend)),
            config: Arc::new(config),
        }
    }
}

/// Builds the application router.
pub fn router<B: GridBackend + 'static>(state: AppState<B>) -> Router {
    let cors = cors_layer(&state.config);
    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health))
        .route(
            "/{document_id}/{sheet_id}",
            get(handlers::list_rows::<B>).post(handlers::create_row::<B>),
        )
        .route("/{document_id}/{sheet_id}/info", get(handlers::sheet_info::<B>))
        .route("/{document_id}/{sheet_id}/bulk", post(handlers::bulk_create::<B>))
        .route(
            "/{document_id}/{sheet_id}/{row_id}",
            get(handlers::get_row::<B>).put(handlers::update_row::<B>),
        )
        .route(
            "/{document_id}/{sheet_id}/{row_id}/bulk",
            put(handlers::bulk_update::<B>),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Permissive CORS when `"*"` is allowed, otherwise the configured origins.
fn cors_layer(config: &SheetRestConfig) -> CorsLayer {
    let origins = &config.cors.allowed_origins;
    if origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Binds the listener and serves until a shutdown signal arrives.
///
/// # Errors
/// Returns an i/o error when the address cannot be bound or the server
/// fails.
pub async fn serve<B: GridBackend + 'static>(config: SheetRestConfig, backend: B) -> Result<()> {
    let address = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(backend, config);
    let app = router(state);

    let listener = TcpListener::bind(&address).await?;
    info!(%address, "sheetrest listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            error!(%error, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                error!(%error, "failed to install SIGTERM handler");
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}
