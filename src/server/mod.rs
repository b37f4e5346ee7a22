//! # Template Storage Service
//!
//! HTTP API over a [`ComponentStore`](crate::store::ComponentStore).
//!
//! | Route | Description |
//! |-------|-------------|
//! | `POST /api/templates` | Store a template payload, one row per component |
//! | `GET /api/templates` | Most recent 100 rows, newest first |
//! | `POST /api/templates/preview` | Render a payload as PNG |
//!
//! ## Usage
//!
//! ```bash
//! labelkit serve --listen 0.0.0.0:3000 --allowed-origin http://localhost:5173 --store components.json
//! ```

mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use state::{AppState, ServerConfig};

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::LabelError;

/// CORS policy admitting `allowed_origin` ("*" admits any origin).
fn cors(allowed_origin: &str) -> Result<CorsLayer, LabelError> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    if allowed_origin == "*" {
        return Ok(layer.allow_origin(Any));
    }
    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|e| LabelError::Config(format!("invalid allowed origin {:?}: {}", allowed_origin, e)))?;
    Ok(layer.allow_origin(origin))
}

/// Build the API router.
pub fn router(state: Arc<AppState>, allowed_origin: &str) -> Result<Router, LabelError> {
    Ok(Router::new()
        .route(
            "/api/templates",
            get(handlers::templates::list).post(handlers::templates::save),
        )
        .route("/api/templates/preview", post(handlers::templates::preview))
        .layer(cors(allowed_origin)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use labelkit::server::{serve, ServerConfig};
///
/// # async fn example() -> Result<(), labelkit::error::LabelError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:3000".to_string(),
///     allowed_origin: "*".to_string(),
///     store_path: None,
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<(), LabelError> {
    let state = Arc::new(AppState::from_config(&config));
    let app = router(state, &config.allowed_origin)?;

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| LabelError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e)))?;

    match &config.store_path {
        Some(path) => info!(listen = %config.listen_addr, store = %path.display(), "template service starting"),
        None => info!(listen = %config.listen_addr, store = "memory", "template service starting"),
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LabelError::Transport(format!("Server error: {}", e)))?;

    info!("template service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
