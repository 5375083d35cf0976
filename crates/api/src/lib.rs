//! Titanic Survival API Server
//!
//! REST API for training the survival model and serving predictions.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod error;
mod routes;
pub mod settings;
mod state;
pub mod telemetry;

pub use error::ApiError;
pub use settings::{Settings, SettingsError};
pub use state::AppState;
pub use telemetry::{init_logging, install_metrics};

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health))
        .route("/metrics", get(routes::health::metrics))
        .route("/predict", post(routes::predict::predict))
        .route("/train", get(routes::train::train))
        .route("/evaluate", get(routes::train::evaluate))
        .route("/model", get(routes::model::model))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until ctrl-c
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let metrics = install_metrics()?;
    let state = Arc::new(AppState::new(settings, Some(metrics)));
    let app = create_router(state);

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, model_path = %settings.model_path, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutdown signal received");
            }
        })
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}
