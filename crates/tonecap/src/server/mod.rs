//! HTTP caption backend.
//!
//! `GET /` is a liveness message; `POST /generate` takes a multipart upload
//! (`file`, optional `tone`) and always answers 200 with a
//! [`GenerateResponse`](tonecap_core::GenerateResponse) body.

mod routes;

use std::sync::Arc;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tonecap_core::{CaptionPipeline, Config, ModelOverrides, Tonecap};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Headroom for multipart boundaries and the `tone` field on top of the
/// image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared handler state. `pipeline` is `None` when the model failed to load
/// at startup.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Option<Arc<CaptionPipeline>>,
}

/// Build the application router.
pub fn router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/generate", post(routes::generate))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Request body limit derived from `limits.max_file_size_mb`.
fn upload_limit(config: &Config) -> usize {
    let image_bytes = config.limits.max_file_size_mb.saturating_mul(1024 * 1024);
    usize::try_from(image_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES)
}

/// Load the model once, then serve until Ctrl+C.
///
/// A model that fails to load is logged and the server still starts;
/// `/generate` then answers with the model-unavailable body.
pub async fn run(config: Config, overrides: ModelOverrides) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    let max_upload_bytes = upload_limit(&config);

    let pipeline = match Tonecap::connect(config, &overrides).await {
        Ok(tonecap) => Some(Arc::new(tonecap.into_pipeline())),
        Err(e) => {
            tracing::error!("Error loading model: {e}");
            None
        }
    };

    let app = router(AppState { pipeline }, max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Tonecap caption backend listening on http://{addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
