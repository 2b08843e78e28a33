//! HTTP transport over [`ImageService`].

mod errors;
mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use pixbatch_core::{Config, ImageService, LocalImageStore};
use tokio::net::TcpListener;
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use handlers::{
    generate_thumbnails_handler, health_handler, upload_image_handler, upload_zip_handler,
};

/// Application state container
#[derive(Clone)]
pub struct AppState {
    pub service: ImageService,
}

/// Create router with all routes and middleware
pub fn create_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/upload-image", post(upload_image_handler))
        .route("/upload-zip", post(upload_zip_handler))
        .route("/generate-thumbnails", post(generate_thumbnails_handler))
        .nest_service("/images", ServeDir::new(config.image_dir()))
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.server.max_upload_bytes()))
        .layer(TraceLayer::new_for_http())
}

/// Bind `server.bind_addr` and serve until the process is stopped.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let store = LocalImageStore::new(config.image_dir());
    store.init().await?;
    info!("Image directory: {}", store.image_dir().display());

    let state = AppState {
        service: ImageService::new(config, Arc::new(store)),
    };
    let app = create_router(state, config);

    info!("Listening on {}", config.server.bind_addr);
    let listener = TcpListener::bind(&config.server.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
