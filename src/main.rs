//! scanmap server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints and, when the
//! `swagger-ui` feature is enabled, the interactive API docs.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use scanmap::api;
use scanmap::app_state::AppState;
use scanmap::config::{LogFormat, ScanmapConfig, StoreBackend};
use scanmap::persistence::{MemoryStore, PostgresStore, Store};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

async fn build_store(config: &ScanmapConfig) -> anyhow::Result<Arc<dyn Store>> {
    match config.store_backend {
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            let store = PostgresStore::connect(config)
                .await
                .context("connecting to postgres")?;
            Ok(Arc::new(store))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ScanmapConfig::from_env().context("loading configuration")?;

    init_tracing(config.log_format);
    tracing::info!(
        addr = %config.listen_addr,
        store = ?config.store_backend,
        embedding = %config.embedding,
        "starting scanmap"
    );

    // Build persistence and service layers
    let store = build_store(&config).await?;
    let app_state = AppState::new(store, config.embedding.clone())?;

    // Build router
    let app = Router::new().merge(api::build_router());

    #[cfg(feature = "swagger-ui")]
    let app = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        app.merge(
            SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", api::ApiDoc::openapi()),
        )
    };

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
