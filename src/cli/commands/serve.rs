use std::path::PathBuf;

use anyhow::Result;
use axum_prometheus::PrometheusMetricLayer;
use axum::routing::get;
use chrono::Utc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::{initialize_app_state, AppConfig};
use crate::router::create_router;

/// Command-line overrides of the loaded configuration.
#[derive(Debug, Default)]
pub struct ServeOptions {
    pub data_dir: Option<PathBuf>,
    pub database_url: Option<String>,
    pub bind_address: Option<String>,
}

pub async fn serve(options: ServeOptions) -> Result<()> {
    trace!("Entering serve function");
    info!("Campus application starting up");

    let mut config = AppConfig::load()?;
    if let Some(data_dir) = options.data_dir {
        config.data_dir = data_dir;
    }
    if options.database_url.is_some() {
        config.database_url = options.database_url;
    }
    let bind_address = options
        .bind_address
        .unwrap_or_else(|| config.bind_address());
    debug!("Configuration: {:?}", config);

    // Initialize application state
    trace!("Initializing application state");
    let state = match initialize_app_state(&config).await {
        Ok(state) => {
            debug!("Application state initialized successfully");
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {:#}", e);
            return Err(e);
        }
    };

    let purged = service::sessions::purge_expired(&state.db, Utc::now()).await?;
    debug!("Purged {} expired sessions at startup", purged);

    // Create router
    trace!("Creating application router");
    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();
    let app = create_router(state)
        .route("/metrics", get(move || async move { metric_handle.render() }))
        .layer(prometheus_layer);
    debug!("Router created successfully");

    // Start server
    info!("Starting server on {}", bind_address);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Campus server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
