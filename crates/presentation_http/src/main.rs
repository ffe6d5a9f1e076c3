//! ViralTogether location server
//!
//! Main entry point for the HTTP API server.

use std::{future::IntoFuture, sync::Arc, time::Duration};

use application::LocationService;
use axum::http::{HeaderValue, Method};
use infrastructure::{AppConfig, DEFAULT_LOG_FILTER, GeocodingAdapter, ServerConfig, init_logging};
use presentation_http::{routes, set_expose_internal_errors, state::AppState};
use tokio::{net::TcpListener, signal, sync::oneshot};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before logging so the log format can be honoured
    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(config.server.log_format, DEFAULT_LOG_FILTER)?;

    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "ViralTogether location server starting"
    );
    info!(
        host = %config.server.host,
        port = %config.server.port,
        provider = %config.geocoding.provider,
        log_format = %config.server.log_format,
        "Configuration loaded"
    );

    set_expose_internal_errors(config.server.expose_internal_errors);

    // Initialize geocoding
    let adapter = GeocodingAdapter::from_config(&config.geocoding)
        .map_err(|e| anyhow::anyhow!("Failed to initialize geocoding: {e}"))?;
    let location_service = LocationService::new(Arc::new(adapter));

    let status = location_service.status();
    if status.degraded {
        warn!(
            requested = %config.geocoding.provider,
            provider = %status.provider,
            "Geocoding running on fallback provider"
        );
    }

    let server_config = config.server.clone();
    let state = AppState::new(location_service, config);

    // Add middleware (last added = outermost)
    let app = routes::create_router(state)
        .layer(RequestBodyLimitLayer::new(
            server_config.max_body_size_json_bytes,
        ))
        .layer(cors_layer(&server_config))
        .layer(TraceLayer::new_for_http());

    let addr = server_config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    let shutdown_timeout = Duration::from_secs(server_config.shutdown_timeout_secs);
    let (signalled_tx, signalled_rx) = oneshot::channel::<()>();

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = signalled_tx.send(());
        })
        .into_future();

    let drain_deadline = async move {
        if signalled_rx.await.is_ok() {
            info!("Waiting up to {:?} for connections to close...", shutdown_timeout);
            tokio::time::sleep(shutdown_timeout).await;
        } else {
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        result = server => result?,
        () = drain_deadline => {
            warn!("Shutdown timeout elapsed with open connections, exiting");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// CORS: any origin when none are configured, otherwise the configured list
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    if !server.cors_enabled {
        return CorsLayer::new();
    }

    if server.allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any)
    }
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
