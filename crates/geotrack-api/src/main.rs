use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use geotrack_core::ports::AlertNotifier;
use geotrack_notify::{build_channel, ChannelNotifier, NotificationChannel};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use geotrack_api::{create_router, ApiConfig, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geotrack_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();

    let config = match api_config.tracking_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid tracking configuration");
            tracing::error!(
                "Remediation:\n\
                1. Check GEOTRACK_* environment variables\n\
                2. Verify the file named by GEOTRACK_CONFIG is valid TOML"
            );
            std::process::exit(1);
        }
    };

    let channel = match build_channel(&config) {
        Ok(channel) => channel,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set up notification channel");
            std::process::exit(1);
        }
    };

    tracing::info!(
        port = api_config.port,
        channel = channel.name(),
        timeout_ms = api_config.request_timeout.as_millis() as u64,
        "Starting GeoTrack API server"
    );

    tracing::info!("Using in-memory delivery directory and history");
    let notifier: Arc<dyn AlertNotifier> = Arc::new(ChannelNotifier::new(channel));
    let state = Arc::new(AppState::in_memory(
        &config,
        notifier,
        api_config.request_timeout,
    ));

    let origin = match api_config.cors_origin.parse::<HeaderValue>() {
        Ok(origin) => origin,
        Err(e) => {
            tracing::error!(origin = %api_config.cors_origin, error = %e, "Invalid CORS origin");
            std::process::exit(1);
        }
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state).layer(TraceLayer::new_for_http()).layer(cors);

    let addr = api_config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
