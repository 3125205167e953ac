use std::net::SocketAddr;

use anyhow::Result;
use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use careers_api::applications::storage::ResumeStore;
use careers_api::config::Config;
use careers_api::db;
use careers_api::mailer::Mailer;
use careers_api::routes::build_router;
use careers_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.rust_log.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Careers API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize MongoDB
    let database = db::connect(&config.mongo_uri, &config.db_name).await?;
    db::ensure_indexes(&database).await?;

    // Initialize SMTP; a broken mail account must not take job browsing down
    let mailer = Mailer::from_config(&config)?;
    mailer.verify().await;

    // Initialize resume storage
    let resumes = ResumeStore::open(&config.upload_dir).await?;

    let cors = cors_layer(&config)?;

    // Build app state
    let state = AppState {
        db: database,
        mailer,
        resumes,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Allows the configured frontend origin, or any origin when unset/`*`.
fn cors_layer(config: &Config) -> Result<CorsLayer> {
    if config.frontend_origin == "*" {
        return Ok(CorsLayer::permissive());
    }
    let origin: HeaderValue = config.frontend_origin.parse()?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
