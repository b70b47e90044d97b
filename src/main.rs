//! Fake Account Detector server entry point

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fake_account_detector::{
    config::{Config, LogFormat},
    create_router,
    model::{load_or_fallback, Classifier},
    AppState,
};

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "fake_account_detector=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    init_tracing(config.log_format);

    tracing::info!("Fake Account Detector starting...");

    if config.secret_generated {
        if config.is_production() {
            tracing::warn!("SECRET_KEY is not set in production - using a random per-process key");
        } else {
            tracing::warn!("SECRET_KEY is not set - using a random per-process key");
        }
    }

    // Model is optional: the heuristic takes over when it is missing
    let classifier = Classifier::from_artifact(load_or_fallback(&config.model_path));
    if !classifier.is_model_loaded() {
        tracing::info!("Classifier running in heuristic mode");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = create_router(AppState::new(classifier, config));

    // Start server
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
