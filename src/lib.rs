//! Fake Account Detector
//!
//! Web form that labels a social account as fake or real.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  FAKE ACCOUNT DETECTOR                   │
//! ├──────────────────────────────────────────────────────────┤
//! │  POST /  ──►  features::extract  ──►  model::Classifier  │
//! │    (Axum)      (defaults, checks)      │                 │
//! │                                        ├─► ONNX model    │
//! │                                        └─► heuristic     │
//! │  GET /   ◄──  views::render_index  ◄── flash cookie      │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod flash;
pub mod handlers;
pub mod model;
pub mod views;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

pub use error::{AppError, AppResult};

use config::Config;
use model::Classifier;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(classifier: Classifier, config: Config) -> Self {
        Self {
            classifier: Arc::new(classifier),
            config: Arc::new(config),
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index::show).post(handlers::index::submit))
        .route("/health", get(handlers::health::check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
