//! Loan Eligibility Web Server
//!
//! Serves the applicant form and the prediction API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    LOAN ELIGIBILITY                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌───────────┐   ┌────────────────────────┐  │
//! │  │  Form     │──▶│  Encoder  │──▶│  Reporter              │  │
//! │  │  (Axum)   │   │ (one-hot) │   │  (trees + TreeSHAP)    │  │
//! │  └───────────┘   └───────────┘   └───────────┬────────────┘  │
//! │                                              ▼               │
//! │                                     ┌─────────────────┐      │
//! │                                     │ model.json      │      │
//! │                                     │ (loaded once)   │      │
//! │                                     └─────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use loan_eligibility_core::{ClassifierHandle, Reporter};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "loan_eligibility_server=debug,loan_eligibility_core=info,tower_http=debug".into()
    });
    if config.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Loan Eligibility Server starting...");
    tracing::info!("Model artifact: {}", config.core.model_path);

    // Load classifier once; nothing below runs without it
    let handle = ClassifierHandle::from_config(&config.core)
        .with_context(|| format!("failed to load model artifact {}", config.core.model_path))?;

    // Build application state
    let state = AppState {
        reporter: Reporter::from_config(Arc::new(handle), &config.core),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub reporter: Reporter,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::page::index))
        .route("/health", get(handlers::health::check))
        .route("/api/v1/model", get(handlers::model::info))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
