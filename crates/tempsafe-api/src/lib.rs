//! Tempsafe API /v1: REST endpoints
pub mod config;
pub mod handlers;
pub mod metrics;
pub mod middleware;

use axum::{
    routing::{get, post},
    Router,
};
use config::ApiConfig;
use metrics::ApiMetrics;
use std::sync::Arc;
use tempsafe_quality::ComplianceProfile;
use tower_http::trace::TraceLayer;

/// Shared, read-only handler state
#[derive(Clone)]
pub struct AppState {
    pub profile: Arc<ComplianceProfile>,
    pub metrics: ApiMetrics,
}

impl AppState {
    pub fn new(profile: ComplianceProfile) -> Result<Self, prometheus::Error> {
        Ok(Self {
            profile: Arc::new(profile),
            metrics: ApiMetrics::new()?,
        })
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/v1/health", get(handlers::health))
        .route("/v1/registry", get(handlers::registry))
        .route("/v1/classify", post(handlers::classify))
        .route("/v1/reports", post(handlers::reports))
        .route("/v1/recommendations", post(handlers::recommendations))
        .route("/metrics", get(handlers::metrics))
        .layer(axum::middleware::from_fn(middleware::request_id))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: ApiConfig) -> anyhow::Result<()> {
    tracing::info!(profile = %config.profile.name, "loaded compliance profile");
    let app = create_app(AppState::new(config.profile)?);
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;

    tracing::info!("Tempsafe API listening on {}", config.addr);
    axum::serve(listener, app).await?;
    Ok(())
}
