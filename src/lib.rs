//! Pricing and revenue-split service for package-return pickups.

pub mod error;
pub mod pricing;
pub mod settings;

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::pricing::responses::HealthResponse;
use crate::pricing::PricingConfig;

/// Shared application state.
///
/// The rule set is loaded once and never mutated, so every request prices
/// against the same snapshot.
#[derive(Clone)]
pub struct AppState {
    pub pricing: Arc<PricingConfig>,
}

impl AppState {
    pub fn new(pricing: PricingConfig) -> Self {
        Self {
            pricing: Arc::new(pricing),
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api/pricing", pricing::router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        config_version: state.pricing.version.clone(),
    })
}

async fn not_found() -> AppError {
    AppError::NotFound
}
