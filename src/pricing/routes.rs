//! HTTP routes for the pricing engine.
//!
//! Checkout and admin order creation call these over JSON; money travels as
//! decimal strings.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::AppState;

use super::calculators::{classify_size as classify, size_upcharge};
use super::config::PricingConfig;
use super::requests::{ClassifySizeRequest, QuoteRequest};
use super::responses::{ClassifySizeResponse, QuoteResponse};
use super::services;

/// Routes mounted under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote))
        .route("/classify-size", post(classify_size))
        .route("/config", get(config))
}

/// Full quote: fee lines, driver and company ledgers, tax and totals.
async fn quote(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let (request, model, tax) = body.into_parts();

    let breakdown = services::quote(&state.pricing, &request, model, &tax)?;
    let response = QuoteResponse::new(breakdown);

    tracing::info!(
        "Quote {} issued: total={} grand_total={}",
        response.quote_id,
        response.breakdown.fees.total_price,
        response.breakdown.grand_total
    );

    Ok(Json(response))
}

async fn classify_size(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ClassifySizeRequest>, JsonRejection>,
) -> Result<Json<ClassifySizeResponse>> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let tier = classify(body.item_value, &state.pricing);

    Ok(Json(ClassifySizeResponse {
        size_tier: tier,
        tier_index: tier.index(),
        size_upcharge: size_upcharge(tier, &state.pricing),
    }))
}

/// Active rule set, for admin audit.
async fn config(State(state): State<AppState>) -> Json<PricingConfig> {
    Json((*state.pricing).clone())
}
