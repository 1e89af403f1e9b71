//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Offending input for validation errors, echoed back to the caller.
fn pricing_error_details(err: &PricingError) -> Option<serde_json::Value> {
    match err {
        PricingError::InvalidItemValue { item_value } => {
            Some(json!({ "item_value": item_value.to_string() }))
        }
        PricingError::InvalidItemCount { number_of_items } => {
            Some(json!({ "number_of_items": number_of_items }))
        }
        PricingError::InvalidTip { tip } => Some(json!({ "tip": tip.to_string() })),
        PricingError::InvalidRoute {
            distance_miles,
            estimated_minutes,
        } => Some(json!({
            "distance_miles": distance_miles.to_string(),
            "estimated_minutes": estimated_minutes.to_string(),
        })),
        PricingError::InvalidTaxRate { rate } => Some(json!({ "rate": rate.to_string() })),
        PricingError::AmountOutOfRange { field, value, max } => Some(json!({
            "field": field,
            "value": value.to_string(),
            "max": max.to_string(),
        })),
        PricingError::ReconciliationMismatch { .. } => None,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                PricingErrorResponse {
                    error_type: "not_found".to_string(),
                    message: "Not found".to_string(),
                    details: None,
                },
            ),
            AppError::BadRequest(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    PricingErrorResponse {
                        error_type: "bad_request".to_string(),
                        message: msg.clone(),
                        details: None,
                    },
                )
            }
            AppError::Pricing(e @ PricingError::ReconciliationMismatch { .. }) => {
                tracing::error!("Pricing invariant violated: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    PricingErrorResponse {
                        error_type: e.error_type().to_string(),
                        message: "Internal pricing error".to_string(),
                        details: None,
                    },
                )
            }
            AppError::Pricing(e) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                PricingErrorResponse {
                    error_type: e.error_type().to_string(),
                    message: e.to_string(),
                    details: pricing_error_details(e),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
