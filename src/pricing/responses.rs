//! Response DTOs for pricing API endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::models::{PaymentBreakdownView, SizeTier};

/// Response for a quote
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote_id: Uuid,
    pub quoted_at: DateTime<Utc>,
    pub breakdown: PaymentBreakdownView,
}

impl QuoteResponse {
    pub fn new(breakdown: PaymentBreakdownView) -> Self {
        Self {
            quote_id: Uuid::new_v4(),
            quoted_at: Utc::now(),
            breakdown,
        }
    }
}

/// Response for size classification
#[derive(Debug, Serialize)]
pub struct ClassifySizeResponse {
    pub size_tier: SizeTier,
    pub tier_index: u8,
    #[serde(with = "rust_decimal::serde::str")]
    pub size_upcharge: Decimal,
}

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub config_version: String,
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
