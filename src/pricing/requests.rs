//! Request DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;

use super::models::{PricingModel, PricingRequest, RouteInfo, TaxContext};

/// Request to quote an order
#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub item_value: Decimal,
    #[serde(default = "default_item_count")]
    pub number_of_items: i32,
    /// Absent when the mapping service could not resolve a route.
    #[serde(default)]
    pub route: Option<RouteInfo>,
    #[serde(default)]
    pub is_rush: bool,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub tip: Option<Decimal>,
    #[serde(default)]
    pub tax: Option<TaxRequest>,
    #[serde(default)]
    pub pricing: PricingModel,
}

fn default_item_count() -> i32 {
    1
}

impl QuoteRequest {
    pub fn into_parts(self) -> (PricingRequest, PricingModel, TaxContext) {
        let request = PricingRequest {
            item_value: self.item_value,
            number_of_items: self.number_of_items,
            route: self.route.unwrap_or_default(),
            is_rush: self.is_rush,
            tip: self.tip.unwrap_or(Decimal::ZERO),
        };
        let tax = self.tax.map(TaxContext::from).unwrap_or_default();
        (request, self.pricing, tax)
    }
}

/// Tax facts resolved by the jurisdiction lookup
#[derive(Debug, Deserialize)]
pub struct TaxRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
    #[serde(default)]
    pub jurisdiction_name: String,
    #[serde(default)]
    pub is_donation_exempt: bool,
}

impl From<TaxRequest> for TaxContext {
    fn from(tax: TaxRequest) -> Self {
        TaxContext {
            rate: tax.rate,
            jurisdiction_name: tax.jurisdiction_name,
            is_donation_exempt: tax.is_donation_exempt,
        }
    }
}

/// Request to classify an item value into a size tier
#[derive(Debug, Deserialize)]
pub struct ClassifySizeRequest {
    #[serde(with = "rust_decimal::serde::str")]
    pub item_value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::ServiceTier;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quote_request_defaults() {
        let body: QuoteRequest = serde_json::from_str(r#"{"item_value":"50.00"}"#).unwrap();
        let (request, model, tax) = body.into_parts();

        assert_eq!(request.item_value, dec!(50.00));
        assert_eq!(request.number_of_items, 1);
        assert_eq!(request.route, RouteInfo::default());
        assert!(!request.is_rush);
        assert_eq!(request.tip, dec!(0));
        assert_eq!(model, PricingModel::Dynamic);
        assert_eq!(tax, TaxContext::default());
    }

    #[test]
    fn test_quote_request_full() {
        let body: QuoteRequest = serde_json::from_str(
            r#"{
                "item_value": "200",
                "number_of_items": 3,
                "route": {"distance_miles": "5", "estimated_minutes": "10"},
                "is_rush": true,
                "tip": "3.00",
                "tax": {"rate": "0.08", "jurisdiction_name": "Cook County", "is_donation_exempt": true},
                "pricing": {"model": "flat", "tier": "instant"}
            }"#,
        )
        .unwrap();
        let (request, model, tax) = body.into_parts();

        assert_eq!(request.number_of_items, 3);
        assert_eq!(request.route, RouteInfo::new(dec!(5), dec!(10)));
        assert!(request.is_rush);
        assert_eq!(request.tip, dec!(3.00));
        assert_eq!(model, PricingModel::Flat(ServiceTier::Instant));
        assert_eq!(tax.rate, dec!(0.08));
        assert_eq!(tax.jurisdiction_name, "Cook County");
        assert!(tax.is_donation_exempt);
    }
}
