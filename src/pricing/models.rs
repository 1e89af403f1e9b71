//! Domain records for the pricing pipeline.
//!
//! Every ledger is a closed record: each fee line, driver pay line and company
//! revenue line is a named field so receipt and payout consumers see all of them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Discrete classification of declared item value.
///
/// Ordered `Small < Medium < Large`; the order is the tier index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl SizeTier {
    pub fn index(self) -> u8 {
        match self {
            SizeTier::Small => 0,
            SizeTier::Medium => 1,
            SizeTier::Large => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeTier::Small => "small",
            SizeTier::Medium => "medium",
            SizeTier::Large => "large",
        }
    }
}

impl std::fmt::Display for SizeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed-price service level used for manual admin orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceTier {
    Standard,
    Priority,
    Instant,
}

impl ServiceTier {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceTier::Standard => "standard",
            ServiceTier::Priority => "priority",
            ServiceTier::Instant => "instant",
        }
    }
}

/// Which pricing model produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "model", content = "tier", rename_all = "snake_case")]
pub enum PricingModel {
    #[default]
    Dynamic,
    Flat(ServiceTier),
}

/// Route facts supplied by the mapping service.
///
/// Defaults to zero distance and zero minutes when the route is unknown,
/// which prices the order on base fees alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteInfo {
    #[serde(with = "rust_decimal::serde::str")]
    pub distance_miles: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub estimated_minutes: Decimal,
}

impl RouteInfo {
    pub fn new(distance_miles: Decimal, estimated_minutes: Decimal) -> Self {
        Self {
            distance_miles,
            estimated_minutes,
        }
    }
}

/// One pricing evaluation's input.
///
/// `number_of_items` stays signed so that a zero or negative count reaches
/// validation and is reported as `InvalidItemCount`.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingRequest {
    pub item_value: Decimal,
    pub number_of_items: i32,
    pub route: RouteInfo,
    pub is_rush: bool,
    pub tip: Decimal,
}

/// Resolved tax facts for the order's jurisdiction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TaxContext {
    pub rate: Decimal,
    pub jurisdiction_name: String,
    pub is_donation_exempt: bool,
}

/// Customer-facing fee lines.
///
/// `subtotal` is the sum of the seven lines above it and
/// `total_price = subtotal + service_fee + tip`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeeBreakdown {
    #[serde(with = "rust_decimal::serde::str")]
    pub base_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub size_upcharge: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub multi_item_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub small_order_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub distance_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub time_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub rush_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub service_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub tip: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_price: Decimal,
}

/// Driver payout ledger for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverEarnings {
    #[serde(with = "rust_decimal::serde::str")]
    pub driver_base_pay: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub driver_distance_pay: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub driver_time_pay: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub driver_size_bonus: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub driver_tip: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub driver_total_earning: Decimal,
}

/// Company revenue ledger for one order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueSplit {
    #[serde(with = "rust_decimal::serde::str")]
    pub company_service_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub company_base_fee_share: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub company_distance_fee_share: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub company_time_fee_share: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub company_multi_item_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub company_small_order_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub company_rush_fee: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub company_total_revenue: Decimal,
}

/// Output of a pricing strategy, before tax and presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub size_tier: SizeTier,
    pub fees: FeeBreakdown,
    pub driver: DriverEarnings,
    pub company: RevenueSplit,
}

/// Tax applied on top of the total price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxLine {
    pub jurisdiction_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub rate: Decimal,
    pub is_donation_exempt: bool,
    #[serde(with = "rust_decimal::serde::str")]
    pub tax_amount: Decimal,
}

/// Everything the receipt, payment capture and payout ledger need.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentBreakdownView {
    pub pricing_model: PricingModel,
    pub config_version: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub item_value: Decimal,
    pub number_of_items: i32,
    pub size_tier: SizeTier,
    pub route: RouteInfo,
    pub fees: FeeBreakdown,
    pub driver: DriverEarnings,
    pub company: RevenueSplit,
    pub tax: TaxLine,
    #[serde(with = "rust_decimal::serde::str")]
    pub grand_total: Decimal,
    /// Negative when the refund received exceeds what the customer paid.
    #[serde(with = "rust_decimal::serde::str")]
    pub customer_net_cost: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_tier_ordering_matches_index() {
        assert!(SizeTier::Small < SizeTier::Medium);
        assert!(SizeTier::Medium < SizeTier::Large);
        assert_eq!(SizeTier::Small.index(), 0);
        assert_eq!(SizeTier::Large.index(), 2);
    }

    #[test]
    fn test_pricing_model_wire_format() {
        let dynamic: PricingModel = serde_json::from_str(r#"{"model":"dynamic"}"#).unwrap();
        assert_eq!(dynamic, PricingModel::Dynamic);

        let flat: PricingModel =
            serde_json::from_str(r#"{"model":"flat","tier":"priority"}"#).unwrap();
        assert_eq!(flat, PricingModel::Flat(ServiceTier::Priority));

        let json = serde_json::to_value(PricingModel::Flat(ServiceTier::Instant)).unwrap();
        assert_eq!(json["model"], "flat");
        assert_eq!(json["tier"], "instant");
    }

    #[test]
    fn test_route_default_is_zero() {
        let route = RouteInfo::default();
        assert_eq!(route.distance_miles, Decimal::ZERO);
        assert_eq!(route.estimated_minutes, Decimal::ZERO);
    }
}
