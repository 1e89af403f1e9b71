//! Pricing models.
//!
//! The dynamic model prices on item value, item count, route and rush. The
//! flat model charges a fixed amount per service tier and is used for manual
//! admin orders. Both produce the same closed ledgers.

use rust_decimal::Decimal;

use super::calculators::{classify_size, compute_breakdown, split_revenue, validate_request};
use super::config::PricingConfig;
use super::models::{
    DriverEarnings, FeeBreakdown, PricedOrder, PricingRequest, RevenueSplit, ServiceTier,
};
use super::services::PricingError;

/// A way of turning a request into fee lines and both ledgers.
pub trait PricingStrategy {
    fn name(&self) -> &'static str;

    fn price(&self, request: &PricingRequest) -> Result<PricedOrder, PricingError>;
}

/// Value, distance and time based pricing.
pub struct DynamicPricing<'a> {
    config: &'a PricingConfig,
}

impl<'a> DynamicPricing<'a> {
    pub fn new(config: &'a PricingConfig) -> Self {
        Self { config }
    }
}

impl PricingStrategy for DynamicPricing<'_> {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn price(&self, request: &PricingRequest) -> Result<PricedOrder, PricingError> {
        let fees = compute_breakdown(request, self.config)?;
        let (driver, company) = split_revenue(&fees, &request.route, self.config);

        Ok(PricedOrder {
            size_tier: classify_size(request.item_value, self.config),
            fees,
            driver,
            company,
        })
    }
}

/// Fixed customer charge and driver payout per service tier.
///
/// The flat amount is all-inclusive: no surcharges and no service fee. The
/// tip still passes through to the driver.
pub struct FlatTierPricing<'a> {
    config: &'a PricingConfig,
    tier: ServiceTier,
}

impl<'a> FlatTierPricing<'a> {
    pub fn new(config: &'a PricingConfig, tier: ServiceTier) -> Self {
        Self { config, tier }
    }
}

impl PricingStrategy for FlatTierPricing<'_> {
    fn name(&self) -> &'static str {
        "flat"
    }

    fn price(&self, request: &PricingRequest) -> Result<PricedOrder, PricingError> {
        validate_request(request)?;

        let amounts = self.config.flat_tiers.amounts(self.tier);
        let base_price = amounts.customer_amount;
        let tip = request.tip;

        let fees = FeeBreakdown {
            base_price,
            size_upcharge: Decimal::ZERO,
            multi_item_fee: Decimal::ZERO,
            small_order_fee: Decimal::ZERO,
            distance_fee: Decimal::ZERO,
            time_fee: Decimal::ZERO,
            rush_fee: Decimal::ZERO,
            subtotal: base_price,
            service_fee: Decimal::ZERO,
            tip,
            total_price: base_price + tip,
        };

        let driver = DriverEarnings {
            driver_base_pay: amounts.driver_amount,
            driver_distance_pay: Decimal::ZERO,
            driver_time_pay: Decimal::ZERO,
            driver_size_bonus: Decimal::ZERO,
            driver_tip: tip,
            driver_total_earning: amounts.driver_amount + tip,
        };

        let company_base_fee_share = base_price - amounts.driver_amount;
        let company = RevenueSplit {
            company_service_fee: Decimal::ZERO,
            company_base_fee_share,
            company_distance_fee_share: Decimal::ZERO,
            company_time_fee_share: Decimal::ZERO,
            company_multi_item_fee: Decimal::ZERO,
            company_small_order_fee: Decimal::ZERO,
            company_rush_fee: Decimal::ZERO,
            company_total_revenue: company_base_fee_share,
        };

        Ok(PricedOrder {
            size_tier: classify_size(request.item_value, self.config),
            fees,
            driver,
            company,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculators::verify_reconciliation;
    use crate::pricing::models::{RouteInfo, SizeTier};
    use rust_decimal_macros::dec;

    fn request() -> PricingRequest {
        PricingRequest {
            item_value: dec!(40),
            number_of_items: 2,
            route: RouteInfo::new(dec!(12), dec!(25)),
            is_rush: true,
            tip: dec!(2.50),
        }
    }

    #[test]
    fn test_flat_tier_ignores_route_and_surcharges() {
        let config = PricingConfig::default();
        let priced = FlatTierPricing::new(&config, ServiceTier::Standard)
            .price(&request())
            .unwrap();

        assert_eq!(priced.fees.base_price, dec!(9.99));
        assert_eq!(priced.fees.subtotal, dec!(9.99));
        assert_eq!(priced.fees.rush_fee, dec!(0));
        assert_eq!(priced.fees.distance_fee, dec!(0));
        assert_eq!(priced.fees.service_fee, dec!(0));
        assert_eq!(priced.fees.total_price, dec!(12.49));
        assert_eq!(priced.size_tier, SizeTier::Medium);
    }

    #[test]
    fn test_flat_tier_ledgers_reconcile() {
        let config = PricingConfig::default();
        for tier in [ServiceTier::Standard, ServiceTier::Priority, ServiceTier::Instant] {
            let priced = FlatTierPricing::new(&config, tier).price(&request()).unwrap();
            let amounts = config.flat_tiers.amounts(tier);

            assert_eq!(priced.driver.driver_base_pay, amounts.driver_amount);
            assert_eq!(priced.driver.driver_tip, dec!(2.50));
            assert_eq!(
                priced.company.company_total_revenue,
                amounts.customer_amount - amounts.driver_amount
            );
            assert!(verify_reconciliation(&priced.fees, &priced.driver, &priced.company).is_ok());
        }
    }

    #[test]
    fn test_flat_tier_validates_like_dynamic() {
        let config = PricingConfig::default();
        let mut req = request();
        req.tip = dec!(-1);
        let err = FlatTierPricing::new(&config, ServiceTier::Instant)
            .price(&req)
            .unwrap_err();
        assert!(matches!(err, PricingError::InvalidTip { .. }));
    }

    #[test]
    fn test_dynamic_strategy_matches_calculators() {
        let config = PricingConfig::default();
        let req = request();
        let priced = DynamicPricing::new(&config).price(&req).unwrap();
        let fees = compute_breakdown(&req, &config).unwrap();
        let (driver, company) = split_revenue(&fees, &req.route, &config);

        assert_eq!(priced.fees, fees);
        assert_eq!(priced.driver, driver);
        assert_eq!(priced.company, company);
    }

    #[test]
    fn test_strategy_names() {
        let config = PricingConfig::default();
        let strategies: Vec<Box<dyn PricingStrategy + '_>> = vec![
            Box::new(DynamicPricing::new(&config)),
            Box::new(FlatTierPricing::new(&config, ServiceTier::Standard)),
        ];
        let names: Vec<&str> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["dynamic", "flat"]);
    }
}
