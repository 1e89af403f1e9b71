//! Quote service: runs a pricing strategy end to end.
//!
//! validate → compose fee lines → split revenue → reconcile → assemble.

use rust_decimal::Decimal;
use tracing::{debug, error};

use super::calculators::{assemble, validate_tax, verify_reconciliation};
use super::config::PricingConfig;
use super::models::{PaymentBreakdownView, PricingModel, PricingRequest, TaxContext};
use super::strategies::{DynamicPricing, FlatTierPricing, PricingStrategy};

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error("Item value must be greater than zero (got {item_value})")]
    InvalidItemValue { item_value: Decimal },

    #[error("Number of items must be at least 1 (got {number_of_items})")]
    InvalidItemCount { number_of_items: i32 },

    #[error("Tip must not be negative (got {tip})")]
    InvalidTip { tip: Decimal },

    #[error("Route distance and minutes must not be negative (got {distance_miles} mi, {estimated_minutes} min)")]
    InvalidRoute {
        distance_miles: Decimal,
        estimated_minutes: Decimal,
    },

    #[error("Tax rate must not be negative (got {rate})")]
    InvalidTaxRate { rate: Decimal },

    #[error("{field} exceeds the accepted maximum of {max} (got {value})")]
    AmountOutOfRange {
        field: &'static str,
        value: Decimal,
        max: Decimal,
    },

    #[error("Ledgers do not reconcile: driver {driver_total} + company {company_total} != total {total_price}")]
    ReconciliationMismatch {
        total_price: Decimal,
        driver_total: Decimal,
        company_total: Decimal,
    },
}

impl PricingError {
    /// Stable snake_case name used as `error_type` in API responses.
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::InvalidItemValue { .. } => "invalid_item_value",
            PricingError::InvalidItemCount { .. } => "invalid_item_count",
            PricingError::InvalidTip { .. } => "invalid_tip",
            PricingError::InvalidRoute { .. } => "invalid_route",
            PricingError::InvalidTaxRate { .. } => "invalid_tax_rate",
            PricingError::AmountOutOfRange { .. } => "amount_out_of_range",
            PricingError::ReconciliationMismatch { .. } => "reconciliation_mismatch",
        }
    }
}

/// Price an order with the selected model and build its receipt view.
///
/// A reconciliation mismatch means the rule set or rounding is defective. It
/// panics in debug builds and is logged for investigation in release builds,
/// where the quote is still returned.
pub fn quote(
    config: &PricingConfig,
    request: &PricingRequest,
    model: PricingModel,
    tax: &TaxContext,
) -> Result<PaymentBreakdownView, PricingError> {
    validate_tax(tax)?;

    let strategy: Box<dyn PricingStrategy + '_> = match model {
        PricingModel::Dynamic => Box::new(DynamicPricing::new(config)),
        PricingModel::Flat(tier) => Box::new(FlatTierPricing::new(config, tier)),
    };
    let priced = strategy.price(request)?;

    if let Err(err) = verify_reconciliation(&priced.fees, &priced.driver, &priced.company) {
        error!(
            "Reconciliation failed for config '{}' ({} pricing): {}",
            config.version,
            strategy.name(),
            err
        );
        if cfg!(debug_assertions) {
            panic!("{}", err);
        }
    }

    let view = assemble(request, &priced, tax, model, &config.version);

    debug!(
        "Quoted {} order: tier={} total={} grand_total={} driver={} company={}",
        strategy.name(),
        view.size_tier,
        view.fees.total_price,
        view.grand_total,
        view.driver.driver_total_earning,
        view.company.company_total_revenue
    );

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::models::{RouteInfo, ServiceTier};
    use rust_decimal_macros::dec;

    fn scenario_b() -> PricingRequest {
        PricingRequest {
            item_value: dec!(200),
            number_of_items: 3,
            route: RouteInfo::new(dec!(5), dec!(10)),
            is_rush: true,
            tip: dec!(3.00),
        }
    }

    #[test]
    fn test_pricing_error_display() {
        let err = PricingError::InvalidItemValue {
            item_value: dec!(0),
        };
        assert!(err.to_string().contains("greater than zero"));
        assert_eq!(err.error_type(), "invalid_item_value");

        let err = PricingError::InvalidItemCount { number_of_items: 0 };
        assert!(err.to_string().contains("at least 1"));
        assert_eq!(err.error_type(), "invalid_item_count");

        let err = PricingError::ReconciliationMismatch {
            total_price: dec!(10),
            driver_total: dec!(5),
            company_total: dec!(4),
        };
        assert!(err.to_string().contains("do not reconcile"));
    }

    #[test]
    fn test_quote_dynamic_full_pipeline() {
        let config = PricingConfig::default();
        let tax = TaxContext {
            rate: dec!(0.08),
            jurisdiction_name: "Cook County".to_string(),
            is_donation_exempt: false,
        };

        let view = quote(&config, &scenario_b(), PricingModel::Dynamic, &tax).unwrap();

        assert_eq!(view.fees.total_price, dec!(25.99));
        assert_eq!(view.driver.driver_total_earning, dec!(13.87));
        assert_eq!(view.company.company_total_revenue, dec!(12.12));
        // 25.99 * 0.08 = 2.0792
        assert_eq!(view.tax.tax_amount, dec!(2.08));
        assert_eq!(view.grand_total, dec!(28.07));
        assert_eq!(view.customer_net_cost, dec!(-171.93));
        assert_eq!(view.pricing_model, PricingModel::Dynamic);
    }

    #[test]
    fn test_quote_donation_exempt_suppresses_tax() {
        let config = PricingConfig::default();
        let tax = TaxContext {
            rate: dec!(0.08),
            jurisdiction_name: "Cook County".to_string(),
            is_donation_exempt: true,
        };

        let view = quote(&config, &scenario_b(), PricingModel::Dynamic, &tax).unwrap();

        assert_eq!(view.tax.tax_amount, dec!(0));
        assert_eq!(view.grand_total, view.fees.total_price);
    }

    #[test]
    fn test_quote_rejects_invalid_input_without_breakdown() {
        let config = PricingConfig::default();
        let mut req = scenario_b();
        req.item_value = dec!(0);

        let result = quote(&config, &req, PricingModel::Dynamic, &TaxContext::default());
        assert_eq!(
            result,
            Err(PricingError::InvalidItemValue {
                item_value: dec!(0)
            })
        );
    }

    #[test]
    fn test_quote_rejects_negative_tax_rate() {
        let config = PricingConfig::default();
        let tax = TaxContext {
            rate: dec!(-0.01),
            ..TaxContext::default()
        };
        let err = quote(&config, &scenario_b(), PricingModel::Dynamic, &tax).unwrap_err();
        assert_eq!(err.error_type(), "invalid_tax_rate");
    }

    #[test]
    fn test_quote_rejects_out_of_range_inputs() {
        let config = PricingConfig::default();

        let mut req = scenario_b();
        req.route = RouteInfo::new(dec!(0), dec!(10000000000000000000000000000));
        let err = quote(&config, &req, PricingModel::Dynamic, &TaxContext::default()).unwrap_err();
        assert_eq!(err.error_type(), "amount_out_of_range");

        let mut req = scenario_b();
        req.tip = Decimal::MAX;
        let err = quote(
            &config,
            &req,
            PricingModel::Flat(ServiceTier::Standard),
            &TaxContext::default(),
        )
        .unwrap_err();
        assert_eq!(err.error_type(), "amount_out_of_range");

        let tax = TaxContext {
            rate: Decimal::MAX,
            ..TaxContext::default()
        };
        let err = quote(&config, &scenario_b(), PricingModel::Dynamic, &tax).unwrap_err();
        assert!(matches!(err, PricingError::AmountOutOfRange { field: "tax.rate", .. }));
    }

    #[test]
    fn test_quote_is_idempotent() {
        let config = PricingConfig::default();
        let tax = TaxContext {
            rate: dec!(0.0725),
            jurisdiction_name: "Alameda".to_string(),
            is_donation_exempt: false,
        };

        let first = quote(&config, &scenario_b(), PricingModel::Dynamic, &tax).unwrap();
        let second = quote(&config, &scenario_b(), PricingModel::Dynamic, &tax).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_quote_flat_tier() {
        let config = PricingConfig::default();
        let view = quote(
            &config,
            &scenario_b(),
            PricingModel::Flat(ServiceTier::Priority),
            &TaxContext::default(),
        )
        .unwrap();

        // 14.99 flat + 3.00 tip
        assert_eq!(view.fees.total_price, dec!(17.99));
        assert_eq!(view.driver.driver_total_earning, dec!(12.00));
        assert_eq!(view.company.company_total_revenue, dec!(5.99));
        assert_eq!(view.pricing_model, PricingModel::Flat(ServiceTier::Priority));
    }
}
