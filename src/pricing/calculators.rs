//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no I/O, no shared state. Every function
//! takes the rule set explicitly.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use super::config::PricingConfig;
use super::models::{
    DriverEarnings, FeeBreakdown, PaymentBreakdownView, PricedOrder, PricingModel,
    PricingRequest, RevenueSplit, RouteInfo, SizeTier, TaxContext, TaxLine,
};
use super::services::PricingError;

/// Largest acceptable gap between the two ledgers and the customer total.
pub const RECONCILIATION_TOLERANCE: Decimal = dec!(0.01);

/// Upper bounds on request inputs. Together with the bounds enforced by
/// `PricingConfig::validate` they keep every product and sum far below
/// `Decimal::MAX`.
pub const MAX_ITEM_VALUE: Decimal = dec!(1000000000);
pub const MAX_TIP: Decimal = dec!(1000000);
pub const MAX_DISTANCE_MILES: Decimal = dec!(100000);
pub const MAX_ESTIMATED_MINUTES: Decimal = dec!(100000);
pub const MAX_TAX_RATE: Decimal = dec!(1);

fn check_max(field: &'static str, value: Decimal, max: Decimal) -> Result<(), PricingError> {
    if value > max {
        return Err(PricingError::AmountOutOfRange { field, value, max });
    }
    Ok(())
}

/// Round to specified decimal places, halves rounding away from zero.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use pickup_pricing::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(3));
/// assert_eq!(round_money(dec!(2.9985), 2), dec!(3.00));
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
}

fn cents(amount: Decimal) -> Decimal {
    round_money(amount, 2)
}

/// Map a declared item value to its size tier.
///
/// Total and monotonically non-decreasing in `item_value`. Negative values are
/// rejected upstream and classify as `Small` here.
pub fn classify_size(item_value: Decimal, config: &PricingConfig) -> SizeTier {
    if item_value >= config.size.large_from {
        SizeTier::Large
    } else if item_value >= config.size.medium_from {
        SizeTier::Medium
    } else {
        SizeTier::Small
    }
}

/// Handling surcharge for a size tier.
pub fn size_upcharge(tier: SizeTier, config: &PricingConfig) -> Decimal {
    match tier {
        SizeTier::Small => config.size.small_upcharge,
        SizeTier::Medium => config.size.medium_upcharge,
        SizeTier::Large => config.size.large_upcharge,
    }
}

/// Check every request field before any fee line is computed.
pub fn validate_request(request: &PricingRequest) -> Result<(), PricingError> {
    if request.item_value <= Decimal::ZERO {
        return Err(PricingError::InvalidItemValue {
            item_value: request.item_value,
        });
    }
    if request.number_of_items < 1 {
        return Err(PricingError::InvalidItemCount {
            number_of_items: request.number_of_items,
        });
    }
    if request.tip < Decimal::ZERO {
        return Err(PricingError::InvalidTip { tip: request.tip });
    }
    let RouteInfo {
        distance_miles,
        estimated_minutes,
    } = request.route;
    if distance_miles < Decimal::ZERO || estimated_minutes < Decimal::ZERO {
        return Err(PricingError::InvalidRoute {
            distance_miles,
            estimated_minutes,
        });
    }
    check_max("item_value", request.item_value, MAX_ITEM_VALUE)?;
    check_max("tip", request.tip, MAX_TIP)?;
    check_max("route.distance_miles", distance_miles, MAX_DISTANCE_MILES)?;
    check_max("route.estimated_minutes", estimated_minutes, MAX_ESTIMATED_MINUTES)?;
    Ok(())
}

/// Check the resolved tax facts: a rate between 0 and 100%.
pub fn validate_tax(tax: &TaxContext) -> Result<(), PricingError> {
    if tax.rate < Decimal::ZERO {
        return Err(PricingError::InvalidTaxRate { rate: tax.rate });
    }
    check_max("tax.rate", tax.rate, MAX_TAX_RATE)
}

/// Compose the customer-facing fee lines for the dynamic pricing model.
///
/// Each line is rounded to the cent after its multiplication. The service fee
/// is charged on the subtotal only, never on the tip.
pub fn compute_breakdown(
    request: &PricingRequest,
    config: &PricingConfig,
) -> Result<FeeBreakdown, PricingError> {
    validate_request(request)?;

    let tier = classify_size(request.item_value, config);
    let extra_items = Decimal::from(request.number_of_items - 1);

    let base_price = cents(config.base_price);
    let size_upcharge = cents(size_upcharge(tier, config));
    let multi_item_fee = cents(config.multi_item_fee * extra_items);
    let small_order_fee = if request.item_value < config.small_order_threshold {
        cents(config.small_order_fee)
    } else {
        Decimal::ZERO
    };
    let distance_fee = cents(config.distance_rate_per_mile * request.route.distance_miles);
    let time_fee = cents(config.time_rate_per_minute * request.route.estimated_minutes);
    let rush_fee = if request.is_rush {
        cents(config.rush_fee)
    } else {
        Decimal::ZERO
    };

    let subtotal = base_price
        + size_upcharge
        + multi_item_fee
        + small_order_fee
        + distance_fee
        + time_fee
        + rush_fee;
    let service_fee = cents(subtotal * config.service_fee_rate);
    let tip = request.tip;
    let total_price = subtotal + service_fee + tip;

    Ok(FeeBreakdown {
        base_price,
        size_upcharge,
        multi_item_fee,
        small_order_fee,
        distance_fee,
        time_fee,
        rush_fee,
        subtotal,
        service_fee,
        tip,
        total_price,
    })
}

/// Allocate every fee line to the driver, the company, or both.
///
/// Driver pay on split lines is rounded first and the company keeps the rest
/// of the line, so each line is divided without losing a cent.
pub fn split_revenue(
    breakdown: &FeeBreakdown,
    route: &RouteInfo,
    config: &PricingConfig,
) -> (DriverEarnings, RevenueSplit) {
    let split = &config.split;

    let driver_base_pay = cents(breakdown.base_price * split.driver_base_share);
    let driver_distance_pay = cents(route.distance_miles * split.driver_rate_per_mile);
    let driver_time_pay = cents(route.estimated_minutes * split.driver_hourly_rate / dec!(60));
    let driver_size_bonus = breakdown.size_upcharge;
    let driver_tip = breakdown.tip;

    let earnings = DriverEarnings {
        driver_base_pay,
        driver_distance_pay,
        driver_time_pay,
        driver_size_bonus,
        driver_tip,
        driver_total_earning: driver_base_pay
            + driver_distance_pay
            + driver_time_pay
            + driver_size_bonus
            + driver_tip,
    };

    let company_service_fee = breakdown.service_fee;
    let company_base_fee_share = breakdown.base_price - driver_base_pay;
    let company_distance_fee_share = breakdown.distance_fee - driver_distance_pay;
    let company_time_fee_share = breakdown.time_fee - driver_time_pay;

    let revenue = RevenueSplit {
        company_service_fee,
        company_base_fee_share,
        company_distance_fee_share,
        company_time_fee_share,
        company_multi_item_fee: breakdown.multi_item_fee,
        company_small_order_fee: breakdown.small_order_fee,
        company_rush_fee: breakdown.rush_fee,
        company_total_revenue: company_service_fee
            + company_base_fee_share
            + company_distance_fee_share
            + company_time_fee_share
            + breakdown.multi_item_fee
            + breakdown.small_order_fee
            + breakdown.rush_fee,
    };

    (earnings, revenue)
}

/// Check that driver earnings plus company revenue add up to the total price.
pub fn verify_reconciliation(
    breakdown: &FeeBreakdown,
    earnings: &DriverEarnings,
    split: &RevenueSplit,
) -> Result<(), PricingError> {
    let allocated = earnings.driver_total_earning + split.company_total_revenue;
    if (allocated - breakdown.total_price).abs() > RECONCILIATION_TOLERANCE {
        return Err(PricingError::ReconciliationMismatch {
            total_price: breakdown.total_price,
            driver_total: earnings.driver_total_earning,
            company_total: split.company_total_revenue,
        });
    }
    Ok(())
}

/// Tax due on the total price; zero for donation-exempt orders.
pub fn tax_amount(total_price: Decimal, tax: &TaxContext) -> Decimal {
    if tax.is_donation_exempt {
        Decimal::ZERO
    } else {
        cents(total_price * tax.rate)
    }
}

/// Build the receipt view from a priced order and its tax context.
pub fn assemble(
    request: &PricingRequest,
    priced: &PricedOrder,
    tax: &TaxContext,
    pricing_model: PricingModel,
    config_version: &str,
) -> PaymentBreakdownView {
    let tax_amount = tax_amount(priced.fees.total_price, tax);
    let grand_total = priced.fees.total_price + tax_amount;

    PaymentBreakdownView {
        pricing_model,
        config_version: config_version.to_string(),
        item_value: request.item_value,
        number_of_items: request.number_of_items,
        size_tier: priced.size_tier,
        route: request.route,
        fees: priced.fees.clone(),
        driver: priced.driver.clone(),
        company: priced.company.clone(),
        tax: TaxLine {
            jurisdiction_name: tax.jurisdiction_name.clone(),
            rate: tax.rate,
            is_donation_exempt: tax.is_donation_exempt,
            tax_amount,
        },
        grand_total,
        customer_net_cost: grand_total - request.item_value,
    }
}
