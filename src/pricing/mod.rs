//! Pricing engine module for package-return pickups.
//!
//! Turns an order's item value, item count, route and rush/tip flags into an
//! itemized customer charge, and splits that charge into a driver-earnings
//! ledger and a company-revenue ledger that reconcile to the cent.

pub mod calculators;
pub mod config;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;
pub mod strategies;

// Re-export commonly used items
pub use self::calculators::{
    assemble, classify_size, compute_breakdown, round_money, split_revenue, verify_reconciliation,
};
pub use self::config::{PricingConfig, SettingsError};
pub use self::models::{
    DriverEarnings, FeeBreakdown, PaymentBreakdownView, PricingModel, PricingRequest,
    RevenueSplit, RouteInfo, ServiceTier, SizeTier, TaxContext,
};
pub use self::routes::router;
pub use self::services::{quote, PricingError};
pub use self::strategies::{DynamicPricing, FlatTierPricing, PricingStrategy};
