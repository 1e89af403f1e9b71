//! Pricing rule set.
//!
//! Fee constants, split ratios, tier boundaries and flat-tier amounts. Loaded
//! once at startup and shared read-only; every engine function takes it by
//! reference so two quotes can never observe different rule snapshots.

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::calculators::round_money;
use super::models::ServiceTier;

/// Ceiling for every configured amount and rate.
pub const MAX_RULE_VALUE: Decimal = dec!(1000000);

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("Invalid pricing configuration: {0}")]
    Invalid(String),
}

/// Item-value boundaries and handling surcharges per size tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeRules {
    /// Values strictly below this are `Small`.
    pub medium_from: Decimal,
    /// Values at or above this are `Large`.
    pub large_from: Decimal,
    pub small_upcharge: Decimal,
    pub medium_upcharge: Decimal,
    pub large_upcharge: Decimal,
}

impl Default for SizeRules {
    fn default() -> Self {
        Self {
            medium_from: dec!(25),
            large_from: dec!(150),
            small_upcharge: dec!(0),
            medium_upcharge: dec!(2.00),
            large_upcharge: dec!(5.00),
        }
    }
}

/// How fee lines are shared with the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitRules {
    /// Fraction of the base price paid to the driver.
    pub driver_base_share: Decimal,
    pub driver_rate_per_mile: Decimal,
    pub driver_hourly_rate: Decimal,
}

impl Default for SplitRules {
    fn default() -> Self {
        Self {
            driver_base_share: dec!(0.70),
            driver_rate_per_mile: dec!(0.35),
            driver_hourly_rate: dec!(8),
        }
    }
}

/// Customer charge and driver payout for one flat service tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatTierAmounts {
    pub customer_amount: Decimal,
    pub driver_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlatTierRules {
    pub standard: FlatTierAmounts,
    pub priority: FlatTierAmounts,
    pub instant: FlatTierAmounts,
}

impl FlatTierRules {
    pub fn amounts(&self, tier: ServiceTier) -> &FlatTierAmounts {
        match tier {
            ServiceTier::Standard => &self.standard,
            ServiceTier::Priority => &self.priority,
            ServiceTier::Instant => &self.instant,
        }
    }
}

impl Default for FlatTierRules {
    fn default() -> Self {
        Self {
            standard: FlatTierAmounts {
                customer_amount: dec!(9.99),
                driver_amount: dec!(6.00),
            },
            priority: FlatTierAmounts {
                customer_amount: dec!(14.99),
                driver_amount: dec!(9.00),
            },
            instant: FlatTierAmounts {
                customer_amount: dec!(19.99),
                driver_amount: dec!(12.00),
            },
        }
    }
}

/// Complete, immutable pricing rule set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Label reported on every quote so ledgers can be traced to a rule set.
    pub version: String,
    pub base_price: Decimal,
    pub size: SizeRules,
    pub multi_item_fee: Decimal,
    /// Orders with item value strictly below this pay the small-order fee.
    pub small_order_threshold: Decimal,
    pub small_order_fee: Decimal,
    pub distance_rate_per_mile: Decimal,
    pub time_rate_per_minute: Decimal,
    pub rush_fee: Decimal,
    pub service_fee_rate: Decimal,
    pub split: SplitRules,
    pub flat_tiers: FlatTierRules,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            version: "default".to_string(),
            base_price: dec!(3.99),
            size: SizeRules::default(),
            multi_item_fee: dec!(1.50),
            small_order_threshold: dec!(15),
            small_order_fee: dec!(2.00),
            distance_rate_per_mile: dec!(0.50),
            time_rate_per_minute: dec!(0.15),
            rush_fee: dec!(4.00),
            service_fee_rate: dec!(0.15),
            split: SplitRules::default(),
            flat_tiers: FlatTierRules::default(),
        }
    }
}

impl PricingConfig {
    /// Load the rule set from an optional TOML file plus `PRICING__*`
    /// environment overrides (e.g. `PRICING__SPLIT__DRIVER_HOURLY_RATE`).
    /// Fields missing from both fall back to the defaults.
    pub fn load(path: Option<&str>) -> Result<Self, SettingsError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path).required(true));
        }
        let builder = builder.add_source(Environment::with_prefix("PRICING").separator("__"));

        let config = Self::build(builder)?;
        info!(
            "Loaded pricing config version '{}' (source: {})",
            config.version,
            path.unwrap_or("defaults")
        );
        Ok(config)
    }

    /// Parse a rule set from TOML text, with defaults for missing fields.
    pub fn from_toml_str(toml: &str) -> Result<Self, SettingsError> {
        Self::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let config = builder.build()?.try_deserialize::<PricingConfig>()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject rule sets that would produce negative company shares, a
    /// non-monotonic size classification or sub-cent flat charges.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let bounded = [
            ("base_price", self.base_price),
            ("size.small_upcharge", self.size.small_upcharge),
            ("size.medium_upcharge", self.size.medium_upcharge),
            ("size.large_upcharge", self.size.large_upcharge),
            ("size.medium_from", self.size.medium_from),
            ("multi_item_fee", self.multi_item_fee),
            ("small_order_threshold", self.small_order_threshold),
            ("small_order_fee", self.small_order_fee),
            ("distance_rate_per_mile", self.distance_rate_per_mile),
            ("time_rate_per_minute", self.time_rate_per_minute),
            ("rush_fee", self.rush_fee),
            ("service_fee_rate", self.service_fee_rate),
            ("split.driver_base_share", self.split.driver_base_share),
            ("split.driver_rate_per_mile", self.split.driver_rate_per_mile),
            ("split.driver_hourly_rate", self.split.driver_hourly_rate),
        ];
        for (name, value) in bounded {
            if value < Decimal::ZERO {
                return Err(SettingsError::Invalid(format!(
                    "{} must not be negative (got {})",
                    name, value
                )));
            }
            if value > MAX_RULE_VALUE {
                return Err(SettingsError::Invalid(format!(
                    "{} must be at most {} (got {})",
                    name, MAX_RULE_VALUE, value
                )));
            }
        }

        if self.size.medium_from >= self.size.large_from {
            return Err(SettingsError::Invalid(format!(
                "size.medium_from ({}) must be below size.large_from ({})",
                self.size.medium_from, self.size.large_from
            )));
        }

        if self.split.driver_base_share > Decimal::ONE {
            return Err(SettingsError::Invalid(format!(
                "split.driver_base_share must be at most 1 (got {})",
                self.split.driver_base_share
            )));
        }

        if self.split.driver_rate_per_mile > self.distance_rate_per_mile {
            return Err(SettingsError::Invalid(format!(
                "split.driver_rate_per_mile ({}) exceeds distance_rate_per_mile ({})",
                self.split.driver_rate_per_mile, self.distance_rate_per_mile
            )));
        }

        if self.split.driver_hourly_rate > self.time_rate_per_minute * dec!(60) {
            return Err(SettingsError::Invalid(format!(
                "split.driver_hourly_rate ({}) exceeds the customer time rate ({} per hour)",
                self.split.driver_hourly_rate,
                self.time_rate_per_minute * dec!(60)
            )));
        }

        for tier in [ServiceTier::Standard, ServiceTier::Priority, ServiceTier::Instant] {
            let amounts = self.flat_tiers.amounts(tier);
            if amounts.driver_amount < Decimal::ZERO {
                return Err(SettingsError::Invalid(format!(
                    "flat_tiers.{}.driver_amount must not be negative",
                    tier.as_str()
                )));
            }
            if amounts.customer_amount > MAX_RULE_VALUE {
                return Err(SettingsError::Invalid(format!(
                    "flat_tiers.{}.customer_amount must be at most {}",
                    tier.as_str(),
                    MAX_RULE_VALUE
                )));
            }
            for (field, amount) in [
                ("customer_amount", amounts.customer_amount),
                ("driver_amount", amounts.driver_amount),
            ] {
                if round_money(amount, 2) != amount {
                    return Err(SettingsError::Invalid(format!(
                        "flat_tiers.{}.{} must be whole cents (got {})",
                        tier.as_str(),
                        field,
                        amount
                    )));
                }
            }
            if amounts.driver_amount > amounts.customer_amount {
                return Err(SettingsError::Invalid(format!(
                    "flat_tiers.{}: driver_amount ({}) exceeds customer_amount ({})",
                    tier.as_str(),
                    amounts.driver_amount,
                    amounts.customer_amount
                )));
            }
        }

        Ok(())
    }
}
