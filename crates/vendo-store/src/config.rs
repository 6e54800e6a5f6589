//! # Store Configuration
//!
//! Runtime parameters consumed by the checkout engine.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`VENDO_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after [`Storefront`](crate::Storefront)
//! construction, so no lock is needed.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use vendo_core::validation::validate_percent_bps;
use vendo_core::{Percent, ValidationError};

/// Parameters for the discount-code cadence and lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Every N-th completed order mints a new discount code.
    /// Default: 3
    pub discount_order_frequency: u64,

    /// Rate carried by generated codes.
    /// Default: 10%
    pub discount_percent: Percent,

    /// Days until a freshly minted code expires.
    /// Default: 30
    pub code_expiry_days: i64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            discount_order_frequency: 3,
            discount_percent: Percent::from_bps(1000), // 10%
            code_expiry_days: 30,
        }
    }
}

impl StoreConfig {
    /// Creates a StoreConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `VENDO_DISCOUNT_FREQUENCY`: orders between auto-generated codes
    /// - `VENDO_DISCOUNT_PERCENT`: rate as a percentage (e.g. "10.0")
    /// - `VENDO_CODE_EXPIRY_DAYS`: code lifetime in days
    ///
    /// Unparseable values fall back to the defaults; range violations are
    /// caught by [`StoreConfig::validate`] at `Storefront` construction.
    pub fn from_env() -> Self {
        let mut config = StoreConfig::default();

        if let Ok(freq) = std::env::var("VENDO_DISCOUNT_FREQUENCY") {
            if let Ok(freq) = freq.parse::<u64>() {
                config.discount_order_frequency = freq;
            }
        }

        if let Ok(pct) = std::env::var("VENDO_DISCOUNT_PERCENT") {
            if let Ok(pct) = pct.parse::<f64>() {
                config.discount_percent = Percent::from_percentage(pct);
            }
        }

        if let Ok(days) = std::env::var("VENDO_CODE_EXPIRY_DAYS") {
            if let Ok(days) = days.parse::<i64>() {
                config.code_expiry_days = days;
            }
        }

        config
    }

    /// Checks the parameter ranges.
    ///
    /// ## Rules
    /// - `discount_order_frequency` must be positive (it is a modulus)
    /// - `discount_percent` must be between 0% and 100%
    /// - `code_expiry_days` must be positive
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.discount_order_frequency == 0 {
            return Err(ValidationError::MustBePositive {
                field: "discount_order_frequency".to_string(),
            });
        }

        validate_percent_bps(self.discount_percent.bps())?;

        if self.code_expiry_days <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "code_expiry_days".to_string(),
            });
        }

        Ok(())
    }

    /// Expiry window for freshly minted codes.
    pub fn code_ttl(&self) -> Duration {
        Duration::days(self.code_expiry_days)
    }
}
