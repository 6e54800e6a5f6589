//! # Discount Code Registry
//!
//! Mints, stores, validates, and redeems single-use discount codes.
//!
//! ## Single-Use Guarantee
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Two checkouts race on code SAVE-AB12CD34EF56:               │
//! │                                                              │
//! │  T1: redeem ──► lock ── valid? yes ── mark used ──► Ok(10%)  │
//! │  T2: redeem ──────────► lock ── valid? USED ──► AlreadyUsed  │
//! │                                                              │
//! │  Lookup, validity check, and mark-used share one lock, so    │
//! │  exactly one racer wins.                                     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Codes are never deleted; spent and expired codes remain for audit and
//! statistics.

use std::collections::HashMap;

use chrono::{Duration, Utc};
use parking_lot::Mutex;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::{debug, info};
use vendo_core::validation::validate_code;
use vendo_core::{CoreError, CoreResult, DiscountCode, Percent};

/// Prefix carried by every generated code.
pub const CODE_PREFIX: &str = "SAVE-";

/// Random characters after the prefix. 36^12 possible suffixes make
/// collisions negligible; generation still re-rolls on a hit.
pub const CODE_SUFFIX_LEN: usize = 12;

/// The process-wide pool of discount codes.
#[derive(Debug, Default)]
pub struct DiscountRegistry {
    codes: Mutex<HashMap<String, DiscountCode>>,
}

impl DiscountRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        DiscountRegistry {
            codes: Mutex::new(HashMap::new()),
        }
    }

    /// Mints a new unused code carrying `percent`, expiring `ttl` from now.
    ///
    /// The random identifier is re-rolled until unique; insertion happens
    /// under the same lock as the collision check.
    pub fn generate(&self, percent: Percent, ttl: Duration) -> DiscountCode {
        let mut codes = self.codes.lock();

        let code = loop {
            let candidate = mint_code();
            if !codes.contains_key(&candidate) {
                break candidate;
            }
        };

        let discount = DiscountCode::new(code, percent, ttl);
        codes.insert(discount.code.clone(), discount.clone());

        info!(code = %discount.code, percent = %discount.percent, expires_at = %discount.expires_at, "Discount code minted");
        discount
    }

    /// Pure lookup: checks that `code` could be redeemed right now.
    ///
    /// No mutation; two validations of the same code are independent.
    pub fn validate(&self, code: &str) -> CoreResult<DiscountCode> {
        check_shape(code)?;

        let codes = self.codes.lock();
        let discount = codes
            .get(code)
            .ok_or_else(|| CoreError::CodeNotFound(code.to_string()))?;

        check_redeemable(discount)?;
        Ok(discount.clone())
    }

    /// Atomically validates and burns a code, returning its rate.
    ///
    /// Lookup, validity check, and `mark_used` happen under one lock; this
    /// is the registry's single-use guarantee under concurrency.
    pub fn redeem(&self, code: &str) -> CoreResult<Percent> {
        check_shape(code)?;

        let mut codes = self.codes.lock();
        let discount = codes
            .get_mut(code)
            .ok_or_else(|| CoreError::CodeNotFound(code.to_string()))?;

        check_redeemable(discount)?;
        discount.mark_used(Utc::now());

        debug!(code = %code, "Discount code redeemed");
        Ok(discount.percent)
    }

    /// All codes ever minted, oldest first (for admin reporting).
    pub fn list_all(&self) -> Vec<DiscountCode> {
        let codes = self.codes.lock();
        let mut all: Vec<DiscountCode> = codes.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        all
    }

    /// Codes still unused and unexpired.
    pub fn count_active(&self) -> usize {
        let now = Utc::now();
        self.codes
            .lock()
            .values()
            .filter(|c| c.is_valid(now))
            .count()
    }

    /// Codes that have been redeemed.
    pub fn count_used(&self) -> usize {
        self.codes.lock().values().filter(|c| c.is_used).count()
    }

    /// Total codes ever minted.
    pub fn len(&self) -> usize {
        self.codes.lock().len()
    }

    /// True when no code was ever minted.
    pub fn is_empty(&self) -> bool {
        self.codes.lock().is_empty()
    }
}

/// Produces a candidate code: `SAVE-` + 12 uppercase alphanumerics.
fn mint_code() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CODE_SUFFIX_LEN)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect();
    format!("{}{}", CODE_PREFIX, suffix)
}

/// Maps a malformed code string to `InvalidCode` before any lookup.
fn check_shape(code: &str) -> CoreResult<()> {
    validate_code(code).map_err(|e| CoreError::InvalidCode {
        reason: e.to_string(),
    })?;
    Ok(())
}

/// Shared validity check for `validate` and `redeem`.
fn check_redeemable(discount: &DiscountCode) -> CoreResult<()> {
    if discount.is_used {
        return Err(CoreError::CodeAlreadyUsed(discount.code.clone()));
    }

    if discount.is_expired(Utc::now()) {
        return Err(CoreError::CodeExpired {
            code: discount.code.clone(),
            expired_at: discount.expires_at,
        });
    }

    Ok(())
}
