//! # Error Types
//!
//! Domain-specific error types for vendo-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Error Types                           │
//! │                                                              │
//! │  vendo-core errors (this file)                               │
//! │  ├── CoreError        - Business rule violations             │
//! │  └── ValidationError  - Input validation failures            │
//! │                                                              │
//! │  Flow: ValidationError → CoreError → routing layer → client  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (code, item id, etc.)
//! 3. Errors are enum variants, never String
//! 4. Every variant is recoverable and caller-facing - the core never
//!    panics on a business-rule violation

use chrono::{DateTime, Utc};
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Each variant maps deterministically to a stable status and message in the
/// (external) routing layer.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// Checkout was attempted on a cart with no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// The supplied discount code does not exist in the registry.
    #[error("Discount code not found: {0}")]
    CodeNotFound(String),

    /// The discount code exists but its expiry window has passed.
    #[error("Discount code {code} expired at {expired_at}")]
    CodeExpired {
        code: String,
        expired_at: DateTime<Utc>,
    },

    /// The discount code was already redeemed.
    ///
    /// This is the single-use guarantee surfacing: of two concurrent
    /// checkouts racing on the same code, the loser sees this variant.
    #[error("Discount code already used: {0}")]
    CodeAlreadyUsed(String),

    /// The supplied code is malformed (empty, illegal characters).
    #[error("Invalid discount code: {reason}")]
    InvalidCode { reason: String },

    /// An item id was referenced that is not present in the cart.
    #[error("Item not in cart: {0}")]
    ItemNotInCart(String),

    /// Cart has reached its maximum number of distinct line items.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Consolidated quantity would exceed the per-item maximum.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the validating factories and validators before business logic
/// runs.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (illegal characters, bad shape).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
