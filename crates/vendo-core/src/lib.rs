//! # vendo-core: Pure Business Logic for Vendo
//!
//! This crate is the heart of the order-processing core. It contains the
//! domain model as pure types and functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 Routing layer (external)                     │
//! │        maps HTTP verbs/paths onto Storefront calls           │
//! └─────────────────────────────┬────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────▼────────────────────────────────┐
//! │                   vendo-store (engine)                       │
//! │     CartStore · DiscountRegistry · OrderLedger · Storefront  │
//! └─────────────────────────────┬────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────▼────────────────────────────────┐
//! │              ★ vendo-core (THIS CRATE) ★                     │
//! │                                                              │
//! │   ┌──────────┐  ┌──────────┐  ┌──────────┐  ┌────────────┐  │
//! │   │  money   │  │  types   │  │  error   │  │ validation │  │
//! │   │  Money   │  │  Cart    │  │CoreError │  │   rules    │  │
//! │   │  Percent │  │  Order   │  │          │  │            │  │
//! │   └──────────┘  └──────────┘  └──────────┘  └────────────┘  │
//! │                                                              │
//! │   NO I/O • NO LOCKS • PURE FUNCTIONS                         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure logic**: no I/O, no shared state; time-dependent *decisions*
//!    ([`DiscountCode::is_valid`]) take `now` as an argument
//! 2. **Integer money**: all monetary values are cents (i64), percentages
//!    are basis points (u32) - no floating point
//! 3. **Explicit errors**: all errors are typed, never strings or panics
//! 4. **Validated construction**: a [`LineItem`] can only be built through
//!    its validating factory, so downstream code never re-checks shape

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percent};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single cart.
///
/// Prevents runaway carts and keeps checkout critical sections bounded.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum consolidated quantity of a single line item.
///
/// Adding to an existing item may not push its quantity past this.
pub const MAX_ITEM_QUANTITY: i64 = 999;
