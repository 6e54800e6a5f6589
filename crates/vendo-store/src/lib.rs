//! # vendo-store: Concurrent In-Memory State & Checkout Engine
//!
//! Owns the process-wide mutable state of the order-processing core and the
//! checkout state machine that drives it. The (external) routing layer holds
//! one [`Storefront`] and calls it from concurrent request handlers.
//!
//! ## Module Organization
//! ```text
//! vendo_store/
//! ├── lib.rs        ◄─── You are here (exports)
//! ├── config.rs     ◄─── StoreConfig (defaults + env overrides)
//! ├── carts.rs      ◄─── CartStore (per-user carts, per-user locks)
//! ├── discounts.rs  ◄─── DiscountRegistry (mint / validate / redeem)
//! ├── ledger.rs     ◄─── OrderLedger (append-only orders + counter)
//! ├── checkout.rs   ◄─── Storefront facade (checkout orchestration)
//! └── bin/demo.rs   ◄─── End-to-end driver for development
//! ```
//!
//! ## Checkout Flow
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  checkout(user, code?)        [holds user's cart lock]       │
//! │                                                              │
//! │  1. empty cart? ──────────────► EmptyCart (nothing mutated)  │
//! │  2. code? ── redeem (atomic) ─► error     (nothing mutated)  │
//! │  3. discount = subtotal × percent                            │
//! │  4. ledger.record ───────────► order + gapless count         │
//! │  5. cart.clear                                               │
//! │  6. count % frequency == 0 ──► registry.generate             │
//! │  7. return Order                                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//! Every fallible step precedes the first write, so checkout is
//! all-or-nothing.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod carts;
pub mod checkout;
pub mod config;
pub mod discounts;
pub mod ledger;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use carts::CartStore;
pub use checkout::Storefront;
pub use config::StoreConfig;
pub use discounts::DiscountRegistry;
pub use ledger::{LedgerTotals, OrderLedger};
