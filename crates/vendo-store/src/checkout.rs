//! # Checkout Orchestrator
//!
//! The [`Storefront`] facade: one owned object holding the configuration
//! and the three state components, exposing the whole call surface the
//! (external) routing layer maps onto.
//!
//! ## Atomicity
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  checkout(user, code?)     [entire body under the user's     │
//! │                             cart lock]                       │
//! │                                                              │
//! │  fallible, read-only            infallible writes            │
//! │  ──────────────────────    │    ─────────────────────────    │
//! │  1. empty-cart check       │    4. ledger.record + count     │
//! │  2. redeem code (atomic) ──┼──► 5. cart.clear                │
//! │  3. compute discount       │    6. cadence? mint new code    │
//! │                                                              │
//! │  A failure on the left leaves cart, registry, and ledger     │
//! │  untouched; the right side cannot fail.                      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Redeem (step 2) is the one fallible step that writes; it is atomic in
//! the registry, and nothing before it has mutated anything, so checkout
//! as a whole is all-or-nothing.

use tracing::{debug, info};
use vendo_core::validation::validate_user_id;
use vendo_core::{
    Cart, CoreError, CoreResult, DiscountCode, LineItem, Money, Order, StoreStats,
};

use crate::carts::CartStore;
use crate::config::StoreConfig;
use crate::discounts::DiscountRegistry;
use crate::ledger::OrderLedger;

/// The order-processing core. Construct one at process start, share it
/// (behind an `Arc`) with every request handler, drop it at shutdown.
#[derive(Debug)]
pub struct Storefront {
    config: StoreConfig,
    carts: CartStore,
    discounts: DiscountRegistry,
    ledger: OrderLedger,
}

impl Storefront {
    /// Builds a storefront from a validated configuration.
    pub fn new(config: StoreConfig) -> Result<Self, CoreError> {
        config.validate()?;

        Ok(Storefront {
            config,
            carts: CartStore::new(),
            discounts: DiscountRegistry::new(),
            ledger: OrderLedger::new(),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The cart store component.
    pub fn carts(&self) -> &CartStore {
        &self.carts
    }

    /// The discount code registry component.
    pub fn discounts(&self) -> &DiscountRegistry {
        &self.discounts
    }

    /// The order ledger component.
    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    // =========================================================================
    // Cart Operations
    // =========================================================================

    /// Adds an item to a user's cart, consolidating with an existing line.
    ///
    /// Field invariants are enforced by the [`LineItem`] factory; a
    /// violation surfaces as [`CoreError::Validation`] with nothing mutated.
    pub fn add_item(
        &self,
        user_id: &str,
        item_id: &str,
        name: &str,
        unit_price_cents: i64,
        quantity: i64,
    ) -> CoreResult<Cart> {
        validate_user_id(user_id)?;
        let item = LineItem::new(item_id, name, unit_price_cents, quantity)?;

        debug!(user_id = %user_id, item_id = %item_id, quantity, "Adding item to cart");
        self.carts.add_item(user_id, item)
    }

    /// Returns a snapshot of a user's cart. An untouched user gets an
    /// empty cart, never an error.
    pub fn get_cart(&self, user_id: &str) -> Cart {
        self.carts.get(user_id)
    }

    /// Removes one line item from a user's cart.
    pub fn remove_item(&self, user_id: &str, item_id: &str) -> CoreResult<Cart> {
        validate_user_id(user_id)?;
        self.carts.remove_item(user_id, item_id)
    }

    /// Empties a user's cart outside of checkout.
    pub fn clear_cart(&self, user_id: &str) -> Cart {
        self.carts.clear(user_id)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Converts a user's cart into an immutable order, optionally redeeming
    /// a discount code, and mints a fresh code on the configured cadence.
    ///
    /// ## Concurrency
    /// The whole body runs under the user's cart lock: concurrent
    /// `add_item` calls for the same user wait, checkouts for different
    /// users proceed in parallel. The registry and ledger locks are taken
    /// briefly inside, each for one atomic step.
    pub fn checkout(&self, user_id: &str, discount_code: Option<&str>) -> CoreResult<Order> {
        validate_user_id(user_id)?;

        self.carts.with_cart_mut(user_id, |cart| {
            if cart.is_empty() {
                return Err(CoreError::EmptyCart);
            }

            // Validate-and-redeem is one atomic registry operation; any
            // failure aborts the checkout before a single write happened.
            let (code, discount) = match discount_code {
                Some(code) => {
                    let percent = self.discounts.redeem(code)?;
                    let discount = cart.subtotal().calculate_discount(percent);
                    (Some(code.to_string()), discount)
                }
                None => (None, Money::zero()),
            };

            // From here on every step is an infallible in-memory write.
            let items = cart.items.clone();
            let (order, order_count) = self.ledger.record(user_id, items, code, discount);
            cart.clear();

            if order_count % self.config.discount_order_frequency == 0 {
                let minted = self
                    .discounts
                    .generate(self.config.discount_percent, self.config.code_ttl());
                // Not returned to the customer: auto-generated codes are an
                // admin-visible artifact, discoverable via the listing.
                info!(code = %minted.code, order_count, "Reached discount cadence, new code minted");
            }

            info!(
                order_id = %order.id,
                user_id = %user_id,
                subtotal = %order.subtotal(),
                discount = %order.discount(),
                total = %order.total(),
                "Order placed"
            );

            Ok(order)
        })
    }

    // =========================================================================
    // Admin Operations
    // =========================================================================

    /// Mints a discount code on admin request, bypassing the order cadence.
    pub fn generate_discount_code(&self) -> DiscountCode {
        let code = self
            .discounts
            .generate(self.config.discount_percent, self.config.code_ttl());
        info!(code = %code.code, "Discount code generated by admin");
        code
    }

    /// All discount codes ever minted, oldest first.
    pub fn list_discount_codes(&self) -> Vec<DiscountCode> {
        self.discounts.list_all()
    }

    /// All orders, optionally filtered to one user.
    pub fn list_orders(&self, user_id: Option<&str>) -> Vec<Order> {
        self.ledger.list(user_id)
    }

    /// Looks up one order by id.
    pub fn get_order(&self, order_id: &str) -> Option<Order> {
        self.ledger.get(order_id)
    }

    /// Point-in-time aggregate over the ledger and the code registry.
    pub fn stats(&self) -> StoreStats {
        let totals = self.ledger.totals();
        let average_order_cents = if totals.total_orders > 0 {
            totals.total_revenue_cents / totals.total_orders as i64
        } else {
            0
        };

        StoreStats {
            total_orders: totals.total_orders,
            total_items_purchased: totals.total_items_purchased,
            total_revenue_cents: totals.total_revenue_cents,
            total_discount_cents: totals.total_discount_cents,
            average_order_cents,
            total_codes: self.discounts.len(),
            used_codes: self.discounts.count_used(),
            active_codes: self.discounts.count_active(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storefront() -> Storefront {
        Storefront::new(StoreConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = StoreConfig {
            discount_order_frequency: 0,
            ..StoreConfig::default()
        };
        assert!(Storefront::new(config).is_err());
    }

    #[test]
    fn test_add_item_rejects_bad_input() {
        let store = storefront();

        let err = store.add_item("user1", "", "Widget", 999, 1).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        let err = store.add_item("", "item1", "Widget", 999, 1).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));

        // Nothing landed in the cart.
        assert!(store.get_cart("user1").is_empty());
    }

    #[test]
    fn test_checkout_empty_cart_fails() {
        let store = storefront();
        let err = store.checkout("user1", None).unwrap_err();
        assert!(matches!(err, CoreError::EmptyCart));
        assert_eq!(store.ledger().count(), 0);
    }

    #[test]
    fn test_checkout_clears_cart_and_records_order() {
        let store = storefront();
        store.add_item("user1", "item1", "Widget", 99999, 1).unwrap();

        let order = store.checkout("user1", None).unwrap();

        assert_eq!(order.subtotal_cents, 99999);
        assert_eq!(order.discount_cents, 0);
        assert_eq!(order.total_cents, 99999);
        assert!(store.get_cart("user1").is_empty());
        assert_eq!(store.ledger().count(), 1);
    }

    #[test]
    fn test_admin_generation_bypasses_cadence() {
        let store = storefront();
        // No orders at all - the cadence would never fire here.
        let code = store.generate_discount_code();
        assert_eq!(store.list_discount_codes().len(), 1);
        assert_eq!(store.list_discount_codes()[0].code, code.code);
    }
}
