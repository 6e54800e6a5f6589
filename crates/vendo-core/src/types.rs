//! # Domain Types
//!
//! Core domain types for the order-processing engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Domain Types                           │
//! │                                                              │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐  │
//! │  │     Cart      │   │     Order     │   │ DiscountCode  │  │
//! │  │ ───────────── │   │ ───────────── │   │ ───────────── │  │
//! │  │ user_id       │   │ id (UUID)     │   │ code          │  │
//! │  │ items (Vec)   │──►│ items (frozen)│   │ percent (bps) │  │
//! │  │ mutable       │   │ immutable     │   │ single-use    │  │
//! │  └───────────────┘   └───────────────┘   └───────────────┘  │
//! │                                                              │
//! │  Cart is the only mutable record; checkout freezes it into  │
//! │  an Order and may burn a DiscountCode along the way.         │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::money::{Money, Percent};
use crate::validation::{
    validate_item_id, validate_item_name, validate_price_cents, validate_quantity,
};
use crate::{ValidationError, MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Line Item
// =============================================================================

/// A line item in a cart (and, snapshotted, in an order).
///
/// Construction goes through [`LineItem::new`], which enforces the field
/// invariants, so a `LineItem` in hand is always well-formed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Business identifier of the item.
    pub item_id: String,

    /// Display name at time of adding (frozen).
    pub name: String,

    /// Unit price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in the cart.
    pub quantity: i64,

    /// When this item was (first) added to the cart.
    pub added_at: DateTime<Utc>,
}

impl LineItem {
    /// Validating factory: the only way to build a `LineItem`.
    ///
    /// ## Rules
    /// - `item_id`: non-empty, at most 64 chars, `[A-Za-z0-9_-]`
    /// - `name`: non-empty, at most 200 chars
    /// - `unit_price_cents`: non-negative (zero = free item)
    /// - `quantity`: positive, at most [`MAX_ITEM_QUANTITY`]
    pub fn new(
        item_id: impl Into<String>,
        name: impl Into<String>,
        unit_price_cents: i64,
        quantity: i64,
    ) -> Result<Self, ValidationError> {
        let item_id = item_id.into();
        let name = name.into();

        validate_item_id(&item_id)?;
        validate_item_name(&name)?;
        validate_price_cents(unit_price_cents)?;
        validate_quantity(quantity)?;

        Ok(LineItem {
            item_id,
            name,
            unit_price_cents,
            quantity,
            added_at: Utc::now(),
        })
    }

    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line subtotal in cents (unit price × quantity).
    #[inline]
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents())
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A user's shopping cart.
///
/// ## Invariants
/// - Items are unique by `item_id`; adding the same item again adds to its
///   quantity, and the latest add's unit price wins
/// - Insertion order of distinct items is preserved
/// - At most [`MAX_CART_ITEMS`] distinct items, at most
///   [`MAX_ITEM_QUANTITY`] of any one item
/// - `updated_at` moves on every mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Owner of this cart.
    pub user_id: String,

    /// Line items, in insertion order.
    pub items: Vec<LineItem>,

    /// When the cart was created.
    pub created_at: DateTime<Utc>,

    /// When the cart was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Cart {
            user_id: user_id.into(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a line item, consolidating with an existing entry.
    ///
    /// ## Behavior
    /// - Item already present: quantity increases by the new quantity and
    ///   the unit price is refreshed from the new add
    /// - Item not present: appended, preserving insertion order
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CoreError> {
        if let Some(existing) = self.items.iter_mut().find(|i| i.item_id == item.item_id) {
            let new_qty = existing.quantity + item.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            existing.unit_price_cents = item.unit_price_cents;
            existing.name = item.name;
        } else {
            if self.items.len() >= MAX_CART_ITEMS {
                return Err(CoreError::CartTooLarge {
                    max: MAX_CART_ITEMS,
                });
            }
            self.items.push(item);
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Finds a line item by item id.
    pub fn find_item(&self, item_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    /// Removes a line item by item id.
    pub fn remove_item(&mut self, item_id: &str) -> Result<(), CoreError> {
        let initial_len = self.items.len();
        self.items.retain(|i| i.item_id != item_id);

        if self.items.len() == initial_len {
            return Err(CoreError::ItemNotInCart(item_id.to_string()));
        }

        self.updated_at = Utc::now();
        Ok(())
    }

    /// Clears all items from the cart.
    pub fn clear(&mut self) {
        self.items.clear();
        self.updated_at = Utc::now();
    }

    /// Number of distinct line items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Total quantity across all line items.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Cart subtotal in cents (sum of line subtotals).
    pub fn subtotal_cents(&self) -> i64 {
        self.items.iter().map(|i| i.subtotal_cents()).sum()
    }

    /// Cart subtotal as Money.
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents())
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Order
// =============================================================================

/// A completed order.
///
/// Orders are immutable once recorded: the ledger appends them and nothing
/// ever mutates or deletes one. Items are a frozen snapshot of the cart at
/// checkout time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// User the order belongs to.
    pub user_id: String,

    /// Snapshot of the cart's line items at checkout.
    pub items: Vec<LineItem>,

    /// Sum of line subtotals in cents.
    pub subtotal_cents: i64,

    /// Discount code redeemed for this order, if any.
    pub discount_code: Option<String>,

    /// Discount amount in cents (0 without a code).
    pub discount_cents: i64,

    /// `subtotal_cents - discount_cents`.
    pub total_cents: i64,

    /// When the order was recorded.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Returns the subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    /// Returns the discount amount as Money.
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    /// Returns the charged total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Total quantity of items purchased in this order.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

// =============================================================================
// Discount Code
// =============================================================================

/// A single-use, time-limited discount code.
///
/// ## Lifecycle
/// ```text
/// generate ──► valid ──► redeemed (is_used, used_at set once)
///                │
///                └─────► expired (expires_at passed, never redeemed)
/// ```
/// Codes are never deleted; spent and expired codes stay in the registry
/// for audit and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountCode {
    /// Unique code string handed to customers.
    pub code: String,

    /// Discount rate applied to the order subtotal.
    pub percent: Percent,

    /// One-way flag: false → true at redemption, never back.
    pub is_used: bool,

    /// When the code was minted.
    pub created_at: DateTime<Utc>,

    /// When the code was redeemed (set exactly once).
    pub used_at: Option<DateTime<Utc>>,

    /// Fixed at creation: `created_at + ttl`.
    pub expires_at: DateTime<Utc>,
}

impl DiscountCode {
    /// Mints a new unused code expiring `ttl` from now.
    ///
    /// A non-positive `ttl` produces an already-expired code; the registry
    /// only mints with positive windows, tests use this for expiry cases.
    pub fn new(code: impl Into<String>, percent: Percent, ttl: Duration) -> Self {
        let created_at = Utc::now();
        DiscountCode {
            code: code.into(),
            percent,
            is_used: false,
            created_at,
            used_at: None,
            expires_at: created_at + ttl,
        }
    }

    /// Whether the expiry window has passed at `now`.
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the code can still be redeemed at `now`.
    #[inline]
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && !self.is_expired(now)
    }

    /// Marks the code as spent.
    ///
    /// Callers check [`DiscountCode::is_valid`] first; the registry does
    /// both under one lock so the pair is atomic.
    pub fn mark_used(&mut self, now: DateTime<Utc>) {
        self.is_used = true;
        self.used_at = Some(now);
    }
}

// =============================================================================
// Store Statistics
// =============================================================================

/// Point-in-time aggregate over the ledger and the code registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStats {
    /// Orders recorded since process start.
    pub total_orders: u64,

    /// Total quantity of items across all orders.
    pub total_items_purchased: i64,

    /// Sum of charged order totals, in cents.
    pub total_revenue_cents: i64,

    /// Sum of discounts given, in cents.
    pub total_discount_cents: i64,

    /// `total_revenue_cents / total_orders` (0 with no orders).
    pub average_order_cents: i64,

    /// All codes ever minted.
    pub total_codes: usize,

    /// Codes that have been redeemed.
    pub used_codes: usize,

    /// Codes still unused and unexpired.
    pub active_codes: usize,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price_cents: i64, qty: i64) -> LineItem {
        LineItem::new(id, format!("Item {}", id), price_cents, qty).unwrap()
    }

    #[test]
    fn test_line_item_factory_validates() {
        assert!(LineItem::new("item1", "Widget", 999, 1).is_ok());
        assert!(LineItem::new("", "Widget", 999, 1).is_err());
        assert!(LineItem::new("item1", "", 999, 1).is_err());
        assert!(LineItem::new("item1", "Widget", -1, 1).is_err());
        assert!(LineItem::new("item1", "Widget", 999, 0).is_err());
    }

    #[test]
    fn test_line_item_subtotal() {
        let i = item("1", 2999, 2);
        assert_eq!(i.subtotal_cents(), 5998);
        assert_eq!(i.unit_price().cents(), 2999);
    }

    #[test]
    fn test_cart_add_item() {
        let mut cart = Cart::new("user1");
        cart.add_item(item("1", 999, 2)).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal_cents(), 1998);
    }

    #[test]
    fn test_cart_consolidates_same_item() {
        let mut cart = Cart::new("user1");
        cart.add_item(item("1", 999, 2)).unwrap();
        cart.add_item(item("1", 999, 3)).unwrap();

        assert_eq!(cart.item_count(), 1); // still one line entry
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_cart_latest_price_wins_on_consolidation() {
        let mut cart = Cart::new("user1");
        cart.add_item(item("1", 1000, 1)).unwrap();
        cart.add_item(item("1", 1200, 1)).unwrap();

        let line = cart.find_item("1").unwrap();
        assert_eq!(line.unit_price_cents, 1200);
        assert_eq!(cart.subtotal_cents(), 2400);
    }

    #[test]
    fn test_cart_preserves_insertion_order() {
        let mut cart = Cart::new("user1");
        cart.add_item(item("b", 100, 1)).unwrap();
        cart.add_item(item("a", 100, 1)).unwrap();
        cart.add_item(item("b", 100, 1)).unwrap();

        let ids: Vec<&str> = cart.items.iter().map(|i| i.item_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_cart_quantity_cap() {
        let mut cart = Cart::new("user1");
        cart.add_item(item("1", 100, 998)).unwrap();
        cart.add_item(item("1", 100, 1)).unwrap();

        let err = cart.add_item(item("1", 100, 1)).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
        assert_eq!(cart.total_quantity(), 999);
    }

    #[test]
    fn test_cart_item_cap() {
        let mut cart = Cart::new("user1");
        for n in 0..MAX_CART_ITEMS {
            cart.add_item(item(&format!("i{}", n), 100, 1)).unwrap();
        }

        let err = cart.add_item(item("overflow", 100, 1)).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));
    }

    #[test]
    fn test_cart_remove_item() {
        let mut cart = Cart::new("user1");
        cart.add_item(item("1", 999, 2)).unwrap();

        cart.remove_item("1").unwrap();
        assert!(cart.is_empty());

        let err = cart.remove_item("1").unwrap_err();
        assert!(matches!(err, CoreError::ItemNotInCart(_)));
    }

    #[test]
    fn test_cart_clear() {
        let mut cart = Cart::new("user1");
        cart.add_item(item("1", 999, 2)).unwrap();
        assert!(!cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal_cents(), 0);
    }

    #[test]
    fn test_discount_code_lifecycle() {
        let now = Utc::now();
        let mut code = DiscountCode::new("SAVE-TEST12345678", Percent::from_bps(1000), Duration::days(30));

        assert!(code.is_valid(now));
        assert!(!code.is_expired(now));
        assert!(code.used_at.is_none());

        code.mark_used(now);
        assert!(code.is_used);
        assert!(!code.is_valid(now));
        assert_eq!(code.used_at, Some(now));
    }

    #[test]
    fn test_discount_code_expiry() {
        let now = Utc::now();
        let code = DiscountCode::new("SAVE-TEST12345678", Percent::from_bps(1000), Duration::seconds(-1));

        assert!(code.is_expired(now));
        assert!(!code.is_valid(now));
        assert!(!code.is_used); // expired, but never redeemed
    }

    #[test]
    fn test_cart_serializes_for_responses() {
        let mut cart = Cart::new("user1");
        cart.add_item(item("1", 2999, 2)).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["user_id"], "user1");
        assert_eq!(json["items"][0]["quantity"], 2);
    }

    #[test]
    fn test_order_money_helpers() {
        let order = Order {
            id: "o1".to_string(),
            user_id: "user1".to_string(),
            items: vec![item("1", 99999, 1)],
            subtotal_cents: 99999,
            discount_code: None,
            discount_cents: 0,
            total_cents: 99999,
            created_at: Utc::now(),
        };

        assert_eq!(order.subtotal().cents(), 99999);
        assert!(order.discount().is_zero());
        assert_eq!(order.total(), order.subtotal() - order.discount());
        assert_eq!(order.total_quantity(), 1);
    }
}
