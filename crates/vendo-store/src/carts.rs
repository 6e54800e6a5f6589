//! # Cart Store
//!
//! Per-user carts behind fine-grained locks.
//!
//! ## Thread Safety
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       CartStore                              │
//! │                                                              │
//! │  RwLock<HashMap<user_id, Arc<Mutex<Cart>>>>                  │
//! │     │                        │                               │
//! │     │                        └── one mutex per user: all     │
//! │     │                            mutation of that user's     │
//! │     │                            cart is serialized          │
//! │     │                                                        │
//! │     └── map lock only guards get-or-create, so carts for     │
//! │         different users never contend with each other        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Get-or-create happens under the map's write lock, so a read-miss cannot
//! race a concurrent creation for the same user. The checkout orchestrator
//! uses [`CartStore::with_cart_mut`] to hold one user's mutex across its
//! whole read→record→clear sequence.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;
use vendo_core::{Cart, CoreResult, LineItem};

/// Owns every user's cart. Cart existence is implicit: the first access for
/// a user lazily creates an empty cart.
#[derive(Debug, Default)]
pub struct CartStore {
    carts: RwLock<HashMap<String, Arc<Mutex<Cart>>>>,
}

impl CartStore {
    /// Creates an empty cart store.
    pub fn new() -> Self {
        CartStore {
            carts: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the lock handle for a user's cart, creating the cart on
    /// first access.
    fn handle(&self, user_id: &str) -> Arc<Mutex<Cart>> {
        // Fast path: cart already exists, read lock only.
        if let Some(cart) = self.carts.read().get(user_id) {
            return Arc::clone(cart);
        }

        // Miss: take the write lock and get-or-create. `entry` re-checks
        // under the write lock, so two racing first-accesses end up sharing
        // one cart.
        let mut carts = self.carts.write();
        let cart = carts
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Cart::new(user_id))));
        Arc::clone(cart)
    }

    /// Executes a function with read access to a user's cart.
    pub fn with_cart<F, R>(&self, user_id: &str, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let handle = self.handle(user_id);
        let cart = handle.lock();
        f(&cart)
    }

    /// Executes a function while holding a user's cart lock exclusively.
    ///
    /// Everything the closure does is one critical section per user; this
    /// is the serialization point for add/remove/clear and for checkout's
    /// read-then-clear.
    pub fn with_cart_mut<F, R>(&self, user_id: &str, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let handle = self.handle(user_id);
        let mut cart = handle.lock();
        f(&mut cart)
    }

    /// Adds a line item to a user's cart, consolidating by item id.
    ///
    /// Returns a snapshot of the updated cart.
    pub fn add_item(&self, user_id: &str, item: LineItem) -> CoreResult<Cart> {
        self.with_cart_mut(user_id, |cart| {
            cart.add_item(item)?;
            debug!(user_id = %user_id, items = cart.item_count(), "Cart updated");
            Ok(cart.clone())
        })
    }

    /// Removes a line item from a user's cart.
    pub fn remove_item(&self, user_id: &str, item_id: &str) -> CoreResult<Cart> {
        self.with_cart_mut(user_id, |cart| {
            cart.remove_item(item_id)?;
            Ok(cart.clone())
        })
    }

    /// Returns a snapshot of a user's cart (empty for untouched users,
    /// never an error).
    pub fn get(&self, user_id: &str) -> Cart {
        self.with_cart(user_id, |cart| cart.clone())
    }

    /// Empties a user's cart and returns the now-empty snapshot.
    pub fn clear(&self, user_id: &str) -> Cart {
        self.with_cart_mut(user_id, |cart| {
            cart.clear();
            cart.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn line_item(id: &str, price_cents: i64, qty: i64) -> LineItem {
        LineItem::new(id, format!("Item {}", id), price_cents, qty).unwrap()
    }

    #[test]
    fn test_untouched_user_gets_empty_cart() {
        let store = CartStore::new();
        let cart = store.get("nobody");

        assert_eq!(cart.user_id, "nobody");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_then_get_sees_same_cart() {
        let store = CartStore::new();
        store.add_item("user1", line_item("1", 999, 2)).unwrap();

        let cart = store.get("user1");
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.subtotal_cents(), 1998);
    }

    #[test]
    fn test_carts_are_isolated_per_user() {
        let store = CartStore::new();
        store.add_item("alice", line_item("1", 100, 1)).unwrap();

        assert!(store.get("bob").is_empty());
        assert!(!store.get("alice").is_empty());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = CartStore::new();
        let snapshot = store.add_item("user1", line_item("1", 100, 1)).unwrap();

        store.clear("user1");
        assert_eq!(snapshot.item_count(), 1); // snapshot unaffected
        assert!(store.get("user1").is_empty());
    }

    #[test]
    fn test_concurrent_adds_do_not_lose_updates() {
        let store = Arc::new(CartStore::new());
        let threads: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for _ in 0..50 {
                        store.add_item("user1", line_item("1", 100, 1)).unwrap();
                    }
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        let cart = store.get("user1");
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 200);
    }

    #[test]
    fn test_concurrent_first_access_creates_one_cart() {
        let store = Arc::new(CartStore::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    store.add_item("fresh", line_item("1", 100, 1)).unwrap();
                })
            })
            .collect();

        for t in threads {
            t.join().unwrap();
        }

        // All eight adds landed in one cart, none on a lost duplicate.
        assert_eq!(store.get("fresh").total_quantity(), 8);
    }
}
