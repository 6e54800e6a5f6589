//! # Order Ledger
//!
//! Append-only order records plus the global order counter.
//!
//! ## Counter Discipline
//! Append and increment share one critical section, so under N concurrent
//! checkouts every completed order observes a distinct, gapless count -
//! the property the auto-generation cadence depends on.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use vendo_core::{LineItem, Money, Order};

/// Everything the ledger guards: orders are only ever pushed, the counter
/// only ever incremented.
#[derive(Debug, Default)]
struct LedgerInner {
    orders: Vec<Order>,
    counter: u64,
}

/// The process-wide order ledger.
#[derive(Debug, Default)]
pub struct OrderLedger {
    inner: Mutex<LedgerInner>,
}

/// Point-in-time aggregate over the ledger, read under one lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub total_orders: u64,
    pub total_items_purchased: i64,
    pub total_revenue_cents: i64,
    pub total_discount_cents: i64,
}

impl OrderLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        OrderLedger {
            inner: Mutex::new(LedgerInner::default()),
        }
    }

    /// Records an immutable order and returns it with the post-increment
    /// order count.
    ///
    /// The caller (the checkout orchestrator) uses the returned count to
    /// decide on discount auto-generation; because append and increment are
    /// one critical section, each checkout sees its own distinct count.
    pub fn record(
        &self,
        user_id: &str,
        items: Vec<LineItem>,
        discount_code: Option<String>,
        discount: Money,
    ) -> (Order, u64) {
        let subtotal: i64 = items.iter().map(|i| i.subtotal_cents()).sum();
        let subtotal = Money::from_cents(subtotal);
        let total = subtotal - discount;

        let order = Order {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            items,
            subtotal_cents: subtotal.cents(),
            discount_code,
            discount_cents: discount.cents(),
            total_cents: total.cents(),
            created_at: chrono::Utc::now(),
        };

        let count = {
            let mut inner = self.inner.lock();
            inner.orders.push(order.clone());
            inner.counter += 1;
            inner.counter
        };

        debug!(order_id = %order.id, user_id = %user_id, count, "Order recorded");
        (order, count)
    }

    /// All orders, optionally filtered to one user, in recording order.
    pub fn list(&self, user_id: Option<&str>) -> Vec<Order> {
        let inner = self.inner.lock();
        inner
            .orders
            .iter()
            .filter(|o| user_id.map_or(true, |u| o.user_id == u))
            .cloned()
            .collect()
    }

    /// Looks up one order by id.
    pub fn get(&self, order_id: &str) -> Option<Order> {
        let inner = self.inner.lock();
        inner.orders.iter().find(|o| o.id == order_id).cloned()
    }

    /// Current value of the global order counter.
    pub fn count(&self) -> u64 {
        self.inner.lock().counter
    }

    /// Aggregates the ledger in one pass under one lock.
    pub fn totals(&self) -> LedgerTotals {
        let inner = self.inner.lock();
        LedgerTotals {
            total_orders: inner.counter,
            total_items_purchased: inner.orders.iter().map(|o| o.total_quantity()).sum(),
            total_revenue_cents: inner.orders.iter().map(|o| o.total_cents).sum(),
            total_discount_cents: inner.orders.iter().map(|o| o.discount_cents).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    fn line_item(id: &str, price_cents: i64, qty: i64) -> LineItem {
        LineItem::new(id, format!("Item {}", id), price_cents, qty).unwrap()
    }

    #[test]
    fn test_record_computes_totals() {
        let ledger = OrderLedger::new();
        let (order, count) = ledger.record(
            "user1",
            vec![line_item("1", 10000, 2)],
            Some("SAVE-TEST12345678".to_string()),
            Money::from_cents(2000),
        );

        assert_eq!(count, 1);
        assert_eq!(order.subtotal_cents, 20000);
        assert_eq!(order.discount_cents, 2000);
        assert_eq!(order.total_cents, 18000);
        assert_eq!(order.discount_code.as_deref(), Some("SAVE-TEST12345678"));
    }

    #[test]
    fn test_order_ids_are_unique() {
        let ledger = OrderLedger::new();
        let mut ids = HashSet::new();
        for _ in 0..50 {
            let (order, _) = ledger.record("user1", vec![line_item("1", 100, 1)], None, Money::zero());
            ids.insert(order.id);
        }
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn test_list_filters_by_user() {
        let ledger = OrderLedger::new();
        ledger.record("alice", vec![line_item("1", 100, 1)], None, Money::zero());
        ledger.record("bob", vec![line_item("2", 200, 1)], None, Money::zero());
        ledger.record("alice", vec![line_item("3", 300, 1)], None, Money::zero());

        assert_eq!(ledger.list(None).len(), 3);
        assert_eq!(ledger.list(Some("alice")).len(), 2);
        assert_eq!(ledger.list(Some("carol")).len(), 0);
    }

    #[test]
    fn test_get_by_id() {
        let ledger = OrderLedger::new();
        let (order, _) = ledger.record("user1", vec![line_item("1", 100, 1)], None, Money::zero());

        assert!(ledger.get(&order.id).is_some());
        assert!(ledger.get("missing").is_none());
    }

    #[test]
    fn test_concurrent_records_get_gapless_counts() {
        let ledger = Arc::new(OrderLedger::new());
        let threads: Vec<_> = (0..8)
            .map(|n| {
                let ledger = Arc::clone(&ledger);
                thread::spawn(move || {
                    let user = format!("user{}", n);
                    let mut counts = Vec::new();
                    for _ in 0..10 {
                        let (_, count) =
                            ledger.record(&user, vec![line_item("1", 100, 1)], None, Money::zero());
                        counts.push(count);
                    }
                    counts
                })
            })
            .collect();

        let mut all: Vec<u64> = threads
            .into_iter()
            .flat_map(|t| t.join().unwrap())
            .collect();
        all.sort_unstable();

        // 80 records → exactly the counts 1..=80, no gap, no duplicate.
        assert_eq!(all, (1..=80).collect::<Vec<u64>>());
    }

    #[test]
    fn test_totals_aggregation() {
        let ledger = OrderLedger::new();
        ledger.record("alice", vec![line_item("1", 5000, 2)], None, Money::zero());
        ledger.record(
            "bob",
            vec![line_item("2", 10000, 1)],
            Some("SAVE-TEST12345678".to_string()),
            Money::from_cents(1000),
        );

        let totals = ledger.totals();
        assert_eq!(totals.total_orders, 2);
        assert_eq!(totals.total_items_purchased, 3);
        assert_eq!(totals.total_revenue_cents, 10000 + 9000);
        assert_eq!(totals.total_discount_cents, 1000);
    }
}
