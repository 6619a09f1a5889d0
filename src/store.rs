//! Store contracts consumed by the core, plus in-memory implementations
//! used by the CLI and tests. A durable backend implements the same traits.

use crate::model::{NewOrder, Order, OrderStatus, Product};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Durable order storage plus the aggregate queries analytics relies on.
pub trait OrderStore: Send + Sync {
    fn create(&self, order: NewOrder) -> Order;
    fn create_many(&self, orders: Vec<NewOrder>) -> Vec<Order>;
    fn get(&self, id: u64) -> Option<Order>;
    /// Upserts by id; used by the update path after a merge.
    fn save(&self, order: Order);
    fn delete(&self, id: u64) -> bool;
    fn all(&self) -> Vec<Order>;

    fn count(&self) -> u64;
    fn total_revenue(&self) -> Decimal;
    fn average_order_value(&self) -> Decimal;
    fn count_by_status(&self, status: OrderStatus) -> u64;
    fn revenue_by_status(&self, status: OrderStatus) -> Decimal;
    /// Orders with `start <= order_date <= end`, both bounds inclusive.
    fn in_date_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Order>;
    /// (product name, total quantity) descending by quantity, stable ties.
    fn product_quantity_rollup(&self) -> Vec<(String, i64)>;
    /// (customer name, total spent) descending by spend, stable ties.
    fn customer_spend_rollup(&self) -> Vec<(String, Decimal)>;
}

/// Product storage keyed by name.
pub trait ProductStore: Send + Sync {
    fn find_by_name(&self, name: &str) -> Option<Product>;
    fn save(&self, product: Product);
    fn all(&self) -> Vec<Product>;
    /// Atomically applies `delta` to the named product's stock. Returns
    /// false when the product is untracked. Implementations must serialize
    /// the read-modify-write so concurrent adjustments never lose updates.
    fn adjust_stock(&self, name: &str, delta: i64) -> bool;
}

pub struct InMemoryOrderStore {
    orders: RwLock<BTreeMap<u64, Order>>,
    next_id: AtomicU64,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self {
            orders: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryOrderStore {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn create(&self, order: NewOrder) -> Order {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let order = order.into_order(id);
        self.orders.write().insert(id, order.clone());
        order
    }

    fn create_many(&self, orders: Vec<NewOrder>) -> Vec<Order> {
        let mut guard = self.orders.write();
        orders
            .into_iter()
            .map(|order| {
                let id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let order = order.into_order(id);
                guard.insert(id, order.clone());
                order
            })
            .collect()
    }

    fn get(&self, id: u64) -> Option<Order> {
        self.orders.read().get(&id).cloned()
    }

    fn save(&self, order: Order) {
        self.orders.write().insert(order.id, order);
    }

    fn delete(&self, id: u64) -> bool {
        self.orders.write().remove(&id).is_some()
    }

    fn all(&self) -> Vec<Order> {
        self.orders.read().values().cloned().collect()
    }

    fn count(&self) -> u64 {
        self.orders.read().len() as u64
    }

    fn total_revenue(&self) -> Decimal {
        self.orders
            .read()
            .values()
            .map(|order| order.total_amount)
            .sum()
    }

    fn average_order_value(&self) -> Decimal {
        let guard = self.orders.read();
        if guard.is_empty() {
            return Decimal::ZERO;
        }
        let total: Decimal = guard.values().map(|order| order.total_amount).sum();
        (total / Decimal::from(guard.len() as u64)).round_dp(2)
    }

    fn count_by_status(&self, status: OrderStatus) -> u64 {
        self.orders
            .read()
            .values()
            .filter(|order| order.status == status)
            .count() as u64
    }

    fn revenue_by_status(&self, status: OrderStatus) -> Decimal {
        self.orders
            .read()
            .values()
            .filter(|order| order.status == status)
            .map(|order| order.total_amount)
            .sum()
    }

    fn in_date_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Order> {
        self.orders
            .read()
            .values()
            .filter(|order| order.order_date >= start && order.order_date <= end)
            .cloned()
            .collect()
    }

    fn product_quantity_rollup(&self) -> Vec<(String, i64)> {
        let mut totals: IndexMap<String, i64> = IndexMap::new();
        for order in self.orders.read().values() {
            *totals.entry(order.product_name.clone()).or_default() += order.quantity;
        }
        let mut rollup: Vec<_> = totals.into_iter().collect();
        rollup.sort_by(|a, b| b.1.cmp(&a.1));
        rollup
    }

    fn customer_spend_rollup(&self) -> Vec<(String, Decimal)> {
        let mut totals: IndexMap<String, Decimal> = IndexMap::new();
        for order in self.orders.read().values() {
            *totals.entry(order.customer_name.clone()).or_default() += order.total_amount;
        }
        let mut rollup: Vec<_> = totals.into_iter().collect();
        rollup.sort_by(|a, b| b.1.cmp(&a.1));
        rollup
    }
}

#[derive(Default)]
pub struct InMemoryProductStore {
    products: RwLock<BTreeMap<String, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self {
            products: RwLock::new(BTreeMap::new()),
        }
    }
}

impl ProductStore for InMemoryProductStore {
    fn find_by_name(&self, name: &str) -> Option<Product> {
        self.products.read().get(name).cloned()
    }

    fn save(&self, product: Product) {
        self.products.write().insert(product.name.clone(), product);
    }

    fn all(&self) -> Vec<Product> {
        self.products.read().values().cloned().collect()
    }

    fn adjust_stock(&self, name: &str, delta: i64) -> bool {
        // Single write lock covers the whole read-modify-write.
        let mut guard = self.products.write();
        match guard.get_mut(name) {
            Some(product) => {
                product.stock_quantity += delta;
                true
            }
            None => false,
        }
    }
}
