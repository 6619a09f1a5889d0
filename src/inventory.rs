//! Inventory reconciliation: keeps product stock consistent with the order
//! lifecycle as orders are ingested or edited.
//!
//! The surrounding system historically disagreed on which statuses deduct
//! stock (ingestion deducted everything outside Cancelled/Returned, edits
//! deducted only Shipped/Delivered). Here the policy is a single explicit
//! configuration value applied to both paths; see DESIGN.md.

use crate::model::{NewOrder, Order, OrderStatus};
use crate::store::ProductStore;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Which statuses carry a standing stock deduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockPolicy {
    /// Every status except Cancelled/Returned deducts. Matches what bulk
    /// ingestion has always done; the canonical default.
    #[default]
    DeductAllActive,
    /// Only Shipped/Delivered deduct; stock is committed late.
    DeductShippedDelivered,
}

impl StockPolicy {
    pub fn deducts(self, status: OrderStatus) -> bool {
        match self {
            StockPolicy::DeductAllActive => !matches!(
                status,
                OrderStatus::Cancelled | OrderStatus::Returned
            ),
            StockPolicy::DeductShippedDelivered => {
                matches!(status, OrderStatus::Shipped | OrderStatus::Delivered)
            }
        }
    }
}

/// The (product, quantity, status) triple that determines an order's stock
/// effect, captured before and after an edit.
#[derive(Debug, Clone)]
pub struct StockSnapshot {
    pub product_name: String,
    pub quantity: i64,
    pub status: OrderStatus,
}

impl From<&Order> for StockSnapshot {
    fn from(order: &Order) -> Self {
        Self {
            product_name: order.product_name.clone(),
            quantity: order.quantity,
            status: order.status,
        }
    }
}

/// Applies one ingested record's stock effect: deducting statuses take
/// `quantity` out, everything else puts `quantity` back (a Cancelled or
/// Returned row restocks an already-committed unit). Unknown products are
/// not an error and are left untracked.
pub fn apply_ingest(products: &dyn ProductStore, record: &NewOrder, policy: StockPolicy) {
    let delta = if policy.deducts(record.status) {
        -record.quantity
    } else {
        record.quantity
    };
    if !products.adjust_stock(&record.product_name, delta) {
        tracing::debug!(
            product = %record.product_name,
            "no inventory tracked for ingested order's product"
        );
    }
}

/// Reconciles stock across an order edit. Same product: one net delta (old
/// deduction returned, new deduction taken). Product changed: two
/// independent adjustments, so the old product is restored and the new one
/// deducted.
pub fn apply_update(
    products: &dyn ProductStore,
    old: &StockSnapshot,
    new: &StockSnapshot,
    policy: StockPolicy,
) {
    if old.product_name == new.product_name {
        let mut delta = 0;
        if policy.deducts(old.status) {
            delta += old.quantity;
        }
        if policy.deducts(new.status) {
            delta -= new.quantity;
        }
        if delta != 0 {
            products.adjust_stock(&new.product_name, delta);
        }
    } else {
        if policy.deducts(old.status) {
            products.adjust_stock(&old.product_name, old.quantity);
        }
        if policy.deducts(new.status) {
            products.adjust_stock(&new.product_name, -new.quantity);
        }
    }
}
