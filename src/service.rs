//! Order service: the seam between uploads, the stores, and the three core
//! components. Batch-level failures never partially persist; row-level
//! failures never abort a batch.

use crate::analytics::{self, OrderFilter};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::ingest;
use crate::inventory::{self, StockSnapshot};
use crate::model::{
    DashboardData, Order, OrderPatch, Product, StatisticsReport, UploadReport,
};
use crate::store::{OrderStore, ProductStore};
use std::sync::Arc;

pub struct OrderService {
    orders: Arc<dyn OrderStore>,
    products: Arc<dyn ProductStore>,
    config: Arc<AppConfig>,
}

impl OrderService {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        products: Arc<dyn ProductStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            orders,
            products,
            config,
        }
    }

    /// Ingests one upload: resolve the declared kind, normalize, reject
    /// empty batches, apply each record's stock effect, persist everything.
    pub fn ingest_upload(&self, file_name: &str, bytes: &[u8]) -> Result<UploadReport> {
        let kind = ingest::detect_kind(file_name, &self.config)?;
        let records = ingest::normalize(bytes, kind)?;
        if records.is_empty() {
            return Err(Error::EmptyBatch);
        }

        for record in &records {
            inventory::apply_ingest(&*self.products, record, self.config.stock_policy);
        }
        let created = self.orders.create_many(records);

        tracing::info!(
            file = file_name,
            records = created.len(),
            "ingested upload batch"
        );
        Ok(UploadReport {
            records_ingested: created.len(),
        })
    }

    /// Partial-field merge: only supplied fields overwrite, the total is
    /// recomputed from the merged price and quantity, and stock is
    /// reconciled against the order's prior state.
    pub fn update_order(&self, id: u64, patch: OrderPatch) -> Result<Order> {
        let mut order = self.orders.get(id).ok_or_else(|| Error::NotFound {
            entity: "order",
            id: id.to_string(),
        })?;
        let before = StockSnapshot::from(&order);

        if let Some(order_code) = patch.order_code {
            order.order_code = order_code;
        }
        if let Some(customer_name) = patch.customer_name {
            order.customer_name = customer_name;
        }
        if let Some(customer_email) = patch.customer_email {
            order.customer_email = Some(customer_email);
        }
        if let Some(product_name) = patch.product_name {
            order.product_name = product_name;
        }
        if let Some(quantity) = patch.quantity {
            order.quantity = quantity;
        }
        if let Some(unit_price) = patch.unit_price {
            order.unit_price = unit_price;
        }
        if let Some(status) = patch.status {
            order.status = status;
        }
        if let Some(order_date) = patch.order_date {
            order.order_date = order_date;
        }
        if let Some(category) = patch.category {
            order.category = Some(category);
        }
        if let Some(region) = patch.region {
            order.region = Some(region);
        }

        order.total_amount = order.unit_price * rust_decimal::Decimal::from(order.quantity);

        inventory::apply_update(
            &*self.products,
            &before,
            &StockSnapshot::from(&order),
            self.config.stock_policy,
        );
        self.orders.save(order.clone());
        Ok(order)
    }

    /// Deletes by id. Deliberately leaves inventory untouched: removing an
    /// order does not undo its stock effect.
    pub fn delete_order(&self, id: u64) -> Result<()> {
        if !self.orders.delete(id) {
            return Err(Error::NotFound {
                entity: "order",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    pub fn statistics(&self) -> StatisticsReport {
        analytics::overall_statistics(&*self.orders, chrono::Utc::now().naive_utc())
    }

    pub fn filtered_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        analytics::filtered_orders(&*self.orders, filter)
    }

    pub fn dashboard(&self) -> DashboardData {
        analytics::dashboard(&*self.orders, chrono::Utc::now().naive_utc())
    }

    /// Creates the product, or overwrites the stock of an existing one.
    pub fn upsert_product(&self, product: Product) -> Product {
        match self.products.find_by_name(&product.name) {
            Some(mut existing) => {
                existing.stock_quantity = product.stock_quantity;
                self.products.save(existing.clone());
                existing
            }
            None => {
                self.products.save(product.clone());
                product
            }
        }
    }

    /// Explicit stock set on an existing product.
    pub fn set_stock(&self, name: &str, quantity: i64) -> Result<Product> {
        let mut product = self.products.find_by_name(name).ok_or_else(|| Error::NotFound {
            entity: "product",
            id: name.to_string(),
        })?;
        product.stock_quantity = quantity;
        self.products.save(product.clone());
        Ok(product)
    }

    pub fn products(&self) -> Vec<Product> {
        self.products.all()
    }
}
