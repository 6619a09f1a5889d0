use chrono::NaiveDateTime;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Lifecycle status of an order. The serde form is the machine code; the
/// display label is what uploaded files and user-facing reports use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub fn code(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Returned => "returned",
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Chờ xử lý",
            OrderStatus::Confirmed => "Đã xác nhận",
            OrderStatus::Shipped => "Đang giao",
            OrderStatus::Delivered => "Đã giao",
            OrderStatus::Cancelled => "Đã hủy",
            OrderStatus::Returned => "Đã trả hàng",
        }
    }

    /// Exact (case-insensitive) match on the machine code, as used by the
    /// status filter. Unknown codes resolve to `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        use strum::IntoEnumIterator;
        let code = code.trim();
        Self::iter().find(|status| status.code().eq_ignore_ascii_case(code))
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A persisted order. Identity is store-assigned; the order code comes from
/// the upload and is not guaranteed unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub order_code: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub order_date: NaiveDateTime,
    pub category: Option<String>,
    pub region: Option<String>,
}

/// What the normalizer produces: an order without its persistent identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_code: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub order_date: NaiveDateTime,
    pub category: Option<String>,
    pub region: Option<String>,
}

impl NewOrder {
    pub fn into_order(self, id: u64) -> Order {
        Order {
            id,
            order_code: self.order_code,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            product_name: self.product_name,
            quantity: self.quantity,
            unit_price: self.unit_price,
            total_amount: self.total_amount,
            status: self.status,
            order_date: self.order_date,
            category: self.category,
            region: self.region,
        }
    }
}

/// Partial-field merge for order updates. `None` leaves the existing value
/// in place. `total_amount` is intentionally absent: it is recomputed from
/// unit price and quantity after the merge, never patched directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderPatch {
    pub order_code: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<i64>,
    pub unit_price: Option<Decimal>,
    pub status: Option<OrderStatus>,
    pub order_date: Option<NaiveDateTime>,
    pub category: Option<String>,
    pub region: Option<String>,
}

/// Product inventory line, keyed by name. Stock is a plain signed count and
/// may go negative; no floor is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub stock_quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_name: String,
    pub total_quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopCustomer {
    pub customer_name: String,
    pub total_spent: Decimal,
}

/// Revenue total for one calendar period (a `YYYY-MM-DD` day or a `YYYY-MM`
/// month). Series are ascending by period; empty periods are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRevenue {
    pub period: String,
    pub revenue: Decimal,
}

/// Full statistics summary over the current order set. The per-status maps
/// are keyed by display label and always carry all six statuses in enum
/// declaration order, zero-defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub total_orders: u64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    pub orders_by_status: IndexMap<String, u64>,
    pub revenue_by_status: IndexMap<String, Decimal>,
    pub top_products: Vec<TopProduct>,
    pub top_customers: Vec<TopCustomer>,
    pub daily_revenue: Vec<PeriodRevenue>,
    pub monthly_revenue: Vec<PeriodRevenue>,
}

/// Statistics plus the ten most recent orders, for the dashboard view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    pub statistics: StatisticsReport,
    pub recent_orders: Vec<Order>,
}

/// Success payload of an upload.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UploadReport {
    pub records_ingested: usize,
}
