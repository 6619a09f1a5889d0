//! Analytics aggregation over the full order set. Everything is recomputed
//! from the store on each call; there is no cache and no staleness contract
//! beyond "consistent within one call".

use crate::error::{Error, Result};
use crate::model::{
    DashboardData, Order, OrderStatus, PeriodRevenue, StatisticsReport, TopCustomer, TopProduct,
};
use crate::store::OrderStore;
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

const TOP_N: usize = 10;
const DAILY_WINDOW_DAYS: i64 = 30;
const MONTHLY_WINDOW_MONTHS: u32 = 12;
const RECENT_ORDERS: usize = 10;

/// Optional predicates for the order listing. All supplied predicates are
/// ANDed together. Date bounds are ISO dates widened to start/end of day;
/// the text filters are case-insensitive substring matches.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub product_name: Option<String>,
    pub customer_name: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
}

pub fn overall_statistics(orders: &dyn OrderStore, now: NaiveDateTime) -> StatisticsReport {
    let mut orders_by_status = IndexMap::new();
    let mut revenue_by_status = IndexMap::new();
    // Always all six statuses, zero-defaulted, in declaration order.
    for status in OrderStatus::iter() {
        orders_by_status.insert(
            status.display_label().to_string(),
            orders.count_by_status(status),
        );
        revenue_by_status.insert(
            status.display_label().to_string(),
            orders.revenue_by_status(status),
        );
    }

    let top_products = orders
        .product_quantity_rollup()
        .into_iter()
        .take(TOP_N)
        .map(|(product_name, total_quantity)| TopProduct {
            product_name,
            total_quantity,
        })
        .collect();
    let top_customers = orders
        .customer_spend_rollup()
        .into_iter()
        .take(TOP_N)
        .map(|(customer_name, total_spent)| TopCustomer {
            customer_name,
            total_spent,
        })
        .collect();

    StatisticsReport {
        total_orders: orders.count(),
        total_revenue: orders.total_revenue(),
        average_order_value: orders.average_order_value(),
        orders_by_status,
        revenue_by_status,
        top_products,
        top_customers,
        daily_revenue: daily_revenue(orders, now),
        monthly_revenue: monthly_revenue(orders, now),
    }
}

/// Revenue per calendar day over the trailing 30 days. Days with no orders
/// are omitted, not zero-filled; the BTreeMap keeps periods ascending.
fn daily_revenue(orders: &dyn OrderStore, now: NaiveDateTime) -> Vec<PeriodRevenue> {
    let start = now - Duration::days(DAILY_WINDOW_DAYS);
    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for order in orders.in_date_range(start, now) {
        *totals.entry(order.order_date.date()).or_default() += order.total_amount;
    }
    totals
        .into_iter()
        .map(|(date, revenue)| PeriodRevenue {
            period: date.format("%Y-%m-%d").to_string(),
            revenue,
        })
        .collect()
}

/// Revenue per calendar month over the trailing 12 months, same omission
/// and ordering rules as the daily series.
fn monthly_revenue(orders: &dyn OrderStore, now: NaiveDateTime) -> Vec<PeriodRevenue> {
    let start = now
        .checked_sub_months(Months::new(MONTHLY_WINDOW_MONTHS))
        .unwrap_or(now);
    let mut totals: BTreeMap<(i32, u32), Decimal> = BTreeMap::new();
    for order in orders.in_date_range(start, now) {
        let key = (order.order_date.year(), order.order_date.month());
        *totals.entry(key).or_default() += order.total_amount;
    }
    totals
        .into_iter()
        .map(|((year, month), revenue)| PeriodRevenue {
            period: format!("{year:04}-{month:02}"),
            revenue,
        })
        .collect()
}

/// Applies the conjunctive filter set. An unknown status code silently
/// disables the status predicate; an unparseable date bound is a caller
/// error.
pub fn filtered_orders(orders: &dyn OrderStore, filter: &OrderFilter) -> Result<Vec<Order>> {
    let start = parse_bound(filter.start_date.as_deref(), false)?;
    let end = parse_bound(filter.end_date.as_deref(), true)?;
    let status = filter
        .status
        .as_deref()
        .filter(|code| !code.is_empty())
        .and_then(OrderStatus::from_code);

    let mut result = orders.all();
    if let Some(start) = start {
        result.retain(|order| order.order_date >= start);
    }
    if let Some(end) = end {
        result.retain(|order| order.order_date <= end);
    }
    if let Some(status) = status {
        result.retain(|order| order.status == status);
    }
    if let Some(needle) = lowered(filter.product_name.as_deref()) {
        result.retain(|order| order.product_name.to_lowercase().contains(&needle));
    }
    if let Some(needle) = lowered(filter.customer_name.as_deref()) {
        result.retain(|order| order.customer_name.to_lowercase().contains(&needle));
    }
    if let Some(needle) = lowered(filter.category.as_deref()) {
        result.retain(|order| {
            order
                .category
                .as_deref()
                .is_some_and(|category| category.to_lowercase().contains(&needle))
        });
    }
    if let Some(needle) = lowered(filter.region.as_deref()) {
        result.retain(|order| {
            order
                .region
                .as_deref()
                .is_some_and(|region| region.to_lowercase().contains(&needle))
        });
    }

    Ok(result)
}

/// Statistics plus the most recent orders, newest first.
pub fn dashboard(orders: &dyn OrderStore, now: NaiveDateTime) -> DashboardData {
    let mut recent = orders.all();
    recent.sort_by(|a, b| b.order_date.cmp(&a.order_date));
    recent.truncate(RECENT_ORDERS);
    DashboardData {
        statistics: overall_statistics(orders, now),
        recent_orders: recent,
    }
}

fn lowered(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn parse_bound(raw: Option<&str>, end_of_day: bool) -> Result<Option<NaiveDateTime>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| Error::MalformedFilter {
        input: raw.to_string(),
        reason: err.to_string(),
    })?;
    let bound = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    Ok(bound)
}
