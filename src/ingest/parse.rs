//! Shared pure parsers for both normalizers: locale-tolerant numbers,
//! bilingual status resolution, and the date pattern priority list.

use crate::model::{NewOrder, OrderStatus};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::str::FromStr;
use strum::IntoEnumIterator;

/// Timestamp patterns tried first, then date-only patterns at midnight.
/// Order matters: `05/03/2024` parses under both slash orderings, and the
/// day/month form wins because it is listed first.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%d/%m/%Y %H:%M:%S", "%m/%d/%Y %H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y"];

/// Keyword fragments for the loose status fallback, in fixed priority
/// order. "giao" sits before "đã giao" on purpose: exact code/label matches
/// have already been tried, so whichever fragment matches first wins for
/// free-form text.
const STATUS_FRAGMENTS: &[(&str, OrderStatus)] = &[
    ("chờ", OrderStatus::Pending),
    ("pending", OrderStatus::Pending),
    ("xác nhận", OrderStatus::Confirmed),
    ("confirmed", OrderStatus::Confirmed),
    ("giao", OrderStatus::Shipped),
    ("shipped", OrderStatus::Shipped),
    ("đã giao", OrderStatus::Delivered),
    ("delivered", OrderStatus::Delivered),
    ("hủy", OrderStatus::Cancelled),
    ("cancelled", OrderStatus::Cancelled),
    ("trả", OrderStatus::Returned),
    ("returned", OrderStatus::Returned),
];

/// One row's worth of raw field text, however the columns were located.
/// `None` means the column was absent or empty.
#[derive(Debug, Default)]
pub(crate) struct RowFields {
    pub order_code: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub product_name: Option<String>,
    pub quantity: Option<String>,
    pub unit_price: Option<String>,
    pub total_amount: Option<String>,
    pub status: Option<String>,
    pub order_date: Option<String>,
    pub category: Option<String>,
    pub region: Option<String>,
}

impl RowFields {
    pub fn is_blank(&self) -> bool {
        [
            &self.order_code,
            &self.customer_name,
            &self.customer_email,
            &self.product_name,
            &self.quantity,
            &self.unit_price,
            &self.total_amount,
            &self.status,
            &self.order_date,
            &self.category,
            &self.region,
        ]
        .iter()
        .all(|field| field.is_none())
    }
}

/// Required-field validation shared by both normalizers. Returns `None`
/// when the row must be dropped; the caller logs and moves on.
pub(crate) fn build_record(fields: RowFields, now: NaiveDateTime) -> Option<NewOrder> {
    let order_code = fields.order_code?;
    let customer_name = fields.customer_name?;
    let product_name = fields.product_name?;
    let quantity = parse_quantity(fields.quantity.as_deref()?)?;
    let unit_price = parse_money(fields.unit_price.as_deref()?)?;
    let total_amount = parse_money(fields.total_amount.as_deref()?)?;
    let status = parse_status(fields.status.as_deref()?)?;
    let order_date = fields
        .order_date
        .map(|raw| parse_order_date(&raw, now))
        .unwrap_or(now);

    Some(NewOrder {
        order_code,
        customer_name,
        customer_email: fields.customer_email,
        product_name,
        quantity,
        unit_price,
        total_amount,
        status,
        order_date,
        category: fields.category,
        region: fields.region,
    })
}

/// Normalizes cell text: trimmed, empty collapsed to `None`.
pub(crate) fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn clean_numeric(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| *c != ',' && *c != '₫')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Integer parse tolerating thousands separators and the currency glyph.
/// Unparseable text means "field absent", never an error.
pub(crate) fn parse_quantity(raw: &str) -> Option<i64> {
    clean_numeric(raw).parse::<i64>().ok()
}

/// Fixed-point money parse with the same cleanup rules as quantities.
pub(crate) fn parse_money(raw: &str) -> Option<Decimal> {
    Decimal::from_str(&clean_numeric(raw)).ok()
}

/// Resolves status text against, in order: machine codes, display labels,
/// then the keyword-fragment fallback. First match wins throughout.
pub(crate) fn parse_status(raw: &str) -> Option<OrderStatus> {
    let needle = raw.trim().to_lowercase();
    if needle.is_empty() {
        return None;
    }

    for status in OrderStatus::iter() {
        if status.code() == needle || status.display_label().to_lowercase() == needle {
            return Some(status);
        }
    }

    STATUS_FRAGMENTS
        .iter()
        .find(|(fragment, _)| needle.contains(fragment))
        .map(|(_, status)| *status)
}

/// Tries the pattern priority list; the current processing time is the
/// fallback for anything that fails every pattern.
pub(crate) fn parse_order_date(raw: &str, now: NaiveDateTime) -> NaiveDateTime {
    let raw = raw.trim();
    if raw.is_empty() {
        return now;
    }

    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return parsed;
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return parsed.and_hms_opt(0, 0, 0).unwrap_or(now);
        }
    }

    now
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn status_resolves_by_code_label_and_fragment() {
        // All three routes land on the same enumerated value.
        assert_eq!(parse_status("delivered"), Some(OrderStatus::Delivered));
        assert_eq!(parse_status("DELIVERED"), Some(OrderStatus::Delivered));
        assert_eq!(parse_status("Đã giao"), Some(OrderStatus::Delivered));
        assert_eq!(parse_status("hàng delivered rồi"), Some(OrderStatus::Delivered));

        assert_eq!(parse_status("Chờ xử lý"), Some(OrderStatus::Pending));
        assert_eq!(parse_status("đang chờ"), Some(OrderStatus::Pending));
        assert_eq!(parse_status("Đang giao"), Some(OrderStatus::Shipped));
        assert_eq!(parse_status("Đã hủy"), Some(OrderStatus::Cancelled));
        assert_eq!(parse_status("khách trả hàng"), Some(OrderStatus::Returned));
    }

    #[test]
    fn status_fragment_priority_is_first_match_wins() {
        // Free-form text containing "giao" hits the shipped fragment before
        // the delivered one; the exact label path is what catches "Đã giao".
        assert_eq!(
            parse_status("đơn đã giao cho khách"),
            Some(OrderStatus::Shipped)
        );
    }

    #[test]
    fn status_no_match_is_none() {
        assert_eq!(parse_status("mystery"), None);
        assert_eq!(parse_status("   "), None);
    }

    #[test]
    fn date_only_pattern_lands_at_midnight() {
        let parsed = parse_order_date("2024-03-05", now());
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn slash_timestamp_is_day_month_first() {
        // 05/03/2024 parses under both slash orderings; the day/month
        // pattern is listed first, so this is the 5th of March.
        let parsed = parse_order_date("05/03/2024 10:00:00", now());
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2024, 3, 5)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
        // A month field above 12 falls through to the month/day pattern.
        let parsed = parse_order_date("05/13/2024 10:00:00", now());
        assert_eq!(
            parsed,
            NaiveDate::from_ymd_opt(2024, 5, 13)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn unparseable_date_falls_back_to_now() {
        assert_eq!(parse_order_date("next tuesday", now()), now());
        assert_eq!(parse_order_date("", now()), now());
    }

    #[test]
    fn numbers_tolerate_locale_formatting() {
        assert_eq!(parse_quantity("1,200"), Some(1200));
        assert_eq!(parse_quantity(" 15 "), Some(15));
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_money("1,200,000₫"), Some(dec!(1200000)));
        assert_eq!(parse_money("1,234.56"), Some(dec!(1234.56)));
        assert_eq!(parse_money("₫ 99"), Some(dec!(99)));
        assert_eq!(parse_money("n/a"), None);
    }

    #[test]
    fn record_without_required_field_is_dropped() {
        let fields = RowFields {
            order_code: Some("ORD-1".into()),
            customer_name: Some("An".into()),
            product_name: Some("Áo thun".into()),
            quantity: None,
            unit_price: Some("100".into()),
            total_amount: Some("100".into()),
            status: Some("pending".into()),
            ..RowFields::default()
        };
        assert!(build_record(fields, now()).is_none());
    }

    #[test]
    fn record_with_optional_fields_absent_survives() {
        let fields = RowFields {
            order_code: Some("ORD-1".into()),
            customer_name: Some("An".into()),
            product_name: Some("Áo thun".into()),
            quantity: Some("2".into()),
            unit_price: Some("150,000".into()),
            total_amount: Some("300,000₫".into()),
            status: Some("Đã giao".into()),
            ..RowFields::default()
        };
        let record = build_record(fields, now()).expect("valid record");
        assert_eq!(record.quantity, 2);
        assert_eq!(record.total_amount, dec!(300000));
        assert_eq!(record.status, OrderStatus::Delivered);
        assert_eq!(record.order_date, now());
        assert!(record.customer_email.is_none());
        assert!(record.category.is_none());
    }
}
