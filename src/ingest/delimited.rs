//! Delimited-text normalizer: header row resolved against bilingual field
//! aliases, so column order in the upload is irrelevant.

use super::Normalizer;
use super::parse::{RowFields, build_record, non_empty};
use crate::error::{Error, Result};
use crate::model::NewOrder;
use csv::{ReaderBuilder, StringRecord, Trim};

/// Accepted header aliases per logical field: the machine-readable key and
/// the localized human label. Matching is case-insensitive substring
/// containment; the first alias that matches any header wins.
const ORDER_CODE: &[&str] = &["ordercode", "mã đơn hàng"];
const CUSTOMER_NAME: &[&str] = &["customername", "tên khách hàng"];
const CUSTOMER_EMAIL: &[&str] = &["customeremail", "email"];
const PRODUCT_NAME: &[&str] = &["productname", "sản phẩm"];
const QUANTITY: &[&str] = &["quantity", "số lượng"];
const UNIT_PRICE: &[&str] = &["unitprice", "đơn giá"];
const TOTAL_AMOUNT: &[&str] = &["totalamount", "tổng tiền"];
const STATUS: &[&str] = &["status", "trạng thái"];
const ORDER_DATE: &[&str] = &["orderdate", "ngày đặt hàng"];
const CATEGORY: &[&str] = &["category", "danh mục"];
const REGION: &[&str] = &["region", "khu vực"];

pub struct DelimitedNormalizer;

impl Normalizer for DelimitedNormalizer {
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<NewOrder>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|err| Error::Delimited(err.to_string()))?
            .clone();
        let columns = ColumnMap::resolve(&headers);

        let now = chrono::Utc::now().naive_utc();
        let mut records = Vec::new();

        for (line, result) in reader.records().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(err) => {
                    tracing::debug!(line, %err, "dropping unreadable delimited row");
                    continue;
                }
            };
            if row.iter().all(|field| field.trim().is_empty()) {
                continue;
            }

            let fields = columns.extract(&row);
            match build_record(fields, now) {
                Some(record) => records.push(record),
                None => tracing::debug!(line, "dropping delimited row failing required fields"),
            }
        }

        Ok(records)
    }
}

/// Resolved header positions for one upload.
#[derive(Debug, Default)]
struct ColumnMap {
    order_code: Option<usize>,
    customer_name: Option<usize>,
    customer_email: Option<usize>,
    product_name: Option<usize>,
    quantity: Option<usize>,
    unit_price: Option<usize>,
    total_amount: Option<usize>,
    status: Option<usize>,
    order_date: Option<usize>,
    category: Option<usize>,
    region: Option<usize>,
}

impl ColumnMap {
    fn resolve(headers: &StringRecord) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| lowered.iter().position(|header| header.contains(alias)))
        };

        Self {
            order_code: find(ORDER_CODE),
            customer_name: find(CUSTOMER_NAME),
            customer_email: find(CUSTOMER_EMAIL),
            product_name: find(PRODUCT_NAME),
            quantity: find(QUANTITY),
            unit_price: find(UNIT_PRICE),
            total_amount: find(TOTAL_AMOUNT),
            status: find(STATUS),
            order_date: find(ORDER_DATE),
            category: find(CATEGORY),
            region: find(REGION),
        }
    }

    fn extract(&self, row: &StringRecord) -> RowFields {
        let value = |index: Option<usize>| {
            index
                .and_then(|i| row.get(i))
                .and_then(|raw| non_empty(raw.to_string()))
        };

        RowFields {
            order_code: value(self.order_code),
            customer_name: value(self.customer_name),
            customer_email: value(self.customer_email),
            product_name: value(self.product_name),
            quantity: value(self.quantity),
            unit_price: value(self.unit_price),
            total_amount: value(self.total_amount),
            status: value(self.status),
            order_date: value(self.order_date),
            category: value(self.category),
            region: value(self.region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OrderStatus;
    use rust_decimal_macros::dec;

    const BILINGUAL_CSV: &str = "\
Tên khách hàng,Mã đơn hàng,Sản phẩm,Số lượng,Đơn giá,Tổng tiền,Trạng thái,Ngày đặt hàng,Khu vực
Nguyễn Văn An,ORD-001,Áo thun nam,2,150000,300000,Đã giao,2024-03-05,Miền Bắc
Trần Thị Bình,ORD-002,Quần jean,1,\"450,000\",\"450,000₫\",pending,05/03/2024 10:00:00,Miền Nam
";

    #[test]
    fn bilingual_headers_resolve_in_any_column_order() {
        let records = DelimitedNormalizer
            .normalize(BILINGUAL_CSV.as_bytes())
            .expect("normalize");
        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.order_code, "ORD-001");
        assert_eq!(first.customer_name, "Nguyễn Văn An");
        assert_eq!(first.status, OrderStatus::Delivered);
        assert_eq!(first.region.as_deref(), Some("Miền Bắc"));
        assert!(first.customer_email.is_none());

        let second = &records[1];
        assert_eq!(second.unit_price, dec!(450000));
        assert_eq!(second.status, OrderStatus::Pending);
        assert_eq!(second.order_date.to_string(), "2024-03-05 10:00:00");
    }

    #[test]
    fn machine_key_headers_resolve_too() {
        let csv = "\
orderCode,customerName,customerEmail,productName,quantity,unitPrice,totalAmount,status,orderDate,category,region
ORD-003,Lê Văn Cường,c@example.com,Giày thể thao,3,200000,600000,shipped,2024-04-01,Giày dép,Miền Trung
";
        let records = DelimitedNormalizer.normalize(csv.as_bytes()).expect("normalize");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].customer_email.as_deref(), Some("c@example.com"));
        assert_eq!(records[0].status, OrderStatus::Shipped);
        assert_eq!(records[0].category.as_deref(), Some("Giày dép"));
    }

    #[test]
    fn rows_missing_required_fields_are_dropped_silently() {
        let csv = "\
orderCode,customerName,productName,quantity,unitPrice,totalAmount,status
ORD-001,An,Áo thun,,100,100,pending
,,,,,,
ORD-002,Bình,Quần jean,2,200,400,mystery-status
ORD-003,Cường,Giày,1,500,500,confirmed
";
        let records = DelimitedNormalizer.normalize(csv.as_bytes()).expect("normalize");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].order_code, "ORD-003");
        assert_eq!(records[0].status, OrderStatus::Confirmed);
    }

    #[test]
    fn short_rows_do_not_panic() {
        let csv = "\
orderCode,customerName,productName,quantity,unitPrice,totalAmount,status
ORD-001,An
ORD-002,Bình,Quần jean,2,200,400,pending
";
        let records = DelimitedNormalizer.normalize(csv.as_bytes()).expect("normalize");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].order_code, "ORD-002");
    }
}
