//! Spreadsheet normalizer: first worksheet, fixed positional columns,
//! header row skipped.

use super::Normalizer;
use super::parse::{RowFields, build_record, non_empty};
use crate::error::{Error, Result};
use crate::model::NewOrder;
use std::io::Cursor;
use umya_spreadsheet::reader::xlsx;

/// Column layout of a tabular upload, 1-based: order code, customer name,
/// email, product name, quantity, unit price, total amount, status, date,
/// category, region.
pub struct SheetNormalizer;

impl Normalizer for SheetNormalizer {
    fn normalize(&self, bytes: &[u8]) -> Result<Vec<NewOrder>> {
        let book = xlsx::read_reader(Cursor::new(bytes), true)
            .map_err(|err| Error::Workbook(err.to_string()))?;
        let sheet = book
            .get_sheet(&0)
            .ok_or_else(|| Error::Workbook("workbook has no sheets".to_string()))?;

        let now = chrono::Utc::now().naive_utc();
        let mut records = Vec::new();
        let highest_row = sheet.get_highest_row();

        for row in 2..=highest_row {
            let cell = |col: u32| non_empty(sheet.get_value((col, row)));
            let fields = RowFields {
                order_code: cell(1),
                customer_name: cell(2),
                customer_email: cell(3),
                product_name: cell(4),
                quantity: cell(5),
                unit_price: cell(6),
                total_amount: cell(7),
                status: cell(8),
                order_date: cell(9),
                category: cell(10),
                region: cell(11),
            };

            if fields.is_blank() {
                continue;
            }
            match build_record(fields, now) {
                Some(record) => records.push(record),
                None => tracing::debug!(row, "dropping sheet row failing required fields"),
            }
        }

        Ok(records)
    }
}
