//! End-to-end flow: uploaded bytes → normalization → persistence with
//! inventory reconciliation → analytics.

use order_analytics::{
    AppConfig, Error, InMemoryOrderStore, InMemoryProductStore, OrderPatch, OrderService,
    OrderStatus, Product, ProductStore, StockPolicy,
};
use rust_decimal_macros::dec;
use std::io::Cursor;
use std::sync::Arc;

struct Harness {
    orders: Arc<InMemoryOrderStore>,
    products: Arc<InMemoryProductStore>,
    service: OrderService,
}

fn harness(policy: StockPolicy) -> Harness {
    let orders = Arc::new(InMemoryOrderStore::new());
    let products = Arc::new(InMemoryProductStore::new());
    let config = AppConfig {
        stock_policy: policy,
        ..AppConfig::default()
    };
    let service = OrderService::new(orders.clone(), products.clone(), Arc::new(config));
    Harness {
        orders,
        products,
        service,
    }
}

fn seed_product(h: &Harness, name: &str, stock: i64) {
    h.products.save(Product {
        name: name.into(),
        stock_quantity: stock,
    });
}

fn stock(h: &Harness, name: &str) -> i64 {
    h.products.find_by_name(name).expect("product").stock_quantity
}

fn order_workbook() -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).expect("sheet");
    let rows: &[&[&str]] = &[
        &[
            "Mã đơn hàng",
            "Tên khách hàng",
            "Email",
            "Sản phẩm",
            "Số lượng",
            "Đơn giá",
            "Tổng tiền",
            "Trạng thái",
            "Ngày đặt hàng",
            "Danh mục",
            "Khu vực",
        ],
        &[
            "ORD-001",
            "Nguyễn Văn An",
            "an@example.com",
            "Áo thun nam",
            "10",
            "150,000",
            "1,500,000₫",
            "Đã giao",
            "2024-03-05",
            "Thời trang",
            "Miền Bắc",
        ],
        &[
            "ORD-002",
            "Trần Thị Bình",
            "",
            "Quần jean",
            "2",
            "450,000",
            "900,000",
            "Đã hủy",
            "05/03/2024 10:00:00",
            "",
            "Miền Nam",
        ],
    ];
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            sheet
                .get_cell_mut((col_idx as u32 + 1, row_idx as u32 + 1))
                .set_value(*value);
        }
    }
    let mut cursor = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut cursor).expect("write workbook");
    cursor.into_inner()
}

const ORDERS_CSV: &str = "\
Mã đơn hàng,Tên khách hàng,Sản phẩm,Số lượng,Đơn giá,Tổng tiền,Trạng thái
ORD-101,Lê Văn Cường,Áo thun nam,4,150000,600000,delivered
ORD-102,Phạm Thị Dung,Giày thể thao,1,800000,800000,pending
bad row without most fields,,,,,,
ORD-103,Lê Văn Cường,Áo thun nam,2,150000,300000,Đã trả hàng
";

#[test]
fn spreadsheet_upload_persists_and_reconciles_stock() {
    let h = harness(StockPolicy::DeductAllActive);
    seed_product(&h, "Áo thun nam", 100);
    seed_product(&h, "Quần jean", 50);

    let report = h
        .service
        .ingest_upload("don-hang.xlsx", &order_workbook())
        .expect("ingest");
    assert_eq!(report.records_ingested, 2);

    // Delivered deducts, Cancelled restocks.
    assert_eq!(stock(&h, "Áo thun nam"), 90);
    assert_eq!(stock(&h, "Quần jean"), 52);

    let stats = h.service.statistics();
    assert_eq!(stats.total_orders, 2);
    assert_eq!(stats.total_revenue, dec!(2400000));
    assert_eq!(stats.orders_by_status["Đã giao"], 1);
    assert_eq!(stats.orders_by_status["Đã hủy"], 1);
    assert_eq!(stats.orders_by_status["Chờ xử lý"], 0);
}

#[test]
fn delimited_upload_skips_bad_rows_and_tracks_untracked_products() {
    let h = harness(StockPolicy::DeductAllActive);
    seed_product(&h, "Áo thun nam", 100);
    // "Giày thể thao" is untracked on purpose.

    let report = h
        .service
        .ingest_upload("don-hang.csv", ORDERS_CSV.as_bytes())
        .expect("ingest");
    assert_eq!(report.records_ingested, 3);

    // −4 (delivered) + 2 (returned); pending row hits an untracked product.
    assert_eq!(stock(&h, "Áo thun nam"), 98);
    assert!(h.products.find_by_name("Giày thể thao").is_none());

    let stats = h.service.statistics();
    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.top_customers[0].customer_name, "Lê Văn Cường");
    assert_eq!(stats.top_customers[0].total_spent, dec!(900000));
}

#[test]
fn unsupported_extension_is_rejected_before_parsing() {
    let h = harness(StockPolicy::default());
    let err = h.service.ingest_upload("orders.pdf", b"whatever").unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { .. }));
}

#[test]
fn empty_batch_persists_nothing_and_adjusts_nothing() {
    let h = harness(StockPolicy::default());
    seed_product(&h, "Áo thun nam", 100);

    let csv = "Mã đơn hàng,Tên khách hàng,Sản phẩm,Số lượng,Đơn giá,Tổng tiền,Trạng thái\n,,,,,,\n";
    let err = h.service.ingest_upload("orders.csv", csv.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::EmptyBatch));

    use order_analytics::OrderStore;
    assert_eq!(h.orders.count(), 0);
    assert_eq!(stock(&h, "Áo thun nam"), 100);
}

#[test]
fn edit_lifecycle_round_trips_stock() {
    for policy in [
        StockPolicy::DeductAllActive,
        StockPolicy::DeductShippedDelivered,
    ] {
        let h = harness(policy);
        seed_product(&h, "Áo thun nam", 100);
        seed_product(&h, "Quần jean", 50);

        let csv = "\
Mã đơn hàng,Tên khách hàng,Sản phẩm,Số lượng,Đơn giá,Tổng tiền,Trạng thái
ORD-001,Nguyễn Văn An,Áo thun nam,10,150000,1500000,delivered
";
        h.service
            .ingest_upload("orders.csv", csv.as_bytes())
            .expect("ingest");
        assert_eq!(stock(&h, "Áo thun nam"), 90, "{policy:?}");

        // Editing to a non-deducting status restores the stock.
        let updated = h
            .service
            .update_order(
                1,
                OrderPatch {
                    status: Some(OrderStatus::Returned),
                    ..OrderPatch::default()
                },
            )
            .expect("update");
        assert_eq!(updated.status, OrderStatus::Returned);
        assert_eq!(stock(&h, "Áo thun nam"), 100, "{policy:?}");

        // Back to deducting, then switch the product: the old product is
        // restored and the new one deducted by the same quantity.
        h.service
            .update_order(
                1,
                OrderPatch {
                    status: Some(OrderStatus::Delivered),
                    ..OrderPatch::default()
                },
            )
            .expect("update");
        assert_eq!(stock(&h, "Áo thun nam"), 90, "{policy:?}");

        h.service
            .update_order(
                1,
                OrderPatch {
                    product_name: Some("Quần jean".into()),
                    ..OrderPatch::default()
                },
            )
            .expect("update");
        assert_eq!(stock(&h, "Áo thun nam"), 100, "{policy:?}");
        assert_eq!(stock(&h, "Quần jean"), 40, "{policy:?}");
    }
}

#[test]
fn patch_recomputes_total_amount() {
    let h = harness(StockPolicy::default());
    let csv = "\
Mã đơn hàng,Tên khách hàng,Sản phẩm,Số lượng,Đơn giá,Tổng tiền,Trạng thái
ORD-001,Nguyễn Văn An,Áo thun nam,2,150000,999,pending
";
    h.service
        .ingest_upload("orders.csv", csv.as_bytes())
        .expect("ingest");

    // Ingestion takes the uploaded total as-is...
    let before = h.service.update_order(1, OrderPatch::default()).expect("noop patch");
    // ...but any merge recomputes it from price × quantity.
    assert_eq!(before.total_amount, dec!(300000));

    let updated = h
        .service
        .update_order(
            1,
            OrderPatch {
                quantity: Some(5),
                ..OrderPatch::default()
            },
        )
        .expect("update");
    assert_eq!(updated.total_amount, dec!(750000));

    let repriced = h
        .service
        .update_order(
            1,
            OrderPatch {
                unit_price: Some(dec!(100000)),
                ..OrderPatch::default()
            },
        )
        .expect("update");
    assert_eq!(repriced.total_amount, dec!(500000));
}

#[test]
fn delete_leaves_inventory_alone() {
    let h = harness(StockPolicy::DeductAllActive);
    seed_product(&h, "Áo thun nam", 100);

    let csv = "\
Mã đơn hàng,Tên khách hàng,Sản phẩm,Số lượng,Đơn giá,Tổng tiền,Trạng thái
ORD-001,Nguyễn Văn An,Áo thun nam,10,150000,1500000,delivered
";
    h.service
        .ingest_upload("orders.csv", csv.as_bytes())
        .expect("ingest");
    assert_eq!(stock(&h, "Áo thun nam"), 90);

    h.service.delete_order(1).expect("delete");
    assert_eq!(stock(&h, "Áo thun nam"), 90);

    let err = h.service.delete_order(1).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn missing_update_target_is_not_found() {
    let h = harness(StockPolicy::default());
    let err = h.service.update_order(42, OrderPatch::default()).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn product_ops_upsert_and_set_stock() {
    let h = harness(StockPolicy::default());

    let created = h.service.upsert_product(Product {
        name: "Áo thun nam".into(),
        stock_quantity: 40,
    });
    assert_eq!(created.stock_quantity, 40);

    let overwritten = h.service.upsert_product(Product {
        name: "Áo thun nam".into(),
        stock_quantity: 75,
    });
    assert_eq!(overwritten.stock_quantity, 75);

    let set = h.service.set_stock("Áo thun nam", 10).expect("set stock");
    assert_eq!(set.stock_quantity, 10);
    assert_eq!(stock(&h, "Áo thun nam"), 10);

    let err = h.service.set_stock("Không tồn tại", 5).unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));

    assert_eq!(h.service.products().len(), 1);
}
