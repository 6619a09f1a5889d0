pub mod analytics;
pub mod config;
pub mod error;
pub mod ingest;
pub mod inventory;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use analytics::OrderFilter;
pub use config::{AppConfig, CliArgs};
pub use error::{Error, Result};
pub use ingest::{FileKind, Normalizer};
pub use inventory::StockPolicy;
pub use logging::{LoggingConfig, init_logging};
pub use model::{
    DashboardData, NewOrder, Order, OrderPatch, OrderStatus, Product, StatisticsReport,
    UploadReport,
};
pub use service::OrderService;
pub use store::{InMemoryOrderStore, InMemoryProductStore, OrderStore, ProductStore};
