pub mod aggregation;
pub mod product_service;
pub mod purchase_service;
pub mod sale_service;
pub mod stock_service;
pub mod store_service;
pub mod user_service;

pub use aggregation::AggregationService;
pub use product_service::ProductService;
pub use purchase_service::PurchaseService;
pub use sale_service::SaleService;
pub use store_service::StoreService;
pub use user_service::UserService;
