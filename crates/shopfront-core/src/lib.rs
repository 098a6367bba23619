pub mod app_config;
pub mod cart;
pub mod catalog;
pub mod catalog_file;
pub mod checkout;
pub mod compare;
mod config;
pub mod order;
pub mod pricing;
pub mod product;
pub mod wishlist;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use cart::{CartItem, CartStorage, CartStore, FileCartStorage, MemoryCartStorage};
pub use catalog::{filter_and_sort, CatalogQuery, SortKey, CATEGORY_ALL, CATEGORY_ON_SALE};
pub use catalog_file::{load_catalog, CatalogFile, SeedCategory};
pub use checkout::{
    express_order, order_from_cart, CheckoutError, CheckoutForm, NoopNotifier, OrderNotifier,
};
pub use compare::{CompareList, CompareOutcome, MAX_COMPARE};
pub use config::{load_app_config, load_app_config_from_env};
pub use order::{Order, OrderItem, OrderStatus};
pub use pricing::{displayed_original_price, displayed_price, VariantOption, VariantSelection};
pub use product::{BannerSlide, Category, Contact, MenuItem, Product, Rating};
pub use wishlist::WishlistStore;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read catalog file {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog file: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),
    #[error("catalog validation failed: {0}")]
    Validation(String),
}
