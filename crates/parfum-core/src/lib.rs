//! Domain core of the Parfum storefront.
//!
//! Holds the catalogue model, sale resolution and pricing, the locally
//! persisted cart and wishlist stores, and the checkout model consumed by the
//! invoice renderer and the order composer.

pub mod app_config;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod nullable;
pub mod pricing;
pub mod products;
pub mod sales;
pub mod session;
pub mod storage;
pub mod storefront;
pub mod wishlist;

pub use app_config::{AppConfig, BackendSession, Environment};
pub use cart::{CartError, CartLineItem, CartStore};
pub use checkout::{CustomerInfo, OrderId, OrderSummary, ValidationError};
pub use config::{load_app_config, load_app_config_from_env};
pub use pricing::{find_applicable_sale, quote_variant, resolve_price, PriceQuote};
pub use products::{Category, FragranceNotes, Product, Variant};
pub use sales::{AppliesTo, DiscountType, Sale, SaleStatus};
pub use session::SessionState;
pub use storage::{FileStore, LocalStore, MemoryStore, StorageError};
pub use storefront::{load_storefront, StorefrontProfile};
pub use wishlist::WishlistStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read storefront profile {path}: {source}")]
    StorefrontFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse storefront profile: {0}")]
    StorefrontFileParse(#[source] serde_yaml::Error),

    #[error("storefront profile validation failed: {0}")]
    Validation(String),
}
