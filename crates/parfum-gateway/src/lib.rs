//! Backend access for the Parfum storefront.
//!
//! [`StorefrontGateway`] is the only seam between the storefront and its
//! backend. [`RestGateway`] implements it over HTTP; `MockStorefrontGateway`
//! is generated for tests in this and downstream crates.

pub mod client;
pub mod error;
pub mod gateway;
pub mod reviews;
pub mod stats;
pub mod types;
pub mod visits;

pub use client::RestGateway;
pub use error::GatewayError;
pub use gateway::{MockStorefrontGateway, StorefrontGateway};
pub use reviews::{RatingBook, RatingScope};
pub use stats::{summarize, LOW_STOCK_THRESHOLD};
pub use types::{DashboardStats, OrderRow, ProductDraft, SaleDraft};
pub use visits::track_visit;
