use async_trait::async_trait;
use mockall::automock;
use parfum_core::{Category, Product, Sale};

use crate::error::GatewayError;
use crate::types::{DashboardStats, ProductDraft, SaleDraft};

/// Everything the storefront needs from its backend.
///
/// Calls are plain request/response: no retries, no caching. Callers decide
/// how to surface a failure.
#[automock]
#[async_trait]
pub trait StorefrontGateway: Send + Sync {
    /// Active products, newest first.
    async fn list_public_products(&self) -> Result<Vec<Product>, GatewayError>;

    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError>;

    /// All sales, newest first. Sale resolution depends on this order.
    async fn list_sales(&self) -> Result<Vec<Sale>, GatewayError>;

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, GatewayError>;

    async fn update_product(
        &self,
        id: &str,
        draft: &ProductDraft,
    ) -> Result<Product, GatewayError>;

    async fn delete_product(&self, id: &str) -> Result<(), GatewayError>;

    async fn create_sale(&self, draft: &SaleDraft) -> Result<Sale, GatewayError>;

    async fn update_sale(&self, id: &str, draft: &SaleDraft) -> Result<Sale, GatewayError>;

    async fn delete_sale(&self, id: &str) -> Result<(), GatewayError>;

    /// Store a product image and return its public URL.
    async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, GatewayError>;

    /// Store a rendered invoice PDF and return its public URL.
    async fn upload_invoice(&self, file_name: &str, bytes: Vec<u8>)
        -> Result<String, GatewayError>;

    /// Record the signed-in user's rating (1 to 5) for a product.
    async fn submit_review(&self, product_id: &str, rating: u8) -> Result<(), GatewayError>;

    /// The signed-in user's rating for a product, if any.
    async fn get_user_review(&self, product_id: &str) -> Result<Option<u8>, GatewayError>;

    async fn get_dashboard_stats(&self) -> Result<DashboardStats, GatewayError>;

    async fn record_visit(&self, page_path: &str) -> Result<(), GatewayError>;

    fn is_authenticated(&self) -> bool;
}
