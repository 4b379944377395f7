//! REST client for the storefront backend.
//!
//! Tables are reached through a `PostgREST` style API under `rest/v1/` and
//! files through an object store under `storage/v1/`. Every request carries
//! the project's anon key; signed-in sessions add their bearer token.

use std::time::Duration;

use async_trait::async_trait;
use parfum_core::{AppConfig, BackendSession, Category, Product, Sale, ValidationError};
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::GatewayError;
use crate::gateway::StorefrontGateway;
use crate::stats::summarize;
use crate::types::{DashboardStats, OrderRow, ProductDraft, RatingRow, SaleDraft};

const DEFAULT_USER_AGENT: &str = "parfum/0.1 (storefront)";
const DEFAULT_INVOICE_BUCKET: &str = "invoices";
const DEFAULT_IMAGE_BUCKET: &str = "product-images";
const ERROR_BODY_LIMIT: usize = 512;

/// Storefront backend client.
///
/// Use [`RestGateway::from_config`] in the application or
/// [`RestGateway::with_base_url`] to point at a mock server in tests.
pub struct RestGateway {
    client: Client,
    base_url: Url,
    anon_key: String,
    session: Option<BackendSession>,
    invoice_bucket: String,
    image_bucket: String,
}

impl RestGateway {
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the HTTP client cannot be built, or
    /// [`GatewayError::InvalidBaseUrl`] for a malformed backend URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, GatewayError> {
        let mut gateway = Self::build(
            &config.backend_url,
            &config.backend_anon_key,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        gateway.session.clone_from(&config.session);
        gateway.invoice_bucket.clone_from(&config.invoice_bucket);
        gateway.image_bucket.clone_from(&config.image_bucket);
        Ok(gateway)
    }

    /// Guest client against `base_url` with the default buckets.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the HTTP client cannot be built, or
    /// [`GatewayError::InvalidBaseUrl`] for a malformed backend URL.
    pub fn with_base_url(
        base_url: &str,
        anon_key: &str,
        timeout_secs: u64,
    ) -> Result<Self, GatewayError> {
        Self::build(base_url, anon_key, timeout_secs, DEFAULT_USER_AGENT)
    }

    #[must_use]
    pub fn with_session(mut self, session: BackendSession) -> Self {
        self.session = Some(session);
        self
    }

    fn build(
        base_url: &str,
        anon_key: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised)
            .map_err(|_| GatewayError::InvalidBaseUrl(base_url.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(GatewayError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url: parsed,
            anon_key: anon_key.to_owned(),
            session: None,
            invoice_bucket: DEFAULT_INVOICE_BUCKET.to_string(),
            image_bucket: DEFAULT_IMAGE_BUCKET.to_string(),
        })
    }

    /// Base URL joined with `segments`, each percent-encoded as one path
    /// segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn table_url(&self, table: &str, query: &[(&str, &str)]) -> Result<Url, GatewayError> {
        let mut url = self.endpoint(&["rest", "v1", table])?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in query {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Publicly readable URL of an uploaded object.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidBaseUrl`] if the base URL cannot take
    /// path segments.
    pub fn public_object_url(&self, bucket: &str, object: &str) -> Result<String, GatewayError> {
        self.endpoint(&["storage", "v1", "object", "public", bucket, object])
            .map(String::from)
    }

    fn bearer(&self) -> &str {
        self.session
            .as_ref()
            .map_or(self.anon_key.as_str(), |s| s.access_token.as_str())
    }

    fn require_session(&self, operation: &'static str) -> Result<&BackendSession, GatewayError> {
        self.session
            .as_ref()
            .ok_or(GatewayError::Unauthenticated(operation))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(self.bearer())
    }

    /// Sends the request and returns the body of a 2xx response.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Http`] on network failure.
    /// - [`GatewayError::NotFound`] for a 404.
    /// - [`GatewayError::UnexpectedStatus`] for any other non-2xx status.
    async fn send(&self, request: RequestBuilder, context: &str) -> Result<String, GatewayError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(GatewayError::NotFound { url });
        }
        if !status.is_success() {
            let mut body = body;
            if body.len() > ERROR_BODY_LIMIT {
                let mut cut = ERROR_BODY_LIMIT;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(GatewayError::UnexpectedStatus {
                status: status.as_u16(),
                url,
                body,
            });
        }

        tracing::debug!(context, status = status.as_u16(), "backend call succeeded");
        Ok(body)
    }

    fn decode<T: DeserializeOwned>(body: &str, context: &str) -> Result<T, GatewayError> {
        serde_json::from_str(body).map_err(|e| GatewayError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, GatewayError> {
        let url = self.table_url(table, query)?;
        let body = self.send(self.client.get(url), table).await?;
        Self::decode(&body, table)
    }

    async fn insert<B, T>(&self, table: &str, row: &B) -> Result<T, GatewayError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.table_url(table, &[])?;
        let request = self
            .client
            .post(url.clone())
            .header("Prefer", "return=representation")
            .json(row);
        let body = self.send(request, table).await?;
        Self::single_row(&body, &url, &format!("insert into {table}"))
    }

    async fn update<B, T>(&self, table: &str, id: &str, row: &B) -> Result<T, GatewayError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let filter = format!("eq.{id}");
        let url = self.table_url(table, &[("id", &filter)])?;
        let request = self
            .client
            .patch(url.clone())
            .header("Prefer", "return=representation")
            .json(row);
        let body = self.send(request, table).await?;
        Self::single_row(&body, &url, &format!("update {table}(id={id})"))
    }

    async fn delete(&self, table: &str, id: &str) -> Result<(), GatewayError> {
        let filter = format!("eq.{id}");
        let url = self.table_url(table, &[("id", &filter)])?;
        let request = self
            .client
            .delete(url.clone())
            .header("Prefer", "return=representation");
        let body = self.send(request, table).await?;
        let rows: Vec<serde_json::Value> =
            Self::decode(&body, &format!("delete from {table}(id={id})"))?;
        if rows.is_empty() {
            return Err(GatewayError::NotFound {
                url: url.to_string(),
            });
        }
        Ok(())
    }

    /// Mutations answer with an array of affected rows; an empty array means
    /// the filter matched nothing.
    fn single_row<T: DeserializeOwned>(
        body: &str,
        url: &Url,
        context: &str,
    ) -> Result<T, GatewayError> {
        let rows: Vec<T> = Self::decode(body, context)?;
        rows.into_iter().next().ok_or_else(|| GatewayError::NotFound {
            url: url.to_string(),
        })
    }

    async fn upload_object(
        &self,
        bucket: &str,
        object: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        let url = self.endpoint(&["storage", "v1", "object", bucket, object])?;
        let size = bytes.len();
        let request = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes);
        self.send(request, "storage upload").await?;
        tracing::debug!(bucket, object, size, "uploaded object");
        self.public_object_url(bucket, object)
    }

    async fn list_all_products(&self) -> Result<Vec<Product>, GatewayError> {
        self.select("products", &[("select", "*")]).await
    }

    async fn list_orders(&self) -> Result<Vec<OrderRow>, GatewayError> {
        self.select("orders", &[("select", "id,total,status,created_at")])
            .await
    }

    async fn count_page_visits(&self) -> Result<usize, GatewayError> {
        let rows: Vec<serde_json::Value> =
            self.select("page_visits", &[("select", "id")]).await?;
        Ok(rows.len())
    }
}

#[async_trait]
impl StorefrontGateway for RestGateway {
    async fn list_public_products(&self) -> Result<Vec<Product>, GatewayError> {
        self.select(
            "products",
            &[
                ("select", "*"),
                ("is_active", "eq.true"),
                ("order", "created_at.desc"),
            ],
        )
        .await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError> {
        self.select("categories", &[("select", "*"), ("order", "name.asc")])
            .await
    }

    async fn list_sales(&self) -> Result<Vec<Sale>, GatewayError> {
        self.select("sales", &[("select", "*"), ("order", "created_at.desc")])
            .await
    }

    async fn create_product(&self, draft: &ProductDraft) -> Result<Product, GatewayError> {
        self.require_session("create_product")?;
        let product: Product = self.insert("products", draft).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "created product");
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &str,
        draft: &ProductDraft,
    ) -> Result<Product, GatewayError> {
        self.require_session("update_product")?;
        self.update("products", id, draft).await
    }

    async fn delete_product(&self, id: &str) -> Result<(), GatewayError> {
        self.require_session("delete_product")?;
        self.delete("products", id).await?;
        tracing::info!(product_id = id, "deleted product");
        Ok(())
    }

    async fn create_sale(&self, draft: &SaleDraft) -> Result<Sale, GatewayError> {
        self.require_session("create_sale")?;
        draft.validate().map_err(GatewayError::InvalidSale)?;
        let sale: Sale = self.insert("sales", draft).await?;
        tracing::info!(sale_id = %sale.id, name = %sale.name, "created sale");
        Ok(sale)
    }

    async fn update_sale(&self, id: &str, draft: &SaleDraft) -> Result<Sale, GatewayError> {
        self.require_session("update_sale")?;
        draft.validate().map_err(GatewayError::InvalidSale)?;
        self.update("sales", id, draft).await
    }

    async fn delete_sale(&self, id: &str) -> Result<(), GatewayError> {
        self.require_session("delete_sale")?;
        self.delete("sales", id).await?;
        tracing::info!(sale_id = id, "deleted sale");
        Ok(())
    }

    async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        self.require_session("upload_image")?;
        self.upload_object(&self.image_bucket, file_name, bytes, content_type)
            .await
    }

    async fn upload_invoice(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, GatewayError> {
        self.upload_object(&self.invoice_bucket, file_name, bytes, "application/pdf")
            .await
    }

    async fn submit_review(&self, product_id: &str, rating: u8) -> Result<(), GatewayError> {
        let session = self.require_session("submit_review")?;
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating).into());
        }
        let url = self.table_url("reviews", &[("on_conflict", "product_id,user_id")])?;
        let request = self
            .client
            .post(url)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&serde_json::json!({
                "product_id": product_id,
                "user_id": session.user_id,
                "rating": rating,
            }));
        self.send(request, "reviews").await?;
        Ok(())
    }

    async fn get_user_review(&self, product_id: &str) -> Result<Option<u8>, GatewayError> {
        let session = self.require_session("get_user_review")?;
        let product_filter = format!("eq.{product_id}");
        let user_filter = format!("eq.{}", session.user_id);
        let rows: Vec<RatingRow> = self
            .select(
                "reviews",
                &[
                    ("select", "rating"),
                    ("product_id", &product_filter),
                    ("user_id", &user_filter),
                    ("limit", "1"),
                ],
            )
            .await?;
        Ok(rows.first().map(|r| r.rating))
    }

    async fn get_dashboard_stats(&self) -> Result<DashboardStats, GatewayError> {
        self.require_session("get_dashboard_stats")?;
        let (products, sales, orders, page_visits) = futures::try_join!(
            self.list_all_products(),
            self.list_sales(),
            self.list_orders(),
            self.count_page_visits(),
        )?;
        Ok(summarize(
            &products,
            &sales,
            &orders,
            page_visits,
            chrono::Utc::now(),
        ))
    }

    async fn record_visit(&self, page_path: &str) -> Result<(), GatewayError> {
        let url = self.table_url("page_visits", &[])?;
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=minimal")
            .json(&serde_json::json!({ "page_path": page_path }));
        self.send(request, "page_visits").await?;
        Ok(())
    }

    fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
