use chrono::{DateTime, Utc};
use parfum_core::{AppliesTo, DiscountType, FragranceNotes, Sale, Variant};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Product fields sent on admin create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    #[serde(default, deserialize_with = "parfum_core::nullable::or_default")]
    pub notes: FragranceNotes,
    #[serde(default, deserialize_with = "parfum_core::nullable::or_default")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "parfum_core::nullable::or_default")]
    pub variants: Vec<Variant>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl ProductDraft {
    /// # Errors
    ///
    /// Returns a reason when the name or brand is blank, or a variant has an
    /// empty id or a negative price.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("product name must be non-empty".to_string());
        }
        if self.brand.trim().is_empty() {
            return Err("brand must be non-empty".to_string());
        }
        for variant in &self.variants {
            if variant.id.trim().is_empty() {
                return Err("variant id must be non-empty".to_string());
            }
            if variant.price.is_sign_negative() {
                return Err(format!("variant {} has a negative price", variant.id));
            }
        }
        Ok(())
    }
}

/// Sale fields sent on admin create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDraft {
    pub name: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "parfum_core::nullable::or_default")]
    pub is_permanent: bool,
    pub applies_to: AppliesTo,
    #[serde(default, deserialize_with = "parfum_core::nullable::or_default")]
    pub target_ids: Vec<String>,
}

impl SaleDraft {
    #[must_use]
    pub fn to_sale(&self, id: &str) -> Sale {
        Sale {
            id: id.to_string(),
            name: self.name.clone(),
            discount_type: self.discount_type,
            discount_value: self.discount_value,
            is_active: self.is_active,
            start_date: self.start_date,
            end_date: self.end_date,
            is_permanent: self.is_permanent,
            applies_to: self.applies_to,
            target_ids: self.target_ids.clone(),
        }
    }

    /// # Errors
    ///
    /// Returns the first rule the draft breaks, see [`Sale::validate`].
    pub fn validate(&self) -> Result<(), String> {
        self.to_sale("").validate()
    }
}

/// Order row as read for the dashboard. Orders are written by the backend's
/// own order intake, never by this client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderRow {
    pub id: String,
    pub total: Option<Decimal>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl OrderRow {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("cancelled"))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RatingRow {
    pub rating: u8,
}

/// Admin dashboard figures, reduced client-side from several collections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_products: usize,
    pub active_products: usize,
    pub total_variants: usize,
    /// Variants with stock at or below the low-stock threshold.
    pub low_stock_variants: usize,
    pub out_of_stock_variants: usize,
    pub live_sales: usize,
    /// Orders that were not cancelled.
    pub order_count: usize,
    pub revenue: Decimal,
    pub average_order_value: Decimal,
    pub page_visits: usize,
}
