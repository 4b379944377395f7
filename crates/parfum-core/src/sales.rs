use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::products::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

impl std::fmt::Display for DiscountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscountType::Percentage => write!(f, "percentage"),
            DiscountType::Fixed => write!(f, "fixed"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliesTo {
    All,
    SpecificProducts,
    SpecificCategories,
}

impl std::fmt::Display for AppliesTo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppliesTo::All => write!(f, "all"),
            AppliesTo::SpecificProducts => write!(f, "specific_products"),
            AppliesTo::SpecificCategories => write!(f, "specific_categories"),
        }
    }
}

/// Where a sale sits relative to its schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleStatus {
    Live,
    Scheduled,
    Expired,
    Inactive,
}

impl std::fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaleStatus::Live => write!(f, "live"),
            SaleStatus::Scheduled => write!(f, "scheduled"),
            SaleStatus::Expired => write!(f, "expired"),
            SaleStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// A discount campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub name: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub is_active: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub is_permanent: bool,
    pub applies_to: AppliesTo,
    /// Product or category ids, depending on `applies_to`. Ignored for `All`.
    #[serde(default, deserialize_with = "crate::nullable::or_default")]
    pub target_ids: Vec<String>,
}

impl Sale {
    /// Returns `true` if this sale's targeting rule covers `product`.
    ///
    /// A `specific_*` sale with no targets covers nothing.
    #[must_use]
    pub fn applies_to_product(&self, product: &Product) -> bool {
        match self.applies_to {
            AppliesTo::All => true,
            AppliesTo::SpecificProducts => self.target_ids.iter().any(|id| *id == product.id),
            AppliesTo::SpecificCategories => product
                .category_id
                .as_deref()
                .is_some_and(|cat| self.target_ids.iter().any(|id| id == cat)),
        }
    }

    /// Schedule status at `now`, for admin listings.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> SaleStatus {
        if !self.is_active {
            return SaleStatus::Inactive;
        }
        if self.is_permanent {
            return SaleStatus::Live;
        }
        if self.start_date.is_some_and(|start| now < start) {
            return SaleStatus::Scheduled;
        }
        if self.end_date.is_some_and(|end| now > end) {
            return SaleStatus::Expired;
        }
        SaleStatus::Live
    }

    /// Checks the invariants an admin-created sale must satisfy.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason for the first violated rule.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("sale name must be non-empty".to_string());
        }
        if self.discount_value.is_sign_negative() {
            return Err("discount value must not be negative".to_string());
        }
        if self.discount_type == DiscountType::Percentage
            && self.discount_value > Decimal::ONE_HUNDRED
        {
            return Err("percentage discount must not exceed 100".to_string());
        }
        if self.applies_to != AppliesTo::All && self.target_ids.is_empty() {
            return Err(format!(
                "a {} sale needs at least one target id",
                self.applies_to
            ));
        }
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err("start date must not be after end date".to_string());
            }
        }
        Ok(())
    }
}
