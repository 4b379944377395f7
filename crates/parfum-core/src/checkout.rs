//! Checkout model: customer details, order ids and the order summary handed
//! to the invoice renderer and the order composer.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cart::CartLineItem;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("customer name is required")]
    MissingName,

    #[error("customer phone is required")]
    MissingPhone,

    #[error("cart is empty")]
    EmptyCart,

    #[error("rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),
}

/// Contact details collected by the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CustomerInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }

    /// Trim every field and turn blank optional fields into `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: non_blank(self.email),
            address: non_blank(self.address),
            notes: non_blank(self.notes),
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::MissingName`] or
    /// [`ValidationError::MissingPhone`] when the field is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.phone.trim().is_empty() {
            return Err(ValidationError::MissingPhone);
        }
        Ok(())
    }
}

/// `{prefix}-{4 digits}`.
///
/// Ids are drawn at random with no uniqueness check, so two orders can share
/// one. Treat them as human-facing references, not keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(String);

impl OrderId {
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        let n: u16 = rand::rng().random_range(0..10_000);
        Self::from_number(prefix, n)
    }

    /// Build an id from a known number; only the low four digits are kept.
    #[must_use]
    pub fn from_number(prefix: &str, n: u16) -> Self {
        Self(format!("{prefix}-{:04}", n % 10_000))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the invoice and the chat message are built from. Never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub customer: CustomerInfo,
    pub items: Vec<CartLineItem>,
    /// `None` renders as `0.00`.
    pub total: Option<Decimal>,
    pub placed_at: DateTime<Utc>,
}

impl OrderSummary {
    /// Validate the customer and the cart, then assign a fresh order id.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a blank name or phone, or an empty
    /// cart. Nothing is generated in that case.
    pub fn prepare(
        customer: CustomerInfo,
        items: Vec<CartLineItem>,
        order_prefix: &str,
        placed_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let customer = customer.normalized();
        customer.validate()?;
        if items.is_empty() {
            return Err(ValidationError::EmptyCart);
        }
        let total = items.iter().map(CartLineItem::line_total).sum();
        Ok(Self {
            order_id: OrderId::generate(order_prefix),
            customer,
            items,
            total: Some(total),
            placed_at,
        })
    }

    /// Storage object name for the rendered invoice.
    #[must_use]
    pub fn invoice_file_name(&self) -> String {
        format!("{}-{}.pdf", self.order_id, self.placed_at.timestamp_millis())
    }

    /// Long-form date printed on the invoice, e.g. `18 October 2026`.
    #[must_use]
    pub fn date_label(&self) -> String {
        self.placed_at.format("%-d %B %Y").to_string()
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }
}
