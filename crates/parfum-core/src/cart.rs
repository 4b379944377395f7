//! The shopping cart store.
//!
//! Lines are keyed by `(product_id, variant_id)`. Every mutation writes the
//! full snapshot to the [`LocalStore`] first and only then updates memory.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pricing::PriceQuote;
use crate::products::{Product, Variant};
use crate::storage::{keys, load_json, save_json, LocalStore, StorageError};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// One product variant held in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub product_id: String,
    pub variant_id: String,
    pub name: String,
    pub brand: String,
    pub image: Option<String>,
    pub size: String,
    /// Effective price at the moment the line was added.
    pub unit_price: Decimal,
    pub quantity: u32,
    /// Pre-discount price; present only when a sale applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
}

impl CartLineItem {
    /// Build a line for `variant` of `product` at the quoted price.
    #[must_use]
    pub fn from_quote(
        product: &Product,
        variant: &Variant,
        quote: &PriceQuote,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product.id.clone(),
            variant_id: variant.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            image: product.primary_image().map(str::to_string),
            size: variant.size.clone(),
            unit_price: quote.effective_price,
            quantity,
            original_price: quote.original_price,
        }
    }

    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    fn is_same_line(&self, product_id: &str, variant_id: &str) -> bool {
        self.product_id == product_id && self.variant_id == variant_id
    }
}

/// Cart state plus the store it persists to.
#[derive(Debug)]
pub struct CartStore<S: LocalStore> {
    lines: Vec<CartLineItem>,
    store: S,
}

impl<S: LocalStore> CartStore<S> {
    /// Rehydrate the cart from `store`.
    ///
    /// A missing or unparseable snapshot yields an empty cart. Duplicate
    /// lines in a hand-edited snapshot are merged and zero quantities are
    /// raised to 1.
    pub fn load(store: S) -> Self {
        let stored: Vec<CartLineItem> = load_json(&store, keys::CART);
        let mut lines: Vec<CartLineItem> = Vec::with_capacity(stored.len());
        for mut line in stored {
            line.quantity = line.quantity.max(1);
            match lines
                .iter_mut()
                .find(|l| l.is_same_line(&line.product_id, &line.variant_id))
            {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => lines.push(line),
            }
        }
        Self { lines, store }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn find(&self, product_id: &str, variant_id: &str) -> Option<&CartLineItem> {
        self.lines
            .iter()
            .find(|l| l.is_same_line(product_id, variant_id))
    }

    /// Sum of quantities across all lines (the cart badge number).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0u32, |acc, l| acc.saturating_add(l.quantity))
    }

    /// Σ `unit_price × quantity` over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLineItem::line_total).sum()
    }

    /// Add `item`, merging its quantity into an existing line for the same
    /// product variant.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for a zero quantity, or
    /// [`CartError::Storage`] if the snapshot cannot be written.
    pub fn add_item(&mut self, item: CartLineItem) -> Result<(), CartError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let mut next = self.lines.clone();
        match next
            .iter_mut()
            .find(|l| l.is_same_line(&item.product_id, &item.variant_id))
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => next.push(item),
        }
        self.commit(next)
    }

    /// Shift a line's quantity by `delta`, never below 1. Unknown lines are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the snapshot cannot be written.
    pub fn update_quantity(
        &mut self,
        product_id: &str,
        variant_id: &str,
        delta: i32,
    ) -> Result<(), CartError> {
        let Some(pos) = self
            .lines
            .iter()
            .position(|l| l.is_same_line(product_id, variant_id))
        else {
            return Ok(());
        };
        let mut next = self.lines.clone();
        let line = &mut next[pos];
        let quantity = (i64::from(line.quantity) + i64::from(delta)).clamp(1, i64::from(u32::MAX));
        line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        self.commit(next)
    }

    /// Delete a line if present.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the snapshot cannot be written.
    pub fn remove_item(&mut self, product_id: &str, variant_id: &str) -> Result<(), CartError> {
        let next: Vec<CartLineItem> = self
            .lines
            .iter()
            .filter(|l| !l.is_same_line(product_id, variant_id))
            .cloned()
            .collect();
        if next.len() == self.lines.len() {
            return Ok(());
        }
        self.commit(next)
    }

    /// Empty the cart, typically after a successful checkout handoff.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the snapshot cannot be written.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.commit(Vec::new())
    }

    /// Write `next` to the store, then adopt it. A failed write leaves the
    /// in-memory lines as they were.
    fn commit(&mut self, next: Vec<CartLineItem>) -> Result<(), CartError> {
        save_json(&self.store, keys::CART, &next)?;
        self.lines = next;
        Ok(())
    }
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
