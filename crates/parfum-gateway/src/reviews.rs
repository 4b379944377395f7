//! Product ratings with a local fallback for guests.
//!
//! Signed-in shoppers rate through the backend. Guests keep their ratings in
//! local storage under [`keys::GUEST_REVIEWS`]; those are never synced.

use std::collections::BTreeMap;

use parfum_core::storage::{keys, load_json, save_json};
use parfum_core::{LocalStore, ValidationError};

use crate::error::GatewayError;
use crate::gateway::StorefrontGateway;

/// Where a rating was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingScope {
    Account,
    Guest,
}

pub struct RatingBook<'a, G: StorefrontGateway + ?Sized, S: LocalStore> {
    gateway: &'a G,
    store: S,
}

impl<'a, G: StorefrontGateway + ?Sized, S: LocalStore> RatingBook<'a, G, S> {
    pub fn new(gateway: &'a G, store: S) -> Self {
        Self { gateway, store }
    }

    fn guest_ratings(&self) -> BTreeMap<String, u8> {
        load_json(&self.store, keys::GUEST_REVIEWS)
    }

    /// Record `rating` for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for a rating outside 1 to 5,
    /// otherwise whatever the backend call or the local write reports.
    pub async fn rate(&self, product_id: &str, rating: u8) -> Result<RatingScope, GatewayError> {
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::RatingOutOfRange(rating).into());
        }
        if self.gateway.is_authenticated() {
            self.gateway.submit_review(product_id, rating).await?;
            return Ok(RatingScope::Account);
        }
        let mut ratings = self.guest_ratings();
        ratings.insert(product_id.to_string(), rating);
        save_json(&self.store, keys::GUEST_REVIEWS, &ratings)?;
        Ok(RatingScope::Guest)
    }

    /// The caller's own rating for `product_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns the backend error for signed-in callers. Guest lookups do not
    /// fail.
    pub async fn rating_for(&self, product_id: &str) -> Result<Option<u8>, GatewayError> {
        if self.gateway.is_authenticated() {
            return self.gateway.get_user_review(product_id).await;
        }
        Ok(self.guest_ratings().get(product_id).copied())
    }
}
