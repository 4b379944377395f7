use crate::storage::{keys, load_json, save_json, LocalStore, StorageError};

/// Saved product ids, kept in the order they were first added.
#[derive(Debug)]
pub struct WishlistStore<S: LocalStore> {
    ids: Vec<String>,
    store: S,
}

impl<S: LocalStore> WishlistStore<S> {
    /// Rehydrate from `store`; unreadable snapshots start empty and repeated
    /// ids keep their first position.
    pub fn load(store: S) -> Self {
        let stored: Vec<String> = load_json(&store, keys::WISHLIST);
        let mut ids: Vec<String> = Vec::with_capacity(stored.len());
        for id in stored {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { ids, store }
    }

    /// Add `product_id` if absent, remove it if present. Returns whether the
    /// product is saved afterwards. Nothing changes in memory unless the
    /// snapshot write succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the snapshot cannot be written.
    pub fn toggle(&mut self, product_id: &str) -> Result<bool, StorageError> {
        let mut next = self.ids.clone();
        let saved = if let Some(pos) = next.iter().position(|id| id == product_id) {
            next.remove(pos);
            false
        } else {
            next.push(product_id.to_string());
            true
        };
        save_json(&self.store, keys::WISHLIST, &next)?;
        self.ids = next;
        Ok(saved)
    }

    #[must_use]
    pub fn contains(&self, product_id: &str) -> bool {
        self.ids.iter().any(|id| id == product_id)
    }

    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
