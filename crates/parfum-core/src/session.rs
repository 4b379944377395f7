use crate::storage::{keys, LocalStore, MemoryStore, StorageError};

/// Flags that live for one browsing session: whether the brand intro was
/// shown and which page paths already recorded a visit.
#[derive(Debug, Clone, Default)]
pub struct SessionState<S: LocalStore = MemoryStore> {
    store: S,
}

impl SessionState<MemoryStore> {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }
}

impl<S: LocalStore> SessionState<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn intro_seen(&self) -> bool {
        self.store.get(keys::INTRO_SEEN).is_some()
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if the flag cannot be written.
    pub fn mark_intro_seen(&self) -> Result<(), StorageError> {
        self.store.set(keys::INTRO_SEEN, "true")
    }

    /// Returns `true` the first time `page_path` is seen this session and
    /// sets its de-dupe flag. A failed write still counts as first visit.
    pub fn first_visit(&self, page_path: &str) -> bool {
        let key = keys::visited(page_path);
        if self.store.get(&key).is_some() {
            return false;
        }
        if let Err(e) = self.store.set(&key, "true") {
            tracing::warn!(page_path, error = %e, "could not persist visit flag");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intro_flag_sticks_for_the_session() {
        let session = SessionState::in_memory();
        assert!(!session.intro_seen());
        session.mark_intro_seen().unwrap();
        assert!(session.intro_seen());
    }

    #[test]
    fn visits_are_deduplicated_per_path() {
        let session = SessionState::in_memory();
        assert!(session.first_visit("/"));
        assert!(!session.first_visit("/"));
        assert!(session.first_visit("/shop"));
    }

    #[test]
    fn new_session_starts_clean() {
        let first = SessionState::in_memory();
        first.first_visit("/");
        first.mark_intro_seen().unwrap();

        let second = SessionState::in_memory();
        assert!(!second.intro_seen());
        assert!(second.first_visit("/"));
    }
}
