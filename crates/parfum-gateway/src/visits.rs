use parfum_core::{LocalStore, SessionState};

use crate::gateway::StorefrontGateway;

/// Record a visit to `page_path` unless this session already did.
///
/// Returns `true` when a visit was recorded. Backend failures are logged and
/// swallowed: visit counting never blocks browsing.
pub async fn track_visit<G, S>(gateway: &G, session: &SessionState<S>, page_path: &str) -> bool
where
    G: StorefrontGateway + ?Sized,
    S: LocalStore,
{
    if !session.first_visit(page_path) {
        return false;
    }
    match gateway.record_visit(page_path).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(page_path, error = %e, "failed to record page visit");
            false
        }
    }
}
