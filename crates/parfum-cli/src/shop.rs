//! Per-process handles shared by every command.

use parfum_core::{
    load_storefront, AppConfig, CartStore, FileStore, SessionState, StorefrontProfile,
    WishlistStore,
};
use parfum_gateway::{track_visit, RatingBook, RestGateway};
use parfum_invoice::format_amount;
use rust_decimal::Decimal;

/// Everything a command handler needs: configuration, the storefront profile,
/// the backend client, and the local stores.
///
/// The session lives for one process, so the intro banner and visit
/// de-duplication reset on every invocation.
pub(crate) struct Shop {
    pub(crate) config: AppConfig,
    pub(crate) profile: StorefrontProfile,
    pub(crate) gateway: RestGateway,
    store: FileStore,
    session: SessionState,
}

impl Shop {
    pub(crate) fn open(config: AppConfig) -> anyhow::Result<Self> {
        let profile = load_storefront(&config.storefront_path)?;
        let gateway = RestGateway::from_config(&config)?;
        let store = FileStore::new(config.storage_path());
        tracing::debug!(
            storefront = %profile.brand_name,
            storage = %store.path().display(),
            signed_in = config.session.is_some(),
            "shop opened"
        );
        Ok(Self {
            config,
            profile,
            gateway,
            store,
            session: SessionState::in_memory(),
        })
    }

    pub(crate) fn cart(&self) -> CartStore<FileStore> {
        CartStore::load(self.store.clone())
    }

    pub(crate) fn wishlist(&self) -> WishlistStore<FileStore> {
        WishlistStore::load(self.store.clone())
    }

    pub(crate) fn ratings(&self) -> RatingBook<'_, RestGateway, FileStore> {
        RatingBook::new(&self.gateway, self.store.clone())
    }

    pub(crate) async fn visit(&self, page_path: &str) {
        track_visit(&self.gateway, &self.session, page_path).await;
    }

    /// Print the brand banner once per session.
    pub(crate) fn show_intro(&self) {
        if self.session.intro_seen() {
            return;
        }
        println!("{}", self.profile.brand_name);
        if let Some(tagline) = &self.profile.tagline {
            println!("{tagline}");
        }
        println!();
        if let Err(e) = self.session.mark_intro_seen() {
            tracing::warn!(error = %e, "could not record intro flag");
        }
    }

    pub(crate) fn money(&self, amount: Decimal) -> String {
        format!("{} {}", self.profile.currency_code, format_amount(Some(amount)))
    }
}
