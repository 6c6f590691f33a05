//! One-shot gating of deferred loaders on a consent category.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing::debug;

use consentry_core::ANALYTICS;

use crate::store::{ConsentStore, SubscriptionId};

type LoaderSlot = Arc<Mutex<Option<Box<dyn FnOnce() + Send>>>>;

impl ConsentStore {
    /// Run `loader` exactly once, as soon as `category_id` is granted.
    ///
    /// If consent already exists the loader runs immediately. Otherwise a
    /// one-shot listener waits for the first change notification that grants
    /// the category, runs the loader, and deregisters itself; later writes
    /// with the category still granted never fire it again. Scripts loaded
    /// through this gate must not be loaded twice.
    pub fn load_when_granted<F>(self: &Arc<Self>, category_id: &str, loader: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.has_consent(category_id) {
            debug!("Consent for {} already present, running loader", category_id);
            loader();
            return;
        }

        let slot: LoaderSlot = Arc::new(Mutex::new(Some(Box::new(loader))));
        let id_cell: Arc<OnceCell<SubscriptionId>> = Arc::new(OnceCell::new());
        let category = category_id.to_string();
        let store = Arc::downgrade(self);

        let cb_id_cell = Arc::clone(&id_cell);
        let id = self.subscribe(move |record| {
            let granted = record.map(|r| r.allows(&category)).unwrap_or(false);
            if !granted {
                return;
            }
            if let Some(loader) = slot.lock().take() {
                debug!("Consent for {} granted, running deferred loader", category);
                loader();
            }
            if let (Some(store), Some(id)) = (store.upgrade(), cb_id_cell.get().copied()) {
                store.unsubscribe(id);
            }
        });
        let _ = id_cell.set(id);
        debug!("Deferred loader registered for category {}", category_id);
    }

    /// Gate for the analytics category, mirroring the page-script helper:
    /// call with a closure that injects the analytics script.
    pub fn load_analytics_if_allowed<F>(self: &Arc<Self>, loader: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.load_when_granted(ANALYTICS, loader);
    }
}
