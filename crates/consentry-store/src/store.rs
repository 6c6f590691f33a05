//! The consent store: one persisted record, explicit observer list.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use consentry_core::{ConsentChoices, ConsentConfig, ConsentRecord, Result};

use crate::backend::{MemoryBackend, StorageBackend};
use crate::sqlite::SqliteBackend;

/// Handle returned by [`ConsentStore::subscribe`]; pass it back to
/// [`ConsentStore::unsubscribe`] to deregister the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(Option<&ConsentRecord>) + Send + Sync>;

/// Reads and writes the persisted [`ConsentRecord`] under a fixed namespace
/// key, and notifies subscribers of every change.
///
/// The record is overwritten whole on every save, never merged. Listeners
/// run synchronously inside `write`/`revoke`, in subscription order, and are
/// never deregistered automatically: a host that re-mounts UI repeatedly
/// must unsubscribe its old listeners.
pub struct ConsentStore {
    backend: Box<dyn StorageBackend>,
    key: String,
    user_agent: Option<String>,
    listeners: RwLock<Vec<(SubscriptionId, Listener)>>,
    next_listener_id: AtomicU64,
}

impl ConsentStore {
    /// Create a store over an explicit backend.
    pub fn new(backend: Box<dyn StorageBackend>, config: &ConsentConfig) -> Self {
        info!("ConsentStore initialized: namespace={}", config.namespace);
        Self {
            backend,
            key: config.namespace.clone(),
            user_agent: config.user_agent.clone(),
            listeners: RwLock::new(Vec::new()),
            next_listener_id: AtomicU64::new(0),
        }
    }

    /// Create a store with no durability, persisting only in memory.
    pub fn in_memory(config: &ConsentConfig) -> Self {
        Self::new(Box::new(MemoryBackend::new()), config)
    }

    /// Open a store over the durable SQLite backend at `config.data_dir`.
    pub fn open(config: &ConsentConfig) -> Result<Self> {
        let backend = SqliteBackend::open(&config.data_dir)?;
        Ok(Self::new(Box::new(backend), config))
    }

    /// The currently persisted record, or `None` when no decision has been
    /// saved. Unreadable or malformed data is treated as absent, never
    /// raised as an error.
    pub fn read(&self) -> Option<ConsentRecord> {
        let raw = match self.backend.load(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Consent read failed, treating as no decision: {}", e);
                return None;
            }
        };
        match ConsentRecord::from_json(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Discarding malformed consent record: {}", e);
                None
            }
        }
    }

    /// Persist a new decision and notify subscribers with the stored record.
    ///
    /// `essential` is forced to `true` regardless of input. If the backend
    /// write fails the record is not updated, no subscriber is notified, and
    /// the error is returned.
    pub fn write(&self, choices: ConsentChoices) -> Result<ConsentRecord> {
        let record = ConsentRecord::new(choices, self.user_agent.clone());
        let payload = record.to_json()?;
        self.backend.save(&self.key, &payload)?;

        let granted = record.choices.values().filter(|v| **v).count();
        info!(
            "Consent saved: {}/{} categories granted",
            granted,
            record.choices.len()
        );
        self.notify(Some(&record));
        Ok(record)
    }

    /// Delete the persisted decision and notify subscribers with `None`.
    pub fn revoke(&self) -> Result<()> {
        self.backend.remove(&self.key)?;
        info!("Consent revoked");
        self.notify(None);
        Ok(())
    }

    /// Whether the persisted record grants a category. Total: `false` when
    /// no record exists or the id is unknown.
    pub fn has_consent(&self, category_id: &str) -> bool {
        self.read().map(|r| r.allows(category_id)).unwrap_or(false)
    }

    /// Register a change listener, invoked on every `write`/`revoke` in
    /// registration order for the lifetime of the store.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(Option<&ConsentRecord>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_listener_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.write().push((id, Arc::new(listener)));
        id
    }

    /// Deregister a listener. Returns `false` if the id was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.write();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.read().len()
    }

    /// Invoke listeners in subscription order. The list is snapshotted
    /// first so a listener may unsubscribe itself (or register others)
    /// from within its callback.
    fn notify(&self, record: Option<&ConsentRecord>) {
        let snapshot: Vec<Listener> = self
            .listeners
            .read()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in snapshot {
            listener(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consentry_core::{Error, ANALYTICS, ESSENTIAL};
    use parking_lot::Mutex;

    struct FailingBackend;

    impl StorageBackend for FailingBackend {
        fn load(&self, _key: &str) -> Result<Option<String>> {
            Err(Error::Persistence("storage unavailable".to_string()))
        }
        fn save(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Persistence("quota exceeded".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<()> {
            Err(Error::Persistence("storage unavailable".to_string()))
        }
    }

    fn memory_store() -> ConsentStore {
        ConsentStore::in_memory(&ConsentConfig::default())
    }

    fn choices(analytics: bool) -> ConsentChoices {
        let mut c = ConsentChoices::new();
        c.insert(ANALYTICS.to_string(), analytics);
        c
    }

    #[test]
    fn test_write_read_round_trip_forces_essential() {
        let store = memory_store();
        let mut input = choices(true);
        input.insert(ESSENTIAL.to_string(), false);
        let written = store.write(input).unwrap();
        assert!(written.allows(ESSENTIAL));

        let read = store.read().unwrap();
        assert_eq!(read, written);
        assert!(read.allows(ANALYTICS));
    }

    #[test]
    fn test_no_record_means_no_consent() {
        let store = memory_store();
        assert!(store.read().is_none());
        assert!(!store.has_consent(ANALYTICS));
        assert!(!store.has_consent(ESSENTIAL));
    }

    #[test]
    fn test_unknown_category_is_false_not_error() {
        let store = memory_store();
        store.write(choices(true)).unwrap();
        assert!(!store.has_consent("marketing"));
    }

    #[test]
    fn test_revoke_deletes_record() {
        let store = memory_store();
        store.write(choices(true)).unwrap();
        store.revoke().unwrap();
        assert!(store.read().is_none());
        assert!(!store.has_consent(ANALYTICS));
    }

    #[test]
    fn test_malformed_record_reads_as_absent() {
        let backend = MemoryBackend::new();
        let config = ConsentConfig::default();
        backend.save(&config.namespace, "{{{ not json").unwrap();
        let store = ConsentStore::new(Box::new(backend), &config);
        assert!(store.read().is_none());
        assert!(!store.has_consent(ANALYTICS));
    }

    #[test]
    fn test_subscribers_fire_in_order() {
        let store = memory_store();
        let seen: Arc<Mutex<Vec<(&str, bool)>>> = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&seen);
        store.subscribe(move |record| {
            first
                .lock()
                .push(("first", record.map(|r| r.allows(ANALYTICS)).unwrap_or(false)));
        });
        let second = Arc::clone(&seen);
        store.subscribe(move |record| {
            second
                .lock()
                .push(("second", record.map(|r| r.allows(ANALYTICS)).unwrap_or(false)));
        });

        store.write(choices(true)).unwrap();
        store.revoke().unwrap();

        let seen = seen.lock();
        assert_eq!(
            *seen,
            vec![
                ("first", true),
                ("second", true),
                ("first", false),
                ("second", false),
            ]
        );
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let store = memory_store();
        let count = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&count);
        let id = store.subscribe(move |_| *counter.lock() += 1);

        store.write(choices(false)).unwrap();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.write(choices(true)).unwrap();

        assert_eq!(*count.lock(), 1);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_failed_write_surfaces_and_does_not_notify() {
        let config = ConsentConfig::default();
        let store = ConsentStore::new(Box::new(FailingBackend), &config);
        let fired = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&fired);
        store.subscribe(move |_| *flag.lock() = true);

        let result = store.write(choices(true));
        assert!(matches!(result, Err(Error::Persistence(_))));
        assert!(!*fired.lock());
        assert!(matches!(store.revoke(), Err(Error::Persistence(_))));
        assert!(!*fired.lock());
    }

    #[test]
    fn test_unreadable_backend_degrades_to_no_decision() {
        let store = ConsentStore::new(Box::new(FailingBackend), &ConsentConfig::default());
        assert!(store.read().is_none());
        assert!(!store.has_consent(ANALYTICS));
    }
}
