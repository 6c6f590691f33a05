//! Key-value storage backends for consent records.

use std::collections::HashMap;

use parking_lot::Mutex;

use consentry_core::Result;

/// Durable key-value persistence for one serialized record per key.
///
/// Implementations report failures (quota, locked database, denied storage)
/// through `Err`; a failed `save` or `remove` must never look like success.
pub trait StorageBackend: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory backend. No durability; used in tests and embedded hosts that
/// manage persistence themselves.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}
