//! Blob store abstraction and the in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Well-known storage keys. Each is independently resettable.
pub mod keys {
    /// Call registry snapshot (JSON array wrapped in a versioned envelope).
    pub const CALLS: &str = "service_manager_calls";
    /// Edited knowledge-base procedures.
    pub const PROCEDURES: &str = "kb_procedures_data";
    /// Edited troubleshooting flow.
    pub const CHECKLIST: &str = "kb_checklist_data";
    /// IP lookup history.
    pub const SEARCH_HISTORY: &str = "search_history";
}

/// String-keyed JSON blob store.
///
/// Implementations log and swallow their own failures: persistence trouble
/// must never interrupt the primary flow, the worst case is state that does
/// not survive a restart.
pub trait BlobStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn put(&self, key: &str, value: String);
    fn remove(&self, key: &str);
}

impl<S> BlobStore for Arc<S>
where
    S: BlobStore + ?Sized,
{
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: String) {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().ok()?;
        map.get(key).cloned()
    }

    fn put(&self, key: &str, value: String) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(key.to_string(), value);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.inner.write() {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_remove_round_trip() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get("k"), None);
        store.put("k", "v1".into());
        store.put("k", "v2".into());
        assert_eq!(store.get("k").as_deref(), Some("v2"));
        store.remove("k");
        assert_eq!(store.get("k"), None);
    }
}
