//! Persistent history of generated (posts, image) pairs.
//!
//! The whole sequence lives under a single key and is rewritten on every mutation.
//! Store failures are logged and swallowed: the in-memory list stays authoritative.

use crate::domain::{DomainError, HistoryEntry};
use crate::ports::KeyValuePort;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Fixed key of the history blob.
pub const HISTORY_KEY: &str = "postx-history";

pub struct HistoryStore {
    kv: Arc<dyn KeyValuePort>,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl HistoryStore {
    /// Load the history. Absent or unreadable data yields an empty history.
    pub async fn load(kv: Arc<dyn KeyValuePort>) -> Self {
        let entries = Self::read(kv.as_ref()).await.unwrap_or_else(|e| {
            warn!(error = %e, "failed to load history, starting empty");
            Vec::new()
        });
        info!(entries = entries.len(), "history loaded");
        Self {
            kv,
            entries: Mutex::new(entries),
        }
    }

    async fn read(kv: &dyn KeyValuePort) -> Result<Vec<HistoryEntry>, DomainError> {
        match kv.get(HISTORY_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map_err(|e| DomainError::Persistence(format!("decode history: {}", e))),
            None => Ok(Vec::new()),
        }
    }

    /// Snapshot, newest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.lock().clone()
    }

    /// Prepend an entry and persist. A colliding id gets a numeric suffix.
    pub async fn append(&self, mut entry: HistoryEntry) {
        {
            let mut entries = self.entries.lock();
            let base = entry.id.clone();
            let mut n = 1;
            while entries.iter().any(|e| e.id == entry.id) {
                entry.id = format!("{}-{}", base, n);
                n += 1;
            }
            debug!(id = %entry.id, "history entry added");
            entries.insert(0, entry);
        }
        self.persist().await;
    }

    /// Drop every entry and persist. Callers confirm with the user first.
    pub async fn clear(&self) {
        self.entries.lock().clear();
        info!("history cleared");
        self.persist().await;
    }

    /// Overwrite the stored blob with the current sequence.
    pub async fn persist(&self) {
        if let Err(e) = self.try_persist().await {
            error!(error = %e, "failed to save history");
        }
    }

    async fn try_persist(&self) -> Result<(), DomainError> {
        let json = {
            let entries = self.entries.lock();
            serde_json::to_string(&*entries)
                .map_err(|e| DomainError::Persistence(format!("encode history: {}", e)))?
        };
        self.kv.set(HISTORY_KEY, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::MemoryKvStore;

    struct FailingKv;

    #[async_trait::async_trait]
    impl KeyValuePort for FailingKv {
        async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
            Err(DomainError::Persistence("storage disabled".into()))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<(), DomainError> {
            Err(DomainError::Persistence("quota exceeded".into()))
        }
    }

    fn entry(id: &str) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            timestamp: 1_704_067_200_000,
            posts: vec!["أول".into(), "تاني".into()],
            image_prompt: "a bakery storefront at dawn".into(),
            generated_image: "data:image/jpeg;base64,/9j/AA==".into(),
        }
    }

    #[tokio::test]
    async fn test_load_absent_is_empty() {
        let store = HistoryStore::load(Arc::new(MemoryKvStore::new())).await;
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_is_empty() {
        let kv = Arc::new(MemoryKvStore::with_value(HISTORY_KEY, "{not json"));
        let store = HistoryStore::load(kv).await;
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_load_unreadable_is_empty() {
        let store = HistoryStore::load(Arc::new(FailingKv)).await;
        assert!(store.entries().is_empty());
    }

    #[tokio::test]
    async fn test_persist_then_load_round_trip() {
        let kv: Arc<dyn KeyValuePort> = Arc::new(MemoryKvStore::new());
        let store = HistoryStore::load(Arc::clone(&kv)).await;
        store.append(entry("a")).await;
        store.append(entry("b")).await;

        let reloaded = HistoryStore::load(kv).await;
        assert_eq!(reloaded.entries(), store.entries());
        assert_eq!(reloaded.entries()[0].id, "b");
    }

    #[tokio::test]
    async fn test_clear_persists_empty() {
        let kv: Arc<dyn KeyValuePort> = Arc::new(MemoryKvStore::new());
        let store = HistoryStore::load(Arc::clone(&kv)).await;
        store.append(entry("a")).await;
        store.clear().await;

        assert_eq!(kv.get(HISTORY_KEY).await.unwrap().as_deref(), Some("[]"));
        assert!(HistoryStore::load(kv).await.entries().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_made_unique() {
        let store = HistoryStore::load(Arc::new(MemoryKvStore::new())).await;
        store.append(entry("same")).await;
        store.append(entry("same")).await;
        store.append(entry("same")).await;
        let ids: Vec<String> = store.entries().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["same-2", "same-1", "same"]);
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory() {
        let store = HistoryStore::load(Arc::new(FailingKv)).await;
        store.append(entry("a")).await;
        assert_eq!(store.entries().len(), 1);
    }
}
