//! Favorites/watchlist semantics over a key-value store
//!
//! Each named list is one JSON document mapping item id to its saved entry.
//! Lists are created lazily on first write; an absent, null, or corrupt
//! document reads as the empty map. Mutations are read-modify-write and are
//! serialized per list name, so two overlapping toggles on the same list
//! cannot drop each other's writes.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::models::ListEntry;
use crate::store::kv::{KeyValue, StoreError};

/// List name for hearted items
pub const FAVORITES: &str = "favorites";

/// List name for watchlisted items
pub const WATCHLIST: &str = "watchlist";

/// Map shape of one persisted list document
type ListMap = BTreeMap<String, ListEntry>;

/// Named-list persistence over any `KeyValue` backend.
///
/// Shared across tasks behind an `Arc`; the per-list write locks live here
/// so every sharer serializes against the same locks.
pub struct Library<S> {
    store: Arc<S>,
    write_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl<S> Library<S>
where
    S: KeyValue,
{
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Lock handle serializing mutations of one list
    fn lock_for(&self, list: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.write_locks.lock().expect("library lock map poisoned");
        locks
            .entry(list.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    /// Read and parse a list document. Absent and null documents are empty;
    /// corrupt documents are logged and read as empty rather than erroring.
    async fn read_map(&self, list: &str) -> Result<ListMap, StoreError> {
        let raw = self.store.get(list).await?;
        let Some(raw) = raw else {
            return Ok(ListMap::new());
        };

        match serde_json::from_str::<Option<ListMap>>(&raw) {
            Ok(Some(map)) => Ok(map),
            Ok(None) => Ok(ListMap::new()),
            Err(e) => {
                warn!(list, error = %e, "corrupt list document, treating as empty");
                Ok(ListMap::new())
            }
        }
    }

    async fn write_map(&self, list: &str, map: &ListMap) -> Result<(), StoreError> {
        let raw = serde_json::to_string(map).expect("list map serialization cannot fail");
        self.store.set(list, &raw).await
    }

    /// Is `id` a member of `list`?
    pub async fn is_member(&self, list: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self.read_map(list).await?.contains_key(id))
    }

    /// Stored entry for `id` in `list`, if present
    pub async fn entry(&self, list: &str, id: &str) -> Result<Option<ListEntry>, StoreError> {
        Ok(self.read_map(list).await?.get(id).cloned())
    }

    /// All entries of `list`, in id order
    pub async fn entries(&self, list: &str) -> Result<Vec<ListEntry>, StoreError> {
        Ok(self.read_map(list).await?.into_values().collect())
    }

    /// Insert or overwrite an entry. Same id replaces the prior entry, so
    /// repeated adds never accumulate duplicates.
    pub async fn add(&self, list: &str, entry: ListEntry) -> Result<(), StoreError> {
        let lock = self.lock_for(list);
        let _guard = lock.lock().await;

        let mut map = self.read_map(list).await?;
        map.insert(entry.id.clone(), entry);
        self.write_map(list, &map).await
    }

    /// Remove an entry; a no-op when the id is absent
    pub async fn remove(&self, list: &str, id: &str) -> Result<(), StoreError> {
        let lock = self.lock_for(list);
        let _guard = lock.lock().await;

        let mut map = self.read_map(list).await?;
        if map.remove(id).is_none() {
            return Ok(());
        }
        self.write_map(list, &map).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaType;
    use crate::store::kv::MemoryStore;

    fn entry(id: &str) -> ListEntry {
        ListEntry::new(id, Some(format!("/{}.jpg", id)), MediaType::Movie)
    }

    #[tokio::test]
    async fn test_add_then_member() {
        let lib = Library::new(MemoryStore::new());
        lib.add(FAVORITES, entry("603")).await.unwrap();
        assert!(lib.is_member(FAVORITES, "603").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_remove_member() {
        let lib = Library::new(MemoryStore::new());
        lib.add(FAVORITES, entry("603")).await.unwrap();
        lib.remove(FAVORITES, "603").await.unwrap();
        assert!(!lib.is_member(FAVORITES, "603").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let lib = Library::new(MemoryStore::new());
        lib.add(WATCHLIST, entry("1")).await.unwrap();
        lib.remove(WATCHLIST, "42").await.unwrap();
        assert_eq!(lib.entries(WATCHLIST).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_store_member_is_false() {
        let lib = Library::new(MemoryStore::new());
        assert!(!lib.is_member(WATCHLIST, "42").await.unwrap());
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let lib = Library::new(MemoryStore::new());
        lib.add(FAVORITES, entry("603")).await.unwrap();
        lib.add(FAVORITES, entry("603")).await.unwrap();

        let entries = lib.entries(FAVORITES).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0], entry("603"));
    }

    #[tokio::test]
    async fn test_null_document_reads_empty() {
        let store = MemoryStore::new();
        store.seed(FAVORITES, "null");
        let lib = Library::new(store);
        assert!(!lib.is_member(FAVORITES, "603").await.unwrap());
        assert!(lib.entries(FAVORITES).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_document_reads_empty() {
        let store = MemoryStore::new();
        store.seed(WATCHLIST, "not json {{{");
        let lib = Library::new(store);
        assert!(!lib.is_member(WATCHLIST, "42").await.unwrap());
        // A following write replaces the corrupt document
        lib.add(WATCHLIST, entry("42")).await.unwrap();
        assert!(lib.is_member(WATCHLIST, "42").await.unwrap());
    }

    #[tokio::test]
    async fn test_lists_are_independent() {
        let lib = Library::new(MemoryStore::new());
        lib.add(FAVORITES, entry("603")).await.unwrap();
        assert!(!lib.is_member(WATCHLIST, "603").await.unwrap());
    }
}
