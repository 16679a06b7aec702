//! Saved-list persistence tests
//!
//! Exercises the favorites/watchlist library over the real file-backed
//! store: exact stored document shape, reload across instances, and
//! concurrent writers.

use std::sync::Arc;

use reeltui::models::{ListEntry, MediaType};
use reeltui::store::{FileStore, KeyValue, Library, FAVORITES, WATCHLIST};

fn temp_dir(tag: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "reeltui-test-{}-{}",
        tag,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

// =============================================================================
// Wire Format
// =============================================================================

#[tokio::test]
async fn test_stored_document_shape() {
    let dir = temp_dir("shape");
    let lib = Library::new(FileStore::new(&dir));

    lib.add(
        FAVORITES,
        ListEntry::new("603", Some("/abc.jpg".into()), MediaType::Movie),
    )
    .await
    .unwrap();

    // The document is a map keyed by id, one object per entry
    let raw = std::fs::read_to_string(dir.join("favorites.json")).unwrap();
    assert_eq!(
        raw,
        r#"{"603":{"id":"603","poster":"/abc.jpg","media_type":"movie"}}"#
    );
}

#[tokio::test]
async fn test_null_poster_is_serialized() {
    let dir = temp_dir("null-poster");
    let lib = Library::new(FileStore::new(&dir));

    lib.add(WATCHLIST, ListEntry::new("1396", None, MediaType::Tv))
        .await
        .unwrap();

    let raw = std::fs::read_to_string(dir.join("watchlist.json")).unwrap();
    assert_eq!(
        raw,
        r#"{"1396":{"id":"1396","poster":null,"media_type":"tv"}}"#
    );
}

// =============================================================================
// Persistence Across Instances
// =============================================================================

#[tokio::test]
async fn test_entries_survive_reload() {
    let dir = temp_dir("reload");

    {
        let lib = Library::new(FileStore::new(&dir));
        lib.add(
            FAVORITES,
            ListEntry::new("603", Some("/matrix.jpg".into()), MediaType::Movie),
        )
        .await
        .unwrap();
        lib.add(
            FAVORITES,
            ListEntry::new("1396", Some("/bb.jpg".into()), MediaType::Tv),
        )
        .await
        .unwrap();
    }

    // A fresh library over the same directory sees the same state
    let lib = Library::new(FileStore::new(&dir));
    assert!(lib.is_member(FAVORITES, "603").await.unwrap());
    assert!(lib.is_member(FAVORITES, "1396").await.unwrap());

    let entry = lib.entry(FAVORITES, "1396").await.unwrap().unwrap();
    assert_eq!(entry.media_type, MediaType::Tv);
    assert_eq!(entry.poster.as_deref(), Some("/bb.jpg"));
}

#[tokio::test]
async fn test_corrupt_file_recovers_on_write() {
    let dir = temp_dir("corrupt");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("favorites.json"), "{ not json").unwrap();

    let lib = Library::new(FileStore::new(&dir));

    // Corrupt contents read as empty rather than erroring
    assert!(lib.entries(FAVORITES).await.unwrap().is_empty());

    // And a write replaces the document with a valid one
    lib.add(
        FAVORITES,
        ListEntry::new("603", None, MediaType::Movie),
    )
    .await
    .unwrap();
    assert!(lib.is_member(FAVORITES, "603").await.unwrap());

    let raw = std::fs::read_to_string(dir.join("favorites.json")).unwrap();
    assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn test_concurrent_adds_all_land() {
    let dir = temp_dir("concurrent");
    let lib = Arc::new(Library::new(FileStore::new(&dir)));

    let mut handles = Vec::new();
    for i in 0..20u32 {
        let lib = lib.clone();
        handles.push(tokio::spawn(async move {
            lib.add(
                WATCHLIST,
                ListEntry::new(format!("{:03}", i), None, MediaType::Movie),
            )
            .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    // Read-modify-write is serialized per list, so no add is lost
    let entries = lib.entries(WATCHLIST).await.unwrap();
    assert_eq!(entries.len(), 20);
}

#[tokio::test]
async fn test_lists_do_not_share_entries() {
    let dir = temp_dir("independent");
    let lib = Library::new(FileStore::new(&dir));

    lib.add(
        FAVORITES,
        ListEntry::new("603", None, MediaType::Movie),
    )
    .await
    .unwrap();

    assert!(lib.is_member(FAVORITES, "603").await.unwrap());
    assert!(!lib.is_member(WATCHLIST, "603").await.unwrap());
    assert!(lib.entries(WATCHLIST).await.unwrap().is_empty());
}

// =============================================================================
// Store Keys
// =============================================================================

#[tokio::test]
async fn test_path_like_keys_are_rejected() {
    let dir = temp_dir("keys");
    let store = FileStore::new(&dir);

    assert!(store.get("../escape").await.is_err());
    assert!(store.set("a/b", "{}").await.is_err());
    assert!(store.set("", "{}").await.is_err());
    assert!(store.set("favorites", "{}").await.is_ok());
}
