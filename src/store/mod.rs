//! Local persistence
//!
//! - `kv`: string-keyed document storage (file-backed or in-memory)
//! - `library`: favorites/watchlist semantics over any key-value store

pub mod kv;
pub mod library;

pub use kv::{default_data_dir, file_store_at, FileStore, KeyValue, MemoryStore, StoreError};
pub use library::{Library, FAVORITES, WATCHLIST};
