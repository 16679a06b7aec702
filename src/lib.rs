//! ReelTUI - Terminal companion for browsing and tracking movies & TV
//!
//! A terminal interface for searching movies and TV shows, browsing trending
//! titles, checking where to stream them, and keeping favorites and a
//! watchlist.
//!
//! # Modules
//!
//! - `models` - Data structures for search results, details, saved lists
//! - `api` - TMDB API client
//! - `store` - Local key-value persistence and saved-list semantics
//! - `loader` - Fetch lifecycle, stale-result tickets, search debounce
//! - `ui` - TUI components
//! - `app` - Application state and navigation

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod loader;
pub mod models;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use models::{
    CastMember, CountryProviders, Episode, ListEntry, MediaType, MovieDetail, Provider,
    ProviderMap, SearchResult, SeasonSummary, TvDetail,
};

pub use api::{TmdbClient, TrendingMedia, TrendingWindow};
pub use app::{App, AppState};
pub use loader::{FetchState, Loader, Ticket};
pub use store::{FileStore, KeyValue, Library, MemoryStore, FAVORITES, WATCHLIST};
