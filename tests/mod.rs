//! Integration tests for ReelTUI
//!
//! Tests are organized by component:
//! - tmdb_test: TMDB API client tests
//! - library_test: Saved-list persistence tests (favorites/watchlist)
//! - cli_test: CLI parsing and JSON output tests
//! - ui_test: UI component tests
//! - e2e_test: End-to-end flow tests (Search -> Detail -> Saved lists)

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
