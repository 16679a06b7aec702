//! API clients for external services
//!
//! - TMDB: Movie/TV metadata, search, trending, watch providers

pub mod tmdb;

pub use tmdb::{TmdbClient, TrendingMedia, TrendingWindow};
