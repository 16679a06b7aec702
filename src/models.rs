//! Data structures and types for ReelTUI
//!
//! Contains all shared models used across the application organized by domain:
//! - **Search**: TMDB search results and media details
//! - **Providers**: per-country watch-provider listings
//! - **Library**: persisted favorites/watchlist entries
//! - **Images**: TMDB image URL composition

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Search Models (TMDB)
// =============================================================================

/// Media type discriminator for search results and library entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment used by TMDB endpoints ("movie" or "tv")
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Tv => write!(f, "TV Show"),
        }
    }
}

/// Search result from TMDB multi-search or trending
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<u16>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub vote_average: f32,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_type)
    }
}

/// Summary of a TV season (used in TvDetail)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonSummary {
    pub season_number: u16,
    pub episode_count: u16,
    pub name: Option<String>,
    pub air_date: Option<String>,
}

impl fmt::Display for SeasonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("Season");
        write!(
            f,
            "{} {} ({} episodes)",
            name, self.season_number, self.episode_count
        )
    }
}

/// Cast member from the credits block of a detail response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

/// Detailed movie information from TMDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub year: u16,
    pub runtime: u32,
    pub genres: Vec<String>,
    pub overview: String,
    pub vote_average: f32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// YouTube key of the first trailer/teaser, if any
    pub trailer_key: Option<String>,
    pub cast: Vec<CastMember>,
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.runtime / 60;
        let mins = self.runtime % 60;
        write!(
            f,
            "{} ({}) - {}h {}m - ⭐ {:.1}",
            self.title, self.year, hours, mins, self.vote_average
        )
    }
}

/// Detailed TV show information from TMDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvDetail {
    pub id: u64,
    pub name: String,
    pub year: u16,
    pub number_of_seasons: u16,
    pub seasons: Vec<SeasonSummary>,
    pub genres: Vec<String>,
    pub overview: String,
    pub vote_average: f32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    /// YouTube key of the first trailer/teaser, if any
    pub trailer_key: Option<String>,
    pub cast: Vec<CastMember>,
}

impl fmt::Display for TvDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} seasons - ⭐ {:.1}",
            self.name, self.year, self.number_of_seasons, self.vote_average
        )
    }
}

/// TV episode information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    pub season: u16,
    pub episode: u16,
    pub name: String,
    pub overview: String,
    pub runtime: Option<u32>,
}

impl fmt::Display for Episode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:02}E{:02} - {}", self.season, self.episode, self.name)
    }
}

// =============================================================================
// Watch Provider Models
// =============================================================================

/// A single streaming/purchase provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub provider_id: u64,
    pub provider_name: String,
    pub logo_path: Option<String>,
}

/// Provider offerings for one country
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountryProviders {
    #[serde(default)]
    pub flatrate: Vec<Provider>,
    #[serde(default)]
    pub buy: Vec<Provider>,
    #[serde(default)]
    pub rent: Vec<Provider>,
    #[serde(default)]
    pub ads: Vec<Provider>,
}

impl CountryProviders {
    pub fn is_empty(&self) -> bool {
        self.flatrate.is_empty()
            && self.buy.is_empty()
            && self.rent.is_empty()
            && self.ads.is_empty()
    }
}

/// Offerings keyed by ISO 3166-1 alpha-2 country code, sorted for stable display
pub type ProviderMap = BTreeMap<String, CountryProviders>;

// =============================================================================
// Library Models (persisted)
// =============================================================================

/// One saved item in a named list ("favorites" / "watchlist").
///
/// This is the persisted wire shape; renaming fields breaks stored documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: String,
    pub poster: Option<String>,
    pub media_type: MediaType,
}

impl ListEntry {
    pub fn new(id: impl Into<String>, poster: Option<String>, media_type: MediaType) -> Self {
        Self {
            id: id.into(),
            poster,
            media_type,
        }
    }
}

impl fmt::Display for ListEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.id, self.media_type)
    }
}

// =============================================================================
// Image URLs
// =============================================================================

/// TMDB image host
pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

/// Poster/backdrop size segment
pub const IMAGE_SIZE: &str = "w500";

/// Provider logo size segment
pub const LOGO_SIZE: &str = "w200";

/// Compose a full poster/backdrop URL from an opaque path reference
pub fn image_url(path: &str) -> String {
    format!("{}/{}{}", IMAGE_BASE, IMAGE_SIZE, path)
}

/// Compose a provider logo URL from an opaque path reference
pub fn logo_url(path: &str) -> String {
    format!("{}/{}{}", IMAGE_BASE, LOGO_SIZE, path)
}

/// Compose a YouTube watch URL from a video key
pub fn youtube_url(key: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", key)
}

// =============================================================================
// Country Names
// =============================================================================

/// Common alpha-2 codes seen in provider responses
const REGIONS: &[(&str, &str)] = &[
    ("AR", "Argentina"),
    ("AT", "Austria"),
    ("AU", "Australia"),
    ("BE", "Belgium"),
    ("BR", "Brazil"),
    ("CA", "Canada"),
    ("CH", "Switzerland"),
    ("CL", "Chile"),
    ("CO", "Colombia"),
    ("CZ", "Czechia"),
    ("DE", "Germany"),
    ("DK", "Denmark"),
    ("ES", "Spain"),
    ("FI", "Finland"),
    ("FR", "France"),
    ("GB", "United Kingdom"),
    ("GR", "Greece"),
    ("HU", "Hungary"),
    ("ID", "Indonesia"),
    ("IE", "Ireland"),
    ("IN", "India"),
    ("IT", "Italy"),
    ("JP", "Japan"),
    ("KR", "South Korea"),
    ("MX", "Mexico"),
    ("NL", "Netherlands"),
    ("NO", "Norway"),
    ("NZ", "New Zealand"),
    ("PH", "Philippines"),
    ("PL", "Poland"),
    ("PT", "Portugal"),
    ("RO", "Romania"),
    ("SE", "Sweden"),
    ("SG", "Singapore"),
    ("TR", "Turkey"),
    ("US", "United States"),
    ("ZA", "South Africa"),
];

/// Display name for an alpha-2 country code; falls back to the code itself
pub fn country_name(code: &str) -> &str {
    REGIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

// =============================================================================
// Unit Tests
// =============================================================================
