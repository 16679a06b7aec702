//! TMDB (The Movie Database) API client
//!
//! Provides search, trending, metadata, and watch-provider lookups for
//! movies and TV shows. API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    CastMember, Episode, MediaType, MovieDetail, ProviderMap, SearchResult, SeasonSummary,
    TvDetail,
};

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429), retries exhausted")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// Time window for trending requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingWindow {
    Day,
    #[default]
    Week,
}

impl TrendingWindow {
    fn as_path(&self) -> &'static str {
        match self {
            TrendingWindow::Day => "day",
            TrendingWindow::Week => "week",
        }
    }
}

/// Media filter for trending requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrendingMedia {
    #[default]
    All,
    Movie,
    Tv,
}

impl TrendingMedia {
    fn as_path(&self) -> &'static str {
        match self {
            TrendingMedia::All => "all",
            TrendingMedia::Movie => "movie",
            TrendingMedia::Tv => "tv",
        }
    }
}

/// TMDB API client
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.themoviedb.org/3")
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            max_retries: 3,
        }
    }

    /// Make an authenticated GET request with retry logic for rate limits.
    ///
    /// Long keys are v4 read tokens and go in the Authorization header;
    /// short legacy keys are sent as the api_key query parameter.
    async fn get<T: for<'de> Deserialize<'de>>(&self, endpoint: &str) -> Result<T> {
        let bearer = self.api_key.len() >= 64;
        let url = if bearer {
            format!("{}{}", self.base_url, endpoint)
        } else {
            let sep = if endpoint.contains('?') { '&' } else { '?' };
            format!("{}{}{}api_key={}", self.base_url, endpoint, sep, self.api_key)
        };
        let mut retries = 0;

        loop {
            let mut request = self.client.get(&url).header("Accept", "application/json");
            if bearer {
                request = request.header("Authorization", format!("Bearer {}", self.api_key));
            }
            let response = request.send().await?;

            match response.status() {
                StatusCode::OK => {
                    let body = response.text().await?;
                    let parsed: T = serde_json::from_str(&body).map_err(|e| {
                        TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                    })?;
                    return Ok(parsed);
                }
                StatusCode::NOT_FOUND => {
                    return Err(TmdbError::NotFound.into());
                }
                StatusCode::TOO_MANY_REQUESTS => {
                    retries += 1;
                    if retries >= self.max_retries {
                        return Err(TmdbError::RateLimited.into());
                    }

                    // Get Retry-After header or default to exponential backoff
                    let wait_secs = response
                        .headers()
                        .get("Retry-After")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(2u64.pow(retries));

                    tokio::time::sleep(Duration::from_secs(wait_secs)).await;
                    continue;
                }
                status => {
                    return Err(TmdbError::ServerError(status.as_u16()).into());
                }
            }
        }
    }

    /// Search for movies and TV shows
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let endpoint = format!("/search/multi?query={}&page=1", urlencoding::encode(query));

        let response: SearchResponse = self.get(&endpoint).await?;
        Ok(response.into_results())
    }

    /// Get trending content for a media type and time window
    pub async fn trending(
        &self,
        media: TrendingMedia,
        window: TrendingWindow,
    ) -> Result<Vec<SearchResult>> {
        let endpoint = format!("/trending/{}/{}", media.as_path(), window.as_path());
        let response: SearchResponse = self.get(&endpoint).await?;

        // Non-multi trending endpoints omit media_type on each item
        let fallback = match media {
            TrendingMedia::Movie => Some(MediaType::Movie),
            TrendingMedia::Tv => Some(MediaType::Tv),
            TrendingMedia::All => None,
        };
        Ok(response.into_results_with(fallback))
    }

    /// Get movie details by ID, including trailer key and cast
    pub async fn movie_detail(&self, id: u64) -> Result<MovieDetail> {
        let endpoint = format!("/movie/{}?append_to_response=videos,credits", id);
        let response: MovieResponse = self.get(&endpoint).await?;
        Ok(response.into_detail())
    }

    /// Get TV show details by ID, including trailer key and cast
    pub async fn tv_detail(&self, id: u64) -> Result<TvDetail> {
        let endpoint = format!("/tv/{}?append_to_response=videos,credits", id);
        let response: TvResponse = self.get(&endpoint).await?;
        Ok(response.into_detail())
    }

    /// Get episodes for a TV season
    pub async fn tv_season(&self, id: u64, season: u16) -> Result<Vec<Episode>> {
        let endpoint = format!("/tv/{}/season/{}", id, season);
        let response: SeasonResponse = self.get(&endpoint).await?;
        Ok(response.into_episodes(season))
    }

    /// Get watch providers by country for a movie or TV show
    pub async fn watch_providers(&self, media: MediaType, id: u64) -> Result<ProviderMap> {
        let endpoint = format!("/{}/{}/watch/providers", media.as_path(), id);
        let response: ProvidersResponse = self.get(&endpoint).await?;
        Ok(response.results)
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResultRaw>,
}

impl SearchResponse {
    fn into_results(self) -> Vec<SearchResult> {
        self.into_results_with(None)
    }

    fn into_results_with(self, fallback: Option<MediaType>) -> Vec<SearchResult> {
        self.results
            .into_iter()
            .filter_map(|r| r.into_search_result(fallback))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResultRaw {
    id: u64,
    media_type: Option<String>,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
}

impl SearchResultRaw {
    fn into_search_result(self, fallback: Option<MediaType>) -> Option<SearchResult> {
        let media_type = match self.media_type.as_deref() {
            Some("movie") => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            // Filter out "person" and other types
            Some(_) => return None,
            None => fallback?,
        };

        let title = self.title.or(self.name).unwrap_or_default();
        let date_str = self.release_date.or(self.first_air_date);
        let year = date_str.and_then(|d| extract_year(&d));

        Some(SearchResult {
            id: self.id,
            media_type,
            title,
            year,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            vote_average: self.vote_average.unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Deserialize)]
struct MovieResponse {
    id: u64,
    title: String,
    release_date: Option<String>,
    runtime: Option<u32>,
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    videos: Option<VideosRaw>,
    credits: Option<CreditsRaw>,
}

impl MovieResponse {
    fn into_detail(self) -> MovieDetail {
        let year = self
            .release_date
            .as_ref()
            .and_then(|d| extract_year(d))
            .unwrap_or(0);

        MovieDetail {
            id: self.id,
            title: self.title,
            year,
            runtime: self.runtime.unwrap_or(0),
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            trailer_key: self.videos.and_then(VideosRaw::trailer_key),
            cast: self.credits.map(CreditsRaw::into_cast).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TvResponse {
    id: u64,
    name: String,
    first_air_date: Option<String>,
    number_of_seasons: Option<u16>,
    seasons: Vec<SeasonRaw>,
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    videos: Option<VideosRaw>,
    credits: Option<CreditsRaw>,
}

impl TvResponse {
    fn into_detail(self) -> TvDetail {
        let year = self
            .first_air_date
            .as_ref()
            .and_then(|d| extract_year(d))
            .unwrap_or(0);

        // Filter out specials (season 0)
        let seasons: Vec<SeasonSummary> = self
            .seasons
            .into_iter()
            .filter(|s| s.season_number > 0)
            .map(|s| s.into_summary())
            .collect();

        let number_of_seasons = self.number_of_seasons.unwrap_or(seasons.len() as u16);

        TvDetail {
            id: self.id,
            name: self.name,
            year,
            number_of_seasons,
            seasons,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average.unwrap_or(0.0),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            trailer_key: self.videos.and_then(VideosRaw::trailer_key),
            cast: self.credits.map(CreditsRaw::into_cast).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct VideosRaw {
    results: Vec<VideoRaw>,
}

impl VideosRaw {
    /// First trailer or teaser key, matching the detail screens' pick
    fn trailer_key(self) -> Option<String> {
        self.results
            .into_iter()
            .find(|v| v.kind == "Trailer" || v.kind == "Teaser")
            .map(|v| v.key)
    }
}

#[derive(Debug, Deserialize)]
struct VideoRaw {
    key: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct CreditsRaw {
    cast: Vec<CastRaw>,
}

impl CreditsRaw {
    fn into_cast(self) -> Vec<CastMember> {
        self.cast.into_iter().map(|c| c.into_member()).collect()
    }
}

#[derive(Debug, Deserialize)]
struct CastRaw {
    id: u64,
    name: String,
    character: Option<String>,
    profile_path: Option<String>,
}

impl CastRaw {
    fn into_member(self) -> CastMember {
        CastMember {
            id: self.id,
            name: self.name,
            character: self.character.unwrap_or_default(),
            profile_path: self.profile_path,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SeasonResponse {
    episodes: Vec<EpisodeRaw>,
}

impl SeasonResponse {
    fn into_episodes(self, season: u16) -> Vec<Episode> {
        self.episodes
            .into_iter()
            .map(|e| e.into_episode(season))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct GenreRaw {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SeasonRaw {
    season_number: u16,
    episode_count: u16,
    name: Option<String>,
    air_date: Option<String>,
}

impl SeasonRaw {
    fn into_summary(self) -> SeasonSummary {
        SeasonSummary {
            season_number: self.season_number,
            episode_count: self.episode_count,
            name: self.name,
            air_date: self.air_date,
        }
    }
}

#[derive(Debug, Deserialize)]
struct EpisodeRaw {
    episode_number: u16,
    name: String,
    overview: Option<String>,
    runtime: Option<u32>,
}

impl EpisodeRaw {
    fn into_episode(self, season: u16) -> Episode {
        Episode {
            season,
            episode: self.episode_number,
            name: self.name,
            overview: self.overview.unwrap_or_default(),
            runtime: self.runtime,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProvidersResponse {
    results: ProviderMap,
}

/// Extract year from a date string like "2022-03-04"
fn extract_year(date: &str) -> Option<u16> {
    if date.len() >= 4 {
        date[..4].parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("2022-03-04"), Some(2022));
        assert_eq!(extract_year("2019-11-12"), Some(2019));
        assert_eq!(extract_year(""), None);
        assert_eq!(extract_year("abc"), None);
    }

    #[test]
    fn test_media_type_filter() {
        let movie = SearchResultRaw {
            id: 1,
            media_type: Some("movie".to_string()),
            title: Some("Test".to_string()),
            name: None,
            release_date: Some("2022-01-01".to_string()),
            first_air_date: None,
            overview: None,
            poster_path: None,
            vote_average: None,
        };

        let person = SearchResultRaw {
            id: 2,
            media_type: Some("person".to_string()),
            title: None,
            name: Some("Actor".to_string()),
            release_date: None,
            first_air_date: None,
            overview: None,
            poster_path: None,
            vote_average: None,
        };

        assert!(movie.into_search_result(None).is_some());
        assert!(person.into_search_result(None).is_none());
    }

    #[test]
    fn test_media_type_fallback() {
        let untyped = SearchResultRaw {
            id: 3,
            media_type: None,
            title: None,
            name: Some("Trending Show".to_string()),
            release_date: None,
            first_air_date: Some("2021-05-15".to_string()),
            overview: None,
            poster_path: None,
            vote_average: None,
        };

        // Without a fallback the item is dropped
        assert!(untyped.clone().into_search_result(None).is_none());

        let result = untyped.into_search_result(Some(MediaType::Tv)).unwrap();
        assert_eq!(result.media_type, MediaType::Tv);
        assert_eq!(result.title, "Trending Show");
        assert_eq!(result.year, Some(2021));
    }

    #[test]
    fn test_trailer_key_prefers_trailer_or_teaser() {
        let videos = VideosRaw {
            results: vec![
                VideoRaw {
                    key: "clip1".into(),
                    kind: "Clip".into(),
                },
                VideoRaw {
                    key: "teaser1".into(),
                    kind: "Teaser".into(),
                },
                VideoRaw {
                    key: "trailer1".into(),
                    kind: "Trailer".into(),
                },
            ],
        };
        // First match in response order wins
        assert_eq!(videos.trailer_key(), Some("teaser1".to_string()));

        let none = VideosRaw {
            results: vec![VideoRaw {
                key: "clip1".into(),
                kind: "Featurette".into(),
            }],
        };
        assert_eq!(none.trailer_key(), None);
    }
}
