//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the appropriate backend services.
//! Each handler takes CLI args and Output, returns ExitCode.

use std::path::Path;

use serde::Serialize;

use crate::api::{TmdbClient, TrendingMedia, TrendingWindow};
use crate::cli::{
    ExitCode, InfoCmd, ListAction, ListCmd, MediaTypeFilter, Output, ProvidersCmd, SearchCmd,
    SeasonCmd, StatusOk, TrendingCmd, WindowFilter,
};
use crate::config::Config;
use crate::models::{country_name, CountryProviders, ListEntry, MediaType};
use crate::store::{file_store_at, Library};

fn tmdb_client() -> TmdbClient {
    let mut config = Config::load();
    TmdbClient::new(config.get_tmdb_api_key())
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, output: &Output) -> ExitCode {
    let client = tmdb_client();

    output.info(format!("Searching for: {}", cmd.query));

    match client.search(&cmd.query).await {
        Ok(mut results) => {
            // Filter by media type if specified
            if let Some(filter) = cmd.media_type {
                let want: MediaType = filter.into();
                results.retain(|r| r.media_type == want);
            }

            // Limit results
            results.truncate(cmd.limit);

            if let Err(e) = output.print(&results) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Search failed: {}", e), ExitCode::NetworkError),
    }
}

// =============================================================================
// Trending Command
// =============================================================================

pub async fn trending_cmd(cmd: TrendingCmd, output: &Output) -> ExitCode {
    let client = tmdb_client();

    let window = match cmd.window {
        WindowFilter::Day => TrendingWindow::Day,
        WindowFilter::Week => TrendingWindow::Week,
    };
    let media = match cmd.media_type {
        None => TrendingMedia::All,
        Some(MediaTypeFilter::Movie) => TrendingMedia::Movie,
        Some(MediaTypeFilter::Tv) => TrendingMedia::Tv,
    };
    output.info(format!("Fetching trending ({:?})...", window));

    match client.trending(media, window).await {
        Ok(mut results) => {
            results.truncate(cmd.limit);

            if let Err(e) = output.print(&results) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(
            format!("Trending fetch failed: {}", e),
            ExitCode::NetworkError,
        ),
    }
}

// =============================================================================
// Info Command
// =============================================================================

pub async fn info_cmd(cmd: InfoCmd, output: &Output) -> ExitCode {
    let client = tmdb_client();

    output.info(format!("Getting info for: {}", cmd.id));

    match cmd.media_type {
        MediaTypeFilter::Movie => match client.movie_detail(cmd.id).await {
            Ok(detail) => {
                if let Err(e) = output.print(&detail) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                ExitCode::Success
            }
            Err(e) => output.error(format!("Movie info failed: {}", e), ExitCode::NetworkError),
        },
        MediaTypeFilter::Tv => match client.tv_detail(cmd.id).await {
            Ok(detail) => {
                if let Err(e) = output.print(&detail) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                ExitCode::Success
            }
            Err(e) => output.error(format!("TV info failed: {}", e), ExitCode::NetworkError),
        },
    }
}

// =============================================================================
// Season Command
// =============================================================================

pub async fn season_cmd(cmd: SeasonCmd, output: &Output) -> ExitCode {
    let client = tmdb_client();

    output.info(format!("Fetching season {} of {}", cmd.season, cmd.id));

    match client.tv_season(cmd.id, cmd.season).await {
        Ok(episodes) => {
            if let Err(e) = output.print(&episodes) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Season fetch failed: {}", e), ExitCode::NetworkError),
    }
}

// =============================================================================
// Providers Command
// =============================================================================

/// One country's providers, flattened for output
#[derive(Debug, Serialize)]
struct CountryRow<'a> {
    code: &'a str,
    country: &'a str,
    #[serde(flatten)]
    providers: &'a CountryProviders,
}

pub async fn providers_cmd(cmd: ProvidersCmd, output: &Output) -> ExitCode {
    let client = tmdb_client();
    let media_type: MediaType = cmd.media_type.into();

    output.info(format!("Fetching providers for: {}", cmd.id));

    match client.watch_providers(media_type, cmd.id).await {
        Ok(providers) => {
            let rows: Vec<CountryRow> = providers
                .iter()
                .filter(|(code, _)| match &cmd.country {
                    Some(want) => code.eq_ignore_ascii_case(want),
                    None => true,
                })
                .map(|(code, country_providers)| CountryRow {
                    code,
                    country: country_name(code),
                    providers: country_providers,
                })
                .collect();

            if rows.is_empty() {
                return output.error("No providers found", ExitCode::NotFound);
            }
            if let Err(e) = output.print(&rows) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(
            format!("Provider fetch failed: {}", e),
            ExitCode::NetworkError,
        ),
    }
}

// =============================================================================
// Saved List Commands
// =============================================================================

/// Handle `favorites` / `watchlist` subcommands against the named list
pub async fn list_cmd(
    list_name: &'static str,
    cmd: ListCmd,
    data_dir: Option<&Path>,
    output: &Output,
) -> ExitCode {
    let store = match file_store_at(data_dir) {
        Ok(store) => store,
        Err(e) => return output.error(format!("Store unavailable: {}", e), ExitCode::StoreError),
    };
    let library = Library::new(store);

    match cmd.action {
        None => match library.entries(list_name).await {
            Ok(entries) => {
                if let Err(e) = output.print(&entries) {
                    return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
                }
                ExitCode::Success
            }
            Err(e) => output.error(format!("Failed to read list: {}", e), ExitCode::StoreError),
        },
        Some(ListAction::Add(add)) => {
            let entry = ListEntry::new(add.id.to_string(), add.poster, add.media_type.into());
            match library.add(list_name, entry).await {
                Ok(()) => {
                    output.info(format!("Added {} to {}", add.id, list_name));
                    if output.json {
                        if let Err(e) = output.print(StatusOk::default()) {
                            return output
                                .error(format!("Failed to serialize: {}", e), ExitCode::Error);
                        }
                    }
                    ExitCode::Success
                }
                Err(e) => output.error(format!("Failed to add: {}", e), ExitCode::StoreError),
            }
        }
        Some(ListAction::Remove(remove)) => {
            match library.remove(list_name, &remove.id.to_string()).await {
                Ok(()) => {
                    output.info(format!("Removed {} from {}", remove.id, list_name));
                    if output.json {
                        if let Err(e) = output.print(StatusOk::default()) {
                            return output
                                .error(format!("Failed to serialize: {}", e), ExitCode::Error);
                        }
                    }
                    ExitCode::Success
                }
                Err(e) => output.error(format!("Failed to remove: {}", e), ExitCode::StoreError),
            }
        }
    }
}
