//! CLI - Command Line Interface for ReelTUI
//!
//! Designed for automation and scripting.
//! Every TUI action is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Search for content
//! reeltui search "the matrix" --json
//!
//! # Details and providers
//! reeltui info 603 --media-type movie
//! reeltui providers 603 --media-type movie --country ES
//!
//! # Saved lists
//! reeltui favorites add 603 --media-type movie --poster /abc.jpg
//! reeltui watchlist
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::MediaType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Item not found
    NotFound = 4,
    /// Local store error
    StoreError = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// ReelTUI - Terminal companion for browsing and tracking movies & TV
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "reeltui",
    version,
    author = "Gorka & Hermes",
    about = "Terminal companion for browsing and tracking movies & TV",
    long_about = "A terminal interface for searching movies and TV shows, \
                  browsing trending titles, checking where to stream them, \
                  and keeping favorites and a watchlist.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  reeltui                             Launch interactive TUI\n\
                  reeltui search \"blade runner\"       Search for content\n\
                  reeltui trending -t movie           Trending movies today\n\
                  reeltui favorites add 603 -t movie  Save a favorite\n\
                  reeltui watchlist --json            Dump watchlist as JSON"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Override the saved-lists data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for movies and TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get trending content
    #[command(visible_alias = "tr")]
    Trending(TrendingCmd),

    /// Get details for a movie or show
    #[command(visible_alias = "i")]
    Info(InfoCmd),

    /// List episodes for a TV season
    #[command(visible_alias = "se")]
    Season(SeasonCmd),

    /// Show streaming providers by country
    #[command(visible_alias = "pr")]
    Providers(ProvidersCmd),

    /// Manage the favorites list
    #[command(visible_alias = "fav")]
    Favorites(ListCmd),

    /// Manage the watchlist
    #[command(visible_alias = "wl")]
    Watchlist(ListCmd),
}

// =============================================================================
// Search Command
// =============================================================================

/// Search for movies and TV shows by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Filter by media type
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,
}

/// Media type filter for search and trending
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeFilter {
    /// Movies only
    Movie,
    /// TV shows only
    Tv,
}

impl From<MediaTypeFilter> for MediaType {
    fn from(filter: MediaTypeFilter) -> MediaType {
        match filter {
            MediaTypeFilter::Movie => MediaType::Movie,
            MediaTypeFilter::Tv => MediaType::Tv,
        }
    }
}

// =============================================================================
// Trending Command
// =============================================================================

/// Get trending movies and TV shows
#[derive(Args, Debug)]
pub struct TrendingCmd {
    /// Time window for trending
    #[arg(long, short = 'w', value_enum, default_value = "week")]
    pub window: WindowFilter,

    /// Maximum number of results
    #[arg(long, short = 'l', default_value = "20")]
    pub limit: usize,

    /// Filter by media type
    #[arg(long, short = 't', value_enum)]
    pub media_type: Option<MediaTypeFilter>,
}

/// Time window for trending content
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowFilter {
    /// Today's trending
    Day,
    /// This week's trending
    #[default]
    Week,
}

// =============================================================================
// Info Command
// =============================================================================

/// Get detailed information about a movie or TV show
#[derive(Args, Debug)]
pub struct InfoCmd {
    /// TMDB ID (e.g., 603)
    #[arg(required = true)]
    pub id: u64,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeFilter,
}

// =============================================================================
// Season Command
// =============================================================================

/// List episodes for a season of a TV show
#[derive(Args, Debug)]
pub struct SeasonCmd {
    /// TMDB ID of the show
    #[arg(required = true)]
    pub id: u64,

    /// Season number
    #[arg(required = true)]
    pub season: u16,
}

// =============================================================================
// Providers Command
// =============================================================================

/// Show where a title streams, by country
#[derive(Args, Debug)]
pub struct ProvidersCmd {
    /// TMDB ID (e.g., 603)
    #[arg(required = true)]
    pub id: u64,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeFilter,

    /// Only show one country (alpha-2 code, e.g., ES)
    #[arg(long, short = 'C')]
    pub country: Option<String>,
}

// =============================================================================
// Saved List Commands
// =============================================================================

/// Manage a saved list (favorites or watchlist)
#[derive(Args, Debug)]
pub struct ListCmd {
    #[command(subcommand)]
    pub action: Option<ListAction>,
}

#[derive(Subcommand, Debug)]
pub enum ListAction {
    /// Add an item to the list
    Add(ListAddCmd),

    /// Remove an item from the list
    #[command(visible_alias = "rm")]
    Remove(ListRemoveCmd),
}

/// Add an item to a saved list
#[derive(Args, Debug)]
pub struct ListAddCmd {
    /// TMDB ID (e.g., 603)
    #[arg(required = true)]
    pub id: u64,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum, default_value = "movie")]
    pub media_type: MediaTypeFilter,

    /// Poster path to store with the entry (e.g., /abc.jpg)
    #[arg(long, short = 'p')]
    pub poster: Option<String>,
}

/// Remove an item from a saved list
#[derive(Args, Debug)]
pub struct ListRemoveCmd {
    /// TMDB ID (e.g., 603)
    #[arg(required = true)]
    pub id: u64,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Status OK response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusOk {
    pub status: &'static str,
}

impl Default for StatusOk {
    fn default() -> Self {
        Self { status: "ok" }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            // For non-JSON, caller should handle formatting
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
