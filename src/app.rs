//! App state and core application logic
//!
//! Manages the application state machine, navigation stack, and the commit
//! points where async fetch results enter screen state. All remote results
//! arrive as `AppEvent`s tagged with loader tickets; `apply_event` drops
//! anything whose ticket is no longer current.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

use crate::loader::{DebounceAction, Debouncer, FetchState, Loader, Ticket};
use crate::models::{
    youtube_url, Episode, ListEntry, MediaType, MovieDetail, ProviderMap, SearchResult, TvDetail,
};

// =============================================================================
// App State Enum
// =============================================================================

/// Application state enum representing current screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Home screen with trending rails
    Home,
    /// Search results view
    Search,
    /// Detail view for a movie or TV show
    Detail,
    /// Saved favorites grid
    Favorites,
    /// Saved watchlist grid
    Watchlist,
}

impl Default for AppState {
    fn default() -> Self {
        AppState::Home
    }
}

// =============================================================================
// Input Mode
// =============================================================================

/// Current input mode for keyboard handling
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InputMode {
    /// Normal navigation mode
    #[default]
    Normal,
    /// Text input mode (search box focused)
    Editing,
}

// =============================================================================
// Selection State (per-view)
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Scroll offset for viewport
    pub offset: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self {
            selected: 0,
            offset: 0,
            len,
        }
    }

    /// Move selection up
    pub fn up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.offset {
                self.offset = self.selected;
            }
        }
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Jump to first item
    pub fn first(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Jump to last item
    pub fn last(&mut self) {
        if self.len > 0 {
            self.selected = self.len - 1;
        }
    }

    /// Update offset to keep selected item visible
    pub fn scroll_into_view(&mut self, visible_height: usize) {
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if visible_height > 0 && self.selected >= self.offset + visible_height {
            self.offset = self.selected - visible_height + 1;
        }
    }

    /// Reset selection
    pub fn reset(&mut self) {
        self.selected = 0;
        self.offset = 0;
    }

    /// Update length (e.g., when new results come in)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        // Clamp selected to valid range
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// View-Specific State
// =============================================================================

/// Which trending rail has focus on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HomeRail {
    #[default]
    Tv,
    Movies,
}

/// Home view state: two horizontal trending rails
#[derive(Debug, Default)]
pub struct HomeState {
    pub trending_tv: FetchState<Vec<SearchResult>>,
    pub trending_movies: FetchState<Vec<SearchResult>>,
    pub rail: HomeRail,
    pub tv_list: ListState,
    pub movie_list: ListState,
}

impl HomeState {
    fn active_list(&mut self) -> &mut ListState {
        match self.rail {
            HomeRail::Tv => &mut self.tv_list,
            HomeRail::Movies => &mut self.movie_list,
        }
    }

    /// Currently highlighted trending item
    pub fn selected_result(&self) -> Option<&SearchResult> {
        match self.rail {
            HomeRail::Tv => self
                .trending_tv
                .value()
                .and_then(|r| r.get(self.tv_list.selected)),
            HomeRail::Movies => self
                .trending_movies
                .value()
                .and_then(|r| r.get(self.movie_list.selected)),
        }
    }
}

/// Search view state
#[derive(Debug, Default)]
pub struct SearchState {
    /// Search query
    pub query: String,
    /// Cursor position in query (byte index)
    pub cursor: usize,
    /// Search results
    pub results: Vec<SearchResult>,
    /// Results list state
    pub list: ListState,
    /// Primary fetch state for the current query
    pub state: FetchState<()>,
}

impl SearchState {
    /// Insert character at cursor
    pub fn insert(&mut self, c: char) {
        self.query.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete character before cursor
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.query[..self.cursor]
                .chars()
                .next_back()
                .map(|c| c.len_utf8())
                .unwrap_or(0);
            self.cursor -= prev;
            self.query.remove(self.cursor);
        }
    }

    /// Clear query and results
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
        self.results.clear();
        self.list.set_len(0);
        self.state = FetchState::Idle;
    }

    /// Set results and update list state
    pub fn set_results(&mut self, results: Vec<SearchResult>) {
        self.list.set_len(results.len());
        self.results = results;
        self.state = FetchState::Ready(());
    }

    /// Get currently selected result
    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.results.get(self.list.selected)
    }
}

/// Primary payload of the detail screen
#[derive(Debug, Clone)]
pub enum DetailContent {
    Movie(MovieDetail),
    Tv(TvDetail),
}

impl DetailContent {
    pub fn title(&self) -> &str {
        match self {
            DetailContent::Movie(d) => &d.title,
            DetailContent::Tv(d) => &d.name,
        }
    }

    pub fn overview(&self) -> &str {
        match self {
            DetailContent::Movie(d) => &d.overview,
            DetailContent::Tv(d) => &d.overview,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            DetailContent::Movie(d) => d.poster_path.as_deref(),
            DetailContent::Tv(d) => d.poster_path.as_deref(),
        }
    }

    pub fn trailer_key(&self) -> Option<&str> {
        match self {
            DetailContent::Movie(d) => d.trailer_key.as_deref(),
            DetailContent::Tv(d) => d.trailer_key.as_deref(),
        }
    }
}

/// Which pane of the detail screen is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Stream,
    Cast,
}

/// Identifier for one detail screen instance
pub type DetailKey = (MediaType, u64);

/// Detail view state (movie or TV show)
#[derive(Debug)]
pub struct DetailScreen {
    pub media_type: MediaType,
    pub id: u64,
    /// Poster ref carried from the list that opened this screen, used for
    /// library entries before/without the detail payload
    pub poster: Option<String>,
    pub state: FetchState<DetailContent>,

    // Secondary resources: arrive independently, degrade silently
    pub providers: ProviderMap,
    pub is_favorite: bool,
    pub in_watchlist: bool,

    pub tab: DetailTab,
    pub country: String,
    pub country_picker_open: bool,
    pub country_list: ListState,

    // TV only
    pub selected_season: u16,
    pub episodes: Vec<Episode>,
    pub episode_list: ListState,
    pub season_picker_open: bool,
    pub season_list: ListState,
}

impl DetailScreen {
    pub fn pending(media_type: MediaType, id: u64, poster: Option<String>, country: &str) -> Self {
        Self {
            media_type,
            id,
            poster,
            state: FetchState::Pending,
            providers: ProviderMap::new(),
            is_favorite: false,
            in_watchlist: false,
            tab: DetailTab::default(),
            country: country.to_string(),
            country_picker_open: false,
            country_list: ListState::default(),
            selected_season: 1,
            episodes: Vec::new(),
            episode_list: ListState::default(),
            season_picker_open: false,
            season_list: ListState::default(),
        }
    }

    pub fn key(&self) -> DetailKey {
        (self.media_type, self.id)
    }

    /// Country codes available in the provider map, in display order
    pub fn country_codes(&self) -> Vec<&str> {
        self.providers.keys().map(|s| s.as_str()).collect()
    }

    /// Poster ref to persist in a library entry
    fn entry_poster(&self) -> Option<String> {
        self.state
            .value()
            .and_then(|c| c.poster_path().map(String::from))
            .or_else(|| self.poster.clone())
    }

    /// Library entry describing this screen's item
    pub fn list_entry(&self) -> ListEntry {
        ListEntry::new(self.id.to_string(), self.entry_poster(), self.media_type)
    }
}

/// Saved-list view state (favorites or watchlist grid)
#[derive(Debug, Default)]
pub struct SavedListState {
    pub state: FetchState<Vec<ListEntry>>,
    pub list: ListState,
}

impl SavedListState {
    pub fn set_entries(&mut self, entries: Vec<ListEntry>) {
        self.list.set_len(entries.len());
        self.state = FetchState::Ready(entries);
    }

    pub fn selected_entry(&self) -> Option<&ListEntry> {
        self.state.value().and_then(|e| e.get(self.list.selected))
    }
}

// =============================================================================
// Async Boundary
// =============================================================================

/// Completed async work, delivered to the UI loop over a channel.
///
/// Remote errors cross the boundary as strings; typed errors stay inside
/// the tasks that log them.
#[derive(Debug)]
pub enum AppEvent {
    TrendingTv(Result<Vec<SearchResult>, String>),
    TrendingMovies(Result<Vec<SearchResult>, String>),
    SearchLoaded {
        ticket: Ticket<String>,
        result: Result<Vec<SearchResult>, String>,
    },
    DetailLoaded {
        ticket: Ticket<DetailKey>,
        result: Result<DetailContent, String>,
    },
    ProvidersLoaded {
        ticket: Ticket<DetailKey>,
        result: Result<ProviderMap, String>,
    },
    MembershipLoaded {
        ticket: Ticket<DetailKey>,
        is_favorite: bool,
        in_watchlist: bool,
    },
    SeasonLoaded {
        ticket: Ticket<DetailKey>,
        season: u16,
        result: Result<Vec<Episode>, String>,
    },
    FavoritesLoaded(Result<Vec<ListEntry>, String>),
    WatchlistLoaded(Result<Vec<ListEntry>, String>),
}

/// Side effects the UI loop must perform after a key press
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Fetch detail + secondaries for an item and show its screen
    OpenDetail {
        media_type: MediaType,
        id: u64,
        poster: Option<String>,
    },
    /// Persist a favorites toggle (already reflected in screen state)
    SetFavorite { entry: ListEntry, saved: bool },
    /// Persist a watchlist toggle (already reflected in screen state)
    SetWatchlist { entry: ListEntry, saved: bool },
    /// Open the trailer in the default browser
    OpenTrailer(String),
    /// Fetch episodes for a season of the current show
    FetchSeason { id: u64, season: u16 },
    /// Re-read a saved list from the store
    RefreshFavorites,
    /// Re-read the watchlist from the store
    RefreshWatchlist,
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    /// Current state/screen
    pub state: AppState,
    /// Navigation history stack
    pub nav_stack: Vec<AppState>,
    /// Whether the app is running
    pub running: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Global error message
    pub error: Option<String>,

    // View-specific states
    pub home: HomeState,
    pub search: SearchState,
    pub detail: Option<DetailScreen>,
    pub favorites: SavedListState,
    pub watchlist: SavedListState,

    // Loaders guarding stale async results
    pub search_loader: Loader<String>,
    pub detail_loader: Loader<DetailKey>,
    pub debouncer: Debouncer,

    /// Default country for the provider pane
    pub default_country: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            state: AppState::Home,
            nav_stack: Vec::new(),
            running: true,
            input_mode: InputMode::Normal,
            error: None,

            home: HomeState::default(),
            search: SearchState::default(),
            detail: None,
            favorites: SavedListState::default(),
            watchlist: SavedListState::default(),

            search_loader: Loader::new(),
            detail_loader: Loader::new(),
            debouncer: Debouncer::new(),

            default_country: "US".to_string(),
        }
    }
}

impl App {
    /// Create a new App instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to a new state, pushing current to stack
    pub fn navigate(&mut self, state: AppState) {
        if self.state != state {
            self.nav_stack.push(self.state);
            self.state = state;
        }
        self.input_mode = InputMode::Normal;
    }

    /// Go back to previous state
    pub fn back(&mut self) -> bool {
        // If in editing mode, exit editing first
        if self.input_mode == InputMode::Editing {
            self.input_mode = InputMode::Normal;
            return true;
        }

        // Close pickers before leaving the detail screen
        if let Some(detail) = &mut self.detail {
            if detail.country_picker_open {
                detail.country_picker_open = false;
                return true;
            }
            if detail.season_picker_open {
                detail.season_picker_open = false;
                return true;
            }
        }

        if let Some(prev) = self.nav_stack.pop() {
            if self.state == AppState::Detail {
                // Leaving the detail screen invalidates its in-flight fetches
                self.detail_loader.cancel();
                self.detail = None;
            }
            self.state = prev;
            true
        } else {
            false
        }
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Set error message
    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.error = Some(msg.into());
    }

    /// Focus search input
    pub fn focus_search(&mut self) {
        self.input_mode = InputMode::Editing;
        if self.state != AppState::Search {
            self.navigate(AppState::Search);
            self.input_mode = InputMode::Editing;
        }
    }

    // -------------------------------------------------------------------------
    // Fetch Dispatch (callers spawn the actual work)
    // -------------------------------------------------------------------------

    /// Mark the search pending and issue a ticket for `query`
    pub fn begin_search(&mut self, query: String) -> Ticket<String> {
        self.search.state = FetchState::Pending;
        self.search_loader.begin(query)
    }

    /// Create a pending detail screen and issue a ticket for its fetches
    pub fn begin_detail(
        &mut self,
        media_type: MediaType,
        id: u64,
        poster: Option<String>,
    ) -> Ticket<DetailKey> {
        self.detail = Some(DetailScreen::pending(
            media_type,
            id,
            poster,
            &self.default_country,
        ));
        self.navigate(AppState::Detail);
        self.detail_loader.begin((media_type, id))
    }

    /// Mark a saved-list screen pending before its store read
    pub fn begin_saved_list(&mut self, state: AppState) {
        match state {
            AppState::Favorites => self.favorites.state = FetchState::Pending,
            AppState::Watchlist => self.watchlist.state = FetchState::Pending,
            _ => {}
        }
    }

    /// Poll the search debouncer; `Some(query)` means a fetch is due
    pub fn poll_search(&mut self, now: Instant) -> Option<String> {
        match self.debouncer.poll(now)? {
            DebounceAction::Fetch(query) => Some(query),
            DebounceAction::Clear => {
                self.search_loader.cancel();
                self.search.results.clear();
                self.search.list.set_len(0);
                self.search.state = FetchState::Idle;
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Event Commit Points
    // -------------------------------------------------------------------------

    /// Apply a completed async result. Stale tickets are dropped here;
    /// secondary failures are logged and leave primary state untouched.
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::TrendingTv(result) => match result {
                Ok(results) => {
                    self.home.tv_list.set_len(results.len());
                    self.home.trending_tv = FetchState::Ready(results);
                }
                Err(e) => self.home.trending_tv = FetchState::Failed(e),
            },
            AppEvent::TrendingMovies(result) => match result {
                Ok(results) => {
                    self.home.movie_list.set_len(results.len());
                    self.home.trending_movies = FetchState::Ready(results);
                }
                Err(e) => self.home.trending_movies = FetchState::Failed(e),
            },
            AppEvent::SearchLoaded { ticket, result } => {
                if !self.search_loader.accept(&ticket) {
                    return;
                }
                match result {
                    Ok(results) => self.search.set_results(results),
                    Err(e) => self.search.state = FetchState::Failed(e),
                }
            }
            AppEvent::DetailLoaded { ticket, result } => {
                if !self.detail_loader.accept(&ticket) {
                    return;
                }
                if let Some(detail) = &mut self.detail {
                    match result {
                        Ok(content) => {
                            if let DetailContent::Tv(tv) = &content {
                                detail.season_list.set_len(tv.seasons.len());
                            }
                            detail.state = FetchState::Ready(content);
                        }
                        Err(e) => detail.state = FetchState::Failed(e),
                    }
                }
            }
            AppEvent::ProvidersLoaded { ticket, result } => {
                if !self.detail_loader.accept(&ticket) {
                    return;
                }
                match result {
                    Ok(providers) => {
                        if let Some(detail) = &mut self.detail {
                            detail.country_list.set_len(providers.len());
                            detail.providers = providers;
                        }
                    }
                    // Secondary resource: the provider pane just stays empty
                    Err(e) => warn!(error = %e, "watch provider fetch failed"),
                }
            }
            AppEvent::MembershipLoaded {
                ticket,
                is_favorite,
                in_watchlist,
            } => {
                if !self.detail_loader.accept(&ticket) {
                    return;
                }
                if let Some(detail) = &mut self.detail {
                    detail.is_favorite = is_favorite;
                    detail.in_watchlist = in_watchlist;
                }
            }
            AppEvent::SeasonLoaded {
                ticket,
                season,
                result,
            } => {
                if !self.detail_loader.accept(&ticket) {
                    return;
                }
                if let Some(detail) = &mut self.detail {
                    match result {
                        Ok(episodes) => {
                            detail.selected_season = season;
                            detail.episode_list.set_len(episodes.len());
                            detail.episodes = episodes;
                        }
                        Err(e) => warn!(error = %e, season, "season fetch failed"),
                    }
                }
            }
            AppEvent::FavoritesLoaded(result) => match result {
                Ok(entries) => self.favorites.set_entries(entries),
                Err(e) => self.favorites.state = FetchState::Failed(e),
            },
            AppEvent::WatchlistLoaded(result) => match result {
                Ok(entries) => self.watchlist.set_entries(entries),
                Err(e) => self.watchlist.state = FetchState::Failed(e),
            },
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard Event Handling
    // -------------------------------------------------------------------------

    /// Handle keyboard event; returns a side effect for the UI loop to run
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        // Clear error on any keypress
        self.error = None;

        // Global quit shortcut
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit();
            return None;
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_key(key);
            return None;
        }
        self.handle_normal_key(key)
    }

    /// Handle keys in editing (text input) mode
    fn handle_editing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
            }
            KeyCode::Char(c) => {
                self.search.insert(c);
                self.debouncer.input(&self.search.query, Instant::now());
            }
            KeyCode::Backspace => {
                self.search.backspace();
                self.debouncer.input(&self.search.query, Instant::now());
            }
            _ => {}
        }
    }

    /// Handle keys in normal navigation mode
    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        // Global shortcuts
        match key.code {
            KeyCode::Char('q') => {
                self.quit();
                return None;
            }
            KeyCode::Char('/') => {
                self.focus_search();
                return None;
            }
            KeyCode::Char('f') if self.state != AppState::Detail => {
                self.navigate(AppState::Favorites);
                return Some(UiAction::RefreshFavorites);
            }
            KeyCode::Char('w') if self.state != AppState::Detail => {
                self.navigate(AppState::Watchlist);
                return Some(UiAction::RefreshWatchlist);
            }
            KeyCode::Esc => {
                self.back();
                return None;
            }
            _ => {}
        }

        match self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::Search => self.handle_search_key(key),
            AppState::Detail => self.handle_detail_key(key),
            AppState::Favorites | AppState::Watchlist => self.handle_saved_list_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.home.rail = HomeRail::Tv;
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.home.rail = HomeRail::Movies;
                None
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.home.active_list().up();
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.home.active_list().down();
                None
            }
            KeyCode::Enter => self.home.selected_result().map(|r| UiAction::OpenDetail {
                media_type: r.media_type,
                id: r.id,
                poster: r.poster_path.clone(),
            }),
            _ => None,
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.search.list.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.search.list.down();
                None
            }
            KeyCode::Home => {
                self.search.list.first();
                None
            }
            KeyCode::End => {
                self.search.list.last();
                None
            }
            KeyCode::Enter => self.search.selected_result().map(|r| UiAction::OpenDetail {
                media_type: r.media_type,
                id: r.id,
                poster: r.poster_path.clone(),
            }),
            _ => None,
        }
    }

    fn handle_detail_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        let detail = self.detail.as_mut()?;

        // Pickers capture navigation while open
        if detail.country_picker_open {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => detail.country_list.up(),
                KeyCode::Down | KeyCode::Char('j') => detail.country_list.down(),
                KeyCode::Enter => {
                    if let Some(code) = detail
                        .providers
                        .keys()
                        .nth(detail.country_list.selected)
                        .cloned()
                    {
                        detail.country = code;
                    }
                    detail.country_picker_open = false;
                }
                _ => {}
            }
            return None;
        }
        if detail.season_picker_open {
            match key.code {
                KeyCode::Up | KeyCode::Char('k') => detail.season_list.up(),
                KeyCode::Down | KeyCode::Char('j') => detail.season_list.down(),
                KeyCode::Enter => {
                    detail.season_picker_open = false;
                    if let Some(FetchState::Ready(DetailContent::Tv(tv))) =
                        self.detail.as_ref().map(|d| &d.state)
                    {
                        let season = tv
                            .seasons
                            .get(self.detail.as_ref()?.season_list.selected)
                            .map(|s| s.season_number)?;
                        let id = self.detail.as_ref()?.id;
                        return Some(UiAction::FetchSeason { id, season });
                    }
                }
                _ => {}
            }
            return None;
        }

        match key.code {
            // Heart toggle: optimistic flip, persistence is fire-and-forget
            KeyCode::Char('v') => {
                detail.is_favorite = !detail.is_favorite;
                Some(UiAction::SetFavorite {
                    entry: detail.list_entry(),
                    saved: detail.is_favorite,
                })
            }
            // Watchlist toggle
            KeyCode::Char('b') => {
                detail.in_watchlist = !detail.in_watchlist;
                Some(UiAction::SetWatchlist {
                    entry: detail.list_entry(),
                    saved: detail.in_watchlist,
                })
            }
            KeyCode::Char('t') => detail
                .state
                .value()
                .and_then(|c| c.trailer_key())
                .map(|k| UiAction::OpenTrailer(youtube_url(k))),
            KeyCode::Char('c') => {
                detail.country_picker_open = !detail.providers.is_empty();
                None
            }
            KeyCode::Char('s') if detail.media_type == MediaType::Tv => {
                detail.season_picker_open = detail.state.is_ready();
                None
            }
            KeyCode::Tab => {
                detail.tab = match detail.tab {
                    DetailTab::Stream => DetailTab::Cast,
                    DetailTab::Cast => DetailTab::Stream,
                };
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                detail.episode_list.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                detail.episode_list.down();
                None
            }
            _ => None,
        }
    }

    fn handle_saved_list_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        let saved = match self.state {
            AppState::Favorites => &mut self.favorites,
            _ => &mut self.watchlist,
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                saved.list.up();
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                saved.list.down();
                None
            }
            KeyCode::Enter => {
                let entry = saved.selected_entry()?;
                let id = entry.id.parse().ok()?;
                Some(UiAction::OpenDetail {
                    media_type: entry.media_type,
                    id,
                    poster: entry.poster.clone(),
                })
            }
            _ => None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: u64, media_type: MediaType) -> SearchResult {
        SearchResult {
            id,
            media_type,
            title: format!("Item {}", id),
            year: Some(2020),
            overview: String::new(),
            poster_path: Some(format!("/{}.jpg", id)),
            vote_average: 7.0,
        }
    }

    // -------------------------------------------------------------------------
    // ListState Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_list_state_navigation() {
        let mut list = ListState::new(5);
        assert_eq!(list.selected, 0);

        list.down();
        assert_eq!(list.selected, 1);

        list.down();
        list.down();
        list.down();
        assert_eq!(list.selected, 4);

        // Can't go past end
        list.down();
        assert_eq!(list.selected, 4);

        list.up();
        assert_eq!(list.selected, 3);

        list.first();
        assert_eq!(list.selected, 0);

        list.last();
        assert_eq!(list.selected, 4);
    }

    #[test]
    fn test_list_state_set_len() {
        let mut list = ListState::new(10);
        list.selected = 8;

        // Shrinking should clamp selection
        list.set_len(5);
        assert_eq!(list.selected, 4);

        // Growing shouldn't change selection
        list.set_len(10);
        assert_eq!(list.selected, 4);
    }

    // -------------------------------------------------------------------------
    // Navigation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_app_navigation() {
        let mut app = App::new();
        assert_eq!(app.state, AppState::Home);

        app.navigate(AppState::Search);
        app.navigate(AppState::Favorites);
        assert_eq!(app.nav_stack.len(), 2);

        assert!(app.back());
        assert_eq!(app.state, AppState::Search);
        assert!(app.back());
        assert_eq!(app.state, AppState::Home);
        assert!(!app.back());
    }

    #[test]
    fn test_back_from_detail_cancels_loader() {
        let mut app = App::new();
        let ticket = app.begin_detail(MediaType::Movie, 603, None);
        assert_eq!(app.state, AppState::Detail);

        app.back();
        assert_eq!(app.state, AppState::Home);
        assert!(app.detail.is_none());
        // A late result for the abandoned screen must be rejected
        assert!(!app.detail_loader.accept(&ticket));
    }

    // -------------------------------------------------------------------------
    // Stale-Result Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_stale_search_result_is_dropped() {
        let mut app = App::new();
        let stale = app.begin_search("first".into());
        let fresh = app.begin_search("second".into());

        // Stale result arrives after the new fetch was dispatched
        app.apply_event(AppEvent::SearchLoaded {
            ticket: stale,
            result: Ok(vec![result(1, MediaType::Movie)]),
        });
        assert!(app.search.state.is_pending());
        assert!(app.search.results.is_empty());

        app.apply_event(AppEvent::SearchLoaded {
            ticket: fresh,
            result: Ok(vec![result(2, MediaType::Tv)]),
        });
        assert!(app.search.state.is_ready());
        assert_eq!(app.search.results.len(), 1);
        assert_eq!(app.search.results[0].id, 2);
    }

    #[test]
    fn test_stale_detail_result_is_dropped() {
        let mut app = App::new();
        let stale = app.begin_detail(MediaType::Movie, 603, None);
        let fresh = app.begin_detail(MediaType::Movie, 604, None);

        let content = |id: u64| {
            DetailContent::Movie(MovieDetail {
                id,
                title: format!("Movie {}", id),
                year: 1999,
                runtime: 120,
                genres: vec![],
                overview: String::new(),
                vote_average: 8.0,
                poster_path: None,
                backdrop_path: None,
                trailer_key: None,
                cast: vec![],
            })
        };

        app.apply_event(AppEvent::DetailLoaded {
            ticket: stale,
            result: Ok(content(603)),
        });
        let detail = app.detail.as_ref().unwrap();
        assert!(detail.state.is_pending());

        app.apply_event(AppEvent::DetailLoaded {
            ticket: fresh,
            result: Ok(content(604)),
        });
        let detail = app.detail.as_ref().unwrap();
        match detail.state.value().unwrap() {
            DetailContent::Movie(m) => assert_eq!(m.id, 604),
            _ => panic!("expected movie content"),
        }
    }

    #[test]
    fn test_secondary_failure_keeps_primary_state() {
        let mut app = App::new();
        let ticket = app.begin_detail(MediaType::Tv, 1396, None);

        let tv = DetailContent::Tv(TvDetail {
            id: 1396,
            name: "Breaking Bad".into(),
            year: 2008,
            number_of_seasons: 5,
            seasons: vec![],
            genres: vec![],
            overview: String::new(),
            vote_average: 9.5,
            poster_path: None,
            backdrop_path: None,
            trailer_key: None,
            cast: vec![],
        });
        app.apply_event(AppEvent::DetailLoaded {
            ticket: ticket.clone(),
            result: Ok(tv),
        });
        assert!(app.detail.as_ref().unwrap().state.is_ready());

        // Provider fetch failure degrades silently
        app.apply_event(AppEvent::ProvidersLoaded {
            ticket,
            result: Err("network down".into()),
        });
        let detail = app.detail.as_ref().unwrap();
        assert!(detail.state.is_ready());
        assert!(detail.providers.is_empty());
    }

    #[test]
    fn test_primary_failure_sets_failed_state() {
        let mut app = App::new();
        let ticket = app.begin_detail(MediaType::Movie, 603, None);
        app.apply_event(AppEvent::DetailLoaded {
            ticket,
            result: Err("timeout".into()),
        });
        let detail = app.detail.as_ref().unwrap();
        assert!(detail.state.is_failed());
        assert_eq!(detail.state.error(), Some("timeout"));
    }

    // -------------------------------------------------------------------------
    // Toggle Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_favorite_toggle_is_optimistic() {
        let mut app = App::new();
        let ticket = app.begin_detail(MediaType::Movie, 603, Some("/abc.jpg".into()));
        app.apply_event(AppEvent::MembershipLoaded {
            ticket,
            is_favorite: false,
            in_watchlist: false,
        });

        let action = app.handle_key(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::empty()));
        // State flips before persistence happens
        assert!(app.detail.as_ref().unwrap().is_favorite);
        match action {
            Some(UiAction::SetFavorite { entry, saved }) => {
                assert!(saved);
                assert_eq!(entry.id, "603");
                assert_eq!(entry.poster.as_deref(), Some("/abc.jpg"));
                assert_eq!(entry.media_type, MediaType::Movie);
            }
            other => panic!("unexpected action: {:?}", other),
        }

        // Second press removes
        let action = app.handle_key(KeyEvent::new(KeyCode::Char('v'), KeyModifiers::empty()));
        assert!(!app.detail.as_ref().unwrap().is_favorite);
        assert!(matches!(
            action,
            Some(UiAction::SetFavorite { saved: false, .. })
        ));
    }

    // -------------------------------------------------------------------------
    // Key Handling Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_app_quit_key() {
        let mut app = App::new();
        assert!(app.running);
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::empty()));
        assert!(!app.running);
    }

    #[test]
    fn test_app_focus_search() {
        let mut app = App::new();
        app.handle_key(KeyEvent::new(KeyCode::Char('/'), KeyModifiers::empty()));
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.state, AppState::Search);
    }

    #[test]
    fn test_saved_list_shortcut_triggers_refresh() {
        let mut app = App::new();
        let action = app.handle_key(KeyEvent::new(KeyCode::Char('f'), KeyModifiers::empty()));
        assert_eq!(app.state, AppState::Favorites);
        assert_eq!(action, Some(UiAction::RefreshFavorites));

        let action = app.handle_key(KeyEvent::new(KeyCode::Char('w'), KeyModifiers::empty()));
        assert_eq!(app.state, AppState::Watchlist);
        assert_eq!(action, Some(UiAction::RefreshWatchlist));
    }

    #[test]
    fn test_open_detail_from_saved_list() {
        let mut app = App::new();
        app.navigate(AppState::Watchlist);
        app.watchlist.set_entries(vec![ListEntry::new(
            "1396",
            Some("/bb.jpg".into()),
            MediaType::Tv,
        )]);

        let action = app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()));
        assert_eq!(
            action,
            Some(UiAction::OpenDetail {
                media_type: MediaType::Tv,
                id: 1396,
                poster: Some("/bb.jpg".into()),
            })
        );
    }

    #[test]
    fn test_editing_feeds_debouncer() {
        let mut app = App::new();
        app.focus_search();
        for c in "inception".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty()));
        }
        assert_eq!(app.search.query, "inception");

        // Not due yet right after typing
        assert_eq!(app.poll_search(Instant::now()), None);
        // Due after the quiet period
        let later = Instant::now() + std::time::Duration::from_millis(1100);
        assert_eq!(app.poll_search(later), Some("inception".to_string()));
    }

    #[test]
    fn test_short_query_clears_results() {
        let mut app = App::new();
        app.search.set_results(vec![result(1, MediaType::Movie)]);
        app.focus_search();
        for c in "dune".chars() {
            app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty()));
        }

        let later = Instant::now() + std::time::Duration::from_millis(1100);
        // Gate: no fetch, results cleared
        assert_eq!(app.poll_search(later), None);
        assert!(app.search.results.is_empty());
        assert!(!app.search.state.is_pending());
    }
}
