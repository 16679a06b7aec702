//! ReelTUI - Terminal companion for browsing and tracking movies & TV
//!
//! A terminal interface for searching movies and TV shows, browsing trending
//! titles, checking where to stream them, and keeping favorites and a
//! watchlist.
//!
//! # Usage
//!
//! ```bash
//! # Launch interactive TUI
//! reeltui
//!
//! # CLI mode (for automation)
//! reeltui search "blade runner"
//! reeltui favorites add 603 -t movie
//! reeltui watchlist --json
//! ```

mod api;
mod app;
mod cli;
mod commands;
mod config;
mod loader;
mod models;
mod store;
mod ui;

use std::io::{stdout, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::api::{TmdbClient, TrendingMedia, TrendingWindow};
use crate::app::{
    App, AppEvent, AppState, DetailContent, DetailKey, DetailTab, HomeRail, InputMode, UiAction,
};
use crate::cli::{Cli, Command, ExitCode, Output};
use crate::config::Config;
use crate::loader::{FetchState, Ticket};
use crate::models::{country_name, ListEntry, MediaType, SearchResult};
use crate::store::{file_store_at, FileStore, Library, FAVORITES, WATCHLIST};
use crate::ui::Theme;

/// Terminal type alias for convenience
type Tui = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(!cli.is_cli_mode());

    if cli.is_cli_mode() {
        // CLI mode: execute command and exit
        let exit_code = run_cli(cli).await;
        std::process::exit(exit_code.into());
    } else {
        // TUI mode: launch interactive interface
        run_tui(cli).await
    }
}

/// Set up tracing. In TUI mode logs go to a file so they don't fight the
/// alternate screen; in CLI mode they go to stderr.
fn init_logging(tui: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("reeltui=info"));

    if tui {
        let Some(log_path) = store::default_data_dir().map(|d| d.join("reeltui.log")) else {
            return;
        };
        if let Some(parent) = log_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(file) = std::fs::File::options().create(true).append(true).open(&log_path) {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();
        }
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);
    let data_dir = cli.data_dir.clone();

    match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &output).await,

        Some(Command::Trending(cmd)) => commands::trending_cmd(cmd, &output).await,

        Some(Command::Info(cmd)) => commands::info_cmd(cmd, &output).await,

        Some(Command::Season(cmd)) => commands::season_cmd(cmd, &output).await,

        Some(Command::Providers(cmd)) => commands::providers_cmd(cmd, &output).await,

        Some(Command::Favorites(cmd)) => {
            commands::list_cmd(FAVORITES, cmd, data_dir.as_deref(), &output).await
        }

        Some(Command::Watchlist(cmd)) => {
            commands::list_cmd(WATCHLIST, cmd, data_dir.as_deref(), &output).await
        }

        None => {
            // This shouldn't happen (handled by is_cli_mode check)
            ExitCode::Success
        }
    }
}

// =============================================================================
// TUI Mode
// =============================================================================

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal to normal state
fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Services shared by the spawned fetch tasks
struct Services {
    client: TmdbClient,
    library: Library<FileStore>,
    events: mpsc::UnboundedSender<AppEvent>,
}

/// Run interactive TUI
async fn run_tui(cli: Cli) -> Result<()> {
    let mut config = Config::load();
    let api_key = config.get_tmdb_api_key();
    let data_dir = cli.data_dir.or_else(|| config.data_dir.clone());

    let store = file_store_at(data_dir.as_deref())?;
    let (tx, rx) = mpsc::unbounded_channel();
    let services = Arc::new(Services {
        client: TmdbClient::new(api_key),
        library: Library::new(store),
        events: tx,
    });

    let mut app = App::new();
    app.default_country = config.country().to_string();

    // Initialize terminal
    let mut terminal = init_terminal()?;

    // Run the main event loop
    let result = run_event_loop(&mut terminal, &mut app, services, rx).await;

    // Always restore terminal, even on error
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop - handles input, applies async results, renders UI
async fn run_event_loop(
    terminal: &mut Tui,
    app: &mut App,
    services: Arc<Services>,
    mut rx: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    const TICK_RATE: Duration = Duration::from_millis(100);

    // Trending rails load on startup
    spawn_trending(&services);
    app.home.trending_tv = FetchState::Pending;
    app.home.trending_movies = FetchState::Pending;

    // Ticket covering the detail screen currently open, for follow-up fetches
    let mut detail_ticket: Option<Ticket<DetailKey>> = None;

    while app.running {
        // Render current state
        terminal.draw(|frame| render_ui(frame, app))?;

        // Poll for events with timeout
        if event::poll(TICK_RATE)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (ignore releases on Windows)
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        dispatch_action(app, &services, action, &mut detail_ticket);
                    }
                }
            }
        }

        // Apply completed async work
        while let Ok(event) = rx.try_recv() {
            app.apply_event(event);
        }

        // Debounced search
        if let Some(query) = app.poll_search(Instant::now()) {
            let ticket = app.begin_search(query.clone());
            let services = services.clone();
            tokio::spawn(async move {
                let result = services
                    .client
                    .search(&query)
                    .await
                    .map_err(|e| e.to_string());
                let _ = services
                    .events
                    .send(AppEvent::SearchLoaded { ticket, result });
            });
        }
    }

    Ok(())
}

/// Load both trending rails
fn spawn_trending(services: &Arc<Services>) {
    let svc = services.clone();
    tokio::spawn(async move {
        let result = svc
            .client
            .trending(TrendingMedia::Tv, TrendingWindow::Week)
            .await
            .map_err(|e| e.to_string());
        let _ = svc.events.send(AppEvent::TrendingTv(result));
    });
    let svc = services.clone();
    tokio::spawn(async move {
        let result = svc
            .client
            .trending(TrendingMedia::Movie, TrendingWindow::Week)
            .await
            .map_err(|e| e.to_string());
        let _ = svc.events.send(AppEvent::TrendingMovies(result));
    });
}

/// Spawn the work a key press asked for
fn dispatch_action(
    app: &mut App,
    services: &Arc<Services>,
    action: UiAction,
    detail_ticket: &mut Option<Ticket<DetailKey>>,
) {
    match action {
        UiAction::OpenDetail {
            media_type,
            id,
            poster,
        } => {
            let ticket = app.begin_detail(media_type, id, poster);
            *detail_ticket = Some(ticket.clone());

            // Primary: the detail document
            let svc = services.clone();
            let t = ticket.clone();
            tokio::spawn(async move {
                let result = match media_type {
                    MediaType::Movie => svc
                        .client
                        .movie_detail(id)
                        .await
                        .map(DetailContent::Movie)
                        .map_err(|e| e.to_string()),
                    MediaType::Tv => svc
                        .client
                        .tv_detail(id)
                        .await
                        .map(DetailContent::Tv)
                        .map_err(|e| e.to_string()),
                };
                let _ = svc.events.send(AppEvent::DetailLoaded { ticket: t, result });
            });

            // Secondary: watch providers
            let svc = services.clone();
            let t = ticket.clone();
            tokio::spawn(async move {
                let result = svc
                    .client
                    .watch_providers(media_type, id)
                    .await
                    .map_err(|e| e.to_string());
                let _ = svc
                    .events
                    .send(AppEvent::ProvidersLoaded { ticket: t, result });
            });

            // Secondary: saved-list membership
            let svc = services.clone();
            tokio::spawn(async move {
                let id = id.to_string();
                let is_favorite = match svc.library.is_member(FAVORITES, &id).await {
                    Ok(member) => member,
                    Err(e) => {
                        warn!(error = %e, "favorites membership read failed");
                        false
                    }
                };
                let in_watchlist = match svc.library.is_member(WATCHLIST, &id).await {
                    Ok(member) => member,
                    Err(e) => {
                        warn!(error = %e, "watchlist membership read failed");
                        false
                    }
                };
                let _ = svc.events.send(AppEvent::MembershipLoaded {
                    ticket,
                    is_favorite,
                    in_watchlist,
                });
            });
        }

        UiAction::SetFavorite { entry, saved } => {
            spawn_list_write(services, FAVORITES, entry, saved);
        }

        UiAction::SetWatchlist { entry, saved } => {
            spawn_list_write(services, WATCHLIST, entry, saved);
        }

        UiAction::OpenTrailer(url) => {
            if let Err(e) = open::that_detached(&url) {
                warn!(error = %e, url, "failed to open trailer");
                app.set_error("Could not open browser for trailer");
            }
        }

        UiAction::FetchSeason { id, season } => {
            if let Some(ticket) = detail_ticket.clone() {
                let svc = services.clone();
                tokio::spawn(async move {
                    let result = svc
                        .client
                        .tv_season(id, season)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = svc.events.send(AppEvent::SeasonLoaded {
                        ticket,
                        season,
                        result,
                    });
                });
            }
        }

        UiAction::RefreshFavorites => {
            app.begin_saved_list(AppState::Favorites);
            let svc = services.clone();
            tokio::spawn(async move {
                let result = svc
                    .library
                    .entries(FAVORITES)
                    .await
                    .map_err(|e| e.to_string());
                let _ = svc.events.send(AppEvent::FavoritesLoaded(result));
            });
        }

        UiAction::RefreshWatchlist => {
            app.begin_saved_list(AppState::Watchlist);
            let svc = services.clone();
            tokio::spawn(async move {
                let result = svc
                    .library
                    .entries(WATCHLIST)
                    .await
                    .map_err(|e| e.to_string());
                let _ = svc.events.send(AppEvent::WatchlistLoaded(result));
            });
        }
    }
}

/// Persist an optimistic list toggle. Failures are logged; the screen
/// already shows the new state.
fn spawn_list_write(services: &Arc<Services>, list: &'static str, entry: ListEntry, saved: bool) {
    let svc = services.clone();
    tokio::spawn(async move {
        let result = if saved {
            svc.library.add(list, entry).await
        } else {
            svc.library.remove(list, &entry.id).await
        };
        if let Err(e) = result {
            warn!(error = %e, list, "list write failed");
        }
    });
}

// =============================================================================
// UI Rendering
// =============================================================================

/// Main render function - dispatches to view-specific renderers
fn render_ui(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Clear with background color
    frame.render_widget(Clear, area);
    frame.render_widget(
        Block::default().style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
        area,
    );

    // Main layout: header, content, status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    // Render components
    render_header(frame, chunks[0], app);
    render_content(frame, chunks[1], app);
    render_status_bar(frame, chunks[2], app);

    // Render error overlay if present
    if let Some(ref error) = app.error {
        render_error_popup(frame, area, error);
    }
}

/// Render the header with title and search box
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Logo
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    // Logo
    let logo = Paragraph::new(Line::from(vec![
        Span::styled(
            "REEL",
            ratatui::style::Style::default()
                .fg(Theme::PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "TUI",
            ratatui::style::Style::default()
                .fg(Theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(ratatui::style::Style::default().fg(Theme::BORDER)),
    );
    frame.render_widget(logo, header_chunks[0]);

    // Search box
    let search_style = if app.input_mode == InputMode::Editing {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let search_text = if app.input_mode == InputMode::Editing {
        let query = &app.search.query;
        let cursor = app.search.cursor.min(query.len());
        let (before, after) = query.split_at(cursor);
        format!("⌕ {}│{}", before, after)
    } else if app.search.query.is_empty() {
        "⌕ Type / to search...".to_string()
    } else {
        format!("⌕ {}", app.search.query)
    };

    let search_box = Paragraph::new(search_text)
        .style(if app.input_mode == InputMode::Editing {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(search_style)
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(search_box, header_chunks[1]);
}

/// Render the main content area based on current state
fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.state {
        AppState::Home => render_home(frame, area, app),
        AppState::Search => render_search_results(frame, area, app),
        AppState::Detail => render_detail(frame, area, app),
        AppState::Favorites => render_saved_list(frame, area, app, " ♥ FAVORITES ", &app.favorites),
        AppState::Watchlist => render_saved_list(frame, area, app, " ⛉ WATCHLIST ", &app.watchlist),
    }
}

/// Render home screen with the two trending rails
fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let rails = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_rail(
        frame,
        rails[0],
        " TRENDING TV ",
        &app.home.trending_tv,
        app.home.tv_list.selected,
        app.home.rail == HomeRail::Tv,
    );
    render_rail(
        frame,
        rails[1],
        " TRENDING MOVIES ",
        &app.home.trending_movies,
        app.home.movie_list.selected,
        app.home.rail == HomeRail::Movies,
    );
}

/// One horizontal trending rail
fn render_rail(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    state: &FetchState<Vec<SearchResult>>,
    selected: usize,
    focused: bool,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            Theme::border_focused()
        } else {
            Theme::border()
        })
        .title(Span::styled(title, Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match state {
        FetchState::Idle | FetchState::Pending => {
            let loading = Paragraph::new("⟳ Loading...")
                .style(Theme::loading())
                .alignment(Alignment::Center);
            frame.render_widget(loading, inner);
        }
        FetchState::Failed(e) => {
            let failed = Paragraph::new(e.as_str())
                .style(Theme::error())
                .alignment(Alignment::Center);
            frame.render_widget(failed, inner);
        }
        FetchState::Ready(results) if results.is_empty() => {
            let empty = Paragraph::new("Nothing trending")
                .style(Theme::dimmed())
                .alignment(Alignment::Center);
            frame.render_widget(empty, inner);
        }
        FetchState::Ready(results) => {
            // Cards render as a strip of titles starting at the selection
            let mut spans: Vec<Span> = Vec::new();
            for (i, result) in results.iter().enumerate().skip(selected.saturating_sub(1)) {
                let label = format!(" {} ", result.title);
                if i == selected {
                    spans.push(Span::styled(label, Theme::list_item_selected()));
                } else {
                    spans.push(Span::styled(label, Theme::list_item()));
                }
                spans.push(Span::styled("·", Theme::dimmed()));
            }

            let rows = vec![
                Line::from(""),
                Line::from(spans),
                Line::from(""),
                Line::from(vec![
                    Span::styled(
                        results
                            .get(selected)
                            .and_then(|r| r.year)
                            .map(|y| format!("{}  ", y))
                            .unwrap_or_default(),
                        Theme::year(),
                    ),
                    Span::styled(
                        results
                            .get(selected)
                            .map(|r| format!("★ {:.1}", r.vote_average))
                            .unwrap_or_default(),
                        Theme::rating(),
                    ),
                ]),
            ];
            let strip = Paragraph::new(rows).wrap(Wrap { trim: false });
            frame.render_widget(strip, inner);
        }
    }
}

/// Render search results
fn render_search_results(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" RESULTS ({}) ", app.search.results.len()),
            Theme::title(),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.search.state.is_pending() {
        let loading = Paragraph::new("⟳ Searching...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    if let Some(e) = app.search.state.error() {
        let failed = Paragraph::new(e)
            .style(Theme::error())
            .alignment(Alignment::Center);
        frame.render_widget(failed, inner);
        return;
    }

    if app.search.results.is_empty() {
        let empty = Paragraph::new(if app.search.query.is_empty() {
            "Type to search for movies and TV shows..."
        } else {
            "No results found"
        })
        .style(Theme::dimmed())
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    // Build result list
    let items: Vec<ListItem> = app
        .search
        .results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let is_selected = i == app.search.list.selected;
            let marker = if is_selected { "▸ " } else { "  " };
            let year_str = result.year.map(|y| format!(" ({})", y)).unwrap_or_default();
            let type_str = match result.media_type {
                MediaType::Movie => "MOVIE",
                MediaType::Tv => "TV",
            };

            let line = Line::from(vec![
                Span::styled(
                    marker,
                    if is_selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(
                    &result.title,
                    if is_selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::styled(year_str, Theme::year()),
                Span::raw(" "),
                Span::styled(format!("[{}]", type_str), Theme::genre()),
                Span::raw(" "),
                Span::styled(
                    format!("★ {:.1}", result.vote_average),
                    if result.vote_average >= 7.0 {
                        Theme::success()
                    } else {
                        Theme::dimmed()
                    },
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).style(Theme::text());
    frame.render_widget(list, inner);
}

/// Render detail view (movie or TV show)
fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some(detail) = &app.detail else {
        return;
    };

    let title = detail
        .state
        .value()
        .map(|c| c.title())
        .unwrap_or("DETAIL");

    let saved_markers = Line::from(vec![
        Span::styled(
            if detail.is_favorite { " ♥ " } else { " ♡ " },
            if detail.is_favorite {
                Theme::favorite_on()
            } else {
                Theme::marker_off()
            },
        ),
        Span::styled(
            if detail.in_watchlist { "⛉ " } else { "⛶ " },
            if detail.in_watchlist {
                Theme::watchlist_on()
            } else {
                Theme::marker_off()
            },
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(format!(" {} ", title), Theme::title()))
        .title_top(saved_markers.right_aligned());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &detail.state {
        FetchState::Idle | FetchState::Pending => {
            let loading = Paragraph::new("⟳ Loading...")
                .style(Theme::loading())
                .alignment(Alignment::Center);
            frame.render_widget(loading, inner);
        }
        FetchState::Failed(e) => {
            let failed = Paragraph::new(e.as_str())
                .style(Theme::error())
                .alignment(Alignment::Center);
            frame.render_widget(failed, inner);
        }
        FetchState::Ready(content) => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(inner);

            render_detail_info(frame, columns[0], detail, content);
            match detail.tab {
                DetailTab::Stream => render_detail_providers(frame, columns[1], detail),
                DetailTab::Cast => render_detail_cast(frame, columns[1], content),
            }
        }
    }

    if detail.country_picker_open {
        render_country_picker(frame, area, detail);
    }
    if detail.season_picker_open {
        render_season_picker(frame, area, detail);
    }
}

/// Left column: metadata, overview, episodes for TV
fn render_detail_info(frame: &mut Frame, area: Rect, detail: &app::DetailScreen, content: &DetailContent) {
    let mut lines: Vec<Line> = vec![Line::from("")];

    match content {
        DetailContent::Movie(movie) => {
            lines.push(Line::from(vec![
                Span::styled(format!("{}  ", movie.year), Theme::year()),
                Span::styled(format!("{} min  ", movie.runtime), Theme::genre()),
                Span::styled(format!("★ {:.1}", movie.vote_average), Theme::rating()),
            ]));
            lines.push(Line::from(Span::styled(
                movie.genres.join(" · "),
                Theme::genre(),
            )));
        }
        DetailContent::Tv(tv) => {
            lines.push(Line::from(vec![
                Span::styled(format!("{}  ", tv.year), Theme::year()),
                Span::styled(
                    format!("{} seasons  ", tv.number_of_seasons),
                    Theme::genre(),
                ),
                Span::styled(format!("★ {:.1}", tv.vote_average), Theme::rating()),
            ]));
            lines.push(Line::from(Span::styled(
                tv.genres.join(" · "),
                Theme::genre(),
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        content.overview().to_string(),
        Theme::text(),
    )));
    lines.push(Line::from(""));

    if let DetailContent::Tv(_) = content {
        lines.push(Line::from(Span::styled(
            format!("SEASON {}", detail.selected_season),
            Theme::accent(),
        )));
        if detail.episodes.is_empty() {
            lines.push(Line::from(Span::styled(
                "Press s to pick a season",
                Theme::dimmed(),
            )));
        } else {
            for (i, ep) in detail.episodes.iter().enumerate() {
                let is_selected = i == detail.episode_list.selected;
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:>3}. ", ep.episode),
                        if is_selected {
                            Theme::accent()
                        } else {
                            Theme::dimmed()
                        },
                    ),
                    Span::styled(
                        ep.name.clone(),
                        if is_selected {
                            Theme::selected()
                        } else {
                            Theme::text()
                        },
                    ),
                ]));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" v ", Theme::keybind()),
        Span::styled("favorite  ", Theme::keybind_desc()),
        Span::styled(" b ", Theme::keybind()),
        Span::styled("watchlist  ", Theme::keybind_desc()),
        Span::styled(" t ", Theme::keybind()),
        Span::styled("trailer  ", Theme::keybind_desc()),
        Span::styled(" TAB ", Theme::keybind()),
        Span::styled("cast/where", Theme::keybind_desc()),
    ]));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, area);
}

/// Right column: where to watch in the chosen country
fn render_detail_providers(frame: &mut Frame, area: Rect, detail: &app::DetailScreen) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!(" WHERE TO WATCH · {} ", country_name(&detail.country)),
            Theme::title(),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(country) = detail.providers.get(&detail.country) else {
        let empty = Paragraph::new("No streaming info for this country\nPress c to change country")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    };

    let mut lines: Vec<Line> = vec![Line::from("")];
    for (label, providers) in [
        ("STREAM", &country.flatrate),
        ("RENT", &country.rent),
        ("BUY", &country.buy),
        ("FREE WITH ADS", &country.ads),
    ] {
        if providers.is_empty() {
            continue;
        }
        lines.push(Line::from(Span::styled(label, Theme::provider_kind())));
        for provider in providers {
            lines.push(Line::from(vec![
                Span::raw("   "),
                Span::styled(provider.provider_name.clone(), Theme::text()),
            ]));
        }
        lines.push(Line::from(""));
    }
    if lines.len() <= 1 {
        lines.push(Line::from(Span::styled(
            "Not streaming anywhere here",
            Theme::dimmed(),
        )));
    }

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}

/// Right column: top billed cast
fn render_detail_cast(frame: &mut Frame, area: Rect, content: &DetailContent) {
    let cast = match content {
        DetailContent::Movie(m) => &m.cast,
        DetailContent::Tv(t) => &t.cast,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" CAST ", Theme::title()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if cast.is_empty() {
        let empty = Paragraph::new("No cast information")
            .style(Theme::dimmed())
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let items: Vec<ListItem> = cast
        .iter()
        .map(|member| {
            ListItem::new(Line::from(vec![
                Span::styled(member.name.clone(), Theme::text()),
                Span::styled(format!("  as {}", member.character), Theme::dimmed()),
            ]))
        })
        .collect();
    frame.render_widget(List::new(items).style(Theme::text()), inner);
}

/// Country picker popup over the detail view
fn render_country_picker(frame: &mut Frame, area: Rect, detail: &app::DetailScreen) {
    let popup = centered_popup(area, 40, 16);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(" COUNTRY ", Theme::title()))
        .style(ratatui::style::Style::default().bg(Theme::BACKGROUND));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let visible = inner.height as usize;
    let items: Vec<ListItem> = detail
        .providers
        .keys()
        .enumerate()
        .skip(detail.country_list.offset)
        .take(visible)
        .map(|(i, code)| {
            let style = if i == detail.country_list.selected {
                Theme::list_item_selected()
            } else {
                Theme::list_item()
            };
            ListItem::new(Line::from(Span::styled(
                format!(" {} {}", code, country_name(code)),
                style,
            )))
        })
        .collect();
    frame.render_widget(List::new(items), inner);
}

/// Season picker popup for TV shows
fn render_season_picker(frame: &mut Frame, area: Rect, detail: &app::DetailScreen) {
    let Some(DetailContent::Tv(tv)) = detail.state.value() else {
        return;
    };

    let popup = centered_popup(area, 36, 14);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(" SEASON ", Theme::title()))
        .style(ratatui::style::Style::default().bg(Theme::BACKGROUND));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let items: Vec<ListItem> = tv
        .seasons
        .iter()
        .enumerate()
        .map(|(i, season)| {
            let style = if i == detail.season_list.selected {
                Theme::list_item_selected()
            } else {
                Theme::list_item()
            };
            ListItem::new(Line::from(Span::styled(
                format!(
                    " Season {} ({} episodes)",
                    season.season_number, season.episode_count
                ),
                style,
            )))
        })
        .collect();
    frame.render_widget(List::new(items), inner);
}

/// Render favorites or watchlist grid
fn render_saved_list(
    frame: &mut Frame,
    area: Rect,
    _app: &App,
    title: &str,
    saved: &app::SavedListState,
) {
    let count = saved.state.value().map(|e| e.len()).unwrap_or(0);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(
            format!("{}({}) ", title, count),
            Theme::title(),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &saved.state {
        FetchState::Idle | FetchState::Pending => {
            let loading = Paragraph::new("⟳ Loading...")
                .style(Theme::loading())
                .alignment(Alignment::Center);
            frame.render_widget(loading, inner);
        }
        FetchState::Failed(e) => {
            let failed = Paragraph::new(e.as_str())
                .style(Theme::error())
                .alignment(Alignment::Center);
            frame.render_widget(failed, inner);
        }
        FetchState::Ready(entries) if entries.is_empty() => {
            let empty = Paragraph::new("Nothing saved yet")
                .style(Theme::dimmed())
                .alignment(Alignment::Center);
            frame.render_widget(empty, inner);
        }
        FetchState::Ready(entries) => {
            let items: Vec<ListItem> = entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    let is_selected = i == saved.list.selected;
                    let marker = if is_selected { "▸ " } else { "  " };
                    let type_str = match entry.media_type {
                        MediaType::Movie => "MOVIE",
                        MediaType::Tv => "TV",
                    };
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            marker,
                            if is_selected {
                                Theme::accent()
                            } else {
                                Theme::dimmed()
                            },
                        ),
                        Span::styled(
                            format!("#{}", entry.id),
                            if is_selected {
                                Theme::highlighted()
                            } else {
                                Theme::text()
                            },
                        ),
                        Span::raw(" "),
                        Span::styled(format!("[{}]", type_str), Theme::genre()),
                        Span::raw(" "),
                        Span::styled(
                            entry.poster.clone().unwrap_or_default(),
                            Theme::dimmed(),
                        ),
                    ]))
                })
                .collect();
            frame.render_widget(List::new(items).style(Theme::text()), inner);
        }
    }
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            ratatui::style::Style::default()
                .fg(Theme::BACKGROUND)
                .bg(Theme::ACCENT),
        ),
    };

    let state_indicator = Span::styled(
        format!(" {} ", format!("{:?}", app.state).to_uppercase()),
        ratatui::style::Style::default().fg(Theme::DIM),
    );

    let help = Span::styled(
        " q:quit  /:search  f:favorites  w:watchlist  ESC:back ",
        Theme::dimmed(),
    );

    let status_line = Line::from(vec![
        mode_indicator,
        state_indicator,
        Span::raw(" │ "),
        help,
    ]);

    let status = Paragraph::new(status_line).style(Theme::status_bar());
    frame.render_widget(status, area);
}

/// Render error popup overlay
fn render_error_popup(frame: &mut Frame, area: Rect, error: &str) {
    let popup_area = centered_popup(area, 60, 5);
    frame.render_widget(Clear, popup_area);

    let error_block = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(error, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(ratatui::style::Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(error_block, popup_area);
}

/// Centered rect for popups
fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
