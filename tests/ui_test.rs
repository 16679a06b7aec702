//! UI component tests
//!
//! Tests theme colors and contrast, the main layout at several terminal
//! sizes, and the keyboard navigation model.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::TestBackend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, List, ListItem},
    Frame, Terminal,
};
use reeltui::app::{App, AppState, HomeRail, InputMode};
use reeltui::models::{MediaType, SearchResult};
use reeltui::ui::theme::{
    color_to_rgb, contrast_ratio, meets_wcag_aa_large, Theme,
};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}

fn result(id: u64, media_type: MediaType) -> SearchResult {
    SearchResult {
        id,
        media_type,
        title: format!("Item {}", id),
        year: Some(2021),
        overview: String::new(),
        poster_path: None,
        vote_average: 7.0,
    }
}

// =============================================================================
// THEME COLOR TESTS
// =============================================================================

/// All palette entries must be concrete RGB values
#[test]
fn test_theme_colors_valid_rgb() {
    let colors = [
        Theme::BACKGROUND,
        Theme::BACKGROUND_LIGHT,
        Theme::PRIMARY,
        Theme::ACCENT,
        Theme::HIGHLIGHT,
        Theme::TEXT,
        Theme::DIM,
        Theme::SUCCESS,
        Theme::WARNING,
        Theme::ERROR,
        Theme::BORDER,
    ];
    for color in colors {
        assert!(
            color_to_rgb(color).is_some(),
            "Palette color {:?} is not RGB",
            color
        );
    }
}

#[test]
fn test_theme_foreground_contrast() {
    let bg = color_to_rgb(Theme::BACKGROUND).unwrap();

    for (name, color) in [
        ("TEXT", Theme::TEXT),
        ("PRIMARY", Theme::PRIMARY),
        ("ACCENT", Theme::ACCENT),
        ("ERROR", Theme::ERROR),
        ("SUCCESS", Theme::SUCCESS),
    ] {
        let fg = color_to_rgb(color).unwrap();
        assert!(
            meets_wcag_aa_large(fg, bg),
            "{} contrast {:.2} below 3:1",
            name,
            contrast_ratio(fg, bg)
        );
    }
}

#[test]
fn test_theme_selected_row_readable() {
    // Selection inverts onto the primary color
    let fg = color_to_rgb(Theme::BACKGROUND).unwrap();
    let bg = color_to_rgb(Theme::PRIMARY).unwrap();
    assert!(meets_wcag_aa_large(fg, bg));
}

// =============================================================================
// LAYOUT RESPONSIVE TESTS
// =============================================================================

fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).unwrap()
}

/// Mirrors the frame layout used by the main loop
fn main_layout(_frame: &mut Frame, area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);
    (chunks[0], chunks[1], chunks[2])
}

#[test]
fn test_layout_minimum_size() {
    let mut terminal = test_terminal(80, 24);

    terminal
        .draw(|frame| {
            let area = frame.area();
            let (header, content, status) = main_layout(frame, area);

            assert_eq!(header.height, 3);
            assert_eq!(status.height, 1);
            assert_eq!(content.height, 20);
            assert_eq!(content.width, 80);
        })
        .unwrap();
}

#[test]
fn test_layout_large_size() {
    let mut terminal = test_terminal(200, 50);

    terminal
        .draw(|frame| {
            let area = frame.area();
            let (header, content, status) = main_layout(frame, area);

            assert_eq!(header.height, 3);
            assert_eq!(status.height, 1);
            assert_eq!(content.height, 46);
            assert_eq!(content.width, 200);
        })
        .unwrap();
}

#[test]
fn test_list_scrolls_past_viewport() {
    let mut terminal = test_terminal(80, 24);

    let items: Vec<ListItem> = (1..=50)
        .map(|i| ListItem::new(format!("Item {}", i)))
        .collect();
    let mut state = ratatui::widgets::ListState::default();
    state.select(Some(45));

    terminal
        .draw(|frame| {
            let area = frame.area();
            let (_, content, _) = main_layout(frame, area);
            assert!(content.height < 50);

            let list = List::new(items.clone())
                .block(Block::default().borders(Borders::ALL))
                .highlight_style(Theme::selected());
            frame.render_stateful_widget(list, content, &mut state);
            assert_eq!(state.selected(), Some(45));
        })
        .unwrap();
}

// =============================================================================
// NAVIGATION TESTS
// =============================================================================

#[test]
fn test_home_rail_switching() {
    let mut app = App::new();
    assert_eq!(app.home.rail, HomeRail::Tv);

    app.handle_key(key(KeyCode::Down));
    assert_eq!(app.home.rail, HomeRail::Movies);
    app.handle_key(key(KeyCode::Up));
    assert_eq!(app.home.rail, HomeRail::Tv);
}

#[test]
fn test_home_rail_cursor_movement() {
    let mut app = App::new();
    app.apply_event(reeltui::app::AppEvent::TrendingTv(Ok(vec![
        result(1, MediaType::Tv),
        result(2, MediaType::Tv),
        result(3, MediaType::Tv),
    ])));

    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Right));
    assert_eq!(app.home.tv_list.selected, 2);

    // Clamped at the end of the rail
    app.handle_key(key(KeyCode::Right));
    assert_eq!(app.home.tv_list.selected, 2);

    app.handle_key(key(KeyCode::Left));
    assert_eq!(app.home.tv_list.selected, 1);
}

#[test]
fn test_navigation_escape_returns_home() {
    let mut app = App::new();
    app.navigate(AppState::Search);
    app.navigate(AppState::Favorites);

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.state, AppState::Search);
    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.state, AppState::Home);

    // Escape at the root is a no-op
    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.state, AppState::Home);
}

#[test]
fn test_search_list_navigation() {
    let mut app = App::new();
    app.navigate(AppState::Search);
    app.search.set_results(vec![
        result(1, MediaType::Movie),
        result(2, MediaType::Movie),
        result(3, MediaType::Tv),
    ]);

    app.handle_key(key(KeyCode::Down));
    app.handle_key(key(KeyCode::Down));
    assert_eq!(app.search.list.selected, 2);
    app.handle_key(key(KeyCode::Home));
    assert_eq!(app.search.list.selected, 0);
    app.handle_key(key(KeyCode::End));
    assert_eq!(app.search.list.selected, 2);
}

// =============================================================================
// SEARCH FOCUS TESTS
// =============================================================================

#[test]
fn test_search_focus_slash_key() {
    let mut app = App::new();
    app.handle_key(key(KeyCode::Char('/')));
    assert_eq!(app.state, AppState::Search);
    assert_eq!(app.input_mode, InputMode::Editing);
}

#[test]
fn test_search_focus_typing() {
    let mut app = App::new();
    app.handle_key(key(KeyCode::Char('/')));
    for c in "dune".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    assert_eq!(app.search.query, "dune");
    assert_eq!(app.search.cursor, 4);

    app.handle_key(key(KeyCode::Backspace));
    assert_eq!(app.search.query, "dun");
}

#[test]
fn test_typing_requires_focus() {
    let mut app = App::new();
    app.navigate(AppState::Search);

    // Normal mode: characters are navigation keys, not input
    app.handle_key(key(KeyCode::Char('x')));
    assert!(app.search.query.is_empty());
}

#[test]
fn test_search_focus_escape_exits_editing() {
    let mut app = App::new();
    app.handle_key(key(KeyCode::Char('/')));
    app.handle_key(key(KeyCode::Char('a')));

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.input_mode, InputMode::Normal);
    // The query survives; only focus moves
    assert_eq!(app.search.query, "a");
    assert_eq!(app.state, AppState::Search);
}
