use std::mem;

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::event::KeyCode;
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;
use tracing::{debug, warn};

use crate::config::Config;
use crate::handlers::{AddMovieHandlers, EditorHandlers};
use crate::models::Movie;
use crate::watchlist::{DuplicateId, Watchlist};

use super::add_movie::AddMovieModal;
use super::helpers::{centered_rect, surface_error};
use super::movie_editor::{MovieEditor, RATING_MAX};
use super::screens::MovieListScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header height above the movie list.
const HEADER_HEIGHT: u16 = 3;

/// Modes of the list screen. The add dialog and the editor are driven by the
/// watch-list's own flags instead, so they are not listed here.
enum Mode {
    Normal,
    ConfirmDelete(Movie),
    Searching(String),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    watchlist: Watchlist,
    config: Config,
    screen: MovieListScreen,
    add_modal: AddMovieModal,
    editor: Option<MovieEditor>,
    mode: Mode,
    status: Option<StatusMessage>,
}

/// Passes the add dialog's callbacks through to the watch-list and keeps the
/// result of the last `add_movie`.
struct AddTracker<'a> {
    watchlist: &'a mut Watchlist,
    outcome: Option<Result<(), DuplicateId>>,
}

impl AddMovieHandlers for AddTracker<'_> {
    fn add_movie(&mut self, movie: Movie) {
        self.outcome = Some(self.watchlist.try_add(movie));
    }

    fn handle_close(&mut self) {
        self.watchlist.handle_close();
    }
}

impl App {
    pub fn new(watchlist: Watchlist, config: Config) -> Self {
        let screen = MovieListScreen::new(watchlist.movies());
        Self {
            watchlist,
            config,
            screen,
            add_modal: AddMovieModal::new(),
            editor: None,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Currently highlighted movie on the list screen.
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.screen.current_movie()
    }

    /// Process one key press. Returns true when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        if self.watchlist.show_add() {
            self.handle_add_movie(code);
            return Ok(false);
        }

        if let Some(editor) = self.editor.take() {
            self.handle_editor(code, editor);
            return Ok(false);
        }

        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);
        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::ConfirmDelete(movie) => self.handle_confirm_delete(code, movie),
            Mode::Searching(query) => self.handle_search(code, query),
        };
        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.move_selection(-5),
            KeyCode::PageDown => self.screen.move_selection(5),
            KeyCode::Home => self.screen.select_first(),
            KeyCode::End => self.screen.select_last(),
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                self.add_modal.reset();
                self.watchlist.open_add();
                debug!("add movie dialog opened");
            }
            KeyCode::Enter | KeyCode::Char('e') | KeyCode::Char('E') => {
                if let Some(movie) = self.screen.current_movie().cloned() {
                    self.clear_status();
                    self.open_editor(movie);
                } else {
                    self.set_status("No movie selected to edit.", StatusKind::Error);
                }
            }
            KeyCode::Char('-') | KeyCode::Delete => {
                if let Some(movie) = self.screen.current_movie().cloned() {
                    if self.config.confirm_delete {
                        self.clear_status();
                        return Ok(Mode::ConfirmDelete(movie));
                    }
                    self.perform_delete(&movie);
                } else {
                    self.set_status("No movie selected to delete.", StatusKind::Error);
                }
            }
            KeyCode::Char('w') | KeyCode::Char('W') => {
                if let Some(id) = self.current_id() {
                    if let Some(seen) = self.watchlist.toggle_seen(&id, Utc::now()) {
                        self.refresh_screen();
                        let message = if seen {
                            "Marked as seen."
                        } else {
                            "Marked as not seen."
                        };
                        self.set_status(message, StatusKind::Info);
                    }
                }
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                if let Some(id) = self.current_id() {
                    if let Some(liked) = self.watchlist.toggle_liked(&id) {
                        self.refresh_screen();
                        let message = if liked { "Liked." } else { "Like removed." };
                        self.set_status(message, StatusKind::Info);
                    }
                }
            }
            KeyCode::Char('u') | KeyCode::Char('U') => {
                let active = self.screen.toggle_show_unseen(self.watchlist.movies());
                let message = if active {
                    "Showing unseen movies only."
                } else {
                    "Showing all movies."
                };
                self.set_status(message, StatusKind::Info);
            }
            KeyCode::Char('f') => {
                return Ok(Mode::Searching(String::new()));
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(movie) = self.screen.current_movie().cloned() {
                    let url = movie.youtube_url(&self.config.youtube_base_url);
                    self.open_url(&url, &movie.display_title());
                }
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                if let Some(movie) = self.screen.current_movie().cloned() {
                    match movie.soundtrack.iter().find(|track| !track.trim().is_empty()) {
                        Some(track) => {
                            let url =
                                Movie::spotify_track_url(&self.config.spotify_base_url, track);
                            self.open_url(&url, track);
                        }
                        None => {
                            self.set_status("This movie has no soundtrack.", StatusKind::Error)
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_movie(&mut self, code: KeyCode) {
        let show = self.watchlist.show_add();
        let mut tracker = AddTracker {
            watchlist: &mut self.watchlist,
            outcome: None,
        };
        self.add_modal.handle_key(code, show, &mut tracker);
        let outcome = tracker.outcome;

        if !self.watchlist.show_add() {
            self.refresh_screen();
            match outcome {
                Some(Ok(())) => {
                    self.screen.select_last();
                    self.set_status("Movie added.", StatusKind::Info);
                }
                Some(Err(err)) => {
                    warn!(%err, "add movie rejected");
                    self.set_status(format!("Not added: {err}."), StatusKind::Error);
                }
                None => self.set_status("Add movie cancelled.", StatusKind::Info),
            }
        }
    }

    fn open_editor(&mut self, movie: Movie) {
        if !self.watchlist.is_editing(&movie.id) {
            self.watchlist.change_editing(&movie.id);
        }
        debug!(id = %movie.id, "movie editor opened");
        self.editor = Some(MovieEditor::new(movie));
    }

    fn handle_editor(&mut self, code: KeyCode, mut editor: MovieEditor) {
        let id = editor.movie_id().to_string();
        let before = self.watchlist.get(&id).cloned();
        editor.handle_key(code, &mut self.watchlist);

        if self.watchlist.is_editing(&id) {
            self.editor = Some(editor);
            return;
        }

        self.refresh_screen();
        let message = match (before, self.watchlist.get(&id)) {
            (_, None) => "Movie deleted.",
            (Some(old), Some(new)) if &old == new => "No changes saved.",
            _ => "Movie updated.",
        };
        self.set_status(message, StatusKind::Info);
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, movie: Movie) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.perform_delete(&movie);
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(movie),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut query: String) -> Mode {
        match code {
            KeyCode::Esc => {
                self.screen.set_filter(None, self.watchlist.movies());
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => {
                self.screen.move_selection(-1);
                return Mode::Searching(query);
            }
            KeyCode::Down => {
                self.screen.move_selection(1);
                return Mode::Searching(query);
            }
            KeyCode::Backspace => {
                query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => query.push(ch),
            _ => {}
        }

        let filter = if query.trim().is_empty() {
            None
        } else {
            Some(query.clone())
        };
        self.screen.set_filter(filter, self.watchlist.movies());
        Mode::Searching(query)
    }

    fn perform_delete(&mut self, movie: &Movie) {
        self.watchlist.delete_movie(&movie.id);
        self.refresh_screen();
        self.set_status(
            format!("Deleted {}.", movie.display_title()),
            StatusKind::Info,
        );
    }

    fn open_url(&mut self, url: &str, what: &str) {
        match open_link(url).with_context(|| format!("failed to open {url}")) {
            Ok(()) => self.set_status(format!("Opened {what}."), StatusKind::Info),
            Err(err) => {
                warn!(url, error = %err, "failed to open link");
                let message = format!("Failed to open link: {}", surface_error(&err));
                self.set_status(message, StatusKind::Error);
            }
        }
    }

    fn current_id(&self) -> Option<String> {
        self.screen.current_movie().map(|movie| movie.id.clone())
    }

    fn refresh_screen(&mut self) {
        self.screen.refresh(self.watchlist.movies());
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_movie_list(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::ConfirmDelete(movie) => self.draw_confirm_delete(frame, area, movie),
            Mode::Searching(query) => self.draw_search_bar(frame, area, query),
            Mode::Normal => {}
        }

        if let Some(editor) = &self.editor {
            editor.draw(frame, area);
        }
        self.add_modal.draw(frame, area, self.watchlist.show_add());
    }

    fn draw_movie_list(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(HEADER_HEIGHT), Constraint::Min(1)])
            .split(area);

        let total = self.watchlist.movies().len();
        let seen = self
            .watchlist
            .movies()
            .iter()
            .filter(|movie| movie.watched.seen)
            .count();
        let mut summary = vec![Span::raw(format!("{total} movies • {seen} seen"))];
        if self.screen.show_only_unseen {
            summary.push(Span::styled(
                "  • unseen only",
                Style::default().fg(Color::Yellow),
            ));
        }
        if let Some(filter) = &self.screen.filter {
            summary.push(Span::styled(
                format!("  • matching \"{filter}\""),
                Style::default().fg(Color::Yellow),
            ));
        }
        let header = Paragraph::new(Line::from(summary))
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::ALL).title("Watchlist"));
        frame.render_widget(header, chunks[0]);

        if self.screen.filtered.is_empty() {
            let text = if total == 0 {
                "No movies yet. Press '+' to add one."
            } else {
                "No movies match the current filters."
            };
            let message = Paragraph::new(text)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = self
            .screen
            .filtered
            .iter()
            .map(|movie| ListItem::new(movie_row(movie)))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        let mut state = ListState::default();
        state.select(Some(self.screen.selected));
        frame.render_stateful_widget(list, chunks[1], &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let in_form = self.watchlist.show_add() || self.editor.is_some();
        let keys: &[(&'static str, &'static str)] = if in_form {
            &[
                ("[Tab]", " Next   "),
                ("[Enter]", " Activate   "),
                ("[Del]", " Remove Song   "),
                ("[Esc]", " Close"),
            ]
        } else {
            match self.mode {
                Mode::Searching(_) => &[("[Enter]", " Keep Filter   "), ("[Esc]", " Clear")],
                Mode::ConfirmDelete(_) => &[("[y]", " Delete   "), ("[n]", " Keep")],
                Mode::Normal => &[
                    ("[↑↓]", " Select   "),
                    ("[+]", " Add   "),
                    ("[e]", " Edit   "),
                    ("[-]", " Delete   "),
                    ("[w]", " Seen   "),
                    ("[l]", " Like   "),
                    ("[f]", " Search   "),
                    ("[u]", " Unseen   "),
                    ("[y]", " Trailer   "),
                    ("[s]", " Soundtrack   "),
                    ("[q]", " Quit"),
                ],
            }
        };

        let mut spans = Vec::with_capacity(keys.len() * 2);
        for (key, label) in keys {
            spans.push(Span::styled(*key, key_style));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, movie: &Movie) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Movie").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete '{}' from the watchlist?", movie.display_title())),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, query: &str) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {query}")))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + "Search: ".len() as u16 + query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }
}

/// One list row: seen/liked markers, title, rating and soundtrack size.
fn movie_row(movie: &Movie) -> Line<'static> {
    let seen = if movie.watched.seen { "[✓]" } else { "[ ]" };
    let liked = if movie.watched.liked { "♥" } else { " " };
    let mut spans = vec![
        Span::raw(format!("{seen} {liked} ")),
        Span::raw(movie.display_title()),
        Span::styled(
            format!("  ★ {}/{}", movie.rating, RATING_MAX),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if !movie.soundtrack.is_empty() {
        spans.push(Span::styled(
            format!("  ♪ {}", movie.soundtrack.len()),
            Style::default().fg(Color::Green),
        ));
    }
    if let Some(when) = movie.watched.when {
        spans.push(Span::styled(
            format!("  seen {}", when.format("%Y-%m-%d")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}
