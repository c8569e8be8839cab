use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::handlers::EditorHandlers;
use crate::models::Movie;

use super::helpers::{button_spans, centered_rect};
use super::song_list::{self, EditableSongList, SongFocus};

pub(crate) const TITLE: &str = "Edit Movie";
pub(crate) const TITLE_LABEL: &str = "Title";
pub(crate) const RELEASED_LABEL: &str = "Release Year";
pub(crate) const RATING_LABEL: &str = "Rating";
pub(crate) const DESCRIPTION_LABEL: &str = "Description";
pub(crate) const SOUNDTRACK_LABEL: &str = "Spotify IDs";
pub(crate) const SAVE_BUTTON: &str = "Save";
pub(crate) const CANCEL_BUTTON: &str = "Cancel";
pub(crate) const DELETE_BUTTON: &str = "Delete";

/// Inclusive bounds of the rating selector.
pub const RATING_MIN: i64 = 0;
pub const RATING_MAX: i64 = 10;

/// Focusable parts of the editor, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum EditorField {
    Title,
    Released,
    Rating,
    Description,
    Song(SongFocus),
    Save,
    Cancel,
    Delete,
}

/// Staged edit of a single movie. The original is kept so Cancel can revert
/// and so the id used for callbacks never changes mid-edit.
#[derive(Clone, Debug)]
pub struct MovieEditor {
    original: Movie,
    staged: Movie,
    active: EditorField,
}

impl MovieEditor {
    pub fn new(movie: Movie) -> Self {
        Self {
            staged: movie.clone(),
            original: movie,
            active: EditorField::Title,
        }
    }

    pub fn movie_id(&self) -> &str {
        &self.original.id
    }

    pub fn original(&self) -> &Movie {
        &self.original
    }

    pub fn staged(&self) -> &Movie {
        &self.staged
    }

    #[cfg(test)]
    pub(crate) fn active(&self) -> EditorField {
        self.active
    }

    #[cfg(test)]
    pub(crate) fn focus(&mut self, field: EditorField) {
        self.active = field;
    }

    fn focus_order(&self) -> Vec<EditorField> {
        let songs = self.staged.soundtrack.len();
        let mut order = Vec::with_capacity(songs + 8);
        order.extend([
            EditorField::Title,
            EditorField::Released,
            EditorField::Rating,
            EditorField::Description,
        ]);
        order.extend((0..songs).map(|idx| EditorField::Song(SongFocus::Row(idx))));
        order.extend([
            EditorField::Song(SongFocus::AddSong),
            EditorField::Save,
            EditorField::Cancel,
            EditorField::Delete,
        ]);
        order
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let position = order
            .iter()
            .position(|field| *field == self.active)
            .unwrap_or(0);
        let len = order.len();
        let next = if forward {
            (position + 1) % len
        } else {
            (position + len - 1) % len
        };
        self.active = order[next];
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.staged.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.staged.description = description.into();
    }

    pub fn set_released(&mut self, year: i64) {
        self.staged.released = year;
    }

    /// Stage a rating, kept within the selector's scale.
    pub fn set_rating(&mut self, rating: i64) {
        self.staged.rating = rating.clamp(RATING_MIN, RATING_MAX);
    }

    fn step_rating(&mut self, delta: i64) {
        let current = self.staged.rating.clamp(RATING_MIN, RATING_MAX);
        self.set_rating(current + delta);
    }

    fn with_song_list(&mut self, action: impl FnOnce(&mut EditableSongList)) {
        let current = self.staged.soundtrack.clone();
        let mut staged = None;
        {
            let mut set = |next: Vec<String>| staged = Some(next);
            let mut list = EditableSongList::new(&current, &mut set);
            action(&mut list);
        }
        if let Some(next) = staged {
            self.staged.soundtrack = next;
        }
    }

    pub fn add_song(&mut self) {
        self.with_song_list(|list| list.add_song());
    }

    pub fn change_song(&mut self, index: usize, value: String) {
        self.with_song_list(|list| list.change_song(index, value));
    }

    pub fn delete_song(&mut self, index: usize) {
        self.with_song_list(|list| list.delete_song(index));
        if let EditorField::Song(SongFocus::Row(row)) = self.active {
            let len = self.staged.soundtrack.len();
            if row >= len {
                self.active = if len == 0 {
                    EditorField::Song(SongFocus::AddSong)
                } else {
                    EditorField::Song(SongFocus::Row(len - 1))
                };
            }
        }
    }

    fn push_char(&mut self, ch: char) {
        if ch.is_control() {
            return;
        }
        match self.active {
            EditorField::Title => self.staged.title.push(ch),
            EditorField::Description => self.staged.description.push(ch),
            EditorField::Released => {
                if let Some(digit) = ch.to_digit(10) {
                    self.staged.released = self
                        .staged
                        .released
                        .saturating_mul(10)
                        .saturating_add(i64::from(digit));
                }
            }
            EditorField::Rating => {
                if let Some(digit) = ch.to_digit(10) {
                    self.set_rating(i64::from(digit));
                }
            }
            EditorField::Song(SongFocus::Row(row)) => {
                self.with_song_list(|list| {
                    list.push_char(row, ch);
                });
            }
            _ => {}
        }
    }

    fn backspace(&mut self) {
        match self.active {
            EditorField::Title => {
                self.staged.title.pop();
            }
            EditorField::Description => {
                self.staged.description.pop();
            }
            EditorField::Released => self.staged.released /= 10,
            EditorField::Song(SongFocus::Row(row)) => {
                self.with_song_list(|list| list.backspace(row));
            }
            _ => {}
        }
    }

    /// Commit the staged record, then leave edit mode. Every field is sent,
    /// zeros and empty strings included.
    pub fn save(&mut self, handlers: &mut impl EditorHandlers) {
        let id = self.original.id.clone();
        debug!(id = %id, "movie editor saved");
        handlers.edit_movie(&id, self.staged.clone());
        self.original = self.staged.clone();
        handlers.change_editing(&id);
    }

    /// Throw the staged edits away and leave edit mode.
    pub fn cancel(&mut self, handlers: &mut impl EditorHandlers) {
        debug!(id = %self.original.id, "movie editor cancelled");
        self.staged = self.original.clone();
        handlers.change_editing(&self.original.id);
    }

    pub fn delete(&self, handlers: &mut impl EditorHandlers) {
        debug!(id = %self.original.id, "movie editor delete");
        handlers.delete_movie(&self.original.id);
    }

    pub fn handle_key(&mut self, code: KeyCode, handlers: &mut impl EditorHandlers) {
        match code {
            KeyCode::Esc => self.cancel(handlers),
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Left if self.active == EditorField::Rating => self.step_rating(-1),
            KeyCode::Right if self.active == EditorField::Rating => self.step_rating(1),
            KeyCode::Enter => match self.active {
                EditorField::Save => self.save(handlers),
                EditorField::Cancel => self.cancel(handlers),
                EditorField::Delete => self.delete(handlers),
                EditorField::Song(SongFocus::AddSong) => {
                    self.add_song();
                    let last = self.staged.soundtrack.len() - 1;
                    self.active = EditorField::Song(SongFocus::Row(last));
                }
                _ => self.save(handlers),
            },
            KeyCode::Delete => {
                if let EditorField::Song(SongFocus::Row(row)) = self.active {
                    self.delete_song(row);
                }
            }
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(ch) => self.push_char(ch),
            _ => {}
        }
    }

    fn text_line(&self, label: &str, value: String, field: EditorField) -> Line<'static> {
        let is_active = self.active == field;
        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(value, style),
        ])
    }

    fn rating_line(&self) -> Line<'static> {
        let is_active = self.active == EditorField::Rating;
        let mut spans = vec![Span::raw(format!("{RATING_LABEL}: "))];
        for value in RATING_MIN..=RATING_MAX {
            if value > RATING_MIN {
                spans.push(Span::raw(" "));
            }
            let style = if value == self.staged.rating {
                let base = Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED);
                if is_active {
                    base.fg(Color::Yellow)
                } else {
                    base
                }
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(value.to_string(), style));
        }
        Line::from(spans)
    }

    pub fn draw(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(80, 80, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(TITLE).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            self.text_line(TITLE_LABEL, self.staged.title.clone(), EditorField::Title),
            self.text_line(
                RELEASED_LABEL,
                self.staged.released.to_string(),
                EditorField::Released,
            ),
            self.rating_line(),
            self.text_line(
                DESCRIPTION_LABEL,
                self.staged.description.clone(),
                EditorField::Description,
            ),
            Line::from(""),
        ];

        let song_focus = match self.active {
            EditorField::Song(focus) => Some(focus),
            _ => None,
        };
        lines.extend(song_list::build_lines(
            SOUNDTRACK_LABEL,
            &self.staged.soundtrack,
            song_focus,
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(button_spans(&[
            (SAVE_BUTTON, self.active == EditorField::Save),
            (CANCEL_BUTTON, self.active == EditorField::Cancel),
            (DELETE_BUTTON, self.active == EditorField::Delete),
        ])));
        lines.push(Line::from(Span::styled(
            "Tab to switch • ←/→ or 0-9 picks rating • Enter to activate • Esc to cancel",
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);

        let text_cursor = |label: &str, value_len: usize, row: u16| {
            let prefix = format!("{label}: ").chars().count() as u16;
            (inner.x + prefix + value_len as u16, inner.y + row)
        };
        let cursor = match self.active {
            EditorField::Title => Some(text_cursor(
                TITLE_LABEL,
                self.staged.title.chars().count(),
                0,
            )),
            EditorField::Released => Some(text_cursor(
                RELEASED_LABEL,
                self.staged.released.to_string().len(),
                1,
            )),
            EditorField::Description => Some(text_cursor(
                DESCRIPTION_LABEL,
                self.staged.description.chars().count(),
                3,
            )),
            EditorField::Song(SongFocus::Row(row)) => {
                let prefix = song_list::row_prefix(row).chars().count() as u16;
                let value_len = self
                    .staged
                    .soundtrack
                    .get(row)
                    .map_or(0, |song| song.chars().count()) as u16;
                // Four field lines, a spacer and the list label come first.
                Some((inner.x + prefix + value_len, inner.y + 6 + row as u16))
            }
            _ => None,
        };
        if let Some(position) = cursor {
            frame.set_cursor_position(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::recording::{Call, Recorder};

    fn sample() -> Movie {
        let mut movie = Movie::new("8hP9D6kZseM", vec!["a".into(), "b".into()]);
        movie.title = "Interstellar".into();
        movie.released = 2014;
        movie.rating = 8;
        movie.description = "Space.".into();
        movie
    }

    #[test]
    fn save_without_changes_emits_original() {
        let mut recorder = Recorder::default();
        let movie = sample();
        let mut editor = MovieEditor::new(movie.clone());
        editor.save(&mut recorder);
        assert_eq!(
            recorder.calls,
            vec![
                Call::EditMovie(movie.id.clone(), movie.clone()),
                Call::ChangeEditing(movie.id),
            ]
        );
    }

    #[test]
    fn zero_values_are_submitted() {
        let mut recorder = Recorder::default();
        let movie = Movie::new("z", Vec::new());
        let mut editor = MovieEditor::new(movie.clone());
        editor.save(&mut recorder);
        assert_eq!(recorder.calls[0], Call::EditMovie("z".into(), movie));
    }

    #[test]
    fn cancel_only_changes_editing() {
        let mut recorder = Recorder::default();
        let movie = sample();
        let mut editor = MovieEditor::new(movie.clone());
        editor.set_title("Something else");
        editor.handle_key(KeyCode::Esc, &mut recorder);
        assert_eq!(recorder.calls, vec![Call::ChangeEditing(movie.id.clone())]);
        assert_eq!(editor.staged(), &movie);
    }

    #[test]
    fn edits_never_touch_original() {
        let movie = sample();
        let mut editor = MovieEditor::new(movie.clone());
        editor.set_title("Changed");
        editor.add_song();
        assert_eq!(editor.original(), &movie);
        assert_eq!(editor.staged().title, "Changed");
        assert_eq!(editor.staged().soundtrack.len(), 3);
    }

    #[test]
    fn rating_selector_stages_value() {
        let mut recorder = Recorder::default();
        let movie = sample();
        let mut editor = MovieEditor::new(movie.clone());
        editor.focus(EditorField::Rating);
        editor.handle_key(KeyCode::Right, &mut recorder);
        editor.handle_key(KeyCode::Right, &mut recorder);
        editor.handle_key(KeyCode::Right, &mut recorder);
        assert_eq!(editor.staged().rating, RATING_MAX);
        editor.handle_key(KeyCode::Char('3'), &mut recorder);
        editor.save(&mut recorder);

        let expected = Movie {
            rating: 3,
            ..movie.clone()
        };
        assert_eq!(recorder.calls[0], Call::EditMovie(movie.id, expected));
    }

    #[test]
    fn release_year_takes_digits_only() {
        let mut recorder = Recorder::default();
        let mut editor = MovieEditor::new(Movie::new("r", Vec::new()));
        editor.focus(EditorField::Released);
        for ch in "19x84".chars() {
            editor.handle_key(KeyCode::Char(ch), &mut recorder);
        }
        assert_eq!(editor.staged().released, 1984);
        for _ in 0..5 {
            editor.handle_key(KeyCode::Backspace, &mut recorder);
        }
        assert_eq!(editor.staged().released, 0);
        assert!(recorder.calls.is_empty());
    }

    #[test]
    fn cleared_fields_are_sent_as_zero_and_empty() {
        let mut recorder = Recorder::default();
        let movie = sample();
        let mut editor = MovieEditor::new(movie.clone());
        editor.set_released(0);
        editor.set_description("");
        editor.save(&mut recorder);
        let expected = Movie {
            released: 0,
            description: String::new(),
            ..movie.clone()
        };
        assert_eq!(
            recorder.calls,
            vec![
                Call::EditMovie(movie.id.clone(), expected),
                Call::ChangeEditing(movie.id),
            ]
        );
    }

    #[test]
    fn delete_calls_delete_movie() {
        let mut recorder = Recorder::default();
        let mut editor = MovieEditor::new(sample());
        editor.focus(EditorField::Delete);
        editor.handle_key(KeyCode::Enter, &mut recorder);
        assert_eq!(recorder.calls, vec![Call::DeleteMovie("8hP9D6kZseM".into())]);
    }

    #[test]
    fn repeated_identical_edits_emit_identical_records() {
        let mut recorder = Recorder::default();
        let mut editor = MovieEditor::new(sample());
        for _ in 0..2 {
            editor.set_title("Tenet");
            editor.set_rating(6);
            editor.save(&mut recorder);
        }
        let edits: Vec<&Call> = recorder
            .calls
            .iter()
            .filter(|call| matches!(call, Call::EditMovie(..)))
            .collect();
        assert_eq!(edits.len(), 2);
        assert_eq!(edits[0], edits[1]);
    }

    #[test]
    fn soundtrack_edits_flow_into_save() {
        let mut recorder = Recorder::default();
        let movie = sample();
        let mut editor = MovieEditor::new(movie.clone());
        editor.focus(EditorField::Song(SongFocus::Row(1)));
        editor.handle_key(KeyCode::Char('2'), &mut recorder);
        editor.handle_key(KeyCode::Delete, &mut recorder);
        assert_eq!(editor.staged().soundtrack, vec!["a".to_string()]);
        assert_eq!(editor.active(), EditorField::Song(SongFocus::Row(0)));

        editor.change_song(0, "c".into());
        editor.save(&mut recorder);
        let expected = Movie {
            soundtrack: vec!["c".into()],
            ..movie.clone()
        };
        assert_eq!(recorder.calls[0], Call::EditMovie(movie.id, expected));
    }
}
