use crossterm::event::KeyCode;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::debug;

use crate::handlers::AddMovieHandlers;
use crate::models::Movie;

use super::helpers::{button_spans, centered_rect};
use super::song_list::{self, EditableSongList, SongFocus};

pub(crate) const TITLE: &str = "Add Movie";
pub(crate) const YOUTUBE_LABEL: &str = "YouTube ID";
pub(crate) const SPOTIFY_LABEL: &str = "Spotify IDs";
pub(crate) const CLOSE_BUTTON: &str = "Close";
pub(crate) const SAVE_BUTTON: &str = "Save Changes";

/// Focus targets inside the dialog, in tab order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum AddField {
    #[default]
    YoutubeId,
    Song(SongFocus),
    Close,
    Save,
}

/// Dialog that stages a YouTube id and a soundtrack for a brand-new movie.
#[derive(Default, Clone, Debug)]
pub struct AddMovieModal {
    youtube_id: String,
    soundtrack: Vec<String>,
    active: AddField,
}

impl AddMovieModal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything staged. Called by the owner whenever the dialog is
    /// opened again.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn youtube_id(&self) -> &str {
        &self.youtube_id
    }

    pub fn soundtrack(&self) -> &[String] {
        &self.soundtrack
    }

    #[cfg(test)]
    pub(crate) fn active(&self) -> AddField {
        self.active
    }

    fn set_songs(&mut self, songs: Vec<String>) {
        self.soundtrack = songs;
    }

    /// Run one song-list operation against the staged soundtrack.
    fn with_song_list(&mut self, action: impl FnOnce(&mut EditableSongList)) {
        let current = self.soundtrack.clone();
        let mut staged = None;
        {
            let mut set = |next: Vec<String>| staged = Some(next);
            let mut list = EditableSongList::new(&current, &mut set);
            action(&mut list);
        }
        if let Some(next) = staged {
            self.set_songs(next);
        }
    }

    fn focus_order(&self) -> Vec<AddField> {
        let mut order = Vec::with_capacity(self.soundtrack.len() + 4);
        order.push(AddField::YoutubeId);
        order.extend((0..self.soundtrack.len()).map(|idx| AddField::Song(SongFocus::Row(idx))));
        order.push(AddField::Song(SongFocus::AddSong));
        order.push(AddField::Close);
        order.push(AddField::Save);
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

    /// Append a character to the YouTube id input.
    pub fn push_id_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.youtube_id.push(ch);
        true
    }

    pub fn add_song(&mut self) {
        self.with_song_list(|list| list.add_song());
    }

    pub fn change_song(&mut self, index: usize, value: String) {
        self.with_song_list(|list| list.change_song(index, value));
    }

    pub fn delete_song(&mut self, index: usize) {
        self.with_song_list(|list| list.delete_song(index));
        if let AddField::Song(SongFocus::Row(row)) = self.active {
            if row >= self.soundtrack.len() {
                self.active = if self.soundtrack.is_empty() {
                    AddField::Song(SongFocus::AddSong)
                } else {
                    AddField::Song(SongFocus::Row(self.soundtrack.len() - 1))
                };
            }
        }
    }

    /// Close without adding anything.
    pub fn close(&self, handlers: &mut impl AddMovieHandlers) {
        debug!("add movie dialog closed");
        handlers.handle_close();
    }

    /// Hand a complete movie to the owner, then close.
    pub fn save(&self, handlers: &mut impl AddMovieHandlers) {
        let movie = Movie::new(self.youtube_id.clone(), self.soundtrack.clone());
        debug!(id = %movie.id, "add movie dialog saved");
        handlers.add_movie(movie);
        handlers.handle_close();
    }

    /// Route a key press. Returns false when the dialog is hidden and the key
    /// was not consumed.
    pub fn handle_key(
        &mut self,
        code: KeyCode,
        show: bool,
        handlers: &mut impl AddMovieHandlers,
    ) -> bool {
        if !show {
            return false;
        }

        match code {
            KeyCode::Esc => self.close(handlers),
            KeyCode::Tab | KeyCode::Down => self.move_focus(true),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(false),
            KeyCode::Enter => match self.active {
                AddField::YoutubeId | AddField::Save => self.save(handlers),
                AddField::Close => self.close(handlers),
                AddField::Song(SongFocus::AddSong) => {
                    self.add_song();
                    self.active = AddField::Song(SongFocus::Row(self.soundtrack.len() - 1));
                }
                AddField::Song(SongFocus::Row(_)) => self.move_focus(true),
            },
            KeyCode::Delete => {
                if let AddField::Song(SongFocus::Row(row)) = self.active {
                    self.delete_song(row);
                }
            }
            KeyCode::Backspace => match self.active {
                AddField::YoutubeId => {
                    self.youtube_id.pop();
                }
                AddField::Song(SongFocus::Row(row)) => {
                    self.with_song_list(|list| list.backspace(row));
                }
                _ => {}
            },
            KeyCode::Char(ch) => match self.active {
                AddField::YoutubeId => {
                    self.push_id_char(ch);
                }
                AddField::Song(SongFocus::Row(row)) => {
                    self.with_song_list(|list| {
                        list.push_char(row, ch);
                    });
                }
                _ => {}
            },
            _ => {}
        }
        true
    }

    /// Draw the dialog. Nothing is rendered while `show` is false.
    pub fn draw(&self, frame: &mut Frame, area: Rect, show: bool) {
        if !show {
            return;
        }

        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(TITLE).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let id_active = self.active == AddField::YoutubeId;
        let (id_display, id_style) = if self.youtube_id.is_empty() {
            (
                "<optional>".to_string(),
                if id_active {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                },
            )
        } else if id_active {
            (self.youtube_id.clone(), Style::default().fg(Color::Yellow))
        } else {
            (self.youtube_id.clone(), Style::default())
        };

        let mut lines = vec![
            Line::from(vec![
                Span::raw(format!("{YOUTUBE_LABEL}: ")),
                Span::styled(id_display, id_style),
            ]),
            Line::from(""),
        ];

        let song_focus = match self.active {
            AddField::Song(focus) => Some(focus),
            _ => None,
        };
        lines.extend(song_list::build_lines(
            SPOTIFY_LABEL,
            &self.soundtrack,
            song_focus,
        ));
        lines.push(Line::from(""));
        lines.push(Line::from(button_spans(&[
            (CLOSE_BUTTON, self.active == AddField::Close),
            (SAVE_BUTTON, self.active == AddField::Save),
        ])));
        lines.push(Line::from(Span::styled(
            "Tab to switch • Enter to activate • Del removes a song • Esc to close",
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);

        match self.active {
            AddField::YoutubeId => {
                let prefix = format!("{YOUTUBE_LABEL}: ").chars().count() as u16;
                frame.set_cursor_position((
                    inner.x + prefix + self.youtube_id.chars().count() as u16,
                    inner.y,
                ));
            }
            AddField::Song(SongFocus::Row(row)) => {
                let prefix = song_list::row_prefix(row).chars().count() as u16;
                let value_len = self
                    .soundtrack
                    .get(row)
                    .map_or(0, |song| song.chars().count()) as u16;
                // Two header lines plus the list label precede the rows.
                frame.set_cursor_position((
                    inner.x + prefix + value_len,
                    inner.y + 3 + row as u16,
                ));
            }
            _ => {}
        }
    }
}
