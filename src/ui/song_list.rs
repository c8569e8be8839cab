use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Label for the per-row delete control.
pub(crate) const DELETE_CONTROL: &str = "[x]";
/// Label for the append control under the rows.
pub(crate) const ADD_SONG_CONTROL: &str = "[+ Add Song]";

/// Which part of the song list currently holds focus.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum SongFocus {
    Row(usize),
    AddSong,
}

/// Controlled editor over an ordered list of song ids. It never owns or
/// mutates `songs`; every change is a brand-new list handed to `set_songs`.
pub struct EditableSongList<'a> {
    songs: &'a [String],
    set_songs: &'a mut dyn FnMut(Vec<String>),
}

impl<'a> EditableSongList<'a> {
    pub fn new(songs: &'a [String], set_songs: &'a mut dyn FnMut(Vec<String>)) -> Self {
        Self { songs, set_songs }
    }

    /// Append one empty entry.
    pub fn add_song(&mut self) {
        let mut next = self.songs.to_vec();
        next.push(String::new());
        (self.set_songs)(next);
    }

    /// Replace the entry at `index` with the field's full new value.
    pub fn change_song(&mut self, index: usize, value: String) {
        if index >= self.songs.len() {
            return;
        }
        let mut next = self.songs.to_vec();
        next[index] = value;
        (self.set_songs)(next);
    }

    /// One typed character is one change event.
    pub fn push_char(&mut self, index: usize, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        let Some(current) = self.songs.get(index) else {
            return false;
        };
        let mut value = current.clone();
        value.push(ch);
        self.change_song(index, value);
        true
    }

    pub fn backspace(&mut self, index: usize) {
        let Some(current) = self.songs.get(index) else {
            return;
        };
        let mut value = current.clone();
        value.pop();
        self.change_song(index, value);
    }

    /// Drop the entry at `index`, keeping the others in order.
    pub fn delete_song(&mut self, index: usize) {
        if index >= self.songs.len() {
            return;
        }
        let next = self
            .songs
            .iter()
            .enumerate()
            .filter(|(idx, _)| *idx != index)
            .map(|(_, song)| song.clone())
            .collect();
        (self.set_songs)(next);
    }
}

/// Render the label, one line per row with its delete control, and the add
/// control.
pub(crate) fn build_lines(
    label: &str,
    songs: &[String],
    focus: Option<SongFocus>,
) -> Vec<Line<'static>> {
    let active = Style::default().fg(Color::Yellow);
    let muted = Style::default().fg(Color::DarkGray);

    let mut lines = Vec::with_capacity(songs.len() + 2);
    lines.push(Line::from(Span::raw(format!("{label}:"))));

    for (idx, song) in songs.iter().enumerate() {
        let is_active = focus == Some(SongFocus::Row(idx));
        let (display, style) = if song.is_empty() {
            ("<empty>".to_string(), if is_active { active } else { muted })
        } else {
            (song.clone(), if is_active { active } else { Style::default() })
        };
        lines.push(Line::from(vec![
            Span::raw(row_prefix(idx)),
            Span::styled(display, style),
            Span::raw(" "),
            Span::styled(DELETE_CONTROL, Style::default().fg(Color::Red)),
        ]));
    }

    let add_style = if focus == Some(SongFocus::AddSong) {
        active.add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    lines.push(Line::from(vec![
        Span::raw("  "),
        Span::styled(ADD_SONG_CONTROL, add_style),
    ]));

    lines
}

/// Numbered indent shown before each row; the cursor math uses its width.
pub(crate) fn row_prefix(index: usize) -> String {
    format!("  {}. ", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    fn record(initial: &[String], action: impl FnOnce(&mut EditableSongList)) -> Vec<Vec<String>> {
        let mut calls = Vec::new();
        let mut set = |next: Vec<String>| calls.push(next);
        {
            let mut list = EditableSongList::new(initial, &mut set);
            action(&mut list);
        }
        calls
    }

    #[test]
    fn add_song_appends_empty_entry() {
        let initial = songs(&["a", "b"]);
        let calls = record(&initial, |list| list.add_song());
        assert_eq!(calls, vec![songs(&["a", "b", ""])]);
        assert_eq!(initial, songs(&["a", "b"]));
    }

    #[test]
    fn typing_calls_setter_once_per_character() {
        let initial = songs(&["ab", "cd"]);
        let calls = record(&initial, |list| {
            list.push_char(1, 'e');
            list.push_char(1, 'f');
        });
        // The list is controlled, so the second event still sees the
        // original props.
        assert_eq!(calls, vec![songs(&["ab", "cde"]), songs(&["ab", "cdf"])]);
    }

    #[test]
    fn backspace_replaces_index() {
        let initial = songs(&["abc"]);
        let calls = record(&initial, |list| list.backspace(0));
        assert_eq!(calls, vec![songs(&["ab"])]);
    }

    #[test]
    fn delete_removes_index_and_keeps_order() {
        let initial = songs(&["a", "b", "c", "d"]);
        let calls = record(&initial, |list| list.delete_song(1));
        assert_eq!(calls, vec![songs(&["a", "c", "d"])]);
    }

    #[test]
    fn out_of_range_index_makes_no_call() {
        let initial = songs(&["a"]);
        let calls = record(&initial, |list| {
            list.delete_song(3);
            list.change_song(5, "x".into());
            list.backspace(2);
        });
        assert!(calls.is_empty());
    }

    #[test]
    fn control_characters_are_ignored() {
        let initial = songs(&["a"]);
        let calls = record(&initial, |list| {
            assert!(!list.push_char(0, '\n'));
        });
        assert!(calls.is_empty());
    }

    #[test]
    fn lines_show_one_delete_control_per_row() {
        let lines = build_lines("Spotify IDs", &songs(&["x", ""]), None);
        let rendered: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        assert_eq!(rendered[0], "Spotify IDs:");
        assert_eq!(rendered[1], "  1. x [x]");
        assert_eq!(rendered[2], "  2. <empty> [x]");
        assert_eq!(rendered[3], "  [+ Add Song]");
    }
}
