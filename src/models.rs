//! Domain models passed between the watch-list owner and the form components.
//! These stay plain data holders; staging and merging live in the UI and the
//! `Watchlist` respectively.

use std::fmt;

use chrono::{DateTime, Utc};

/// Whether (and when) a movie was watched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watch {
    pub seen: bool,
    pub liked: bool,
    /// `None` until `seen` flips to true. Only the list screen's quick
    /// toggle maintains this; the edit forms pass it through untouched.
    pub when: Option<DateTime<Utc>>,
}

impl Watch {
    /// Mark the movie as seen at `now`. Leaves an existing timestamp alone so
    /// re-marking does not move the original watch date.
    pub fn mark_seen(&mut self, now: DateTime<Utc>) {
        if !self.seen {
            self.seen = true;
            self.when = Some(now);
        }
    }

    /// Flip the seen flag, stamping or clearing `when` to match.
    pub fn toggle_seen(&mut self, now: DateTime<Utc>) {
        if self.seen {
            self.seen = false;
            self.when = None;
        } else {
            self.mark_seen(now);
        }
    }
}

/// One entry in the watch-list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Movie {
    /// Caller-assigned id, taken from the YouTube video id. The forms never
    /// check it; `Watchlist` keeps it unique.
    pub id: String,
    pub title: String,
    /// Release year. Zero means "unknown" and is still submitted as-is.
    pub released: i64,
    pub description: String,
    /// Rating on a 0-10 scale. The selector stays within the scale but
    /// stored values are not clamped.
    pub rating: i64,
    /// Ordered Spotify track ids.
    pub soundtrack: Vec<String>,
    pub watched: Watch,
}

impl Movie {
    /// Build a fresh movie with every field other than `id` and `soundtrack`
    /// at its default.
    pub fn new(id: impl Into<String>, soundtrack: Vec<String>) -> Self {
        Self {
            id: id.into(),
            soundtrack,
            ..Self::default()
        }
    }

    /// Title for list rows: falls back to the bracketed id when the title is
    /// blank and appends the year when one is known.
    pub fn display_title(&self) -> String {
        let name = if self.title.trim().is_empty() {
            format!("[{}]", self.id)
        } else {
            self.title.clone()
        };
        if self.released > 0 {
            format!("{} ({})", name, self.released)
        } else {
            name
        }
    }

    pub fn youtube_url(&self, base: &str) -> String {
        format!("{base}{}", self.id)
    }

    pub fn spotify_track_url(base: &str, track: &str) -> String {
        format!("{base}{track}")
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_movie_uses_defaults() {
        let movie = Movie::new("dQw4w9WgXcQ", vec!["4uLU6hMCjMI75M1A2tKUQC".into()]);
        assert_eq!(movie.id, "dQw4w9WgXcQ");
        assert_eq!(movie.title, "");
        assert_eq!(movie.released, 0);
        assert_eq!(movie.rating, 0);
        assert_eq!(movie.description, "");
        assert_eq!(movie.soundtrack, vec!["4uLU6hMCjMI75M1A2tKUQC".to_string()]);
        assert_eq!(
            movie.watched,
            Watch {
                seen: false,
                liked: false,
                when: None
            }
        );
    }

    #[test]
    fn display_title_falls_back_to_id() {
        let mut movie = Movie::new("abc", Vec::new());
        assert_eq!(movie.display_title(), "[abc]");
        movie.title = "Heat".into();
        movie.released = 1995;
        assert_eq!(movie.display_title(), "Heat (1995)");
    }

    #[test]
    fn toggle_seen_stamps_and_clears_when() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 1, 20, 0, 0).unwrap();
        let mut watch = Watch::default();

        watch.toggle_seen(now);
        assert!(watch.seen);
        assert_eq!(watch.when, Some(now));

        watch.mark_seen(later);
        assert_eq!(watch.when, Some(now));

        watch.toggle_seen(later);
        assert!(!watch.seen);
        assert_eq!(watch.when, None);
    }

    #[test]
    fn link_helpers_append_ids() {
        let movie = Movie::new("xyz", Vec::new());
        assert_eq!(
            movie.youtube_url("https://www.youtube.com/watch?v="),
            "https://www.youtube.com/watch?v=xyz"
        );
        assert_eq!(
            Movie::spotify_track_url("https://open.spotify.com/track/", "t1"),
            "https://open.spotify.com/track/t1"
        );
    }
}
