//! The in-memory owner of the canonical movie list. It is the only place the
//! collection changes; the forms reach it through the handler traits.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::handlers::{AddMovieHandlers, EditorHandlers};
use crate::models::Movie;

/// Returned when a movie's id is already taken by another entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("a movie with id {0:?} is already in the watch-list")]
pub struct DuplicateId(pub String);

/// Ids are unique across `movies`.
#[derive(Debug, Default)]
pub struct Watchlist {
    movies: Vec<Movie>,
    show_add: bool,
    editing: Option<String>,
}

impl Watchlist {
    /// Build a list from existing movies. Later entries that repeat an id
    /// are dropped.
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut list = Self::default();
        for movie in movies {
            if let Err(err) = list.try_add(movie) {
                warn!(%err, "duplicate movie dropped");
            }
        }
        list
    }

    /// A few sample entries for `--demo`.
    pub fn demo() -> Self {
        let mut arrival = Movie::new("tFMo3UJ4B4g", vec!["2T9bZsZXvuvdHTyHhXzgfD".into()]);
        arrival.title = "Arrival".into();
        arrival.released = 2016;
        arrival.rating = 9;
        arrival.description = "Linguist meets heptapods.".into();

        let mut drive = Movie::new("KBiOF3y1W0Y", Vec::new());
        drive.title = "Drive".into();
        drive.released = 2011;
        drive.rating = 7;

        let mut paprika = Movie::new("1V5AqB4cZy0", Vec::new());
        paprika.title = "Paprika".into();
        paprika.released = 2006;

        Self::new(vec![arrival, drive, paprika])
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn get(&self, id: &str) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id)
    }

    /// Whether the add-movie dialog should be shown.
    pub fn show_add(&self) -> bool {
        self.show_add
    }

    pub fn open_add(&mut self) {
        self.show_add = true;
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.editing.as_deref() == Some(id)
    }

    /// Append `movie` unless its id is already present.
    pub fn try_add(&mut self, movie: Movie) -> Result<(), DuplicateId> {
        if self.get(&movie.id).is_some() {
            return Err(DuplicateId(movie.id));
        }
        info!(id = %movie.id, tracks = movie.soundtrack.len(), "movie added");
        self.movies.push(movie);
        Ok(())
    }

    /// Flip the seen flag of the movie with `id`, routed through
    /// `edit_movie` so every change takes the same path.
    pub fn toggle_seen(&mut self, id: &str, now: DateTime<Utc>) -> Option<bool> {
        let mut movie = self.get(id)?.clone();
        movie.watched.toggle_seen(now);
        let seen = movie.watched.seen;
        self.edit_movie(id, movie);
        Some(seen)
    }

    pub fn toggle_liked(&mut self, id: &str) -> Option<bool> {
        let mut movie = self.get(id)?.clone();
        movie.watched.liked = !movie.watched.liked;
        let liked = movie.watched.liked;
        self.edit_movie(id, movie);
        Some(liked)
    }
}

impl AddMovieHandlers for Watchlist {
    fn add_movie(&mut self, movie: Movie) {
        if let Err(err) = self.try_add(movie) {
            warn!(%err, "add rejected");
        }
    }

    fn handle_close(&mut self) {
        self.show_add = false;
    }
}

impl EditorHandlers for Watchlist {
    fn edit_movie(&mut self, id: &str, movie: Movie) {
        match self.movies.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => {
                info!(id, "movie updated");
                *existing = movie;
            }
            None => warn!(id, "edit for unknown movie ignored"),
        }
    }

    fn delete_movie(&mut self, id: &str) {
        match self.movies.iter().position(|movie| movie.id == id) {
            Some(index) => {
                self.movies.remove(index);
                info!(id, "movie deleted");
            }
            None => warn!(id, "delete for unknown movie ignored"),
        }
        if self.is_editing(id) {
            self.editing = None;
        }
    }

    fn change_editing(&mut self, id: &str) {
        if self.is_editing(id) {
            self.editing = None;
        } else {
            self.editing = Some(id.to_string());
        }
    }
}
