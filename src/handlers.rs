//! Callback seams between the form components and whoever owns the
//! watch-list. The forms only ever talk to these traits, which keeps them
//! testable against a recording double.

use crate::models::Movie;

/// Callbacks the add-movie dialog needs from its owner.
pub trait AddMovieHandlers {
    /// Insert a brand-new movie. No uniqueness check happens before this.
    fn add_movie(&mut self, movie: Movie);
    /// Hide the add-movie dialog.
    fn handle_close(&mut self);
}

/// Callbacks the movie editor needs from its owner.
pub trait EditorHandlers {
    /// Replace the movie with `id` by the full given record.
    fn edit_movie(&mut self, id: &str, movie: Movie);
    fn delete_movie(&mut self, id: &str);
    /// Toggle the edit flag for the row with `id`.
    fn change_editing(&mut self, id: &str);
}
