//! Ratatui front-end: the movie list screen plus the three forms that edit
//! it.

mod add_movie;
mod app;
mod helpers;
mod movie_editor;
mod screens;
mod song_list;
mod terminal;

pub use add_movie::AddMovieModal;
pub use app::App;
pub use movie_editor::{MovieEditor, RATING_MAX, RATING_MIN};
pub use song_list::EditableSongList;
pub use terminal::run_app;
