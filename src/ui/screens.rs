use crate::models::Movie;

/// Filtered, selectable view over the watch-list shown on the main screen.
pub(crate) struct MovieListScreen {
    pub(crate) filtered: Vec<Movie>,
    pub(crate) filter: Option<String>,
    pub(crate) show_only_unseen: bool,
    pub(crate) selected: usize,
}

impl MovieListScreen {
    pub(crate) fn new(movies: &[Movie]) -> Self {
        let mut screen = Self {
            filtered: Vec::new(),
            filter: None,
            show_only_unseen: false,
            selected: 0,
        };
        screen.refresh(movies);
        screen
    }

    /// Rebuild the visible rows from the authoritative list.
    pub(crate) fn refresh(&mut self, movies: &[Movie]) {
        let query = self
            .filter
            .as_ref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        self.filtered = movies
            .iter()
            .filter(|movie| match &query {
                Some(q) => {
                    movie.title.to_lowercase().contains(q) || movie.id.to_lowercase().contains(q)
                }
                None => true,
            })
            .filter(|movie| !self.show_only_unseen || !movie.watched.seen)
            .cloned()
            .collect();

        self.ensure_in_bounds();
    }

    pub(crate) fn set_filter(&mut self, filter: Option<String>, movies: &[Movie]) {
        self.filter = filter;
        self.refresh(movies);
    }

    pub(crate) fn toggle_show_unseen(&mut self, movies: &[Movie]) -> bool {
        self.show_only_unseen = !self.show_only_unseen;
        self.refresh(movies);
        self.show_only_unseen
    }

    pub(crate) fn current_movie(&self) -> Option<&Movie> {
        self.filtered.get(self.selected)
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let len = self.filtered.len() as isize;
        let new = (self.selected as isize + offset).clamp(0, len - 1);
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        self.selected = 0;
    }

    pub(crate) fn select_last(&mut self) {
        self.selected = self.filtered.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.filtered.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len() - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies() -> Vec<Movie> {
        let mut alien = Movie::new("a1", Vec::new());
        alien.title = "Alien".into();
        alien.watched.seen = true;
        let mut aliens = Movie::new("a2", Vec::new());
        aliens.title = "Aliens".into();
        let mut heat = Movie::new("HeAt", Vec::new());
        heat.title = "Heat".into();
        vec![alien, aliens, heat]
    }

    #[test]
    fn filter_matches_title_and_id_case_insensitively() {
        let list = movies();
        let mut screen = MovieListScreen::new(&list);
        screen.set_filter(Some("ALIEN".into()), &list);
        assert_eq!(screen.filtered.len(), 2);
        screen.set_filter(Some("heat".into()), &list);
        assert_eq!(screen.filtered.len(), 1);
        screen.set_filter(Some("   ".into()), &list);
        assert_eq!(screen.filtered.len(), 3);
    }

    #[test]
    fn unseen_filter_hides_watched() {
        let list = movies();
        let mut screen = MovieListScreen::new(&list);
        assert!(screen.toggle_show_unseen(&list));
        let ids: Vec<&str> = screen.filtered.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "HeAt"]);
    }

    #[test]
    fn selection_clamps_after_shrink() {
        let mut list = movies();
        let mut screen = MovieListScreen::new(&list);
        screen.select_last();
        assert_eq!(screen.selected, 2);
        list.pop();
        screen.refresh(&list);
        assert_eq!(screen.selected, 1);
        screen.move_selection(-10);
        assert_eq!(screen.selected, 0);
        list.clear();
        screen.refresh(&list);
        assert!(screen.current_movie().is_none());
    }
}
