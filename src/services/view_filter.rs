use crate::models::{FilterMode, Movie};

/// Derives the displayed subset of `movies`.
///
/// A non-empty search term matches titles case-insensitively and ignores
/// `mode`; otherwise `mode` narrows by watched state.
pub fn compute_view(movies: &[Movie], mode: FilterMode, search_term: &str) -> Vec<Movie> {
    if !search_term.is_empty() {
        let needle = search_term.to_lowercase();
        return movies
            .iter()
            .filter(|movie| movie.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();
    }

    movies
        .iter()
        .filter(|movie| mode.matches(movie.watched))
        .cloned()
        .collect()
}
