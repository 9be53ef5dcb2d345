//! Session state for the watchlist and the reducer that updates it.
//!
//! Every change goes through [`WatchlistState::apply`], which keeps the
//! derived filtered list in step with its inputs and reports whether the
//! movie list itself changed so the caller can persist it.

use serde::Serialize;

use crate::models::{FilterMode, Movie, MovieId, ViewDriver};
use crate::services::view_filter::compute_view;

/// Display inputs; derived from user interaction and never persisted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub search_term: String,
    pub filter_mode: FilterMode,
    pub selected: Option<MovieId>,
    pub driver: ViewDriver,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the list with a reconciled server list
    ListReconciled(Vec<Movie>),
    /// A movie was created on the store
    MovieAdded(Movie),
    /// A movie was deleted on the store
    MovieRemoved(MovieId),
    ToggleWatched(MovieId),
    SearchChanged(String),
    FilterChanged(FilterMode),
    NewMovieInputChanged(String),
    Selected(MovieId),
    SelectionCleared,
    AlertRaised(String),
    AlertDismissed,
}

/// What the caller must do after an action was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Effect {
    None,
    PersistList,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WatchlistState {
    movies: Vec<Movie>,
    filtered: Vec<Movie>,
    view: ViewState,
    new_movie_input: String,
    alert: Option<String>,
}

impl WatchlistState {
    /// State seeded from a previously cached list
    pub fn new(movies: Vec<Movie>) -> Self {
        let mut state = Self {
            movies,
            ..Default::default()
        };
        state.recompute();
        state
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// The list currently on display
    pub fn filtered(&self) -> &[Movie] {
        &self.filtered
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn new_movie_input(&self) -> &str {
        &self.new_movie_input
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.iter().find(|movie| movie.id == id)
    }

    /// Movie shown in the detail view, resolved against the current list
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.view.selected.and_then(|id| self.movie(id))
    }

    pub fn apply(&mut self, action: Action) -> Effect {
        let effect = match action {
            Action::ListReconciled(movies) => {
                self.movies = movies;
                self.drop_stale_selection();
                Effect::PersistList
            }
            Action::MovieAdded(movie) => {
                let movie = Movie {
                    watched: false,
                    ..movie
                };
                match self.movies.iter().position(|m| m.id == movie.id) {
                    Some(index) => self.movies[index] = movie,
                    None => self.movies.push(movie),
                }
                self.new_movie_input.clear();
                Effect::PersistList
            }
            Action::MovieRemoved(id) => {
                let before = self.movies.len();
                self.movies.retain(|movie| movie.id != id);
                self.drop_stale_selection();
                if self.movies.len() == before {
                    Effect::None
                } else {
                    Effect::PersistList
                }
            }
            Action::ToggleWatched(id) => match self.movies.iter_mut().find(|m| m.id == id) {
                Some(movie) => {
                    movie.watched = !movie.watched;
                    Effect::PersistList
                }
                None => Effect::None,
            },
            Action::SearchChanged(term) => {
                self.view.search_term = term;
                self.view.driver = ViewDriver::Search;
                Effect::None
            }
            Action::FilterChanged(mode) => {
                self.view.filter_mode = mode;
                self.view.driver = ViewDriver::Filter;
                Effect::None
            }
            Action::NewMovieInputChanged(text) => {
                self.new_movie_input = text;
                Effect::None
            }
            Action::Selected(id) => {
                if self.movie(id).is_some() {
                    self.view.selected = Some(id);
                }
                Effect::None
            }
            Action::SelectionCleared => {
                self.view.selected = None;
                Effect::None
            }
            Action::AlertRaised(message) => {
                self.alert = Some(message);
                Effect::None
            }
            Action::AlertDismissed => {
                self.alert = None;
                Effect::None
            }
        };

        // A list change re-runs the filter view, replacing any search result on display
        if effect == Effect::PersistList {
            self.view.driver = ViewDriver::Filter;
        }

        self.recompute();
        effect
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.view.selected {
            if self.movie(id).is_none() {
                self.view.selected = None;
            }
        }
    }

    // The driver decides which view input is consulted
    fn recompute(&mut self) {
        self.filtered = match self.view.driver {
            ViewDriver::Search => {
                compute_view(&self.movies, FilterMode::All, &self.view.search_term)
            }
            ViewDriver::Filter => compute_view(&self.movies, self.view.filter_mode, ""),
        };
    }
}
