use std::sync::Arc;

use crate::db::{InMemoryMovieRepository, MovieRepository};
use crate::services::MovieDirectory;

/// Shared state of the movie store service
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn MovieRepository>,
    /// Backs `/search/movie`; the route is not mounted without it
    pub directory: Option<Arc<dyn MovieDirectory>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Empty in-memory store without a search proxy
    pub fn new() -> Self {
        Self::with_repository(Arc::new(InMemoryMovieRepository::new()))
    }

    pub fn with_repository(repository: Arc<dyn MovieRepository>) -> Self {
        Self {
            repository,
            directory: None,
        }
    }

    pub fn with_directory(mut self, directory: Arc<dyn MovieDirectory>) -> Self {
        self.directory = Some(directory);
        self
    }
}
