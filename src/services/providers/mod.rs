//! Remote collaborators of the watchlist.
//!
//! Both the movie directory (title lookups) and the movie store (the
//! authoritative list) sit behind traits so the session logic can run
//! against HTTP clients in production and mocks in tests.
use crate::{
    error::{AppError, AppResult},
    models::{DirectoryMovie, Movie, MovieId, NewMovie},
};

pub mod cached;
pub mod movie_store;
pub mod tmdb;

pub use cached::CachedDirectory;
pub use movie_store::HttpMovieStore;
pub use tmdb::TmdbDirectory;

/// Free-text movie metadata search
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieDirectory: Send + Sync {
    /// Search by title text; results are in the directory's relevance order
    async fn search(&self, query: &str) -> AppResult<Vec<DirectoryMovie>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// The service owning the persisted movie list
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieStore: Send + Sync {
    async fn list_movies(&self) -> AppResult<Vec<Movie>>;

    /// Creates a movie and returns the stored record with its assigned id
    async fn create_movie(&self, movie: &NewMovie) -> AppResult<Movie>;

    async fn delete_movie(&self, id: MovieId) -> AppResult<()>;
}

/// Turns a non-success response into `AppError::ExternalApi`, keeping the body for context
pub(crate) async fn ensure_success(
    response: reqwest::Response,
    service: &str,
) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::ExternalApi(format!(
        "{} returned status {}: {}",
        service, status, body
    )))
}
