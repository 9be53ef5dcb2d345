use crate::{
    error::AppResult,
    models::{Movie, MovieId, NewMovie},
    services::providers::{ensure_success, MovieStore},
};
use reqwest::Client as HttpClient;

const SERVICE_NAME: &str = "Movie store";

/// REST client for the movie store service
#[derive(Clone)]
pub struct HttpMovieStore {
    http_client: HttpClient,
    base_url: String,
}

impl HttpMovieStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), base_url)
    }

    pub fn with_client(http_client: HttpClient, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn movies_url(&self) -> String {
        format!("{}/movies", self.base_url)
    }
}

#[async_trait::async_trait]
impl MovieStore for HttpMovieStore {
    async fn list_movies(&self) -> AppResult<Vec<Movie>> {
        let response = self.http_client.get(self.movies_url()).send().await?;
        let movies: Vec<Movie> = ensure_success(response, SERVICE_NAME).await?.json().await?;

        tracing::debug!(movies = movies.len(), "Fetched movie list");
        Ok(movies)
    }

    async fn create_movie(&self, movie: &NewMovie) -> AppResult<Movie> {
        let response = self
            .http_client
            .post(self.movies_url())
            .json(movie)
            .send()
            .await?;
        let created: Movie = ensure_success(response, SERVICE_NAME).await?.json().await?;

        tracing::info!(movie_id = created.id, title = %created.title, "Movie created");
        Ok(created)
    }

    async fn delete_movie(&self, id: MovieId) -> AppResult<()> {
        let url = format!("{}/{}", self.movies_url(), id);
        let response = self.http_client.delete(&url).send().await?;
        ensure_success(response, SERVICE_NAME).await?;

        tracing::info!(movie_id = id, "Movie deleted");
        Ok(())
    }
}
