/// TMDb movie search
///
/// Talks to `GET {api_url}/search/movie?query=...`. The same request shape is
/// served by the store's own `/search/movie` proxy, so a client without a
/// TMDb token can point this at the store URL and omit the key.
use crate::{
    error::{AppError, AppResult},
    models::{DirectoryMovie, DirectorySearchResponse},
    services::providers::{ensure_success, MovieDirectory},
};
use reqwest::{header::ACCEPT, Client as HttpClient};

#[derive(Clone)]
pub struct TmdbDirectory {
    http_client: HttpClient,
    api_key: Option<String>,
    api_url: String,
}

impl TmdbDirectory {
    pub fn new(api_key: Option<String>, api_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), api_key, api_url)
    }

    pub fn with_client(
        http_client: HttpClient,
        api_key: Option<String>,
        api_url: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl MovieDirectory for TmdbDirectory {
    async fn search(&self, query: &str) -> AppResult<Vec<DirectoryMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let url = format!("{}/search/movie", self.api_url);

        let mut request = self
            .http_client
            .get(&url)
            .query(&[("query", query)])
            .header(ACCEPT, "application/json");
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = ensure_success(request.send().await?, "TMDb").await?;
        let body: DirectorySearchResponse = response.json().await?;

        tracing::info!(
            query = %query,
            results = body.results.len(),
            provider = self.name(),
            "Movie search completed"
        );

        Ok(body.results)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
