use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{DirectorySearchResponse, Movie, MovieId, NewMovie},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
}

pub async fn root() -> &'static str {
    "Hello World!"
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// All stored movies ordered by id
pub async fn list_movies(State(state): State<AppState>) -> AppResult<Json<Vec<Movie>>> {
    let movies = state.repository.list().await?;
    Ok(Json(movies))
}

/// Stores a movie and echoes it with its assigned id
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(mut request): Json<NewMovie>,
) -> AppResult<Json<Movie>> {
    request.title = request.title.trim().to_string();
    if request.title.is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()));
    }

    let movie = state.repository.insert(&request).await?;

    tracing::info!(
        request_id = %request_id,
        movie_id = movie.id,
        title = %movie.title,
        "Movie stored"
    );

    Ok(Json(movie))
}

/// Deletes a movie; unknown ids still answer 204
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(id): Path<MovieId>,
) -> AppResult<StatusCode> {
    let existed = state.repository.delete(id).await?;

    tracing::info!(request_id = %request_id, movie_id = id, existed, "Movie delete handled");

    Ok(StatusCode::NO_CONTENT)
}

/// Directory search proxy in the directory's own response shape
pub async fn search_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<DirectorySearchResponse>> {
    let directory = state
        .directory
        .as_ref()
        .ok_or_else(|| AppError::NotFound("Movie search is not configured".to_string()))?;

    if params.query.trim().is_empty() {
        return Err(AppError::InvalidInput("query is required".to_string()));
    }

    let results = directory.search(&params.query).await?;

    tracing::info!(
        request_id = %request_id,
        query = %params.query,
        results = results.len(),
        "Search proxied"
    );

    Ok(Json(DirectorySearchResponse { results }))
}
