use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{Movie, MovieId, NewMovie},
};

/// Persistence for the movie store service
#[async_trait::async_trait]
pub trait MovieRepository: Send + Sync {
    /// All stored movies ordered by id
    async fn list(&self) -> AppResult<Vec<Movie>>;

    /// Stores a movie and returns it with its assigned id
    async fn insert(&self, movie: &NewMovie) -> AppResult<Movie>;

    /// Removes a movie, returning whether a row existed
    async fn delete(&self, id: MovieId) -> AppResult<bool>;
}

#[derive(Debug, sqlx::FromRow)]
struct MovieRow {
    id: i32,
    title: Option<String>,
    release_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    watched: Option<bool>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: MovieId::from(row.id),
            title: row.title.unwrap_or_default(),
            release_date: row.release_date.unwrap_or_default(),
            overview: row.overview.unwrap_or_default(),
            poster_path: row.poster_path,
            watched: row.watched.unwrap_or_default(),
        }
    }
}

/// PostgreSQL-backed repository over the `movies` table
#[derive(Clone)]
pub struct PgMovieRepository {
    pool: PgPool,
}

impl PgMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MovieRepository for PgMovieRepository {
    async fn list(&self) -> AppResult<Vec<Movie>> {
        let rows = sqlx::query_as::<_, MovieRow>(
            r#"
            SELECT id, title, release_date, overview, poster_path, watched
            FROM movies
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    async fn insert(&self, movie: &NewMovie) -> AppResult<Movie> {
        let row = sqlx::query_as::<_, MovieRow>(
            r#"
            INSERT INTO movies (title, release_date, overview, poster_path, watched)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, release_date, overview, poster_path, watched
            "#,
        )
        .bind(&movie.title)
        .bind(&movie.release_date)
        .bind(&movie.overview)
        .bind(&movie.poster_path)
        .bind(movie.watched.unwrap_or(false))
        .fetch_one(&self.pool)
        .await?;

        Ok(Movie::from(row))
    }

    async fn delete(&self, id: MovieId) -> AppResult<bool> {
        // Ids beyond the SERIAL range cannot exist
        let Ok(id) = i32::try_from(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

struct InMemoryStore {
    next_id: MovieId,
    movies: Vec<Movie>,
}

/// Volatile repository used by tests and database-less runs
pub struct InMemoryMovieRepository {
    inner: RwLock<InMemoryStore>,
}

impl Default for InMemoryMovieRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(InMemoryStore {
                next_id: 1,
                movies: Vec::new(),
            }),
        }
    }
}

#[async_trait::async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn list(&self) -> AppResult<Vec<Movie>> {
        Ok(self.inner.read().await.movies.clone())
    }

    async fn insert(&self, movie: &NewMovie) -> AppResult<Movie> {
        let mut inner = self.inner.write().await;
        let created = Movie {
            id: inner.next_id,
            title: movie.title.clone(),
            release_date: movie.release_date.clone().unwrap_or_default(),
            overview: movie.overview.clone().unwrap_or_default(),
            poster_path: movie.poster_path.clone(),
            watched: movie.watched.unwrap_or(false),
        };
        inner.next_id += 1;
        inner.movies.push(created.clone());
        Ok(created)
    }

    async fn delete(&self, id: MovieId) -> AppResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.movies.len();
        inner.movies.retain(|movie| movie.id != id);
        Ok(inner.movies.len() != before)
    }
}
