use std::sync::Arc;

use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::DirectoryMovie,
    services::providers::MovieDirectory,
};

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour

/// Wraps a directory with a Redis read-through cache keyed by normalized query
#[derive(Clone)]
pub struct CachedDirectory {
    inner: Arc<dyn MovieDirectory>,
    cache: Cache,
}

impl CachedDirectory {
    pub fn new(inner: Arc<dyn MovieDirectory>, cache: Cache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait::async_trait]
impl MovieDirectory for CachedDirectory {
    async fn search(&self, query: &str) -> AppResult<Vec<DirectoryMovie>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::DirectorySearch(query.to_string()),
            SEARCH_CACHE_TTL,
            self.inner.search(query)
        )
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
