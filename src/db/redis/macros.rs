/// Read-through caching over a Redis [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits
/// `$block`, queues its result for a background write with `$ttl` seconds
/// to live, and returns it. A failed cache read (Redis unreachable, for
/// instance) is logged and handled as a miss. Errors from the block are
/// propagated with `?`, so the macro must be used inside a function
/// returning `AppResult`.
///
/// # Example
/// ```rust,ignore
/// async fn search(&self, query: &str) -> AppResult<Vec<DirectoryMovie>> {
///     cached!(
///         self.cache,
///         CacheKey::DirectorySearch(query.to_string()),
///         SEARCH_CACHE_TTL,
///         self.inner.search(query)
///     )
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        let hit = match $cache.get_from_cache(&key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        };
        if let Some(cached) = hit {
            tracing::debug!(key = %key, "Cache hit");
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
