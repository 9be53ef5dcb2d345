pub mod local;
pub mod movies;
pub mod postgres;
pub mod redis;

pub use self::local::{FileCache, LocalCache, MemoryCache, MovieCache};
pub use self::movies::{InMemoryMovieRepository, MovieRepository, PgMovieRepository};
pub use self::postgres::{create_pool, run_migrations};
pub use self::redis::{create_redis_client, Cache, CacheKey, CacheWriterHandle};
