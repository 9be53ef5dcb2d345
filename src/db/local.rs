//! Synchronous key-value persistence for the watchlist session.
//!
//! The session reads its movie list once when it opens and writes the whole
//! list back after every change, so stores only need whole-value get/put.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

/// Key under which the movie list is stored
pub const USER_MOVIES_KEY: &str = "userMovies";

pub trait LocalCache: Send + Sync {
    fn load(&self, key: &str) -> AppResult<Option<String>>;
    fn save(&self, key: &str, value: &str) -> AppResult<()>;
}

impl<T: LocalCache + ?Sized> LocalCache for Arc<T> {
    fn load(&self, key: &str) -> AppResult<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> AppResult<()> {
        (**self).save(key, value)
    }
}

/// One JSON document per key inside a directory
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> AppResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::InvalidInput(format!("Invalid cache key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl LocalCache for FileCache {
    fn load(&self, key: &str) -> AppResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir)?;
        write_atomic(&path, value.as_bytes())
    }
}

/// Write-to-temp-then-rename so readers never observe a partial document
fn write_atomic(dst: &Path, contents: &[u8]) -> AppResult<()> {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let temp_path = dst.with_extension(format!("tmp.{:016x}", suffix));

    let result = (|| -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        drop(file);

        #[cfg(windows)]
        if dst.exists() {
            std::fs::remove_file(dst)?;
        }

        std::fs::rename(&temp_path, dst)
    })();

    if let Err(e) = result {
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }

    Ok(())
}

/// Process-local store, mostly for tests
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn load(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("Memory cache lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("Memory cache lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to the cached movie list
pub struct MovieCache {
    store: Box<dyn LocalCache>,
}

impl MovieCache {
    pub fn new(store: impl LocalCache + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// Reads the cached list. Missing, unreadable or corrupt entries all yield an empty list.
    pub fn load_movies(&self) -> Vec<Movie> {
        let raw = match self.store.load(USER_MOVIES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read local movie cache, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Movie>>(&raw) {
            Ok(movies) => {
                tracing::debug!(movies = movies.len(), "Loaded movies from local cache");
                movies
            }
            Err(e) => {
                tracing::warn!(error = %e, "Local movie cache is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    pub fn save_movies(&self, movies: &[Movie]) -> AppResult<()> {
        let json = serde_json::to_string(movies)?;
        self.store.save(USER_MOVIES_KEY, &json)?;
        tracing::debug!(movies = movies.len(), "Saved movies to local cache");
        Ok(())
    }
}
