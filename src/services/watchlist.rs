use std::sync::Arc;

use crate::{
    config::Config,
    db::{FileCache, LocalCache, MovieCache},
    error::{AppError, AppResult},
    models::{FilterMode, Movie, MovieId, NewMovie},
    services::{
        providers::{HttpMovieStore, MovieDirectory, MovieStore, TmdbDirectory},
        reconcile::{reconcile, ReconcileTrigger},
        state::{Action, Effect, WatchlistState},
    },
};

pub const NOT_FOUND_ALERT: &str = "Movie not found on TMDb";
pub const FETCH_FAILED_ALERT: &str = "Failed to fetch movie details. Please try again.";

/// A user's watchlist session
///
/// Owns the session state, performs the remote calls for each mutation and
/// mirrors the movie list into the local cache whenever it changes. Mutations
/// take `&mut self`, so one session never runs two of them at once.
pub struct Watchlist {
    state: WatchlistState,
    cache: MovieCache,
    store: Arc<dyn MovieStore>,
    directory: Arc<dyn MovieDirectory>,
}

impl Watchlist {
    /// Opens a session seeded from the local cache; no network calls are made
    pub fn open(
        store: Arc<dyn MovieStore>,
        directory: Arc<dyn MovieDirectory>,
        cache: impl LocalCache + 'static,
    ) -> Self {
        let cache = MovieCache::new(cache);
        let state = WatchlistState::new(cache.load_movies());

        tracing::info!(cached = state.movies().len(), "Watchlist opened");

        Self {
            state,
            cache,
            store,
            directory,
        }
    }

    /// Session wired to the HTTP store and a file cache.
    ///
    /// Searches go straight to TMDb when a token is configured and through the
    /// store's search proxy otherwise.
    pub fn from_config(config: &Config) -> Self {
        let store = Arc::new(HttpMovieStore::new(config.store_url.as_str()));
        let directory = match &config.tmdb_api_key {
            Some(key) => TmdbDirectory::new(Some(key.clone()), config.tmdb_api_url.as_str()),
            None => TmdbDirectory::new(None, config.store_url.as_str()),
        };

        Self::open(store, Arc::new(directory), FileCache::new(config.cache_dir.clone()))
    }

    pub fn state(&self) -> &WatchlistState {
        &self.state
    }

    /// Initial fetch-and-reconcile
    pub async fn start(&mut self) -> AppResult<()> {
        self.refresh(ReconcileTrigger::Startup).await
    }

    /// Refetches the server list and merges it with local watched state
    pub async fn refresh(&mut self, trigger: ReconcileTrigger) -> AppResult<()> {
        let server = self.store.list_movies().await.map_err(|e| {
            tracing::warn!(trigger = trigger.as_str(), error = %e, "Failed to fetch movie list");
            e
        })?;

        let merged = reconcile(&server, self.state.movies());
        tracing::info!(
            trigger = trigger.as_str(),
            server = server.len(),
            merged = merged.len(),
            "Movie list reconciled"
        );

        self.dispatch(Action::ListReconciled(merged));
        Ok(())
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.dispatch(Action::SearchChanged(term.into()));
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.dispatch(Action::FilterChanged(mode));
    }

    pub fn set_new_movie_input(&mut self, text: impl Into<String>) {
        self.dispatch(Action::NewMovieInputChanged(text.into()));
    }

    /// Looks up the new-movie input in the directory, stores the first hit and
    /// appends it to the list.
    ///
    /// Nothing in the list changes unless the store accepted the movie. A
    /// failed follow-up refresh is logged and leaves the appended movie in place.
    pub async fn add_movie(&mut self) -> AppResult<Movie> {
        let query = self.state.new_movie_input().trim().to_string();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Movie title cannot be empty".to_string(),
            ));
        }

        let results = match self.directory.search(&query).await {
            Ok(results) => results,
            Err(e) => return Err(self.add_failed(&query, e)),
        };

        let Some(found) = results.into_iter().next() else {
            tracing::info!(query = %query, provider = self.directory.name(), "No directory match");
            self.dispatch(Action::AlertRaised(NOT_FOUND_ALERT.to_string()));
            return Err(AppError::NotFound(format!("No movie matches '{}'", query)));
        };

        let created = match self.store.create_movie(&NewMovie::from(found)).await {
            Ok(created) => created,
            Err(e) => return Err(self.add_failed(&query, e)),
        };

        let added = Movie {
            watched: false,
            ..created
        };
        self.dispatch(Action::MovieAdded(added.clone()));
        tracing::info!(movie_id = added.id, title = %added.title, "Movie added to watchlist");

        if let Err(e) = self.refresh(ReconcileTrigger::AfterAdd).await {
            tracing::warn!(movie_id = added.id, error = %e, "Refresh after add failed");
        }

        Ok(added)
    }

    /// Deletes on the store first; the local list only changes once that succeeded
    pub async fn delete_movie(&mut self, id: MovieId) -> AppResult<()> {
        if let Err(e) = self.store.delete_movie(id).await {
            tracing::error!(movie_id = id, error = %e, "Failed to delete movie");
            return Err(e);
        }

        self.dispatch(Action::MovieRemoved(id));
        Ok(())
    }

    /// Flips the watched flag locally; the store is never told
    pub fn toggle_watched(&mut self, id: MovieId) -> AppResult<bool> {
        if self.state.movie(id).is_none() {
            return Err(AppError::NotFound(format!("Movie {} is not on the list", id)));
        }

        self.dispatch(Action::ToggleWatched(id));
        Ok(self.state.movie(id).is_some_and(|movie| movie.watched))
    }

    pub fn select(&mut self, id: MovieId) -> AppResult<()> {
        if self.state.movie(id).is_none() {
            return Err(AppError::NotFound(format!("Movie {} is not on the list", id)));
        }

        self.dispatch(Action::Selected(id));
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.dispatch(Action::SelectionCleared);
    }

    pub fn dismiss_alert(&mut self) {
        self.dispatch(Action::AlertDismissed);
    }

    fn add_failed(&mut self, query: &str, error: AppError) -> AppError {
        tracing::error!(query = %query, error = %error, "Failed to add movie");
        self.dispatch(Action::AlertRaised(FETCH_FAILED_ALERT.to_string()));
        error
    }

    fn dispatch(&mut self, action: Action) {
        if self.state.apply(action) == Effect::PersistList {
            if let Err(e) = self.cache.save_movies(self.state.movies()) {
                tracing::warn!(error = %e, "Failed to write local movie cache");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{local::USER_MOVIES_KEY, MemoryCache};
    use crate::models::DirectoryMovie;
    use crate::services::providers::{MockMovieDirectory, MockMovieStore};

    fn movie(id: MovieId, title: &str, watched: bool) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            release_date: String::new(),
            overview: String::new(),
            poster_path: None,
            watched,
        }
    }

    fn dune_hit() -> DirectoryMovie {
        DirectoryMovie {
            title: "Dune".to_string(),
            release_date: Some("2021-09-15".to_string()),
            overview: Some("Spice.".to_string()),
            poster_path: Some("/dune.jpg".to_string()),
        }
    }

    fn cached_movies(cache: &MemoryCache) -> Vec<Movie> {
        let raw = cache.load(USER_MOVIES_KEY).unwrap().unwrap_or_default();
        serde_json::from_str(&raw).unwrap()
    }

    fn seeded_cache(movies: &[Movie]) -> Arc<MemoryCache> {
        let cache = Arc::new(MemoryCache::new());
        cache
            .save(USER_MOVIES_KEY, &serde_json::to_string(movies).unwrap())
            .unwrap();
        cache
    }

    fn ids(movies: &[Movie]) -> Vec<MovieId> {
        movies.iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn test_startup_reconciles_with_cache() {
        let cache = seeded_cache(&[movie(1, "Dune", true), movie(5, "Gone", true)]);

        let mut store = MockMovieStore::new();
        store
            .expect_list_movies()
            .times(1)
            .returning(|| Ok(vec![movie(1, "Dune", false), movie(2, "Nope", true)]));

        let mut watchlist = Watchlist::open(
            Arc::new(store),
            Arc::new(MockMovieDirectory::new()),
            cache.clone(),
        );
        assert_eq!(ids(watchlist.state().movies()), vec![1, 5]);

        watchlist.start().await.unwrap();

        assert_eq!(
            watchlist.state().movies(),
            &[movie(1, "Dune", true), movie(2, "Nope", false)]
        );
        assert_eq!(cached_movies(&cache), watchlist.state().movies());
    }

    #[tokio::test]
    async fn test_failed_startup_keeps_cached_list() {
        let cache = seeded_cache(&[movie(1, "Dune", true)]);

        let mut store = MockMovieStore::new();
        store
            .expect_list_movies()
            .returning(|| Err(AppError::ExternalApi("down".to_string())));

        let mut watchlist =
            Watchlist::open(Arc::new(store), Arc::new(MockMovieDirectory::new()), cache);

        assert!(watchlist.start().await.is_err());
        assert_eq!(watchlist.state().movies(), &[movie(1, "Dune", true)]);
    }

    #[tokio::test]
    async fn test_add_round_trip() {
        let mut directory = MockMovieDirectory::new();
        directory
            .expect_search()
            .withf(|query| query == "dune")
            .times(1)
            .returning(|_| Ok(vec![dune_hit()]));
        directory.expect_name().return_const("tmdb");

        let stored = Movie {
            id: 10,
            title: "Dune".to_string(),
            release_date: "2021-09-15".to_string(),
            overview: "Spice.".to_string(),
            poster_path: Some("/dune.jpg".to_string()),
            watched: false,
        };

        let mut store = MockMovieStore::new();
        let created = stored.clone();
        store
            .expect_create_movie()
            .withf(|new_movie| {
                new_movie.title == "Dune"
                    && new_movie.poster_path.as_deref() == Some("/dune.jpg")
                    && new_movie.watched == Some(false)
            })
            .times(1)
            .returning(move |_| Ok(created.clone()));
        let listed = stored.clone();
        store
            .expect_list_movies()
            .times(1)
            .returning(move || Ok(vec![listed.clone()]));

        let cache = Arc::new(MemoryCache::new());
        let mut watchlist = Watchlist::open(Arc::new(store), Arc::new(directory), cache.clone());
        watchlist.set_new_movie_input("  dune ");

        let added = watchlist.add_movie().await.unwrap();

        assert_eq!(added.id, 10);
        assert_eq!(watchlist.state().movies(), &[stored.clone()]);
        assert!(!watchlist.state().movies()[0].watched);
        assert_eq!(watchlist.state().filtered(), &[stored.clone()]);
        assert_eq!(watchlist.state().new_movie_input(), "");
        assert_eq!(watchlist.state().alert(), None);
        assert_eq!(cached_movies(&cache), vec![stored]);
    }

    #[tokio::test]
    async fn test_add_not_found() {
        let mut directory = MockMovieDirectory::new();
        directory.expect_search().times(1).returning(|_| Ok(vec![]));
        directory.expect_name().return_const("tmdb");

        let mut store = MockMovieStore::new();
        store.expect_create_movie().times(0);
        store.expect_list_movies().times(0);

        let cache = seeded_cache(&[movie(1, "Heat", false)]);
        let mut watchlist = Watchlist::open(Arc::new(store), Arc::new(directory), cache);
        watchlist.set_new_movie_input("zzzz");

        let err = watchlist.add_movie().await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(watchlist.state().movies(), &[movie(1, "Heat", false)]);
        assert_eq!(watchlist.state().alert(), Some(NOT_FOUND_ALERT));
        assert_eq!(watchlist.state().new_movie_input(), "zzzz");
    }

    #[tokio::test]
    async fn test_add_network_failure_leaves_list_unchanged() {
        let mut directory = MockMovieDirectory::new();
        directory
            .expect_search()
            .returning(|_| Ok(vec![dune_hit()]));

        let mut store = MockMovieStore::new();
        store
            .expect_create_movie()
            .times(1)
            .returning(|_| {
                Err(AppError::ExternalApi(
                    "Movie store returned status 500".to_string(),
                ))
            });
        store.expect_list_movies().times(0);

        let cache = Arc::new(MemoryCache::new());
        let mut watchlist = Watchlist::open(Arc::new(store), Arc::new(directory), cache.clone());
        watchlist.set_new_movie_input("dune");

        let err = watchlist.add_movie().await.unwrap_err();

        assert!(err.is_network());
        assert!(watchlist.state().movies().is_empty());
        assert_eq!(watchlist.state().alert(), Some(FETCH_FAILED_ALERT));
        assert_eq!(cache.load(USER_MOVIES_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_directory_failure_raises_fetch_alert() {
        let mut directory = MockMovieDirectory::new();
        directory
            .expect_search()
            .returning(|_| Err(AppError::ExternalApi("TMDb returned status 503".to_string())));

        let mut store = MockMovieStore::new();
        store.expect_create_movie().times(0);

        let mut watchlist = Watchlist::open(
            Arc::new(store),
            Arc::new(directory),
            MemoryCache::new(),
        );
        watchlist.set_new_movie_input("dune");

        assert!(watchlist.add_movie().await.is_err());
        assert_eq!(watchlist.state().alert(), Some(FETCH_FAILED_ALERT));
    }

    #[tokio::test]
    async fn test_add_with_empty_input_makes_no_calls() {
        let mut directory = MockMovieDirectory::new();
        directory.expect_search().times(0);
        let mut store = MockMovieStore::new();
        store.expect_create_movie().times(0);

        let mut watchlist = Watchlist::open(
            Arc::new(store),
            Arc::new(directory),
            MemoryCache::new(),
        );
        watchlist.set_new_movie_input("   ");

        let err = watchlist.add_movie().await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(watchlist.state().alert(), None);
    }

    #[tokio::test]
    async fn test_failed_refresh_after_add_keeps_appended_movie() {
        let mut directory = MockMovieDirectory::new();
        directory
            .expect_search()
            .returning(|_| Ok(vec![dune_hit()]));

        let mut store = MockMovieStore::new();
        store
            .expect_create_movie()
            .returning(|_| Ok(movie(10, "Dune", false)));
        store
            .expect_list_movies()
            .times(1)
            .returning(|| Err(AppError::ExternalApi("down".to_string())));

        let mut watchlist = Watchlist::open(
            Arc::new(store),
            Arc::new(directory),
            MemoryCache::new(),
        );
        watchlist.set_new_movie_input("dune");

        assert!(watchlist.add_movie().await.is_ok());
        assert_eq!(ids(watchlist.state().movies()), vec![10]);
    }

    #[tokio::test]
    async fn test_toggle_is_local_only() {
        let mut store = MockMovieStore::new();
        store.expect_list_movies().times(0);
        store.expect_create_movie().times(0);
        store.expect_delete_movie().times(0);

        let cache = seeded_cache(&[movie(1, "Dune", false), movie(2, "Nope", false)]);
        let mut watchlist = Watchlist::open(
            Arc::new(store),
            Arc::new(MockMovieDirectory::new()),
            cache.clone(),
        );

        assert!(watchlist.toggle_watched(2).unwrap());
        watchlist.set_filter(FilterMode::Watched);

        assert_eq!(ids(watchlist.state().filtered()), vec![2]);
        assert!(cached_movies(&cache)[1].watched);
        assert!(matches!(watchlist.toggle_watched(9), Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_removes_from_both_lists() {
        let mut store = MockMovieStore::new();
        store
            .expect_delete_movie()
            .withf(|id| *id == 1)
            .times(1)
            .returning(|_| Ok(()));

        let cache = seeded_cache(&[movie(1, "Dune", true), movie(2, "Nope", false)]);
        let mut watchlist = Watchlist::open(
            Arc::new(store),
            Arc::new(MockMovieDirectory::new()),
            cache.clone(),
        );
        watchlist.set_filter(FilterMode::Watched);
        watchlist.select(1).unwrap();

        tokio_test::assert_ok!(watchlist.delete_movie(1).await);

        assert_eq!(ids(watchlist.state().movies()), vec![2]);
        assert!(watchlist.state().filtered().is_empty());
        assert_eq!(watchlist.state().selected_movie(), None);
        assert_eq!(ids(&cached_movies(&cache)), vec![2]);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_state_unchanged() {
        let mut store = MockMovieStore::new();
        store
            .expect_delete_movie()
            .times(1)
            .returning(|_| Err(AppError::ExternalApi("down".to_string())));

        let cache = seeded_cache(&[movie(1, "Dune", true)]);
        let mut watchlist = Watchlist::open(
            Arc::new(store),
            Arc::new(MockMovieDirectory::new()),
            cache,
        );

        tokio_test::assert_err!(watchlist.delete_movie(1).await);
        assert_eq!(ids(watchlist.state().movies()), vec![1]);
    }

    #[tokio::test]
    async fn test_search_then_filter_uses_latest_input() {
        let cache = seeded_cache(&[movie(1, "Dune", true), movie(2, "Nope", false)]);
        let mut watchlist = Watchlist::open(
            Arc::new(MockMovieStore::new()),
            Arc::new(MockMovieDirectory::new()),
            cache,
        );

        watchlist.set_search_term("du");
        assert_eq!(ids(watchlist.state().filtered()), vec![1]);

        watchlist.set_filter(FilterMode::Unwatched);
        assert_eq!(ids(watchlist.state().filtered()), vec![2]);

        watchlist.set_search_term("");
        assert_eq!(ids(watchlist.state().filtered()), vec![1, 2]);
    }

    #[test]
    fn test_select_and_deselect() {
        let cache = seeded_cache(&[movie(1, "Dune", true)]);
        let mut watchlist = Watchlist::open(
            Arc::new(MockMovieStore::new()),
            Arc::new(MockMovieDirectory::new()),
            cache,
        );

        assert!(watchlist.select(3).is_err());
        watchlist.select(1).unwrap();
        assert_eq!(watchlist.state().selected_movie().map(|m| m.id), Some(1));

        watchlist.deselect();
        assert_eq!(watchlist.state().selected_movie(), None);
    }
}
