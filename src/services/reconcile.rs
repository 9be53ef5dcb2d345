use std::collections::{HashMap, HashSet};

use crate::models::{Movie, MovieId};

/// Events that refetch the server list and merge it with local state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileTrigger {
    Startup,
    AfterAdd,
}

impl ReconcileTrigger {
    pub fn as_str(self) -> &'static str {
        match self {
            ReconcileTrigger::Startup => "startup",
            ReconcileTrigger::AfterAdd => "after_add",
        }
    }
}

/// Merges the authoritative server list with the locally cached one.
///
/// The server decides which movies exist and in what order. For every id the
/// cache also knows, the cached record is kept verbatim so client-owned state
/// such as `watched` survives; new ids come from the server with `watched`
/// reset to false. Cached ids the server no longer returns are dropped, and a
/// repeated server id keeps only its first occurrence.
pub fn reconcile(server: &[Movie], cached: &[Movie]) -> Vec<Movie> {
    let mut cached_by_id: HashMap<MovieId, &Movie> = HashMap::with_capacity(cached.len());
    for movie in cached {
        cached_by_id.entry(movie.id).or_insert(movie);
    }
    let mut seen = HashSet::with_capacity(server.len());

    server
        .iter()
        .filter(|movie| seen.insert(movie.id))
        .map(|movie| match cached_by_id.get(&movie.id) {
            Some(local) => (*local).clone(),
            None => Movie {
                watched: false,
                ..movie.clone()
            },
        })
        .collect()
}
