//! Storage collaborators consumed by the recommendation and rewatch services
//!
//! All traits return fully materialised snapshots. Implementations own all
//! storage mechanics; the services only read through them (watch logging is
//! routed through `WatchHistory` for the HTTP layer, never by the services).
use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{Movie, MovieId, RecordId, UserId, WatchRecord},
};

/// Read-only access to the movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Look up one movie. `Ok(None)` when the id is unknown.
    async fn fetch_movie(&self, movie_id: MovieId) -> AppResult<Option<Movie>>;

    /// Every catalog movie whose id is not in `excluding`, in ascending id order
    async fn fetch_all_movies(&self, excluding: &HashSet<MovieId>) -> AppResult<Vec<Movie>>;

    /// Up to `limit` movies in ascending id order after skipping `offset`,
    /// together with the size of the whole catalog
    async fn fetch_movie_page(&self, offset: usize, limit: usize)
        -> AppResult<(Vec<Movie>, usize)>;
}

/// Access to a user's watch log
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchHistory: Send + Sync {
    /// The user's `limit` most recent records, newest first
    async fn fetch_recent_history(&self, user_id: UserId, limit: usize)
        -> AppResult<Vec<WatchRecord>>;

    /// Every record of the user, in no particular order
    async fn fetch_full_history(&self, user_id: UserId) -> AppResult<Vec<WatchRecord>>;

    /// Append a viewing. The caller has already checked the movie exists.
    async fn record_watch(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        watched_at: DateTime<Utc>,
    ) -> AppResult<WatchRecord>;

    /// Look up a record regardless of owner
    async fn fetch_record(&self, record_id: RecordId) -> AppResult<Option<WatchRecord>>;

    /// Delete a record. Returns false when nothing was removed.
    async fn remove_watch(&self, record_id: RecordId) -> AppResult<bool>;
}

/// A user's set of movies saved for later, at most one entry per movie
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait WatchLater: Send + Sync {
    /// Save a movie. Returns false when it was already saved.
    async fn add_to_watch_later(&self, user_id: UserId, movie_id: MovieId) -> AppResult<bool>;

    /// Drop a saved movie. Returns false when it was not saved.
    async fn remove_from_watch_later(&self, user_id: UserId, movie_id: MovieId)
        -> AppResult<bool>;

    /// Saved movie ids in ascending order
    async fn fetch_watch_later(&self, user_id: UserId) -> AppResult<Vec<MovieId>>;
}
