use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    error::AppResult,
    models::{Movie, MovieId, RecordId, UserId, WatchRecord},
    services::access::{MovieCatalog, WatchHistory, WatchLater},
};

/// Process-local store backing both collaborators when no database is configured
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    movies: BTreeMap<MovieId, Movie>,
    records: BTreeMap<RecordId, WatchRecord>,
    next_record_id: RecordId,
    watch_later: BTreeSet<(UserId, MovieId)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the catalog; an existing movie with the same id is replaced
    pub async fn insert_movie(&self, movie: Movie) {
        let mut inner = self.inner.write().await;
        inner.movies.insert(movie.id, movie);
    }

    #[cfg(test)]
    async fn movie_count(&self) -> usize {
        self.inner.read().await.movies.len()
    }
}

#[async_trait::async_trait]
impl MovieCatalog for MemoryStore {
    async fn fetch_movie(&self, movie_id: MovieId) -> AppResult<Option<Movie>> {
        Ok(self.inner.read().await.movies.get(&movie_id).cloned())
    }

    async fn fetch_all_movies(&self, excluding: &HashSet<MovieId>) -> AppResult<Vec<Movie>> {
        let inner = self.inner.read().await;
        Ok(inner
            .movies
            .values()
            .filter(|movie| !excluding.contains(&movie.id))
            .cloned()
            .collect())
    }

    async fn fetch_movie_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> AppResult<(Vec<Movie>, usize)> {
        let inner = self.inner.read().await;
        let page = inner
            .movies
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((page, inner.movies.len()))
    }
}

#[async_trait::async_trait]
impl WatchHistory for MemoryStore {
    async fn fetch_recent_history(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<WatchRecord>> {
        let inner = self.inner.read().await;
        let mut records: Vec<WatchRecord> = inner
            .records
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.watched_at.cmp(&a.watched_at).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        Ok(records)
    }

    async fn fetch_full_history(&self, user_id: UserId) -> AppResult<Vec<WatchRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .values()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn record_watch(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        watched_at: DateTime<Utc>,
    ) -> AppResult<WatchRecord> {
        let mut inner = self.inner.write().await;
        inner.next_record_id += 1;
        let record = WatchRecord {
            id: inner.next_record_id,
            user_id,
            movie_id,
            watched_at,
        };
        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn fetch_record(&self, record_id: RecordId) -> AppResult<Option<WatchRecord>> {
        Ok(self.inner.read().await.records.get(&record_id).cloned())
    }

    async fn remove_watch(&self, record_id: RecordId) -> AppResult<bool> {
        Ok(self.inner.write().await.records.remove(&record_id).is_some())
    }
}

#[async_trait::async_trait]
impl WatchLater for MemoryStore {
    async fn add_to_watch_later(&self, user_id: UserId, movie_id: MovieId) -> AppResult<bool> {
        Ok(self.inner.write().await.watch_later.insert((user_id, movie_id)))
    }

    async fn remove_from_watch_later(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> AppResult<bool> {
        Ok(self.inner.write().await.watch_later.remove(&(user_id, movie_id)))
    }

    async fn fetch_watch_later(&self, user_id: UserId) -> AppResult<Vec<MovieId>> {
        let inner = self.inner.read().await;
        Ok(inner
            .watch_later
            .range((user_id, MovieId::MIN)..=(user_id, MovieId::MAX))
            .map(|(_, movie_id)| *movie_id)
            .collect())
    }
}
