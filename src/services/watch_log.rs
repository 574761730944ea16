use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    models::{MovieId, Page, PageRequest, RecordId, UserId, WatchRecord},
    services::access::{MovieCatalog, WatchHistory},
};

/// Logs a viewing of an existing catalog movie
pub async fn record_watch(
    catalog: &dyn MovieCatalog,
    history: &dyn WatchHistory,
    user_id: UserId,
    movie_id: MovieId,
    watched_at: DateTime<Utc>,
) -> AppResult<WatchRecord> {
    if catalog.fetch_movie(movie_id).await?.is_none() {
        return Err(AppError::NotFound(format!("movie {}", movie_id)));
    }

    let record = history.record_watch(user_id, movie_id, watched_at).await?;
    tracing::info!(user_id, movie_id, record_id = record.id, "Watch recorded");
    Ok(record)
}

/// Deletes one of the user's own watch records
pub async fn remove_watch(
    history: &dyn WatchHistory,
    user_id: UserId,
    record_id: RecordId,
) -> AppResult<()> {
    let record = history
        .fetch_record(record_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("watch record {}", record_id)))?;

    if record.user_id != user_id {
        tracing::warn!(user_id, record_id, "Attempt to remove another user's watch record");
        return Err(AppError::Forbidden(format!(
            "watch record {} belongs to another user",
            record_id
        )));
    }

    if !history.remove_watch(record_id).await? {
        return Err(AppError::NotFound(format!("watch record {}", record_id)));
    }

    tracing::info!(user_id, record_id, "Watch removed");
    Ok(())
}

/// The user's full watch log, oldest first
pub async fn watch_history(history: &dyn WatchHistory, user_id: UserId) -> AppResult<Vec<WatchRecord>> {
    let mut records = history.fetch_full_history(user_id).await?;
    records.sort_by(|a, b| a.watched_at.cmp(&b.watched_at).then(a.id.cmp(&b.id)));
    Ok(records)
}

/// One page of the user's watch log, oldest first
pub async fn watch_history_page(
    history: &dyn WatchHistory,
    user_id: UserId,
    request: PageRequest,
) -> AppResult<Page<WatchRecord>> {
    let records = watch_history(history, user_id).await?;
    Ok(Page::slice(records, request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Movie;
    use crate::services::access::{MockMovieCatalog, MockWatchHistory};
    use chrono::TimeZone;

    fn record(id: RecordId, user_id: UserId, day: u32) -> WatchRecord {
        WatchRecord {
            id,
            user_id,
            movie_id: 1,
            watched_at: Utc.with_ymd_and_hms(2024, 1, day, 20, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_record_watch_unknown_movie() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_fetch_movie().returning(|_| Ok(None));
        let mut history = MockWatchHistory::new();
        history.expect_record_watch().never();

        let result = record_watch(&catalog, &history, 1, 42, Utc::now()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_record_watch_known_movie() {
        let mut catalog = MockMovieCatalog::new();
        catalog.expect_fetch_movie().returning(|id| {
            Ok(Some(Movie {
                id,
                name: "Heat".to_string(),
                genres: vec!["Crime".to_string()],
                release_year: 1995,
                director: "Michael Mann".to_string(),
                cast: vec![],
            }))
        });
        let mut history = MockWatchHistory::new();
        history
            .expect_record_watch()
            .times(1)
            .returning(|user_id, movie_id, watched_at| {
                Ok(WatchRecord {
                    id: 10,
                    user_id,
                    movie_id,
                    watched_at,
                })
            });

        let record = record_watch(&catalog, &history, 3, 42, Utc::now())
            .await
            .unwrap();
        assert_eq!(record.user_id, 3);
        assert_eq!(record.movie_id, 42);
    }

    #[tokio::test]
    async fn test_remove_watch_of_other_user_forbidden() {
        let mut history = MockWatchHistory::new();
        history
            .expect_fetch_record()
            .returning(|id| Ok(Some(record(id, 2, 5))));
        history.expect_remove_watch().never();

        let result = remove_watch(&history, 1, 7).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_remove_missing_watch() {
        let mut history = MockWatchHistory::new();
        history.expect_fetch_record().returning(|_| Ok(None));

        let result = remove_watch(&history, 1, 7).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_watch_history_is_chronological() {
        let mut history = MockWatchHistory::new();
        history.expect_fetch_full_history().returning(|user_id| {
            Ok(vec![
                record(3, user_id, 20),
                record(1, user_id, 2),
                record(2, user_id, 9),
            ])
        });

        let records = watch_history(&history, 1).await.unwrap();
        let ids: Vec<RecordId> = records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_watch_history_page() {
        let mut history = MockWatchHistory::new();
        history.expect_fetch_full_history().returning(|user_id| {
            Ok((1..=30)
                .rev()
                .map(|id| record(id, user_id, (id % 28 + 1) as u32))
                .collect())
        });

        let page = watch_history_page(&history, 1, PageRequest::new(2).unwrap())
            .await
            .unwrap();
        assert_eq!(page.total, 30);
        assert_eq!(page.pages, 2);
        assert_eq!(page.items.len(), 6);
        assert!(page
            .items
            .windows(2)
            .all(|pair| pair[0].watched_at <= pair[1].watched_at));
    }
}
