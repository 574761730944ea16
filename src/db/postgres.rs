use std::collections::HashSet;

use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId, RecordId, UserId, WatchRecord},
    services::access::{MovieCatalog, WatchHistory, WatchLater},
};

/// Creates a PostgreSQL connection pool and brings the schema up to date
pub async fn create_pool(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Raw `movies` row; the table tolerates gaps the domain type does not
#[derive(Debug, FromRow)]
struct MovieRow {
    id: i64,
    name: String,
    genres: Vec<String>,
    release_year: Option<i32>,
    director: String,
    cast_members: Vec<String>,
}

impl TryFrom<MovieRow> for Movie {
    type Error = AppError;

    fn try_from(row: MovieRow) -> AppResult<Self> {
        let release_year = row.release_year.ok_or_else(|| {
            AppError::DataIntegrity(format!("movie {} has no release year", row.id))
        })?;

        let movie = Movie {
            id: row.id,
            name: row.name,
            genres: row.genres,
            release_year,
            director: row.director,
            cast: row.cast_members,
        };
        movie.validate()?;
        Ok(movie)
    }
}

#[derive(Debug, FromRow)]
struct WatchRow {
    id: i64,
    user_id: i64,
    movie_id: i64,
    watched_at: DateTime<Utc>,
}

impl From<WatchRow> for WatchRecord {
    fn from(row: WatchRow) -> Self {
        WatchRecord {
            id: row.id,
            user_id: row.user_id,
            movie_id: row.movie_id,
            watched_at: row.watched_at,
        }
    }
}

const MOVIE_COLUMNS: &str = "id, name, genres, release_year, director, cast_members";
const WATCH_COLUMNS: &str = "id, user_id, movie_id, watched_at";

/// PostgreSQL-backed catalog and watch log
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl MovieCatalog for PgStore {
    async fn fetch_movie(&self, movie_id: MovieId) -> AppResult<Option<Movie>> {
        let row: Option<MovieRow> =
            sqlx::query_as(&format!("SELECT {} FROM movies WHERE id = $1", MOVIE_COLUMNS))
                .bind(movie_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Movie::try_from).transpose()
    }

    async fn fetch_all_movies(&self, excluding: &HashSet<MovieId>) -> AppResult<Vec<Movie>> {
        let excluded: Vec<MovieId> = excluding.iter().copied().collect();
        let rows: Vec<MovieRow> = sqlx::query_as(&format!(
            "SELECT {} FROM movies WHERE NOT (id = ANY($1)) ORDER BY id",
            MOVIE_COLUMNS
        ))
        .bind(excluded)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(rows = rows.len(), excluded = excluding.len(), "Fetched candidate movies");

        rows.into_iter().map(Movie::try_from).collect()
    }

    async fn fetch_movie_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> AppResult<(Vec<Movie>, usize)> {
        let rows: Vec<MovieRow> = sqlx::query_as(&format!(
            "SELECT {} FROM movies ORDER BY id LIMIT $1 OFFSET $2",
            MOVIE_COLUMNS
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies")
            .fetch_one(&self.pool)
            .await?;

        let movies = rows
            .into_iter()
            .map(Movie::try_from)
            .collect::<AppResult<Vec<_>>>()?;
        Ok((movies, usize::try_from(total).unwrap_or_default()))
    }
}

#[async_trait::async_trait]
impl WatchHistory for PgStore {
    async fn fetch_recent_history(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<WatchRecord>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows: Vec<WatchRow> = sqlx::query_as(&format!(
            "SELECT {} FROM watch_records WHERE user_id = $1 \
             ORDER BY watched_at DESC, id DESC LIMIT $2",
            WATCH_COLUMNS
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(WatchRecord::from).collect())
    }

    async fn fetch_full_history(&self, user_id: UserId) -> AppResult<Vec<WatchRecord>> {
        let rows: Vec<WatchRow> = sqlx::query_as(&format!(
            "SELECT {} FROM watch_records WHERE user_id = $1",
            WATCH_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(WatchRecord::from).collect())
    }

    async fn record_watch(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        watched_at: DateTime<Utc>,
    ) -> AppResult<WatchRecord> {
        let row: WatchRow = sqlx::query_as(&format!(
            "INSERT INTO watch_records (user_id, movie_id, watched_at) \
             VALUES ($1, $2, $3) RETURNING {}",
            WATCH_COLUMNS
        ))
        .bind(user_id)
        .bind(movie_id)
        .bind(watched_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn fetch_record(&self, record_id: RecordId) -> AppResult<Option<WatchRecord>> {
        let row: Option<WatchRow> = sqlx::query_as(&format!(
            "SELECT {} FROM watch_records WHERE id = $1",
            WATCH_COLUMNS
        ))
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(WatchRecord::from))
    }

    async fn remove_watch(&self, record_id: RecordId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM watch_records WHERE id = $1")
            .bind(record_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl WatchLater for PgStore {
    async fn add_to_watch_later(&self, user_id: UserId, movie_id: MovieId) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO watch_later (user_id, movie_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, movie_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(movie_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_from_watch_later(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM watch_later WHERE user_id = $1 AND movie_id = $2")
            .bind(user_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch_watch_later(&self, user_id: UserId) -> AppResult<Vec<MovieId>> {
        let ids: Vec<MovieId> = sqlx::query_scalar(
            "SELECT movie_id FROM watch_later WHERE user_id = $1 ORDER BY movie_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
