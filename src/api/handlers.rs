use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        Movie, MovieId, NewWatchRecord, Page, PageRequest, RecordId, ScoredMovie, SearchHit,
        UserId, WatchRecord,
    },
    services::{self, watch_later, watch_log, RecommendationLimits},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendQuery {
    pub max_results: Option<i64>,
    pub window: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<i64>,
}

impl PageQuery {
    fn request(&self) -> AppResult<PageRequest> {
        self.page.map_or(Ok(PageRequest::default()), PageRequest::new)
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Get one catalog movie
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<Movie>> {
    let movie = state
        .catalog
        .fetch_movie(movie_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("movie {}", movie_id)))?;
    Ok(Json(movie))
}

/// Browse the catalog, 24 movies per page
pub async fn browse_movies(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<Movie>>> {
    let page = services::browse_catalog(state.catalog.as_ref(), query.request()?).await?;
    Ok(Json(page))
}

/// Search catalog titles by words, best matches first
pub async fn search_movies(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<SearchHit>>> {
    let text = query
        .q
        .ok_or_else(|| AppError::InvalidParameter("missing search query `q`".to_string()))?;

    tracing::info!(request_id = %request_id, query = %text, "Processing title search");

    let hits = services::search_titles(state.catalog.as_ref(), &text).await?;
    Ok(Json(hits))
}

/// Recommend unseen movies from the user's recent watches
pub async fn recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
    Query(query): Query<RecommendQuery>,
) -> AppResult<Json<Vec<ScoredMovie>>> {
    let limits = RecommendationLimits::new(
        query.max_results.unwrap_or(state.defaults.max_results),
        query.window.unwrap_or(state.defaults.recency_window),
    )?;

    tracing::info!(
        request_id = %request_id,
        user_id,
        max_results = limits.max_results,
        recency_window = limits.recency_window,
        "Processing recommendation request"
    );

    let recommendations = services::recommend(
        state.catalog.as_ref(),
        state.history.as_ref(),
        user_id,
        limits,
    )
    .await?;

    Ok(Json(recommendations))
}

/// Movies the user is overdue to watch again
pub async fn rewatch(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<Vec<Movie>>> {
    tracing::info!(request_id = %request_id, user_id, "Processing rewatch request");

    let movies = services::due_for_rewatch(
        state.catalog.as_ref(),
        state.history.as_ref(),
        user_id,
        Utc::now(),
    )
    .await?;

    Ok(Json(movies))
}

/// The user's watch log, oldest first, 24 records per page
pub async fn get_history(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Page<WatchRecord>>> {
    let page =
        watch_log::watch_history_page(state.history.as_ref(), user_id, query.request()?).await?;
    Ok(Json(page))
}

/// Log a viewing
pub async fn add_to_history(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(request): Json<NewWatchRecord>,
) -> AppResult<(StatusCode, Json<WatchRecord>)> {
    let record = watch_log::record_watch(
        state.catalog.as_ref(),
        state.history.as_ref(),
        user_id,
        request.movie_id,
        request.watched_at,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// Remove one of the user's watch records
pub async fn remove_from_history(
    State(state): State<AppState>,
    Path((user_id, record_id)): Path<(UserId, RecordId)>,
) -> AppResult<StatusCode> {
    watch_log::remove_watch(state.history.as_ref(), user_id, record_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The user's saved movies
pub async fn get_watch_later(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<Vec<Movie>>> {
    let movies = watch_later::watch_later_movies(
        state.catalog.as_ref(),
        state.watch_later.as_ref(),
        user_id,
    )
    .await?;
    Ok(Json(movies))
}

/// Save a movie for later
pub async fn add_to_watch_later(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(UserId, MovieId)>,
) -> AppResult<StatusCode> {
    watch_later::add_to_watch_later(
        state.catalog.as_ref(),
        state.watch_later.as_ref(),
        user_id,
        movie_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Drop a saved movie
pub async fn remove_from_watch_later(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(UserId, MovieId)>,
) -> AppResult<StatusCode> {
    watch_later::remove_from_watch_later(
        state.catalog.as_ref(),
        state.watch_later.as_ref(),
        user_id,
        movie_id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
