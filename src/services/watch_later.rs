use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId, UserId},
    services::{
        access::{MovieCatalog, WatchLater},
        recommendations::load_movie,
    },
};

async fn ensure_movie_exists(catalog: &dyn MovieCatalog, movie_id: MovieId) -> AppResult<()> {
    match catalog.fetch_movie(movie_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!("movie {}", movie_id))),
    }
}

/// Saves a catalog movie for later. Saving it again changes nothing.
pub async fn add_to_watch_later(
    catalog: &dyn MovieCatalog,
    watch_later: &dyn WatchLater,
    user_id: UserId,
    movie_id: MovieId,
) -> AppResult<()> {
    ensure_movie_exists(catalog, movie_id).await?;

    if watch_later.add_to_watch_later(user_id, movie_id).await? {
        tracing::info!(user_id, movie_id, "Movie saved for later");
    } else {
        tracing::debug!(user_id, movie_id, "Movie already saved for later");
    }
    Ok(())
}

/// Drops a saved movie. Dropping one that was never saved is not an error.
pub async fn remove_from_watch_later(
    catalog: &dyn MovieCatalog,
    watch_later: &dyn WatchLater,
    user_id: UserId,
    movie_id: MovieId,
) -> AppResult<()> {
    ensure_movie_exists(catalog, movie_id).await?;

    if watch_later.remove_from_watch_later(user_id, movie_id).await? {
        tracing::info!(user_id, movie_id, "Movie removed from watch later");
    }
    Ok(())
}

/// The user's saved movies in ascending id order
pub async fn watch_later_movies(
    catalog: &dyn MovieCatalog,
    watch_later: &dyn WatchLater,
    user_id: UserId,
) -> AppResult<Vec<Movie>> {
    let ids = watch_later.fetch_watch_later(user_id).await?;

    let mut movies = Vec::with_capacity(ids.len());
    for movie_id in ids {
        movies.push(load_movie(catalog, movie_id).await?);
    }
    Ok(movies)
}
