use std::collections::HashSet;

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId, ScoredMovie, UserId},
    services::{
        access::{MovieCatalog, WatchHistory},
        scoring,
        taste::TasteProfile,
    },
};

/// Validated size parameters of a recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationLimits {
    pub max_results: usize,
    pub recency_window: usize,
}

impl RecommendationLimits {
    /// Rejects negative sizes. Zero is valid and simply yields nothing.
    pub fn new(max_results: i64, recency_window: i64) -> AppResult<Self> {
        let max_results = usize::try_from(max_results).map_err(|_| {
            AppError::InvalidParameter(format!(
                "max_results must be non-negative, got {}",
                max_results
            ))
        })?;
        let recency_window = usize::try_from(recency_window).map_err(|_| {
            AppError::InvalidParameter(format!(
                "recency_window must be non-negative, got {}",
                recency_window
            ))
        })?;

        Ok(Self {
            max_results,
            recency_window,
        })
    }
}

/// Recommends unseen movies from the user's recent viewing
///
/// Builds a taste profile from the `recency_window` most recent watch records,
/// scores every catalog movie the user has never watched and returns the best
/// `max_results`, highest score first with ties in ascending id order.
///
/// An empty window returns an empty list without touching the catalog.
pub async fn recommend(
    catalog: &dyn MovieCatalog,
    history: &dyn WatchHistory,
    user_id: UserId,
    limits: RecommendationLimits,
) -> AppResult<Vec<ScoredMovie>> {
    let recent = history
        .fetch_recent_history(user_id, limits.recency_window)
        .await?;

    if recent.is_empty() {
        tracing::debug!(user_id, "No recent watches, skipping recommendations");
        return Ok(vec![]);
    }

    let mut window = Vec::with_capacity(recent.len());
    for record in &recent {
        window.push(load_movie(catalog, record.movie_id).await?);
    }

    let Some(profile) = TasteProfile::from_window(&window)? else {
        return Ok(vec![]);
    };

    tracing::debug!(
        user_id,
        window = window.len(),
        genres = ?profile.dominant_genres,
        mean_release_year = profile.mean_release_year,
        "Built taste profile"
    );

    if limits.max_results == 0 {
        return Ok(vec![]);
    }

    let watched: HashSet<MovieId> = history
        .fetch_full_history(user_id)
        .await?
        .into_iter()
        .map(|record| record.movie_id)
        .collect();

    let candidates = catalog.fetch_all_movies(&watched).await?;
    for movie in &candidates {
        movie.validate()?;
    }
    // Guard the no-repeat guarantee against a catalog that ignores `excluding`
    let candidates: Vec<Movie> = candidates
        .into_iter()
        .filter(|movie| !watched.contains(&movie.id))
        .collect();
    let candidate_count = candidates.len();

    let mut ranked = scoring::rank(&profile, candidates);
    ranked.truncate(limits.max_results);

    tracing::info!(
        user_id,
        candidate_count,
        result_count = ranked.len(),
        "Recommendations computed"
    );

    Ok(ranked)
}

/// Fetches a movie referenced by a stored entry; a dangling reference is a data defect
pub(crate) async fn load_movie(catalog: &dyn MovieCatalog, movie_id: MovieId) -> AppResult<Movie> {
    let movie = catalog.fetch_movie(movie_id).await?.ok_or_else(|| {
        AppError::DataIntegrity(format!("stored entry references unknown movie {}", movie_id))
    })?;
    movie.validate()?;
    Ok(movie)
}
