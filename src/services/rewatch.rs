use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::{
    error::AppResult,
    models::{Movie, MovieId, RewatchSignal, UserId, WatchRecord},
    services::{
        access::{MovieCatalog, WatchHistory},
        recommendations::load_movie,
    },
};

/// Finds watched movies whose predicted next viewing lies in the past
///
/// For each movie watched at least twice, the gap between its last two
/// viewings is projected forward from the last one. The movie is overdue when
/// that projected date is strictly before `now`. Signals come back most
/// overdue first, ties in ascending movie id order.
pub fn overdue_signals(records: &[WatchRecord], now: DateTime<Utc>) -> Vec<RewatchSignal> {
    let mut timelines: BTreeMap<MovieId, Vec<DateTime<Utc>>> = BTreeMap::new();
    for record in records {
        timelines
            .entry(record.movie_id)
            .or_default()
            .push(record.watched_at);
    }

    let mut signals: Vec<RewatchSignal> = timelines
        .into_iter()
        .filter_map(|(movie_id, mut watched)| {
            watched.sort_unstable();
            let [.., previous, last] = watched[..] else {
                return None;
            };
            // A projection past the representable range is never before `now`
            let predicted = last.checked_add_signed(last - previous)?;
            (predicted < now).then(|| RewatchSignal {
                movie_id,
                overdue_by: now - predicted,
            })
        })
        .collect();

    signals.sort_by(|a, b| {
        b.overdue_by
            .cmp(&a.overdue_by)
            .then(a.movie_id.cmp(&b.movie_id))
    });
    signals
}

/// Movies the user is due to watch again, most overdue first
pub async fn due_for_rewatch(
    catalog: &dyn MovieCatalog,
    history: &dyn WatchHistory,
    user_id: UserId,
    now: DateTime<Utc>,
) -> AppResult<Vec<Movie>> {
    let records = history.fetch_full_history(user_id).await?;
    if records.is_empty() {
        return Ok(vec![]);
    }

    let signals = overdue_signals(&records, now);

    let mut movies = Vec::with_capacity(signals.len());
    for signal in &signals {
        tracing::trace!(
            user_id,
            movie_id = signal.movie_id,
            overdue_hours = signal.overdue_by.num_hours(),
            "Movie overdue for rewatch"
        );
        movies.push(load_movie(catalog, signal.movie_id).await?);
    }

    tracing::info!(
        user_id,
        record_count = records.len(),
        result_count = movies.len(),
        "Rewatch candidates computed"
    );

    Ok(movies)
}
