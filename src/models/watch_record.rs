use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::MovieId;

/// Identifier of a user; supplied explicitly by the caller on every operation
pub type UserId = i64;

/// Identifier of a single watch record
pub type RecordId = i64;

/// One viewing of a movie by a user. A user may hold several records for the same movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchRecord {
    pub id: RecordId,
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub watched_at: DateTime<Utc>,
}

/// Request body for logging a viewing
#[derive(Debug, Deserialize)]
pub struct NewWatchRecord {
    pub movie_id: MovieId,
    pub watched_at: DateTime<Utc>,
}
