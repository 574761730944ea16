use chrono::Duration;
use serde::Serialize;

mod movie;
mod page;
mod watch_record;

pub use movie::{Movie, MovieId, MAX_CAST};
pub use page::{Page, PageRequest, PER_PAGE};
pub use watch_record::{NewWatchRecord, RecordId, UserId, WatchRecord};

/// A recommendation candidate with its affinity score
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredMovie {
    pub movie: Movie,
    pub score: f64,
}

/// A previously watched movie whose predicted next viewing has already passed
///
/// Carries only the movie id; `due_for_rewatch` loads the movie from the
/// catalog once the signals are ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewatchSignal {
    pub movie_id: MovieId,
    /// Time elapsed since the predicted next viewing; larger is more overdue
    pub overdue_by: Duration,
}

/// A title search result with the number of query words found in its title
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    pub movie: Movie,
    pub matched_words: usize,
}
