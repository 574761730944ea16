use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Catalog identifier of a movie
pub type MovieId = i64;

/// Number of billed cast slots carried per movie
pub const MAX_CAST: usize = 4;

/// A catalog movie as seen by the recommendation and rewatch logic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    pub name: String,
    pub genres: Vec<String>,
    pub release_year: i32,
    pub director: String,
    /// Billed cast in billing order, at most `MAX_CAST` slots
    pub cast: Vec<String>,
}

impl Movie {
    /// Checks the fields the taste profile and scoring depend on.
    ///
    /// The catalog is expected to hand out well-formed records; anything else is
    /// reported as `DataIntegrity` and never repaired here.
    pub fn validate(&self) -> AppResult<()> {
        if self.genres.is_empty() || self.genres.iter().any(|g| g.trim().is_empty()) {
            return Err(AppError::DataIntegrity(format!(
                "movie {} has missing or blank genres",
                self.id
            )));
        }
        if self.cast.len() > MAX_CAST {
            return Err(AppError::DataIntegrity(format!(
                "movie {} has {} cast slots, expected at most {}",
                self.id,
                self.cast.len(),
                MAX_CAST
            )));
        }
        Ok(())
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}
