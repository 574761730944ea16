use std::collections::{HashMap, HashSet};

use crate::{
    error::{AppError, AppResult},
    models::Movie,
};

/// Number of dominant genres kept in a profile
pub const DOMINANT_GENRES: usize = 3;

/// Aggregate of what a user has been watching lately
///
/// Built fresh from the recency window on every request and never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct TasteProfile {
    /// Most frequent genres, padded by repeating the last distinct one
    pub dominant_genres: [String; DOMINANT_GENRES],
    pub mean_release_year: f64,
    pub directors: HashSet<String>,
    pub cast: HashSet<String>,
}

impl TasteProfile {
    /// Builds a profile from the recency window, newest movie first.
    ///
    /// Returns `Ok(None)` for an empty window. A non-empty window without a
    /// single genre is a catalog defect and yields `DataIntegrity`.
    pub fn from_window(window: &[Movie]) -> AppResult<Option<Self>> {
        if window.is_empty() {
            return Ok(None);
        }

        let ranked = rank_by_frequency(window.iter().flat_map(|m| m.genres.iter()));
        let dominant_genres = pad_dominant(ranked).ok_or_else(|| {
            AppError::DataIntegrity("recency window contains no genres".to_string())
        })?;

        let year_sum: f64 = window.iter().map(|m| f64::from(m.release_year)).sum();
        let mean_release_year = year_sum / window.len() as f64;

        let directors = window.iter().map(|m| m.director.clone()).collect();
        let cast = window
            .iter()
            .flat_map(|m| m.cast.iter().cloned())
            .collect();

        Ok(Some(Self {
            dominant_genres,
            mean_release_year,
            directors,
            cast,
        }))
    }
}

/// Distinct values ordered by count descending, ties by first appearance
fn rank_by_frequency<'a>(values: impl Iterator<Item = &'a String>) -> Vec<&'a String> {
    // value -> (count, first seen index)
    let mut counts: HashMap<&String, (usize, usize)> = HashMap::new();
    for (index, value) in values.enumerate() {
        counts.entry(value).or_insert((0, index)).0 += 1;
    }

    let mut ranked: Vec<(&String, usize, usize)> = counts
        .into_iter()
        .map(|(value, (count, first_seen))| (value, count, first_seen))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.into_iter().map(|(value, _, _)| value).collect()
}

fn pad_dominant(ranked: Vec<&String>) -> Option<[String; DOMINANT_GENRES]> {
    let last = ranked.iter().take(DOMINANT_GENRES).last()?;
    let pick = |i: usize| ranked.get(i).unwrap_or(last).to_string();
    Some([pick(0), pick(1), pick(2)])
}
