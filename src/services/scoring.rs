use std::cmp::Ordering;

use crate::models::{Movie, ScoredMovie};

use super::taste::TasteProfile;

/// Weight of a match on each dominant genre slot, most dominant first
pub const GENRE_WEIGHTS: [f64; 3] = [100.0, 50.0, 20.0];
/// Penalty per year between the candidate and the profile's mean release year
pub const YEAR_DISTANCE_PENALTY: f64 = 0.25;
pub const DIRECTOR_WEIGHT: f64 = 20.0;
/// Bonus per cast slot filled by someone from the profile
pub const CAST_WEIGHT: f64 = 5.0;

/// Affinity of `movie` for the given profile. Unbounded; higher is better.
///
/// Genre slots are independent, so a movie matching a genre that fills
/// several padded slots collects every one of those weights.
pub fn score(profile: &TasteProfile, movie: &Movie) -> f64 {
    let genre_score: f64 = profile
        .dominant_genres
        .iter()
        .zip(GENRE_WEIGHTS)
        .filter(|(genre, _)| movie.has_genre(genre))
        .map(|(_, weight)| weight)
        .sum();

    let year_distance = (f64::from(movie.release_year) - profile.mean_release_year).abs();

    let director_score = if profile.directors.contains(&movie.director) {
        DIRECTOR_WEIGHT
    } else {
        0.0
    };

    let cast_matches = movie
        .cast
        .iter()
        .filter(|member| profile.cast.contains(*member))
        .count();

    genre_score - YEAR_DISTANCE_PENALTY * year_distance
        + director_score
        + CAST_WEIGHT * cast_matches as f64
}

/// Scores every candidate and orders them best first.
///
/// Equal scores keep ascending movie id order so the result is reproducible
/// whatever order the catalog handed the candidates over in.
pub fn rank(profile: &TasteProfile, candidates: Vec<Movie>) -> Vec<ScoredMovie> {
    let mut scored: Vec<ScoredMovie> = candidates
        .into_iter()
        .map(|movie| ScoredMovie {
            score: score(profile, &movie),
            movie,
        })
        .collect();

    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.movie.id.cmp(&b.movie.id))
    });
    scored
}
