use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::{
    error::AppResult,
    models::{Movie, SearchHit},
    services::access::MovieCatalog,
};

static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9 ]+").expect("valid non-word regex"));
static FILLER_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:the|a|and)+$").expect("valid filler word regex"));

/// Decomposes accented letters and keeps only their ASCII base
pub fn unaccent(text: &str) -> String {
    text.nfd().filter(char::is_ascii).collect()
}

/// Lowercase query words with punctuation and filler words ("the", "a",
/// "and") removed. Repeated words are kept.
pub fn query_words(query: &str) -> Vec<String> {
    let unaccented = unaccent(query);
    NON_WORD_RE
        .replace_all(&unaccented, " ")
        .to_lowercase()
        .split_whitespace()
        .filter(|word| !FILLER_WORD_RE.is_match(word))
        .map(str::to_string)
        .collect()
}

/// Number of query words found anywhere in the movie's unaccented title
pub fn matched_words(words: &[String], movie: &Movie) -> usize {
    let title = unaccent(&movie.name).to_lowercase();
    words
        .iter()
        .filter(|word| title.contains(word.as_str()))
        .count()
}

/// Ranks `movies` by matched query words, most first, ties by ascending id.
/// Movies matching no word are left out.
pub fn rank_matches(words: &[String], movies: Vec<Movie>) -> Vec<SearchHit> {
    let mut hits: Vec<SearchHit> = movies
        .into_iter()
        .filter_map(|movie| {
            let matched_words = matched_words(words, &movie);
            (matched_words > 0).then_some(SearchHit {
                movie,
                matched_words,
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.matched_words
            .cmp(&a.matched_words)
            .then(a.movie.id.cmp(&b.movie.id))
    });
    hits
}

/// Title search over the whole catalog
pub async fn search_titles(catalog: &dyn MovieCatalog, query: &str) -> AppResult<Vec<SearchHit>> {
    let words = query_words(query);
    if words.is_empty() {
        tracing::debug!(query, "Search query has no searchable words");
        return Ok(vec![]);
    }

    let movies = catalog.fetch_all_movies(&HashSet::new()).await?;
    let candidates = movies.len();
    let hits = rank_matches(&words, movies);

    tracing::info!(
        words = words.len(),
        candidates,
        result_count = hits.len(),
        "Title search completed"
    );

    Ok(hits)
}
