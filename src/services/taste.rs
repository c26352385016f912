/// Taste profile: which genres a user favors
///
/// Combines two signals:
/// - implicit: genres of movies the user rated 8 or higher, one point per occurrence
/// - explicit: the user's chosen favorite genres, +5 each
///
/// A single explicit favorite therefore outweighs up to four highly-rated movies'
/// worth of a competing genre, but repeated strong ratings can still overtake it.
use std::collections::HashMap;

use crate::models::{unique_genres, GenreId, UserPreferences, WatchedMovie};

/// Minimum rating for a watched movie to count as a taste signal
pub const HIGH_RATING_THRESHOLD: u8 = 8;

/// Score added for each explicitly chosen favorite genre
pub const FAVORITE_GENRE_BOOST: u32 = 5;

/// How many genres feed the candidate search
pub const TOP_GENRE_COUNT: usize = 3;

/// Accumulated per-genre affinity
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenreTally {
    scores: HashMap<GenreId, u32>,
}

impl GenreTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one occurrence of a genre
    pub fn increment(&mut self, genre: GenreId) {
        *self.scores.entry(genre).or_insert(0) += 1;
    }

    /// Adds a fixed boost, creating the entry if needed
    pub fn add_boost(&mut self, genre: GenreId, boost: u32) {
        *self.scores.entry(genre).or_insert(0) += boost;
    }

    pub fn score(&self, genre: GenreId) -> u32 {
        self.scores.get(&genre).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Genres by score descending; equal scores order by lower genre id first
    pub fn ranked(&self) -> Vec<(GenreId, u32)> {
        let mut ranked: Vec<(GenreId, u32)> =
            self.scores.iter().map(|(&g, &s)| (g, s)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

/// Builds the tally from watch history and explicit preferences
pub fn build_genre_tally(watch_history: &[WatchedMovie], preferences: &UserPreferences) -> GenreTally {
    let mut tally = GenreTally::new();

    for movie in watch_history
        .iter()
        .filter(|m| m.rating >= HIGH_RATING_THRESHOLD)
    {
        for genre in unique_genres(&movie.genres) {
            tally.increment(genre);
        }
    }

    for genre in unique_genres(&preferences.favorite_genres) {
        tally.add_boost(genre, FAVORITE_GENRE_BOOST);
    }

    tally
}

/// Returns up to three favorite genres, strongest first
///
/// An empty result means there is no taste signal at all and the caller should
/// fall back to popular movies.
pub fn derive_top_genres(
    watch_history: &[WatchedMovie],
    preferences: &UserPreferences,
) -> Vec<GenreId> {
    build_genre_tally(watch_history, preferences)
        .ranked()
        .into_iter()
        .take(TOP_GENRE_COUNT)
        .map(|(genre, _)| genre)
        .collect()
}
