use serde::{Deserialize, Serialize};

use super::{GenreId, MovieId, MovieSummary};

pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_MIN_RATING: f64 = 6.5;
pub const DEFAULT_MIN_VOTE_COUNT: u32 = 100;

/// Tuning knobs for a recommendation request
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RecommendationOptions {
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default = "default_min_rating")]
    pub min_rating: f64,
    #[serde(default = "default_min_vote_count")]
    pub min_vote_count: u32,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_min_rating() -> f64 {
    DEFAULT_MIN_RATING
}

fn default_min_vote_count() -> u32 {
    DEFAULT_MIN_VOTE_COUNT
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            min_rating: DEFAULT_MIN_RATING,
            min_vote_count: DEFAULT_MIN_VOTE_COUNT,
        }
    }
}

/// A ranked suggestion returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: f64,
    pub vote_count: u32,
    pub release_date: Option<String>,
    pub genre_ids: Vec<GenreId>,
    /// Why this movie was picked; never empty
    pub reason: String,
}

impl Recommendation {
    pub fn from_summary(movie: MovieSummary, reason: String) -> Self {
        Self {
            id: movie.id,
            title: movie.title,
            overview: movie.overview,
            poster_path: movie.poster_path,
            backdrop_path: movie.backdrop_path,
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            release_date: movie.release_date,
            genre_ids: movie.genre_ids,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults_from_empty_query() {
        let options: RecommendationOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, RecommendationOptions::default());
        assert_eq!(options.limit, 10);
        assert_eq!(options.min_rating, 6.5);
        assert_eq!(options.min_vote_count, 100);
    }

    #[test]
    fn test_options_partial_override() {
        let options: RecommendationOptions = serde_json::from_str(r#"{"limit": 3}"#).unwrap();
        assert_eq!(options.limit, 3);
        assert_eq!(options.min_rating, DEFAULT_MIN_RATING);
    }
}
