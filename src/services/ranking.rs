/// Candidate scoring, ranking and explanation
///
/// ```text
/// score = vote_average
///       + 0.5 * |candidate genres ∩ top genres|
///       + 0.1 * log10(popularity + 1)
/// ```
///
/// Quality anchors the score; genre overlap is a small nudge and popularity a
/// log-damped bonus so blockbusters cannot drown out well-rated titles.
use std::collections::{HashMap, HashSet};

use crate::models::{unique_genres, Genre, GenreId, MovieId, MovieSummary};

pub const GENRE_MATCH_WEIGHT: f64 = 0.5;
pub const POPULARITY_WEIGHT: f64 = 0.1;

/// Matched genres named in a reason
const MAX_REASON_GENRES: usize = 2;

/// Genre id → display name lookup, built once per request
#[derive(Debug, Clone, Default)]
pub struct GenreNames {
    names: HashMap<GenreId, String>,
}

impl GenreNames {
    pub fn new(genres: &[Genre]) -> Self {
        Self {
            names: genres.iter().map(|g| (g.id, g.name.clone())).collect(),
        }
    }

    pub fn get(&self, id: GenreId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }
}

/// Number of the candidate's genres that are among the top genres
pub fn genre_overlap(movie: &MovieSummary, top_genres: &[GenreId]) -> usize {
    unique_genres(&movie.genre_ids)
        .iter()
        .filter(|g| top_genres.contains(g))
        .count()
}

pub fn score(movie: &MovieSummary, top_genres: &[GenreId]) -> f64 {
    movie.vote_average
        + GENRE_MATCH_WEIGHT * genre_overlap(movie, top_genres) as f64
        + POPULARITY_WEIGHT * (movie.popularity.max(0.0) + 1.0).log10()
}

/// Drops watched movies, scores the rest, and returns the best `limit`
///
/// The sort is stable: equal scores keep their candidate order.
pub fn score_and_rank(
    candidates: Vec<MovieSummary>,
    top_genres: &[GenreId],
    watched_ids: &HashSet<MovieId>,
    limit: usize,
) -> Vec<(MovieSummary, f64)> {
    let mut scored: Vec<(MovieSummary, f64)> = candidates
        .into_iter()
        .filter(|movie| !watched_ids.contains(&movie.id))
        .map(|movie| {
            let s = score(&movie, top_genres);
            (movie, s)
        })
        .collect();

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(limit);
    scored
}

/// Explains a pick from its overlap with the user's top genres
pub fn build_reason(movie: &MovieSummary, top_genres: &[GenreId], names: &GenreNames) -> String {
    let matched: Vec<&str> = unique_genres(&movie.genre_ids)
        .iter()
        .filter(|g| top_genres.contains(g))
        .filter_map(|&g| names.get(g))
        .take(MAX_REASON_GENRES)
        .collect();

    if matched.is_empty() {
        let first = movie
            .genre_ids
            .first()
            .and_then(|&g| names.get(g))
            .unwrap_or("movie");
        format!("Highly rated {}", first)
    } else {
        format!("Matches your favorite genres: {}", matched.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: MovieId, vote_average: f64, genre_ids: Vec<GenreId>, popularity: f64) -> MovieSummary {
        MovieSummary {
            id,
            title: format!("Movie {}", id),
            overview: String::new(),
            genre_ids,
            release_date: None,
            vote_average,
            vote_count: 1000,
            popularity,
            poster_path: None,
            backdrop_path: None,
        }
    }

    fn names() -> GenreNames {
        GenreNames::new(&[
            Genre { id: 28, name: "Action".to_string() },
            Genre { id: 12, name: "Adventure".to_string() },
            Genre { id: 18, name: "Drama".to_string() },
            Genre { id: 53, name: "Thriller".to_string() },
            Genre { id: 878, name: "Science Fiction".to_string() },
        ])
    }

    #[test]
    fn test_score_concrete_example() {
        let candidate = movie(1, 8.0, vec![28, 12], 50.0);
        let s = score(&candidate, &[28, 878, 53]);
        let expected = 8.0 + 0.5 + 0.1 * 51f64.log10();
        assert!((s - expected).abs() < 1e-9);
        assert!((s - 8.67).abs() < 0.01);
    }

    #[test]
    fn test_score_monotonic_in_vote_average() {
        let top = [28, 18];
        for pair in [(5.0, 5.1), (6.9, 7.0), (8.0, 9.5)] {
            let low = score(&movie(1, pair.0, vec![28], 30.0), &top);
            let high = score(&movie(1, pair.1, vec![28], 30.0), &top);
            assert!(high > low);
        }
    }

    #[test]
    fn test_zero_popularity_adds_nothing() {
        let s = score(&movie(1, 7.0, vec![], 0.0), &[28]);
        assert_eq!(s, 7.0);
    }

    #[test]
    fn test_watched_movies_are_dropped() {
        let candidates = vec![movie(1, 9.0, vec![28], 10.0), movie(2, 7.0, vec![28], 10.0)];
        let watched: HashSet<MovieId> = [1].into_iter().collect();
        let ranked = score_and_rank(candidates, &[28], &watched, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].0.id, 2);
    }

    #[test]
    fn test_sorted_descending_and_truncated() {
        let candidates = vec![
            movie(1, 6.0, vec![], 0.0),
            movie(2, 9.0, vec![], 0.0),
            movie(3, 7.5, vec![], 0.0),
            movie(4, 8.0, vec![], 0.0),
        ];
        let ranked = score_and_rank(candidates, &[], &HashSet::new(), 3);
        let ids: Vec<MovieId> = ranked.iter().map(|(m, _)| m.id).collect();
        assert_eq!(ids, vec![2, 4, 3]);
    }

    #[test]
    fn test_genre_overlap_can_lift_lower_rating() {
        // 7.8 + 0.5*2 = 8.8 beats 8.5 with no overlap
        let candidates = vec![movie(1, 8.5, vec![99], 0.0), movie(2, 7.8, vec![28, 878], 0.0)];
        let ranked = score_and_rank(candidates, &[28, 878, 53], &HashSet::new(), 10);
        assert_eq!(ranked[0].0.id, 2);
    }

    #[test]
    fn test_equal_scores_keep_candidate_order() {
        let candidates = vec![
            movie(5, 7.0, vec![28], 20.0),
            movie(3, 7.0, vec![28], 20.0),
            movie(9, 7.0, vec![28], 20.0),
        ];
        let ranked = score_and_rank(candidates, &[28], &HashSet::new(), 10);
        let ids: Vec<MovieId> = ranked.iter().map(|(m, _)| m.id).collect();
        assert_eq!(ids, vec![5, 3, 9]);
    }

    #[test]
    fn test_limit_larger_than_pool() {
        let candidates = vec![movie(1, 7.0, vec![], 1.0), movie(2, 6.0, vec![], 1.0)];
        assert_eq!(score_and_rank(candidates, &[], &HashSet::new(), 10).len(), 2);
    }

    #[test]
    fn test_limit_zero_returns_nothing() {
        let candidates = vec![movie(1, 7.0, vec![], 1.0)];
        assert!(score_and_rank(candidates, &[], &HashSet::new(), 0).is_empty());
    }

    #[test]
    fn test_reason_single_match() {
        let candidate = movie(1, 8.0, vec![18, 10749], 5.0);
        assert_eq!(
            build_reason(&candidate, &[18, 28], &names()),
            "Matches your favorite genres: Drama"
        );
    }

    #[test]
    fn test_reason_lists_at_most_two_matches() {
        let candidate = movie(1, 8.0, vec![878, 28, 53], 5.0);
        assert_eq!(
            build_reason(&candidate, &[28, 878, 53], &names()),
            "Matches your favorite genres: Science Fiction, Action"
        );
    }

    #[test]
    fn test_reason_without_overlap_uses_first_genre() {
        let candidate = movie(1, 8.0, vec![12, 18], 5.0);
        assert_eq!(build_reason(&candidate, &[28], &names()), "Highly rated Adventure");
    }

    #[test]
    fn test_reason_without_known_genres() {
        let candidate = movie(1, 8.0, vec![], 5.0);
        assert_eq!(build_reason(&candidate, &[28], &names()), "Highly rated movie");

        let unknown = movie(2, 8.0, vec![4242], 5.0);
        assert_eq!(build_reason(&unknown, &[28], &names()), "Highly rated movie");
    }

    #[test]
    fn test_repeated_candidate_genres_count_once() {
        let candidate = movie(7, 7.0, vec![28, 28], 0.0);
        assert_eq!(genre_overlap(&candidate, &[28]), 1);
        assert!((score(&candidate, &[28]) - 7.5).abs() < 1e-9);
        assert_eq!(
            build_reason(&candidate, &[28], &names()),
            "Matches your favorite genres: Action"
        );
    }
}
