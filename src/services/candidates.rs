use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{DiscoverQuery, GenreId, MovieSummary, SortBy},
    services::catalog::CatalogClient,
};

/// Discover passes issued per request: (sort order, page)
///
/// The first pass favors the best-rated titles, the second widens the pool with
/// currently popular ones. Page 2 of the popularity listing avoids re-fetching
/// what the top-rated page most likely already holds.
pub const DISCOVER_PLAN: [(SortBy, u32); 2] =
    [(SortBy::VoteAverageDesc, 1), (SortBy::PopularityDesc, 2)];

/// Fetches the candidate pool for the given genres
///
/// Both discover queries run concurrently and share the genre filter and floors.
/// Any catalog failure fails the whole call.
pub async fn gather_candidates(
    catalog: &dyn CatalogClient,
    top_genres: &[GenreId],
    min_rating: f64,
    min_vote_count: u32,
) -> AppResult<Vec<MovieSummary>> {
    let [best_rated, popular] = DISCOVER_PLAN.map(|(sort_by, page)| DiscoverQuery {
        genre_ids: top_genres.to_vec(),
        sort_by,
        min_vote_average: min_rating,
        min_vote_count,
        page,
    });

    let (best_rated_page, popular_page) =
        tokio::try_join!(catalog.discover(&best_rated), catalog.discover(&popular))?;

    let fetched = best_rated_page.results.len() + popular_page.results.len();
    let candidates = dedup_by_id(
        best_rated_page
            .results
            .into_iter()
            .chain(popular_page.results),
    );

    tracing::debug!(
        fetched,
        unique = candidates.len(),
        "Candidate pool gathered"
    );

    Ok(candidates)
}

/// Keeps the first occurrence of each movie id, preserving order
pub fn dedup_by_id(movies: impl IntoIterator<Item = MovieSummary>) -> Vec<MovieSummary> {
    let mut seen = HashSet::new();
    movies
        .into_iter()
        .filter(|movie| seen.insert(movie.id))
        .collect()
}
