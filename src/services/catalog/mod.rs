/// Remote movie catalog abstraction
///
/// The recommendation pipeline only talks to [`CatalogClient`]; the TMDB
/// implementation lives in [`tmdb`]. Failures are returned as-is: callers never
/// retry or degrade on catalog errors.
use crate::{
    error::AppResult,
    models::{DiscoverQuery, Genre, MovieDetails, MovieId, MoviePage},
};

pub mod tmdb;

pub use tmdb::TmdbCatalog;

/// Query interface of the remote movie catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogClient: Send + Sync {
    /// Full genre reference table
    async fn list_genres(&self) -> AppResult<Vec<Genre>>;

    /// Filtered, sorted, paginated movie listing
    async fn discover(&self, query: &DiscoverQuery) -> AppResult<MoviePage>;

    /// Currently popular movies
    async fn popular(&self, page: u32) -> AppResult<MoviePage>;

    /// Keyword / title search. Empty queries are rejected.
    async fn search_movies(&self, query: &str, page: u32) -> AppResult<MoviePage>;

    async fn movie_details(&self, movie_id: MovieId) -> AppResult<MovieDetails>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
