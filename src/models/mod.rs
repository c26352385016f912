use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Display;

pub mod profile;
pub mod recommendation;

pub use profile::{
    validate_rating, UserId, UserPreferences, UserProfile, UserSummary, WatchedMovie,
};
pub use recommendation::{Recommendation, RecommendationOptions};

/// Catalog-wide genre identifier (e.g. 28 = Action)
pub type GenreId = u32;

/// Catalog movie identifier
pub type MovieId = u64;

/// Genre lists are sets: keeps first occurrences in order and drops repeats
pub fn unique_genres(ids: &[GenreId]) -> Vec<GenreId> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Catalog genre reference entry, used only for display text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
}

/// Movie summary as returned by discover, popular and search queries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub genre_ids: Vec<GenreId>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub vote_count: u32,
    pub popularity: f64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// One page of movie summaries
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    pub page: u32,
    pub results: Vec<MovieSummary>,
    pub total_results: u32,
    pub total_pages: u32,
}

/// Full movie record from the details endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub id: MovieId,
    pub title: String,
    pub overview: String,
    pub genres: Vec<Genre>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub vote_average: f64,
    pub vote_count: u32,
    pub popularity: f64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

/// Sort orders accepted by the discover endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortBy {
    VoteAverageDesc,
    PopularityDesc,
    ReleaseDateDesc,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::VoteAverageDesc => "vote_average.desc",
            SortBy::PopularityDesc => "popularity.desc",
            SortBy::ReleaseDateDesc => "primary_release_date.desc",
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameterized discover query: genre filter, rating and vote floors, sort order, page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverQuery {
    pub genre_ids: Vec<GenreId>,
    pub sort_by: SortBy,
    pub min_vote_average: f64,
    pub min_vote_count: u32,
    pub page: u32,
}

impl DiscoverQuery {
    /// Comma-joined genre list, as the catalog expects it
    pub fn genre_filter(&self) -> String {
        self.genre_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw movie entry from TMDB list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// TMDB sends "" for unknown release dates
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<TmdbMovie> for MovieSummary {
    fn from(movie: TmdbMovie) -> Self {
        MovieSummary {
            id: movie.id,
            title: movie.title,
            overview: movie.overview.unwrap_or_default(),
            genre_ids: movie.genre_ids,
            release_date: non_empty(movie.release_date),
            vote_average: movie.vote_average,
            vote_count: movie.vote_count,
            popularity: movie.popularity,
            poster_path: non_empty(movie.poster_path),
            backdrop_path: non_empty(movie.backdrop_path),
        }
    }
}

/// Raw paginated response from TMDB list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_results: u32,
    #[serde(default)]
    pub total_pages: u32,
}

fn first_page() -> u32 {
    1
}

impl From<TmdbPage> for MoviePage {
    fn from(page: TmdbPage) -> Self {
        MoviePage {
            page: page.page,
            results: page.results.into_iter().map(MovieSummary::from).collect(),
            total_results: page.total_results,
            total_pages: page.total_pages,
        }
    }
}

/// Response from GET /genre/movie/list
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenreList {
    pub genres: Vec<Genre>,
}

/// Response from GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u32,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

impl From<TmdbMovieDetails> for MovieDetails {
    fn from(details: TmdbMovieDetails) -> Self {
        MovieDetails {
            id: details.id,
            title: details.title,
            overview: details.overview.unwrap_or_default(),
            genres: details.genres,
            release_date: non_empty(details.release_date),
            runtime: details.runtime.filter(|&minutes| minutes > 0),
            tagline: non_empty(details.tagline),
            vote_average: details.vote_average,
            vote_count: details.vote_count,
            popularity: details.popularity,
            poster_path: non_empty(details.poster_path),
            backdrop_path: non_empty(details.backdrop_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_genres_keeps_first_order() {
        assert_eq!(unique_genres(&[878, 28, 878, 28, 18]), vec![878, 28, 18]);
        assert!(unique_genres(&[]).is_empty());
    }

    #[test]
    fn test_sort_by_wire_names() {
        assert_eq!(SortBy::VoteAverageDesc.as_str(), "vote_average.desc");
        assert_eq!(SortBy::PopularityDesc.as_str(), "popularity.desc");
        assert_eq!(format!("{}", SortBy::PopularityDesc), "popularity.desc");
    }

    #[test]
    fn test_genre_filter_is_comma_joined() {
        let query = DiscoverQuery {
            genre_ids: vec![28, 878, 53],
            sort_by: SortBy::VoteAverageDesc,
            min_vote_average: 6.5,
            min_vote_count: 100,
            page: 1,
        };
        assert_eq!(query.genre_filter(), "28,878,53");
    }

    #[test]
    fn test_tmdb_page_deserialization() {
        let json = r#"{
            "page": 2,
            "results": [{
                "id": 603,
                "title": "The Matrix",
                "overview": "Set in the 22nd century...",
                "genre_ids": [28, 878],
                "release_date": "1999-03-30",
                "vote_average": 8.2,
                "vote_count": 24000,
                "popularity": 85.4,
                "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
                "backdrop_path": null
            }],
            "total_results": 1,
            "total_pages": 1
        }"#;

        let page: MoviePage = serde_json::from_str::<TmdbPage>(json).unwrap().into();
        assert_eq!(page.page, 2);
        assert_eq!(page.results.len(), 1);

        let movie = &page.results[0];
        assert_eq!(movie.id, 603);
        assert_eq!(movie.genre_ids, vec![28, 878]);
        assert_eq!(movie.release_date.as_deref(), Some("1999-03-30"));
        assert_eq!(movie.backdrop_path, None);
    }

    #[test]
    fn test_tmdb_movie_blank_fields_become_none() {
        let json = r#"{"id": 1, "title": "Untitled", "release_date": "", "overview": null}"#;
        let movie: MovieSummary = serde_json::from_str::<TmdbMovie>(json).unwrap().into();
        assert_eq!(movie.release_date, None);
        assert_eq!(movie.overview, "");
        assert!(movie.genre_ids.is_empty());
        assert_eq!(movie.vote_count, 0);
    }

    #[test]
    fn test_tmdb_details_conversion() {
        let json = r#"{
            "id": 27205,
            "title": "Inception",
            "overview": "Cobb, a skilled thief...",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "release_date": "2010-07-15",
            "runtime": 148,
            "tagline": "",
            "vote_average": 8.4,
            "vote_count": 35000,
            "popularity": 90.1
        }"#;

        let details: MovieDetails = serde_json::from_str::<TmdbMovieDetails>(json)
            .unwrap()
            .into();
        assert_eq!(details.genres.len(), 2);
        assert_eq!(details.genres[1].name, "Science Fiction");
        assert_eq!(details.runtime, Some(148));
        assert_eq!(details.tagline, None);
        assert_eq!(details.poster_path, None);
    }
}
