/// TMDB v3 catalog client
///
/// Endpoints used:
/// - /genre/movie/list   → genre reference table
/// - /discover/movie     → candidate pools for recommendations
/// - /movie/popular      → popularity fallback
/// - /search/movie       → title search
/// - /movie/{id}         → details page
///
/// Every response goes through the Redis read-through cache.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{
        DiscoverQuery, Genre, MovieDetails, MovieId, MoviePage, TmdbGenreList, TmdbMovieDetails,
        TmdbPage,
    },
    services::catalog::CatalogClient,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

const GENRE_CACHE_TTL: u64 = 86400; // 24 hours
const LIST_CACHE_TTL: u64 = 3600; // 1 hour
const DETAILS_CACHE_TTL: u64 = 86400; // 24 hours

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    cache: Cache,
}

/// Rejects a missing or blank credential before any request is made
pub fn require_api_key(api_key: Option<String>) -> AppResult<String> {
    match api_key {
        Some(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
        _ => Err(AppError::Configuration(
            "TMDB_API_KEY is not set; the movie catalog cannot be queried".to_string(),
        )),
    }
}

/// Pulls `status_message` out of a TMDB error body, falling back to the raw body
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["status_message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

impl TmdbCatalog {
    /// Creates the client, failing with a configuration error when no API key is set
    pub fn new(cache: Cache, api_key: Option<String>, api_url: String) -> AppResult<Self> {
        let api_key = require_api_key(api_key)?;

        Ok(Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// GETs a TMDB endpoint and decodes the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi {
                status: status.as_u16(),
                message: extract_error_message(&body),
            });
        }

        let response_text = response.text().await?;
        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                path = %path,
                response = %response_text,
                "Failed to deserialize TMDB response"
            );
            AppError::Internal(format!("Failed to parse TMDB response: {}", e))
        })
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbCatalog {
    async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        cached!(self.cache, CacheKey::GenreList, GENRE_CACHE_TTL, async move {
            let list: TmdbGenreList = self.get_json("/genre/movie/list", &[]).await?;
            tracing::info!(genres = list.genres.len(), "Genre list fetched");
            Ok::<_, AppError>(list.genres)
        })
    }

    async fn discover(&self, query: &DiscoverQuery) -> AppResult<MoviePage> {
        cached!(
            self.cache,
            CacheKey::discover(query),
            LIST_CACHE_TTL,
            async move {
                let params = [
                    ("with_genres", query.genre_filter()),
                    ("sort_by", query.sort_by.to_string()),
                    ("vote_average.gte", query.min_vote_average.to_string()),
                    ("vote_count.gte", query.min_vote_count.to_string()),
                    ("page", query.page.to_string()),
                    ("include_adult", "false".to_string()),
                ];
                let page: TmdbPage = self.get_json("/discover/movie", &params).await?;
                let page = MoviePage::from(page);

                tracing::info!(
                    genres = %query.genre_filter(),
                    sort_by = %query.sort_by,
                    page = query.page,
                    results = page.results.len(),
                    total_results = page.total_results,
                    "Discover query completed"
                );

                Ok::<_, AppError>(page)
            }
        )
    }

    async fn popular(&self, page: u32) -> AppResult<MoviePage> {
        cached!(self.cache, CacheKey::Popular(page), LIST_CACHE_TTL, async move {
            let raw: TmdbPage = self
                .get_json("/movie/popular", &[("page", page.to_string())])
                .await?;
            let popular = MoviePage::from(raw);
            tracing::info!(page, results = popular.results.len(), "Popular movies fetched");
            Ok::<_, AppError>(popular)
        })
    }

    async fn search_movies(&self, query: &str, page: u32) -> AppResult<MoviePage> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        cached!(
            self.cache,
            CacheKey::MovieSearch {
                query: query.to_string(),
                page,
            },
            LIST_CACHE_TTL,
            async move {
                let params = [
                    ("query", query.trim().to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ];
                let raw: TmdbPage = self.get_json("/search/movie", &params).await?;
                let results = MoviePage::from(raw);

                tracing::info!(
                    query = %query,
                    results = results.results.len(),
                    provider = "tmdb",
                    "Movie search completed"
                );

                Ok::<_, AppError>(results)
            }
        )
    }

    async fn movie_details(&self, movie_id: MovieId) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(movie_id),
            DETAILS_CACHE_TTL,
            async move {
                let path = format!("/movie/{}", movie_id);
                let details: TmdbMovieDetails = match self.get_json(&path, &[]).await {
                    Err(AppError::ExternalApi { status: 404, .. }) => {
                        return Err(AppError::NotFound(format!("Movie {}", movie_id)));
                    }
                    other => other?,
                };
                Ok::<_, AppError>(MovieDetails::from(details))
            }
        )
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
