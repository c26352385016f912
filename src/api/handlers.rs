use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppResult,
    middleware::request_id::RequestId,
    models::{
        Genre, GenreId, MovieDetails, MovieId, MoviePage, Recommendation, RecommendationOptions,
        UserPreferences, UserProfile, UserSummary, WatchedMovie,
    },
    services::{ImageUrls, Session},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct AddWatchedRequest {
    pub movie_id: MovieId,
    pub title: String,
    pub rating: u8,
    /// Defaults to today
    pub watched_at: Option<NaiveDate>,
    #[serde(default)]
    pub genres: Vec<GenreId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRatingRequest {
    pub rating: u8,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub page: Option<u32>,
}

/// Recommendation plus ready-to-use image URLs
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

impl RecommendationResponse {
    fn new(recommendation: Recommendation, images: &ImageUrls) -> Self {
        let poster_url = images.poster_url(recommendation.poster_path.as_deref(), None);
        let backdrop_url = images.backdrop_url(recommendation.backdrop_path.as_deref(), None);
        Self {
            recommendation,
            poster_url,
            backdrop_url,
        }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Registered users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserSummary>>> {
    Ok(Json(state.profiles.list_users().await?))
}

pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserProfile>> {
    let session = Session::for_user(state.profiles.clone(), &user_id).await?;
    Ok(Json(session.profile().await?))
}

pub async fn set_preferences(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(preferences): Json<UserPreferences>,
) -> AppResult<StatusCode> {
    let session = Session::for_user(state.profiles.clone(), &user_id).await?;
    session.set_preferences(preferences).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Marks a movie as watched
pub async fn add_watched(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(request): Json<AddWatchedRequest>,
) -> AppResult<StatusCode> {
    let session = Session::for_user(state.profiles.clone(), &user_id).await?;
    session
        .record_watched(WatchedMovie {
            movie_id: request.movie_id,
            title: request.title,
            rating: request.rating,
            watched_at: request
                .watched_at
                .unwrap_or_else(|| Utc::now().date_naive()),
            genres: request.genres,
        })
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn update_rating(
    State(state): State<AppState>,
    Path((user_id, movie_id)): Path<(String, MovieId)>,
    Json(request): Json<UpdateRatingRequest>,
) -> AppResult<StatusCode> {
    let session = Session::for_user(state.profiles.clone(), &user_id).await?;
    session.update_rating(movie_id, request.rating).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Personalized recommendations for a user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
    Query(options): Query<RecommendationOptions>,
) -> AppResult<Json<Vec<RecommendationResponse>>> {
    tracing::info!(
        request_id = %request_id,
        user_id = %user_id,
        limit = options.limit,
        "Processing recommendation request"
    );

    let session = Session::for_user(state.profiles.clone(), &user_id).await?;
    let recommendations = state.engine.get_recommendations(&session, options).await?;

    let response = recommendations
        .into_iter()
        .map(|r| RecommendationResponse::new(r, &state.images))
        .collect();

    Ok(Json(response))
}

pub async fn list_genres(State(state): State<AppState>) -> AppResult<Json<Vec<Genre>>> {
    Ok(Json(state.engine.catalog().list_genres().await?))
}

pub async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<MoviePage>> {
    let page = params.page.unwrap_or(1).max(1);
    Ok(Json(
        state
            .engine
            .catalog()
            .search_movies(&params.q, page)
            .await?,
    ))
}

pub async fn movie_details(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<MovieDetails>> {
    Ok(Json(state.engine.catalog().movie_details(movie_id).await?))
}
