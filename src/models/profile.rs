use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::{GenreId, MovieId};
use crate::error::{AppError, AppResult};

/// User identity key used by the profile store
pub type UserId = String;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// Rejects ratings outside the 1–10 scale
pub fn validate_rating(rating: u8) -> AppResult<()> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "Rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )))
    }
}

/// A movie the user has marked as watched, with their rating
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedMovie {
    pub movie_id: MovieId,
    pub title: String,
    /// 1–10
    pub rating: u8,
    pub watched_at: NaiveDate,
    pub genres: Vec<GenreId>,
}

/// Explicit taste settings, independent of watch history
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserPreferences {
    /// Favorite genres in the order the user picked them
    #[serde(default)]
    pub favorite_genres: Vec<GenreId>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Everything the profile store keeps for one user
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default)]
    pub watch_history: Vec<WatchedMovie>,
}

impl UserProfile {
    /// Creates an empty profile
    pub fn new() -> Self {
        Self::default()
    }

    /// IDs of every watched movie
    pub fn watched_ids(&self) -> HashSet<MovieId> {
        self.watch_history.iter().map(|w| w.movie_id).collect()
    }

    /// Appends a watch entry
    pub fn add_watched(&mut self, movie: WatchedMovie) {
        self.watch_history.push(movie);
    }

    /// Updates the rating of a watched movie
    ///
    /// Returns false when the movie is not in the history; the profile is left untouched.
    pub fn update_rating(&mut self, movie_id: MovieId, rating: u8) -> bool {
        match self
            .watch_history
            .iter_mut()
            .find(|w| w.movie_id == movie_id)
        {
            Some(entry) => {
                entry.rating = rating;
                true
            }
            None => false,
        }
    }
}

/// Roster entry for a registered user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
}
