use std::sync::Arc;

use crate::{
    db::ProfileStore,
    error::{AppError, AppResult},
    models::{MovieId, UserId, UserPreferences, UserProfile, UserSummary, WatchedMovie},
};

/// Per-session context: which user's profile subsequent calls read and write
///
/// Each client session owns one of these; nothing about the active user is
/// shared between sessions.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn ProfileStore>,
    active_user: Option<UserId>,
}

impl Session {
    /// A session with no active user yet
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self {
            store,
            active_user: None,
        }
    }

    /// Creates a session and activates `user_id` in one step
    pub async fn for_user(store: Arc<dyn ProfileStore>, user_id: &str) -> AppResult<Self> {
        let mut session = Self::new(store);
        session.set_active_user(user_id).await?;
        Ok(session)
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        self.store.list_users().await
    }

    /// Selects the user; unknown ids fail and leave the current selection as it was
    pub async fn set_active_user(&mut self, user_id: &str) -> AppResult<()> {
        let users = self.store.list_users().await?;
        if !users.iter().any(|u| u.id == user_id) {
            return Err(AppError::UnknownUser(user_id.to_string()));
        }

        self.active_user = Some(user_id.to_string());
        Ok(())
    }

    pub fn active_user(&self) -> AppResult<&str> {
        self.active_user
            .as_deref()
            .ok_or_else(|| AppError::InvalidInput("No active user selected".to_string()))
    }

    pub async fn profile(&self) -> AppResult<UserProfile> {
        self.store.get_profile(self.active_user()?).await
    }

    pub async fn record_watched(&self, movie: WatchedMovie) -> AppResult<()> {
        let user_id = self.active_user()?;
        tracing::info!(user_id, movie_id = movie.movie_id, rating = movie.rating, "Recording watched movie");
        self.store.append_watched(user_id, movie).await
    }

    pub async fn update_rating(&self, movie_id: MovieId, rating: u8) -> AppResult<()> {
        self.store
            .update_rating(self.active_user()?, movie_id, rating)
            .await
    }

    pub async fn set_preferences(&self, preferences: UserPreferences) -> AppResult<()> {
        self.store
            .set_preferences(self.active_user()?, preferences)
            .await
    }
}
