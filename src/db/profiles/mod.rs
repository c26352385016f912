/// User profile persistence
///
/// Profiles are stored whole: every mutation reads the profile, changes it, and
/// writes it back. There is no optimistic-concurrency check, so two concurrent
/// writers for the same user can lose an update (last write wins).

use std::sync::Arc;

use crate::{
    config::{Config, ProfileBackend},
    error::{AppError, AppResult},
    models::{validate_rating, MovieId, UserPreferences, UserProfile, UserSummary, WatchedMovie},
};

pub mod file;
pub mod memory;
pub mod redis;

pub use file::FileProfileStore;
pub use memory::InMemoryProfileStore;
pub use redis::RedisProfileStore;

/// Storage for per-user profiles and the user roster
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Loads a profile, creating and storing an empty one for unknown identities
    async fn get_profile(&self, user_id: &str) -> AppResult<UserProfile>;

    /// Replaces the stored profile
    async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> AppResult<()>;

    /// Registered users, in roster order
    async fn list_users(&self) -> AppResult<Vec<UserSummary>>;

    /// Adds a user to the roster, or renames an existing one
    async fn register_user(&self, user: &UserSummary) -> AppResult<()>;

    /// Appends a watch entry to the user's history
    async fn append_watched(&self, user_id: &str, movie: WatchedMovie) -> AppResult<()> {
        validate_rating(movie.rating)?;
        let mut profile = self.get_profile(user_id).await?;
        profile.add_watched(movie);
        self.save_profile(user_id, &profile).await
    }

    /// Changes the rating of a watched movie; does nothing if the movie is not in the history
    async fn update_rating(&self, user_id: &str, movie_id: MovieId, rating: u8) -> AppResult<()> {
        validate_rating(rating)?;
        let mut profile = self.get_profile(user_id).await?;
        if profile.update_rating(movie_id, rating) {
            self.save_profile(user_id, &profile).await
        } else {
            tracing::debug!(user_id, movie_id, "Rating update for unwatched movie ignored");
            Ok(())
        }
    }

    /// Replaces the user's explicit preferences
    async fn set_preferences(&self, user_id: &str, preferences: UserPreferences) -> AppResult<()> {
        let mut profile = self.get_profile(user_id).await?;
        profile.preferences = preferences;
        self.save_profile(user_id, &profile).await
    }

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Restricts user ids to characters that are safe in file names and Redis keys
pub(crate) fn validate_user_id(user_id: &str) -> AppResult<()> {
    let valid = !user_id.is_empty()
        && user_id.len() <= 64
        && user_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!("Invalid user id: {:?}", user_id)))
    }
}

/// Builds the configured profile store and seeds it with the configured roster
pub async fn build_profile_store(
    config: &Config,
    redis_client: ::redis::Client,
) -> AppResult<Arc<dyn ProfileStore>> {
    let store: Arc<dyn ProfileStore> = match config.profile_backend {
        ProfileBackend::Memory => Arc::new(InMemoryProfileStore::new()),
        ProfileBackend::File => Arc::new(FileProfileStore::open(&config.profile_dir).await?),
        ProfileBackend::Redis => Arc::new(RedisProfileStore::new(redis_client)),
    };

    let roster = config.user_roster();
    for user in &roster {
        store.register_user(user).await?;
    }

    tracing::info!(
        backend = store.name(),
        users = roster.len(),
        "Profile store ready"
    );

    Ok(store)
}
