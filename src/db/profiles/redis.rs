use std::collections::HashMap;

use redis::{AsyncCommands, Client};

use super::{validate_user_id, ProfileStore};
use crate::{
    error::{AppError, AppResult},
    models::{UserProfile, UserSummary},
};

const PROFILE_KEY_PREFIX: &str = "profile:";
const USERS_KEY: &str = "profile-users";

/// Key-value profile store on Redis: one JSON string per user plus a roster hash
#[derive(Clone)]
pub struct RedisProfileStore {
    redis_client: Client,
}

impl RedisProfileStore {
    pub fn new(redis_client: Client) -> Self {
        Self { redis_client }
    }

    fn profile_key(user_id: &str) -> String {
        format!("{}{}", PROFILE_KEY_PREFIX, user_id)
    }
}

#[async_trait::async_trait]
impl ProfileStore for RedisProfileStore {
    async fn get_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        validate_user_id(user_id)?;
        let key = Self::profile_key(user_id);
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let stored: Option<String> = conn.get(&key).await?;

        match stored {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| AppError::Internal(format!("Corrupt profile for {}: {}", user_id, e))),
            None => {
                let profile = UserProfile::new();
                self.save_profile(user_id, &profile).await?;
                tracing::info!(user_id, "Created default profile");
                Ok(profile)
            }
        }
    }

    async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> AppResult<()> {
        validate_user_id(user_id)?;
        let json = serde_json::to_string(profile)
            .map_err(|e| AppError::Internal(format!("Profile serialization error: {}", e)))?;
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.set(Self::profile_key(user_id), json).await?;
        Ok(())
    }

    /// Redis hashes are unordered, so the roster comes back sorted by id
    async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let roster: HashMap<String, String> = conn.hgetall(USERS_KEY).await?;

        let mut users: Vec<UserSummary> = roster
            .into_iter()
            .map(|(id, name)| UserSummary { id, name })
            .collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }

    async fn register_user(&self, user: &UserSummary) -> AppResult<()> {
        validate_user_id(&user.id)?;
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let _: () = conn.hset(USERS_KEY, &user.id, &user.name).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
