use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{validate_user_id, ProfileStore};
use crate::{
    error::AppResult,
    models::{UserId, UserProfile, UserSummary},
};

/// Process-local profile store; contents are lost on restart
#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<UserId, UserProfile>>,
    users: RwLock<Vec<UserSummary>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        validate_user_id(user_id)?;

        if let Some(profile) = self.profiles.read().await.get(user_id) {
            return Ok(profile.clone());
        }

        let mut profiles = self.profiles.write().await;
        Ok(profiles.entry(user_id.to_string()).or_default().clone())
    }

    async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> AppResult<()> {
        validate_user_id(user_id)?;
        self.profiles
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(())
    }

    async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        Ok(self.users.read().await.clone())
    }

    async fn register_user(&self, user: &UserSummary) -> AppResult<()> {
        validate_user_id(&user.id)?;
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => existing.name = user.name.clone(),
            None => users.push(user.clone()),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
