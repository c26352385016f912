use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

use super::{validate_user_id, ProfileStore};
use crate::{
    error::{AppError, AppResult},
    models::{UserProfile, UserSummary},
};

const USERS_FILE: &str = "users.json";

/// Profile store that keeps one JSON file per user inside a directory
///
/// Layout: `<dir>/users.json` holds the roster, `<dir>/<user_id>.json` each profile.
pub struct FileProfileStore {
    dir: PathBuf,
}

impl FileProfileStore {
    /// Opens (and creates if needed) the storage directory
    pub async fn open(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;
        tracing::debug!(dir = %dir.display(), "Opened file profile store");
        Ok(Self { dir })
    }

    fn profile_path(&self, user_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", user_id))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> AppResult<Option<T>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let value = serde_json::from_slice(&bytes).map_err(|e| {
                    AppError::Internal(format!("Corrupt profile file {}: {}", path.display(), e))
                })?;
                Ok(Some(value))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes through a temp file and rename so readers never see a partial file
    ///
    /// Each write gets its own temp name; concurrent writers of one file race on the
    /// rename and the last one wins.
    async fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| AppError::Internal(format!("Profile serialization error: {}", e)))?;
        let tmp = path.with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProfileStore for FileProfileStore {
    async fn get_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        validate_user_id(user_id)?;
        let path = self.profile_path(user_id);

        match Self::read_json(&path).await? {
            Some(profile) => Ok(profile),
            None => {
                let profile = UserProfile::new();
                Self::write_json(&path, &profile).await?;
                tracing::info!(user_id, "Created default profile");
                Ok(profile)
            }
        }
    }

    async fn save_profile(&self, user_id: &str, profile: &UserProfile) -> AppResult<()> {
        validate_user_id(user_id)?;
        Self::write_json(&self.profile_path(user_id), profile).await
    }

    async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        Ok(Self::read_json(&self.dir.join(USERS_FILE))
            .await?
            .unwrap_or_default())
    }

    async fn register_user(&self, user: &UserSummary) -> AppResult<()> {
        validate_user_id(&user.id)?;
        let mut users = self.list_users().await?;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => existing.name = user.name.clone(),
            None => users.push(user.clone()),
        }
        Self::write_json(&self.dir.join(USERS_FILE), &users).await
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WatchedMovie;
    use chrono::NaiveDate;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_profile_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        {
            let store = FileProfileStore::open(dir.path()).await.unwrap();
            let movie = WatchedMovie {
                movie_id: 155,
                title: "The Dark Knight".to_string(),
                rating: 9,
                watched_at: NaiveDate::from_ymd_opt(2022, 8, 14).unwrap(),
                genres: vec![18, 28, 80],
            };
            store.append_watched("alice", movie).await.unwrap();
        }

        let reopened = FileProfileStore::open(dir.path()).await.unwrap();
        let profile = reopened.get_profile("alice").await.unwrap();
        assert_eq!(profile.watch_history.len(), 1);
        assert_eq!(profile.watch_history[0].title, "The Dark Knight");
    }

    #[tokio::test]
    async fn test_first_access_writes_default_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProfileStore::open(dir.path()).await.unwrap();

        let profile = store.get_profile("newcomer").await.unwrap();
        assert_eq!(profile, UserProfile::new());
        assert!(dir.path().join("newcomer.json").exists());
    }

    #[tokio::test]
    async fn test_roster_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProfileStore::open(dir.path()).await.unwrap();
        assert!(store.list_users().await.unwrap().is_empty());

        store
            .register_user(&UserSummary {
                id: "alice".to_string(),
                name: "Alice".to_string(),
            })
            .await
            .unwrap();

        let reopened = FileProfileStore::open(dir.path()).await.unwrap();
        let users = reopened.list_users().await.unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileProfileStore::open(dir.path()).await.unwrap();
        let result = store.get_profile("../escape").await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("alice.json"), b"{not json")
            .await
            .unwrap();
        let store = FileProfileStore::open(dir.path()).await.unwrap();
        let result = store.get_profile("alice").await;
        assert!(matches!(result, Err(AppError::Internal(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_access_does_not_fail() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileProfileStore::open(dir.path()).await.unwrap());

        for round in 0..20 {
            let user_id = format!("newcomer{}", round);
            let tasks: Vec<_> = (0..8)
                .map(|_| {
                    let store = store.clone();
                    let user_id = user_id.clone();
                    tokio::spawn(async move { store.get_profile(&user_id).await })
                })
                .collect();

            for task in tasks {
                assert_eq!(task.await.unwrap().unwrap(), UserProfile::new());
            }
        }

        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().to_string();
            assert!(!name.ends_with(".tmp"), "leftover temp file {}", name);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_keep_one_complete_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FileProfileStore::open(dir.path()).await.unwrap());

        let tasks: Vec<_> = (1..=8u8)
            .map(|rating| {
                let store = store.clone();
                tokio::spawn(async move {
                    let mut profile = UserProfile::new();
                    profile.add_watched(WatchedMovie {
                        movie_id: 603,
                        title: "The Matrix".to_string(),
                        rating,
                        watched_at: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                        genres: vec![28, 878],
                    });
                    store.save_profile("alice", &profile).await
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let profile = store.get_profile("alice").await.unwrap();
        assert_eq!(profile.watch_history.len(), 1);
        assert_eq!(profile.watch_history[0].movie_id, 603);
    }
}
