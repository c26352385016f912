use serde::Deserialize;
use std::path::PathBuf;

use crate::models::UserSummary;

/// Which backend holds user profiles
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProfileBackend {
    Memory,
    File,
    Redis,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key. Checked when the catalog client is built, not here,
    /// so a missing key surfaces as a configuration error.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Redis connection URL (catalog cache, and profiles when backend = redis)
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    #[serde(default = "default_profile_backend")]
    pub profile_backend: ProfileBackend,

    /// Directory for the file-backed profile store
    #[serde(default = "default_profile_dir")]
    pub profile_dir: PathBuf,

    /// User roster seeded at startup, formatted as `id:Name,id:Name`
    #[serde(default = "default_profile_users")]
    pub profile_users: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_profile_backend() -> ProfileBackend {
    ProfileBackend::Memory
}

fn default_profile_dir() -> PathBuf {
    PathBuf::from("data/profiles")
}

fn default_profile_users() -> String {
    "default:Default User".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Parses the `PROFILE_USERS` roster
    ///
    /// Entries without a name use the id as display name. Blank entries are skipped.
    pub fn user_roster(&self) -> Vec<UserSummary> {
        self.profile_users
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| match entry.split_once(':') {
                Some((id, name)) => UserSummary {
                    id: id.trim().to_string(),
                    name: name.trim().to_string(),
                },
                None => UserSummary {
                    id: entry.to_string(),
                    name: entry.to_string(),
                },
            })
            .collect()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
