use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppResult;
use crate::models::{DiscoverQuery, MovieId};

/// Keys for cached catalog responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    GenreList,
    /// Pre-rendered discover parameters, see [`CacheKey::discover`]
    Discover(String),
    Popular(u32),
    MovieSearch { query: String, page: u32 },
    MovieDetails(MovieId),
}

impl CacheKey {
    pub fn discover(query: &DiscoverQuery) -> Self {
        CacheKey::Discover(format!(
            "{}:{}:{}:{}:{}",
            query.genre_filter(),
            query.sort_by,
            query.min_vote_average,
            query.min_vote_count,
            query.page
        ))
    }
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::GenreList => write!(f, "genres:movie"),
            CacheKey::Discover(params) => write!(f, "discover:{}", params),
            CacheKey::Popular(page) => write!(f, "popular:{}", page),
            CacheKey::MovieSearch { query, page } => {
                write!(f, "search:{}:{}", query.trim().to_lowercase(), page)
            }
            CacheKey::MovieDetails(id) => write!(f, "movie:{}", id),
        }
    }
}

/// Creates a Redis client
///
/// `Client::open` only validates the URL; connections are opened lazily.
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Message for asynchronous cache writes
struct CacheWriteMessage {
    key: String,
    value: String,
    ttl: u64,
}

/// Read-through cache for catalog responses, backed by Redis
#[derive(Clone)]
pub struct Cache {
    redis_client: Client,
    write_tx: mpsc::UnboundedSender<CacheWriteMessage>,
}

/// Handle for gracefully shutting down the cache writer
pub struct CacheWriterHandle {
    shutdown_tx: mpsc::Sender<()>,
}

impl CacheWriterHandle {
    /// Signals the writer task to flush pending writes and stop
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        tracing::info!("Cache writer shutdown signal sent");
    }
}

impl Cache {
    /// Creates a cache and spawns its background writer task
    ///
    /// Writes go through a channel so a slow Redis never delays a recommendation response.
    pub async fn new(redis_client: Client) -> (Self, CacheWriterHandle) {
        let (write_tx, write_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        let client = redis_client.clone();
        tokio::spawn(async move {
            Self::cache_writer_task(client, write_rx, shutdown_rx).await;
        });

        let cache = Self {
            redis_client,
            write_tx,
        };

        (cache, CacheWriterHandle { shutdown_tx })
    }

    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");
        let mut failed_writes: u64 = 0;

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        failed_writes += 1;
                        tracing::warn!(error = %e, failed_writes, "Failed to write catalog response to cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    // All senders live in Cache clones, so drain what is already queued
                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!(failed_writes, "Cache writer task stopped");
                    break;
                }
            }
        }
    }

    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Looks up and deserializes a cached value, `None` on a miss
    ///
    /// Redis being down or holding an unreadable entry also counts as a miss, so the
    /// catalog keeps answering without its cache.
    pub async fn get_from_cache<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        match self.read_raw(key).await {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(data) => {
                    tracing::debug!(key = %key, "Cache hit");
                    Some(data)
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Discarding unreadable cache entry");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache unavailable, bypassing");
                None
            }
        }
    }

    async fn read_raw(&self, key: &CacheKey) -> AppResult<Option<String>> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let cached: Option<String> = conn.get(key.to_string()).await?;
        Ok(cached)
    }

    /// Queues a value for writing without waiting for Redis
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: key.to_string(),
            value: json,
            ttl,
        };

        if let Err(e) = self.write_tx.send(msg) {
            tracing::error!(error = %e, "Failed to send cache write message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortBy;

    #[test]
    fn test_cache_key_genre_list() {
        assert_eq!(CacheKey::GenreList.to_string(), "genres:movie");
    }

    #[test]
    fn test_cache_key_discover_includes_every_parameter() {
        let query = DiscoverQuery {
            genre_ids: vec![28, 878],
            sort_by: SortBy::PopularityDesc,
            min_vote_average: 6.5,
            min_vote_count: 100,
            page: 2,
        };
        assert_eq!(
            CacheKey::discover(&query).to_string(),
            "discover:28,878:popularity.desc:6.5:100:2"
        );
    }

    #[test]
    fn test_cache_key_search_is_normalized() {
        let key = CacheKey::MovieSearch {
            query: "  Blade RUNNER ".to_string(),
            page: 1,
        };
        assert_eq!(key.to_string(), "search:blade runner:1");
    }

    #[test]
    fn test_cache_key_popular_and_details() {
        assert_eq!(CacheKey::Popular(3).to_string(), "popular:3");
        assert_eq!(CacheKey::MovieDetails(603).to_string(), "movie:603");
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server"]
    async fn test_set_in_background_then_read_back() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = create_redis_client(&redis_url).unwrap();
        let (cache, handle) = Cache::new(client.clone()).await;

        let key = CacheKey::Popular(9999);
        let value = vec![1_u64, 2, 3];
        cache.set_in_background(&key, &value, 60);
        handle.shutdown().await;
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        let retrieved: Option<Vec<u64>> = cache.get_from_cache(&key).await;
        assert_eq!(retrieved, Some(value));

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(key.to_string()).await.unwrap();
    }
}
