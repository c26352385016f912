pub mod profiles;
pub mod redis;

pub use profiles::{build_profile_store, ProfileStore};
pub use redis::create_redis_client;
pub use redis::Cache;
pub use redis::CacheKey;
