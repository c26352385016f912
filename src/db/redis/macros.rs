/// Read-through caching for catalog calls.
///
/// Returns the cached value when present. Otherwise awaits `$block`, queues
/// the result for a background cache write with `$ttl` seconds, and returns it.
/// Use it as the tail expression of a function returning `AppResult`.
///
/// ```rust,ignore
/// async fn list_genres(&self) -> AppResult<Vec<Genre>> {
///     cached!(self.cache, CacheKey::GenreList, GENRE_CACHE_TTL, async move {
///         self.fetch_genres().await
///     })
/// }
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.get_from_cache(&key).await {
            Some(cached) => Ok(cached),
            None => {
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
