/// Get-or-compute-and-store over the Redis response cache.
///
/// Checks the cache for `$key`; on a hit the cached value is returned
/// without touching the upstream. On a miss the block runs, its result is
/// handed to the cache for a background write with the given TTL, and the
/// freshly computed value is returned. Errors from the block propagate
/// untouched; cache trouble never surfaces here because `Cache::get`
/// swallows it as a miss.
///
/// # Example
/// ```rust,ignore
/// cached!(self.cache, CacheKey::Popular, POPULAR_TTL, async move {
///     self.fetch_popular_page().await
/// })
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(hit) = $cache.get(&$key).await {
            Ok(hit)
        } else {
            let value = $block.await?;
            $cache.put_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
