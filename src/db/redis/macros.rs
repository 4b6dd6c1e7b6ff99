/// Read-through caching around an async computation.
///
/// Looks the key up first; on a hit the cached value is returned. On a miss
/// (including an unreachable cache) the block runs, and a successful result
/// is queued for writing in the background. Errors from the block propagate
/// and are never cached.
///
/// # Arguments
/// * `$cache`: a `Cache`.
/// * `$key`: the `CacheKey` to read and write.
/// * `$ttl`: time-to-live of the written value, in seconds.
/// * `$block`: future producing `AppResult<T>` on a miss.
///
/// # Example
/// ```rust,ignore
/// let popular: Vec<RemoteItem> = cached!(self.cache, CacheKey::Popular, 1800, async move {
///     self.fetch_popular().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.lookup(&key).await {
            Ok(cached)
        } else {
            match $block.await {
                Ok(value) => {
                    $cache.set_in_background(&key, &value, $ttl);
                    Ok(value)
                }
                Err(e) => Err(e),
            }
        }
    }};
}
