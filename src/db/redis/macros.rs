/// Read-through caching over a fallible fetch.
///
/// Looks the key up first and returns the hit if present. On a miss (which
/// includes any cache failure) the block runs, its value is queued for a
/// background cache write, and the value is returned.
///
/// # Arguments
/// * `$cache`: a [`crate::db::Cache`].
/// * `$key`: the [`crate::db::CacheKey`] to read and write under.
/// * `$ttl`: time-to-live for the written value, in seconds.
/// * `$block`: async block producing an `AppResult` when the cache misses.
///
/// # Example
/// ```rust,ignore
/// let offers = cached!(self.cache, CacheKey::Availability(id), AVAIL_CACHE_TTL, async move {
///     self.fetch_availability(id).await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        match $cache.lookup(&key).await {
            Some(hit) => Ok(hit),
            None => {
                let value = $block.await?;
                $cache.set_in_background(&key, &value, $ttl);
                Ok(value)
            }
        }
    }};
}
