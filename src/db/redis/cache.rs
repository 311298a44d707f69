use redis::AsyncCommands;
use redis::Client;
use std::fmt::Display;
use tokio::sync::mpsc;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// One page of catalog keyword-search results
    SearchPage(String, u32),
    /// Provider availability for a movie
    Availability(i64),
    /// Movie detail payload
    MovieDetails(i64),
    /// Film-archive keyword search, optionally year-filtered
    ArchiveSearch(String, Option<u16>),
}

impl Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::SearchPage(query, page) => {
                write!(f, "search:{}:{}", query.to_lowercase(), page)
            }
            CacheKey::Availability(id) => write!(f, "avail:{}", id),
            CacheKey::MovieDetails(id) => write!(f, "detail:{}", id),
            CacheKey::ArchiveSearch(query, year) => write!(
                f,
                "archive:{}:{}",
                query.to_lowercase(),
                year.map(|y| y.to_string()).unwrap_or_default()
            ),
        }
    }
}

/// Creates a Redis client for caching
///
/// The client only parses the URL here; connections are established lazily
/// per operation.
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

/// Read-through cache backed by Redis
///
/// Reads are best-effort: a Redis failure is reported as a miss so the caller
/// falls back to the source fetch instead of failing the request. Writes go
/// through a background task and never block a response.
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
    /// Creates a new cache and spawns its background writer task
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

        let handle = CacheWriterHandle { shutdown_tx };

        (cache, handle)
    }

    /// Background task draining cache write messages into Redis
    ///
    /// On shutdown signal, flushes whatever is still queued before exiting.
    async fn cache_writer_task(
        client: Client,
        mut write_rx: mpsc::UnboundedReceiver<CacheWriteMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        tracing::info!("Cache writer task started");

        loop {
            tokio::select! {
                Some(msg) = write_rx.recv() => {
                    if let Err(e) = Self::write_to_redis(&client, msg).await {
                        tracing::error!(error = %e, "Failed to write to Redis cache");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Cache writer shutting down, flushing remaining writes");

                    while let Ok(msg) = write_rx.try_recv() {
                        if let Err(e) = Self::write_to_redis(&client, msg).await {
                            tracing::error!(error = %e, "Failed to flush cache write during shutdown");
                        }
                    }

                    tracing::info!("Cache writer task stopped");
                    break;
                }
            }
        }
    }

    /// Writes a single message to Redis
    async fn write_to_redis(client: &Client, msg: CacheWriteMessage) -> AppResult<()> {
        let mut conn = client.get_multiplexed_async_connection().await?;
        let _: () = conn.set_ex(msg.key, msg.value, msg.ttl).await?;
        Ok(())
    }

    /// Retrieves a cached value, treating every failure as a miss
    ///
    /// Connection errors, missing keys and undecodable payloads all come back
    /// as `None`; the caller recomputes from the source. Decode failures are
    /// logged since they usually mean a stale schema.
    pub async fn lookup<T: serde::de::DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let mut conn = match self.redis_client.get_multiplexed_async_connection().await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::debug!(error = %e, key = %key, "Cache unreachable, treating as miss");
                return None;
            }
        };

        let cached: Option<String> = match conn.get(format!("{}", key)).await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::debug!(error = %e, key = %key, "Cache read failed, treating as miss");
                return None;
            }
        };

        let json = cached?;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(error = %e, key = %key, "Undecodable cache entry, treating as miss");
                None
            }
        }
    }

    /// Queues a cache write without blocking
    ///
    /// The value is serialized here and handed to the writer task; there is
    /// no confirmation that the write lands.
    pub fn set_in_background<T: serde::Serialize>(&self, key: &CacheKey, value: &T, ttl: u64) {
        let json = match serde_json::to_string(value) {
            Ok(j) => j,
            Err(e) => {
                tracing::error!(error = %e, "Cache serialization error");
                return;
            }
        };

        let msg = CacheWriteMessage {
            key: format!("{}", key),
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

    #[test]
    fn test_cache_key_display_search_page() {
        let key = CacheKey::SearchPage("Oldboy".to_string(), 2);
        assert_eq!(format!("{}", key), "search:oldboy:2");
    }

    #[test]
    fn test_cache_key_display_search_page_keeps_interior_spaces() {
        let key = CacheKey::SearchPage("너의 이름은".to_string(), 0);
        assert_eq!(format!("{}", key), "search:너의 이름은:0");
    }

    #[test]
    fn test_cache_key_display_availability() {
        let key = CacheKey::Availability(42);
        assert_eq!(format!("{}", key), "avail:42");
    }

    #[test]
    fn test_cache_key_display_movie_details() {
        let key = CacheKey::MovieDetails(42);
        assert_eq!(format!("{}", key), "detail:42");
    }

    #[test]
    fn test_cache_key_display_archive_search_with_year() {
        let key = CacheKey::ArchiveSearch("시".to_string(), Some(2010));
        assert_eq!(format!("{}", key), "archive:시:2010");
    }

    #[test]
    fn test_cache_key_display_archive_search_without_year() {
        let key = CacheKey::ArchiveSearch("시".to_string(), None);
        assert_eq!(format!("{}", key), "archive:시:");
    }

    #[tokio::test]
    async fn test_lookup_is_a_miss_when_redis_is_unreachable() {
        // Port 1 is never a Redis server; the connection error must surface
        // as a miss, not as a failure.
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, _handle) = Cache::new(client).await;

        let key = CacheKey::Availability(42);
        let retrieved: Option<Vec<String>> = cache.lookup(&key).await;

        assert_eq!(retrieved, None);
    }

    #[tokio::test]
    async fn test_set_in_background_does_not_block_without_redis() {
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let (cache, handle) = Cache::new(client).await;

        let key = CacheKey::MovieDetails(7);
        cache.set_in_background(&key, &vec!["queued".to_string()], 60);

        // The write is queued and fails inside the writer task; shutdown must
        // still complete cleanly.
        handle.shutdown().await;
    }
}
