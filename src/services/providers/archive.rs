/// Film-archive keyword search client
///
/// Secondary source used when the local catalog comes back thin. Takes the
/// extracted keyword plus the year filter; the year becomes a release-date
/// window since the archive has no bare year parameter. Responses are flat
/// lists with no pagination wrapper.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::ArchiveMovie,
    services::providers::KeywordProvider,
};
use reqwest::Client as HttpClient;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour

#[derive(Clone)]
pub struct FilmArchiveClient {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
    cache: Cache,
}

impl FilmArchiveClient {
    pub fn new(cache: Cache, api_url: String, api_key: Option<String>) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            api_key,
            cache,
        }
    }
}

#[async_trait::async_trait]
impl KeywordProvider for FilmArchiveClient {
    async fn search(&self, keyword: &str, year: Option<u16>) -> AppResult<Vec<ArchiveMovie>> {
        cached!(
            self.cache,
            CacheKey::ArchiveSearch(keyword.to_string(), year),
            SEARCH_CACHE_TTL,
            async move {
                let url = format!("{}/search", self.api_url);

                let mut query = vec![("query", keyword.to_string())];
                if let Some(year) = year {
                    query.push(("releaseDts", format!("{}0101", year)));
                    query.push(("releaseDte", format!("{}1231", year)));
                }

                let mut request = self.http_client.get(&url).query(&query);
                if let Some(key) = &self.api_key {
                    request = request.header("X-Api-Key", key);
                }

                let response = request.send().await?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(AppError::ExternalApi(format!(
                        "Archive API returned status {}: {}",
                        status, body
                    )));
                }

                let movies: Vec<ArchiveMovie> = response.json().await?;

                tracing::debug!(
                    keyword = %keyword,
                    year = year,
                    results = movies.len(),
                    "Archive search completed"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }
}
