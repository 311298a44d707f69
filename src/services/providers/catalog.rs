/// Movie catalog backend client
///
/// Thin reqwest wrapper over the catalog's REST endpoints. Search pages,
/// detail payloads and availability lookups are cached; ratings are not,
/// since histogram consumers want the current collection.
use crate::{
    cached,
    db::{Cache, CacheKey},
    error::{AppError, AppResult},
    models::{CatalogMovie, MovieDetails, Paged, ProviderOffer, Rating},
    services::providers::CatalogProvider,
};
use reqwest::Client as HttpClient;

const SEARCH_CACHE_TTL: u64 = 3600; // 1 hour
const DETAIL_CACHE_TTL: u64 = 86400; // 1 day
const AVAIL_CACHE_TTL: u64 = 604800; // 1 week

#[derive(Clone)]
pub struct CatalogClient {
    http_client: HttpClient,
    api_url: String,
    cache: Cache,
}

impl CatalogClient {
    pub fn new(cache: Cache, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            cache,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self.http_client.get(&url).query(query).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(url));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Catalog API returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for CatalogClient {
    async fn search_page(
        &self,
        keyword: &str,
        page: u32,
        size: u32,
    ) -> AppResult<Vec<CatalogMovie>> {
        cached!(
            self.cache,
            CacheKey::SearchPage(keyword.to_string(), page),
            SEARCH_CACHE_TTL,
            async move {
                let url = format!("{}/api/v1/movies/search", self.api_url);

                let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
                if !keyword.is_empty() {
                    query.push(("q", keyword.to_string()));
                }

                let page_response: Paged<CatalogMovie> = self.get_json(url, &query).await?;
                let movies = page_response.into_items();

                tracing::debug!(
                    keyword = %keyword,
                    page = page,
                    results = movies.len(),
                    "Catalog search page fetched"
                );

                Ok::<_, AppError>(movies)
            }
        )
    }

    async fn movie_details(&self, id: i64) -> AppResult<MovieDetails> {
        cached!(
            self.cache,
            CacheKey::MovieDetails(id),
            DETAIL_CACHE_TTL,
            async move {
                let url = format!("{}/api/v1/movies/{}", self.api_url, id);
                let details: MovieDetails = self.get_json(url, &[]).await?;

                tracing::debug!(movie_id = id, "Movie details fetched");

                Ok::<_, AppError>(details)
            }
        )
    }

    async fn availability(&self, id: i64) -> AppResult<Vec<ProviderOffer>> {
        cached!(
            self.cache,
            CacheKey::Availability(id),
            AVAIL_CACHE_TTL,
            async move {
                let url = format!("{}/api/v1/movies/{}/availability", self.api_url, id);
                let offers: Vec<ProviderOffer> = self.get_json(url, &[]).await?;

                tracing::debug!(movie_id = id, offers = offers.len(), "Availability fetched");

                Ok::<_, AppError>(offers)
            }
        )
    }

    async fn ratings(&self, id: i64, page: u32, size: u32) -> AppResult<Vec<Rating>> {
        let url = format!("{}/api/v1/movies/{}/ratings", self.api_url, id);
        let query = [("page", page.to_string()), ("size", size.to_string())];

        let page_response: Paged<Rating> = self.get_json(url, &query).await?;
        let ratings = page_response.into_items();

        tracing::debug!(movie_id = id, ratings = ratings.len(), "Ratings page fetched");

        Ok(ratings)
    }
}
