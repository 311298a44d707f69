/// Remote data-source abstractions
///
/// Search orchestration talks to two black-box services: the movie catalog
/// backend (paginated keyword search, details, availability, ratings) and a
/// film-archive keyword API used to supplement thin local results. Both sit
/// behind traits so the orchestration logic is testable without a network.
use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{ArchiveMovie, CatalogMovie, MovieDetails, ProviderOffer, Rating},
};

pub mod archive;
pub mod catalog;

pub use archive::FilmArchiveClient;
pub use catalog::CatalogClient;

/// The movie catalog backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// One page of keyword-search results
    async fn search_page(&self, keyword: &str, page: u32, size: u32)
        -> AppResult<Vec<CatalogMovie>>;

    /// Detail payload for one movie
    async fn movie_details(&self, id: i64) -> AppResult<MovieDetails>;

    /// Provider offers for one movie
    async fn availability(&self, id: i64) -> AppResult<Vec<ProviderOffer>>;

    /// One page of a movie's ratings
    async fn ratings(&self, id: i64, page: u32, size: u32) -> AppResult<Vec<Rating>>;
}

/// The film-archive keyword search, flat and unpaginated
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeywordProvider: Send + Sync {
    /// Keyword search with an optional release-year filter
    async fn search(&self, keyword: &str, year: Option<u16>) -> AppResult<Vec<ArchiveMovie>>;
}
