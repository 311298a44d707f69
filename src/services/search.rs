use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::models::{CatalogMovie, SearchResult};
use crate::services::merge::{append_archive_results, ResultMerger};
use crate::services::providers::{CatalogProvider, KeywordProvider};
use crate::services::query::{parse_query, search_variants, ParsedQuery};

const PAGE_SIZE: u32 = 50;
/// Pages fetched per variant for sub-2-character queries
const SHORT_QUERY_PAGES: u32 = 3;
/// Pages fetched per variant for everything else
const FULL_QUERY_PAGES: u32 = 4;
/// Queries shorter than this route to the short-query path
const SHORT_QUERY_LEN: usize = 2;
/// Below this many merged results the archive supplement kicks in
const SUPPLEMENT_THRESHOLD: usize = 20;

/// Search aggregation over the catalog and the film-archive supplement.
///
/// One invocation expands the query into variants, fans page fetches out
/// concurrently, merges and deduplicates what comes back, enriches each entry
/// best-effort, and tops the list up from the archive when it is thin.
pub struct SearchService {
    catalog: Arc<dyn CatalogProvider>,
    archive: Arc<dyn KeywordProvider>,
}

impl SearchService {
    pub fn new(catalog: Arc<dyn CatalogProvider>, archive: Arc<dyn KeywordProvider>) -> Self {
        Self { catalog, archive }
    }

    /// Runs a full search for a raw user query.
    ///
    /// Never fails: a dead catalog yields an empty list, and every partial
    /// failure short of that degrades to fewer or leaner entries. Callers
    /// must treat an empty list as "no results to show", not as an error
    /// signal.
    pub async fn search(&self, raw: &str) -> Vec<SearchResult> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let parsed = parse_query(trimmed);
        let variants = search_variants(&parsed.keyword);
        let short_query = trimmed.chars().count() < SHORT_QUERY_LEN;
        let pages = if short_query {
            SHORT_QUERY_PAGES
        } else {
            FULL_QUERY_PAGES
        };

        let merged = self.fetch_and_merge(&variants, pages).await;
        let mut results = self.enrich(merged).await;

        // Low-precision single-character queries skip the supplement; it
        // would mostly drag in noise.
        if !short_query && results.len() < SUPPLEMENT_THRESHOLD {
            self.supplement_from_archive(&mut results, &parsed, trimmed)
                .await;
        }

        tracing::info!(query = %trimmed, results = results.len(), "Search completed");

        results
    }

    /// Concurrent variant × page fan-out, merged in issue order
    async fn fetch_and_merge(&self, variants: &[String], pages: u32) -> Vec<CatalogMovie> {
        let mut tasks = Vec::new();

        for variant in variants {
            for page in 0..pages {
                let catalog = Arc::clone(&self.catalog);
                let keyword = variant.clone();
                tasks.push(tokio::spawn(async move {
                    catalog.search_page(&keyword, page, PAGE_SIZE).await
                }));
            }
        }

        let mut merger = ResultMerger::new();
        let mut failed = 0usize;

        for task in tasks {
            match task.await {
                Ok(Ok(page)) => merger.absorb_page(page),
                Ok(Err(e)) => {
                    failed += 1;
                    tracing::warn!(error = %e, "Search page fetch failed");
                }
                Err(e) => {
                    failed += 1;
                    tracing::warn!(error = %e, "Search page task failed to join");
                }
            }
        }

        if failed > 0 {
            tracing::warn!(
                failed_pages = failed,
                merged = merger.len(),
                "Partial search fan-out failure"
            );
        }

        merger.into_movies()
    }

    /// Per-entry availability and synopsis enrichment, concurrently.
    ///
    /// Enrichment failures are swallowed: the entry still ships, just without
    /// the field. Untitled entries are dropped here.
    async fn enrich(&self, movies: Vec<CatalogMovie>) -> Vec<SearchResult> {
        let mut tasks = Vec::new();

        for movie in movies {
            let catalog = Arc::clone(&self.catalog);
            tasks.push(tokio::spawn(async move {
                let Some(id) = movie.id else {
                    return SearchResult::from_catalog(movie, Vec::new(), None);
                };

                let providers = match catalog.availability(id).await {
                    Ok(offers) => offers,
                    Err(e) => {
                        tracing::debug!(movie_id = id, error = %e, "Availability enrichment skipped");
                        Vec::new()
                    }
                };

                let needs_overview = movie
                    .overview
                    .as_deref()
                    .map_or(true, |o| o.trim().is_empty());
                let overview = if needs_overview {
                    match catalog.movie_details(id).await {
                        Ok(details) => details.overview,
                        Err(e) => {
                            tracing::debug!(movie_id = id, error = %e, "Synopsis enrichment skipped");
                            None
                        }
                    }
                } else {
                    None
                };

                SearchResult::from_catalog(movie, providers, overview)
            }));
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Enrichment task failed to join"),
            }
        }

        results
    }

    /// Tops thin local results up from the film-archive source.
    ///
    /// Archive failure keeps whatever the catalog produced.
    async fn supplement_from_archive(
        &self,
        results: &mut Vec<SearchResult>,
        parsed: &ParsedQuery,
        raw_query: &str,
    ) {
        match self.archive.search(&parsed.keyword, parsed.year).await {
            Ok(archive_movies) => {
                let before = results.len();
                let transformed: Vec<SearchResult> = archive_movies
                    .into_iter()
                    .filter_map(SearchResult::from_archive)
                    .collect();
                append_archive_results(results, transformed, raw_query);

                tracing::info!(
                    added = results.len() - before,
                    total = results.len(),
                    "Archive supplement merged"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Archive supplement failed, keeping local results");
            }
        }
    }
}

/// Latest-wins guard over a shared [`SearchService`].
///
/// Interactive callers fire searches faster than they resolve; without a
/// guard a slow stale response can land after a newer one and overwrite it.
/// Each invocation takes a monotonic generation; a completed search whose
/// generation is no longer the newest reports `None` and its results must be
/// discarded, never displayed.
pub struct SearchSession {
    service: Arc<SearchService>,
    generation: AtomicU64,
}

impl SearchSession {
    pub fn new(service: Arc<SearchService>) -> Self {
        Self {
            service,
            generation: AtomicU64::new(0),
        }
    }

    /// Searches, returning `None` when a newer invocation superseded this one
    pub async fn search(&self, raw: &str) -> Option<Vec<SearchResult>> {
        let generation = self.begin();
        let results = self.service.search(raw).await;

        if self.is_current(generation) {
            Some(results)
        } else {
            tracing::debug!(query = %raw.trim(), "Discarding superseded search results");
            None
        }
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
