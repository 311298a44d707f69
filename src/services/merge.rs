use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::models::{CatalogMovie, SearchResult};

/// Deduplication key for catalog entries
///
/// The catalog identifier when present, else a `title_year` composite. An
/// entry with neither is unkeyable and gets skipped by the merger.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MergeKey {
    Id(i64),
    TitleYear(String),
}

impl MergeKey {
    pub fn of(movie: &CatalogMovie) -> Option<Self> {
        if let Some(id) = movie.id {
            return Some(MergeKey::Id(id));
        }
        let title = movie.title.as_deref()?;
        let year = movie
            .year()
            .map(|y| y.to_string())
            .unwrap_or_default();
        Some(MergeKey::TitleYear(format!("{}_{}", title, year)))
    }
}

/// Accumulates catalog pages into a keyed, deduplicated set.
///
/// Output order is first-seen order of each key. On a key collision the entry
/// with more populated descriptive fields wins; at equal richness the earlier
/// entry stays. That makes the merged set independent of which concurrent
/// fetch happened to land a given movie first, as long as one copy is richer.
#[derive(Debug, Default)]
pub struct ResultMerger {
    entries: HashMap<MergeKey, CatalogMovie>,
    order: Vec<MergeKey>,
}

impl ResultMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorbs one fetched page, in its element order
    pub fn absorb_page<I: IntoIterator<Item = CatalogMovie>>(&mut self, page: I) {
        for movie in page {
            self.absorb(movie);
        }
    }

    fn absorb(&mut self, movie: CatalogMovie) {
        let Some(key) = MergeKey::of(&movie) else {
            return;
        };

        match self.entries.entry(key.clone()) {
            Entry::Vacant(slot) => {
                self.order.push(key);
                slot.insert(movie);
            }
            Entry::Occupied(mut slot) => {
                if richness(&movie) > richness(slot.get()) {
                    slot.insert(movie);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Consumes the merger, yielding entries in first-seen key order
    pub fn into_movies(mut self) -> Vec<CatalogMovie> {
        self.order
            .iter()
            .filter_map(|key| self.entries.remove(key))
            .collect()
    }
}

/// Count of populated descriptive fields, used as the collision tie-break
fn richness(movie: &CatalogMovie) -> usize {
    let filled = [
        movie.poster_url.is_some(),
        movie.backdrop_url.is_some(),
        movie.overview.is_some(),
        movie.original_title.is_some(),
        movie.release_date.is_some() || movie.release_year.is_some(),
        movie.country.is_some(),
        movie.age_rating.is_some(),
        movie.runtime_minutes.is_some(),
        !movie.genres.is_empty(),
        !movie.directors.is_empty(),
        !movie.actors.is_empty(),
    ];
    filled.iter().filter(|&&f| f).count()
}

/// Appends film-archive results to the merged local results.
///
/// Archive entries deduplicate against what is already present by lowercase
/// title only, and are dropped when irrelevant: the title must contain the
/// query unless the query is at least two characters long.
pub fn append_archive_results(
    results: &mut Vec<SearchResult>,
    archive: Vec<SearchResult>,
    raw_query: &str,
) {
    let query_lower = raw_query.trim().to_lowercase();
    let query_chars = query_lower.chars().count();

    let mut seen_titles: HashSet<String> = results
        .iter()
        .map(|r| r.title.to_lowercase())
        .collect();

    for entry in archive {
        let title_lower = entry.title.to_lowercase();
        if !title_lower.contains(&query_lower) && query_chars < 2 {
            continue;
        }
        if seen_titles.insert(title_lower) {
            results.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NameRef;

    fn movie(id: Option<i64>, title: &str, year: Option<i32>) -> CatalogMovie {
        CatalogMovie {
            id,
            title: Some(title.to_string()),
            release_year: year,
            ..Default::default()
        }
    }

    fn result(title: &str) -> SearchResult {
        SearchResult {
            id: None,
            title: title.to_string(),
            original_title: title.to_string(),
            year: None,
            poster_url: None,
            backdrop_url: None,
            genres: Vec::new(),
            country: None,
            director: None,
            age_rating: None,
            runtime_minutes: None,
            actors: Vec::new(),
            synopsis: None,
            providers: Vec::new(),
        }
    }

    #[test]
    fn test_merge_key_prefers_id() {
        let m = movie(Some(42), "너의이름은", Some(2016));
        assert_eq!(MergeKey::of(&m), Some(MergeKey::Id(42)));
    }

    #[test]
    fn test_merge_key_title_year_fallback() {
        let m = movie(None, "너의이름은", Some(2016));
        assert_eq!(
            MergeKey::of(&m),
            Some(MergeKey::TitleYear("너의이름은_2016".to_string()))
        );
    }

    #[test]
    fn test_merge_key_missing_year_uses_empty_suffix() {
        let m = movie(None, "너의이름은", None);
        assert_eq!(
            MergeKey::of(&m),
            Some(MergeKey::TitleYear("너의이름은_".to_string()))
        );
    }

    #[test]
    fn test_merge_key_unkeyable_entry() {
        assert_eq!(MergeKey::of(&CatalogMovie::default()), None);
    }

    #[test]
    fn test_merger_dedupes_across_pages() {
        let mut merger = ResultMerger::new();
        merger.absorb_page(vec![movie(Some(1), "너의이름은", Some(2016))]);
        merger.absorb_page(vec![
            movie(Some(1), "너의이름은", Some(2016)),
            movie(Some(2), "아가씨", Some(2016)),
        ]);

        let merged = merger.into_movies();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, Some(1));
        assert_eq!(merged[1].id, Some(2));
    }

    #[test]
    fn test_merger_skips_unkeyable_entries() {
        let mut merger = ResultMerger::new();
        merger.absorb_page(vec![CatalogMovie::default(), movie(Some(3), "곡성", None)]);
        assert_eq!(merger.len(), 1);
    }

    #[test]
    fn test_merger_richer_entry_wins_regardless_of_order() {
        let sparse = movie(Some(42), "올드보이", Some(2003));
        let rich = CatalogMovie {
            poster_url: Some("http://img/rich.jpg".to_string()),
            overview: Some("Fifteen years in a cell.".to_string()),
            ..movie(Some(42), "올드보이", Some(2003))
        };

        // Rich entry arriving second replaces the sparse one.
        let mut merger = ResultMerger::new();
        merger.absorb_page(vec![sparse.clone(), rich.clone()]);
        let merged = merger.into_movies();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].poster_url.as_deref(), Some("http://img/rich.jpg"));

        // Rich entry arriving first is kept.
        let mut merger = ResultMerger::new();
        merger.absorb_page(vec![rich.clone(), sparse]);
        let merged = merger.into_movies();
        assert_eq!(merged[0].poster_url.as_deref(), Some("http://img/rich.jpg"));
    }

    #[test]
    fn test_merger_equal_richness_keeps_first() {
        let first = CatalogMovie {
            poster_url: Some("http://img/a.jpg".to_string()),
            ..movie(Some(42), "올드보이", Some(2003))
        };
        let second = CatalogMovie {
            poster_url: Some("http://img/b.jpg".to_string()),
            ..movie(Some(42), "올드보이", Some(2003))
        };

        let mut merger = ResultMerger::new();
        merger.absorb_page(vec![first, second]);
        let merged = merger.into_movies();
        assert_eq!(merged[0].poster_url.as_deref(), Some("http://img/a.jpg"));
    }

    #[test]
    fn test_merger_never_holds_duplicate_keys() {
        let mut merger = ResultMerger::new();
        for _ in 0..3 {
            merger.absorb_page(vec![
                movie(Some(1), "기생충", Some(2019)),
                movie(None, "기생충", Some(2019)),
            ]);
        }
        let merged = merger.into_movies();
        // Id-keyed and title-keyed copies are distinct keys, each unique.
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_richness_counts_credit_lists() {
        let mut m = movie(Some(1), "기생충", Some(2019));
        let base = richness(&m);
        m.directors = vec![NameRef::Plain("봉준호".to_string())];
        assert_eq!(richness(&m), base + 1);
    }

    #[test]
    fn test_append_archive_dedupes_by_title_case_insensitive() {
        let mut results = vec![result("Oldboy")];
        append_archive_results(
            &mut results,
            vec![result("OLDBOY"), result("Lady Vengeance")],
            "oldboy",
        );

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Oldboy", "Lady Vengeance"]);
    }

    #[test]
    fn test_append_archive_single_char_query_requires_title_match() {
        let mut results = Vec::new();
        append_archive_results(&mut results, vec![result("시"), result("올드보이")], "시");

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["시"]);
    }

    #[test]
    fn test_append_archive_does_not_duplicate_within_batch() {
        let mut results = Vec::new();
        append_archive_results(&mut results, vec![result("시"), result("시")], "poetry");
        assert_eq!(results.len(), 1);
    }
}
