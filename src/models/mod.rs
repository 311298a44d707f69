use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Paginated responses from the catalog backend
///
/// The catalog wraps page results in `{ "content": [...] }`, but some
/// endpoints return a bare array. Both shapes are accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Paged<T> {
    Wrapped { content: Vec<T> },
    Bare(Vec<T>),
}

impl<T> Paged<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            Paged::Wrapped { content } => content,
            Paged::Bare(items) => items,
        }
    }
}

/// A name that may arrive as a bare string or as an object with a `name` field
///
/// The catalog is inconsistent here: genre and credit lists mix both shapes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum NameRef {
    Detailed { name: String },
    Plain(String),
}

impl NameRef {
    pub fn name(&self) -> &str {
        match self {
            NameRef::Detailed { name } => name,
            NameRef::Plain(name) => name,
        }
    }
}

/// A list that may arrive as a comma-joined string or as an array
///
/// The film-archive API returns credits and genres as `"a, b, c"`; the
/// catalog returns arrays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CommaList {
    Split(Vec<String>),
    Joined(String),
}

impl CommaList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            CommaList::Split(items) => items,
            CommaList::Joined(joined) => joined
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

/// One entry from the catalog's paginated keyword search
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogMovie {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub genres: Vec<NameRef>,
    pub country: Option<String>,
    pub age_rating: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub directors: Vec<NameRef>,
    pub actors: Vec<NameRef>,
    pub overview: Option<String>,
}

impl CatalogMovie {
    /// Release year, preferring the date prefix over the bare year field
    pub fn year(&self) -> Option<i32> {
        year_of(self.release_date.as_deref(), self.release_year)
    }
}

/// One entry from the film-archive keyword search (flat, unpaginated)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ArchiveMovie {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    pub release_year: Option<i32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub genre: Option<CommaList>,
    pub nation: Option<String>,
    pub director: Option<String>,
    pub plot: Option<String>,
    pub rating: Option<String>,
    pub runtime: Option<u32>,
    pub actors: Option<CommaList>,
}

/// Movie detail payload, used to backfill a missing synopsis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieDetails {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub overview: Option<String>,
    pub stats: Option<RatingStats>,
}

/// Aggregate rating statistics carried on the detail payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RatingStats {
    pub avg_rating: f64,
    pub rating_count: u64,
}

/// One star rating for a movie
///
/// `stars` is nominally in (0, 5] in 0.5 steps, but the field is optional and
/// unvalidated at the wire level; bucketing decides what counts.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Rating {
    pub id: Option<i64>,
    pub stars: Option<f64>,
    pub review: Option<String>,
    pub spoiler: bool,
}

/// One streaming/rental offer for a movie
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderOffer {
    pub id: Option<i64>,
    #[serde(alias = "providerName")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub region: Option<String>,
    pub logo_url: Option<String>,
    pub link_url: Option<String>,
}

/// Availability for one movie, stamped with when it was fetched
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilitySnapshot {
    pub movie_id: i64,
    pub providers: Vec<ProviderOffer>,
    pub cached_at: DateTime<Utc>,
}

/// One enriched entry in a search response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    pub id: Option<i64>,
    pub title: String,
    pub original_title: String,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub genres: Vec<String>,
    pub country: Option<String>,
    pub director: Option<String>,
    pub age_rating: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub actors: Vec<String>,
    pub synopsis: Option<String>,
    pub providers: Vec<ProviderOffer>,
}

impl SearchResult {
    /// Builds a result record from a merged catalog entry plus its enrichment.
    ///
    /// Returns `None` when the entry has no usable title; such entries are
    /// dropped from search responses.
    pub fn from_catalog(
        movie: CatalogMovie,
        providers: Vec<ProviderOffer>,
        fetched_overview: Option<String>,
    ) -> Option<Self> {
        let title = non_empty(movie.title.clone())?;
        let year = movie.year();
        let synopsis = non_empty(movie.overview).or_else(|| non_empty(fetched_overview));
        let director = movie.directors.first().map(|d| d.name().to_string());

        Some(Self {
            id: movie.id,
            original_title: non_empty(movie.original_title).unwrap_or_else(|| title.clone()),
            title,
            year,
            poster_url: movie.poster_url,
            backdrop_url: movie.backdrop_url,
            genres: movie.genres.iter().map(|g| g.name().to_string()).collect(),
            country: movie.country,
            director,
            age_rating: movie.age_rating,
            runtime_minutes: movie.runtime_minutes,
            actors: movie.actors.iter().map(|a| a.name().to_string()).collect(),
            synopsis,
            providers,
        })
    }

    /// Builds a result record from a film-archive entry.
    ///
    /// Archive results carry no provider data; `providers` is always empty.
    pub fn from_archive(movie: ArchiveMovie) -> Option<Self> {
        let title = non_empty(movie.title.clone())?;
        let year = year_of(movie.release_date.as_deref(), movie.release_year);

        Some(Self {
            id: movie.id,
            original_title: non_empty(movie.original_title).unwrap_or_else(|| title.clone()),
            title,
            year,
            poster_url: movie.poster_url,
            backdrop_url: movie.backdrop_url,
            genres: movie.genre.map(CommaList::into_vec).unwrap_or_default(),
            country: movie.nation,
            director: non_empty(movie.director),
            age_rating: movie.rating,
            runtime_minutes: movie.runtime,
            actors: movie.actors.map(CommaList::into_vec).unwrap_or_default(),
            synopsis: non_empty(movie.plot),
            providers: Vec::new(),
        })
    }
}

/// Year from a date string's leading digits, falling back to a bare year field
fn year_of(release_date: Option<&str>, release_year: Option<i32>) -> Option<i32> {
    release_date
        .map(|d| {
            d.chars()
                .take_while(|c| c.is_ascii_digit())
                .take(4)
                .collect::<String>()
        })
        .filter(|y| y.len() == 4)
        .and_then(|y| y.parse().ok())
        .or(release_year)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
