use serde::Deserialize;

use crate::traits::{MovieDetail, MovieSummary};

// ── Response types ───────────────────────────────────────────────

/// `?s=` search response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbSearchResponse {
    #[serde(default)]
    pub search: Vec<OmdbSearchItem>,
    pub response: String,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbSearchItem {
    pub title: String,
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub poster: String,
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
}

/// `?i=` detail response. Every field is optional: a `"Response": "False"`
/// body carries only `Response` and `Error`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbDetailResponse {
    pub title: Option<String>,
    pub year: Option<String>,
    pub poster: Option<String>,
    pub runtime: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    pub plot: Option<String>,
    pub released: Option<String>,
    pub actors: Option<String>,
    pub director: Option<String>,
    pub genre: Option<String>,
    pub response: String,
    pub error: Option<String>,
}

/// OMDb reports business-level misses in-band with `"Response": "False"`.
fn is_found(response: &str) -> bool {
    response != "False"
}

// ── Field parsing ────────────────────────────────────────────────

/// Leading integer of a runtime string: `"148 min"` → 148, `"N/A"` → 0.
pub fn parse_runtime_minutes(runtime: &str) -> u32 {
    runtime
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0)
}

/// Rating string as a float: `"8.8"` → 8.8, `"N/A"` → 0.0.
pub fn parse_rating(rating: &str) -> f32 {
    rating
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|r| r.is_finite())
        .unwrap_or(0.0)
}

// ── Conversions ──────────────────────────────────────────────────

impl OmdbSearchResponse {
    pub fn is_found(&self) -> bool {
        is_found(&self.response)
    }
}

impl OmdbSearchItem {
    pub fn into_summary(self) -> MovieSummary {
        MovieSummary {
            id: self.imdb_id,
            title: self.title,
            year: self.year,
            poster_url: self.poster,
        }
    }
}

impl OmdbDetailResponse {
    pub fn is_found(&self) -> bool {
        is_found(&self.response)
    }

    /// Convert into a [`MovieDetail`] keyed by the id that was requested.
    pub fn into_detail(self, id: &str) -> MovieDetail {
        MovieDetail {
            id: id.to_string(),
            title: self.title.unwrap_or_default(),
            year: self.year.unwrap_or_default(),
            poster_url: self.poster.unwrap_or_default(),
            runtime_minutes: self.runtime.as_deref().map_or(0, parse_runtime_minutes),
            external_rating: self.imdb_rating.as_deref().map_or(0.0, parse_rating),
            plot: self.plot.unwrap_or_default(),
            released: self.released.unwrap_or_default(),
            actors: self.actors.unwrap_or_default(),
            director: self.director.unwrap_or_default(),
            genre: self.genre.unwrap_or_default(),
        }
    }
}
