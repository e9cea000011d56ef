//! Trait definitions for movie catalog services.
//!
//! The OMDb client implements [`MovieService`]; the runtime controllers are
//! generic over it so the catalog can be swapped out without touching the
//! fetch lifecycle.

use std::future::Future;

use crate::error::ApiError;

/// A movie catalog that can be searched by title and queried by id.
pub trait MovieService: Send + Sync {
    /// Search for movies whose title matches `query`.
    fn search_movies(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<MovieSummary>, ApiError>> + Send;

    /// Fetch full detail for one movie.
    fn get_movie(&self, id: &str) -> impl Future<Output = Result<MovieDetail, ApiError>> + Send;
}

/// One row of a title search.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
}

/// Full detail for a single movie.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MovieDetail {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub runtime_minutes: u32,
    pub external_rating: f32,
    pub plot: String,
    pub released: String,
    pub actors: String,
    pub director: String,
    pub genre: String,
}
