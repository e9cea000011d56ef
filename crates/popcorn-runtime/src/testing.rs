//! Scripted [`MovieService`] for controller tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use popcorn_api::{ApiError, MovieDetail, MovieService, MovieSummary};

/// Canned reply for one request.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    NotFound,
    Status(u16, &'static str),
}

impl<T> Reply<T> {
    fn into_result(self) -> Result<T, ApiError> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::NotFound => Err(ApiError::NotFound("Movie not found!".into())),
            Reply::Status(status, reason) => Err(ApiError::Api {
                status,
                reason: reason.into(),
            }),
        }
    }
}

/// Answers requests after a per-request delay and records every call.
/// Unscripted requests answer `NotFound` immediately.
#[derive(Default)]
pub struct FakeService {
    searches: HashMap<String, (Duration, Reply<Vec<MovieSummary>>)>,
    details: HashMap<String, (Duration, Reply<MovieDetail>)>,
    search_calls: Mutex<Vec<String>>,
    detail_calls: Mutex<Vec<String>>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, query: &str, delay_ms: u64, reply: Reply<Vec<MovieSummary>>) -> Self {
        self.searches
            .insert(query.into(), (Duration::from_millis(delay_ms), reply));
        self
    }

    pub fn detail(mut self, id: &str, delay_ms: u64, reply: Reply<MovieDetail>) -> Self {
        self.details
            .insert(id.into(), (Duration::from_millis(delay_ms), reply));
        self
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().unwrap().clone()
    }
}

impl MovieService for FakeService {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, ApiError> {
        self.search_calls.lock().unwrap().push(query.to_string());
        let (delay, reply) = self
            .searches
            .get(query)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::NotFound));
        tokio::time::sleep(delay).await;
        reply.into_result()
    }

    async fn get_movie(&self, id: &str) -> Result<MovieDetail, ApiError> {
        self.detail_calls.lock().unwrap().push(id.to_string());
        let (delay, reply) = self
            .details
            .get(id)
            .cloned()
            .unwrap_or((Duration::ZERO, Reply::NotFound));
        tokio::time::sleep(delay).await;
        reply.into_result()
    }
}

pub fn summary(id: &str, title: &str) -> MovieSummary {
    MovieSummary {
        id: id.into(),
        title: title.into(),
        year: "2010".into(),
        poster_url: format!("https://img.example/{id}.jpg"),
    }
}

pub fn inception() -> MovieDetail {
    MovieDetail {
        id: "tt1375666".into(),
        title: "Inception".into(),
        year: "2010".into(),
        poster_url: "https://img.example/tt1375666.jpg".into(),
        runtime_minutes: 148,
        external_rating: 8.8,
        plot: "A thief who steals corporate secrets through dream-sharing technology.".into(),
        released: "16 Jul 2010".into(),
        actors: "Leonardo DiCaprio, Joseph Gordon-Levitt, Elliot Page".into(),
        director: "Christopher Nolan".into(),
        genre: "Action, Adventure, Sci-Fi".into(),
    }
}

pub fn heat() -> MovieDetail {
    MovieDetail {
        id: "tt0113277".into(),
        title: "Heat".into(),
        year: "1995".into(),
        runtime_minutes: 170,
        external_rating: 8.3,
        director: "Michael Mann".into(),
        ..MovieDetail::default()
    }
}
