//! Title search driven by the query box.
//!
//! Every qualifying query edit supersedes the previous fetch: its token is
//! cancelled before the new `Loading` state is published, so only the most
//! recent query can ever reach [`SearchState::Success`] or
//! [`SearchState::Error`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use popcorn_api::{ApiError, MovieService, MovieSummary};

use crate::slot::{self, FetchSlot};

/// Queries shorter than this clear the results without a request.
pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;

/// User-facing message for a search the catalog has no match for.
pub const NOT_FOUND_MESSAGE: &str = "Movie not found!";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum SearchState {
    /// Query below the threshold; no results, no error.
    #[default]
    Idle,
    Loading,
    Success(Vec<MovieSummary>),
    Error(String),
}

impl SearchState {
    pub fn results(&self) -> &[MovieSummary] {
        match self {
            Self::Success(results) => results,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// What a query edit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChange {
    /// Same text as before: nothing happened.
    Unchanged,
    /// Below the threshold: results cleared, nothing fetched.
    Cleared,
    /// A fetch for the new query is in flight.
    Fetching,
}

pub struct SearchController<S> {
    service: Arc<S>,
    min_query_chars: usize,
    query: String,
    state: Arc<watch::Sender<SearchState>>,
    // Size of the last committed result list; survives `Loading` and `Error`.
    shown: Arc<AtomicUsize>,
    slot: FetchSlot,
}

impl<S: MovieService + 'static> SearchController<S> {
    pub fn new(service: Arc<S>, min_query_chars: usize) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            service,
            min_query_chars,
            query: String::new(),
            state: Arc::new(state),
            shown: Arc::new(AtomicUsize::new(0)),
            slot: FetchSlot::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Size of the last result list, kept while the next search loads.
    pub fn result_count(&self) -> usize {
        self.shown.load(Ordering::Acquire)
    }

    /// Replace the query. Must be called from within a tokio runtime.
    pub fn set_query(&mut self, query: impl Into<String>) -> QueryChange {
        let query = query.into();
        if query == self.query {
            return QueryChange::Unchanged;
        }
        self.query = query;

        if self.query.chars().count() < self.min_query_chars {
            self.slot.cancel();
            self.shown.store(0, Ordering::Release);
            self.state.send_if_modified(|state| {
                let changed = *state != SearchState::Idle;
                *state = SearchState::Idle;
                changed
            });
            return QueryChange::Cleared;
        }

        let token = self.slot.replace();
        self.state.send_replace(SearchState::Loading);
        tokio::spawn(run_search(
            Arc::clone(&self.service),
            self.query.clone(),
            Arc::clone(&self.state),
            Arc::clone(&self.shown),
            token,
        ));
        QueryChange::Fetching
    }

    /// Abandon the in-flight fetch, if any. The state is left as it is.
    pub fn cancel(&mut self) {
        self.slot.cancel();
    }
}

async fn run_search<S: MovieService>(
    service: Arc<S>,
    query: String,
    state: Arc<watch::Sender<SearchState>>,
    shown: Arc<AtomicUsize>,
    token: CancellationToken,
) {
    tracing::debug!(%query, "Searching");

    let Some(result) = slot::until_cancelled(&token, service.search_movies(&query)).await else {
        tracing::debug!(%query, "Search superseded");
        return;
    };

    let next = match result {
        Ok(results) => {
            tracing::debug!(%query, count = results.len(), "Search finished");
            SearchState::Success(results)
        }
        Err(e) => {
            if !matches!(e, ApiError::NotFound(_)) {
                tracing::warn!(%query, error = %e, "Search failed");
            }
            SearchState::Error(error_message(&e))
        }
    };

    let committed = slot::commit(&state, &token, |s| {
        if let SearchState::Success(results) = &next {
            shown.store(results.len(), Ordering::Release);
        }
        *s = next;
    });
    if !committed {
        tracing::debug!(%query, "Search superseded");
    }
}

/// Message shown in place of the result list.
pub fn error_message(err: &ApiError) -> String {
    match err {
        ApiError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
        ApiError::Api { reason, .. } => format!("Something went wrong: {reason}"),
        other => format!("Something went wrong: {other}"),
    }
}
