//! Search, detail and watched-list state for a movie tracker UI.
//!
//! [`Runtime`] owns the four state holders and keeps them consistent:
//! a query edit that starts a search closes the open movie, closing or
//! switching the open movie re-targets the detail panel, and removing a
//! watched entry closes whatever was open. A render layer reads
//! [`Runtime::view`] or subscribes to the individual channels.

pub mod detail;
pub mod keyboard;
pub mod search;
pub mod selection;
pub mod slot;
pub mod title;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use serde::Serialize;

use popcorn_api::omdb::OmdbClient;
use popcorn_api::{MovieService, MovieSummary};
use popcorn_core::config::AppConfig;
use popcorn_core::models::{WatchedEntry, WatchlistStats};
use popcorn_core::storage::{FileBackend, PersistenceStore};
use popcorn_core::watchlist::WatchlistStore;

pub use detail::{DetailFetcher, DetailState};
pub use keyboard::Shortcut;
pub use search::{QueryChange, SearchController, SearchState};
pub use selection::SelectionCoordinator;
pub use title::{TitleGuard, WindowTitle};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(String),
    #[error("no movie detail is loaded")]
    NoDetail,
    #[error("rating {0} is outside 1-10")]
    InvalidRating(f32),
    #[error("already on the watched list: {0}")]
    AlreadyWatched(String),
}

/// Everything a render layer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub query: String,
    pub search: SearchState,
    pub result_count: usize,
    pub selected: Option<String>,
    pub detail: DetailState,
    pub selected_user_rating: Option<f32>,
    pub watched: Vec<WatchedEntry>,
    pub stats: WatchlistStats,
    pub title: String,
}

pub struct Runtime<S> {
    config: AppConfig,
    title: WindowTitle,
    selection: SelectionCoordinator,
    search: SearchController<S>,
    detail: DetailFetcher<S>,
    watchlist: WatchlistStore,
}

impl Runtime<OmdbClient> {
    /// OMDb client plus a watched list stored under the configured data dir.
    pub fn from_config(config: AppConfig) -> Result<Self, RuntimeError> {
        let client = OmdbClient::new(&config.api.endpoint, config.api.api_key.clone())
            .map_err(|e| RuntimeError::Config(e.to_string()))?;
        let store = PersistenceStore::with_key(
            FileBackend::new(config.data_dir()),
            &config.storage.watched_key,
        );
        Ok(Self::new(config, Arc::new(client), store))
    }
}

impl<S: MovieService + 'static> Runtime<S> {
    pub fn new(config: AppConfig, service: Arc<S>, store: PersistenceStore) -> Self {
        let title = WindowTitle::new(&config.ui.default_title);
        let search = SearchController::new(Arc::clone(&service), config.search.min_query_chars);
        let detail = DetailFetcher::new(service, title.clone());
        let watchlist = WatchlistStore::open(store);

        Self {
            config,
            title,
            selection: SelectionCoordinator::new(),
            search,
            detail,
            watchlist,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn search(&self) -> &SearchController<S> {
        &self.search
    }

    pub fn detail(&self) -> &DetailFetcher<S> {
        &self.detail
    }

    pub fn selection(&self) -> &SelectionCoordinator {
        &self.selection
    }

    pub fn watchlist(&self) -> &WatchlistStore {
        &self.watchlist
    }

    pub fn title(&self) -> &WindowTitle {
        &self.title
    }

    /// Current search results.
    pub fn results(&self) -> Vec<MovieSummary> {
        self.search.state().results().to_vec()
    }

    // ── Query ───────────────────────────────────────────────────

    pub fn set_query(&mut self, query: impl Into<String>) -> QueryChange {
        let change = self.search.set_query(query);
        if change == QueryChange::Fetching {
            self.close_movie();
        }
        change
    }

    // ── Selection ───────────────────────────────────────────────

    /// Open `id`, or close it if it is already open.
    pub fn select_movie(&mut self, id: &str) {
        self.selection.select(id);
        self.sync_detail();
    }

    pub fn close_movie(&mut self) {
        self.selection.close();
        self.sync_detail();
    }

    /// Returns whether the shortcut was consumed.
    pub fn handle_shortcut(&mut self, shortcut: Shortcut) -> bool {
        let consumed = self.selection.handle_shortcut(shortcut);
        if consumed {
            self.sync_detail();
        }
        consumed
    }

    fn sync_detail(&mut self) {
        let selected = self.selection.selected();
        self.detail.show(selected.as_deref());
    }

    // ── Watched list ────────────────────────────────────────────

    /// Add the loaded movie with the user's rating, then close it.
    pub fn add_watched(&mut self, user_rating: f32) -> Result<WatchedEntry, RuntimeError> {
        if !(1.0..=10.0).contains(&user_rating) {
            return Err(RuntimeError::InvalidRating(user_rating));
        }
        let loaded = self.detail.detail().ok_or(RuntimeError::NoDetail)?;
        if self.watchlist.contains(&loaded.id) {
            return Err(RuntimeError::AlreadyWatched(loaded.id));
        }

        let entry = detail::watched_entry(&loaded, user_rating);
        self.watchlist.add(entry.clone());
        self.close_movie();
        Ok(entry)
    }

    /// Delete `id` from the watched list and close the open movie.
    pub fn remove_watched(&mut self, id: &str) -> bool {
        let removed = self.watchlist.remove(id);
        self.close_movie();
        removed
    }

    pub fn selected_in_watchlist(&self) -> bool {
        self.selection
            .selected()
            .is_some_and(|id| self.watchlist.contains(&id))
    }

    /// The user's rating for the open movie, if it is already watched.
    pub fn selected_user_rating(&self) -> Option<f32> {
        self.selection
            .selected()
            .and_then(|id| self.watchlist.rating_for(&id))
    }

    pub fn view(&self) -> ViewSnapshot {
        let search = self.search.state();
        ViewSnapshot {
            query: self.search.query().to_string(),
            result_count: self.search.result_count(),
            search,
            selected: self.selection.selected(),
            detail: self.detail.state(),
            selected_user_rating: self.selected_user_rating(),
            watched: self.watchlist.entries(),
            stats: self.watchlist.summary_stats(),
            title: self.title.current(),
        }
    }
}
