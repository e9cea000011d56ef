//! Detail panel for the open movie.
//!
//! Same discipline as the search slot, keyed by the selected id. While a
//! loaded movie is shown it holds the window title; the claim is released
//! whenever the panel changes or closes.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use popcorn_api::{MovieDetail, MovieService};
use popcorn_core::models::WatchedEntry;

use crate::slot::{self, FetchSlot};
use crate::title::{TitleGuard, WindowTitle};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum DetailState {
    /// Nothing open, or the lookup failed.
    #[default]
    Empty,
    Loading,
    Loaded(MovieDetail),
}

impl DetailState {
    pub fn detail(&self) -> Option<&MovieDetail> {
        match self {
            Self::Loaded(detail) => Some(detail),
            _ => None,
        }
    }
}

type TitleClaim = Arc<Mutex<Option<TitleGuard>>>;

pub struct DetailFetcher<S> {
    service: Arc<S>,
    title: WindowTitle,
    current_id: Option<String>,
    state: Arc<watch::Sender<DetailState>>,
    // Swapped under the `state` channel's write lock.
    claim: TitleClaim,
    slot: FetchSlot,
}

impl<S: MovieService + 'static> DetailFetcher<S> {
    pub fn new(service: Arc<S>, title: WindowTitle) -> Self {
        let (state, _) = watch::channel(DetailState::Empty);
        Self {
            service,
            title,
            current_id: None,
            state: Arc::new(state),
            claim: Arc::new(Mutex::new(None)),
            slot: FetchSlot::new(),
        }
    }

    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    pub fn detail(&self) -> Option<MovieDetail> {
        self.state.borrow().detail().cloned()
    }

    /// Id the panel is showing or loading.
    pub fn current_id(&self) -> Option<&str> {
        self.current_id.as_deref()
    }

    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Follow a selection change. Re-showing the current id is a no-op.
    /// Must be called from within a tokio runtime when `selection` is `Some`.
    pub fn show(&mut self, selection: Option<&str>) {
        if self.current_id.as_deref() == selection {
            return;
        }
        self.current_id = selection.map(str::to_string);

        let Some(id) = selection else {
            self.slot.cancel();
            self.publish(DetailState::Empty);
            return;
        };

        let token = self.slot.replace();
        self.publish(DetailState::Loading);
        tokio::spawn(run_detail(
            Arc::clone(&self.service),
            id.to_string(),
            Arc::clone(&self.state),
            self.title.clone(),
            Arc::clone(&self.claim),
            token,
        ));
    }

    /// Replace the state and release any title claim in one step.
    fn publish(&self, next: DetailState) {
        let claim = Arc::clone(&self.claim);
        self.state.send_modify(|state| {
            lock(&claim).take();
            *state = next;
        });
    }
}

impl<S> Drop for DetailFetcher<S> {
    fn drop(&mut self) {
        self.slot.cancel();
        lock(&self.claim).take();
    }
}

async fn run_detail<S: MovieService>(
    service: Arc<S>,
    id: String,
    state: Arc<watch::Sender<DetailState>>,
    title: WindowTitle,
    claim: TitleClaim,
    token: CancellationToken,
) {
    tracing::debug!(%id, "Loading movie detail");

    let Some(result) = slot::until_cancelled(&token, service.get_movie(&id)).await else {
        tracing::debug!(%id, "Detail superseded");
        return;
    };

    let committed = match result {
        Ok(detail) => slot::commit(&state, &token, |s| {
            let mut claim = lock(&claim);
            claim.take();
            *claim = title.acquire(&detail.title);
            *s = DetailState::Loaded(detail);
        }),
        Err(e) => {
            // Detail failures only reach the log; the panel stays empty.
            tracing::warn!(%id, error = %e, "Failed to load movie detail");
            slot::commit(&state, &token, |s| *s = DetailState::Empty)
        }
    };

    if !committed {
        tracing::debug!(%id, "Detail superseded");
    }
}

fn lock(claim: &Mutex<Option<TitleGuard>>) -> MutexGuard<'_, Option<TitleGuard>> {
    claim.lock().unwrap_or_else(|e| e.into_inner())
}

/// Build the watched-list record for `detail` with the user's rating.
pub fn watched_entry(detail: &MovieDetail, user_rating: f32) -> WatchedEntry {
    WatchedEntry {
        id: detail.id.clone(),
        title: detail.title.clone(),
        year: detail.year.clone(),
        poster_url: detail.poster_url.clone(),
        external_rating: detail.external_rating,
        runtime_minutes: detail.runtime_minutes,
        user_rating,
    }
}
