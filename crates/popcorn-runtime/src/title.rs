//! Window title shared with the render layer.
//!
//! The open movie claims the title through a [`TitleGuard`]; dropping the
//! guard puts the default title back, whichever way the movie was closed.

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct WindowTitle {
    current: Arc<watch::Sender<String>>,
    default: Arc<str>,
}

impl WindowTitle {
    pub fn new(default: &str) -> Self {
        let (current, _) = watch::channel(default.to_string());
        Self {
            current: Arc::new(current),
            default: Arc::from(default),
        }
    }

    pub fn current(&self) -> String {
        self.current.borrow().clone()
    }

    pub fn default_title(&self) -> &str {
        &self.default
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.current.subscribe()
    }

    /// Show `movie_title` until the returned guard is dropped.
    /// Returns `None` for an empty title, leaving the current title alone.
    pub fn acquire(&self, movie_title: &str) -> Option<TitleGuard> {
        if movie_title.is_empty() {
            return None;
        }
        self.current.send_replace(format!("Movie | {movie_title}"));
        Some(TitleGuard {
            title: self.clone(),
        })
    }
}

/// Restores the default window title on drop.
#[derive(Debug)]
pub struct TitleGuard {
    title: WindowTitle,
}

impl Drop for TitleGuard {
    fn drop(&mut self) {
        self.title
            .current
            .send_replace(self.title.default.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_sets_and_reverts() {
        let title = WindowTitle::new("usePopcorn");
        assert_eq!(title.current(), "usePopcorn");

        let guard = title.acquire("Inception");
        assert!(guard.is_some());
        assert_eq!(title.current(), "Movie | Inception");

        drop(guard);
        assert_eq!(title.current(), "usePopcorn");
    }

    #[test]
    fn empty_title_is_not_acquired() {
        let title = WindowTitle::new("usePopcorn");
        assert!(title.acquire("").is_none());
        assert_eq!(title.current(), "usePopcorn");
    }

    #[test]
    fn subscribers_see_title_changes() {
        let title = WindowTitle::new("usePopcorn");
        let mut rx = title.subscribe();
        let _guard = title.acquire("Heat");
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), "Movie | Heat");
    }
}
