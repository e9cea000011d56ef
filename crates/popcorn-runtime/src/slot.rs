//! One-fetch-at-a-time slots.
//!
//! Each logical fetch target (the search query, the open movie) owns a
//! [`FetchSlot`]. Starting a new fetch cancels the previous token, and a
//! fetch may only publish its result through [`commit`], which refuses to
//! write once the token is cancelled.

use std::future::Future;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Holds the token of the live fetch for one slot, if any.
#[derive(Debug, Default)]
pub struct FetchSlot {
    token: Option<CancellationToken>,
}

impl FetchSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the live fetch and return a fresh token for the next one.
    pub fn replace(&mut self) -> CancellationToken {
        self.cancel();
        let token = CancellationToken::new();
        self.token = Some(token.clone());
        token
    }

    /// Cancel the live fetch, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    /// Whether a fetch was started and has not been cancelled.
    pub fn is_live(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
    }
}

impl Drop for FetchSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Drive `fut` until it completes or `token` is cancelled, whichever comes
/// first. A cancelled fetch is dropped mid-flight and yields `None`.
pub async fn until_cancelled<F: Future>(token: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        out = fut => Some(out),
    }
}

/// Publish `apply` to `state` unless `token` has been cancelled.
///
/// The cancellation check runs under the channel's write lock, so a slot
/// that cancels before writing its own next state can never be overwritten
/// by the fetch it superseded.
pub fn commit<T>(
    state: &watch::Sender<T>,
    token: &CancellationToken,
    apply: impl FnOnce(&mut T),
) -> bool {
    state.send_if_modified(|value| {
        if token.is_cancelled() {
            return false;
        }
        apply(value);
        true
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn replace_cancels_previous_token() {
        let mut slot = FetchSlot::new();
        let first = slot.replace();
        assert!(slot.is_live());

        let second = slot.replace();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
        assert!(slot.is_live());
    }

    #[test]
    fn drop_cancels_live_token() {
        let mut slot = FetchSlot::new();
        let token = slot.replace();
        drop(slot);
        assert!(token.is_cancelled());
    }

    #[test]
    fn commit_refuses_cancelled_token() {
        let (tx, rx) = watch::channel(0);
        let token = CancellationToken::new();

        assert!(commit(&tx, &token, |v| *v = 1));
        token.cancel();
        assert!(!commit(&tx, &token, |v| *v = 2));
        assert_eq!(*rx.borrow(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn until_cancelled_drops_pending_future() {
        let token = CancellationToken::new();
        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            child.cancel();
        });

        let out = until_cancelled(&token, async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            42
        })
        .await;
        assert_eq!(out, None);
    }

    #[tokio::test]
    async fn until_cancelled_returns_output() {
        let token = CancellationToken::new();
        assert_eq!(until_cancelled(&token, async { 7 }).await, Some(7));
    }
}
