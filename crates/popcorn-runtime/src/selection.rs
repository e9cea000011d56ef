use tokio::sync::watch;

use crate::keyboard::Shortcut;

/// Owns which movie id is open. Nothing else writes it.
#[derive(Debug)]
pub struct SelectionCoordinator {
    selected: watch::Sender<Option<String>>,
}

impl Default for SelectionCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionCoordinator {
    pub fn new() -> Self {
        let (selected, _) = watch::channel(None);
        Self { selected }
    }

    pub fn selected(&self) -> Option<String> {
        self.selected.borrow().clone()
    }

    pub fn is_open(&self) -> bool {
        self.selected.borrow().is_some()
    }

    /// Open `id`, or close it if it is already open. Returns the new selection.
    pub fn select(&self, id: &str) -> Option<String> {
        self.selected.send_modify(|selected| {
            if selected.as_deref() == Some(id) {
                *selected = None;
            } else {
                *selected = Some(id.to_string());
            }
        });
        self.selected()
    }

    /// Clear the selection. Returns whether anything was open.
    pub fn close(&self) -> bool {
        self.selected.send_if_modified(|selected| selected.take().is_some())
    }

    /// Escape closes the open movie. Returns whether the shortcut was consumed.
    pub fn handle_shortcut(&self, shortcut: Shortcut) -> bool {
        match shortcut {
            Shortcut::Escape if self.is_open() => self.close(),
            Shortcut::Escape => false,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.selected.subscribe()
    }
}
