//! Keyboard shortcuts the runtime reacts to.
//!
//! The render layer maps its native key events to a [`Shortcut`] and hands
//! it to [`crate::Runtime::handle_shortcut`].

/// Application-level keyboard shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Escape: close the open movie.
    Escape,
}

impl Shortcut {
    /// Map a key name as reported by the UI toolkit (`"Escape"`, `"Esc"`).
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Escape" | "Esc" => Some(Self::Escape),
            _ => None,
        }
    }
}
