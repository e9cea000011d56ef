pub mod watched;

pub use watched::{WatchedEntry, WatchlistStats};
