use serde::{Deserialize, Deserializer, Serialize};

/// A movie the user has watched and rated.
///
/// Field names on the wire match the browser-storage layout the watched list
/// has always been saved in, so existing lists keep loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEntry {
    #[serde(rename = "imdbID")]
    pub id: String,
    pub title: String,
    pub year: String,
    #[serde(rename = "poster")]
    pub poster_url: String,
    /// Stored as `null` when the catalog had no rating.
    #[serde(rename = "imdbRating", deserialize_with = "null_as_zero")]
    pub external_rating: f32,
    #[serde(rename = "runtime", deserialize_with = "null_as_zero")]
    pub runtime_minutes: u32,
    #[serde(rename = "userRating")]
    pub user_rating: f32,
}

fn null_as_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Aggregates shown above the watched list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchlistStats {
    pub count: usize,
    pub avg_external_rating: f32,
    pub avg_user_rating: f32,
    pub avg_runtime: f32,
}

impl WatchlistStats {
    /// Arithmetic means over `entries`; all zero when empty.
    pub fn from_entries(entries: &[WatchedEntry]) -> Self {
        if entries.is_empty() {
            return Self::default();
        }

        let n = entries.len() as f32;
        let mean = |f: fn(&WatchedEntry) -> f32| entries.iter().map(f).sum::<f32>() / n;

        Self {
            count: entries.len(),
            avg_external_rating: mean(|e| e.external_rating),
            avg_user_rating: mean(|e| e.user_rating),
            avg_runtime: mean(|e| e.runtime_minutes as f32),
        }
    }
}
