use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::models::SelectionResult;

/// Identifies one day's puzzle for one playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectionKey {
    pub playlist_id: String,
    pub full_days_since_epoch: i64,
}

impl SelectionKey {
    pub fn new(playlist_id: impl Into<String>, full_days_since_epoch: i64) -> Self {
        Self {
            playlist_id: playlist_id.into(),
            full_days_since_epoch,
        }
    }
}

impl fmt::Display for SelectionKey {
    // Length prefix keeps ("12", 3) and ("1", 23) apart.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.playlist_id.len(),
            self.playlist_id,
            self.full_days_since_epoch
        )
    }
}

/// Process-lifetime memo of resolved selections.
///
/// Entries are never evicted. Concurrent misses on the same key may both
/// write; the last write wins.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<SelectionKey, SelectionResult>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &SelectionKey) -> Option<SelectionResult> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    pub fn put(&self, key: SelectionKey, value: SelectionResult) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Playlist, Track};

    fn result_for(name: &str) -> SelectionResult {
        let track = Track::mock("1", name, "Artist");
        SelectionResult {
            answer: track.clone(),
            options: vec![track],
            playlist: Playlist {
                id: "p".to_string(),
                name: "Playlist".to_string(),
                image_url: String::new(),
            },
        }
    }

    #[test]
    fn test_get_missing_key() {
        let cache = ResultCache::new();
        assert!(cache.get(&SelectionKey::new("42", 7)).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_then_get() {
        let cache = ResultCache::new();
        let key = SelectionKey::new("42", 7);
        cache.put(key.clone(), result_for("First"));

        assert_eq!(cache.get(&key), Some(result_for("First")));
        assert!(cache.get(&SelectionKey::new("42", 8)).is_none());
        assert!(cache.get(&SelectionKey::new("43", 7)).is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let cache = ResultCache::new();
        let key = SelectionKey::new("42", 7);
        cache.put(key.clone(), result_for("First"));
        cache.put(key.clone(), result_for("Second"));

        assert_eq!(cache.get(&key), Some(result_for("Second")));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_keys_do_not_collide() {
        let cache = ResultCache::new();
        cache.put(SelectionKey::new("12", 3), result_for("Twelve"));
        cache.put(SelectionKey::new("1", 23), result_for("One"));

        assert_eq!(cache.len(), 2);
        assert_ne!(
            SelectionKey::new("12", 3).to_string(),
            SelectionKey::new("1", 23).to_string()
        );
        assert_eq!(
            cache.get(&SelectionKey::new("12", 3)),
            Some(result_for("Twelve"))
        );
    }
}
