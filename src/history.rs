//! Session history collaborator
//!
//! Finished calls are reported here, keyed by companion id. Storage is the
//! host application's concern; [`MemoryHistory`] is the in-process default.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// Records finished sessions; fire-and-forget
pub trait SessionHistory: Send + Sync {
    fn add_to_session_history(&self, companion_id: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub companion_id: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryHistory {
    entries: Arc<RwLock<Vec<HistoryEntry>>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_all(&self) -> Vec<HistoryEntry> {
        self.entries.read().clone()
    }

    pub fn count_for(&self, companion_id: &str) -> usize {
        self.entries
            .read()
            .iter()
            .filter(|e| e.companion_id == companion_id)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl SessionHistory for MemoryHistory {
    fn add_to_session_history(&self, companion_id: &str) {
        debug!("[HISTORY] Recorded session for {}", companion_id);
        self.entries.write().push(HistoryEntry {
            companion_id: companion_id.to_string(),
            recorded_at: Utc::now(),
        });
    }
}
