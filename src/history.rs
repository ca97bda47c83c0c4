//! History bridge: push/replace entries tagged with a provenance marker.
//!
//! Every entry written through [`HistoryBridge`] carries `source = "swup"`.
//! Popstate events whose state lacks the marker came from somebody else and
//! are ignored by default.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::host::HistoryApi;

/// Provenance marker written into every entry this crate creates.
pub const SOURCE: &str = "swup";

/// State object stored with a history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    /// Address (+ hash) of the entry
    pub url: String,
    /// Provenance marker
    pub source: String,
    /// Distinguishes otherwise identical entries
    pub id: u64,
}

impl HistoryState {
    #[inline]
    pub fn is_from(&self, source: &str) -> bool {
        self.source == source
    }
}

/// Writes tagged history entries.
#[derive(Debug)]
pub struct HistoryBridge {
    source: String,
    next_id: Cell<u64>,
}

impl Default for HistoryBridge {
    fn default() -> Self {
        Self::new(SOURCE)
    }
}

impl HistoryBridge {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            next_id: Cell::new(1),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    fn state(&self, url: &str) -> HistoryState {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        HistoryState {
            url: url.to_string(),
            source: self.source.clone(),
            id,
        }
    }

    /// Add a new entry.
    pub fn push(&self, history: &impl HistoryApi, url: &str) {
        history.push_state(self.state(url), url);
    }

    /// Rewrite the current entry in place.
    pub fn replace(&self, history: &impl HistoryApi, url: &str) {
        history.replace_state(self.state(url), url);
    }

    /// Whether a state object was written by this bridge's source.
    pub fn is_own(&self, state: Option<&HistoryState>) -> bool {
        state.is_some_and(|s| s.is_from(&self.source))
    }
}
