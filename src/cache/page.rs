//! Fetched page payload.

use serde::Serialize;

/// A navigation result, as stored in the page cache.
///
/// Immutable once cached: the cache hands out shared `Rc<Page>` handles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Normalized pathname + query (cache key)
    pub url: String,
    /// Document title
    pub title: String,
    /// URL the server actually answered from (differs under redirects)
    #[serde(rename = "responseURL")]
    pub response_url: String,
    /// Outer markup of each swap container, in container-declaration order
    pub blocks: Vec<String>,
    /// Transition name override for this navigation
    pub custom_transition: Option<String>,
}

impl Page {
    /// Copy of this page keyed under another URL.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }
}
