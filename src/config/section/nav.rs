//! `[nav]` configuration for soft navigation.
//!
//! # Example
//!
//! ```toml
//! [nav]
//! containers = ["#swup", "#sidebar"]
//! animation_selector = "[class*=\"transition-\"]"
//! animate_history_browsing = false
//! cache = true
//!
//! [nav.request_headers]
//! X-Requested-With = "swup"
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default selector for interceptable links (root-relative and fragment links).
pub const DEFAULT_LINK_SELECTOR: &str =
    "a[href^=\"/\"]:not([data-no-swup]), a[href^=\"#\"]:not([data-no-swup])";

/// Default selector for animated elements.
pub const DEFAULT_ANIMATION_SELECTOR: &str = "[class*=\"transition-\"]";

/// Soft navigation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    /// Replay exit/entry animations on back/forward navigation.
    pub animate_history_browsing: bool,

    /// Elements whose animations gate the content swap.
    pub animation_selector: String,

    /// Links that are intercepted instead of followed.
    pub link_selector: String,

    /// Keep fetched pages in memory.
    pub cache: bool,

    /// Swappable regions; order defines block order.
    pub containers: Vec<String>,

    /// Headers sent with every page request.
    pub request_headers: BTreeMap<String, String>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            animate_history_browsing: false,
            animation_selector: DEFAULT_ANIMATION_SELECTOR.into(),
            link_selector: DEFAULT_LINK_SELECTOR.into(),
            cache: true,
            containers: vec!["#swup".into()],
            request_headers: BTreeMap::from([
                ("X-Requested-With".into(), "swup".into()),
                ("Accept".into(), "text/html, application/xhtml+xml".into()),
            ]),
        }
    }
}

impl NavConfig {
    /// Also intercept absolute links to `origin` (when still on the default selector).
    pub fn with_origin(mut self, origin: &str) -> Self {
        if self.link_selector == DEFAULT_LINK_SELECTOR {
            let origin = origin.trim_end_matches('/');
            self.link_selector = format!(
                "a[href^=\"{origin}\"]:not([data-no-swup]), {DEFAULT_LINK_SELECTOR}"
            );
        }
        self
    }

    /// Request headers as ordered pairs.
    pub fn header_pairs(&self) -> Vec<(String, String)> {
        self.request_headers
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
