//! `[replay]` configuration for the headless driver.
//!
//! # Example
//!
//! ```toml
//! [replay]
//! start = "/"
//! origin = "http://localhost"
//! latency_ms = 20
//! fail_paths = ["/broken/"]
//! ```

use serde::{Deserialize, Serialize};

/// Headless replay settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Page loaded before the first step.
    pub start: String,

    /// Origin used to resolve relative hrefs.
    pub origin: String,

    /// Simulated response latency in milliseconds.
    pub latency_ms: u64,

    /// Paths answered with status 500.
    pub fail_paths: Vec<String>,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            start: "/".into(),
            origin: "http://localhost".into(),
            latency_ms: 0,
            fail_paths: Vec::new(),
        }
    }
}
