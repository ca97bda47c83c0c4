//! Fetchers for the headless browser.
//!
//! - `SiteFetcher` - serves a directory of built HTML pages
//! - `StaticFetcher` - answers from an in-memory route table

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use percent_encoding::percent_decode_str;
use rustc_hash::FxHashMap;

use crate::core::{Link, normalize_url};
use crate::host::{FetchError, Fetcher, Request, Response};

// =============================================================================
// SiteFetcher
// =============================================================================

/// Serves pages from a site directory.
///
/// `/a/b?q` is answered from `a/b/index.html`, `a/b.html` or `a/b`, in that
/// order. Paths listed in `fail_paths` answer with status 500.
#[derive(Debug, Clone)]
pub struct SiteFetcher {
    root: PathBuf,
    fail_paths: Vec<String>,
    latency: Duration,
}

impl SiteFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fail_paths: Vec::new(),
            latency: Duration::ZERO,
        }
    }

    pub fn with_fail_paths(mut self, paths: &[String]) -> Self {
        self.fail_paths = paths.iter().map(|p| Link::parse(p).path()).collect();
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// File answering a URL path, if any.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let decoded = percent_decode_str(path).decode_utf8_lossy();
        let rel = Path::new(decoded.trim_start_matches('/'));
        if rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }

        let dir = self.root.join(rel);
        if path.ends_with('/') || rel.as_os_str().is_empty() {
            let index = dir.join("index.html");
            return index.is_file().then_some(index);
        }

        let candidates = [
            dir.join("index.html"),
            dir.with_extension("html"),
            dir.clone(),
        ];
        candidates.into_iter().find(|p| p.is_file())
    }
}

impl Fetcher for SiteFetcher {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let path = Link::parse(&request.url).path();
        if self.fail_paths.contains(&path) {
            return Ok(Response {
                status: 500,
                body: String::new(),
                url: None,
            });
        }

        let Some(file) = self.resolve(&path) else {
            return Ok(Response {
                status: 404,
                body: String::new(),
                url: None,
            });
        };

        let body = fs::read_to_string(&file).map_err(|err| FetchError {
            url: request.url.clone(),
            reason: format!("{}: {err}", file.display()),
        })?;

        // A directory index is served from its trailing-slash URL
        let served = if !path.ends_with('/') && file.ends_with("index.html") {
            Some(format!("{path}/"))
        } else {
            None
        };

        Ok(Response {
            status: 200,
            body,
            url: served,
        })
    }
}

// =============================================================================
// StaticFetcher
// =============================================================================

#[derive(Debug, Clone)]
enum Route {
    Answer(Response),
    Unreachable(String),
}

/// Answers from a fixed route table keyed by normalized address.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    routes: FxHashMap<String, Route>,
    latency: Duration,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with status 200.
    pub fn page(self, url: &str, body: impl Into<String>) -> Self {
        self.status(url, 200, body)
    }

    pub fn status(mut self, url: &str, status: u16, body: impl Into<String>) -> Self {
        self.routes.insert(
            normalize_url(url),
            Route::Answer(Response {
                status,
                body: body.into(),
                url: None,
            }),
        );
        self
    }

    /// Serve `body` as if the request had been redirected to `to`.
    pub fn redirect(mut self, url: &str, to: &str, body: impl Into<String>) -> Self {
        self.routes.insert(
            normalize_url(url),
            Route::Answer(Response {
                status: 200,
                body: body.into(),
                url: Some(to.to_string()),
            }),
        );
        self
    }

    /// Fail below HTTP for this URL.
    pub fn unreachable(mut self, url: &str, reason: impl Into<String>) -> Self {
        self.routes
            .insert(normalize_url(url), Route::Unreachable(reason.into()));
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl Fetcher for StaticFetcher {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match self.routes.get(&normalize_url(&request.url)) {
            Some(Route::Answer(response)) => Ok(response.clone()),
            Some(Route::Unreachable(reason)) => Err(FetchError {
                url: request.url,
                reason: reason.clone(),
            }),
            None => Ok(Response {
                status: 404,
                body: String::new(),
                url: None,
            }),
        }
    }
}
