//! In-memory page cache.
//!
//! Keys are normalized addresses (see [`normalize_url`]), so `/a?x=1` and
//! `https://host/a?x=1` hit the same entry. Entries never expire; they are
//! only removed by [`PageCache::evict`] or [`PageCache::clear`].

mod page;

pub use page::Page;

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::core::normalize_url;
use crate::debug;

/// Normalized URL -> page store.
#[derive(Debug, Default)]
pub struct PageCache {
    pages: FxHashMap<String, Rc<Page>>,
    /// Most recently cached page (also owned by `pages`)
    last: Option<Rc<Page>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a page under its normalized URL.
    ///
    /// First write wins: an existing entry is kept as is, but still becomes
    /// the `last` page. Returns the stored entry.
    pub fn put(&mut self, mut page: Page) -> Rc<Page> {
        page.url = normalize_url(&page.url);
        let stored = self
            .pages
            .entry(page.url.clone())
            .or_insert_with(|| Rc::new(page))
            .clone();
        self.last = Some(stored.clone());
        debug!("cache"; "{} entries, last {}", self.pages.len(), stored.url);
        stored
    }

    pub fn get(&self, url: &str) -> Option<Rc<Page>> {
        self.pages.get(&normalize_url(url)).cloned()
    }

    pub fn has(&self, url: &str) -> bool {
        self.pages.contains_key(&normalize_url(url))
    }

    /// Remove a single entry. `last` is dropped too if it pointed at it.
    pub fn evict(&mut self, url: &str) {
        let key = normalize_url(url);
        if self.pages.remove(&key).is_some()
            && self.last.as_ref().is_some_and(|last| last.url == key)
        {
            self.last = None;
        }
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.last = None;
        debug!("cache"; "cleared");
    }

    /// The most recently cached page.
    pub fn last(&self) -> Option<Rc<Page>> {
        self.last.clone()
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
