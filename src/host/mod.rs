//! Host seams: the document, browser history and network.
//!
//! The navigator never touches a real browser directly. Everything it needs
//! from the environment goes through three traits:
//!
//! | Trait        | Stands in for                                       |
//! |--------------|-----------------------------------------------------|
//! | [`Dom`]      | `document`: queries, computed style, classes, swaps |
//! | [`HistoryApi`] | `window.history` + `window.location`              |
//! | [`Fetcher`]  | `XMLHttpRequest`                                    |
//!
//! A [`Host`] is anything implementing all three. Hosts are single-threaded:
//! methods take `&self` and use interior mutability.

mod input;

pub use input::{Anchor, ClickEvent, Modifiers, PopStateEvent};

use std::future::Future;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::history::HistoryState;

/// Opaque handle to a document element, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub u64);

// =============================================================================
// Document
// =============================================================================

/// Document operations used by the navigator.
pub trait Dom {
    /// All elements matching a selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// Computed value of a CSS property (e.g. `transition-duration`).
    fn computed_style(&self, element: ElementId, property: &str) -> Option<String>;

    /// Whether the host knows an event by this name (e.g. `transitionend`).
    fn supports_event(&self, _name: &str) -> bool {
        true
    }

    /// Subscribe to an event on an element.
    ///
    /// The receiver yields the *target* of every matching event dispatched on
    /// the element or its descendants. Dropping the receiver removes the
    /// listener.
    fn listen(&self, element: ElementId, event: &str) -> mpsc::UnboundedReceiver<ElementId>;

    /// Add a class to the root element.
    fn add_class(&self, class: &str);

    /// Remove a class from the root element.
    fn remove_class(&self, class: &str);

    /// Classes currently on the root element.
    fn classes(&self) -> Vec<String>;

    /// Tag every element matching `selector` with consecutive block indices
    /// starting at `first_index`. Returns how many were tagged.
    fn mark_blocks(&self, selector: &str, first_index: usize) -> usize;

    /// Remove all block tags.
    fn unmark_blocks(&self);

    /// Replace the block tagged `index` with new outer markup.
    fn replace_block(&self, index: usize, markup: &str) -> bool;

    fn title(&self) -> String;

    fn set_title(&self, title: &str);

    /// Element with this id, or an `<a name=...>` with this name.
    fn find_anchor(&self, name: &str) -> Option<ElementId>;

    fn scroll_to(&self, _element: ElementId) {}

    /// Resolve after the renderer has observed pending class changes.
    fn next_frame(&self) -> impl Future<Output = ()> {
        tokio::task::yield_now()
    }
}

// =============================================================================
// History
// =============================================================================

/// Browser history and location.
pub trait HistoryApi {
    /// Current location as an absolute URL.
    fn location(&self) -> String;

    /// State object of the current entry.
    fn state(&self) -> Option<HistoryState>;

    fn push_state(&self, state: HistoryState, url: &str);

    fn replace_state(&self, state: HistoryState, url: &str);

    /// Move through history. The host delivers the resulting popstate later.
    fn go(&self, delta: i32);

    /// Full, non-intercepted page load.
    fn assign(&self, url: &str);
}

// =============================================================================
// Network
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
}

/// Outgoing page request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Raw response, before content extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
    /// Final URL after redirects, when the transport knows it
    pub url: Option<String>,
}

/// Failure below HTTP (no response at all).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("request to `{url}` failed: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

/// Issues page requests.
pub trait Fetcher {
    fn fetch(&self, request: Request) -> impl Future<Output = Result<Response, FetchError>>;
}

/// Everything a navigator needs from its environment.
pub trait Host: Dom + HistoryApi + Fetcher + 'static {}

impl<T: Dom + HistoryApi + Fetcher + 'static> Host for T {}
