//! Headless browser: an in-memory [`Host`](crate::host::Host).
//!
//! Good enough to drive a navigator without a real browser:
//!
//! | Concern  | Model                                                        |
//! |----------|--------------------------------------------------------------|
//! | document | element tree parsed with `tl`, root classes, block tags       |
//! | style    | inline `transition-*` / `animation-*` longhand declarations   |
//! | events   | end-event listeners per element, fired by [`HeadlessBrowser::emit`] |
//! | history  | entry stack + index; `go()` queues a popstate for the driver  |
//! | network  | any [`Fetcher`], with every request recorded                 |

mod document;
mod fetch;

pub use document::{BLOCK_ATTR, Document};
pub use fetch::{SiteFetcher, StaticFetcher};

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use url::Url;

use crate::history::HistoryState;
use crate::host::{
    Anchor, Dom, ElementId, FetchError, Fetcher, HistoryApi, PopStateEvent, Request, Response,
};
use crate::log;
use crate::selector::Selector;

struct Listener {
    element: usize,
    event: String,
    sender: mpsc::UnboundedSender<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    url: String,
    state: Option<HistoryState>,
}

/// In-memory browser window.
pub struct HeadlessBrowser<F> {
    document: RefCell<Document>,
    title: RefCell<String>,
    selectors: RefCell<FxHashMap<String, Option<Selector>>>,
    listeners: RefCell<Vec<Listener>>,
    scrolled: RefCell<Vec<ElementId>>,

    base: Url,
    entries: RefCell<Vec<Entry>>,
    index: Cell<usize>,
    popstates: RefCell<VecDeque<PopStateEvent>>,
    reloads: RefCell<Vec<String>>,

    fetcher: F,
    requests: RefCell<Vec<Request>>,
}

impl<F: Fetcher> HeadlessBrowser<F> {
    /// Open `html` as if it had been loaded from `url`.
    pub fn open(url: &str, html: &str, fetcher: F) -> Result<Self, url::ParseError> {
        let base = Url::parse(url)?;
        let document = Document::parse(html);
        let title = crate::html::title(html).unwrap_or_default();

        Ok(Self {
            document: RefCell::new(document),
            title: RefCell::new(title),
            selectors: RefCell::default(),
            listeners: RefCell::default(),
            scrolled: RefCell::default(),
            entries: RefCell::new(vec![Entry {
                url: base.to_string(),
                state: None,
            }]),
            base,
            index: Cell::new(0),
            popstates: RefCell::default(),
            reloads: RefCell::default(),
            fetcher,
            requests: RefCell::default(),
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }
}

impl<F> HeadlessBrowser<F> {
    // =========================================================================
    // Driver API
    // =========================================================================

    /// Dispatch an end event (`transitionend`, ...) targeted at `target`.
    ///
    /// Listeners on the target and on its ancestors receive it.
    pub fn emit(&self, target: ElementId, event: &str) {
        let document = self.document.borrow();
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|l| !l.sender.is_closed());
        for listener in listeners.iter() {
            if listener.event == event
                && document.is_inclusive_ancestor(listener.element, target.0 as usize)
            {
                let _ = listener.sender.send(target);
            }
        }
    }

    /// Number of live end-event listeners.
    pub fn listener_count(&self) -> usize {
        let mut listeners = self.listeners.borrow_mut();
        listeners.retain(|l| !l.sender.is_closed());
        listeners.len()
    }

    /// Next popstate queued by `go()`.
    pub fn take_popstate(&self) -> Option<PopStateEvent> {
        self.popstates.borrow_mut().pop_front()
    }

    /// URLs loaded without interception, in order.
    pub fn reloads(&self) -> Vec<String> {
        self.reloads.borrow().clone()
    }

    /// Every request issued so far.
    pub fn requests(&self) -> Vec<Request> {
        self.requests.borrow().clone()
    }

    /// Elements scrolled into view, in order.
    pub fn scrolled(&self) -> Vec<ElementId> {
        self.scrolled.borrow().clone()
    }

    pub fn history_len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn history_index(&self) -> usize {
        self.index.get()
    }

    /// URL and state of entry `index`.
    pub fn history_entry(&self, index: usize) -> Option<(String, Option<HistoryState>)> {
        self.entries
            .borrow()
            .get(index)
            .map(|e| (e.url.clone(), e.state.clone()))
    }

    /// Outer markup of the element tagged with block `index`.
    pub fn block_html(&self, index: usize) -> Option<String> {
        let document = self.document.borrow();
        document.block(index).map(|i| document.outer_html(i))
    }

    /// Whole document markup.
    pub fn html(&self) -> String {
        let document = self.document.borrow();
        document.outer_html(document.root())
    }

    /// Attribute of an element.
    pub fn attr(&self, element: ElementId, name: &str) -> Option<String> {
        self.document
            .borrow()
            .data(element.0 as usize)?
            .attr(name)
            .map(str::to_string)
    }

    /// First link matching `link_selector` whose `href` is exactly `href`.
    pub fn find_link(&self, link_selector: &str, href: &str) -> Option<Anchor> {
        self.query_all(link_selector)
            .into_iter()
            .find(|el| self.attr(*el, "href").as_deref() == Some(href))
            .map(|el| Anchor {
                href: href.to_string(),
                alt_href: self.attr(el, "xlink:href"),
                transition: self.attr(el, "data-swup-transition"),
            })
    }

    fn selector(&self, source: &str) -> Option<Selector> {
        self.selectors
            .borrow_mut()
            .entry(source.to_string())
            .or_insert_with(|| match Selector::parse(source) {
                Ok(selector) => Some(selector),
                Err(err) => {
                    log!("warning"; "{}", err);
                    None
                }
            })
            .clone()
    }
}

impl<F> Dom for HeadlessBrowser<F> {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let Some(selector) = self.selector(selector) else {
            return Vec::new();
        };
        self.document
            .borrow()
            .select(&selector)
            .into_iter()
            .map(|i| ElementId(i as u64))
            .collect()
    }

    fn computed_style(&self, element: ElementId, property: &str) -> Option<String> {
        self.document
            .borrow()
            .inline_style(element.0 as usize, property)
    }

    fn listen(&self, element: ElementId, event: &str) -> mpsc::UnboundedReceiver<ElementId> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.listeners.borrow_mut().push(Listener {
            element: element.0 as usize,
            event: event.to_string(),
            sender,
        });
        receiver
    }

    fn add_class(&self, class: &str) {
        self.document.borrow_mut().add_root_class(class);
    }

    fn remove_class(&self, class: &str) {
        self.document.borrow_mut().remove_root_class(class);
    }

    fn classes(&self) -> Vec<String> {
        self.document.borrow().root_classes()
    }

    fn mark_blocks(&self, selector: &str, first_index: usize) -> usize {
        let Some(selector) = self.selector(selector) else {
            return 0;
        };
        let mut document = self.document.borrow_mut();
        let found = document.select(&selector);
        for (offset, element) in found.iter().enumerate() {
            document.set_attr(*element, BLOCK_ATTR, &(first_index + offset).to_string());
        }
        found.len()
    }

    fn unmark_blocks(&self) {
        let mut document = self.document.borrow_mut();
        while let Some(element) = document.find(|el| el.attr(BLOCK_ATTR).is_some()) {
            document.remove_attr(element, BLOCK_ATTR);
        }
    }

    fn replace_block(&self, index: usize, markup: &str) -> bool {
        let mut document = self.document.borrow_mut();
        let Some(element) = document.block(index) else {
            return false;
        };
        document.replace_with_markup(element, markup, (BLOCK_ATTR, &index.to_string()))
    }

    fn title(&self) -> String {
        self.title.borrow().clone()
    }

    fn set_title(&self, title: &str) {
        *self.title.borrow_mut() = title.to_string();
    }

    fn find_anchor(&self, name: &str) -> Option<ElementId> {
        let document = self.document.borrow();
        document
            .find(|el| el.id() == Some(name))
            .or_else(|| document.find(|el| el.tag == "a" && el.attr("name") == Some(name)))
            .map(|i| ElementId(i as u64))
    }

    fn scroll_to(&self, element: ElementId) {
        self.scrolled.borrow_mut().push(element);
    }
}

impl<F> HistoryApi for HeadlessBrowser<F> {
    fn location(&self) -> String {
        let entries = self.entries.borrow();
        let url = &entries[self.index.get()].url;
        self.base
            .join(url)
            .map(String::from)
            .unwrap_or_else(|_| url.clone())
    }

    fn state(&self) -> Option<HistoryState> {
        self.entries.borrow()[self.index.get()].state.clone()
    }

    fn push_state(&self, state: HistoryState, url: &str) {
        let mut entries = self.entries.borrow_mut();
        let next = self.index.get() + 1;
        entries.truncate(next);
        entries.push(Entry {
            url: url.to_string(),
            state: Some(state),
        });
        self.index.set(next);
    }

    fn replace_state(&self, state: HistoryState, url: &str) {
        self.entries.borrow_mut()[self.index.get()] = Entry {
            url: url.to_string(),
            state: Some(state),
        };
    }

    fn go(&self, delta: i32) {
        let len = self.entries.borrow().len() as i64;
        let target = self.index.get() as i64 + i64::from(delta);
        if delta == 0 || !(0..len).contains(&target) {
            return;
        }
        self.index.set(target as usize);
        let state = self.state();
        self.popstates.borrow_mut().push_back(PopStateEvent { state });
    }

    fn assign(&self, url: &str) {
        self.reloads.borrow_mut().push(url.to_string());
        self.push_state_untagged(url);
    }
}

impl<F> HeadlessBrowser<F> {
    fn push_state_untagged(&self, url: &str) {
        let mut entries = self.entries.borrow_mut();
        let next = self.index.get() + 1;
        entries.truncate(next);
        entries.push(Entry {
            url: url.to_string(),
            state: None,
        });
        self.index.set(next);
    }
}

impl<F: Fetcher> Fetcher for HeadlessBrowser<F> {
    async fn fetch(&self, request: Request) -> Result<Response, FetchError> {
        crate::debug!("fetch"; "{:?} {}", request.method, request.url);
        self.requests.borrow_mut().push(request.clone());
        self.fetcher.fetch(request).await
    }
}
