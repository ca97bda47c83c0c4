//! Loading a page: the navigate sequence, the content leg and preloads.

use std::rc::Rc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::{Inner, NavError, NavTarget, Navigator};
use crate::cache::Page;
use crate::core::{Event, Link, NavState, Transition, classify, normalize_url};
use crate::events::Payload;
use crate::host::{Host, Request};
use crate::log;

type PageResult = Result<Rc<Page>, NavError>;

/// A page request that may still be in flight.
///
/// Clones observe the same request; the request itself runs to completion
/// whether or not anybody waits for it.
#[derive(Debug, Clone)]
pub struct PendingPage {
    route: String,
    rx: watch::Receiver<Option<PageResult>>,
}

impl PendingPage {
    fn settled(route: String, result: PageResult) -> Self {
        let (_, rx) = watch::channel(Some(result));
        Self { route, rx }
    }

    /// Normalized address being loaded.
    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn is_settled(&self) -> bool {
        self.rx.borrow().is_some()
    }

    pub async fn wait(mut self) -> PageResult {
        let settled = match self.rx.wait_for(Option::is_some).await {
            Ok(value) => (*value).clone(),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| {
            Err(NavError::Network {
                url: self.route.clone(),
                reason: "request was dropped".into(),
            })
        })
    }
}

impl<H: Host> Navigator<H> {
    /// Navigate in the background. See [`Navigator::navigate`].
    pub fn spawn_navigate(&self, target: NavTarget, popstate: bool) -> JoinHandle<Result<(), NavError>> {
        let nav = self.clone();
        tokio::task::spawn_local(async move { nav.navigate(target, popstate).await })
    }

    /// Run one full navigation to `target`.
    ///
    /// Resolves after the entry animations finished (or right after the
    /// rollback was started, on failure).
    pub async fn navigate(&self, target: NavTarget, popstate: bool) -> Result<(), NavError> {
        let inner = &self.inner;
        let host = &inner.host;
        let url = normalize_url(&target.url);
        let generation = inner.begin_navigation();

        inner.events.trigger(Event::TransitionStart, Payload::Popstate(popstate));

        let from = Link::parse(&host.location()).path();
        *inner.transition.borrow_mut() =
            Transition::new(from, url.clone(), target.custom_transition.clone());
        if let Some(custom) = &target.custom_transition {
            host.add_class(&format!("to-{}", classify(custom)));
        }
        log!("nav"; "{}{}", url, if popstate { " (popstate)" } else { "" });

        let animate_out = !popstate || inner.config.animate_history_browsing;
        let exit = async {
            if animate_out {
                self.animate_out(&url, popstate).await;
            } else {
                inner.events.trigger(Event::AnimationSkipped, Payload::None);
            }
            if inner.state.get() == NavState::AnimatingOut {
                inner.set_state(generation, NavState::Fetching);
            }
        };
        inner.set_state(generation, if animate_out {
            NavState::AnimatingOut
        } else {
            NavState::Fetching
        });

        let ((), content) = tokio::join!(exit, self.resolve_content(&url, target));

        match content {
            Ok(page) => {
                inner.preload.borrow_mut().take();
                self.render(page, popstate, generation).await;
                Ok(())
            }
            Err(err) => {
                self.roll_back(&err, generation);
                Err(err)
            }
        }
    }

    /// Exit phase: markers, optimistic history push, exit animations.
    async fn animate_out(&self, url: &str, popstate: bool) {
        let inner = &self.inner;
        let host = &inner.host;

        inner.events.trigger(Event::AnimationOutStart, Payload::None);
        host.add_class("is-changing");
        host.add_class("is-leaving");
        host.add_class("is-animating");
        if popstate {
            host.add_class("is-popstate");
        }
        host.add_class(&format!("to-{}", classify(url)));

        if !popstate {
            let record = match inner.scroll_target.borrow().as_deref() {
                Some(hash) => format!("{url}{hash}"),
                None => url.to_string(),
            };
            inner.history.push(host, &record);
        }

        inner
            .animations
            .wait_all(host, &inner.config.animation_selector)
            .await;
        inner.events.trigger(Event::AnimationOutDone, Payload::None);
    }

    /// Content leg: cache, then an in-flight preload, then a fresh request.
    async fn resolve_content(&self, url: &str, target: NavTarget) -> PageResult {
        let inner = &self.inner;

        let cached = inner.cache.borrow().get(url);
        if let Some(page) = cached {
            inner
                .events
                .trigger(Event::PageRetrievedFromCache, Payload::None);
            return Ok(page);
        }

        let adopted = inner
            .preload
            .borrow()
            .as_ref()
            .filter(|p| p.route() == url)
            .cloned();
        let pending = match adopted {
            Some(pending) => {
                crate::debug!("nav"; "adopting in-flight request for {}", url);
                pending
            }
            None => self.start_request(url.to_string(), target),
        };
        pending.wait().await
    }

    /// Issue a request in the background and register it as the preload.
    fn start_request(&self, route: String, target: NavTarget) -> PendingPage {
        let (tx, rx) = watch::channel(None);
        let pending = PendingPage {
            route: route.clone(),
            rx,
        };
        *self.inner.preload.borrow_mut() = Some(pending.clone());

        let inner = self.inner.clone();
        tokio::task::spawn_local(async move {
            let result = load_page(&inner, route, target).await;
            let _ = tx.send(Some(result));
        });
        pending
    }

    /// Fetch `url` ahead of a navigation.
    ///
    /// A later navigation to the same address adopts the request instead of
    /// issuing a second one.
    pub fn preload(&self, url: &str) -> PendingPage {
        let route = normalize_url(url);

        let cached = self.inner.cache.borrow().get(&route);
        if let Some(page) = cached {
            return PendingPage::settled(route, Ok(page));
        }
        let in_flight = self
            .inner
            .preload
            .borrow()
            .as_ref()
            .filter(|p| p.route() == route)
            .cloned();
        match in_flight {
            Some(pending) => pending,
            None => self.start_request(route.clone(), NavTarget::new(route)),
        }
    }

    /// Undo the optimistic history push; the resulting popstate reloads `err.url()`.
    fn roll_back(&self, err: &NavError, generation: u64) {
        let inner = &self.inner;
        log!("error"; "{}", err);

        {
            let mut preload = inner.preload.borrow_mut();
            if preload.as_ref().is_some_and(|p| p.route() == err.url()) {
                *preload = None;
            }
        }
        *inner.reload_override.borrow_mut() = Some(err.url().to_string());
        self.cleanup_markers();
        inner.set_state(generation, NavState::Idle);
        inner.host.go(-1);
    }
}

/// Fetch and extract one page, caching it on success.
async fn load_page<H: Host>(inner: &Inner<H>, url: String, target: NavTarget) -> PageResult {
    let request = Request {
        url: url.clone(),
        method: target.method,
        headers: inner.headers.clone(),
        body: target.body,
    };

    let response = match inner.host.fetch(request).await {
        Ok(response) => response,
        Err(err) => {
            return Err(NavError::Network {
                url,
                reason: err.reason,
            });
        }
    };

    if response.status == 500 {
        inner.events.trigger(Event::ServerError, Payload::None);
        return Err(NavError::ServerError { url });
    }

    let data = inner
        .extractor
        .extract(&response.body, &inner.containers)
        .filter(|data| !data.blocks.is_empty());
    let Some(data) = data else {
        log!("warning"; "received page is invalid: {}", url);
        return Err(NavError::MalformedPage { url });
    };

    let page = Page {
        response_url: response.url.unwrap_or_else(|| url.clone()),
        url,
        title: data.title,
        blocks: data.blocks,
        custom_transition: target.custom_transition,
    };
    let page = inner.cache.borrow_mut().put(page);
    inner.events.trigger(Event::PageLoaded, Payload::None);
    Ok(page)
}
