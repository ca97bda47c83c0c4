//! Link clicks and popstate events.

use tokio::task::JoinHandle;

use super::{NavError, NavTarget, Navigator};
use crate::core::{Event, Link};
use crate::events::Payload;
use crate::host::{ClickEvent, Host, PopStateEvent};
use crate::log;

/// What a click turned into.
#[derive(Debug)]
pub enum ClickOutcome {
    /// Navigator disabled, or not a primary-button click
    Ignored,
    /// Modifier held: left to the browser
    NewTab,
    SamePage,
    /// Same page with a fragment; `found` tells whether the anchor exists
    SamePageWithHash { found: bool },
    Navigating(JoinHandle<Result<(), NavError>>),
}

/// What a popstate turned into.
#[derive(Debug)]
pub enum PopStateOutcome {
    Ignored,
    /// A previous navigation failed; the browser reloads this URL instead
    Reload(String),
    Navigating(JoinHandle<Result<(), NavError>>),
}

impl<H: Host> Navigator<H> {
    /// Handle a click on an interceptable link.
    pub fn handle_click(&self, click: &ClickEvent) -> ClickOutcome {
        let inner = &self.inner;
        if !inner.enabled.get() {
            return ClickOutcome::Ignored;
        }
        if click.opens_new_tab() {
            inner
                .events
                .trigger(Event::OpenPageInNewTab, Payload::Click(click.clone()));
            return ClickOutcome::NewTab;
        }
        // Some browsers report clicks for every button
        if click.button != 0 {
            return ClickOutcome::Ignored;
        }

        inner
            .events
            .trigger(Event::ClickLink, Payload::Click(click.clone()));

        let host = &inner.host;
        let location = host.location();
        let link = Link::resolve_str(&click.anchor.href, &location)
            .with_alt_href(click.anchor.alt_href.as_deref());
        let hash = link.hash().to_string();

        if link.address() != Link::parse(&location).address() {
            if !hash.is_empty() {
                *inner.scroll_target.borrow_mut() = Some(hash);
            }
            let target = NavTarget::new(link.address())
                .with_transition(click.anchor.transition.clone());
            return ClickOutcome::Navigating(self.spawn_navigate(target, false));
        }

        if hash.is_empty() {
            inner
                .events
                .trigger(Event::SamePage, Payload::Click(click.clone()));
            return ClickOutcome::SamePage;
        }

        inner
            .events
            .trigger(Event::SamePageWithHash, Payload::Click(click.clone()));
        match self.anchor_element(&hash) {
            Some(element) => {
                inner
                    .history
                    .replace(host, &format!("{}{}", link.address(), hash));
                host.scroll_to(element);
                ClickOutcome::SamePageWithHash { found: true }
            }
            None => {
                log!("warning"; "element for offset not found ({})", hash);
                ClickOutcome::SamePageWithHash { found: false }
            }
        }
    }

    /// Handle back/forward navigation.
    pub fn handle_popstate(&self, event: &PopStateEvent) -> PopStateOutcome {
        let inner = &self.inner;
        if !inner.enabled.get() {
            return PopStateOutcome::Ignored;
        }

        let reload = inner.reload_override.borrow_mut().take();
        if let Some(url) = reload {
            log!("nav"; "reloading {}", url);
            inner.host.assign(&url);
            return PopStateOutcome::Reload(url);
        }
        let skip = match &inner.skip_popstate {
            Some(predicate) => predicate(event),
            None => !inner.history.is_own(event.state.as_ref()),
        };
        if skip {
            crate::debug!("nav"; "ignoring foreign popstate");
            return PopStateOutcome::Ignored;
        }

        let host = &inner.host;
        let location = host.location();
        let link = match &event.state {
            Some(state) => Link::resolve_str(&state.url, &location),
            None => Link::parse(&Link::parse(&location).path()),
        };
        if !link.hash().is_empty() {
            *inner.scroll_target.borrow_mut() = Some(link.hash().to_string());
        }

        inner
            .events
            .trigger(Event::PopState, Payload::PopState(event.clone()));

        if !inner.config.animate_history_browsing {
            host.remove_class("is-animating");
            self.cleanup_markers();
        }

        PopStateOutcome::Navigating(self.spawn_navigate(NavTarget::new(link.address()), true))
    }
}
