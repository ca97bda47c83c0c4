//! Render step and entry phase.

use std::rc::Rc;

use percent_encoding::percent_decode_str;

use super::Navigator;
use crate::cache::Page;
use crate::core::{Event, Link, NavState};
use crate::events::Payload;
use crate::host::{ElementId, Host};
use crate::log;

/// Root classes that only live for the duration of a navigation.
const TRANSIENT_CLASSES: &[&str] = &[
    "is-changing",
    "is-rendering",
    "is-popstate",
    "is-leaving",
    "is-animating",
];

impl<H: Host> Navigator<H> {
    /// Swap the page in, then run the entry phase.
    pub(super) async fn render(&self, page: Rc<Page>, popstate: bool, generation: u64) {
        let inner = &self.inner;
        let host = &inner.host;
        inner.set_state(generation, NavState::Swapping);

        host.remove_class("is-leaving");

        // Redirected: the address bar shows where the content came from
        let served = Link::parse(&page.response_url).path();
        if Link::parse(&host.location()).path() != served {
            inner.history.replace(host, &served);
            inner.cache.borrow_mut().put(page.with_url(served));
        }

        let skip_entry = popstate && !inner.config.animate_history_browsing;
        if !skip_entry {
            host.add_class("is-rendering");
        }

        inner
            .events
            .trigger(Event::WillReplaceContent, Payload::Popstate(popstate));
        for (index, block) in page.blocks.iter().enumerate() {
            if !host.replace_block(index, block) {
                log!("warning"; "no block {} to replace on current page", index);
            }
        }
        host.set_title(&page.title);
        inner
            .events
            .trigger(Event::ContentReplaced, Payload::Popstate(popstate));
        inner
            .events
            .trigger(Event::PageView, Payload::Popstate(popstate));

        if !inner.config.cache {
            inner.cache.borrow_mut().clear();
        }

        let target = inner.scroll_target.borrow_mut().take();
        if let Some(element) = target.and_then(|hash| self.anchor_element(&hash)) {
            host.scroll_to(element);
        }

        self.enter(popstate, skip_entry, generation).await;
    }

    /// Entry phase. `skip` ends the transition without waiting.
    async fn enter(&self, popstate: bool, skip: bool, generation: u64) {
        let inner = &self.inner;
        let host = &inner.host;

        if skip {
            inner
                .events
                .trigger(Event::TransitionEnd, Payload::Popstate(popstate));
            self.cleanup_markers();
            inner.set_state(generation, NavState::Idle);
            return;
        }

        inner.set_state(generation, NavState::AnimatingIn);
        // Let the renderer see the swapped content before animating it in
        host.next_frame().await;
        inner.events.trigger(Event::AnimationInStart, Payload::None);
        host.remove_class("is-animating");

        inner
            .animations
            .wait_all(host, &inner.config.animation_selector)
            .await;

        inner.events.trigger(Event::AnimationInDone, Payload::None);
        inner
            .events
            .trigger(Event::TransitionEnd, Payload::Popstate(popstate));
        self.cleanup_markers();
        inner.set_state(generation, NavState::Idle);
    }

    /// Remove every transient root class, `to-*` included.
    pub(super) fn cleanup_markers(&self) {
        let host = &self.inner.host;
        for class in host.classes() {
            if class.starts_with("to-") || TRANSIENT_CLASSES.contains(&class.as_str()) {
                host.remove_class(&class);
            }
        }
    }

    /// Element a fragment points at: an id first, then `<a name>`.
    pub(super) fn anchor_element(&self, hash: &str) -> Option<ElementId> {
        let name = hash.strip_prefix('#').unwrap_or(hash);
        if name.is_empty() {
            return None;
        }
        let name = percent_decode_str(name).decode_utf8_lossy();
        self.inner.host.find_anchor(&name)
    }
}
