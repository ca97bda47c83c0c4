//! Event bus: ordered, synchronous dispatch of lifecycle events.
//!
//! Handlers run in registration order. A handler that returns `Err` or
//! panics is logged and skipped; the remaining handlers still run. After the
//! local handlers, a [`Notice`] is broadcast so observers that never
//! registered a handler (UI layers, the CLI printer) can follow along.

use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use anyhow::Result;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::core::Event;
use crate::host::{ClickEvent, PopStateEvent};
use crate::log;

/// Broadcast buffer for host-visible notices
const NOTICE_BUFFER: usize = 256;

/// Data passed along with an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Payload {
    #[default]
    None,
    /// Whether the navigation came from a popstate
    Popstate(bool),
    Click(ClickEvent),
    PopState(PopStateEvent),
}

/// Host-visible notification raised after local handlers ran.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub event: Event,
    pub payload: Payload,
}

/// Event handler callback.
pub type Handler = Rc<dyn Fn(&Payload) -> Result<()>>;

/// Identity of a registered handler (for [`EventBus::off`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Registry of handlers per event.
pub struct EventBus {
    handlers: RefCell<FxHashMap<Event, Vec<(HandlerId, Handler)>>>,
    next_id: Cell<u64>,
    notices: broadcast::Sender<Notice>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let handlers = Event::ALL.into_iter().map(|e| (e, Vec::new())).collect();
        let (notices, _) = broadcast::channel(NOTICE_BUFFER);
        Self {
            handlers: RefCell::new(handlers),
            next_id: Cell::new(1),
            notices,
        }
    }

    /// Register a handler.
    pub fn on(&self, event: Event, handler: impl Fn(&Payload) -> Result<()> + 'static) -> HandlerId {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers
            .borrow_mut()
            .entry(event)
            .or_default()
            .push((id, Rc::new(handler)));
        id
    }

    /// Register a handler by event name.
    ///
    /// Unknown names are reported and ignored.
    pub fn on_named(
        &self,
        name: &str,
        handler: impl Fn(&Payload) -> Result<()> + 'static,
    ) -> Option<HandlerId> {
        match name.parse::<Event>() {
            Ok(event) => Some(self.on(event, handler)),
            Err(e) => {
                log!("warning"; "{}", e);
                None
            }
        }
    }

    /// Remove one handler. Returns false if it was not registered.
    pub fn off(&self, event: Event, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let Some(list) = handlers.get_mut(&event) else {
            return false;
        };
        let before = list.len();
        list.retain(|(h, _)| *h != id);
        list.len() != before
    }

    /// Remove every handler.
    pub fn off_all(&self) {
        for list in self.handlers.borrow_mut().values_mut() {
            list.clear();
        }
    }

    /// Number of handlers registered for an event.
    pub fn count(&self, event: Event) -> usize {
        self.handlers.borrow().get(&event).map_or(0, Vec::len)
    }

    /// Subscribe to host-visible notices.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.notices.subscribe()
    }

    /// Run every handler of `event`, then broadcast the notice.
    pub fn trigger(&self, event: Event, payload: Payload) {
        // Snapshot so handlers may (un)register while we dispatch
        let snapshot: Vec<Handler> = self
            .handlers
            .borrow()
            .get(&event)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        for handler in snapshot {
            match catch_unwind(AssertUnwindSafe(|| handler(&payload))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => log!("error"; "{} handler failed: {:#}", event, e),
                Err(_) => log!("error"; "{} handler panicked", event),
            }
        }

        // No subscribers is fine
        let _ = self.notices.send(Notice { event, payload });
    }
}
