//! Navigation controller.
//!
//! # Lifecycle
//!
//! ```text
//! click / popstate
//!   └─ navigate(target)
//!        ├─ transitionStart
//!        ├─ exit leg:    animationOutStart → push history → animationOutDone
//!        ├─ content leg: cache hit │ adopted preload │ fresh fetch
//!        ├─ join (both legs settle)
//!        ├─ render:      willReplaceContent → swap blocks → contentReplaced → pageView
//!        └─ entry leg:   animationInStart → animationInDone → transitionEnd
//! ```
//!
//! A failed content leg rolls back instead: the next popstate turns into a
//! full reload of the failed URL, and history steps back one entry.
//!
//! Navigations run as local tasks ([`tokio::task::spawn_local`]), so the
//! navigator must be driven from inside a [`tokio::task::LocalSet`].

mod input;
mod load;
mod render;

#[cfg(test)]
mod tests;

pub use input::{ClickOutcome, PopStateOutcome};
pub use load::PendingPage;

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use thiserror::Error;

use crate::animation::{AnimationResolver, TimingCapabilities};
use crate::cache::PageCache;
use crate::config::{ConfigError, GlideConfig, NavConfig};
use crate::core::{Event, NavState, Transition};
use crate::events::{EventBus, HandlerId, Payload};
use crate::extract::{Extractor, HtmlExtractor};
use crate::history::HistoryBridge;
use crate::host::{Host, Method, PopStateEvent};
use crate::log;
use crate::plugin::{Plugin, PluginContext, PluginRegistry};
use crate::selector::Selector;

/// Root class present while the navigator is enabled.
pub const ENABLED_CLASS: &str = "swup-enabled";

/// Why a navigation was rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("server error while loading `{url}`")]
    ServerError { url: String },

    #[error("`{url}` has no swappable containers")]
    MalformedPage { url: String },

    #[error("request to `{url}` failed: {reason}")]
    Network { url: String, reason: String },
}

impl NavError {
    /// URL the failed navigation targeted.
    pub fn url(&self) -> &str {
        match self {
            Self::ServerError { url } | Self::MalformedPage { url } | Self::Network { url, .. } => {
                url
            }
        }
    }
}

/// Where to navigate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavTarget {
    /// Address (pathname + query)
    pub url: String,
    pub custom_transition: Option<String>,
    pub method: Method,
    pub body: Option<String>,
}

impl NavTarget {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_transition(mut self, name: Option<String>) -> Self {
        self.custom_transition = name;
        self
    }

    /// Submit `body` with a POST instead of a GET.
    pub fn post(mut self, body: impl Into<String>) -> Self {
        self.method = Method::Post;
        self.body = Some(body.into());
        self
    }
}

type SkipPopState = Box<dyn Fn(&PopStateEvent) -> bool>;

struct Inner<H> {
    host: H,
    config: NavConfig,
    containers: Vec<Selector>,
    headers: Vec<(String, String)>,
    extractor: Box<dyn Extractor>,
    animations: AnimationResolver,
    history: HistoryBridge,
    events: EventBus,
    cache: RefCell<PageCache>,

    state: Cell<NavState>,
    /// Bumped per navigation; only the latest one may change `state`
    generation: Cell<u64>,
    transition: RefCell<Transition>,
    preload: RefCell<Option<PendingPage>>,
    scroll_target: RefCell<Option<String>>,
    /// One-shot: the next popstate reloads this URL instead
    reload_override: RefCell<Option<String>>,
    /// `None`: skip states the history bridge did not write
    skip_popstate: Option<SkipPopState>,

    plugins: RefCell<PluginRegistry>,
    pending_plugins: RefCell<Vec<Box<dyn Plugin>>>,
    enabled: Cell<bool>,
}

impl<H> Inner<H> {
    fn plugin_context(&self) -> PluginContext<'_> {
        PluginContext {
            events: &self.events,
            cache: &self.cache,
            config: &self.config,
        }
    }

    /// Start a navigation and return its generation.
    fn begin_navigation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    /// Phase change of navigation `generation`. Superseded navigations
    /// finish their work but no longer report state.
    fn set_state(&self, generation: u64, state: NavState) {
        if generation != self.generation.get() {
            return;
        }
        if self.state.replace(state) != state {
            crate::debug!("nav"; "state {}", state);
        }
    }
}

/// Soft-navigation controller over a [`Host`]. Cheap to clone.
pub struct Navigator<H> {
    inner: Rc<Inner<H>>,
}

impl<H> Clone for Navigator<H> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Configures a [`Navigator`].
pub struct NavigatorBuilder<H> {
    host: H,
    config: NavConfig,
    extractor: Box<dyn Extractor>,
    capabilities: Option<TimingCapabilities>,
    skip_popstate: Option<SkipPopState>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl<H: Host> NavigatorBuilder<H> {
    pub fn config(mut self, config: NavConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace content extraction (for servers that do not answer with HTML).
    pub fn extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Use fixed timing capabilities instead of detecting them from the host.
    pub fn capabilities(mut self, caps: TimingCapabilities) -> Self {
        self.capabilities = Some(caps);
        self
    }

    /// Decide which popstate events to ignore (true = ignore).
    pub fn skip_popstate(mut self, predicate: impl Fn(&PopStateEvent) -> bool + 'static) -> Self {
        self.skip_popstate = Some(Box::new(predicate));
        self
    }

    /// Plugin mounted on [`Navigator::enable`].
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn build(self) -> Result<Navigator<H>, ConfigError> {
        GlideConfig {
            nav: self.config.clone(),
            ..GlideConfig::default()
        }
        .validate()?;

        let containers = self
            .config
            .containers
            .iter()
            .map(|c| Selector::parse(c))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| ConfigError::Validation(err.to_string()))?;

        let caps = self
            .capabilities
            .unwrap_or_else(|| TimingCapabilities::detect(&self.host));

        Ok(Navigator {
            inner: Rc::new(Inner {
                headers: self.config.header_pairs(),
                host: self.host,
                config: self.config,
                containers,
                extractor: self.extractor,
                animations: AnimationResolver::new(caps),
                history: HistoryBridge::default(),
                events: EventBus::new(),
                cache: RefCell::new(PageCache::new()),
                state: Cell::new(NavState::Idle),
                generation: Cell::new(0),
                transition: RefCell::default(),
                preload: RefCell::new(None),
                scroll_target: RefCell::new(None),
                reload_override: RefCell::new(None),
                skip_popstate: self.skip_popstate,
                plugins: RefCell::new(PluginRegistry::new()),
                pending_plugins: RefCell::new(self.plugins),
                enabled: Cell::new(false),
            }),
        })
    }
}

// =============================================================================
// Navigator
// =============================================================================

impl<H: Host> Navigator<H> {
    pub fn builder(host: H) -> NavigatorBuilder<H> {
        NavigatorBuilder {
            host,
            config: NavConfig::default(),
            extractor: Box::new(HtmlExtractor),
            capabilities: None,
            skip_popstate: None,
            plugins: Vec::new(),
        }
    }

    /// Start intercepting: tag containers, mount plugins, tag the initial entry.
    pub fn enable(&self) {
        let inner = &self.inner;
        if inner.enabled.replace(true) {
            return;
        }
        let host = &inner.host;

        let mut next = 0;
        for selector in &inner.config.containers {
            let found = host.mark_blocks(selector, next);
            if found == 0 {
                log!("warning"; "container {} not found on page", selector);
            }
            next += found;
        }

        let pending: Vec<_> = inner.pending_plugins.borrow_mut().drain(..).collect();
        for plugin in pending {
            inner
                .plugins
                .borrow_mut()
                .use_plugin(plugin, inner.plugin_context());
        }

        inner.history.replace(host, &host.location());

        inner.events.trigger(Event::Enabled, Payload::None);
        host.add_class(ENABLED_CLASS);
        inner.events.trigger(Event::PageView, Payload::None);
        crate::debug!("nav"; "enabled with {} blocks", next);
    }

    /// Stop intercepting and drop all state.
    pub fn destroy(&self) {
        let inner = &self.inner;
        if !inner.enabled.replace(false) {
            return;
        }

        inner.cache.borrow_mut().clear();
        inner.plugins.borrow_mut().unuse_all(inner.plugin_context());
        inner.host.unmark_blocks();
        inner.events.off_all();
        inner.events.trigger(Event::Disabled, Payload::None);
        inner.host.remove_class(ENABLED_CLASS);
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.get()
    }

    pub fn host(&self) -> &H {
        &self.inner.host
    }

    pub fn config(&self) -> &NavConfig {
        &self.inner.config
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn on(
        &self,
        event: Event,
        handler: impl Fn(&Payload) -> anyhow::Result<()> + 'static,
    ) -> HandlerId {
        self.inner.events.on(event, handler)
    }

    pub fn off(&self, event: Event, id: HandlerId) -> bool {
        self.inner.events.off(event, id)
    }

    pub fn cache(&self) -> Ref<'_, PageCache> {
        self.inner.cache.borrow()
    }

    /// Drop one cached page.
    pub fn evict(&self, url: &str) {
        self.inner.cache.borrow_mut().evict(url);
    }

    pub fn state(&self) -> NavState {
        self.inner.state.get()
    }

    pub fn transition(&self) -> Transition {
        self.inner.transition.borrow().clone()
    }

    /// Route of the in-flight preload, if any.
    pub fn preload_route(&self) -> Option<String> {
        self.inner
            .preload
            .borrow()
            .as_ref()
            .map(|p| p.route().to_string())
    }

    // =========================================================================
    // Plugins
    // =========================================================================

    /// Mount a plugin now. Returns false if the name is taken.
    pub fn use_plugin(&self, plugin: impl Plugin + 'static) -> bool {
        let inner = &self.inner;
        inner
            .plugins
            .borrow_mut()
            .use_plugin(Box::new(plugin), inner.plugin_context())
    }

    pub fn unuse_plugin(&self, name: &str) -> bool {
        let inner = &self.inner;
        inner
            .plugins
            .borrow_mut()
            .unuse_plugin(name, inner.plugin_context())
            .is_some()
    }

    pub fn has_plugin(&self, name: &str) -> bool {
        self.inner.plugins.borrow().find_plugin(name).is_some()
    }

    pub fn plugin_names(&self) -> Vec<String> {
        self.inner
            .plugins
            .borrow()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
