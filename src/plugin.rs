//! Plugin contract and registry.
//!
//! Plugins extend a navigator by registering event handlers (and reading the
//! cache) when mounted. Each plugin has a unique name; the registry refuses a
//! second plugin with a name already in use.

use std::cell::RefCell;

use crate::cache::PageCache;
use crate::config::NavConfig;
use crate::events::EventBus;
use crate::log;

/// What a plugin may touch while mounted.
#[derive(Clone, Copy)]
pub struct PluginContext<'a> {
    pub events: &'a EventBus,
    pub cache: &'a RefCell<PageCache>,
    pub config: &'a NavConfig,
}

/// A navigator extension.
pub trait Plugin {
    /// Unique name, used by [`PluginRegistry::unuse_plugin`] and lookups.
    fn name(&self) -> &str;

    fn mount(&mut self, ctx: PluginContext<'_>);

    fn unmount(&mut self, ctx: PluginContext<'_>);

    /// Runs right before [`Plugin::mount`].
    fn before_mount(&mut self) {}

    /// Runs right after [`Plugin::unmount`].
    fn after_unmount(&mut self) {}
}

/// Mounted plugins, in mount order.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount a plugin. Returns false (and drops it) if the name is taken.
    pub fn use_plugin(&mut self, mut plugin: Box<dyn Plugin>, ctx: PluginContext<'_>) -> bool {
        if self.find_plugin(plugin.name()).is_some() {
            log!("warning"; "plugin {} is already mounted", plugin.name());
            return false;
        }

        plugin.before_mount();
        plugin.mount(ctx);
        crate::debug!("plugin"; "mounted {}", plugin.name());
        self.plugins.push(plugin);
        true
    }

    /// Unmount a plugin by name and hand it back.
    pub fn unuse_plugin(&mut self, name: &str, ctx: PluginContext<'_>) -> Option<Box<dyn Plugin>> {
        let Some(index) = self.plugins.iter().position(|p| p.name() == name) else {
            log!("warning"; "no such plugin: {}", name);
            return None;
        };

        let mut plugin = self.plugins.remove(index);
        plugin.unmount(ctx);
        plugin.after_unmount();
        Some(plugin)
    }

    /// Unmount everything, most recently mounted first.
    pub fn unuse_all(&mut self, ctx: PluginContext<'_>) {
        while let Some(mut plugin) = self.plugins.pop() {
            plugin.unmount(ctx);
            plugin.after_unmount();
        }
    }

    pub fn find_plugin(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Event;
    use crate::events::HandlerId;
    use std::rc::Rc;

    /// Counts page views while mounted.
    struct Counter {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
        handler: Option<HandlerId>,
    }

    impl Counter {
        fn new(name: &'static str, log: &Rc<RefCell<Vec<String>>>) -> Box<Self> {
            Box::new(Self {
                name,
                log: log.clone(),
                handler: None,
            })
        }
    }

    impl Plugin for Counter {
        fn name(&self) -> &str {
            self.name
        }

        fn before_mount(&mut self) {
            self.log.borrow_mut().push(format!("{}:before", self.name));
        }

        fn mount(&mut self, ctx: PluginContext<'_>) {
            self.log.borrow_mut().push(format!("{}:mount", self.name));
            let log = self.log.clone();
            self.handler = Some(ctx.events.on(Event::PageView, move |_| {
                log.borrow_mut().push("view".into());
                Ok(())
            }));
        }

        fn unmount(&mut self, ctx: PluginContext<'_>) {
            if let Some(id) = self.handler.take() {
                ctx.events.off(Event::PageView, id);
            }
            self.log.borrow_mut().push(format!("{}:unmount", self.name));
        }

        fn after_unmount(&mut self) {
            self.log.borrow_mut().push(format!("{}:after", self.name));
        }
    }

    struct Fixture {
        events: EventBus,
        cache: RefCell<PageCache>,
        config: NavConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                events: EventBus::new(),
                cache: RefCell::new(PageCache::new()),
                config: NavConfig::default(),
            }
        }

        fn ctx(&self) -> PluginContext<'_> {
            PluginContext {
                events: &self.events,
                cache: &self.cache,
                config: &self.config,
            }
        }
    }

    #[test]
    fn test_mount_lifecycle() {
        let fx = Fixture::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = PluginRegistry::new();

        assert!(registry.use_plugin(Counter::new("counter", &log), fx.ctx()));
        fx.events.trigger(Event::PageView, Default::default());
        assert!(registry.find_plugin("counter").is_some());

        let removed = registry.unuse_plugin("counter", fx.ctx());
        assert!(removed.is_some());
        fx.events.trigger(Event::PageView, Default::default());

        assert_eq!(
            *log.borrow(),
            [
                "counter:before",
                "counter:mount",
                "view",
                "counter:unmount",
                "counter:after"
            ]
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let fx = Fixture::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = PluginRegistry::new();

        assert!(registry.use_plugin(Counter::new("counter", &log), fx.ctx()));
        assert!(!registry.use_plugin(Counter::new("counter", &log), fx.ctx()));

        assert_eq!(registry.len(), 1);
        assert_eq!(fx.events.count(Event::PageView), 1);
    }

    #[test]
    fn test_unuse_unknown_and_all() {
        let fx = Fixture::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = PluginRegistry::new();

        assert!(registry.unuse_plugin("missing", fx.ctx()).is_none());

        registry.use_plugin(Counter::new("a", &log), fx.ctx());
        registry.use_plugin(Counter::new("b", &log), fx.ctx());
        assert_eq!(registry.names(), ["a", "b"]);

        log.borrow_mut().clear();
        registry.unuse_all(fx.ctx());
        assert_eq!(
            *log.borrow(),
            ["b:unmount", "b:after", "a:unmount", "a:after"]
        );
        assert_eq!(fx.events.count(Event::PageView), 0);
    }
}
