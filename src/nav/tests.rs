use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use anyhow::bail;
use tokio::task::LocalSet;
use tokio::time::Instant;

use super::*;
use crate::events::Notice;
use crate::headless::{HeadlessBrowser, StaticFetcher};
use crate::host::{Anchor, ClickEvent, Dom, HistoryApi, Modifiers};

type Browser = HeadlessBrowser<StaticFetcher>;

const LATENCY: Duration = Duration::from_millis(50);

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<html><head><title>{title}</title></head><body>
<main id="swup" class="transition-fade" style="transition-duration: 0.2s">{body}</main>
<section id="section2">more</section>
</body></html>"#
    )
}

fn site() -> StaticFetcher {
    StaticFetcher::new()
        .page("/", page("Home", "home"))
        .page("/about?x=1", page("About", "about"))
        .page("/form", page("Thanks", "sent"))
        .page("/docs/a", page("Docs", "docs"))
        .status("/broken", 500, "")
        .page("/empty", "<html><body><p>no containers</p></body></html>")
        .unreachable("/down", "connection refused")
        .redirect("/old", "/new", page("New", "moved"))
        .with_latency(LATENCY)
}

fn builder() -> NavigatorBuilder<Browser> {
    let host = HeadlessBrowser::open("http://localhost/", &page("Home", "home"), site()).unwrap();
    Navigator::builder(host)
}

fn navigator() -> Navigator<Browser> {
    let nav = builder().build().unwrap();
    nav.enable();
    nav
}

fn record(nav: &Navigator<Browser>) -> Rc<RefCell<Vec<Event>>> {
    let log: Rc<RefCell<Vec<Event>>> = Rc::default();
    for event in Event::ALL {
        let log = log.clone();
        nav.on(event, move |_| {
            log.borrow_mut().push(event);
            Ok(())
        });
    }
    log
}

fn click(href: &str) -> ClickEvent {
    ClickEvent::primary(Anchor::new(href))
}

async fn local<F: Future>(f: F) -> F::Output {
    LocalSet::new().run_until(f).await
}

async fn follow(nav: &Navigator<Browser>, href: &str) -> Result<(), NavError> {
    match nav.handle_click(&click(href)) {
        ClickOutcome::Navigating(handle) => handle.await.unwrap(),
        other => panic!("expected navigation, got {other:?}"),
    }
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<Notice>) -> Vec<Notice> {
    std::iter::from_fn(|| rx.try_recv().ok()).collect()
}

// =============================================================================
// Click navigation
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_click_runs_full_lifecycle() {
    local(async {
        let nav = navigator();
        let log = record(&nav);

        follow(&nav, "/about?x=1").await.unwrap();

        assert_eq!(
            *log.borrow(),
            [
                Event::ClickLink,
                Event::TransitionStart,
                Event::AnimationOutStart,
                Event::PageLoaded,
                Event::AnimationOutDone,
                Event::WillReplaceContent,
                Event::ContentReplaced,
                Event::PageView,
                Event::AnimationInStart,
                Event::AnimationInDone,
                Event::TransitionEnd,
            ]
        );

        let host = nav.host();
        assert_eq!(host.location(), "http://localhost/about?x=1");
        assert_eq!(host.history_len(), 2);
        let (url, state) = host.history_entry(1).unwrap();
        assert_eq!(url, "/about?x=1");
        assert!(state.unwrap().is_from(crate::history::SOURCE));

        assert_eq!(host.title(), "About");
        assert!(host.block_html(0).unwrap().contains("about"));
        assert_eq!(host.classes(), [ENABLED_CLASS]);
        assert_eq!(nav.state(), NavState::Idle);
        assert!(nav.cache().has("/about?x=1"));
        assert_eq!(
            nav.transition(),
            Transition::new("/", "/about?x=1", None)
        );
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_request_carries_configured_headers() {
    local(async {
        let nav = navigator();
        follow(&nav, "/about?x=1").await.unwrap();

        let requests = nav.host().requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "/about?x=1");
        assert_eq!(requests[0].method, Method::Get);
        assert!(
            requests[0]
                .headers
                .contains(&("X-Requested-With".to_string(), "swup".to_string()))
        );
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_revisit_is_served_from_cache() {
    local(async {
        let nav = navigator();
        follow(&nav, "/about?x=1").await.unwrap();
        follow(&nav, "/").await.unwrap();

        let log = record(&nav);
        follow(&nav, "http://localhost/about?x=1").await.unwrap();

        assert!(log.borrow().contains(&Event::PageRetrievedFromCache));
        assert!(!log.borrow().contains(&Event::PageLoaded));
        assert_eq!(nav.host().requests().len(), 2);
        assert_eq!(nav.host().title(), "About");
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_transition_start_first_and_end_last() {
    local(async {
        let nav = navigator();
        let mut notices = nav.events().subscribe();
        follow(&nav, "/about?x=1").await.unwrap();

        let notices = drain(&mut notices);
        let events: Vec<_> = notices.iter().map(|n| n.event).collect();
        let start = events.iter().position(|e| *e == Event::TransitionStart).unwrap();
        assert_eq!(events[..start], [Event::ClickLink]);
        assert_eq!(events.last(), Some(&Event::TransitionEnd));
        assert_eq!(
            events.iter().filter(|e| **e == Event::TransitionEnd).count(),
            1
        );
        assert_eq!(notices[start].payload, Payload::Popstate(false));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_double_slash_path_keeps_first_segment() {
    local(async {
        let nav = navigator();
        follow(&nav, "http://localhost//docs/a").await.unwrap();

        assert_eq!(nav.host().requests()[0].url, "/docs/a");
        assert_eq!(nav.host().location(), "http://localhost/docs/a");
        assert_eq!(nav.host().title(), "Docs");
        assert!(nav.cache().has("/docs/a"));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_custom_transition_markers() {
    local(async {
        let nav = navigator();
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        {
            let seen = seen.clone();
            let probe = nav.clone();
            nav.on(Event::WillReplaceContent, move |_| {
                *seen.borrow_mut() = probe.host().classes();
                Ok(())
            });
        }

        let anchor = Anchor::new("/about?x=1").with_transition("Slide Left");
        let ClickOutcome::Navigating(handle) = nav.handle_click(&ClickEvent::primary(anchor))
        else {
            panic!("expected navigation");
        };
        handle.await.unwrap().unwrap();

        let seen = seen.borrow();
        for class in ["to-slide-left", "is-changing", "is-animating", "is-rendering"] {
            assert!(seen.iter().any(|c| c == class), "missing {class} in {seen:?}");
        }
        assert!(!seen.iter().any(|c| c == "is-leaving"));
        assert_eq!(nav.transition().custom.as_deref(), Some("Slide Left"));
        assert!(!nav.host().classes().iter().any(|c| c.starts_with("to-")));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_post_target() {
    local(async {
        let nav = navigator();
        nav.navigate(NavTarget::new("/form").post("name=glide"), false)
            .await
            .unwrap();

        let requests = nav.host().requests();
        let request = &requests[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body.as_deref(), Some("name=glide"));
        assert_eq!(nav.host().title(), "Thanks");
    })
    .await;
}

// =============================================================================
// Same page / ignored clicks
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_same_page_click() {
    local(async {
        let nav = navigator();
        let log = record(&nav);

        assert!(matches!(nav.handle_click(&click("/")), ClickOutcome::SamePage));
        assert_eq!(*log.borrow(), [Event::ClickLink, Event::SamePage]);
        assert_eq!(nav.host().history_len(), 1);
        assert!(nav.host().requests().is_empty());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_same_page_with_hash() {
    local(async {
        let nav = navigator();
        let log = record(&nav);
        let host = nav.host();

        assert!(matches!(
            nav.handle_click(&click("/#section2")),
            ClickOutcome::SamePageWithHash { found: true }
        ));
        assert_eq!(host.history_len(), 1);
        let (url, state) = host.history_entry(0).unwrap();
        assert_eq!(url, "/#section2");
        assert_eq!(state.unwrap().url, "/#section2");
        assert_eq!(host.scrolled().len(), 1);

        assert!(matches!(
            nav.handle_click(&click("#nowhere")),
            ClickOutcome::SamePageWithHash { found: false }
        ));
        assert_eq!(host.history_entry(0).unwrap().0, "/#section2");
        assert_eq!(host.scrolled().len(), 1);

        assert_eq!(
            *log.borrow(),
            [
                Event::ClickLink,
                Event::SamePageWithHash,
                Event::ClickLink,
                Event::SamePageWithHash
            ]
        );
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_modified_and_secondary_clicks() {
    local(async {
        let nav = navigator();
        let log = record(&nav);

        let mut ctrl = click("/about?x=1");
        ctrl.modifiers = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        assert!(matches!(nav.handle_click(&ctrl), ClickOutcome::NewTab));

        let mut middle = click("/about?x=1");
        middle.button = 1;
        assert!(matches!(nav.handle_click(&middle), ClickOutcome::Ignored));

        assert_eq!(*log.borrow(), [Event::OpenPageInNewTab]);
        assert!(nav.host().requests().is_empty());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_hash_on_other_page_is_scrolled_after_render() {
    local(async {
        let nav = navigator();
        follow(&nav, "/about?x=1#section2").await.unwrap();

        let host = nav.host();
        assert_eq!(host.history_entry(1).unwrap().0, "/about?x=1#section2");
        assert_eq!(host.scrolled().len(), 1);
    })
    .await;
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_server_error_rolls_back() {
    local(async {
        let nav = navigator();
        let log = record(&nav);

        let err = follow(&nav, "/broken").await.unwrap_err();
        assert_eq!(err, NavError::ServerError { url: "/broken".into() });

        assert!(log.borrow().contains(&Event::ServerError));
        assert!(!log.borrow().contains(&Event::TransitionEnd));
        assert!(!nav.cache().has("/broken"));

        // pushed, then stepped back exactly once
        let host = nav.host();
        assert_eq!(host.history_len(), 2);
        assert_eq!(host.history_index(), 0);

        // the popstate caused by the rollback reloads the failed page
        let popstate = host.take_popstate().unwrap();
        assert!(matches!(
            nav.handle_popstate(&popstate),
            PopStateOutcome::Reload(url) if url == "/broken"
        ));
        assert_eq!(host.reloads(), ["/broken"]);
        assert_eq!(nav.state(), NavState::Idle);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_reload_override_is_one_shot() {
    local(async {
        let nav = navigator();
        follow(&nav, "/broken").await.unwrap_err();
        let popstate = nav.host().take_popstate().unwrap();

        assert!(matches!(
            nav.handle_popstate(&popstate),
            PopStateOutcome::Reload(_)
        ));
        assert!(matches!(
            nav.handle_popstate(&popstate),
            PopStateOutcome::Navigating(_)
        ));
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_malformed_page_rolls_back_without_server_error() {
    local(async {
        let nav = navigator();
        let log = record(&nav);

        let err = follow(&nav, "/empty").await.unwrap_err();
        assert_eq!(err, NavError::MalformedPage { url: "/empty".into() });
        assert!(!log.borrow().contains(&Event::ServerError));
        assert!(!log.borrow().contains(&Event::PageLoaded));
        assert_eq!(nav.host().history_index(), 0);
        assert!(nav.host().take_popstate().is_some());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_transport_failure_takes_rollback_path() {
    local(async {
        let nav = navigator();
        let log = record(&nav);

        let err = follow(&nav, "/down").await.unwrap_err();
        assert!(matches!(err, NavError::Network { ref url, .. } if url == "/down"));
        assert!(!log.borrow().contains(&Event::ServerError));
        assert_eq!(nav.host().history_index(), 0);
        assert_eq!(nav.preload_route(), None);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_handler_faults_do_not_abort_navigation() {
    local(async {
        let nav = navigator();
        let reached = Rc::new(Cell::new(false));
        nav.on(Event::TransitionStart, |_| bail!("boom"));
        nav.on(Event::TransitionStart, |_| panic!("handler bug"));
        {
            let reached = reached.clone();
            nav.on(Event::TransitionStart, move |_| {
                reached.set(true);
                Ok(())
            });
        }

        follow(&nav, "/about?x=1").await.unwrap();
        assert!(reached.get());
        assert_eq!(nav.host().title(), "About");
    })
    .await;
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_rapid_duplicate_clicks_share_one_request() {
    local(async {
        let nav = navigator();
        let log = record(&nav);

        let first = nav.handle_click(&click("/about?x=1"));
        let second = nav.handle_click(&click("/about?x=1"));
        for outcome in [first, second] {
            let ClickOutcome::Navigating(handle) = outcome else {
                panic!("expected navigation");
            };
            handle.await.unwrap().unwrap();
        }

        assert_eq!(nav.host().requests().len(), 1);
        let loaded = log
            .borrow()
            .iter()
            .filter(|e| **e == Event::PageLoaded)
            .count();
        assert_eq!(loaded, 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_superseded_navigation_does_not_reset_state() {
    local(async {
        let nav = navigator();

        let ClickOutcome::Navigating(first) = nav.handle_click(&click("/about?x=1")) else {
            panic!("expected navigation");
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        let ClickOutcome::Navigating(second) = nav.handle_click(&click("/form")) else {
            panic!("expected navigation");
        };

        // first ends around 402ms, second is still animating in until ~502ms
        first.await.unwrap().unwrap();
        assert_eq!(nav.state(), NavState::AnimatingIn);

        second.await.unwrap().unwrap();
        assert_eq!(nav.state(), NavState::Idle);
        assert_eq!(nav.host().title(), "Thanks");
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_click_adopts_preload() {
    local(async {
        let nav = navigator();
        let pending = nav.preload("/about?x=1");
        assert_eq!(nav.preload_route().as_deref(), Some("/about?x=1"));
        assert!(!pending.is_settled());

        follow(&nav, "/about?x=1").await.unwrap();
        assert_eq!(nav.host().requests().len(), 1);
        assert_eq!(nav.preload_route(), None);

        let page = pending.wait().await.unwrap();
        assert_eq!(page.title, "About");

        // already cached: settled without a request
        assert!(nav.preload("/about?x=1").is_settled());
        assert_eq!(nav.host().requests().len(), 1);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_fallback_timer_bounds_each_phase() {
    local(async {
        let nav = navigator();
        let start = Instant::now();
        follow(&nav, "/about?x=1").await.unwrap();

        // exit (201ms, fetch overlaps) + entry (201ms)
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(402), "{elapsed:?}");
        assert!(elapsed < Duration::from_millis(450), "{elapsed:?}");
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_end_events_settle_animations_early() {
    local(async {
        let host = HeadlessBrowser::open(
            "http://localhost/",
            &page("Home", "home").replace("0.2s", "10s"),
            StaticFetcher::new()
                .page("/slow", page("Slow", "slow").replace("0.2s", "10s"))
                .with_latency(LATENCY),
        )
        .unwrap();
        let nav = Navigator::builder(host).build().unwrap();
        nav.enable();

        // plays the renderer: ends every running transition each tick
        let ticker = {
            let nav = nav.clone();
            tokio::task::spawn_local(async move {
                loop {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    let host = nav.host();
                    for el in host.query_all("[class*=\"transition-\"]") {
                        host.emit(el, "transitionend");
                    }
                }
            })
        };

        let start = Instant::now();
        follow(&nav, "/slow").await.unwrap();
        ticker.abort();

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(nav.host().title(), "Slow");
        assert_eq!(nav.host().listener_count(), 0);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_no_animated_elements_does_not_wait() {
    local(async {
        let nav = builder()
            .config(NavConfig {
                animation_selector: ".nothing-animates".into(),
                ..NavConfig::default()
            })
            .build()
            .unwrap();
        nav.enable();

        let start = Instant::now();
        follow(&nav, "/about?x=1").await.unwrap();
        assert!(start.elapsed() < LATENCY * 2);
    })
    .await;
}

// =============================================================================
// Popstate
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_back_navigation_skips_animations() {
    local(async {
        let nav = navigator();
        follow(&nav, "/about?x=1").await.unwrap();

        let log = record(&nav);
        let mut notices = nav.events().subscribe();
        nav.host().go(-1);
        let popstate = nav.host().take_popstate().unwrap();
        let PopStateOutcome::Navigating(handle) = nav.handle_popstate(&popstate) else {
            panic!("expected navigation");
        };
        handle.await.unwrap().unwrap();

        assert_eq!(
            *log.borrow(),
            [
                Event::PopState,
                Event::TransitionStart,
                Event::AnimationSkipped,
                Event::PageLoaded,
                Event::WillReplaceContent,
                Event::ContentReplaced,
                Event::PageView,
                Event::TransitionEnd,
            ]
        );
        let end = drain(&mut notices).pop().unwrap();
        assert_eq!(end.payload, Payload::Popstate(true));

        // no new entry for back navigation
        assert_eq!(nav.host().history_len(), 2);
        assert_eq!(nav.host().title(), "Home");
        assert_eq!(nav.host().classes(), [ENABLED_CLASS]);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_history_animation_when_enabled() {
    local(async {
        let nav = builder()
            .config(NavConfig {
                animate_history_browsing: true,
                ..NavConfig::default()
            })
            .build()
            .unwrap();
        nav.enable();
        follow(&nav, "/about?x=1").await.unwrap();

        let popstate_marker = Rc::new(Cell::new(false));
        {
            let seen = popstate_marker.clone();
            let probe = nav.clone();
            nav.on(Event::WillReplaceContent, move |_| {
                seen.set(probe.host().classes().iter().any(|c| c == "is-popstate"));
                Ok(())
            });
        }
        let log = record(&nav);

        nav.host().go(-1);
        let popstate = nav.host().take_popstate().unwrap();
        let PopStateOutcome::Navigating(handle) = nav.handle_popstate(&popstate) else {
            panic!("expected navigation");
        };
        handle.await.unwrap().unwrap();

        let log = log.borrow();
        assert!(log.contains(&Event::AnimationOutStart));
        assert!(log.contains(&Event::AnimationInDone));
        assert!(!log.contains(&Event::AnimationSkipped));
        assert!(popstate_marker.get());
        assert_eq!(nav.host().history_len(), 2);
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_foreign_popstate_is_ignored() {
    local(async {
        let nav = navigator();
        let log = record(&nav);

        let foreign = PopStateEvent { state: None };
        assert!(matches!(
            nav.handle_popstate(&foreign),
            PopStateOutcome::Ignored
        ));

        let other_router = PopStateEvent {
            state: Some(crate::history::HistoryState {
                url: "/about?x=1".into(),
                source: "router".into(),
                id: 1,
            }),
        };
        assert!(matches!(
            nav.handle_popstate(&other_router),
            PopStateOutcome::Ignored
        ));
        assert!(log.borrow().is_empty());
        assert!(nav.host().requests().is_empty());
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_custom_skip_predicate() {
    local(async {
        let nav = builder().skip_popstate(|_| false).build().unwrap();
        nav.enable();

        let PopStateOutcome::Navigating(handle) =
            nav.handle_popstate(&PopStateEvent { state: None })
        else {
            panic!("expected navigation");
        };
        handle.await.unwrap().unwrap();
        assert_eq!(nav.host().requests()[0].url, "/");
    })
    .await;
}

// =============================================================================
// Render details
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_redirect_replaces_entry_and_caches_both() {
    local(async {
        let nav = navigator();
        follow(&nav, "/old").await.unwrap();

        let host = nav.host();
        assert_eq!(host.history_len(), 2);
        assert_eq!(host.history_entry(1).unwrap().0, "/new");
        assert_eq!(host.location(), "http://localhost/new");

        let cache = nav.cache();
        assert!(cache.has("/old"));
        assert!(cache.has("/new"));
        assert_eq!(cache.get("/new").unwrap().title, "New");
    })
    .await;
}

#[tokio::test(start_paused = true)]
async fn test_disabled_cache_is_emptied_after_render() {
    local(async {
        let nav = builder()
            .config(NavConfig {
                cache: false,
                ..NavConfig::default()
            })
            .build()
            .unwrap();
        nav.enable();

        follow(&nav, "/about?x=1").await.unwrap();
        assert!(nav.cache().is_empty());
    })
    .await;
}

// =============================================================================
// Enable / destroy / plugins
// =============================================================================

struct Marker {
    mounted: Rc<Cell<bool>>,
}

impl Plugin for Marker {
    fn name(&self) -> &str {
        "marker"
    }

    fn mount(&mut self, _ctx: PluginContext<'_>) {
        self.mounted.set(true);
    }

    fn unmount(&mut self, _ctx: PluginContext<'_>) {
        self.mounted.set(false);
    }
}

#[tokio::test(start_paused = true)]
async fn test_enable_and_destroy() {
    local(async {
        let mounted = Rc::new(Cell::new(false));
        let nav = builder()
            .plugin(Marker {
                mounted: mounted.clone(),
            })
            .build()
            .unwrap();
        let log = record(&nav);

        assert!(matches!(
            nav.handle_click(&click("/about?x=1")),
            ClickOutcome::Ignored
        ));
        assert!(!mounted.get());

        nav.enable();
        let host = nav.host();
        assert_eq!(*log.borrow(), [Event::Enabled, Event::PageView]);
        assert!(host.classes().iter().any(|c| c == ENABLED_CLASS));
        assert!(host.block_html(0).is_some());
        assert!(host.state().unwrap().is_from(crate::history::SOURCE));
        assert!(mounted.get());
        assert!(nav.has_plugin("marker"));
        assert!(!nav.use_plugin(Marker {
            mounted: Rc::new(Cell::new(false))
        }));

        follow(&nav, "/about?x=1").await.unwrap();
        let mut notices = nav.events().subscribe();
        log.borrow_mut().clear();

        nav.destroy();
        assert!(!nav.is_enabled());
        assert!(log.borrow().is_empty());
        assert_eq!(drain(&mut notices)[0].event, Event::Disabled);
        assert!(!host.classes().iter().any(|c| c == ENABLED_CLASS));
        assert!(host.block_html(0).is_none());
        assert!(nav.cache().is_empty());
        assert!(!mounted.get());
        assert!(nav.plugin_names().is_empty());
    })
    .await;
}

#[test]
fn test_build_rejects_invalid_config() {
    let err = builder()
        .config(NavConfig {
            containers: vec!["main[".into()],
            ..NavConfig::default()
        })
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, ConfigError::Validation(_)));
}
