//! Animation timing resolution.
//!
//! For every element matching the animation selector, read its computed
//! transition/animation delays and durations, derive how long it animates,
//! then wait for either the native end events or a fallback timer.
//!
//! ```text
//! query_all(selector) ─┬─ element 0 ── end events | sleep(timeout + 1ms) ─┐
//!                      ├─ element 1 ── ...                                ├─ all settled
//!                      └─ element n ── ...                                ┘
//! ```

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::host::{Dom, ElementId};
use crate::log;

// =============================================================================
// Capabilities
// =============================================================================

/// CSS animation mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Transition,
    Animation,
}

/// Property and event names the host uses for transitions and animations.
///
/// Detected once per navigator; older engines only know the
/// `-webkit-` prefixed variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingCapabilities {
    transition_prop: &'static str,
    transition_end: &'static str,
    animation_prop: &'static str,
    animation_end: &'static str,
}

impl Default for TimingCapabilities {
    fn default() -> Self {
        Self::standard()
    }
}

impl TimingCapabilities {
    /// Unprefixed names.
    pub const fn standard() -> Self {
        Self {
            transition_prop: "transition",
            transition_end: "transitionend",
            animation_prop: "animation",
            animation_end: "animationend",
        }
    }

    /// Probe the host for prefixed event support.
    pub fn detect(dom: &impl Dom) -> Self {
        let mut caps = Self::standard();
        if !dom.supports_event("transitionend") && dom.supports_event("webkitTransitionEnd") {
            caps.transition_prop = "-webkit-transition";
            caps.transition_end = "webkitTransitionEnd";
        }
        if !dom.supports_event("animationend") && dom.supports_event("webkitAnimationEnd") {
            caps.animation_prop = "-webkit-animation";
            caps.animation_end = "webkitAnimationEnd";
        }
        caps
    }

    /// Computed-style property name, e.g. `transition-duration`.
    pub fn property(&self, kind: AnimationKind, longhand: &str) -> String {
        let prop = match kind {
            AnimationKind::Transition => self.transition_prop,
            AnimationKind::Animation => self.animation_prop,
        };
        format!("{prop}-{longhand}")
    }

    /// Name of the completion event.
    pub fn end_event(&self, kind: AnimationKind) -> &'static str {
        match kind {
            AnimationKind::Transition => self.transition_end,
            AnimationKind::Animation => self.animation_end,
        }
    }
}

// =============================================================================
// Timing
// =============================================================================

/// Derived animation timing of one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingInfo {
    /// Authoritative mechanism; `None` when nothing animates
    pub kind: Option<AnimationKind>,
    /// Longest `delay + duration`, in milliseconds
    pub timeout: f64,
    /// End events to observe before the element counts as settled
    pub prop_count: usize,
}

impl TimingInfo {
    /// Fallback timer: timeout plus one millisecond.
    pub fn fallback(&self) -> Duration {
        Duration::from_micros((self.timeout * 1000.0).round() as u64) + Duration::from_millis(1)
    }
}

/// Parse a CSS time (`0.3s`, `300ms`, `0,3s`) into milliseconds.
pub fn to_ms(value: &str) -> f64 {
    let value = value.trim();
    let (number, scale) = if let Some(ms) = value.strip_suffix("ms") {
        (ms, 1.0)
    } else if let Some(s) = value.strip_suffix('s') {
        (s, 1000.0)
    } else {
        (value, 1000.0)
    };
    number.trim().replace(',', ".").parse::<f64>().unwrap_or(0.0) * scale
}

/// Split a computed time list into milliseconds.
///
/// A comma between two digits is a decimal comma, not a separator.
pub fn parse_time_list(list: &str) -> Vec<f64> {
    let chars: Vec<char> = list.chars().collect();
    let mut items = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let decimal = c == ','
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit);
        if c == ',' && !decimal {
            items.push(to_ms(&current));
            current.clear();
        } else {
            current.push(c);
        }
    }
    items.push(to_ms(&current));
    items
}

/// Longest `delay[i] + duration[i]`, delays repeated cyclically.
pub fn calculate_timeout(delays: &[f64], durations: &[f64]) -> f64 {
    durations
        .iter()
        .enumerate()
        .map(|(i, duration)| {
            let delay = if delays.is_empty() { 0.0 } else { delays[i % delays.len()] };
            duration + delay
        })
        .fold(0.0, f64::max)
}

// =============================================================================
// Resolver
// =============================================================================

/// Waits for CSS animations to finish.
#[derive(Debug, Clone, Default)]
pub struct AnimationResolver {
    caps: TimingCapabilities,
}

impl AnimationResolver {
    pub fn new(caps: TimingCapabilities) -> Self {
        Self { caps }
    }

    pub fn capabilities(&self) -> &TimingCapabilities {
        &self.caps
    }

    /// Read the timing of one element from its computed style.
    pub fn timing_info(&self, dom: &impl Dom, element: ElementId) -> TimingInfo {
        let read = |kind, longhand| {
            let prop = self.caps.property(kind, longhand);
            parse_time_list(&dom.computed_style(element, &prop).unwrap_or_default())
        };

        let transition_durations = read(AnimationKind::Transition, "duration");
        let transition_timeout = calculate_timeout(
            &read(AnimationKind::Transition, "delay"),
            &transition_durations,
        );
        let animation_durations = read(AnimationKind::Animation, "duration");
        let animation_timeout = calculate_timeout(
            &read(AnimationKind::Animation, "delay"),
            &animation_durations,
        );

        let timeout = transition_timeout.max(animation_timeout);
        if timeout <= 0.0 {
            return TimingInfo {
                kind: None,
                timeout: 0.0,
                prop_count: 0,
            };
        }

        if transition_timeout > animation_timeout {
            TimingInfo {
                kind: Some(AnimationKind::Transition),
                timeout,
                prop_count: transition_durations.len(),
            }
        } else {
            TimingInfo {
                kind: Some(AnimationKind::Animation),
                timeout,
                prop_count: animation_durations.len(),
            }
        }
    }

    /// Wait until every element matching `selector` finished animating.
    ///
    /// Listeners are attached before this returns its first `Pending`, so end
    /// events fired after the call are never missed.
    pub async fn wait_all(&self, dom: &impl Dom, selector: &str) {
        let elements = dom.query_all(selector);
        if elements.is_empty() {
            log!("warning"; "no animated elements found by selector {}", selector);
            return;
        }

        let mut pending = JoinSet::new();
        for element in elements {
            let info = self.timing_info(dom, element);
            let Some(kind) = info.kind else {
                log!(
                    "warning";
                    "no CSS transition duration defined for element of selector {}",
                    selector
                );
                continue;
            };
            let events = dom.listen(element, self.caps.end_event(kind));
            pending.spawn(settle(events, element, info.prop_count, info.fallback()));
        }

        while pending.join_next().await.is_some() {}
    }
}

/// Resolve once `prop_count` end events targeted `element` itself, or when
/// the fallback timer fires. Dropping `events` removes the listener.
async fn settle(
    mut events: mpsc::UnboundedReceiver<ElementId>,
    element: ElementId,
    prop_count: usize,
    fallback: Duration,
) {
    let timer = tokio::time::sleep(fallback);
    tokio::pin!(timer);

    let mut ended = 0;
    loop {
        tokio::select! {
            _ = &mut timer => return,
            target = events.recv() => match target {
                Some(target) if target == element => {
                    ended += 1;
                    if ended >= prop_count {
                        return;
                    }
                }
                // Bubbled up from a descendant
                Some(_) => {}
                None => {
                    timer.as_mut().await;
                    return;
                }
            },
        }
    }
}
