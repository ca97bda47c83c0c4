//! Navigation state tracking.
//!
//! - `NavState`: which phase the navigator is in (source of truth)
//! - `Transition`: what kind of navigation is running (from, to, custom)
//!
//! Root class markers (`is-animating`, `to-about`, ...) are side effects
//! applied at phase boundaries, never read back.

use std::fmt;

use serde::Serialize;

// =============================================================================
// NavState
// =============================================================================

/// Phase of the current navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavState {
    /// No navigation running
    #[default]
    Idle,
    /// Exit animations started, waiting for them and the content
    AnimatingOut,
    /// Exit phase done (or skipped), still waiting for content
    Fetching,
    /// Replacing container content
    Swapping,
    /// Entry animations running
    AnimatingIn,
}

impl NavState {
    /// Check if a navigation is in progress.
    #[inline]
    pub fn is_busy(self) -> bool {
        self != Self::Idle
    }
}

impl fmt::Display for NavState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::AnimatingOut => "animating-out",
            Self::Fetching => "fetching",
            Self::Swapping => "swapping",
            Self::AnimatingIn => "animating-in",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Transition
// =============================================================================

/// Animation context of the active navigation.
///
/// Overwritten at the start of every navigation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: Option<String>,
    pub to: Option<String>,
    pub custom: Option<String>,
}

impl Transition {
    pub fn new(from: impl Into<String>, to: impl Into<String>, custom: Option<String>) -> Self {
        Self {
            from: Some(from.into()),
            to: Some(to.into()),
            custom,
        }
    }
}
