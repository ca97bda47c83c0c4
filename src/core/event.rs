//! Lifecycle event vocabulary.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Every lifecycle notification a navigator can emit.
///
/// The set is closed: handlers can only be registered for these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Event {
    TransitionStart,
    AnimationOutStart,
    AnimationOutDone,
    AnimationSkipped,
    PageRetrievedFromCache,
    PageLoaded,
    ServerError,
    AnimationInStart,
    AnimationInDone,
    TransitionEnd,
    WillReplaceContent,
    ContentReplaced,
    PopState,
    SamePage,
    SamePageWithHash,
    ClickLink,
    OpenPageInNewTab,
    PageView,
    Enabled,
    Disabled,
}

impl Event {
    /// All events, in declaration order.
    pub const ALL: [Event; 20] = [
        Self::TransitionStart,
        Self::AnimationOutStart,
        Self::AnimationOutDone,
        Self::AnimationSkipped,
        Self::PageRetrievedFromCache,
        Self::PageLoaded,
        Self::ServerError,
        Self::AnimationInStart,
        Self::AnimationInDone,
        Self::TransitionEnd,
        Self::WillReplaceContent,
        Self::ContentReplaced,
        Self::PopState,
        Self::SamePage,
        Self::SamePageWithHash,
        Self::ClickLink,
        Self::OpenPageInNewTab,
        Self::PageView,
        Self::Enabled,
        Self::Disabled,
    ];

    /// The camelCase event name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::TransitionStart => "transitionStart",
            Self::AnimationOutStart => "animationOutStart",
            Self::AnimationOutDone => "animationOutDone",
            Self::AnimationSkipped => "animationSkipped",
            Self::PageRetrievedFromCache => "pageRetrievedFromCache",
            Self::PageLoaded => "pageLoaded",
            Self::ServerError => "serverError",
            Self::AnimationInStart => "animationInStart",
            Self::AnimationInDone => "animationInDone",
            Self::TransitionEnd => "transitionEnd",
            Self::WillReplaceContent => "willReplaceContent",
            Self::ContentReplaced => "contentReplaced",
            Self::PopState => "popState",
            Self::SamePage => "samePage",
            Self::SamePageWithHash => "samePageWithHash",
            Self::ClickLink => "clickLink",
            Self::OpenPageInNewTab => "openPageInNewTab",
            Self::PageView => "pageView",
            Self::Enabled => "enabled",
            Self::Disabled => "disabled",
        }
    }

    /// Name of the host-visible notification (`swup:<name>`).
    pub fn dom_name(self) -> String {
        format!("swup:{}", self.name())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing a name outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported event `{0}`")]
pub struct UnsupportedEvent(pub String);

impl FromStr for Event {
    type Err = UnsupportedEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| UnsupportedEvent(s.to_string()))
    }
}
