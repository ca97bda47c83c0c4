//! Input events delivered by the host.

use serde::Serialize;

use crate::history::HistoryState;

/// The link element a click landed on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    /// `href` attribute
    pub href: String,
    /// `xlink:href` attribute (SVG links)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_href: Option<String>,
    /// `data-swup-transition` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<String>,
}

impl Anchor {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    pub fn with_transition(mut self, name: impl Into<String>) -> Self {
        self.transition = Some(name.into());
        self
    }
}

/// Modifier keys held during a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    #[inline]
    pub fn any(self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

/// A click on an interceptable link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClickEvent {
    pub anchor: Anchor,
    /// Mouse button index (0 = primary)
    pub button: u16,
    pub modifiers: Modifiers,
}

impl ClickEvent {
    /// Plain primary-button click.
    pub fn primary(anchor: Anchor) -> Self {
        Self {
            anchor,
            button: 0,
            modifiers: Modifiers::default(),
        }
    }

    /// Whether this click should open the link in a new tab instead.
    #[inline]
    pub fn opens_new_tab(&self) -> bool {
        self.modifiers.any()
    }
}

/// Back/forward navigation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PopStateEvent {
    /// State of the entry being activated
    pub state: Option<HistoryState>,
}
