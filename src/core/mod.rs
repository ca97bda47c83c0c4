//! Core types - pure abstractions shared across the codebase.

mod event;
mod state;
mod url;

pub use event::{Event, UnsupportedEvent};
pub use state::{NavState, Transition};
pub use url::{Link, classify, normalize_url};
