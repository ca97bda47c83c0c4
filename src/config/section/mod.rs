//! Configuration sections.

mod nav;
mod replay;

pub use nav::{DEFAULT_ANIMATION_SELECTOR, DEFAULT_LINK_SELECTOR, NavConfig};
pub use replay::ReplayConfig;
