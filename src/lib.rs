//! Glide - soft navigation for multi-page sites.
//!
//! Intercepts link clicks and history traversal, fetches the next page in
//! the background, swaps the marked containers and plays CSS exit/entry
//! animations around the swap. The browser is abstracted behind
//! [`host::Host`]; [`headless::HeadlessBrowser`] is an in-memory host.

pub mod logger;

pub mod animation;
pub mod cache;
pub mod config;
pub mod core;
pub mod events;
pub mod extract;
pub mod headless;
pub mod history;
pub mod host;
pub mod html;
pub mod nav;
pub mod plugin;
pub mod selector;
