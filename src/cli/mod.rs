//! Command-line interface module.

mod args;
pub mod extract;
pub mod replay;

pub use args::{Cli, Commands, ExtractArgs, ReplayArgs};

use std::path::Path;

use anyhow::Result;
use glide::config::GlideConfig;

/// Load the explicit `-C` file, or discover `glide.toml` from `dir` upward.
pub fn load_config(cli: &Cli, dir: &Path) -> Result<GlideConfig> {
    match &cli.config {
        Some(path) => GlideConfig::from_path(path),
        None => GlideConfig::discover(dir),
    }
}
