//! Configuration management for `glide.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── nav        # [nav]
//! │   └── replay     # [replay]
//! ├── error          # ConfigError
//! ├── util           # find_config_file
//! └── mod.rs         # GlideConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                             |
//! |-------------|-----------------------------------------------------|
//! | `[nav]`     | Containers, selectors, caching, request headers     |
//! | `[replay]`  | Headless driver (start page, latency, failing paths) |

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{DEFAULT_ANIMATION_SELECTOR, DEFAULT_LINK_SELECTOR, NavConfig, ReplayConfig};
pub use util::find_config_file;

use std::{fs, path::Path};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::log;
use crate::selector::Selector;

/// Default config file name.
pub const CONFIG_FILE: &str = "glide.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing glide.toml
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlideConfig {
    /// Navigation settings
    #[serde(default)]
    pub nav: NavConfig,

    /// Headless replay settings
    #[serde(default)]
    pub replay: ReplayConfig,
}

impl GlideConfig {
    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        let (config, ignored) = Self::parse_with_ignored(content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, Path::new(CONFIG_FILE));
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        config.validate()?;
        Ok(config)
    }

    /// Look for `glide.toml` upward from `dir`, falling back to defaults.
    pub fn discover(dir: &Path) -> Result<Self> {
        match find_config_file(dir, Path::new(CONFIG_FILE)) {
            Some(path) => {
                crate::debug!("config"; "using {}", path.display());
                Self::from_path(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Check that every configured selector parses.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nav = &self.nav;
        if nav.containers.is_empty() {
            return Err(ConfigError::Validation(
                "[nav] containers must not be empty".into(),
            ));
        }

        let named = nav
            .containers
            .iter()
            .map(|c| ("containers", c))
            .chain([
                ("animation_selector", &nav.animation_selector),
                ("link_selector", &nav.link_selector),
            ]);
        for (field, selector) in named {
            if selector.trim().is_empty() {
                return Err(ConfigError::Validation(format!("[nav] {field} is empty")));
            }
            if let Err(err) = Selector::parse(selector) {
                return Err(ConfigError::Validation(format!("[nav] {field}: {err}")));
            }
        }
        Ok(())
    }
}

/// Parse a test config, asserting there are no unknown fields.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> GlideConfig {
    let (parsed, ignored) = GlideConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_invalid_toml() {
        // unclosed bracket
        let result = GlideConfig::from_str("[nav\ncache = true");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_is_valid() {
        let config = GlideConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config, GlideConfig::from_str("").unwrap());
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[nav]\ncache = false\nspeed = 3\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = GlideConfig::parse_with_ignored(content).unwrap();

        assert!(!config.nav.cache);
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
        assert!(ignored.iter().any(|f| f == "nav.speed"));
    }

    #[test]
    fn test_no_unknown_fields() {
        let (_, ignored) = GlideConfig::parse_with_ignored("[nav]\ncache = true").unwrap();
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_validation_rejects_empty_containers() {
        let err = GlideConfig::from_str("[nav]\ncontainers = []").unwrap_err();
        let err = err.downcast::<ConfigError>().unwrap();
        assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("containers")));
    }

    #[test]
    fn test_validation_rejects_bad_selector() {
        let err = GlideConfig::from_str("[nav]\nanimation_selector = \"[class\"").unwrap_err();
        let err = err.downcast::<ConfigError>().unwrap();
        assert!(matches!(err, ConfigError::Validation(msg) if msg.contains("animation_selector")));
    }

    #[test]
    fn test_discover_from_nested_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[nav]\ncontainers = [\"#main\"]").unwrap();
        let nested = dir.path().join("posts");
        fs::create_dir(&nested).unwrap();

        let config = GlideConfig::discover(&nested).unwrap();
        assert_eq!(config.nav.containers, ["#main"]);
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = GlideConfig::from_path(&dir.path().join(CONFIG_FILE)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::Io(..))
        ));
    }
}
