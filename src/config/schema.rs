//! Configuration schema for `squad.toml`
//!
//! ```toml
//! [world]
//! path = "world.json"
//!
//! [assets]
//! root = "data"
//!
//! [compositor]
//! default_background = "/modules/squad-token/assets/background.png"
//! ```
//!
//! Every section and field is optional.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::DEFAULT_BACKGROUND;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadConfig {
    pub world: WorldConfig,
    pub assets: AssetsConfig,
    pub compositor: CompositorConfig,
}

/// Where the world document lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub path: PathBuf,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("world.json") }
    }
}

/// Root for resolving host-style asset paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub root: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self { root: PathBuf::from(".") }
    }
}

/// Compositor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositorConfig {
    /// Default value registered for the background setting
    pub default_background: String,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self { default_background: DEFAULT_BACKGROUND.to_string() }
    }
}

impl SquadConfig {
    /// Validate the configuration. Returns one message per problem.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.world.path.as_os_str().is_empty() {
            errors.push("world.path must not be empty".to_string());
        }
        if self.assets.root.as_os_str().is_empty() {
            errors.push("assets.root must not be empty".to_string());
        }
        if self.compositor.default_background.trim().is_empty() {
            errors.push("compositor.default_background must not be empty".to_string());
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: SquadConfig = toml::from_str("").unwrap();
        assert_eq!(config, SquadConfig::default());
        assert_eq!(config.world.path, PathBuf::from("world.json"));
        assert_eq!(config.compositor.default_background, DEFAULT_BACKGROUND);
    }

    #[test]
    fn test_partial_sections() {
        let config: SquadConfig = toml::from_str(
            r#"
            [compositor]
            default_background = "frames/gold.png"
            "#,
        )
        .unwrap();
        assert_eq!(config.compositor.default_background, "frames/gold.png");
        assert_eq!(config.assets.root, PathBuf::from("."));
    }

    #[test]
    fn test_validate_empty_values() {
        let mut config = SquadConfig::default();
        config.world.path = PathBuf::new();
        config.compositor.default_background = "  ".to_string();
        assert_eq!(config.validate().len(), 2);
    }
}
