//! Configuration loading and discovery for `squad.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::SquadConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "squad.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse squad.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override world document path
    pub world: Option<PathBuf>,
    /// Override assets root
    pub assets: Option<PathBuf>,
}

/// Find squad.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for squad.toml
/// 2. Check XDG_CONFIG_HOME/squad-token/squad.toml (or ~/.config/squad-token/squad.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find squad.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("squad-token").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find squad.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`]. If no config file is found, returns the defaults.
/// Relative paths in a config file are resolved against the file's directory.
pub fn load_config(path: Option<&Path>) -> Result<SquadConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(SquadConfig::default()),
    }
}

fn load_config_file(path: &Path) -> Result<SquadConfig, ConfigError> {
    log::debug!("Loading config from {}", path.display());
    let contents = fs::read_to_string(path)?;
    let mut config: SquadConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    if let Some(base) = path.parent() {
        resolve_relative(&mut config, base);
    }
    Ok(config)
}

fn resolve_relative(config: &mut SquadConfig, base: &Path) {
    if config.world.path.is_relative() {
        config.world.path = base.join(&config.world.path);
    }
    if config.assets.root.is_relative() {
        config.assets.root = base.join(&config.assets.root);
    }
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut SquadConfig, overrides: &CliOverrides) {
    if let Some(ref world) = overrides.world {
        config.world.path = world.clone();
    }
    if let Some(ref assets) = overrides.assets {
        config.assets.root = assets.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_config_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();

        assert_eq!(find_config_from(nested), Some(dir.path().join(CONFIG_FILE)));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[world]\npath = \"state/world.json\"\n[assets]\nroot = \"data\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.world.path, dir.path().join("state/world.json"));
        assert_eq!(config.assets.root, dir.path().join("data"));
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[compositor]\ndefault_background = \"\"\n").unwrap();

        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[world\n").unwrap();

        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = SquadConfig::default();
        let overrides = CliOverrides {
            world: Some(PathBuf::from("other.json")),
            ..Default::default()
        };
        merge_cli_overrides(&mut config, &overrides);
        assert_eq!(config.world.path, PathBuf::from("other.json"));
        assert_eq!(config.assets.root, PathBuf::from("."));
    }
}
