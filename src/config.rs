//! Tool configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Every key is
//! optional: user files are merged on top of stock defaults, so a config only
//! needs to name what it overrides.
//!
//! ## Config File Location
//!
//! `--config <path>` wins. Otherwise `<config_dir>/spotwall/config.toml` is
//! used when it exists (`%APPDATA%\spotwall\config.toml` on Windows), and
//! stock defaults apply when it does not.
//!
//! ## Configuration Options
//!
//! ```toml
//! save_root = "D:/Wallpapers"   # Archive root (default: Pictures folder)
//! asset_cache = "..."           # Spotlight asset cache (default: the OS cache)
//! temp_root = "..."             # Scratch space for temporary harvests (default: OS temp)
//! state_dir = "..."             # Where applied wallpapers are copied (default: local app data)
//! threshold_kb = 100            # Assets smaller than this are not images worth keeping
//!
//! [selection]
//! style = 0                     # 0 Stretched, 1 Fill, 2 Fit, 3 Span, 4 Tile, 5 Center, 6 NoChange
//! temporary = true              # Harvest into temp space when no archive exists
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! ## Roots
//!
//! Core operations never look up platform folders themselves. [`Config::roots`]
//! resolves every directory once into a [`Roots`] value that is passed down
//! explicitly, which is what lets tests point the whole tool at temp dirs.

use crate::desktop::Style;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Spotlight asset cache, relative to the local app data folder.
const ASSET_CACHE_SUFFIX: &[&str] = &[
    "Packages",
    "Microsoft.Windows.ContentDeliveryManager_cw5n1h2txyewy",
    "LocalState",
    "Assets",
];

const APP_DIR: &str = "spotwall";
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root under which the `Spotlight` archive lives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_root: Option<PathBuf>,
    /// Directory holding the extensionless Spotlight assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_cache: Option<PathBuf>,
    /// Scratch root for temporary harvests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_root: Option<PathBuf>,
    /// Private folder applied wallpapers are copied into.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
    /// Minimum asset size in KiB.
    pub threshold_kb: u64,
    /// Wallpaper selection defaults.
    pub selection: SelectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            save_root: None,
            asset_cache: None,
            temp_root: None,
            state_dir: None,
            threshold_kb: 100,
            selection: SelectionConfig::default(),
        }
    }
}

/// Defaults for `set-random-wallpaper` / `set-latest-wallpaper`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Wallpaper style id, see [`Style::from_id`].
    pub style: u32,
    /// Harvest into temp space when no archive exists yet.
    pub temporary: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            style: 0,
            temporary: true,
        }
    }
}

/// Every directory the core touches, resolved once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    pub asset_cache: PathBuf,
    pub picture_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Style::from_id(self.selection.style).is_none() {
            return Err(ConfigError::Validation(format!(
                "selection.style must be 0-6, got {}",
                self.selection.style
            )));
        }
        if self.threshold_kb > u64::MAX / 1024 {
            return Err(ConfigError::Validation(
                "threshold_kb is too large".into(),
            ));
        }
        Ok(())
    }

    pub fn style(&self) -> Style {
        Style::from_id(self.selection.style).unwrap_or_default()
    }

    /// Resolve configured directories, falling back to platform folders.
    pub fn roots(&self) -> Roots {
        let local_data = dirs::data_local_dir().unwrap_or_else(std::env::temp_dir);
        Roots {
            asset_cache: self.asset_cache.clone().unwrap_or_else(|| {
                ASSET_CACHE_SUFFIX
                    .iter()
                    .fold(local_data.clone(), |path, part| path.join(part))
            }),
            picture_dir: self.save_root.clone().unwrap_or_else(default_picture_dir),
            temp_dir: self.temp_root.clone().unwrap_or_else(std::env::temp_dir),
            state_dir: self
                .state_dir
                .clone()
                .unwrap_or_else(|| local_data.join(APP_DIR)),
        }
    }
}

fn default_picture_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<Config, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Default config file location, if the platform has a config folder.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load the configuration.
///
/// An explicit `path` must exist. Without one, the default location is used
/// when present and stock defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let overlay = match path {
        Some(path) => Some(read_toml(path)?),
        None => match default_config_path() {
            Some(default) if default.is_file() => Some(read_toml(&default)?),
            _ => None,
        },
    };
    resolve_config(overlay)
}

fn read_toml(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# spotwall configuration
# ======================
#
# Every key is optional; delete anything you do not want to override.

# Root under which the Spotlight/<DD-MM-YYYY>/{Desktop,Mobile} archive lives.
# Default: your Pictures folder.
# save_root = "D:/Wallpapers"

# Where Windows keeps the extensionless Spotlight assets.
# Default: %LOCALAPPDATA%\Packages\Microsoft.Windows.ContentDeliveryManager_cw5n1h2txyewy\LocalState\Assets
# asset_cache = ""

# Scratch root for temporary harvests (SpotlightTemp is created inside).
# Default: the OS temp folder.
# temp_root = ""

# Applied wallpapers are copied here first so archive files are never locked.
# Default: %LOCALAPPDATA%\spotwall
# state_dir = ""

# Assets smaller than this many KiB are skipped (icons, thumbnails, ads).
threshold_kb = 100

[selection]
# Wallpaper style used by set-random-wallpaper / set-latest-wallpaper.
# 0 Stretched, 1 Fill, 2 Fit, 3 Span, 4 Tile, 5 Center, 6 NoChange
style = 0

# When no archive exists yet, harvest into temp space (true) or into the
# archive itself (false).
temporary = true
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.threshold_kb, 100);
        assert_eq!(config.selection.style, 0);
        assert!(config.selection.temporary);
        assert!(config.save_root.is_none());
    }

    #[test]
    fn stock_toml_parses_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(Some(value)).unwrap();
        assert_eq!(config.threshold_kb, 100);
        assert_eq!(config.style(), Style::Stretched);
        assert!(config.selection.temporary);
    }

    #[test]
    fn partial_overlay_keeps_other_defaults() {
        let overlay: toml::Value = toml::from_str("[selection]\nstyle = 1\n").unwrap();
        let config = resolve_config(Some(overlay)).unwrap();
        assert_eq!(config.style(), Style::Fill);
        assert!(config.selection.temporary);
        assert_eq!(config.threshold_kb, 100);
    }

    #[test]
    fn unknown_key_rejected() {
        let overlay: toml::Value = toml::from_str("thresold_kb = 5\n").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn invalid_style_rejected() {
        let overlay: toml::Value = toml::from_str("[selection]\nstyle = 9\n").unwrap();
        assert!(matches!(
            resolve_config(Some(overlay)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_toml_overlay_wins() {
        let base: toml::Value = toml::from_str("a = 1\n[t]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn load_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "save_root = \"/archive\"\nthreshold_kb = 250\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.threshold_kb, 250);
        assert_eq!(config.roots().picture_dir, PathBuf::from("/archive"));
    }

    #[test]
    fn load_missing_explicit_file_errors() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn roots_prefer_configured_paths() {
        let config = Config {
            save_root: Some("/s".into()),
            asset_cache: Some("/c".into()),
            temp_root: Some("/t".into()),
            state_dir: Some("/st".into()),
            ..Config::default()
        };
        assert_eq!(
            config.roots(),
            Roots {
                asset_cache: "/c".into(),
                picture_dir: "/s".into(),
                temp_dir: "/t".into(),
                state_dir: "/st".into(),
            }
        );
    }

    #[test]
    fn default_asset_cache_ends_in_assets() {
        let roots = Config::default().roots();
        assert!(roots.asset_cache.ends_with("LocalState/Assets"));
    }
}
