//! Configuration file handling for orrery.
//!
//! The config lives at `config.toml` in the platform config directory.
//! A missing file means defaults; a malformed one is an error.

use std::fs;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use directories::ProjectDirs;
use orrery_core::Preset;
use serde::{Deserialize, Serialize};

/// Interval the timer-paced scheduler aims for when no refresh rate is known.
pub const DEFAULT_FALLBACK_INTERVAL_MS: u64 = 16;

const CONFIG_FILE: &str = "config.toml";

/// User configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which belt constants to use.
    pub preset: Preset,
    /// Display refresh rate. When unset, frames are paced by a timer.
    pub refresh_hz: Option<f64>,
    /// Target frame interval for the timer-paced scheduler.
    pub fallback_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            refresh_hz: None,
            fallback_interval_ms: DEFAULT_FALLBACK_INTERVAL_MS,
        }
    }
}

impl Config {
    /// Default location of the config file, if the platform has one.
    pub fn path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "orrery").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from `path`, returning defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .wrap_err_with(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(path, self.to_toml()?)
            .wrap_err_with(|| format!("failed to write config file {}", path.display()))
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(mut self, preset: Option<Preset>, refresh_hz: Option<f64>) -> Self {
        if let Some(preset) = preset {
            self.preset = preset;
        }
        if refresh_hz.is_some() {
            self.refresh_hz = refresh_hz;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("orrery-config-test-{}", std::process::id()))
            .join(name)
            .join(CONFIG_FILE)
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("preset = \"fixed\"").unwrap();
        assert_eq!(config.preset, Preset::Fixed);
        assert_eq!(config.refresh_hz, None);
        assert_eq!(config.fallback_interval_ms, DEFAULT_FALLBACK_INTERVAL_MS);
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml(
            "preset = \"adaptive\"\nrefresh_hz = 144.0\nfallback_interval_ms = 33\n",
        )
        .unwrap();
        assert_eq!(config.preset, Preset::Adaptive);
        assert_eq!(config.refresh_hz, Some(144.0));
        assert_eq!(config.fallback_interval_ms, 33);
    }

    #[test]
    fn test_malformed_file_is_error() {
        assert!(Config::from_toml("preset = \"sideways\"").is_err());
        assert!(Config::from_toml("refresh_hz = [").is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let path = scratch_path("missing");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch_path("saved");
        let config = Config {
            preset: Preset::Fixed,
            refresh_hz: Some(60.0),
            fallback_interval_ms: 20,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some(Preset::Fixed), None);
        assert_eq!(config.preset, Preset::Fixed);
        assert_eq!(config.refresh_hz, None);

        let config = Config::from_toml("refresh_hz = 60.0")
            .unwrap()
            .with_overrides(None, Some(120.0));
        assert_eq!(config.preset, Preset::Adaptive);
        assert_eq!(config.refresh_hz, Some(120.0));
    }
}
