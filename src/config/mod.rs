// SPDX-License-Identifier: MPL-2.0
//! This module handles the queue configuration, including loading and saving
//! user preferences to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use toast_queue::config::{self, Config};
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Give toasts a bit more time on screen
//! config.default_duration_ms = Some(8000);
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//! ```

mod defaults;

pub use defaults::*;

use crate::domain::diagnostics::BufferCapacity;
use crate::domain::notification::DefaultDuration;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "ToastQueue";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Auto-dismiss delay for entries that don't set their own.
    #[serde(default)]
    pub default_duration_ms: Option<u64>,
    /// Number of lifecycle events kept by the diagnostics log.
    #[serde(default)]
    pub diagnostics_capacity: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_duration_ms: Some(DEFAULT_DURATION_MS),
            diagnostics_capacity: Some(DEFAULT_DIAGNOSTICS_CAPACITY),
        }
    }
}

impl Config {
    /// Returns the validated default duration, falling back to the built-in value.
    #[must_use]
    pub fn default_duration(&self) -> DefaultDuration {
        self.default_duration_ms
            .map(DefaultDuration::new)
            .unwrap_or_default()
    }

    /// Returns the validated diagnostics capacity.
    #[must_use]
    pub fn diagnostics_capacity(&self) -> BufferCapacity {
        self.diagnostics_capacity
            .map(BufferCapacity::new)
            .unwrap_or_default()
    }

    /// Builds the runtime settings a dispatcher is created with.
    #[must_use]
    pub fn dispatcher_settings(&self) -> DispatcherSettings {
        DispatcherSettings {
            default_duration: self.default_duration().as_duration(),
        }
    }
}

/// Settings consumed by [`crate::notifications::Dispatcher::with_settings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherSettings {
    /// Applied when an entry carries no explicit duration.
    pub default_duration: Duration,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            default_duration: DefaultDuration::default().as_duration(),
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

/// Reads a config file. Malformed TOML yields the defaults, I/O errors propagate.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring malformed config");
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
