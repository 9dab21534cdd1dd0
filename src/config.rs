/*
 * This file is part of hwtree.
 *
 * Copyright (C) 2026 hwtree contributors
 *
 * hwtree is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * hwtree is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with hwtree. If not, see <https://www.gnu.org/licenses/>.
 */

use std::fs;
use std::path::{Path, PathBuf};

use ht_core::constants::{paths, subsystem};
use ht_core::SysfsScanner;
use ht_error::{HwtreeError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Bounds for the watch poll interval
pub const MIN_WATCH_INTERVAL_MS: u64 = 100;
pub const MAX_WATCH_INTERVAL_MS: u64 = 60 * 60 * 1000;

fn default_sysfs_root() -> PathBuf {
    PathBuf::from(paths::SYSFS_ROOT)
}

fn default_udev_data_dir() -> PathBuf {
    PathBuf::from(paths::UDEV_DATA_DIR)
}

fn default_subsystems() -> Vec<String> {
    subsystem::DEFAULT_SCAN.iter().map(|s| s.to_string()).collect()
}

fn default_watch_interval_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_sysfs_root")]
    pub sysfs_root: PathBuf,
    #[serde(default = "default_udev_data_dir")]
    pub udev_data_dir: PathBuf,
    /// Subsystems to enumerate, e.g. "pci", "usb"
    #[serde(default = "default_subsystems")]
    pub subsystems: Vec<String>,
    #[serde(default = "default_watch_interval_ms")]
    pub watch_interval_ms: u64,
    /// Filter directive used when HWTREE_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sysfs_root: default_sysfs_root(),
            udev_data_dir: default_udev_data_dir(),
            subsystems: default_subsystems(),
            watch_interval_ms: default_watch_interval_ms(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Replace the directories with command line values and validate again
    pub fn with_overrides(
        mut self,
        sysfs_root: Option<&Path>,
        udev_data_dir: Option<&Path>,
    ) -> Result<Self> {
        if let Some(root) = sysfs_root {
            self.sysfs_root = root.to_path_buf();
        }
        if let Some(dir) = udev_data_dir {
            self.udev_data_dir = dir.to_path_buf();
        }
        validate_config(&self)?;
        Ok(self)
    }

    /// Scanner configured from these settings
    pub fn scanner(&self) -> SysfsScanner {
        SysfsScanner::new(&self.sysfs_root, &self.udev_data_dir)
            .with_subsystems(self.subsystems.iter().cloned())
    }
}

/// Per-user config file, `$XDG_CONFIG_HOME/hwtree/config.json`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(paths::CONFIG_DIR_NAME).join(paths::CONFIG_FILE_NAME))
}

/// Load from `explicit`, else the user file, else the system file, else defaults
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(HwtreeError::FileNotFound(path.to_path_buf()));
        }
        return load_config_file(path);
    }

    let candidates = user_config_path()
        .into_iter()
        .chain(std::iter::once(PathBuf::from(paths::SYSTEM_CONFIG_FILE)));

    for path in candidates {
        if path.exists() {
            return load_config_file(&path);
        }
    }

    debug!("No config file found, using defaults");
    Ok(Config::default())
}

/// Read, parse and validate one config file
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| HwtreeError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: Config = serde_json::from_str(&content)
        .map_err(|e| HwtreeError::config(format!("Failed to parse {}: {}", path.display(), e)))?;

    validate_config(&config)?;
    debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

pub fn validate_config(config: &Config) -> Result<()> {
    for dir in [&config.sysfs_root, &config.udev_data_dir] {
        if !dir.is_absolute() {
            return Err(HwtreeError::invalid_path(dir.clone(), "must be absolute"));
        }
    }

    if config.subsystems.is_empty() {
        return Err(HwtreeError::invalid_config("subsystems", "must not be empty"));
    }

    for name in &config.subsystems {
        if name.trim().is_empty() || name.contains('/') || name.contains("..") {
            return Err(HwtreeError::invalid_config(
                "subsystems",
                format!("invalid subsystem name {:?}", name),
            ));
        }
    }

    if !(MIN_WATCH_INTERVAL_MS..=MAX_WATCH_INTERVAL_MS).contains(&config.watch_interval_ms) {
        return Err(HwtreeError::invalid_config(
            "watch_interval_ms",
            format!(
                "{} is outside {}..={}",
                config.watch_interval_ms, MIN_WATCH_INTERVAL_MS, MAX_WATCH_INTERVAL_MS
            ),
        ));
    }

    Ok(())
}
