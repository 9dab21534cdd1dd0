//! sysfs-backed device records

use std::fs;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::device::RawDeviceRecord;

/// A device directory under `/sys/devices`
#[derive(Debug, Clone)]
pub struct SysfsRecord {
    path: PathBuf,
    system_path: String,
    subsystem: Option<String>,
}

impl SysfsRecord {
    /// Wrap an already canonical device directory
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let subsystem = fs::read_link(path.join("subsystem"))
            .ok()
            .and_then(|target| {
                target
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(str::to_string)
            });
        let system_path = path.to_string_lossy().into_owned();
        trace!(path = %system_path, subsystem = ?subsystem, "Opened sysfs record");
        Self {
            path,
            system_path,
            subsystem,
        }
    }

    /// Use `name` when the directory has no `subsystem` link
    pub fn or_subsystem(mut self, name: &str) -> Self {
        if self.subsystem.is_none() {
            self.subsystem = Some(name.to_string());
        }
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Kernel name of the device, the last path component
    pub fn sysname(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

impl RawDeviceRecord for SysfsRecord {
    fn subsystem(&self) -> Option<&str> {
        self.subsystem.as_deref()
    }

    fn system_path(&self) -> &str {
        &self.system_path
    }

    fn sysattr(&self, name: &str) -> Option<String> {
        read_sysfs_attr(&self.path, name)
    }
}

/// Read one attribute file, trimmed; empty files and unsafe names give `None`
pub(crate) fn read_sysfs_attr(path: &Path, attr: &str) -> Option<String> {
    if attr.is_empty() || attr.contains("..") || attr.contains('/') || attr.contains('\0') {
        return None;
    }
    let attr_path = path.join(attr);
    fs::read_to_string(&attr_path)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
