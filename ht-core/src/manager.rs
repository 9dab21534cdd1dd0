//! Holder of the top-level devices
//!
//! The manager is what an enumerator populates: roots are owned here, every
//! other device is owned by its parent. It emits no events itself; callers
//! that need "added"/"removed" notifications compare two snapshots with
//! [`ManagerDiff::between`].

use ht_error::{HwtreeError, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use crate::device::{Device, DeviceAttribute, DeviceType};

/// Forest of devices keyed by system path
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct DeviceManager {
    roots: HashMap<String, Device>,
}

impl DeviceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a device where its construction-time parent says it belongs.
    ///
    /// Parentless devices become roots. A device whose path is already used
    /// at that position replaces it and the old one is returned.
    pub fn add_device(&mut self, device: Device) -> Result<Option<Device>> {
        let Some(parent_path) = device.parent().map(str::to_string) else {
            debug!(path = %device.system_path(), "Adding root device");
            return Ok(self.roots.insert(device.system_path().to_string(), device));
        };

        match self.device_mut(&parent_path) {
            Some(parent) => parent.add_child(device),
            None => Err(HwtreeError::ParentNotFound {
                device: device.system_path().to_string(),
                parent: parent_path,
            }),
        }
    }

    /// Detach a device at any depth and hand back its subtree
    pub fn remove_device(&mut self, path: &str) -> Option<Device> {
        if let Some(root) = self.roots.remove(path) {
            debug!(path = %path, "Removed root device");
            return Some(root);
        }
        self.roots
            .values_mut()
            .find_map(|root| root.remove_descendant(path))
    }

    /// Look up a device at any depth
    pub fn device(&self, path: &str) -> Option<&Device> {
        self.roots
            .get(path)
            .or_else(|| self.roots.values().find_map(|root| root.descendant(path)))
    }

    pub fn device_mut(&mut self, path: &str) -> Option<&mut Device> {
        if self.roots.contains_key(path) {
            return self.roots.get_mut(path);
        }
        self.roots
            .values_mut()
            .find_map(|root| root.descendant_mut(path))
    }

    /// Top-level devices, in no particular order
    pub fn devices(&self) -> Vec<&Device> {
        self.roots.values().collect()
    }

    /// Top-level devices whose subtree carries every bit of `mask`
    pub fn devices_with_type(&self, mask: DeviceType) -> Vec<&Device> {
        self.roots.values().filter(|d| d.has_type(mask)).collect()
    }

    /// Top-level devices whose subtree carries every attribute in `mask`
    pub fn devices_with_attribute(&self, mask: DeviceAttribute) -> Vec<&Device> {
        self.roots
            .values()
            .filter(|d| d.has_attribute(mask))
            .collect()
    }

    /// System paths of every managed device, roots and descendants
    pub fn all_paths(&self) -> HashSet<&str> {
        self.roots
            .values()
            .flat_map(|root| root.descendants())
            .map(Device::system_path)
            .collect()
    }

    /// Number of top-level devices
    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of devices at every depth
    pub fn total_devices(&self) -> usize {
        self.roots.values().map(|r| r.descendants().len()).sum()
    }
}

/// Paths that appeared or disappeared between two snapshots, sorted
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ManagerDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl ManagerDiff {
    pub fn between(old: &DeviceManager, new: &DeviceManager) -> Self {
        let old_paths = old.all_paths();
        let new_paths = new.all_paths();

        let mut added: Vec<String> = new_paths
            .difference(&old_paths)
            .map(|p| p.to_string())
            .collect();
        let mut removed: Vec<String> = old_paths
            .difference(&new_paths)
            .map(|p| p.to_string())
            .collect();
        added.sort();
        removed.sort();

        if !added.is_empty() || !removed.is_empty() {
            info!(added = added.len(), removed = removed.len(), "Device set changed");
        }
        Self { added, removed }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
