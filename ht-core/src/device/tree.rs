//! Child management and recursive queries
//!
//! Children are keyed by their system path in an unordered map. Nothing here
//! promises an iteration order; callers that need one must sort.

use ht_error::{HwtreeError, Result};
use tracing::{debug, warn};

use super::{Device, DeviceAttribute, DeviceType};

impl Device {
    /// Take ownership of `child`, keyed by its system path.
    ///
    /// A child already stored under the same path is displaced and returned
    /// (last write wins). `child` must have been constructed with this device
    /// as its parent; otherwise it is released and `ParentMismatch` returned.
    pub fn add_child(&mut self, child: Device) -> Result<Option<Device>> {
        if child.parent() != Some(self.system_path()) {
            warn!(
                parent = %self.system_path,
                child = %child.system_path,
                declared = ?child.parent,
                "Refusing to reparent device"
            );
            return Err(HwtreeError::ParentMismatch {
                parent: self.system_path.clone(),
                child: child.system_path.clone(),
                declared: child.parent.clone(),
            });
        }

        debug!(parent = %self.system_path, child = %child.system_path, "Attaching child");
        let replaced = self.children.insert(child.system_path.clone(), child);
        if let Some(old) = &replaced {
            debug!(path = %old.system_path, "Replaced existing child with the same path");
        }
        Ok(replaced)
    }

    /// Detach the child stored under the same path as `child`
    pub fn remove_child(&mut self, child: &Device) -> Option<Device> {
        self.remove_child_by_path(child.system_path())
    }

    /// Detach and hand back the subtree rooted at `path`; absent paths are a no-op
    pub fn remove_child_by_path(&mut self, path: &str) -> Option<Device> {
        let removed = self.children.remove(path);
        if removed.is_some() {
            debug!(parent = %self.system_path, child = %path, "Detached child");
        }
        removed
    }

    /// Direct child lookup
    pub fn child_by_path(&self, path: &str) -> Option<&Device> {
        self.children.get(path)
    }

    /// Snapshot of the direct children, in no particular order
    pub fn children(&self) -> Vec<&Device> {
        self.children.values().collect()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// True if this device or any descendant carries every bit of `mask`
    pub fn has_type(&self, mask: DeviceType) -> bool {
        self.device_type.contains(mask) || self.children.values().any(|c| c.has_type(mask))
    }

    /// True if this device or any descendant carries every attribute in `mask`.
    ///
    /// Descendants are tested against their attributes, not their types.
    pub fn has_attribute(&self, mask: DeviceAttribute) -> bool {
        self.attributes.contains(mask) || self.children.values().any(|c| c.has_attribute(mask))
    }

    /// Find this device or a descendant by system path, depth first
    pub fn descendant(&self, path: &str) -> Option<&Device> {
        if self.system_path == path {
            return Some(self);
        }
        if let Some(child) = self.children.get(path) {
            return Some(child);
        }
        self.children.values().find_map(|c| c.descendant(path))
    }

    pub fn descendant_mut(&mut self, path: &str) -> Option<&mut Device> {
        if self.system_path == path {
            return Some(self);
        }
        if self.children.contains_key(path) {
            return self.children.get_mut(path);
        }
        self.children
            .values_mut()
            .find_map(|c| c.descendant_mut(path))
    }

    /// Detach a device anywhere below this one
    pub fn remove_descendant(&mut self, path: &str) -> Option<Device> {
        if let Some(removed) = self.remove_child_by_path(path) {
            return Some(removed);
        }
        self.children
            .values_mut()
            .find_map(|c| c.remove_descendant(path))
    }

    /// This device followed by every descendant, pre-order
    pub fn descendants(&self) -> Vec<&Device> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a Device>) {
        out.push(self);
        for child in self.children.values() {
            child.collect_into(out);
        }
    }
}
