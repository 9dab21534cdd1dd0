//! Raw device records handed in by an enumerator

use std::collections::HashMap;

/// A device as reported by the OS enumeration facility.
///
/// The device model only ever reads through this trait; where the data comes
/// from (sysfs, a udev binding, a test fixture) is up to the implementor.
pub trait RawDeviceRecord {
    /// Subsystem name such as `"pci"` or `"usb"`, if the device has one
    fn subsystem(&self) -> Option<&str>;

    /// Unique system path of the device
    fn system_path(&self) -> &str;

    /// Look up a single attribute value
    fn sysattr(&self, name: &str) -> Option<String>;
}

impl<R: RawDeviceRecord + ?Sized> RawDeviceRecord for &R {
    fn subsystem(&self) -> Option<&str> {
        (**self).subsystem()
    }

    fn system_path(&self) -> &str {
        (**self).system_path()
    }

    fn sysattr(&self, name: &str) -> Option<String> {
        (**self).sysattr(name)
    }
}

/// In-memory record with pre-fetched attributes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryRecord {
    subsystem: Option<String>,
    system_path: String,
    attributes: HashMap<String, String>,
}

impl MemoryRecord {
    pub fn new(subsystem: Option<&str>, system_path: impl Into<String>) -> Self {
        Self {
            subsystem: subsystem.map(str::to_string),
            system_path: system_path.into(),
            attributes: HashMap::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

impl RawDeviceRecord for MemoryRecord {
    fn subsystem(&self) -> Option<&str> {
        self.subsystem.as_deref()
    }

    fn system_path(&self) -> &str {
        &self.system_path
    }

    fn sysattr(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }
}
