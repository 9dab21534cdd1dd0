//! Device type and attribute bitmasks
//!
//! A device may carry several functional types at once (a USB webcam is
//! `USB | VIDEO | AUDIO`) and, independently, structural attributes such as
//! being the adapter the firmware booted on. The empty mask is "nothing
//! declared", never "everything".

use bitflags::bitflags;
use ht_error::HwtreeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Functional categories of a device
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DeviceType: u32 {
        /// Audio device
        const AUDIO = 1 << 0;
        /// Graphics adapter (onboard or discrete)
        const GPU = 1 << 1;
        /// Human interface device (mouse, keyboard, ...)
        const HID = 1 << 2;
        /// Imaging device such as a scanner or still camera
        const IMAGE = 1 << 3;
        /// Connected via PCI
        const PCI = 1 << 4;
        /// Printer
        const PRINTER = 1 << 5;
        /// Storage device
        const STORAGE = 1 << 6;
        /// Video device, e.g. a webcam
        const VIDEO = 1 << 7;
        /// Wireless device (dongle, bluetooth controller, wifi phy)
        const WIRELESS = 1 << 8;
        /// Connected via USB
        const USB = 1 << 9;
    }
}

impl DeviceType {
    /// No declared type bits
    pub const ANY: Self = Self::empty();

    const NAMES: &'static [(&'static str, DeviceType)] = &[
        ("audio", DeviceType::AUDIO),
        ("gpu", DeviceType::GPU),
        ("hid", DeviceType::HID),
        ("image", DeviceType::IMAGE),
        ("pci", DeviceType::PCI),
        ("printer", DeviceType::PRINTER),
        ("storage", DeviceType::STORAGE),
        ("video", DeviceType::VIDEO),
        ("wireless", DeviceType::WIRELESS),
        ("usb", DeviceType::USB),
    ];

    /// Lowercase names of every set bit, in bit order
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(_, bit)| self.contains(*bit))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl Default for DeviceType {
    fn default() -> Self {
        Self::ANY
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "any");
        }
        write!(f, "{}", self.names().join("|"))
    }
}

/// Parses `"gpu"`, `"pci,gpu"` or `"pci|gpu"`
impl FromStr for DeviceType {
    type Err = HwtreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_names(s, Self::NAMES, |name| HwtreeError::UnknownDeviceType(name.to_string()))
    }
}

bitflags! {
    /// Structural flags that are not functional categories
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DeviceAttribute: u32 {
        /// The GPU the system booted with
        const BOOT_VGA = 1 << 0;
        /// Pseudo-device such as a USB interface
        const INTERFACE = 1 << 1;
    }
}

impl DeviceAttribute {
    /// No declared attribute bits
    pub const NONE: Self = Self::empty();

    const NAMES: &'static [(&'static str, DeviceAttribute)] = &[
        ("boot-vga", DeviceAttribute::BOOT_VGA),
        ("interface", DeviceAttribute::INTERFACE),
    ];

    /// Lowercase names of every set bit, in bit order
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(_, bit)| self.contains(*bit))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl Default for DeviceAttribute {
    fn default() -> Self {
        Self::NONE
    }
}

impl fmt::Display for DeviceAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        write!(f, "{}", self.names().join("|"))
    }
}

impl FromStr for DeviceAttribute {
    type Err = HwtreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_names(s, Self::NAMES, |name| {
            HwtreeError::UnknownDeviceAttribute(name.to_string())
        })
    }
}

fn parse_names<T>(
    input: &str,
    table: &[(&str, T)],
    unknown: impl Fn(&str) -> HwtreeError,
) -> Result<T, HwtreeError>
where
    T: bitflags::Flags + Copy,
{
    let mut mask = T::empty();
    for raw in input.split([',', '|']) {
        let name = raw.trim().to_ascii_lowercase().replace('_', "-");
        if name.is_empty() {
            continue;
        }
        let bit = table
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, bit)| *bit)
            .ok_or_else(|| unknown(raw.trim()))?;
        mask = mask.union(bit);
    }
    Ok(mask)
}
