//! PCI device specialization

use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::kind::{DeviceAttribute, DeviceType};
use super::record::RawDeviceRecord;
use super::variant::{read_hex_attr, sysname, Draft};
use crate::constants::{pci_class, sysattr};

/// PCI location `domain:bus:device.function`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PciAddress {
    pub domain: u32,
    pub bus: u8,
    pub device: u8,
    pub function: u8,
}

impl PciAddress {
    /// Parse `DDDD:BB:DD.F`, the kernel name of a PCI device.
    ///
    /// The domain has at least four hex digits; VMD domains such as
    /// `10000` have more.
    pub fn parse(name: &str) -> Option<Self> {
        let (location, function) = name.rsplit_once('.')?;
        let mut parts = location.split(':');
        let (domain, bus, device) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some()
            || domain.len() < 4
            || bus.len() != 2
            || device.len() != 2
            || function.len() != 1
        {
            return None;
        }
        Some(Self {
            domain: hex_field(domain)?,
            bus: u8::try_from(hex_field(bus)?).ok()?,
            device: u8::try_from(hex_field(device)?).ok()?,
            function: u8::try_from(hex_field(function)?).ok()?,
        })
    }

    /// Bus id in the decimal form X.Org's `BusID` option expects
    pub fn xorg_id(&self) -> String {
        format!("PCI:{}:{}:{}", self.bus, self.device, self.function)
    }
}

impl fmt::Display for PciAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04x}:{:02x}:{:02x}.{:x}",
            self.domain, self.bus, self.device, self.function
        )
    }
}

/// Fields only PCI devices carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PciDevice {
    pub address: Option<PciAddress>,
    /// 24-bit class code: base class, subclass, programming interface
    pub class: Option<u32>,
    pub subsystem_vendor_id: Option<u32>,
    pub subsystem_device_id: Option<u32>,
}

impl PciDevice {
    pub(crate) fn initialize<R>(record: &R, draft: &mut Draft) -> Self
    where
        R: RawDeviceRecord + ?Sized,
    {
        draft.device_type |= DeviceType::PCI;

        if let Some(id) = read_hex_attr(record, sysattr::PCI_VENDOR) {
            draft.identity.vendor_id = Some(id);
        }
        if let Some(id) = read_hex_attr(record, sysattr::PCI_DEVICE) {
            draft.identity.product_id = Some(id);
        }

        let class = read_hex_attr(record, sysattr::PCI_CLASS);
        if let Some(class) = class {
            draft.device_type |= class_types(class);
        }

        if record.sysattr(sysattr::PCI_BOOT_VGA).as_deref().map(str::trim) == Some("1") {
            draft.attributes |= DeviceAttribute::BOOT_VGA;
        }

        let pci = Self {
            address: PciAddress::parse(sysname(record.system_path())),
            class,
            subsystem_vendor_id: read_hex_attr(record, sysattr::PCI_SUBSYSTEM_VENDOR),
            subsystem_device_id: read_hex_attr(record, sysattr::PCI_SUBSYSTEM_DEVICE),
        };

        debug!(
            path = %record.system_path(),
            class = ?pci.class.map(|c| format!("{:06x}", c)),
            types = %draft.device_type,
            "Initialized PCI device"
        );
        pci
    }

    /// Base class byte
    pub fn base_class(&self) -> Option<u8> {
        self.class.map(|c| ((c >> 16) & 0xff) as u8)
    }
}

/// Hex digits only; `from_str_radix` alone would accept a leading `+`
fn hex_field(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(s, 16).ok()
}

/// Functional types implied by a PCI class code
fn class_types(class: u32) -> DeviceType {
    let base = (class >> 16) & 0xff;
    let base_sub = (class >> 8) & 0xffff;

    if base == pci_class::DISPLAY {
        DeviceType::GPU
    } else if base == pci_class::MASS_STORAGE {
        DeviceType::STORAGE
    } else if base_sub == pci_class::MULTIMEDIA_AUDIO || base_sub == pci_class::MULTIMEDIA_HDA {
        DeviceType::AUDIO
    } else {
        DeviceType::ANY
    }
}
