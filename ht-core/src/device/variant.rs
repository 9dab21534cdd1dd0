//! Subsystem-driven device specialization
//!
//! The subsystem name picks one of a closed set of variants. Each variant
//! runs its own initializer after the common construction steps and may fill
//! in ids, type and attribute bits, plus fields only that variant carries.

use serde::Serialize;
use std::fmt;
use tracing::{trace, warn};

use super::dmi::DmiDevice;
use super::hid::HidDevice;
use super::identity::Identity;
use super::kind::{DeviceAttribute, DeviceType};
use super::pci::PciDevice;
use super::record::RawDeviceRecord;
use super::usb::UsbDevice;
use super::wireless::{BluetoothDevice, WifiDevice};
use crate::constants::subsystem;

/// Variant tag without payload, selected from the subsystem name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    Generic,
    Pci,
    Usb,
    Dmi,
    Hid,
    Bluetooth,
    Wifi,
}

impl VariantKind {
    /// Exact subsystem match; anything else, including no subsystem, is generic
    pub fn from_subsystem(name: Option<&str>) -> Self {
        match name {
            Some(subsystem::USB) => VariantKind::Usb,
            Some(subsystem::PCI) => VariantKind::Pci,
            Some(subsystem::DMI) => VariantKind::Dmi,
            Some(subsystem::HID) => VariantKind::Hid,
            Some(subsystem::BLUETOOTH) => VariantKind::Bluetooth,
            Some(subsystem::WIFI) => VariantKind::Wifi,
            _ => VariantKind::Generic,
        }
    }

    /// Run the variant initializer over a partially built device
    pub(crate) fn specialize<R>(self, record: &R, draft: &mut Draft) -> Variant
    where
        R: RawDeviceRecord + ?Sized,
    {
        trace!(variant = ?self, path = %record.system_path(), "Specializing device");
        match self {
            VariantKind::Generic => Variant::Generic,
            VariantKind::Pci => Variant::Pci(PciDevice::initialize(record, draft)),
            VariantKind::Usb => Variant::Usb(UsbDevice::initialize(record, draft)),
            VariantKind::Dmi => Variant::Dmi(DmiDevice::initialize(record, draft)),
            VariantKind::Hid => Variant::Hid(HidDevice::initialize(record, draft)),
            VariantKind::Bluetooth => {
                Variant::Bluetooth(BluetoothDevice::initialize(record, draft))
            }
            VariantKind::Wifi => Variant::Wifi(WifiDevice::initialize(record, draft)),
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VariantKind::Generic => "generic",
            VariantKind::Pci => "pci",
            VariantKind::Usb => "usb",
            VariantKind::Dmi => "dmi",
            VariantKind::Hid => "hid",
            VariantKind::Bluetooth => "bluetooth",
            VariantKind::Wifi => "wifi",
        };
        f.write_str(name)
    }
}

/// Variant of a device together with its variant-only fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Variant {
    Generic,
    Pci(PciDevice),
    Usb(UsbDevice),
    Dmi(DmiDevice),
    Hid(HidDevice),
    Bluetooth(BluetoothDevice),
    Wifi(WifiDevice),
}

impl Variant {
    pub fn kind(&self) -> VariantKind {
        match self {
            Variant::Generic => VariantKind::Generic,
            Variant::Pci(_) => VariantKind::Pci,
            Variant::Usb(_) => VariantKind::Usb,
            Variant::Dmi(_) => VariantKind::Dmi,
            Variant::Hid(_) => VariantKind::Hid,
            Variant::Bluetooth(_) => VariantKind::Bluetooth,
            Variant::Wifi(_) => VariantKind::Wifi,
        }
    }

    pub fn as_pci(&self) -> Option<&PciDevice> {
        match self {
            Variant::Pci(pci) => Some(pci),
            _ => None,
        }
    }

    pub fn as_usb(&self) -> Option<&UsbDevice> {
        match self {
            Variant::Usb(usb) => Some(usb),
            _ => None,
        }
    }

    pub fn as_dmi(&self) -> Option<&DmiDevice> {
        match self {
            Variant::Dmi(dmi) => Some(dmi),
            _ => None,
        }
    }
}

/// Fields an initializer is allowed to touch while the device is being built
#[derive(Debug, Default)]
pub(crate) struct Draft {
    pub identity: Identity,
    pub device_type: DeviceType,
    pub attributes: DeviceAttribute,
}

/// Parse a hex id such as `0x8086` or `046d`
pub(crate) fn parse_hex_id(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Read a hex attribute, logging values that are present but malformed
pub(crate) fn read_hex_attr<R>(record: &R, name: &str) -> Option<u32>
where
    R: RawDeviceRecord + ?Sized,
{
    let raw = record.sysattr(name)?;
    let parsed = parse_hex_id(&raw);
    if parsed.is_none() {
        warn!(
            path = %record.system_path(),
            attribute = %name,
            value = %raw,
            "Ignoring malformed hex attribute"
        );
    }
    parsed
}

/// Read a decimal attribute
pub(crate) fn read_dec_attr<R>(record: &R, name: &str) -> Option<u16>
where
    R: RawDeviceRecord + ?Sized,
{
    record.sysattr(name).and_then(|raw| raw.trim().parse().ok())
}

/// Last segment of a system path, which is the kernel's name for the device
pub(crate) fn sysname(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subsystem_mapping() {
        assert_eq!(VariantKind::from_subsystem(Some("usb")), VariantKind::Usb);
        assert_eq!(VariantKind::from_subsystem(Some("pci")), VariantKind::Pci);
        assert_eq!(VariantKind::from_subsystem(Some("dmi")), VariantKind::Dmi);
        assert_eq!(VariantKind::from_subsystem(Some("hid")), VariantKind::Hid);
        assert_eq!(
            VariantKind::from_subsystem(Some("bluetooth")),
            VariantKind::Bluetooth
        );
        assert_eq!(
            VariantKind::from_subsystem(Some("ieee80211")),
            VariantKind::Wifi
        );
    }

    #[test]
    fn test_unknown_subsystems_are_generic() {
        assert_eq!(
            VariantKind::from_subsystem(Some("nonsense")),
            VariantKind::Generic
        );
        assert_eq!(VariantKind::from_subsystem(Some("PCI")), VariantKind::Generic);
        assert_eq!(VariantKind::from_subsystem(None), VariantKind::Generic);
    }

    #[test]
    fn test_parse_hex_id() {
        assert_eq!(parse_hex_id("0x8086"), Some(0x8086));
        assert_eq!(parse_hex_id("046d\n"), Some(0x046d));
        assert_eq!(parse_hex_id("0x"), None);
        assert_eq!(parse_hex_id("zz"), None);
    }

    #[test]
    fn test_sysname() {
        assert_eq!(sysname("/sys/devices/pci0000:00/0000:00:02.0"), "0000:00:02.0");
        assert_eq!(sysname("/sys/devices/usb1/1-2/"), "1-2");
        assert_eq!(sysname("plain"), "plain");
    }
}
