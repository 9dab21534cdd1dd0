//! Composite device model
//!
//! A [`Device`] is built once from a raw enumeration record and an optional
//! hardware database entry. After construction it only changes through the
//! child management operations in `tree`.
//!
//! # Ownership
//!
//! Every device is either a root held by its enumerator (see
//! [`crate::DeviceManager`]) or owned by exactly one parent's child map.
//! The parent link is the parent's system path, fixed at construction. It is
//! an identifier, never a second owner, so a device cannot be moved under a
//! different parent; it has to be rebuilt there instead.
//!
//! Nothing in this module performs I/O or holds locks. Mutation is expected
//! from a single owner (typically the loop that reacts to hotplug events).

mod dmi;
mod hid;
mod identity;
mod kind;
mod pci;
mod record;
mod tree;
mod usb;
mod variant;
mod wireless;

pub use dmi::DmiDevice;
pub use hid::HidDevice;
pub use identity::{HwdbProperties, Identity};
pub use kind::{DeviceAttribute, DeviceType};
pub use pci::{PciAddress, PciDevice};
pub use record::{MemoryRecord, RawDeviceRecord};
pub use usb::UsbDevice;
pub use variant::{Variant, VariantKind};
pub use wireless::{BluetoothDevice, WifiDevice};

use ht_error::{HwtreeError, Result};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::constants::sysattr;
use variant::Draft;

/// A hardware device and the devices it owns
#[derive(Debug, Serialize)]
pub struct Device {
    #[serde(flatten)]
    identity: Identity,
    system_path: String,
    device_type: DeviceType,
    attributes: DeviceAttribute,
    #[serde(skip_serializing_if = "HwdbProperties::is_empty")]
    hwdb: HwdbProperties,
    parent: Option<String>,
    variant: Variant,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    children: HashMap<String, Device>,
}

impl Device {
    /// Build a device from a raw record.
    ///
    /// `parent` is only remembered by path and cannot be changed later.
    /// `hwdb` is copied; when absent the vendor and name are not derived from
    /// it. A record with an empty system path is rejected.
    pub fn new<R>(
        parent: Option<&Device>,
        record: &R,
        hwdb: Option<&[(String, String)]>,
    ) -> Result<Self>
    where
        R: RawDeviceRecord + ?Sized,
    {
        let kind = VariantKind::from_subsystem(record.subsystem());

        let system_path = record.system_path().trim();
        if system_path.is_empty() {
            warn!(subsystem = ?record.subsystem(), "Rejecting device record without a system path");
            return Err(HwtreeError::MissingSystemPath {
                subsystem: record.subsystem().map(str::to_string),
            });
        }

        let mut draft = Draft::default();
        draft.identity.modalias = record.sysattr(sysattr::MODALIAS);

        let hwdb = match hwdb {
            Some(pairs) => {
                let props = HwdbProperties::from_pairs(pairs.iter().map(|(k, v)| (k, v)));
                draft.identity.vendor = props.vendor().map(str::to_string);
                draft.identity.name = props.model().map(str::to_string);
                props
            }
            None => HwdbProperties::default(),
        };

        let variant = kind.specialize(record, &mut draft);

        let Draft {
            mut identity,
            device_type,
            attributes,
        } = draft;

        if identity.name.is_none() {
            identity.name = Some(Identity::fallback_name(identity.product_id));
        }

        debug!(
            path = %system_path,
            variant = ?kind,
            name = ?identity.name,
            types = %device_type,
            "Constructed device"
        );

        Ok(Self {
            identity,
            system_path: system_path.to_string(),
            device_type,
            attributes,
            hwdb,
            parent: parent.map(|p| p.system_path.clone()),
            variant,
            children: HashMap::new(),
        })
    }

    /// Display name (model)
    pub fn name(&self) -> Option<&str> {
        self.identity.name.as_deref()
    }

    /// Display vendor (manufacturer)
    pub fn vendor(&self) -> Option<&str> {
        self.identity.vendor.as_deref()
    }

    pub fn vendor_id(&self) -> Option<u32> {
        self.identity.vendor_id
    }

    pub fn product_id(&self) -> Option<u32> {
        self.identity.product_id
    }

    /// Kernel modalias, used to find candidate driver packages
    pub fn modalias(&self) -> Option<&str> {
        self.identity.modalias.as_deref()
    }

    /// Fully qualified system path, unique among siblings
    pub fn system_path(&self) -> &str {
        &self.system_path
    }

    /// System path of the parent given at construction
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Own type bits, without looking at children
    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    /// Own attribute bits, without looking at children
    pub fn attributes(&self) -> DeviceAttribute {
        self.attributes
    }

    /// Single hwdb property, if the device had a database entry
    pub fn hwdb_property(&self, key: &str) -> Option<&str> {
        self.hwdb.get(key)
    }

    /// Every hwdb property copied at construction
    pub fn hwdb(&self) -> &HwdbProperties {
        &self.hwdb
    }

    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    pub fn kind(&self) -> VariantKind {
        self.variant.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hwdb(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn nvidia_gpu() -> MemoryRecord {
        MemoryRecord::new(Some("pci"), "/sys/devices/pci0000:00/0000:00:01.0/0000:01:00.0")
            .with_attr("vendor", "0x10de")
            .with_attr("device", "0x1b80")
            .with_attr("class", "0x030000")
            .with_attr("boot_vga", "1")
            .with_attr("modalias", "pci:v000010DEd00001B80sv*")
    }

    #[test]
    fn test_pci_device_construction() {
        let props = hwdb(&[
            ("ID_VENDOR_FROM_DATABASE", "NVIDIA Corporation"),
            ("ID_MODEL_FROM_DATABASE", "GP104 [GeForce GTX 1080]"),
        ]);
        let device = Device::new(None, &nvidia_gpu(), Some(&props)).unwrap();

        assert_eq!(device.kind(), VariantKind::Pci);
        assert_eq!(device.vendor(), Some("NVIDIA Corporation"));
        assert_eq!(device.name(), Some("GP104 [GeForce GTX 1080]"));
        assert_eq!(device.vendor_id(), Some(0x10de));
        assert_eq!(device.product_id(), Some(0x1b80));
        assert_eq!(device.modalias(), Some("pci:v000010DEd00001B80sv*"));
        assert_eq!(device.device_type(), DeviceType::PCI | DeviceType::GPU);
        assert_eq!(device.attributes(), DeviceAttribute::BOOT_VGA);

        let pci = device.variant().as_pci().unwrap();
        assert_eq!(pci.address.unwrap().to_string(), "0000:01:00.0");
        assert_eq!(pci.base_class(), Some(0x03));
    }

    #[test]
    fn test_missing_path_is_rejected() {
        let record = MemoryRecord::new(Some("pci"), "");
        let err = Device::new(None, &record, None).unwrap_err();
        assert!(matches!(err, HwtreeError::MissingSystemPath { .. }));

        let record = MemoryRecord::new(Some("usb"), "  \t\n");
        let err = Device::new(None, &record, None).unwrap_err();
        assert!(matches!(
            err,
            HwtreeError::MissingSystemPath { subsystem: Some(ref s) } if s == "usb"
        ));
    }

    #[test]
    fn test_unknown_subsystem_is_generic() {
        let record = MemoryRecord::new(Some("nonsense"), "/sys/devices/virtual/misc/foo");
        let device = Device::new(None, &record, None).unwrap();
        assert_eq!(device.kind(), VariantKind::Generic);
        assert_eq!(device.device_type(), DeviceType::ANY);
        assert_eq!(device.attributes(), DeviceAttribute::NONE);
        assert_eq!(device.modalias(), None);
    }

    #[test]
    fn test_name_falls_back_to_plain_model_key() {
        let record = MemoryRecord::new(None, "/sys/devices/foo");
        let props = hwdb(&[("ID_MODEL", "Foo")]);
        let device = Device::new(None, &record, Some(&props)).unwrap();
        assert_eq!(device.name(), Some("Foo"));
        assert_eq!(device.vendor(), None);
    }

    #[test]
    fn test_name_synthesized_from_product_id() {
        let record = MemoryRecord::new(Some("pci"), "/sys/devices/pci0000:00/0000:00:1f.3")
            .with_attr("device", "0x10");
        let device = Device::new(None, &record, None).unwrap();
        assert_eq!(device.name(), Some("Device 10"));
    }

    #[test]
    fn test_vendor_database_key_wins() {
        let record = MemoryRecord::new(None, "/sys/devices/foo");
        let props = hwdb(&[("ID_VENDOR", "acme"), ("ID_VENDOR_FROM_DATABASE", "ACME Corp")]);
        let device = Device::new(None, &record, Some(&props)).unwrap();
        assert_eq!(device.vendor(), Some("ACME Corp"));
        assert_eq!(device.hwdb_property("ID_VENDOR"), Some("acme"));
    }

    #[test]
    fn test_hwdb_is_copied() {
        let record = MemoryRecord::new(None, "/sys/devices/foo");
        let mut props = hwdb(&[("ID_MODEL", "Foo")]);
        let device = Device::new(None, &record, Some(&props)).unwrap();
        props[0].1 = "Bar".to_string();
        props.push(("ID_VENDOR".to_string(), "late".to_string()));
        assert_eq!(device.hwdb_property("ID_MODEL"), Some("Foo"));
        assert_eq!(device.vendor(), None);
    }

    #[test]
    fn test_parent_is_fixed_at_construction() {
        let root = Device::new(None, &MemoryRecord::new(None, "/sys/devices/root"), None).unwrap();
        let child = Device::new(
            Some(&root),
            &MemoryRecord::new(None, "/sys/devices/root/child"),
            None,
        )
        .unwrap();
        assert_eq!(root.parent(), None);
        assert_eq!(child.parent(), Some("/sys/devices/root"));
    }

    #[test]
    fn test_usb_interface() {
        let record = MemoryRecord::new(Some("usb"), "/sys/devices/pci0000:00/0000:00:14.0/usb1/1-2/1-2:1.0")
            .with_attr("bInterfaceClass", "03");
        let device = Device::new(None, &record, None).unwrap();
        assert_eq!(device.device_type(), DeviceType::USB | DeviceType::HID);
        assert_eq!(device.attributes(), DeviceAttribute::INTERFACE);

        let usb = device.variant().as_usb().unwrap();
        assert_eq!(usb.bus_address, "1-2:1.0");
        assert!(usb.is_interface());
        assert_eq!(device.name(), Some("Device 0"));
    }

    #[test]
    fn test_usb_device_descriptor_strings() {
        let record = MemoryRecord::new(Some("usb"), "/sys/devices/pci0000:00/0000:00:14.0/usb1/1-2")
            .with_attr("idVendor", "046d")
            .with_attr("idProduct", "c52b")
            .with_attr("busnum", "1")
            .with_attr("devnum", "3")
            .with_attr("bDeviceClass", "00")
            .with_attr("manufacturer", "Logitech")
            .with_attr("product", "USB Receiver");
        let device = Device::new(None, &record, None).unwrap();
        assert_eq!(device.vendor(), Some("Logitech"));
        assert_eq!(device.name(), Some("USB Receiver"));
        assert_eq!(device.vendor_id(), Some(0x046d));
        assert_eq!(device.product_id(), Some(0xc52b));
        assert_eq!(device.device_type(), DeviceType::USB);
        assert_eq!(device.attributes(), DeviceAttribute::NONE);

        let usb = device.variant().as_usb().unwrap();
        assert_eq!(usb.bus_number, Some(1));
        assert_eq!(usb.device_number, Some(3));
        assert!(!usb.is_interface());
    }

    #[test]
    fn test_dmi_fills_identity() {
        let record = MemoryRecord::new(Some("dmi"), "/sys/devices/virtual/dmi/id")
            .with_attr("sys_vendor", "LENOVO")
            .with_attr("product_name", "20HRCTO1WW")
            .with_attr("board_name", "20HRCTO1WW")
            .with_attr("bios_version", "N1MET31W (1.16 )");
        let device = Device::new(None, &record, None).unwrap();
        assert_eq!(device.vendor(), Some("LENOVO"));
        assert_eq!(device.name(), Some("20HRCTO1WW"));
        assert_eq!(device.device_type(), DeviceType::ANY);

        let dmi = device.variant().as_dmi().unwrap();
        assert_eq!(dmi.bios_version.as_deref(), Some("N1MET31W (1.16 )"));
    }

    #[test]
    fn test_hid_and_wireless_variants() {
        let hid = Device::new(
            None,
            &MemoryRecord::new(Some("hid"), "/sys/devices/usb1/1-2/1-2:1.0/0003:046D:C52B.0001"),
            None,
        )
        .unwrap();
        assert_eq!(hid.device_type(), DeviceType::HID);
        assert_eq!(hid.vendor_id(), Some(0x046d));
        assert_eq!(hid.name(), Some("Device c52b"));

        let bt = Device::new(
            None,
            &MemoryRecord::new(Some("bluetooth"), "/sys/devices/usb1/1-7/1-7:1.0/bluetooth/hci0")
                .with_attr("address", "00:1a:7d:da:71:13"),
            None,
        )
        .unwrap();
        assert_eq!(bt.device_type(), DeviceType::WIRELESS);
        assert!(matches!(bt.variant(), Variant::Bluetooth(b) if b.address.is_some()));

        let wifi = Device::new(
            None,
            &MemoryRecord::new(Some("ieee80211"), "/sys/devices/pci0000:00/0000:00:14.3/ieee80211/phy0"),
            None,
        )
        .unwrap();
        assert_eq!(wifi.kind(), VariantKind::Wifi);
        assert_eq!(wifi.device_type(), DeviceType::WIRELESS);
    }

    #[test]
    fn test_serialized_shape() {
        let record = MemoryRecord::new(Some("pci"), "/sys/devices/pci0000:00/0000:00:02.0")
            .with_attr("vendor", "0x8086")
            .with_attr("class", "0x030000");
        let device = Device::new(None, &record, None).unwrap();

        let value = serde_json::to_value(&device).unwrap();
        assert_eq!(value["system_path"], "/sys/devices/pci0000:00/0000:00:02.0");
        assert_eq!(value["vendor_id"], 0x8086);
        assert_eq!(value["variant"]["kind"], "pci");
        assert_eq!(value["variant"]["address"]["bus"], 0);
        assert!(value.get("children").is_none());
        assert!(value.get("hwdb").is_none());
    }
}
