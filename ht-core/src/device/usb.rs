//! USB device and interface specialization
//!
//! The kernel exposes a USB device and each of its interfaces as separate
//! nodes. Devices carry ids and bus numbers; interfaces carry the class that
//! says what the function actually is, and are marked as pseudo-devices.

use serde::Serialize;
use tracing::debug;

use super::kind::{DeviceAttribute, DeviceType};
use super::record::RawDeviceRecord;
use super::variant::{read_dec_attr, read_hex_attr, sysname, Draft};
use crate::constants::{sysattr, usb_class};

/// Fields only USB devices carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsbDevice {
    /// Kernel bus address, e.g. `1-2` for a device or `1-2:1.0` for an interface
    pub bus_address: String,
    pub bus_number: Option<u16>,
    pub device_number: Option<u16>,
    /// bInterfaceClass for interfaces, bDeviceClass otherwise
    pub class: Option<u8>,
}

impl UsbDevice {
    pub(crate) fn initialize<R>(record: &R, draft: &mut Draft) -> Self
    where
        R: RawDeviceRecord + ?Sized,
    {
        draft.device_type |= DeviceType::USB;

        let interface_class = read_hex_attr(record, sysattr::USB_INTERFACE_CLASS);
        let class = match interface_class {
            Some(class) => {
                draft.attributes |= DeviceAttribute::INTERFACE;
                Some(class)
            }
            None => read_hex_attr(record, sysattr::USB_DEVICE_CLASS),
        }
        .and_then(|c| u8::try_from(c).ok());

        if let Some(class) = class {
            draft.device_type |= class_types(class);
        }

        if let Some(id) = read_hex_attr(record, sysattr::USB_VENDOR) {
            draft.identity.vendor_id = Some(id);
        }
        if let Some(id) = read_hex_attr(record, sysattr::USB_PRODUCT) {
            draft.identity.product_id = Some(id);
        }

        // Descriptor strings only stand in when the database had nothing
        if draft.identity.vendor.is_none() {
            draft.identity.vendor = record.sysattr(sysattr::USB_MANUFACTURER);
        }
        if draft.identity.name.is_none() {
            draft.identity.name = record.sysattr(sysattr::USB_PRODUCT_NAME);
        }

        let usb = Self {
            bus_address: sysname(record.system_path()).to_string(),
            bus_number: read_dec_attr(record, sysattr::USB_BUSNUM),
            device_number: read_dec_attr(record, sysattr::USB_DEVNUM),
            class,
        };

        debug!(
            path = %record.system_path(),
            address = %usb.bus_address,
            interface = interface_class.is_some(),
            types = %draft.device_type,
            "Initialized USB device"
        );
        usb
    }

    pub fn is_interface(&self) -> bool {
        self.bus_address.contains(':')
    }
}

/// Functional types implied by a USB class code
fn class_types(class: u8) -> DeviceType {
    match class {
        usb_class::AUDIO => DeviceType::AUDIO,
        usb_class::HID => DeviceType::HID,
        usb_class::IMAGE => DeviceType::IMAGE,
        usb_class::PRINTER => DeviceType::PRINTER,
        usb_class::MASS_STORAGE => DeviceType::STORAGE,
        usb_class::VIDEO => DeviceType::VIDEO,
        usb_class::WIRELESS => DeviceType::WIRELESS,
        _ => DeviceType::ANY,
    }
}
