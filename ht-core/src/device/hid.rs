//! HID device specialization

use serde::Serialize;
use tracing::debug;

use super::kind::DeviceType;
use super::record::RawDeviceRecord;
use super::variant::{sysname, Draft};

/// Fields only HID devices carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HidDevice {
    /// Transport bus code (0x03 USB, 0x05 Bluetooth, ...)
    pub bus_type: Option<u16>,
}

impl HidDevice {
    pub(crate) fn initialize<R>(record: &R, draft: &mut Draft) -> Self
    where
        R: RawDeviceRecord + ?Sized,
    {
        draft.device_type |= DeviceType::HID;

        let ids = parse_hid_name(sysname(record.system_path()));
        if let Some((_, vendor, product)) = ids {
            draft.identity.vendor_id = Some(vendor);
            draft.identity.product_id = Some(product);
        }

        debug!(path = %record.system_path(), ids = ?ids, "Initialized HID device");
        Self {
            bus_type: ids.map(|(bus, _, _)| bus),
        }
    }
}

/// Parse the kernel name `BBBB:VVVV:PPPP.NNNN` into bus, vendor and product
fn parse_hid_name(name: &str) -> Option<(u16, u32, u32)> {
    let (ids, _instance) = name.split_once('.')?;
    let mut parts = ids.split(':');
    let bus = u16::from_str_radix(parts.next()?, 16).ok()?;
    let vendor = u32::from_str_radix(parts.next()?, 16).ok()?;
    let product = u32::from_str_radix(parts.next()?, 16).ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((bus, vendor, product))
}
