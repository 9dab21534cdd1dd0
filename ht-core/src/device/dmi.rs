//! DMI (firmware system information) specialization
//!
//! The DMI node describes the machine itself. It has no hwdb entry, so the
//! display vendor and name come from the firmware tables when nothing else
//! supplied them.

use serde::Serialize;
use tracing::debug;

use super::record::RawDeviceRecord;
use super::variant::Draft;
use crate::constants::sysattr;

/// Firmware-reported system and board strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DmiDevice {
    pub sys_vendor: Option<String>,
    pub product_name: Option<String>,
    pub product_version: Option<String>,
    pub board_vendor: Option<String>,
    pub board_name: Option<String>,
    pub bios_vendor: Option<String>,
    pub bios_version: Option<String>,
}

impl DmiDevice {
    pub(crate) fn initialize<R>(record: &R, draft: &mut Draft) -> Self
    where
        R: RawDeviceRecord + ?Sized,
    {
        let read = |name: &str| {
            record
                .sysattr(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let dmi = Self {
            sys_vendor: read(sysattr::DMI_SYS_VENDOR),
            product_name: read(sysattr::DMI_PRODUCT_NAME),
            product_version: read(sysattr::DMI_PRODUCT_VERSION),
            board_vendor: read(sysattr::DMI_BOARD_VENDOR),
            board_name: read(sysattr::DMI_BOARD_NAME),
            bios_vendor: read(sysattr::DMI_BIOS_VENDOR),
            bios_version: read(sysattr::DMI_BIOS_VERSION),
        };

        if draft.identity.vendor.is_none() {
            draft.identity.vendor = dmi.sys_vendor.clone().or_else(|| dmi.board_vendor.clone());
        }
        if draft.identity.name.is_none() {
            draft.identity.name = dmi.product_name.clone().or_else(|| dmi.board_name.clone());
        }

        debug!(
            path = %record.system_path(),
            vendor = ?draft.identity.vendor,
            product = ?draft.identity.name,
            "Initialized DMI device"
        );
        dmi
    }
}
