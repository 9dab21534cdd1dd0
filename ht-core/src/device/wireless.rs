//! Bluetooth and WiFi specialization

use serde::Serialize;

use super::kind::DeviceType;
use super::record::RawDeviceRecord;
use super::variant::Draft;
use crate::constants::sysattr;

/// Fields only Bluetooth controllers carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BluetoothDevice {
    pub address: Option<String>,
}

impl BluetoothDevice {
    pub(crate) fn initialize<R>(record: &R, draft: &mut Draft) -> Self
    where
        R: RawDeviceRecord + ?Sized,
    {
        draft.device_type |= DeviceType::WIRELESS;
        Self {
            address: record.sysattr(sysattr::BLUETOOTH_ADDRESS),
        }
    }
}

/// Fields only WiFi phys carry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WifiDevice {
    pub mac_address: Option<String>,
}

impl WifiDevice {
    pub(crate) fn initialize<R>(record: &R, draft: &mut Draft) -> Self
    where
        R: RawDeviceRecord + ?Sized,
    {
        draft.device_type |= DeviceType::WIRELESS;
        Self {
            mac_address: record.sysattr(sysattr::WIFI_MAC_ADDRESS),
        }
    }
}
