//! hwtree core library
//!
//! An in-memory, queryable tree of the hardware attached to a machine.
//!
//! # Module Structure
//!
//! - `device/` - The composite device model: construction from raw records,
//!   subsystem specialization, child ownership and recursive type/attribute
//!   queries. Pure data, no I/O.
//! - `manager` - Holder of the top-level devices and snapshot diffs
//! - `hwdb` - udev runtime database parsing
//! - `sysfs/` - Enumerator that reads `/sys` and feeds the device model
//!
//! # Example
//!
//! ```
//! use ht_core::{Device, DeviceType, MemoryRecord};
//!
//! let record = MemoryRecord::new(Some("pci"), "/sys/devices/pci0000:00/0000:00:02.0")
//!     .with_attr("class", "0x030000");
//! let gpu = Device::new(None, &record, None).unwrap();
//! assert!(gpu.has_type(DeviceType::PCI | DeviceType::GPU));
//! ```

pub mod constants;
pub mod device;
pub mod hwdb;
pub mod manager;
pub mod sysfs;

// Re-export the device model
pub use device::{
    BluetoothDevice, Device, DeviceAttribute, DeviceType, DmiDevice, HidDevice, HwdbProperties,
    Identity, MemoryRecord, PciAddress, PciDevice, RawDeviceRecord, UsbDevice, Variant,
    VariantKind, WifiDevice,
};

// Re-export manager types
pub use manager::{DeviceManager, ManagerDiff};

// Re-export the enumerator
pub use sysfs::{SysfsRecord, SysfsScanner};

// Re-export error types
pub use ht_error::{HwtreeError, Result};
