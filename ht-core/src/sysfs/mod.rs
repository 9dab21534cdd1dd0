//! sysfs enumeration
//!
//! The only part of the crate that reads the filesystem. It turns the
//! kernel's device directories and the udev runtime database into raw
//! records and hwdb property lists, then feeds them to the device model.

mod record;
mod scan;

pub use record::SysfsRecord;
pub use scan::SysfsScanner;
