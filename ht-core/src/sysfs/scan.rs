//! Tree construction from a sysfs mount

use ht_error::{HwtreeError, Result};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn};

use super::record::SysfsRecord;
use crate::constants::{paths, subsystem, sysattr};
use crate::device::{Device, RawDeviceRecord};
use crate::hwdb;
use crate::manager::DeviceManager;

/// Enumerates devices of selected subsystems and arranges them by ancestry
#[derive(Debug, Clone)]
pub struct SysfsScanner {
    sysfs_root: PathBuf,
    udev_data_dir: PathBuf,
    subsystems: Vec<String>,
}

impl Default for SysfsScanner {
    fn default() -> Self {
        Self::new(paths::SYSFS_ROOT, paths::UDEV_DATA_DIR)
    }
}

impl SysfsScanner {
    pub fn new(sysfs_root: impl Into<PathBuf>, udev_data_dir: impl Into<PathBuf>) -> Self {
        Self {
            sysfs_root: sysfs_root.into(),
            udev_data_dir: udev_data_dir.into(),
            subsystems: subsystem::DEFAULT_SCAN.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the subsystems to enumerate
    pub fn with_subsystems<I, S>(mut self, subsystems: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subsystems = subsystems.into_iter().map(Into::into).collect();
        self
    }

    pub fn subsystems(&self) -> &[String] {
        &self.subsystems
    }

    /// Build a fresh device forest.
    ///
    /// Each device is parented to its nearest enumerated ancestor directory,
    /// so a USB interface lands under its USB device and that under the PCI
    /// host controller when both subsystems are scanned.
    pub fn scan(&self) -> Result<DeviceManager> {
        if !self.sysfs_root.is_dir() {
            return Err(HwtreeError::FileNotFound(self.sysfs_root.clone()));
        }

        debug!(root = ?self.sysfs_root, subsystems = ?self.subsystems, "Scanning sysfs");

        let mut records: BTreeMap<PathBuf, SysfsRecord> = BTreeMap::new();
        for name in &self.subsystems {
            for path in self.list_subsystem(name)? {
                records
                    .entry(path.clone())
                    .or_insert_with(|| SysfsRecord::new(path).or_subsystem(name));
            }
        }

        let mut ordered: Vec<SysfsRecord> = records.into_values().collect();
        ordered.sort_by_key(|r| r.path().components().count());

        let mut manager = DeviceManager::new();
        let mut placed: HashSet<PathBuf> = HashSet::new();

        for record in &ordered {
            let parent_path = record
                .path()
                .ancestors()
                .skip(1)
                .find(|a| placed.contains(*a))
                .map(|a| a.to_string_lossy().into_owned());

            let properties = self.load_hwdb(record);

            let device = {
                let parent = parent_path.as_deref().and_then(|p| manager.device(p));
                Device::new(parent, record, properties.as_deref())
            };

            let device = match device {
                Ok(device) => device,
                Err(e) => {
                    warn!(path = ?record.path(), error = %e, "Skipping device");
                    continue;
                }
            };

            if let Err(e) = manager.add_device(device) {
                warn!(path = ?record.path(), error = %e, "Could not place device in tree");
                continue;
            }
            placed.insert(record.path().to_path_buf());
        }

        info!(
            roots = manager.len(),
            total = manager.total_devices(),
            "sysfs scan complete"
        );
        Ok(manager)
    }

    /// Canonical device directories registered under a bus or class
    fn list_subsystem(&self, name: &str) -> Result<Vec<PathBuf>> {
        let bus_dir = self.sysfs_root.join("bus").join(name).join("devices");
        let class_dir = self.sysfs_root.join("class").join(name);

        let dir = if bus_dir.is_dir() {
            bus_dir
        } else if class_dir.is_dir() {
            class_dir
        } else {
            debug!(subsystem = %name, "Subsystem not present");
            return Ok(Vec::new());
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            match fs::canonicalize(entry.path()) {
                Ok(path) if path.is_dir() => {
                    trace!(subsystem = %name, path = ?path, "Found device");
                    paths.push(path);
                }
                Ok(_) => {}
                Err(e) => {
                    trace!(path = ?entry.path(), error = %e, "Dangling device link");
                }
            }
        }
        Ok(paths)
    }

    /// Properties from the udev runtime database, if udev knows the device
    fn load_hwdb(&self, record: &SysfsRecord) -> Option<Vec<(String, String)>> {
        let key = hwdb::database_key(
            record.subsystem().unwrap_or_default(),
            record.sysname(),
            record.sysattr(sysattr::DEV).as_deref(),
        );
        let file = self.udev_data_dir.join(&key);
        read_database_file(&file)
    }
}

fn read_database_file(file: &Path) -> Option<Vec<(String, String)>> {
    match fs::read_to_string(file) {
        Ok(content) => Some(hwdb::parse_properties(&content)),
        Err(e) => {
            trace!(path = ?file, error = %e, "No udev database entry");
            None
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::device::{DeviceAttribute, DeviceType, VariantKind};
    use std::os::unix::fs::symlink;
    use tempfile::TempDir;

    struct FakeSysfs {
        dir: TempDir,
    }

    impl FakeSysfs {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            fs::create_dir_all(dir.path().join("sys/devices")).unwrap();
            fs::create_dir_all(dir.path().join("udev")).unwrap();
            Self { dir }
        }

        fn root(&self) -> PathBuf {
            self.dir.path().join("sys")
        }

        fn udev(&self) -> PathBuf {
            self.dir.path().join("udev")
        }

        fn add_device(&self, subsystem: &str, rel: &str, attrs: &[(&str, &str)]) -> PathBuf {
            let device = self.root().join("devices").join(rel);
            fs::create_dir_all(&device).unwrap();
            for (name, value) in attrs {
                fs::write(device.join(name), format!("{}\n", value)).unwrap();
            }

            let bus = self.root().join("bus").join(subsystem);
            let devices = bus.join("devices");
            fs::create_dir_all(&devices).unwrap();
            let sysname = device.file_name().unwrap().to_owned();
            symlink(&device, devices.join(&sysname)).unwrap();
            symlink(&bus, device.join("subsystem")).unwrap();
            device
        }
    }

    #[test]
    fn test_scan_builds_ancestry() {
        let fake = FakeSysfs::new();
        fake.add_device(
            "pci",
            "pci0000:00/0000:00:14.0",
            &[("vendor", "0x8086"), ("device", "0xa36d"), ("class", "0x0c0330")],
        );
        fake.add_device(
            "usb",
            "pci0000:00/0000:00:14.0/usb1/1-2",
            &[("idVendor", "046d"), ("idProduct", "c52b"), ("dev", "189:2")],
        );
        fake.add_device(
            "usb",
            "pci0000:00/0000:00:14.0/usb1/1-2/1-2:1.0",
            &[("bInterfaceClass", "03")],
        );
        fake.add_device(
            "pci",
            "pci0000:00/0000:00:02.0",
            &[("vendor", "0x8086"), ("device", "0x3e9b"), ("class", "0x030000"), ("boot_vga", "1")],
        );
        fs::write(
            fake.udev().join("c189:2"),
            "E:ID_VENDOR_FROM_DATABASE=Logitech, Inc.\nE:ID_MODEL_FROM_DATABASE=Unifying Receiver\n",
        )
        .unwrap();

        let manager = SysfsScanner::new(fake.root(), fake.udev())
            .with_subsystems(["pci", "usb"])
            .scan()
            .unwrap();

        assert_eq!(manager.len(), 2);
        assert_eq!(manager.total_devices(), 4);

        let controller = manager
            .devices()
            .into_iter()
            .find(|d| d.system_path().ends_with("0000:00:14.0"))
            .unwrap();
        assert_eq!(controller.kind(), VariantKind::Pci);
        assert!(controller.has_type(DeviceType::USB | DeviceType::HID));
        assert!(controller.has_attribute(DeviceAttribute::INTERFACE));

        let receiver = manager
            .device(&fake.root().join("devices/pci0000:00/0000:00:14.0/usb1/1-2").canonicalize().unwrap().to_string_lossy())
            .unwrap();
        assert_eq!(receiver.name(), Some("Unifying Receiver"));
        assert_eq!(receiver.vendor(), Some("Logitech, Inc."));
        assert_eq!(receiver.parent(), Some(controller.system_path()));

        let gpus = manager.devices_with_attribute(DeviceAttribute::BOOT_VGA);
        assert_eq!(gpus.len(), 1);
        assert!(gpus[0].has_type(DeviceType::GPU));
    }

    #[test]
    fn test_missing_root_is_error() {
        let err = SysfsScanner::new("/nonexistent/sysfs", "/nonexistent/udev")
            .scan()
            .unwrap_err();
        assert!(matches!(err, HwtreeError::FileNotFound(_)));
    }

    #[test]
    fn test_absent_subsystem_is_empty() {
        let fake = FakeSysfs::new();
        let manager = SysfsScanner::new(fake.root(), fake.udev())
            .with_subsystems(["bluetooth"])
            .scan()
            .unwrap();
        assert!(manager.is_empty());
    }
}
