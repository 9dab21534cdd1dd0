/*
 * This file is part of hwtree.
 *
 * Copyright (C) 2026 hwtree contributors
 *
 * hwtree is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * hwtree is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with hwtree. If not, see <https://www.gnu.org/licenses/>.
 */

//! Polling hotplug watcher
//!
//! sysfs has no change notification hwtree can rely on without udev, so the
//! watcher rescans on an interval and reports the difference between
//! consecutive snapshots.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use ht_core::{Device, DeviceManager, DeviceType, ManagerDiff, SysfsScanner};
use ht_error::Result;
use tracing::{info, warn};

/// Set by the signal handler, checked once per poll slice
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Longest uninterrupted sleep, so shutdown is noticed promptly
const POLL_SLICE: Duration = Duration::from_millis(100);

/// Short note on what kind of device appeared
pub fn change_note(device: &Device) -> Option<&'static str> {
    let types = device.device_type();
    if types.contains(DeviceType::HID) {
        Some("HID device")
    } else if types.contains(DeviceType::STORAGE) {
        Some("Storage device")
    } else if types.contains(DeviceType::GPU) {
        Some("Display controller")
    } else if types.contains(DeviceType::WIRELESS) {
        Some("Wireless device")
    } else {
        None
    }
}

/// Lines describing one diff, removals first
pub fn describe_diff(diff: &ManagerDiff, current: &DeviceManager) -> Vec<String> {
    let mut lines = Vec::with_capacity(diff.added.len() + diff.removed.len());
    for path in &diff.removed {
        lines.push(format!("- {}", path));
    }
    for path in &diff.added {
        let note = current.device(path).and_then(change_note);
        match note {
            Some(note) => lines.push(format!("+ {} ({})", path, note)),
            None => lines.push(format!("+ {}", path)),
        }
    }
    lines
}

/// Rescan until `stop` returns true, handing every non-empty diff to `report`
pub fn watch_loop<S, R>(scanner: &SysfsScanner, interval: Duration, stop: S, mut report: R) -> Result<()>
where
    S: Fn() -> bool,
    R: FnMut(&ManagerDiff, &DeviceManager),
{
    let mut previous = scanner.scan()?;
    info!(
        devices = previous.total_devices(),
        interval_ms = interval.as_millis() as u64,
        "Watching for device changes"
    );

    while !stop() {
        sleep_interruptible(interval, &stop);
        if stop() {
            break;
        }

        let current = match scanner.scan() {
            Ok(current) => current,
            Err(e) => {
                warn!(error = %e, "Rescan failed, keeping previous snapshot");
                continue;
            }
        };

        let diff = ManagerDiff::between(&previous, &current);
        if !diff.is_empty() {
            report(&diff, &current);
        }
        previous = current;
    }
    Ok(())
}

fn sleep_interruptible<S: Fn() -> bool>(interval: Duration, stop: &S) {
    let mut remaining = interval;
    while !remaining.is_zero() && !stop() {
        let slice = remaining.min(POLL_SLICE);
        thread::sleep(slice);
        remaining = remaining.saturating_sub(slice);
    }
}

/// Watch until SIGINT/SIGTERM, printing changes to stdout
pub fn run_watch(scanner: &SysfsScanner, interval: Duration) -> Result<()> {
    if let Err(e) = ctrlc::set_handler(|| {
        info!("SIGNAL: Received SIGINT/SIGTERM - stopping watch");
        SHUTDOWN.store(true, Ordering::SeqCst);
    }) {
        warn!("Failed to set signal handler: {}", e);
    }

    watch_loop(
        scanner,
        interval,
        || SHUTDOWN.load(Ordering::SeqCst),
        |diff, current| {
            for line in describe_diff(diff, current) {
                println!("{}", line);
            }
        },
    )
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use ht_core::MemoryRecord;
    use std::cell::Cell;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_change_notes() {
        let mouse = Device::new(
            None,
            &MemoryRecord::new(Some("hid"), "/sys/devices/virtual/0003:046D:C52B.0001"),
            None,
        )
        .unwrap();
        assert_eq!(change_note(&mouse), Some("HID device"));

        let bridge = Device::new(None, &MemoryRecord::new(Some("pci"), "/sys/devices/pci0000:00/0000:00:00.0"), None).unwrap();
        assert_eq!(change_note(&bridge), None);
    }

    #[test]
    fn test_describe_diff() {
        let mut current = DeviceManager::new();
        let mouse = Device::new(
            None,
            &MemoryRecord::new(Some("hid"), "/sys/devices/virtual/0003:046D:C52B.0001"),
            None,
        )
        .unwrap();
        current.add_device(mouse).unwrap();

        let diff = ManagerDiff {
            added: vec!["/sys/devices/virtual/0003:046D:C52B.0001".to_string()],
            removed: vec!["/sys/devices/old".to_string()],
        };
        let lines = describe_diff(&diff, &current);
        assert_eq!(
            lines,
            vec![
                "- /sys/devices/old".to_string(),
                "+ /sys/devices/virtual/0003:046D:C52B.0001 (HID device)".to_string(),
            ]
        );
    }

    #[test]
    fn test_watch_loop_reports_new_device() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("sys");
        let udev = dir.path().join("udev");
        let bus_devices = root.join("bus/pci/devices");
        fs::create_dir_all(&bus_devices).unwrap();
        fs::create_dir_all(&udev).unwrap();

        let scanner = SysfsScanner::new(&root, &udev).with_subsystems(["pci"]);
        let calls = Cell::new(0u32);
        let mut seen: Vec<ManagerDiff> = Vec::new();

        let stop = || {
            calls.set(calls.get() + 1);
            if calls.get() == 1 {
                // hotplug after the initial snapshot
                let device = root.join("devices/pci0000:00/0000:00:02.0");
                fs::create_dir_all(&device).unwrap();
                fs::write(device.join("class"), "0x030000\n").unwrap();
                std::os::unix::fs::symlink(&device, bus_devices.join("0000:00:02.0")).unwrap();
            }
            calls.get() > 20
        };

        watch_loop(&scanner, Duration::from_millis(1), stop, |diff, current| {
            assert!(current.device(&diff.added[0]).is_some());
            seen.push(diff.clone());
        })
        .unwrap();

        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].added.len(), 1);
        assert!(seen[0].added[0].ends_with("0000:00:02.0"));
        assert!(seen[0].removed.is_empty());
    }
}
