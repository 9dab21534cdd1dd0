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

//! Text and JSON renderings of the device forest

use std::fmt::Write as _;

use ht_core::constants::vendor;
use ht_core::{Device, DeviceAttribute, DeviceManager, DeviceType};
use ht_error::Result;
use serde::Serialize;

/// Pretty-printed JSON of any report value
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Human name for the GPU vendors hwtree recognizes
pub fn vendor_name(id: u32) -> Option<&'static str> {
    match id {
        vendor::INTEL => Some("Intel"),
        vendor::NVIDIA => Some("NVIDIA"),
        vendor::AMD => Some("AMD"),
        _ => None,
    }
}

fn sorted<'a>(mut devices: Vec<&'a Device>) -> Vec<&'a Device> {
    devices.sort_by(|a, b| a.system_path().cmp(b.system_path()));
    devices
}

/// Path of `device` relative to its parent, or the full path for roots
fn display_path(device: &Device) -> &str {
    match device.parent() {
        Some(parent) => device
            .system_path()
            .strip_prefix(parent)
            .and_then(|p| p.strip_prefix('/'))
            .filter(|p| !p.is_empty())
            .unwrap_or(device.system_path()),
        None => device.system_path(),
    }
}

/// One-line summary: path, variant, identity and own flags
pub fn device_line(device: &Device) -> String {
    let mut line = format!("{} [{}]", display_path(device), device.kind());

    if let Some(vendor) = device.vendor() {
        let _ = write!(line, " {}", vendor);
    }
    if let Some(name) = device.name() {
        let _ = write!(line, " {}", name);
    }
    if !device.device_type().is_empty() {
        let _ = write!(line, " <{}>", device.device_type());
    }
    if !device.attributes().is_empty() {
        let _ = write!(line, " {{{}}}", device.attributes());
    }
    line
}

fn render_subtree(device: &Device, prefix: &str, out: &mut String) {
    let children = sorted(device.children());
    let last = children.len().saturating_sub(1);
    for (i, child) in children.into_iter().enumerate() {
        let (branch, indent) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        let _ = writeln!(out, "{}{}{}", prefix, branch, device_line(child));
        render_subtree(child, &format!("{}{}", prefix, indent), out);
    }
}

/// Every device, roots sorted by path, children drawn beneath their parent
pub fn render_tree(manager: &DeviceManager) -> String {
    let mut out = String::new();
    for root in sorted(manager.devices()) {
        let _ = writeln!(out, "{}", device_line(root));
        render_subtree(root, "", &mut out);
    }
    out
}

/// Top-level devices matching both masks; an empty mask matches everything
pub fn matching_roots(
    manager: &DeviceManager,
    types: DeviceType,
    attributes: DeviceAttribute,
) -> Vec<&Device> {
    sorted(
        manager
            .devices()
            .into_iter()
            .filter(|d| d.has_type(types) && d.has_attribute(attributes))
            .collect(),
    )
}

pub fn render_list(devices: &[&Device]) -> String {
    let mut out = String::new();
    for device in devices {
        let _ = writeln!(out, "{}", device_line(device));
    }
    out
}

/// Full detail of one device, without its children
pub fn render_device(device: &Device) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Path:       {}", device.system_path());
    let _ = writeln!(out, "Variant:    {}", device.kind());
    if let Some(parent) = device.parent() {
        let _ = writeln!(out, "Parent:     {}", parent);
    }
    let _ = writeln!(out, "Name:       {}", device.name().unwrap_or("-"));
    let _ = writeln!(out, "Vendor:     {}", device.vendor().unwrap_or("-"));
    if let Some(id) = device.vendor_id() {
        let _ = writeln!(out, "Vendor ID:  {:04x}", id);
    }
    if let Some(id) = device.product_id() {
        let _ = writeln!(out, "Product ID: {:04x}", id);
    }
    if let Some(modalias) = device.modalias() {
        let _ = writeln!(out, "Modalias:   {}", modalias);
    }
    let _ = writeln!(out, "Types:      {}", device.device_type());
    let _ = writeln!(out, "Attributes: {}", device.attributes());
    if let Some(address) = device.variant().as_pci().and_then(|p| p.address) {
        let _ = writeln!(out, "PCI:        {} ({})", address, address.xorg_id());
    }
    if let Some(usb) = device.variant().as_usb() {
        let _ = writeln!(out, "USB:        {}", usb.bus_address);
    }
    let _ = writeln!(out, "Children:   {}", device.child_count());

    let mut hwdb: Vec<(&str, &str)> = device.hwdb().iter().collect();
    if !hwdb.is_empty() {
        hwdb.sort();
        let _ = writeln!(out, "hwdb:");
        for (key, value) in hwdb {
            let _ = writeln!(out, "  {}={}", key, value);
        }
    }
    out
}

/// Display controller found anywhere in the forest
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GpuSummary {
    pub system_path: String,
    pub address: Option<String>,
    pub xorg_bus_id: Option<String>,
    pub vendor: Option<String>,
    pub name: Option<String>,
    pub boot_vga: bool,
}

/// PCI display controllers at any depth, boot display first
pub fn gpus(manager: &DeviceManager) -> Vec<GpuSummary> {
    let mut found: Vec<GpuSummary> = manager
        .devices()
        .into_iter()
        .flat_map(Device::descendants)
        .filter(|d| d.device_type().contains(DeviceType::GPU))
        .filter_map(|d| {
            let pci = d.variant().as_pci()?;
            Some(GpuSummary {
                system_path: d.system_path().to_string(),
                address: pci.address.map(|a| a.to_string()),
                xorg_bus_id: pci.address.map(|a| a.xorg_id()),
                vendor: d
                    .vendor_id()
                    .and_then(vendor_name)
                    .map(str::to_string)
                    .or_else(|| d.vendor().map(str::to_string)),
                name: d.name().map(str::to_string),
                boot_vga: d.attributes().contains(DeviceAttribute::BOOT_VGA),
            })
        })
        .collect();

    found.sort_by(|a, b| {
        b.boot_vga
            .cmp(&a.boot_vga)
            .then_with(|| a.system_path.cmp(&b.system_path))
    });
    found
}

pub fn render_gpus(gpus: &[GpuSummary]) -> String {
    let mut out = String::new();
    for gpu in gpus {
        let _ = writeln!(
            out,
            "{} {} {}{}",
            gpu.xorg_bus_id.as_deref().unwrap_or("-"),
            gpu.vendor.as_deref().unwrap_or("Unknown"),
            gpu.name.as_deref().unwrap_or("-"),
            if gpu.boot_vga { " (boot)" } else { "" }
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ht_core::MemoryRecord;

    const HOST: &str = "/sys/devices/pci0000:00/0000:00:14.0";
    const RECEIVER: &str = "/sys/devices/pci0000:00/0000:00:14.0/usb1/1-2";
    const IGPU: &str = "/sys/devices/pci0000:00/0000:00:02.0";
    const DGPU: &str = "/sys/devices/pci0000:00/0000:00:01.0/0000:01:00.0";

    fn add(manager: &mut DeviceManager, parent: Option<&str>, record: MemoryRecord) {
        let device = {
            let parent = parent.and_then(|p| manager.device(p));
            Device::new(parent, &record, None).unwrap()
        };
        manager.add_device(device).unwrap();
    }

    fn sample() -> DeviceManager {
        let mut manager = DeviceManager::new();
        add(
            &mut manager,
            None,
            MemoryRecord::new(Some("pci"), HOST).with_attr("class", "0x0c0330"),
        );
        add(
            &mut manager,
            Some(HOST),
            MemoryRecord::new(Some("usb"), RECEIVER)
                .with_attr("idVendor", "046d")
                .with_attr("idProduct", "c52b")
                .with_attr("bDeviceClass", "03")
                .with_attr("product", "USB Receiver"),
        );
        add(
            &mut manager,
            None,
            MemoryRecord::new(Some("pci"), IGPU)
                .with_attr("vendor", "0x8086")
                .with_attr("device", "0x3e9b")
                .with_attr("class", "0x030000")
                .with_attr("boot_vga", "1"),
        );
        add(
            &mut manager,
            None,
            MemoryRecord::new(Some("pci"), DGPU)
                .with_attr("vendor", "0x10de")
                .with_attr("device", "0x1f91")
                .with_attr("class", "0x030200"),
        );
        manager
    }

    #[test]
    fn test_tree_draws_children() {
        let tree = render_tree(&sample());
        let lines: Vec<&str> = tree.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with(DGPU));
        assert!(lines[2].starts_with(HOST));
        assert!(lines[3].starts_with("└── usb1/1-2 [usb]"));
        assert!(lines[3].contains("USB Receiver"));
        assert!(lines[3].ends_with("<hid|usb>"));
    }

    #[test]
    fn test_display_path_needs_separator() {
        let root = Device::new(None, &MemoryRecord::new(None, "/r"), None).unwrap();
        let nested = Device::new(Some(&root), &MemoryRecord::new(None, "/r/a/b"), None).unwrap();
        let sibling_prefix = Device::new(Some(&root), &MemoryRecord::new(None, "/rx/y"), None).unwrap();

        assert_eq!(display_path(&root), "/r");
        assert_eq!(display_path(&nested), "a/b");
        assert_eq!(display_path(&sibling_prefix), "/rx/y");
    }

    #[test]
    fn test_matching_roots() {
        let manager = sample();
        let hid = matching_roots(&manager, DeviceType::USB | DeviceType::HID, DeviceAttribute::NONE);
        assert_eq!(hid.len(), 1);
        assert_eq!(hid[0].system_path(), HOST);

        let all = matching_roots(&manager, DeviceType::ANY, DeviceAttribute::NONE);
        assert_eq!(all.len(), 3);

        let boot = matching_roots(&manager, DeviceType::GPU, DeviceAttribute::BOOT_VGA);
        assert_eq!(boot.len(), 1);
        assert_eq!(boot[0].system_path(), IGPU);
    }

    #[test]
    fn test_gpus_boot_display_first() {
        let found = gpus(&sample());
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].system_path, IGPU);
        assert!(found[0].boot_vga);
        assert_eq!(found[0].vendor.as_deref(), Some("Intel"));
        assert_eq!(found[0].xorg_bus_id.as_deref(), Some("PCI:0:2:0"));
        assert_eq!(found[1].vendor.as_deref(), Some("NVIDIA"));
        assert_eq!(found[1].xorg_bus_id.as_deref(), Some("PCI:1:0:0"));

        let text = render_gpus(&found);
        assert!(text.lines().next().unwrap().ends_with("(boot)"));
    }

    #[test]
    fn test_device_detail() {
        let manager = sample();
        let detail = render_device(manager.device(RECEIVER).unwrap());
        assert!(detail.contains("Variant:    usb"));
        assert!(detail.contains(&format!("Parent:     {}", HOST)));
        assert!(detail.contains("Vendor ID:  046d"));
        assert!(detail.contains("Product ID: c52b"));
    }

    #[test]
    fn test_json_output() {
        let manager = sample();
        let json = to_json(&manager).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get(HOST).is_some());
        assert!(value[HOST]["children"].get(RECEIVER).is_some());
    }
}
