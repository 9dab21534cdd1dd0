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

//! Command line interface

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hwtree")]
#[command(version)]
#[command(about = "hwtree - Hardware device tree for Linux")]
#[command(long_about = "hwtree - Hardware device tree for Linux

Enumerates PCI, USB, DMI, HID, Bluetooth and WiFi devices from sysfs,
arranges them by ancestry and answers type and attribute queries.

EXAMPLES:
    hwtree                               Print the device tree (default)
    hwtree tree --json                   Dump the tree as JSON
    hwtree list --type gpu               Top-level devices with a GPU below them
    hwtree list --type usb,hid           Subtrees carrying both USB and HID
    hwtree list --attribute boot-vga     Subtree holding the boot display
    hwtree show /sys/devices/pci0000:00/0000:00:02.0
    hwtree gpu                           GPUs with their X.Org bus ids
    hwtree watch --interval-ms 1000      Report hotplug changes

ENVIRONMENT VARIABLES:
    HWTREE_LOG=debug       Log filter, overrides log_level from the config

FILES:
    ~/.config/hwtree/config.json    User configuration
    /etc/hwtree/config.json         System configuration")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Mount point of sysfs
    #[arg(long, global = true, value_name = "DIR")]
    pub sysfs_root: Option<PathBuf>,

    /// Directory holding the udev runtime database
    #[arg(long, global = true, value_name = "DIR")]
    pub udev_data: Option<PathBuf>,

    /// Log to the systemd journal when it is available
    #[arg(long, global = true)]
    pub journal: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print every device by ancestry
    Tree {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List top-level devices whose subtree matches a query
    List {
        /// Device types that must all be present, e.g. "usb,hid"
        #[arg(long = "type", value_name = "TYPES")]
        device_type: Option<String>,

        /// Attributes that must all be present, e.g. "boot-vga"
        #[arg(long, value_name = "ATTRS")]
        attribute: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one device and its hwdb properties
    Show {
        /// System path of the device
        path: String,
    },

    /// List display controllers
    Gpu {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rescan periodically and report added and removed devices
    Watch {
        /// Poll interval, overrides watch_interval_ms from the config
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
    },
}
