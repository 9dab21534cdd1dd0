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

//! hwtree - hardware device tree for Linux
//!
//! Library side of the `hwtree` binary: configuration loading, logging
//! setup, command line definitions, report rendering and the hotplug
//! watcher. The device model itself lives in `ht-core`.

pub mod cli;
pub mod config;
pub mod logger;
pub mod report;
pub mod watch;

pub use config::{load_config, Config};
