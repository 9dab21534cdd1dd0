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

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use hwtree::cli::{Cli, Commands};
use hwtree::config;
use hwtree::{logger, report, watch};
use ht_core::{DeviceAttribute, DeviceManager, DeviceType};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = config::load_config(cli.config.as_deref())
        .and_then(|c| c.with_overrides(cli.sysfs_root.as_deref(), cli.udev_data.as_deref()))
        .context("Failed to load configuration")?;

    let target = logger::init_logging(&config.log_level, cli.journal);
    debug!(?target, ?config, "Starting hwtree {}", env!("CARGO_PKG_VERSION"));

    let command = cli.command.clone().unwrap_or(Commands::Tree { json: false });
    let scanner = config.scanner();

    if let Commands::Watch { interval_ms } = command {
        let interval = interval_ms.unwrap_or(config.watch_interval_ms);
        if !(config::MIN_WATCH_INTERVAL_MS..=config::MAX_WATCH_INTERVAL_MS).contains(&interval) {
            anyhow::bail!(
                "interval must be between {} and {} ms",
                config::MIN_WATCH_INTERVAL_MS,
                config::MAX_WATCH_INTERVAL_MS
            );
        }
        watch::run_watch(&scanner, Duration::from_millis(interval))?;
        info!("Watch stopped");
        return Ok(());
    }

    let manager = scanner.scan().context("Failed to enumerate devices")?;
    run_query(&command, &manager)
}

fn run_query(command: &Commands, manager: &DeviceManager) -> Result<()> {
    match command {
        Commands::Tree { json } => {
            if *json {
                println!("{}", report::to_json(manager)?);
            } else {
                print!("{}", report::render_tree(manager));
            }
        }
        Commands::List {
            device_type,
            attribute,
            json,
        } => {
            let types = match device_type {
                Some(s) => s.parse::<DeviceType>()?,
                None => DeviceType::ANY,
            };
            let attributes = match attribute {
                Some(s) => s.parse::<DeviceAttribute>()?,
                None => DeviceAttribute::NONE,
            };
            let matches = report::matching_roots(manager, types, attributes);
            if *json {
                println!("{}", report::to_json(&matches)?);
            } else {
                print!("{}", report::render_list(&matches));
            }
        }
        Commands::Show { path } => {
            // accept /sys/bus/... links as well as canonical paths
            let resolved = std::fs::canonicalize(path)
                .map(|p| p.to_string_lossy().into_owned())
                .unwrap_or_else(|_| path.clone());
            let device = manager
                .device(&resolved)
                .or_else(|| manager.device(path))
                .with_context(|| format!("No device at {}", path))?;
            print!("{}", report::render_device(device));
        }
        Commands::Gpu { json } => {
            let gpus = report::gpus(manager);
            if *json {
                println!("{}", report::to_json(&gpus)?);
            } else {
                print!("{}", report::render_gpus(&gpus));
            }
        }
        Commands::Watch { .. } => anyhow::bail!("watch does not produce a report"),
    }
    Ok(())
}
