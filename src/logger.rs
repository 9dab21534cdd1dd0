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

//! Tracing subscriber setup

use std::path::Path;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter
pub const LOG_ENV: &str = "HWTREE_LOG";

const JOURNAL_SOCKET: &str = "/run/systemd/journal/socket";

/// Where log records ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    Journal,
}

/// Filter directive: `HWTREE_LOG` if set, otherwise `default_level`
pub fn log_filter(default_level: &str) -> String {
    std::env::var(LOG_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default_level.to_string())
}

/// Install the global subscriber.
///
/// With `journal` set and a journald socket present, records go to the
/// systemd journal; otherwise they are written to stderr so stdout stays
/// clean for reports.
pub fn init_logging(default_level: &str, journal: bool) -> LogTarget {
    let log_level = log_filter(default_level);

    if journal && Path::new(JOURNAL_SOCKET).exists() {
        match tracing_journald::layer() {
            Ok(journald_layer) => {
                tracing_subscriber::registry()
                    .with(journald_layer)
                    .with(EnvFilter::new(&log_level))
                    .init();
                return LogTarget::Journal;
            }
            Err(e) => {
                eprintln!("Failed to create journald layer: {}, falling back to stderr", e);
            }
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_env_filter(EnvFilter::new(&log_level))
        .init();
    LogTarget::Stderr
}
