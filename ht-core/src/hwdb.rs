//! udev runtime database entries
//!
//! udev keeps one file per device under `/run/udev/data`. Lines are prefixed
//! with a record type; `E:` lines carry the device properties, including the
//! vendor/model strings resolved from the hardware database.

use tracing::trace;

/// Name of the database file for a device.
///
/// Devices with a device node are keyed by `c<major>:<minor>` (or `b` for
/// block devices); everything else by `+<subsystem>:<sysname>`.
pub fn database_key(subsystem: &str, sysname: &str, devnum: Option<&str>) -> String {
    match devnum.map(str::trim).filter(|d| !d.is_empty()) {
        Some(devnum) if subsystem == "block" => format!("b{}", devnum),
        Some(devnum) => format!("c{}", devnum),
        None => format!("+{}:{}", subsystem, sysname),
    }
}

/// Extract the `E:KEY=VALUE` properties of a database file, in file order
pub fn parse_properties(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .filter_map(|line| line.strip_prefix("E:"))
        .filter_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            if key.is_empty() {
                return None;
            }
            trace!(key = %key, value = %value, "udev property");
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}
