//! Descriptive identity of a device and the hwdb properties behind it

use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

use crate::constants::hwdb;

/// Display and matching fields of a device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Display name, i.e. the model
    pub name: Option<String>,
    /// Display vendor, i.e. the manufacturer
    pub vendor: Option<String>,
    pub vendor_id: Option<u32>,
    pub product_id: Option<u32>,
    /// Kernel driver-matching signature
    pub modalias: Option<String>,
}

impl Identity {
    /// Name used when neither the database nor the variant supplied one
    pub fn fallback_name(product_id: Option<u32>) -> String {
        format!("Device {:x}", product_id.unwrap_or(0))
    }
}

/// Private copy of the hardware database entry for one device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HwdbProperties {
    entries: HashMap<String, String>,
}

impl HwdbProperties {
    /// Copy every pair; later duplicates of a key win
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Vendor string, database-resolved name first
    pub fn vendor(&self) -> Option<&str> {
        self.first_of(&[hwdb::VENDOR_FROM_DATABASE, hwdb::VENDOR])
    }

    /// Model string, database-resolved name first
    pub fn model(&self) -> Option<&str> {
        self.first_of(&[hwdb::MODEL_FROM_DATABASE, hwdb::MODEL])
    }

    fn first_of(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| {
            let value = self.get(key);
            if let Some(value) = value {
                trace!(key = %key, value = %value, "hwdb lookup hit");
            }
            value
        })
    }
}
