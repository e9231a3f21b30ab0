//! Tag map service binding CSV columns to device channels
//!
//! A tag map is loaded once from a headerless mapping file with lines of the
//! form `tagKey,deviceID,channel,unit`. Entries keep file order; the
//! row-replay engine consumes them sorted by device.

use crate::app::models::TagMapEntry;
use crate::{Error, Result};
use std::collections::HashMap;

pub mod loader;

#[cfg(test)]
pub mod tests;

pub use loader::LoadStats;

/// Tag key to (device, channel, unit) mapping with unique keys
#[derive(Debug, Clone, Default)]
pub struct TagMap {
    /// Entries in insertion (file) order
    pub(crate) entries: Vec<TagMapEntry>,

    /// Tag key to position in `entries`
    pub(crate) index: HashMap<String, usize>,
}

impl TagMap {
    /// Create a new empty tag map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, rejecting a key that is already present
    pub fn insert(&mut self, entry: TagMapEntry) -> Result<()> {
        if self.index.contains_key(&entry.tag_key) {
            return Err(Error::data_validation(format!(
                "An entry with tag key '{}' has already been added",
                entry.tag_key
            )));
        }
        self.index.insert(entry.tag_key.clone(), self.entries.len());
        self.entries.push(entry);
        Ok(())
    }

    pub fn get(&self, tag_key: &str) -> Option<&TagMapEntry> {
        self.index.get(tag_key).map(|&i| &self.entries[i])
    }

    pub fn contains_key(&self, tag_key: &str) -> bool {
        self.index.contains_key(tag_key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[TagMapEntry] {
        &self.entries
    }

    /// Entries stable-sorted by device identifier
    ///
    /// Entries of the same device keep their insertion order.
    pub fn sorted_by_device(&self) -> Vec<TagMapEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| a.device_id.cmp(&b.device_id));
        sorted
    }

    /// Number of distinct devices
    pub fn device_count(&self) -> usize {
        let mut devices: Vec<&str> = self.entries.iter().map(|e| e.device_id.as_str()).collect();
        devices.sort_unstable();
        devices.dedup();
        devices.len()
    }
}
