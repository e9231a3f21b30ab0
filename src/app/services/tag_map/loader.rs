//! Tag map loading
//!
//! Loading is line by line and stops at the first failure. Entries inserted
//! before the failure are kept, so a broken mapping file yields a usable
//! prefix rather than an empty map.

use super::TagMap;
use crate::app::adapters::dataset::{display_name, read_text};
use crate::app::models::TagMapEntry;
use crate::app::services::supervisor::report_failure;
use crate::{Error, Result};
use std::path::Path;
use tracing::{info, warn};

/// Fields per mapping line: tag key, device, channel, unit
const MAPPING_FIELDS: usize = 4;

/// Statistics about one tag map load
#[derive(Debug, Default)]
pub struct LoadStats {
    /// Lines examined, including the failing one
    pub lines_read: usize,

    /// Entries inserted into the map
    pub entries_loaded: usize,

    /// Failure that stopped the load early
    pub failure: Option<Error>,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every line of the file was loaded
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

impl TagMap {
    /// Load a mapping file, keeping the loaded prefix on failure
    pub async fn load(path: &Path) -> (Self, LoadStats) {
        let file_name = display_name(path);
        match read_text(path).await {
            Ok(content) => Self::parse_str(&content, &file_name),
            Err(e) => {
                let stats = LoadStats {
                    failure: Some(e),
                    ..LoadStats::new()
                };
                (Self::new(), stats)
            }
        }
    }

    /// Parse mapping content line by line until the end or the first failure
    pub fn parse_str(content: &str, file_name: &str) -> (Self, LoadStats) {
        let mut map = Self::new();
        let mut stats = LoadStats::new();

        for (line_index, line) in content.lines().enumerate() {
            stats.lines_read += 1;
            let line_number = line_index + 1;

            let inserted = parse_mapping_line(line, file_name, line_number).and_then(|entry| {
                map.insert(entry)
                    .map_err(|e| Error::tag_map(file_name, line_number, e.to_string()))
            });

            if let Err(e) = inserted {
                stats.failure = Some(e);
                break;
            }
            stats.entries_loaded += 1;
        }

        (map, stats)
    }

    /// Load a mapping file and log the outcome
    ///
    /// A failure is reported with a correlation identifier and otherwise
    /// ignored; the returned map holds whatever prefix was loaded.
    pub async fn load_and_report(path: &Path, collector_name: &str) -> Self {
        let (map, stats) = Self::load(path).await;
        match &stats.failure {
            None => info!(
                "{}: Map file {} loaded successfully ({} entries).",
                collector_name,
                path.display(),
                stats.entries_loaded
            ),
            Some(failure) => {
                report_failure(
                    collector_name,
                    &format!("Loading of map file {}", path.display()),
                    failure,
                );
                warn!(
                    "{}: Continuing with {} of the mapped tags",
                    collector_name, stats.entries_loaded
                );
            }
        }
        map
    }
}

/// Parse one `tagKey,deviceID,channel,unit` line
///
/// Values are taken as written; fields past the fourth are ignored.
pub fn parse_mapping_line(line: &str, file_name: &str, line_number: usize) -> Result<TagMapEntry> {
    let parts: Vec<&str> = line.split(',').collect();
    if parts.len() < MAPPING_FIELDS {
        return Err(Error::tag_map(
            file_name,
            line_number,
            format!(
                "expected {} comma-separated fields, found {}",
                MAPPING_FIELDS,
                parts.len()
            ),
        ));
    }

    Ok(TagMapEntry::new(parts[0], parts[1], parts[2], parts[3]))
}
