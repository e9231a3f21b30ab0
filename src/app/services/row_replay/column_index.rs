//! Header column lookup for tag-mapped rows
//!
//! Tag keys are matched against header names exactly (case-sensitive); when a
//! header repeats a name the first occurrence wins.

/// Column names of a row dataset header
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    headers: Vec<String>,
}

impl ColumnIndex {
    /// Split a header line on commas
    pub fn from_header(header_line: &str) -> Self {
        Self {
            headers: header_line.split(',').map(str::to_string).collect(),
        }
    }

    /// First column whose name equals `tag_key`
    pub fn position(&self, tag_key: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == tag_key)
    }

    pub(crate) fn len(&self) -> usize {
        self.headers.len()
    }
}
