//! Dataset loading
//!
//! Every collector reads its source file exactly once at startup and keeps the
//! snapshot in memory for the lifetime of the replay loop. Bytes are decoded
//! lossily so a stray Latin-1 byte (e.g. a micro sign) never fails the load,
//! and a leading UTF-8 byte-order mark is dropped.

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// Whole-file text snapshot
#[derive(Debug, Clone)]
pub struct TextDataset {
    pub path: PathBuf,
    pub text: String,
}

impl TextDataset {
    pub async fn load(path: &Path) -> Result<Self> {
        let text = read_text(path).await?;
        debug!("Loaded {} bytes from {}", text.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }
}

/// Ordered line snapshot
#[derive(Debug, Clone)]
pub struct LineDataset {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl LineDataset {
    pub async fn load(path: &Path) -> Result<Self> {
        let text = read_text(path).await?;
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        debug!("Loaded {} lines from {}", lines.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            lines,
        })
    }

    pub fn from_lines<I, S>(path: impl Into<PathBuf>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Read a file as text, decoding invalid UTF-8 with replacement characters
///
/// Windows exports often start with a byte-order mark; it is stripped so the
/// first header or tag key compares equal to its plain spelling.
pub async fn read_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::file_not_found(path.display().to_string())
        } else {
            Error::io(format!("Failed to read file {}", path.display()), e)
        }
    })?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(match text.strip_prefix(BYTE_ORDER_MARK) {
        Some(rest) => rest.to_string(),
        None => text.into_owned(),
    })
}

/// Whether a dataset file is present
pub async fn dataset_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// File name of a path for log lines
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
