//! Quad sink boundary
//!
//! The engine hands its finished quad stream to a [`QuadSink`]. The bundled
//! [`FileSink`] serializes and publishes atomically: output is buffered to a
//! sibling temporary file and promoted onto the final path only on full
//! success, so a failed run never leaves a truncated artifact behind.

use std::path::{Path, PathBuf};

use starweave_graph::Dataset;
use tracing::{debug, info};

use crate::error::FormatResult;
use crate::{write_dataset, OutputFormat, ReificationStyle};

/// Consumer of the final quad stream
pub trait QuadSink {
    /// Write the complete dataset; either fully succeeds or leaves no output
    fn write(&mut self, dataset: &Dataset) -> FormatResult<()>;
}

/// Serializes a dataset to a file with atomic promotion
pub struct FileSink {
    path: PathBuf,
    format: OutputFormat,
    reification: ReificationStyle,
}

impl FileSink {
    /// Create a sink writing to `path` in the given format
    pub fn new(path: impl Into<PathBuf>, format: OutputFormat, reification: ReificationStyle) -> Self {
        Self {
            path: path.into(),
            format,
            reification,
        }
    }

    /// The final output path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl QuadSink for FileSink {
    fn write(&mut self, dataset: &Dataset) -> FormatResult<()> {
        let text = write_dataset(dataset, self.format, self.reification)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let staging = self.staging_path();
        debug!(path = %staging.display(), "buffering serialized output");
        std::fs::write(&staging, text)?;
        std::fs::rename(&staging, &self.path)?;
        info!(path = %self.path.display(), quads = dataset.len(), "output published");
        Ok(())
    }
}

/// Collects serialized output in memory (tests and embedders)
#[derive(Debug, Default)]
pub struct StringSink {
    format: OutputFormat,
    reification: ReificationStyle,
    /// The serialized text of the last successful write
    pub output: Option<String>,
}

impl StringSink {
    /// Create a sink for the given format
    pub fn new(format: OutputFormat, reification: ReificationStyle) -> Self {
        Self {
            format,
            reification,
            output: None,
        }
    }
}

impl QuadSink for StringSink {
    fn write(&mut self, dataset: &Dataset) -> FormatResult<()> {
        self.output = Some(write_dataset(dataset, self.format, self.reification)?);
        Ok(())
    }
}
