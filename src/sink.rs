//! Shared gzip output for walk lines.
//!
//! Workers hand complete per-entity batches to [`WalkSink::write_batch`];
//! each batch is written under a single lock acquisition, so lines of
//! different entities interleave only at batch boundaries.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::error::SinkError;

/// File created when the output path is a directory.
pub const WALK_FILE_NAME: &str = "walk_file.gz";

/// Where walks for `output` end up: `output` itself, or
/// [`WALK_FILE_NAME`] inside it when it is an existing directory.
pub fn resolve_output_path(output: &Path) -> PathBuf {
    if output.is_dir() {
        output.join(WALK_FILE_NAME)
    } else {
        output.to_path_buf()
    }
}

/// Mutex-guarded gzip stream, one walk per line.
pub struct WalkSink {
    path: PathBuf,
    writer: Mutex<GzEncoder<BufWriter<File>>>,
    lines: AtomicU64,
}

impl WalkSink {
    /// Create (or truncate) the walk file for `output`, creating missing
    /// parent directories.
    pub fn create(output: &Path) -> Result<Self, SinkError> {
        let path = resolve_output_path(output);
        let create_error = |source: std::io::Error| SinkError::Create {
            path: path.display().to_string(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(create_error)?;
        }
        let file = File::create(&path).map_err(create_error)?;
        tracing::debug!(path = %path.display(), "walk file opened");
        Ok(Self {
            writer: Mutex::new(GzEncoder::new(BufWriter::new(file), Compression::default())),
            path,
            lines: AtomicU64::new(0),
        })
    }

    /// Path of the walk file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `lines` as one uninterrupted block.
    pub fn write_batch(&self, lines: &[String]) -> Result<(), SinkError> {
        if lines.is_empty() {
            return Ok(());
        }
        let mut buffer = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum());
        for line in lines {
            buffer.push_str(line);
            buffer.push('\n');
        }

        let mut writer = self.writer.lock().map_err(|_| SinkError::Poisoned)?;
        writer
            .write_all(buffer.as_bytes())
            .map_err(|source| SinkError::Write {
                path: self.path.display().to_string(),
                source,
            })?;
        self.lines.fetch_add(lines.len() as u64, Ordering::Relaxed);
        Ok(())
    }

    /// Lines written so far.
    pub fn lines_written(&self) -> u64 {
        self.lines.load(Ordering::Relaxed)
    }

    /// Terminate the gzip stream and flush it to disk.
    ///
    /// Returns the path of the finished file.
    pub fn finish(self) -> Result<PathBuf, SinkError> {
        let write_error = |source: std::io::Error| SinkError::Write {
            path: self.path.display().to_string(),
            source,
        };
        let encoder = self.writer.into_inner().map_err(|_| SinkError::Poisoned)?;
        let mut buffered = encoder.finish().map_err(write_error)?;
        buffered.flush().map_err(write_error)?;
        tracing::debug!(
            path = %self.path.display(),
            lines = self.lines.load(Ordering::Relaxed),
            "walk file closed"
        );
        Ok(self.path)
    }
}

impl std::fmt::Debug for WalkSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalkSink")
            .field("path", &self.path)
            .field("lines", &self.lines_written())
            .finish()
    }
}
