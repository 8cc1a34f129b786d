use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use tracing::warn;

use crate::domain::errors::SampleLogError;
use crate::domain::sample::Sample;

/// The shared append-only sample log.
///
/// One record per line, two whitespace-separated numeric fields
/// (target seconds, actual seconds). Records are never edited or deleted.
pub struct SampleLog {
    path: PathBuf,
}

impl SampleLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one sample, creating the log (and its directory) on first use.
    pub fn append(&self, sample: &Sample) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create log directory {parent:?}"))?;
        }

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open sample log {:?}", self.path))?;
        writeln!(file, "{sample}")
            .with_context(|| format!("Failed to append to sample log {:?}", self.path))?;
        Ok(())
    }

    /// Read every recorded sample, in log order.
    ///
    /// A missing log is not an error: it means no samples have been recorded
    /// yet, so the result is empty and a warning is logged. A malformed line
    /// fails the whole read, naming the 1-based line number and its content.
    pub fn read_all(&self) -> Result<Vec<Sample>, SampleLogError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("Sample log {:?} not found, treating as empty", self.path);
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(SampleLogError::Io {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };

        let mut samples = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            // Blank lines carry no record; tolerate them in hand-edited logs.
            if line.trim().is_empty() {
                continue;
            }
            let sample =
                Sample::parse_line(line).map_err(|reason| SampleLogError::MalformedRecord {
                    line: idx + 1,
                    content: line.to_string(),
                    reason,
                })?;
            samples.push(sample);
        }
        Ok(samples)
    }

    /// Modification time of the log, if it exists.
    pub fn modified_at(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).and_then(|meta| meta.modified()).ok()
    }
}
