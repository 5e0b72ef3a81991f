use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tracing::info;

/// Append-only flat file of listing URLs that have already been notified.
///
/// One URL per line, UTF-8, no header. Entries are never rewritten or removed,
/// so a crash mid-run can at worst lose the tail of the current pass while
/// prior lines stay intact. The file is read once per run; membership tracking
/// after that is the caller's in-memory concern.
pub struct SeenUrlStore {
    path: PathBuf,
}

impl SeenUrlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read every recorded URL in file order.
    ///
    /// A store that does not exist yet loads as empty; any other I/O failure
    /// propagates and ends the run.
    pub fn load(&self) -> Result<Vec<String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "Store file {} not found, starting with an empty set",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read seen-listing store {}", self.path.display())
                })
            }
        };

        Ok(raw
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Record one URL at the end of the file.
    pub fn append(&self, url: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| {
                format!("Failed to open seen-listing store {}", self.path.display())
            })?;
        writeln!(file, "{url}").with_context(|| {
            format!("Failed to append to seen-listing store {}", self.path.display())
        })?;
        Ok(())
    }
}
