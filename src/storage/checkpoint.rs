//! Review link checkpoint file
//!
//! The crawler's collected review links are persisted as a newline-delimited
//! list, one absolute URL per line. Every save replaces the whole file: the
//! list is written to a temporary sibling and renamed over the target, so a
//! crash mid-write leaves the previous checkpoint intact.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Newline-delimited file of review links
#[derive(Debug, Clone)]
pub struct ReviewLinkFile {
    path: PathBuf,
}

impl ReviewLinkFile {
    /// Create a handle for the file at `path`; nothing is written yet
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Target path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the file with `links`, one per line
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be written or renamed into place
    pub fn save(&self, links: &BTreeSet<String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        // Write to temp file first, then rename (atomic)
        let temp_path = self.temp_path();
        {
            let mut writer = BufWriter::new(File::create(&temp_path)?);
            for link in links {
                writeln!(writer, "{link}")?;
            }
            writer.flush()?;
        }

        fs::rename(&temp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), count = links.len(), "Review links saved");
        Ok(())
    }

    /// Read the links back, in file order
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist
    pub fn load(&self) -> Result<Vec<String>> {
        read_url_list(&self.path)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

/// Read a URL list: one URL per line, whitespace trimmed, blank lines skipped
///
/// # Errors
///
/// Returns `Error::Config` if the file does not exist and `Error::Io` if it
/// cannot be read
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            Error::config(format!("Input file not found: {}", path.display()))
        }
        _ => Error::Io(e),
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}
