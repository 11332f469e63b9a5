//! Discovery of the xrootd log files making up one audit run.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use crate::error_handling::types::IngestError;

/// The set of log files to ingest.
///
/// Any regular file directly under the directory whose name contains the
/// marker substring belongs to the corpus. Files are kept in name order so
/// repeated runs over the same directory replay events identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCorpus {
    directory: PathBuf,
    files: Vec<PathBuf>,
}

impl LogCorpus {
    pub fn discover<P: AsRef<Path>>(directory: P, marker: &str) -> Result<Self, IngestError> {
        let directory = directory.as_ref().to_path_buf();
        let entries = fs::read_dir(&directory).map_err(|e| {
            error!("Failed to read log directory {}: {}", directory.display(), e);
            IngestError::DirectoryUnreadable(directory.clone(), e)
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                error!("Dir entry error in {}: {}", directory.display(), e);
                IngestError::DirectoryUnreadable(directory.clone(), e)
            })?;
            let path = entry.path();
            let name = entry.file_name();
            if !name.to_string_lossy().contains(marker) {
                continue;
            }
            if !path.is_file() {
                debug!("Skipping non-file corpus entry {}", path.display());
                continue;
            }
            files.push(path);
        }
        files.sort();

        info!(
            "Discovered {} log file(s) matching {:?} in {}",
            files.len(),
            marker,
            directory.display()
        );
        Ok(Self { directory, files })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
