//! Source file discovery.
//!
//! Directories are walked recursively with entries sorted by file name, so
//! the same tree always yields the same sequence of files.

use glob::Pattern;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Extension of files the pipeline accepts.
pub const SOURCE_EXTENSION: &str = "rs";

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("root directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("failed to walk {}: {source}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A discovered entry whose file name matched the pattern.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub metadata: Metadata,
}

/// Recursively collect every entry under `root` whose file name matches the
/// glob `pattern`.
pub fn walk_match(root: &Path, pattern: &str) -> Result<Vec<WalkEntry>, WalkError> {
    let pattern = Pattern::new(pattern).map_err(|e| WalkError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    if !root.exists() {
        return Err(WalkError::RootNotFound(root.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| WalkError::Walk {
            path: source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            source,
        })?;

        let matched = entry
            .file_name()
            .to_str()
            .is_some_and(|name| pattern.matches(name));
        if !matched {
            continue;
        }

        let metadata = entry.metadata().map_err(|source| WalkError::Walk {
            path: entry.path().to_path_buf(),
            source,
        })?;
        entries.push(WalkEntry {
            path: entry.into_path(),
            metadata,
        });
    }

    Ok(entries)
}

/// Regular file with the `.rs` extension.
pub fn is_source_file(path: &Path, metadata: &Metadata) -> bool {
    metadata.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(SOURCE_EXTENSION)
}

/// Matching source files under `root`, in walk order.
pub fn discover_sources(root: &Path, pattern: &str) -> Result<Vec<PathBuf>, WalkError> {
    Ok(walk_match(root, pattern)?
        .into_iter()
        .filter(|entry| is_source_file(&entry.path, &entry.metadata))
        .map(|entry| entry.path)
        .collect())
}
