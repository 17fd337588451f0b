use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The diff between the original and rewritten text of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub original_path: PathBuf,
    pub modified_path: PathBuf,
    /// Unified diff text; empty when the file was left unchanged.
    pub diff: String,
}

impl FileDiff {
    pub fn new(
        original_path: impl Into<PathBuf>,
        modified_path: impl Into<PathBuf>,
        diff: impl Into<String>,
    ) -> Self {
        Self {
            original_path: original_path.into(),
            modified_path: modified_path.into(),
            diff: diff.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diff.is_empty()
    }
}

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("failed to write patch to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// File diffs in the order the files were processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Patch {
    file_diffs: Vec<FileDiff>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file_diff(&mut self, file_diff: FileDiff) {
        self.file_diffs.push(file_diff);
    }

    pub fn file_diffs(&self) -> &[FileDiff] {
        &self.file_diffs
    }

    pub fn len(&self) -> usize {
        self.file_diffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_diffs.is_empty()
    }

    /// Paths of files whose diff is non-empty.
    pub fn changed_files(&self) -> impl Iterator<Item = &Path> {
        self.file_diffs
            .iter()
            .filter(|d| !d.is_empty())
            .map(|d| d.original_path.as_path())
    }

    /// Concatenation of every diff, in append order, with no framing.
    pub fn to_text(&self) -> String {
        self.file_diffs.iter().map(|d| d.diff.as_str()).collect()
    }

    /// Write the patch to `path`, replacing it atomically.
    ///
    /// An empty patch writes an empty file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), PatchError> {
        let path = path.as_ref();
        atomic_write(path, self.to_text().as_bytes()).map_err(|source| PatchError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl<'a> IntoIterator for &'a Patch {
    type Item = &'a FileDiff;
    type IntoIter = std::slice::Iter<'a, FileDiff>;

    fn into_iter(self) -> Self::IntoIter {
        self.file_diffs.iter()
    }
}

/// Atomic file write: tempfile + fsync + rename.
///
/// Either the full write succeeds or the destination is left untouched.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    // Create tempfile in same directory to ensure same filesystem
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if fs::metadata(path).is_ok_and(|meta| meta.is_dir()) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "destination is a directory",
        ));
    }

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}
