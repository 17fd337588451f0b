//! Per-file processing and the whole-run driver.
//!
//! Each file moves through
//! `Discovered -> Parsed -> Transformed -> Printed -> Diffed -> Recorded`.
//! Files are independent: nothing carries over from one file to the next.

use crate::config::{FailurePolicy, RunConfig};
use crate::diff::{self, DiffError, DiffStats};
use crate::patch::{FileDiff, Patch, PatchError};
use crate::rules::{Pipeline, PipelineError};
use crate::tree::{self, ParseError, PrintError};
use crate::walk::{self, WalkError};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Processing stages of a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Discovered,
    Parsed,
    Transformed,
    Printed,
    Diffed,
    Recorded,
}

impl fmt::Display for FileStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileStage::Discovered => "discovered",
            FileStage::Parsed => "parsed",
            FileStage::Transformed => "transformed",
            FileStage::Printed => "printed",
            FileStage::Diffed => "diffed",
            FileStage::Recorded => "recorded",
        };
        f.write_str(name)
    }
}

/// Which of the two trees of a file failed to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeRole {
    Original,
    Working,
}

impl fmt::Display for TreeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeRole::Original => f.write_str("original"),
            TreeRole::Working => f.write_str("rewritten"),
        }
    }
}

#[derive(Error, Debug)]
#[error("{}: {kind}", .path.display())]
pub struct ProcessError {
    pub path: PathBuf,
    #[source]
    pub kind: ProcessErrorKind,
}

impl ProcessError {
    fn new(path: &Path, kind: ProcessErrorKind) -> Self {
        Self {
            path: path.to_path_buf(),
            kind,
        }
    }

    /// Last stage the file completed before failing.
    pub fn stage(&self) -> FileStage {
        match self.kind {
            ProcessErrorKind::Read(_) | ProcessErrorKind::Parse(_) => FileStage::Discovered,
            ProcessErrorKind::Transform(_) => FileStage::Parsed,
            ProcessErrorKind::Print { .. } => FileStage::Transformed,
            ProcessErrorKind::Diff(_) => FileStage::Printed,
        }
    }
}

#[derive(Error, Debug)]
pub enum ProcessErrorKind {
    #[error("failed to read source: {0}")]
    Read(#[source] io::Error),

    #[error("parse failed: {0}")]
    Parse(#[source] ParseError),

    #[error("{0}")]
    Transform(#[source] PipelineError),

    #[error("failed to print {which} tree: {source}")]
    Print {
        which: TreeRole,
        #[source]
        source: PrintError,
    },

    #[error("{0}")]
    Diff(#[source] DiffError),
}

/// Run one file's text through parse, pipeline, print and diff.
///
/// The returned [`FileDiff`] names `path` on both sides; its diff is empty
/// when the pipeline left the text unchanged.
pub fn process_source(
    path: &Path,
    source: &str,
    pipeline: &Pipeline,
) -> Result<FileDiff, ProcessError> {
    process_with_stats(path, source, pipeline).map(|(file_diff, _)| file_diff)
}

/// Read `path` and process its contents.
pub fn process_file(path: &Path, pipeline: &Pipeline) -> Result<FileDiff, ProcessError> {
    let source = read_source(path)?;
    process_source(path, &source, pipeline)
}

fn read_source(path: &Path) -> Result<String, ProcessError> {
    fs::read_to_string(path).map_err(|e| ProcessError::new(path, ProcessErrorKind::Read(e)))
}

fn process_with_stats(
    path: &Path,
    source: &str,
    pipeline: &Pipeline,
) -> Result<(FileDiff, DiffStats), ProcessError> {
    let fail = |kind| ProcessError::new(path, kind);
    debug!(file = %path.display(), stage = %FileStage::Discovered);

    // Two parses so the working tree shares nothing with the original.
    let original = tree::parse(source).map_err(|e| fail(ProcessErrorKind::Parse(e)))?;
    let mut working = tree::parse(source).map_err(|e| fail(ProcessErrorKind::Parse(e)))?;
    debug!(file = %path.display(), stage = %FileStage::Parsed);

    pipeline
        .apply_all(&mut working, path)
        .map_err(|e| fail(ProcessErrorKind::Transform(e)))?;
    debug!(file = %path.display(), stage = %FileStage::Transformed);

    let original_text = tree::print(&original).map_err(|source| {
        fail(ProcessErrorKind::Print {
            which: TreeRole::Original,
            source,
        })
    })?;
    let modified_text = tree::print(&working).map_err(|source| {
        fail(ProcessErrorKind::Print {
            which: TreeRole::Working,
            source,
        })
    })?;
    debug!(file = %path.display(), stage = %FileStage::Printed);

    let display = path.display().to_string();
    let text = diff::diff(&display, &original_text, &display, &modified_text)
        .map_err(|e| fail(ProcessErrorKind::Diff(e)))?;
    let stats = diff::diff_stats(&original_text, &modified_text);
    debug!(file = %path.display(), stage = %FileStage::Diffed);

    Ok((FileDiff::new(path, path, text), stats))
}

/// Patch built from a list of files.
#[derive(Debug, Default)]
pub struct BuildOutcome {
    pub patch: Patch,
    pub stats: DiffStats,
    /// Files skipped under [`FailurePolicy::Continue`].
    pub failures: Vec<ProcessError>,
}

/// Process `paths` in order and collect their diffs.
///
/// Under [`FailurePolicy::Abort`] the first failure is returned and nothing
/// is recorded for the failing file.
pub fn build_patch<P: AsRef<Path>>(
    paths: &[P],
    pipeline: &Pipeline,
    policy: FailurePolicy,
) -> Result<BuildOutcome, ProcessError> {
    let mut outcome = BuildOutcome::default();

    for path in paths {
        let path = path.as_ref();
        let result =
            read_source(path).and_then(|source| process_with_stats(path, &source, pipeline));

        match result {
            Ok((file_diff, stats)) => {
                info!(
                    file = %path.display(),
                    changed = !file_diff.is_empty(),
                    stage = %FileStage::Recorded,
                    "recorded file diff"
                );
                outcome.stats += stats;
                outcome.patch.add_file_diff(file_diff);
            }
            Err(err) => match policy {
                FailurePolicy::Abort => return Err(err),
                FailurePolicy::Continue => {
                    warn!(file = %path.display(), stage = %err.stage(), error = %err.kind, "skipping file");
                    outcome.failures.push(err);
                }
            },
        }
    }

    Ok(outcome)
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Summary of a finished run.
#[derive(Debug)]
pub struct RunReport {
    pub output: PathBuf,
    /// Files whose diff was recorded, changed or not.
    pub files_processed: usize,
    pub files_changed: usize,
    pub stats: DiffStats,
    pub failures: Vec<ProcessError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Discover matching files under the configured root, process them and write
/// the patch once.
pub fn run(config: &RunConfig) -> Result<RunReport, RunError> {
    let paths = walk::discover_sources(&config.root, &config.pattern)?;
    info!(
        root = %config.root.display(),
        pattern = %config.pattern,
        files = paths.len(),
        rules = config.pipeline.len(),
        "discovered source files"
    );

    let outcome = build_patch(&paths, &config.pipeline, config.failure_policy)?;
    outcome.patch.write_to_file(&config.output)?;
    info!(output = %config.output.display(), "patch written");

    Ok(RunReport {
        output: config.output.clone(),
        files_processed: outcome.patch.len(),
        files_changed: outcome.patch.changed_files().count(),
        stats: outcome.stats,
        failures: outcome.failures,
    })
}
