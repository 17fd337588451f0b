//! Treeshift: structural rewrites for Rust sources, emitted as a patch
//!
//! Sources are parsed into a lossless syntax tree, rewritten by an ordered
//! pipeline of rules, printed back to text and diffed against the untouched
//! original. Files on disk are never modified; every change lands in a single
//! unified-diff patch file.
//!
//! # Architecture
//!
//! Each file is parsed twice: the original tree stays pristine and the
//! working tree is handed to the [`Pipeline`]. Printing concatenates every
//! token with its leading trivia, so an unmodified tree prints back byte for
//! byte and the diff contains only what the rules changed.
//!
//! # Guarantees
//!
//! - Rules run in order and the first failure stops the file
//! - Printed output is re-parsed before it is diffed
//! - The patch is written once, atomically (tempfile + fsync + rename)
//! - Identical input and output produce an empty diff
//!
//! # Example
//!
//! ```no_run
//! use treeshift::{process_source, Pipeline, RenameIdent};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new().with_rule(RenameIdent::new("foo", "bar")?);
//! let file_diff = process_source(Path::new("lib.rs"), "fn foo() { foo() }\n", &pipeline)?;
//! print!("{}", file_diff.diff);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod diff;
pub mod orchestrator;
pub mod patch;
pub mod pool;
pub mod rules;
pub mod tree;
pub mod walk;

// Re-exports
pub use config::{
    load_from_path, load_from_str, load_pipeline, ConfigError, FailurePolicy, RuleSetConfig,
    RunConfig,
};
pub use diff::{diff, diff_stats, DiffError, DiffStats};
pub use orchestrator::{
    build_patch, process_file, process_source, run, BuildOutcome, FileStage, ProcessError,
    ProcessErrorKind, RunError, RunReport,
};
pub use patch::{FileDiff, Patch, PatchError};
pub use rules::{FnRule, Pipeline, PipelineError, RenameDecl, RenameIdent, RewriteRule, RuleError};
pub use tree::{parse, print, DeclKind, ParseError, PrintError, SyntaxTree};
pub use walk::{discover_sources, is_source_file, walk_match, WalkError};
