//! Rewrite rules and the pipeline that sequences them.
//!
//! A rule mutates a [`SyntaxTree`] in place. Applying a rule that matches
//! nothing leaves the tree untouched and succeeds. Rules are stateless, so the
//! same pipeline can be applied to any number of files.

pub mod errors;
pub mod pipeline;
pub mod rename;

pub use errors::RuleError;
pub use pipeline::{Pipeline, PipelineError};
pub use rename::{RenameDecl, RenameIdent};

use crate::tree::SyntaxTree;

/// A named tree rewrite.
pub trait RewriteRule {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    fn apply(&self, tree: &mut SyntaxTree) -> Result<(), RuleError>;
}

/// Rule backed by a closure.
pub struct FnRule<F> {
    name: String,
    f: F,
}

impl<F> FnRule<F>
where
    F: Fn(&mut SyntaxTree) -> Result<(), RuleError>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> RewriteRule for FnRule<F>
where
    F: Fn(&mut SyntaxTree) -> Result<(), RuleError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, tree: &mut SyntaxTree) -> Result<(), RuleError> {
        (self.f)(tree)
    }
}
