use crate::rules::{RewriteRule, RuleError};
use crate::tree::SyntaxTree;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A rule failed; carries which rule, where it sits in the pipeline and
/// which file it was applied to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("rule '{rule}' (#{position}) failed: {source}")]
pub struct PipelineError {
    pub rule: String,
    /// 0-based position of the rule in the pipeline.
    pub position: usize,
    pub file: PathBuf,
    #[source]
    pub source: RuleError,
}

/// Ordered sequence of rewrite rules.
#[derive(Default)]
pub struct Pipeline {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule; it runs after every rule already in the pipeline.
    pub fn push(&mut self, rule: impl RewriteRule + 'static) {
        self.rules.push(Box::new(rule));
    }

    pub fn push_boxed(&mut self, rule: Box<dyn RewriteRule>) {
        self.rules.push(rule);
    }

    pub fn with_rule(mut self, rule: impl RewriteRule + 'static) -> Self {
        self.push(rule);
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name())
    }

    /// Apply every rule in order, stopping at the first failure.
    ///
    /// The tree is not rolled back on failure; callers discard it.
    pub fn apply_all(&self, tree: &mut SyntaxTree, file: &Path) -> Result<(), PipelineError> {
        for (position, rule) in self.rules.iter().enumerate() {
            debug!(file = %file.display(), rule = rule.name(), position, "applying rule");
            rule.apply(tree).map_err(|source| PipelineError {
                rule: rule.name().to_string(),
                position,
                file: file.to_path_buf(),
                source,
            })?;
        }
        Ok(())
    }
}

impl Extend<Box<dyn RewriteRule>> for Pipeline {
    fn extend<I: IntoIterator<Item = Box<dyn RewriteRule>>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rule_names()).finish()
    }
}
