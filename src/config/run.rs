use crate::rules::Pipeline;
use std::path::PathBuf;

pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_PATTERN: &str = "*.rs";
pub const DEFAULT_OUTPUT: &str = "output.patch";

/// What a run does when one file fails to process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing file and write no patch.
    #[default]
    Abort,
    /// Record the failure, keep going and write the patch of the files that
    /// succeeded.
    Continue,
}

/// Everything a run needs, passed in explicitly.
#[derive(Debug)]
pub struct RunConfig {
    pub root: PathBuf,
    /// Glob matched against file names.
    pub pattern: String,
    pub output: PathBuf,
    pub pipeline: Pipeline,
    pub failure_policy: FailurePolicy,
}

impl RunConfig {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            pattern: DEFAULT_PATTERN.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            pipeline,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
