pub mod loader;
pub mod run;
pub mod schema;

pub use loader::{load_from_path, load_from_str, load_pipeline, ConfigError};
pub use run::{FailurePolicy, RunConfig, DEFAULT_OUTPUT, DEFAULT_PATTERN, DEFAULT_ROOT};
pub use schema::{
    Metadata, RuleDefinition, RuleSetConfig, RuleType, ValidationError, ValidationIssue,
};
