use crate::tree::DeclKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("'{name}' is not a valid identifier: {message}")]
    InvalidIdentifier { name: String, message: String },

    #[error("cannot rename '{name}' to itself")]
    SameName { name: String },

    #[error("renaming '{from}' to '{to}' collides with {kind} '{to}' declared at line {line}")]
    NameCollision {
        from: String,
        to: String,
        kind: DeclKind,
        line: usize,
    },

    #[error("{message}")]
    Failed { message: String },
}

impl RuleError {
    /// Failure reported by a custom rule.
    pub fn failed(message: impl Into<String>) -> Self {
        RuleError::Failed {
            message: message.into(),
        }
    }
}
