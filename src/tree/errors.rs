use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("failed to set language for parser")]
    LanguageSet,

    #[error("failed to parse source code")]
    ParseFailed,

    #[error("syntax error at line {line}, column {column} ({count} error node(s))")]
    Syntax {
        line: usize,
        column: usize,
        byte_start: usize,
        byte_end: usize,
        count: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrintError {
    #[error("empty {kind} at line {line}, column {column}")]
    EmptyIdentifier {
        kind: &'static str,
        line: usize,
        column: usize,
    },

    #[error("printed source no longer parses: {0}")]
    InvalidOutput(#[source] ParseError),
}
