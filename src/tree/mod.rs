//! Syntax trees for Rust sources.
//!
//! Tree-sitter does the grammar work; this module turns its CST into an owned
//! [`SyntaxTree`] that rewrite rules mutate through [`VisitMut`] and that
//! [`print`] turns back into text without losing comments or formatting.

pub mod errors;
pub mod node;
pub mod parser;
pub mod printer;
pub mod visit;

pub use errors::{ParseError, PrintError};
pub use node::{Branch, Decl, DeclKind, Node, Span, SyntaxTree, Token};
pub use parser::SourceParser;
pub use printer::print;
pub use visit::{visit_tree_mut, Visit, VisitMut};

use crate::pool::with_parser;

/// Parse source text with the thread's pooled parser.
pub fn parse(source: &str) -> Result<SyntaxTree, ParseError> {
    with_parser(|parser| parser.parse(source))?
}
