use crate::tree::errors::ParseError;
use crate::tree::node::{Branch, Node, Span, SyntaxTree, Token, QUOTED_KINDS};
use ast_grep_language::{LanguageExt, SupportLang};
use tree_sitter::{Parser, Tree, TreeCursor};

/// Tree-sitter parser wrapper producing owned [`SyntaxTree`]s.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        // Get the tree-sitter Language from ast-grep-language
        let ts_lang = SupportLang::Rust.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| ParseError::LanguageSet)?;

        Ok(Self { parser })
    }

    /// Parse source into a fresh, fully owned tree.
    ///
    /// Fails if tree-sitter reports any ERROR or MISSING node; no partial
    /// tree is returned.
    pub fn parse(&mut self, source: &str) -> Result<SyntaxTree, ParseError> {
        let tree = self.parse_raw(source)?;
        check_errors(&tree)?;
        Ok(convert(&tree, source))
    }

    /// Check that source parses cleanly without building a tree.
    pub fn validate(&mut self, source: &str) -> Result<(), ParseError> {
        let tree = self.parse_raw(source)?;
        check_errors(&tree)
    }

    fn parse_raw(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser
            .parse(source, None)
            .ok_or(ParseError::ParseFailed)
    }
}

/// Information about an ERROR node in the parse tree.
#[derive(Debug, Clone)]
pub struct ErrorNode {
    pub byte_start: usize,
    pub byte_end: usize,
    pub start_point: tree_sitter::Point,
}

fn check_errors(tree: &Tree) -> Result<(), ParseError> {
    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }

    let mut errors = Vec::new();
    collect_error_nodes(root, &mut errors);
    let count = errors.len().max(1);
    let first = errors.into_iter().next();
    let (byte_start, byte_end, point) = match first {
        Some(e) => (e.byte_start, e.byte_end, e.start_point),
        None => (root.start_byte(), root.end_byte(), root.start_position()),
    };

    Err(ParseError::Syntax {
        line: point.row + 1,
        column: point.column + 1,
        byte_start,
        byte_end,
        count,
    })
}

fn collect_error_nodes(node: tree_sitter::Node<'_>, errors: &mut Vec<ErrorNode>) {
    if node.is_error() || node.is_missing() {
        errors.push(ErrorNode {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            start_point: node.start_position(),
        });
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_error_nodes(child, errors);
    }
}

fn convert(tree: &Tree, source: &str) -> SyntaxTree {
    let mut cursor = tree.walk();
    let mut last_end = 0;
    // The root is always a branch, even for an empty file.
    let root = Node::from_branch(convert_branch(&mut cursor, source, &mut last_end));
    let trailing = source.get(last_end..).unwrap_or_default().to_string();
    SyntaxTree::from_parts(root, trailing)
}

fn convert_node(cursor: &mut TreeCursor<'_>, source: &str, last_end: &mut usize) -> Node {
    if cursor.node().child_count() == 0 {
        Node::from_token(convert_leaf(cursor, source, last_end))
    } else {
        Node::from_branch(convert_branch(cursor, source, last_end))
    }
}

fn convert_branch(cursor: &mut TreeCursor<'_>, source: &str, last_end: &mut usize) -> Branch {
    let node = cursor.node();
    let quoted = QUOTED_KINDS.contains(&node.kind());
    let mut children = Vec::with_capacity(node.child_count());

    if cursor.goto_first_child() {
        loop {
            let child = convert_node(cursor, source, last_end);
            children.push(if quoted { child.into_plain() } else { child });
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        cursor.goto_parent();
    }

    Branch {
        kind: node.kind(),
        field: cursor.field_name(),
        span: Span::of(&node),
        children,
    }
}

fn convert_leaf(cursor: &mut TreeCursor<'_>, source: &str, last_end: &mut usize) -> Token {
    let node = cursor.node();
    let start = node.start_byte().max(*last_end);
    let end = node.end_byte().max(start);
    let leading = source.get(*last_end..start).unwrap_or_default().to_string();
    let text = source.get(start..end).unwrap_or_default().to_string();
    *last_end = end;

    Token {
        kind: node.kind(),
        field: cursor.field_name(),
        span: Span::of(&node),
        leading,
        text,
    }
}
