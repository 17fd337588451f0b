//! Owned, lossless syntax tree.
//!
//! The tree mirrors the tree-sitter CST one node per CST node, but owns all of
//! its data so that two parses of the same text never share state. Interior
//! nodes are classified into a handful of variants that rewrite rules match
//! on; everything else is kept as [`Node::Other`] with its grammar kind.
//!
//! Each leaf stores the exact token text plus the trivia (whitespace and any
//! text not covered by a leaf) that precedes it, so concatenating leaves in
//! document order reproduces the source byte-for-byte.

use crate::tree::visit::{self, Visit};

/// Grammar kinds classified as identifiers.
pub(crate) const IDENT_KINDS: &[&str] = &[
    "identifier",
    "type_identifier",
    "field_identifier",
    "shorthand_field_identifier",
];

/// Grammar kinds whose `identifier` child is not a name: `'a` in a lifetime
/// or a loop label.
pub(crate) const QUOTED_KINDS: &[&str] = &["lifetime", "label", "loop_label"];

/// Grammar kind of module, impl and trait bodies.
const ITEM_CONTAINER_KIND: &str = "declaration_list";

/// Source location of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub byte_start: usize,
    pub byte_end: usize,
    /// 1-based line of the first byte.
    pub line: usize,
    /// 1-based byte column of the first byte.
    pub column: usize,
}

impl Span {
    pub(crate) fn of(node: &tree_sitter::Node<'_>) -> Self {
        let start = node.start_position();
        Self {
            byte_start: node.start_byte(),
            byte_end: node.end_byte(),
            line: start.row + 1,
            column: start.column + 1,
        }
    }
}

/// Kind of a named declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKind {
    Function,
    Struct,
    Enum,
    Union,
    Trait,
    TypeAlias,
    Const,
    Static,
    Module,
    Macro,
}

impl DeclKind {
    /// Classify a tree-sitter grammar kind.
    pub fn from_grammar_kind(kind: &str) -> Option<Self> {
        match kind {
            "function_item" | "function_signature_item" => Some(DeclKind::Function),
            "struct_item" => Some(DeclKind::Struct),
            "enum_item" => Some(DeclKind::Enum),
            "union_item" => Some(DeclKind::Union),
            "trait_item" => Some(DeclKind::Trait),
            "type_item" => Some(DeclKind::TypeAlias),
            "const_item" => Some(DeclKind::Const),
            "static_item" => Some(DeclKind::Static),
            "mod_item" => Some(DeclKind::Module),
            "macro_definition" => Some(DeclKind::Macro),
            _ => None,
        }
    }

    /// Parse the name used in rule configs (`function`, `struct`, ...).
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "function" | "fn" => Some(DeclKind::Function),
            "struct" => Some(DeclKind::Struct),
            "enum" => Some(DeclKind::Enum),
            "union" => Some(DeclKind::Union),
            "trait" => Some(DeclKind::Trait),
            "type" => Some(DeclKind::TypeAlias),
            "const" => Some(DeclKind::Const),
            "static" => Some(DeclKind::Static),
            "mod" | "module" => Some(DeclKind::Module),
            "macro" => Some(DeclKind::Macro),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Function => "function",
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Union => "union",
            DeclKind::Trait => "trait",
            DeclKind::TypeAlias => "type",
            DeclKind::Const => "const",
            DeclKind::Static => "static",
            DeclKind::Module => "mod",
            DeclKind::Macro => "macro",
        }
    }
}

/// Rust namespace a declaration's name lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Type,
    Value,
    Macro,
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interior node: grammar kind, field name in the parent, ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    pub kind: &'static str,
    pub field: Option<&'static str>,
    pub span: Span,
    pub children: Vec<Node>,
}

/// Leaf node with its preceding trivia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: &'static str,
    pub field: Option<&'static str>,
    pub span: Span,
    pub leading: String,
    pub text: String,
}

/// A named declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub kind: DeclKind,
    pub branch: Branch,
}

impl Decl {
    /// The identifier in the `name` field, if the grammar provides one.
    pub fn name(&self) -> Option<&Token> {
        self.branch.children.iter().find_map(|child| match child {
            Node::Ident(token) if token.field == Some("name") => Some(token),
            _ => None,
        })
    }

    pub fn name_mut(&mut self) -> Option<&mut Token> {
        self.branch.children.iter_mut().find_map(|child| match child {
            Node::Ident(token) if token.field == Some("name") => Some(token),
            _ => None,
        })
    }

    pub fn name_text(&self) -> Option<&str> {
        self.name().map(|token| token.text.as_str())
    }

    /// Namespaces the name occupies. Unit and tuple structs also define a
    /// value (their constructor).
    pub fn namespaces(&self) -> &'static [Namespace] {
        match self.kind {
            DeclKind::Function | DeclKind::Const | DeclKind::Static => &[Namespace::Value],
            DeclKind::Macro => &[Namespace::Macro],
            DeclKind::Struct if !self.has_named_fields() => &[Namespace::Type, Namespace::Value],
            DeclKind::Struct
            | DeclKind::Enum
            | DeclKind::Union
            | DeclKind::Trait
            | DeclKind::TypeAlias
            | DeclKind::Module => &[Namespace::Type],
        }
    }

    /// Whether both declarations claim a name in a common namespace.
    pub fn shares_namespace(&self, other: &Decl) -> bool {
        self.namespaces()
            .iter()
            .any(|ns| other.namespaces().contains(ns))
    }

    fn has_named_fields(&self) -> bool {
        self.branch.children.iter().any(|child| {
            matches!(child, Node::Other(b) if b.kind == "field_declaration_list")
        })
    }
}

/// Syntax node, one variant per construct rewrite rules care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    File(Branch),
    Decl(Decl),
    Block(Branch),
    Call(Branch),
    Ident(Token),
    Token(Token),
    Other(Branch),
}

impl Node {
    pub(crate) fn from_branch(branch: Branch) -> Self {
        match branch.kind {
            "source_file" => Node::File(branch),
            "block" => Node::Block(branch),
            "call_expression" => Node::Call(branch),
            kind => match DeclKind::from_grammar_kind(kind) {
                Some(decl_kind) => Node::Decl(Decl {
                    kind: decl_kind,
                    branch,
                }),
                None => Node::Other(branch),
            },
        }
    }

    pub(crate) fn from_token(token: Token) -> Self {
        if IDENT_KINDS.contains(&token.kind) {
            Node::Ident(token)
        } else {
            Node::Token(token)
        }
    }

    /// Turn an identifier into a plain token so renames never see it.
    pub(crate) fn into_plain(self) -> Self {
        match self {
            Node::Ident(token) => Node::Token(token),
            other => other,
        }
    }

    /// Grammar kind as reported by tree-sitter.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::File(b) | Node::Block(b) | Node::Call(b) | Node::Other(b) => b.kind,
            Node::Decl(d) => d.branch.kind,
            Node::Ident(t) | Node::Token(t) => t.kind,
        }
    }

    /// Field name under which this node hangs off its parent.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Node::File(b) | Node::Block(b) | Node::Call(b) | Node::Other(b) => b.field,
            Node::Decl(d) => d.branch.field,
            Node::Ident(t) | Node::Token(t) => t.field,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Node::File(b) | Node::Block(b) | Node::Call(b) | Node::Other(b) => b.span,
            Node::Decl(d) => d.branch.span,
            Node::Ident(t) | Node::Token(t) => t.span,
        }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::File(b) | Node::Block(b) | Node::Call(b) | Node::Other(b) => &b.children,
            Node::Decl(d) => &d.branch.children,
            Node::Ident(_) | Node::Token(_) => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Ident(_) | Node::Token(_))
    }
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: Node,
    trailing: String,
}

impl SyntaxTree {
    pub(crate) fn from_parts(root: Node, trailing: String) -> Self {
        Self { root, trailing }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Trivia after the last token.
    pub fn trailing(&self) -> &str {
        &self.trailing
    }

    /// Direct children of the file (items and comments), in document order.
    pub fn items(&self) -> &[Node] {
        self.root.children()
    }

    /// Concatenate all leaves in document order.
    ///
    /// This never fails; use [`crate::tree::print`] for the checked variant.
    pub fn to_source(&self) -> String {
        let mut collector = LeafWriter::default();
        collector.visit_node(&self.root);
        collector.out.push_str(&self.trailing);
        collector.out
    }

    /// All identifier tokens in document order.
    pub fn identifiers(&self) -> Vec<&Token> {
        let mut collector = IdentCollector::default();
        collector.visit_node(&self.root);
        collector.idents
    }

    /// Number of identifier tokens spelled exactly `name`.
    pub fn count_identifier(&self, name: &str) -> usize {
        self.identifiers()
            .into_iter()
            .filter(|token| token.text == name)
            .count()
    }

    /// Item-level declarations: file scope, module bodies, impl and trait
    /// bodies. Items local to function bodies are excluded.
    pub fn item_declarations(&self) -> Vec<&Decl> {
        let mut collector = ItemCollector::default();
        collector.visit_node(&self.root);
        collector.decls
    }

    /// Item-level declarations grouped by the container holding them
    /// directly: the file, or one module, impl or trait body. Two names can
    /// only clash inside the same group.
    pub fn item_scopes(&self) -> Vec<Vec<&Decl>> {
        let mut collector = ScopeCollector::default();
        collector.visit_node(&self.root);
        collector.scopes
    }
}

#[derive(Default)]
struct LeafWriter {
    out: String,
}

impl<'ast> Visit<'ast> for LeafWriter {
    fn visit_ident(&mut self, ident: &'ast Token) {
        self.out.push_str(&ident.leading);
        self.out.push_str(&ident.text);
    }

    fn visit_token(&mut self, token: &'ast Token) {
        self.out.push_str(&token.leading);
        self.out.push_str(&token.text);
    }
}

#[derive(Default)]
struct IdentCollector<'ast> {
    idents: Vec<&'ast Token>,
}

impl<'ast> Visit<'ast> for IdentCollector<'ast> {
    fn visit_ident(&mut self, ident: &'ast Token) {
        self.idents.push(ident);
    }
}

#[derive(Default)]
struct ItemCollector<'ast> {
    decls: Vec<&'ast Decl>,
}

impl<'ast> Visit<'ast> for ItemCollector<'ast> {
    fn visit_decl(&mut self, decl: &'ast Decl) {
        self.decls.push(decl);
        visit::walk_decl(self, decl);
    }

    fn visit_block(&mut self, _block: &'ast Branch) {}
}

#[derive(Default)]
struct ScopeCollector<'ast> {
    scopes: Vec<Vec<&'ast Decl>>,
}

impl<'ast> ScopeCollector<'ast> {
    fn open(&mut self, container: &'ast Branch) {
        let decls = container
            .children
            .iter()
            .filter_map(|child| match child {
                Node::Decl(decl) => Some(decl),
                _ => None,
            })
            .collect();
        self.scopes.push(decls);
    }
}

impl<'ast> Visit<'ast> for ScopeCollector<'ast> {
    fn visit_file(&mut self, file: &'ast Branch) {
        self.open(file);
        visit::walk_branch(self, file);
    }

    fn visit_other(&mut self, other: &'ast Branch) {
        if other.kind == ITEM_CONTAINER_KIND {
            self.open(other);
        }
        visit::walk_branch(self, other);
    }

    fn visit_block(&mut self, _block: &'ast Branch) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decl_kind_names_round_trip() {
        for kind in [
            DeclKind::Function,
            DeclKind::Struct,
            DeclKind::Enum,
            DeclKind::Union,
            DeclKind::Trait,
            DeclKind::TypeAlias,
            DeclKind::Const,
            DeclKind::Static,
            DeclKind::Module,
            DeclKind::Macro,
        ] {
            assert_eq!(DeclKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(DeclKind::parse("fn"), Some(DeclKind::Function));
        assert_eq!(DeclKind::parse("impl"), None);
    }

    #[test]
    fn grammar_kinds_classify() {
        assert_eq!(
            DeclKind::from_grammar_kind("function_signature_item"),
            Some(DeclKind::Function)
        );
        assert_eq!(DeclKind::from_grammar_kind("impl_item"), None);
    }

    #[test]
    fn branch_classification() {
        let branch = |kind| Branch {
            kind,
            field: None,
            span: Span::default(),
            children: Vec::new(),
        };
        assert!(matches!(Node::from_branch(branch("source_file")), Node::File(_)));
        assert!(matches!(Node::from_branch(branch("block")), Node::Block(_)));
        assert!(matches!(
            Node::from_branch(branch("call_expression")),
            Node::Call(_)
        ));
        assert!(matches!(
            Node::from_branch(branch("struct_item")),
            Node::Decl(Decl {
                kind: DeclKind::Struct,
                ..
            })
        ));
        assert!(matches!(Node::from_branch(branch("impl_item")), Node::Other(_)));
    }

    fn scope_names(tree: &SyntaxTree) -> Vec<Vec<&str>> {
        tree.item_scopes()
            .iter()
            .map(|scope| scope.iter().filter_map(|d| d.name_text()).collect())
            .collect()
    }

    #[test]
    fn item_scopes_follow_containers() {
        let tree = crate::tree::parse(
            "struct A;\nimpl A {\n    fn new() -> A { A }\n}\nmod m {\n    fn run() {}\n    struct B;\n}\nfn f() {\n    fn local() {}\n}\n",
        )
        .unwrap();
        assert_eq!(
            scope_names(&tree),
            vec![vec!["A", "m", "f"], vec!["new"], vec!["run", "B"]]
        );
    }

    #[test]
    fn struct_namespaces_depend_on_shape() {
        let tree =
            crate::tree::parse("struct Unit;\nstruct Named { x: u8 }\nstruct Tuple(u8);\nfn Unit() {}\n")
                .unwrap();
        let decls = tree.item_declarations();
        assert_eq!(decls[0].namespaces(), &[Namespace::Type, Namespace::Value]);
        assert_eq!(decls[1].namespaces(), &[Namespace::Type]);
        assert_eq!(decls[2].namespaces(), &[Namespace::Type, Namespace::Value]);
        assert!(decls[0].shares_namespace(decls[3]));
        assert!(!decls[1].shares_namespace(decls[3]));
    }
}
