//! Visitors over [`Node`] trees.
//!
//! Traversal is pre-order in document order: a node's hook runs before any of
//! its children are visited, and children are visited left to right. Each
//! `visit_*` hook defaults to the matching `walk_*` function, so overriding a
//! hook without calling `walk_*` prunes that subtree.

use crate::tree::node::{Branch, Decl, Node, SyntaxTree, Token};

/// Read-only visitor.
pub trait Visit<'ast> {
    fn visit_node(&mut self, node: &'ast Node) {
        walk_node(self, node);
    }

    fn visit_file(&mut self, file: &'ast Branch) {
        walk_branch(self, file);
    }

    fn visit_decl(&mut self, decl: &'ast Decl) {
        walk_decl(self, decl);
    }

    fn visit_block(&mut self, block: &'ast Branch) {
        walk_branch(self, block);
    }

    fn visit_call(&mut self, call: &'ast Branch) {
        walk_branch(self, call);
    }

    fn visit_other(&mut self, other: &'ast Branch) {
        walk_branch(self, other);
    }

    fn visit_ident(&mut self, _ident: &'ast Token) {}

    fn visit_token(&mut self, _token: &'ast Token) {}
}

pub fn walk_node<'ast, V>(visitor: &mut V, node: &'ast Node)
where
    V: Visit<'ast> + ?Sized,
{
    match node {
        Node::File(branch) => visitor.visit_file(branch),
        Node::Decl(decl) => visitor.visit_decl(decl),
        Node::Block(branch) => visitor.visit_block(branch),
        Node::Call(branch) => visitor.visit_call(branch),
        Node::Other(branch) => visitor.visit_other(branch),
        Node::Ident(token) => visitor.visit_ident(token),
        Node::Token(token) => visitor.visit_token(token),
    }
}

pub fn walk_branch<'ast, V>(visitor: &mut V, branch: &'ast Branch)
where
    V: Visit<'ast> + ?Sized,
{
    for child in &branch.children {
        visitor.visit_node(child);
    }
}

pub fn walk_decl<'ast, V>(visitor: &mut V, decl: &'ast Decl)
where
    V: Visit<'ast> + ?Sized,
{
    walk_branch(visitor, &decl.branch);
}

/// Mutating visitor. Rewrite rules implement this.
pub trait VisitMut {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }

    fn visit_file_mut(&mut self, file: &mut Branch) {
        walk_branch_mut(self, file);
    }

    fn visit_decl_mut(&mut self, decl: &mut Decl) {
        walk_decl_mut(self, decl);
    }

    fn visit_block_mut(&mut self, block: &mut Branch) {
        walk_branch_mut(self, block);
    }

    fn visit_call_mut(&mut self, call: &mut Branch) {
        walk_branch_mut(self, call);
    }

    fn visit_other_mut(&mut self, other: &mut Branch) {
        walk_branch_mut(self, other);
    }

    fn visit_ident_mut(&mut self, _ident: &mut Token) {}

    fn visit_token_mut(&mut self, _token: &mut Token) {}
}

pub fn walk_node_mut<V>(visitor: &mut V, node: &mut Node)
where
    V: VisitMut + ?Sized,
{
    match node {
        Node::File(branch) => visitor.visit_file_mut(branch),
        Node::Decl(decl) => visitor.visit_decl_mut(decl),
        Node::Block(branch) => visitor.visit_block_mut(branch),
        Node::Call(branch) => visitor.visit_call_mut(branch),
        Node::Other(branch) => visitor.visit_other_mut(branch),
        Node::Ident(token) => visitor.visit_ident_mut(token),
        Node::Token(token) => visitor.visit_token_mut(token),
    }
}

pub fn walk_branch_mut<V>(visitor: &mut V, branch: &mut Branch)
where
    V: VisitMut + ?Sized,
{
    for child in &mut branch.children {
        visitor.visit_node_mut(child);
    }
}

pub fn walk_decl_mut<V>(visitor: &mut V, decl: &mut Decl)
where
    V: VisitMut + ?Sized,
{
    walk_branch_mut(visitor, &mut decl.branch);
}

/// Run a mutating visitor over the whole tree.
pub fn visit_tree_mut<V>(visitor: &mut V, tree: &mut SyntaxTree)
where
    V: VisitMut + ?Sized,
{
    visitor.visit_node_mut(tree.root_mut());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::parse;

    #[derive(Default)]
    struct Trace {
        events: Vec<String>,
    }

    impl<'ast> Visit<'ast> for Trace {
        fn visit_decl(&mut self, decl: &'ast Decl) {
            self.events
                .push(format!("decl:{}", decl.name_text().unwrap_or("?")));
            walk_decl(self, decl);
        }

        fn visit_call(&mut self, call: &'ast Branch) {
            self.events.push("call".to_string());
            walk_branch(self, call);
        }

        fn visit_ident(&mut self, ident: &'ast Token) {
            self.events.push(format!("ident:{}", ident.text));
        }
    }

    #[test]
    fn visits_in_document_pre_order() {
        let tree = parse("fn a() { b() }\nfn c() {}\n").unwrap();
        let mut trace = Trace::default();
        trace.visit_node(tree.root());

        assert_eq!(
            trace.events,
            vec!["decl:a", "ident:a", "call", "ident:b", "decl:c", "ident:c"]
        );
    }

    struct Upper;

    impl VisitMut for Upper {
        fn visit_ident_mut(&mut self, ident: &mut Token) {
            ident.text = ident.text.to_uppercase();
        }
    }

    #[test]
    fn mutating_visitor_rewrites_in_place() {
        let mut tree = parse("fn a() { b() }\n").unwrap();
        visit_tree_mut(&mut Upper, &mut tree);
        assert_eq!(tree.to_source(), "fn A() { B() }\n");
    }

    struct SkipBlocks {
        seen: usize,
    }

    impl VisitMut for SkipBlocks {
        fn visit_block_mut(&mut self, _block: &mut Branch) {}

        fn visit_ident_mut(&mut self, _ident: &mut Token) {
            self.seen += 1;
        }
    }

    #[test]
    fn overriding_a_hook_prunes_the_subtree() {
        let mut tree = parse("fn a() { let x = y; }\n").unwrap();
        let mut visitor = SkipBlocks { seen: 0 };
        visit_tree_mut(&mut visitor, &mut tree);
        assert_eq!(visitor.seen, 1);
    }
}
