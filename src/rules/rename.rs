//! Rename rules.
//!
//! [`RenameIdent`] renames every identifier spelled `from`, which covers
//! declarations together with all of their references. [`RenameDecl`] renames
//! only the name of matching item-level declarations and leaves references
//! alone. The two are not interchangeable: renaming a function declaration
//! without its call sites produces code that no longer compiles.

use crate::rules::{RewriteRule, RuleError};
use crate::tree::visit::{visit_tree_mut, walk_decl_mut, VisitMut};
use crate::tree::{Branch, Decl, DeclKind, SyntaxTree, Token};
use tracing::debug;

/// Check that `name` is usable as a Rust identifier.
pub fn validate_identifier(name: &str) -> Result<(), RuleError> {
    syn::parse_str::<syn::Ident>(name)
        .map(|_| ())
        .map_err(|e| RuleError::InvalidIdentifier {
            name: name.to_string(),
            message: e.to_string(),
        })
}

fn validate_pair(from: &str, to: &str) -> Result<(), RuleError> {
    validate_identifier(from)?;
    validate_identifier(to)?;
    if from == to {
        return Err(RuleError::SameName {
            name: from.to_string(),
        });
    }
    Ok(())
}

/// Rename every occurrence of an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameIdent {
    name: String,
    from: String,
    to: String,
}

impl RenameIdent {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self, RuleError> {
        let from = from.into();
        let to = to.into();
        validate_pair(&from, &to)?;
        Ok(Self {
            name: format!("rename-ident({from} -> {to})"),
            from,
            to,
        })
    }

    /// Override the diagnostic name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }
}

impl RewriteRule for RenameIdent {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, tree: &mut SyntaxTree) -> Result<(), RuleError> {
        if tree.count_identifier(&self.from) == 0 {
            return Ok(());
        }
        let is_source = |decl: &Decl| decl.name_text() == Some(self.from.as_str());
        if let Some(existing) = find_collision(&tree.item_scopes(), is_source, &self.to) {
            return Err(collision(&self.from, &self.to, existing));
        }

        let mut renamer = IdentRenamer {
            from: &self.from,
            to: &self.to,
            renamed: 0,
        };
        visit_tree_mut(&mut renamer, tree);
        debug!(rule = %self.name, renamed = renamer.renamed, "renamed identifiers");
        Ok(())
    }
}

struct IdentRenamer<'r> {
    from: &'r str,
    to: &'r str,
    renamed: usize,
}

impl VisitMut for IdentRenamer<'_> {
    fn visit_ident_mut(&mut self, ident: &mut Token) {
        if ident.text == self.from {
            ident.text = self.to.to_string();
            self.renamed += 1;
        }
    }
}

/// Rename item-level declarations only, optionally of a single kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDecl {
    name: String,
    from: String,
    to: String,
    kind: Option<DeclKind>,
}

impl RenameDecl {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Result<Self, RuleError> {
        let from = from.into();
        let to = to.into();
        validate_pair(&from, &to)?;
        Ok(Self {
            name: format!("rename-decl({from} -> {to})"),
            from,
            to,
            kind: None,
        })
    }

    /// Restrict the rule to declarations of one kind.
    pub fn of_kind(mut self, kind: DeclKind) -> Self {
        self.name = format!("rename-decl({} {} -> {})", kind, self.from, self.to);
        self.kind = Some(kind);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn kind(&self) -> Option<DeclKind> {
        self.kind
    }

    fn kind_matches(&self, decl: &Decl) -> bool {
        self.kind.map_or(true, |kind| kind == decl.kind)
    }
}

impl RewriteRule for RenameDecl {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, tree: &mut SyntaxTree) -> Result<(), RuleError> {
        let is_source =
            |decl: &Decl| self.kind_matches(decl) && decl.name_text() == Some(self.from.as_str());
        let scopes = tree.item_scopes();
        if !scopes.iter().flatten().any(|decl| is_source(decl)) {
            return Ok(());
        }
        if let Some(existing) = find_collision(&scopes, is_source, &self.to) {
            return Err(collision(&self.from, &self.to, existing));
        }

        let mut renamer = DeclRenamer {
            rule: self,
            renamed: 0,
        };
        visit_tree_mut(&mut renamer, tree);
        debug!(rule = %self.name, renamed = renamer.renamed, "renamed declarations");
        Ok(())
    }
}

struct DeclRenamer<'r> {
    rule: &'r RenameDecl,
    renamed: usize,
}

impl VisitMut for DeclRenamer<'_> {
    fn visit_decl_mut(&mut self, decl: &mut Decl) {
        if self.rule.kind_matches(decl) {
            if let Some(name) = decl.name_mut() {
                if name.text == self.rule.from {
                    name.text = self.rule.to.clone();
                    self.renamed += 1;
                }
            }
        }
        walk_decl_mut(self, decl);
    }

    // Items inside function bodies are local, not item-level.
    fn visit_block_mut(&mut self, _block: &mut Branch) {}
}

/// A declaration named `to` that sits in the same container and namespace as
/// a declaration about to be renamed.
fn find_collision<'t>(
    scopes: &[Vec<&'t Decl>],
    is_source: impl Fn(&Decl) -> bool,
    to: &str,
) -> Option<&'t Decl> {
    scopes.iter().find_map(|scope| {
        scope
            .iter()
            .filter(|decl| is_source(decl))
            .find_map(|source| {
                scope.iter().copied().find(|decl| {
                    decl.name_text() == Some(to) && decl.shares_namespace(source)
                })
            })
    })
}

fn collision(from: &str, to: &str, existing: &Decl) -> RuleError {
    RuleError::NameCollision {
        from: from.to_string(),
        to: to.to_string(),
        kind: existing.kind,
        line: existing.name().map_or(existing.branch.span.line, |n| n.span.line),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{parse, print};

    const OLD_NEW: &str = r#"
fn oldName() {
    println!("Hello, world!");
}

fn main() {
    oldName()
}
"#;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn rename_ident_covers_declaration_and_call_sites() {
        let mut tree = parse(OLD_NEW).unwrap();
        RenameIdent::new("oldName", "newName")
            .unwrap()
            .apply(&mut tree)
            .unwrap();

        let printed = print(&tree).unwrap();
        assert_eq!(count(&printed, "oldName"), 0);
        assert_eq!(count(&printed, "newName"), 2);
    }

    #[test]
    fn rename_decl_leaves_references_alone() {
        let mut tree = parse(OLD_NEW).unwrap();
        RenameDecl::new("oldName", "newName")
            .unwrap()
            .apply(&mut tree)
            .unwrap();

        let printed = print(&tree).unwrap();
        assert!(printed.contains("fn newName()"));
        assert!(printed.contains("    oldName()"));
    }

    #[test]
    fn no_match_is_a_no_op() {
        let mut tree = parse(OLD_NEW).unwrap();
        let before = print(&tree).unwrap();

        RenameIdent::new("absent", "present")
            .unwrap()
            .apply(&mut tree)
            .unwrap();
        RenameDecl::new("absent", "present")
            .unwrap()
            .apply(&mut tree)
            .unwrap();

        assert_eq!(print(&tree).unwrap(), before);
    }

    #[test]
    fn rename_ident_reaches_types_fields_and_macros() {
        let source = "struct Foo { foo: u8 }\nfn make(foo: u8) -> Foo { Foo { foo } }\nfn show(f: Foo) { println!(\"{}\", f.foo); }\n";
        let mut tree = parse(source).unwrap();
        RenameIdent::new("foo", "bar")
            .unwrap()
            .apply(&mut tree)
            .unwrap();

        let printed = print(&tree).unwrap();
        assert_eq!(
            printed,
            "struct Foo { bar: u8 }\nfn make(bar: u8) -> Foo { Foo { bar } }\nfn show(f: Foo) { println!(\"{}\", f.bar); }\n"
        );
    }

    #[test]
    fn rename_decl_skips_local_items() {
        let source = "fn helper() {}\nfn outer() {\n    fn helper() {}\n    helper();\n}\n";
        let mut tree = parse(source).unwrap();
        RenameDecl::new("helper", "assist")
            .unwrap()
            .apply(&mut tree)
            .unwrap();

        assert_eq!(
            tree.to_source(),
            "fn assist() {}\nfn outer() {\n    fn helper() {}\n    helper();\n}\n"
        );
    }

    #[test]
    fn rename_decl_reaches_module_and_impl_items() {
        let source = "mod inner {\n    pub fn run() {}\n}\nstruct S;\nimpl S {\n    fn run(&self) {}\n}\n";
        let mut tree = parse(source).unwrap();
        RenameDecl::new("run", "start")
            .unwrap()
            .apply(&mut tree)
            .unwrap();

        let printed = tree.to_source();
        assert_eq!(count(&printed, "fn start"), 2);
        assert_eq!(count(&printed, "run"), 0);
    }

    #[test]
    fn rename_decl_kind_filter() {
        let source = "struct Item;\nfn Item() {}\n";
        let mut tree = parse(source).unwrap();
        RenameDecl::new("Item", "Entry")
            .unwrap()
            .of_kind(DeclKind::Struct)
            .apply(&mut tree)
            .unwrap();

        assert_eq!(tree.to_source(), "struct Entry;\nfn Item() {}\n");
    }

    #[test]
    fn collision_with_existing_declaration_fails() {
        let source = "fn foo() {}\nfn bar() {}\nfn main() { foo() }\n";

        let mut tree = parse(source).unwrap();
        let err = RenameIdent::new("foo", "bar")
            .unwrap()
            .apply(&mut tree)
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::NameCollision {
                from: "foo".to_string(),
                to: "bar".to_string(),
                kind: DeclKind::Function,
                line: 2,
            }
        );

        let mut tree = parse(source).unwrap();
        let err = RenameDecl::new("foo", "bar")
            .unwrap()
            .apply(&mut tree)
            .unwrap_err();
        assert!(matches!(err, RuleError::NameCollision { .. }));
    }

    #[test]
    fn same_name_in_sibling_impls_is_not_a_collision() {
        let source = "struct A;\nimpl A {\n    fn new() -> A { A }\n}\nstruct B;\nimpl B {\n    fn create() -> B { B }\n}\n";
        let mut tree = parse(source).unwrap();
        RenameIdent::new("new", "create")
            .unwrap()
            .apply(&mut tree)
            .unwrap();

        assert_eq!(count(&tree.to_source(), "fn create()"), 2);
    }

    #[test]
    fn same_name_in_sibling_modules_is_not_a_collision() {
        let source = "mod a {\n    pub fn run() {}\n}\nmod b {\n    pub fn start() {}\n}\n";

        let mut tree = parse(source).unwrap();
        RenameDecl::new("run", "start")
            .unwrap()
            .apply(&mut tree)
            .unwrap();
        assert_eq!(count(&tree.to_source(), "pub fn start()"), 2);

        let mut tree = parse(source).unwrap();
        RenameIdent::new("run", "start")
            .unwrap()
            .apply(&mut tree)
            .unwrap();
        assert_eq!(count(&tree.to_source(), "run"), 0);
    }

    #[test]
    fn same_container_still_collides() {
        let source = "struct A;\nimpl A {\n    fn new() {}\n    fn create() {}\n}\n";
        let mut tree = parse(source).unwrap();
        let err = RenameIdent::new("new", "create")
            .unwrap()
            .apply(&mut tree)
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::NameCollision {
                from: "new".to_string(),
                to: "create".to_string(),
                kind: DeclKind::Function,
                line: 4,
            }
        );
    }

    #[test]
    fn types_and_values_do_not_collide() {
        let source = "struct Widget { id: u8 }\nfn make() -> Widget { Widget { id: 0 } }\n";

        let mut tree = parse(source).unwrap();
        RenameDecl::new("make", "Widget")
            .unwrap()
            .apply(&mut tree)
            .unwrap();
        assert!(tree.to_source().contains("fn Widget() -> Widget"));

        let mut tree = parse("trait Shape {}\nconst AREA: u8 = 1;\n").unwrap();
        RenameIdent::new("AREA", "Shape")
            .unwrap()
            .apply(&mut tree)
            .unwrap();
        assert_eq!(tree.to_source(), "trait Shape {}\nconst Shape: u8 = 1;\n");
    }

    #[test]
    fn unit_struct_claims_the_value_namespace() {
        let source = "struct Widget;\nfn make() -> Widget { Widget }\n";
        let mut tree = parse(source).unwrap();
        let err = RenameIdent::new("make", "Widget")
            .unwrap()
            .apply(&mut tree)
            .unwrap_err();
        assert!(matches!(
            err,
            RuleError::NameCollision {
                kind: DeclKind::Struct,
                line: 1,
                ..
            }
        ));
    }

    #[test]
    fn lifetimes_and_labels_are_left_alone() {
        let mut tree = parse("fn f<'a>(a: &'a str) -> &'a str { a }\n").unwrap();
        RenameIdent::new("a", "b")
            .unwrap()
            .apply(&mut tree)
            .unwrap();
        assert_eq!(
            print(&tree).unwrap(),
            "fn f<'a>(b: &'a str) -> &'a str { b }\n"
        );

        let mut tree = parse("fn g(a: u8) {\n    'a: loop {\n        break 'a;\n    }\n}\n").unwrap();
        RenameIdent::new("a", "n")
            .unwrap()
            .apply(&mut tree)
            .unwrap();
        assert_eq!(
            tree.to_source(),
            "fn g(n: u8) {\n    'a: loop {\n        break 'a;\n    }\n}\n"
        );
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(matches!(
            RenameIdent::new("foo", "1abc"),
            Err(RuleError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            RenameIdent::new("foo", "fn"),
            Err(RuleError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            RenameDecl::new("two words", "bar"),
            Err(RuleError::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            RenameDecl::new("same", "same"),
            Err(RuleError::SameName { .. })
        ));
    }

    #[test]
    fn rule_names_describe_the_rename() {
        assert_eq!(
            RenameIdent::new("foo", "bar").unwrap().name(),
            "rename-ident(foo -> bar)"
        );
        assert_eq!(
            RenameDecl::new("foo", "bar")
                .unwrap()
                .of_kind(DeclKind::Function)
                .name(),
            "rename-decl(function foo -> bar)"
        );
        assert_eq!(
            RenameIdent::new("foo", "bar").unwrap().named("custom").name(),
            "custom"
        );
    }
}
