use crate::pool::with_parser;
use crate::tree::errors::PrintError;
use crate::tree::node::{Span, SyntaxTree, Token};
use crate::tree::visit::Visit;

/// Serialize a tree back to source text.
///
/// Output is the leaves' trivia and text in document order, so an untouched
/// tree prints exactly the text it was parsed from. The result is re-parsed
/// and rejected if a rewrite left it syntactically invalid.
pub fn print(tree: &SyntaxTree) -> Result<String, PrintError> {
    let mut writer = CheckedWriter::default();
    writer.visit_node(tree.root());
    if let Some((kind, span)) = writer.empty {
        return Err(PrintError::EmptyIdentifier {
            kind,
            line: span.line,
            column: span.column,
        });
    }
    writer.out.push_str(tree.trailing());

    with_parser(|parser| parser.validate(&writer.out))
        .and_then(|result| result)
        .map_err(PrintError::InvalidOutput)?;

    Ok(writer.out)
}

#[derive(Default)]
struct CheckedWriter {
    out: String,
    empty: Option<(&'static str, Span)>,
}

impl<'ast> Visit<'ast> for CheckedWriter {
    fn visit_ident(&mut self, ident: &'ast Token) {
        if ident.text.is_empty() && self.empty.is_none() {
            self.empty = Some((ident.kind, ident.span));
        }
        self.out.push_str(&ident.leading);
        self.out.push_str(&ident.text);
    }

    fn visit_token(&mut self, token: &'ast Token) {
        self.out.push_str(&token.leading);
        self.out.push_str(&token.text);
    }
}
