//! Thread-local parser pooling.
//!
//! Each thread creates its parser on first use and reuses it afterwards.

use crate::tree::{ParseError, SourceParser};
use std::cell::RefCell;

thread_local! {
    static SOURCE_PARSER: RefCell<Option<SourceParser>> = const { RefCell::new(None) };
}

/// Execute function with pooled parser instance.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use treeshift::pool::with_parser;
///
/// let _tree = with_parser(|parser| parser.parse("fn main() {}"))??;
/// # Ok(())
/// # }
/// ```
pub fn with_parser<F, R>(f: F) -> Result<R, ParseError>
where
    F: FnOnce(&mut SourceParser) -> R,
{
    SOURCE_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = match slot.take() {
            Some(parser) => parser,
            None => SourceParser::new()?,
        };
        Ok(f(slot.insert(parser)))
    })
}
