use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};

use tree_sitter::{Parser, Tree};

use crate::error::TokenizeError;
use crate::grammar::Grammar;

/// Leaf node kinds in left-to-right order.
pub type TokenSequence = Vec<&'static str>;

// Thread-local parser cache: one Parser per grammar per thread.
// Parsers carry no per-input state between calls, so reuse cannot change results.
thread_local! {
    static PARSER_CACHE: RefCell<HashMap<Grammar, Parser>> = RefCell::new(HashMap::new());
}

/// Extract the leaf-token kinds of `source` parsed under `grammar`.
///
/// Never fails: anything that keeps the source from being parsed yields an
/// empty sequence, which callers must read as "could not be analyzed".
pub fn extract_leaf_tokens(source: &str, grammar: Grammar) -> TokenSequence {
    match try_extract_leaf_tokens(source, grammar) {
        Ok(tokens) => tokens,
        Err(err) => {
            tracing::debug!(%err, "leaf token extraction failed, using empty sequence");
            Vec::new()
        }
    }
}

/// Strict form of [`extract_leaf_tokens`] that reports why parsing failed.
pub fn try_extract_leaf_tokens(
    source: &str,
    grammar: Grammar,
) -> Result<TokenSequence, TokenizeError> {
    if source.is_empty() {
        return Ok(Vec::new());
    }

    let parsed = panic::catch_unwind(AssertUnwindSafe(|| parse(source, grammar)));
    let tree = match parsed {
        Ok(result) => result?,
        Err(_) => {
            // The parser may be left mid-parse; start fresh next time.
            PARSER_CACHE.with(|cache| cache.borrow_mut().remove(&grammar));
            return Err(TokenizeError::ParserPanicked { grammar });
        }
    };

    Ok(leaf_kinds(&tree))
}

fn parse(source: &str, grammar: Grammar) -> Result<Tree, TokenizeError> {
    PARSER_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        let parser = match cache.entry(grammar) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let language = grammar
                    .language()
                    .ok_or(TokenizeError::LanguageUnavailable { grammar })?;
                let mut parser = Parser::new();
                parser
                    .set_language(&language)
                    .map_err(|_| TokenizeError::LanguageUnavailable { grammar })?;
                entry.insert(parser)
            }
        };

        parser
            .parse(source.as_bytes(), None)
            .ok_or(TokenizeError::ParseFailed { grammar })
    })
}

/// Depth-first, left-to-right walk with an explicit cursor so deeply nested
/// trees cannot exhaust the stack. A root without children has no leaves.
fn leaf_kinds(tree: &Tree) -> TokenSequence {
    let mut tokens = Vec::new();
    let mut cursor = tree.walk();
    if !cursor.goto_first_child() {
        return tokens;
    }

    'walk: loop {
        let node = cursor.node();
        if node.child_count() == 0 {
            tokens.push(node.kind());
        } else if cursor.goto_first_child() {
            continue;
        }

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    tokens
}
