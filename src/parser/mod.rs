//! Card-text parser.
//!
//! Card text is case-insensitive English:
//!
//! ```text
//! Flashcaster {1}{s}
//! Unit - Wizard
//! When you play a spell, Flashcaster deals 1 damage to any target.
//! 1/2
//! ```
//!
//! The name is everything on the first line before the first `{`. Every
//! whole-word occurrence of the name in the text is replaced by a
//! placeholder before tokenizing, so abilities can refer to their own card.
//!
//! The grammar is an ordered choice with backtracking: the first
//! alternative that matches wins. On failure the error points at the
//! furthest token any alternative reached.

mod error;
mod grammar;
mod lexer;
mod matches;
#[allow(clippy::module_inception)]
mod parser;

pub use error::{ParseError, Span};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::cards::definition::NAME_PLACEHOLDER;
use crate::cards::Card;

/// Parse one card definition.
///
/// ```
/// let card = ccg_rules::parser::parse("Land\nSource\n{t}: Add {s}.\n").unwrap();
/// assert_eq!(card.name, "Land");
/// assert_eq!(card.abilities.len(), 1);
/// ```
pub fn parse(text: &str) -> Result<Card, ParseError> {
    let name = card_name(text)?;
    let lowered = text.to_lowercase();
    let source = substitute_name(&lowered, &name.to_lowercase());

    let mut parser = Parser::new(&source);
    if let Some(err) = parser.lex_error(&source) {
        return Err(err);
    }
    match parser.card() {
        Ok(mut card) => {
            card.name = name;
            Ok(card)
        }
        Err(()) => Err(parser.error(&source)),
    }
}

/// Text of the first line before any cost symbol.
fn card_name(text: &str) -> Result<String, ParseError> {
    let first = text.lines().next().unwrap_or_default();
    let name = first.split('{').next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(ParseError::at(text, Span::new(0, first.len()), "missing card name"));
    }
    Ok(name.to_string())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Replace whole-word occurrences of `name` with the placeholder.
fn substitute_name(text: &str, name: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(found) = rest.find(name) {
        let before = rest[..found].chars().next_back();
        let after = rest[found + name.len()..].chars().next();
        out.push_str(&rest[..found]);
        if before.map_or(true, |c| !is_word_char(c)) && after.map_or(true, |c| !is_word_char(c)) {
            out.push_str(NAME_PLACEHOLDER);
        } else {
            out.push_str(name);
        }
        rest = &rest[found + name.len()..];
    }
    out.push_str(rest);
    out
}
