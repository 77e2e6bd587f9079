//! Parse errors and source positions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Byte range in the card text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// Malformed card text.
///
/// Describes the furthest point the grammar reached before every
/// alternative failed, which is almost always where the typo is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub span: Span,
    /// 1-based line of the failure.
    pub line: usize,
    /// 1-based column of the failure.
    pub column: usize,
    /// Alternatives the grammar would have accepted, deduplicated.
    pub expected: Vec<String>,
    /// Text of the offending token, or "end of input".
    pub found: String,
}

impl ParseError {
    pub(crate) fn at(source: &str, span: Span, message: impl Into<String>) -> Self {
        let (line, column) = line_col(source, span.start);
        Self {
            message: message.into(),
            span,
            line,
            column,
            expected: Vec::new(),
            found: String::new(),
        }
    }

    pub(crate) fn unexpected(source: &str, span: Span, expected: Vec<String>, found: String) -> Self {
        let message = match expected.len() {
            0 => format!("unexpected {found}"),
            1 => format!("expected {}, found {found}", expected[0]),
            _ => format!("expected one of {}, found {found}", expected.join(", ")),
        };
        Self {
            expected,
            found,
            ..Self::at(source, span, message)
        }
    }
}

/// 1-based line and column of a byte offset.
pub(crate) fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = &source[..floor_char_boundary(source, offset)];
    let line = before.matches('\n').count() + 1;
    let column = before.rfind('\n').map_or(before.chars().count(), |nl| before[nl + 1..].chars().count()) + 1;
    (line, column)
}

fn floor_char_boundary(source: &str, mut offset: usize) -> usize {
    while offset > 0 && !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
