//! Card-text lexer.
//!
//! Produces identifiers, integers and single-character punctuation.
//! Whitespace (newlines included) only separates tokens.

use super::error::Span;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    Punct(char),
    Error(String),
    Eof,
}

impl TokenKind {
    /// Human-readable form for error messages.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Ident(s) => format!("'{s}'"),
            TokenKind::Int(n) => format!("'{n}'"),
            TokenKind::Punct(c) => format!("'{c}'"),
            TokenKind::Error(msg) => msg.clone(),
            TokenKind::Eof => "end of input".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

const PUNCTUATION: &[char] = &['-', '+', ',', '{', '}', '/', ':', '.', '\''];

pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            done: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn next_token(&mut self) -> Token {
        self.eat_while(char::is_whitespace);
        let start = self.pos;

        let Some(ch) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::new(start, start));
        };

        let kind = if ch.is_ascii_alphabetic() {
            self.eat_while(|c| c.is_alphanumeric() || c == '_');
            TokenKind::Ident(self.source[start..self.pos].to_string())
        } else if ch.is_ascii_digit() {
            self.eat_while(|c| c.is_ascii_digit());
            match self.source[start..self.pos].parse() {
                Ok(n) => TokenKind::Int(n),
                Err(_) => TokenKind::Error("integer too large".to_string()),
            }
        } else if PUNCTUATION.contains(&ch) {
            TokenKind::Punct(ch)
        } else {
            TokenKind::Error(format!("unexpected character '{ch}'"))
        };

        Token::new(kind, Span::new(start, self.pos))
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            self.done = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).map(|t| t.kind).collect()
    }

    #[test]
    fn test_cost_symbols() {
        assert_eq!(
            kinds("{s}{12}"),
            vec![
                TokenKind::Punct('{'),
                TokenKind::Ident("s".into()),
                TokenKind::Punct('}'),
                TokenKind::Punct('{'),
                TokenKind::Int(12),
                TokenKind::Punct('}'),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_apostrophe_and_stats() {
        assert_eq!(
            kinds("it's +1/-1"),
            vec![
                TokenKind::Ident("it".into()),
                TokenKind::Punct('\''),
                TokenKind::Ident("s".into()),
                TokenKind::Punct('+'),
                TokenKind::Int(1),
                TokenKind::Punct('/'),
                TokenKind::Punct('-'),
                TokenKind::Int(1),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_spans_skip_newlines() {
        let tokens: Vec<_> = Lexer::new("unit\n  fly").collect();
        assert_eq!(tokens[1].span, Span::new(7, 10));
    }

    #[test]
    fn test_bad_character() {
        let tokens = kinds("draw ; card");
        assert_eq!(tokens[1], TokenKind::Error("unexpected character ';'".into()));
    }

    #[test]
    fn test_huge_integer() {
        let tokens = kinds("99999999999999999999999");
        assert_eq!(tokens[0], TokenKind::Error("integer too large".into()));
    }
}
