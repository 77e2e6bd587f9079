use super::error::{ParseError, Span};
use super::lexer::{Lexer, Token, TokenKind};
use crate::cards::{Card, CardType, CostType, Essence, Quantity, Stats, SubType};
use crate::cards::definition::NAME_PLACEHOLDER;

pub(crate) type PResult<T> = Result<T, ()>;

/// Nesting allowed for matches inside matches ("that targets ...").
const MAX_MATCH_DEPTH: usize = 32;

/// Backtracking recursive-descent parser over card-text tokens.
///
/// Productions return `Err(())` on failure and may leave the cursor
/// anywhere; callers that continue after a failure go through `attempt`,
/// which rewinds. Every failed expectation is recorded so the error can
/// point at the furthest token any alternative reached.
pub struct Parser {
    tokens: Vec<Token>,
    pub(crate) pos: usize,
    furthest: usize,
    expected: Vec<String>,
    pub(crate) depth: usize,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self {
            tokens: Lexer::new(source).collect(),
            pos: 0,
            furthest: 0,
            expected: Vec::new(),
            depth: 0,
        }
    }

    /// First lexical error in the input, if any.
    pub fn lex_error(&self, source: &str) -> Option<ParseError> {
        self.tokens.iter().find_map(|t| match &t.kind {
            TokenKind::Error(msg) => Some(ParseError::at(source, t.span, msg.clone())),
            _ => None,
        })
    }

    /// Error describing the furthest failure.
    pub fn error(&self, source: &str) -> ParseError {
        let (span, found) = match self.tokens.get(self.furthest) {
            Some(t) => (t.span, t.kind.describe()),
            None => (Span::new(source.len(), source.len()), TokenKind::Eof.describe()),
        };
        ParseError::unexpected(source, span, self.expected.clone(), found)
    }

    // ── Token helpers ────────────────────────────────────────────

    pub(crate) fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Record that `what` would have been accepted at the cursor.
    pub(crate) fn expected(&mut self, what: impl Into<String>) {
        if self.pos > self.furthest {
            self.furthest = self.pos;
            self.expected.clear();
        }
        if self.pos == self.furthest {
            let what = what.into();
            if !self.expected.contains(&what) {
                self.expected.push(what);
            }
        }
    }

    pub(crate) fn at_word(&self, word: &str) -> bool {
        matches!(self.peek(), TokenKind::Ident(s) if s == word)
    }

    pub(crate) fn eat_word(&mut self, word: &str) -> bool {
        if self.at_word(word) {
            self.advance();
            true
        } else {
            self.expected(format!("'{word}'"));
            false
        }
    }

    pub(crate) fn expect_word(&mut self, word: &str) -> PResult<()> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(())
        }
    }

    /// All words in sequence, or nothing consumed.
    pub(crate) fn eat_words(&mut self, words: &[&str]) -> bool {
        self.attempt(|p| p.expect_words(words)).is_some()
    }

    pub(crate) fn expect_words(&mut self, words: &[&str]) -> PResult<()> {
        words.iter().try_for_each(|w| self.expect_word(w))
    }

    pub(crate) fn eat_one_of(&mut self, words: &[&'static str]) -> Option<&'static str> {
        let found = words.iter().copied().find(|w| self.at_word(w));
        match found {
            Some(_) => self.advance(),
            None => {
                for w in words {
                    self.expected(format!("'{w}'"));
                }
            }
        }
        found
    }

    pub(crate) fn expect_one_of(&mut self, words: &[&'static str]) -> PResult<&'static str> {
        self.eat_one_of(words).ok_or(())
    }

    pub(crate) fn eat_punct(&mut self, c: char) -> bool {
        if matches!(self.peek(), TokenKind::Punct(p) if *p == c) {
            self.advance();
            true
        } else {
            self.expected(format!("'{c}'"));
            false
        }
    }

    pub(crate) fn expect_punct(&mut self, c: char) -> PResult<()> {
        if self.eat_punct(c) {
            Ok(())
        } else {
            Err(())
        }
    }

    /// An identifier that converts through `convert`, described as `what`
    /// in errors.
    pub(crate) fn word_as<T>(&mut self, what: &str, convert: impl Fn(&str) -> Option<T>) -> PResult<T> {
        if let TokenKind::Ident(word) = self.peek() {
            if let Some(value) = convert(word) {
                self.advance();
                return Ok(value);
            }
        }
        self.expected(what);
        Err(())
    }

    pub(crate) fn ident(&mut self) -> PResult<String> {
        if let TokenKind::Ident(word) = self.peek() {
            let word = word.clone();
            self.advance();
            Ok(word)
        } else {
            self.expected("name");
            Err(())
        }
    }

    pub(crate) fn finish(&mut self) -> PResult<()> {
        if matches!(self.peek(), TokenKind::Eof) {
            Ok(())
        } else {
            self.expected("end of card");
            Err(())
        }
    }

    // ── Combinators ──────────────────────────────────────────────

    /// Run a production, rewinding the cursor if it fails.
    pub(crate) fn attempt<T>(&mut self, production: impl FnOnce(&mut Self) -> PResult<T>) -> Option<T> {
        let start = self.pos;
        let depth = self.depth;
        match production(self) {
            Ok(value) => Some(value),
            Err(()) => {
                self.pos = start;
                self.depth = depth;
                None
            }
        }
    }

    /// Zero or more repetitions. Stops on failure or on a repetition that
    /// consumed nothing.
    pub(crate) fn many<T>(&mut self, mut production: impl FnMut(&mut Self) -> PResult<T>) -> Vec<T> {
        let mut items = Vec::new();
        loop {
            let start = self.pos;
            match self.attempt(&mut production) {
                Some(item) if self.pos > start => items.push(item),
                Some(_) => {
                    self.pos = start;
                    break;
                }
                None => break,
            }
        }
        items
    }

    pub(crate) fn many1<T>(&mut self, mut production: impl FnMut(&mut Self) -> PResult<T>) -> PResult<Vec<T>> {
        let first = production(self)?;
        let mut items = vec![first];
        items.extend(self.many(production));
        Ok(items)
    }

    /// Guard recursion through nested matches.
    pub(crate) fn nested<T>(&mut self, production: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= MAX_MATCH_DEPTH {
            self.expected("shallower nesting");
            return Err(());
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    // ── Card ─────────────────────────────────────────────────────

    /// `Ident CostType* CardType+ ("-" SubType*)? (Ability ","?)* Stats? EOF`
    pub(crate) fn card(&mut self) -> PResult<Card> {
        let name = self.ident()?;
        let mut card = Card::new(name);
        card.costs.extend(self.many(Self::cost_type));
        card.types = self.many1(Self::card_type)?;
        if self.eat_punct('-') {
            card.subtypes = self.many(Self::sub_type);
        }
        while let Some(ability) = self.attempt(Self::ability) {
            card.abilities.push(ability);
            self.eat_punct(',');
        }
        card.stats = self.attempt(Self::stats);
        self.finish()?;
        Ok(card)
    }

    pub(crate) fn at_name(&mut self) -> bool {
        self.eat_word(NAME_PLACEHOLDER)
    }

    // ── Atoms ────────────────────────────────────────────────────

    /// `"{" (c|o|s|w | q | t | Quantity) "}"`
    pub(crate) fn cost_type(&mut self) -> PResult<CostType> {
        self.expect_punct('{')?;
        let cost = if let Some(e) = self.attempt(|p| p.word_as("essence", Essence::from_symbol)) {
            CostType::Essence(e)
        } else if self.eat_word("q") {
            CostType::Activate
        } else if self.eat_word("t") {
            CostType::Deactivate
        } else {
            CostType::Generic(self.quantity()?)
        };
        self.expect_punct('}')?;
        Ok(cost)
    }

    /// `Int | a | an | x`
    pub(crate) fn quantity(&mut self) -> PResult<Quantity> {
        match self.peek() {
            TokenKind::Int(n) => {
                let n = *n;
                self.advance();
                Ok(Quantity::Number(n))
            }
            TokenKind::Ident(w) if w == "a" || w == "an" => {
                self.advance();
                Ok(Quantity::A)
            }
            TokenKind::Ident(w) if w == "x" => {
                self.advance();
                Ok(Quantity::X)
            }
            _ => {
                self.expected("number");
                Err(())
            }
        }
    }

    pub(crate) fn stats(&mut self) -> PResult<Stats> {
        let power = self.quantity()?;
        self.expect_punct('/')?;
        let health = self.quantity()?;
        Ok(Stats::new(power, health))
    }

    pub(crate) fn card_type(&mut self) -> PResult<CardType> {
        self.word_as("card type", CardType::from_word)
    }

    pub(crate) fn sub_type(&mut self) -> PResult<SubType> {
        self.word_as("subtype", SubType::from_word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempt_rewinds() {
        let mut p = Parser::new("draw a card");
        let result = p.attempt(|p| {
            p.expect_word("draw")?;
            p.expect_word("two")
        });
        assert!(result.is_none());
        assert_eq!(p.pos, 0);
    }

    #[test]
    fn test_many_stops_on_failure() {
        let mut p = Parser::new("{s}{1}{t} unit");
        let costs = p.many(Parser::cost_type);
        assert_eq!(
            costs,
            vec![
                CostType::Essence(Essence::Sword),
                CostType::Generic(Quantity::Number(1)),
                CostType::Deactivate,
            ]
        );
        assert!(p.at_word("unit"));
    }

    #[test]
    fn test_furthest_error() {
        let src = "draw 2 cars";
        let mut p = Parser::new(src);
        let ok = p.attempt(|p| {
            p.expect_word("draw")?;
            p.quantity()?;
            p.expect_one_of(&["card", "cards"])
        });
        assert!(ok.is_none());
        let err = p.error(src);
        assert_eq!(err.found, "'cars'");
        assert_eq!(err.expected, vec!["'card'".to_string(), "'cards'".to_string()]);
        assert_eq!((err.line, err.column), (1, 8));
    }

    #[test]
    fn test_quantity_forms() {
        let mut p = Parser::new("3 a an x");
        assert_eq!(p.quantity(), Ok(Quantity::Number(3)));
        assert_eq!(p.quantity(), Ok(Quantity::A));
        assert_eq!(p.quantity(), Ok(Quantity::A));
        assert_eq!(p.quantity(), Ok(Quantity::X));
        assert_eq!(p.quantity(), Err(()));
    }
}
