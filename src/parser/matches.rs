//! Match, count and trigger productions.

use super::parser::{PResult, Parser};
use crate::cards::Color;
use crate::effects::targeting::{
    AnyMatch, CardFilter, CardMatch, CardTypeMatch, Compare, Count, Direction, Numerical,
    PlayerMatch, PlayerTypeMatch, Prefix, Selector, With, ZoneMatch,
};
use crate::triggers::{CardAction, Condition, PlayerAction, Trigger};
use crate::zones::Zone;

impl Parser {
    // ── Card matches ─────────────────────────────────────────────

    /// `CardTypeMatch (("," CardTypeMatch)* ("and" | "or") CardTypeMatch)?`
    pub(crate) fn card_match(&mut self) -> PResult<CardMatch> {
        self.nested(|p| {
            let mut alternatives = vec![p.card_type_match()?];
            let tail = p.attempt(|p| {
                let mut rest = p.many(|p| {
                    p.expect_punct(',')?;
                    p.card_type_match()
                });
                p.expect_one_of(&["and", "or"])?;
                rest.push(p.card_type_match()?);
                Ok(rest)
            });
            alternatives.extend(tail.unwrap_or_default());
            Ok(CardMatch(alternatives))
        })
    }

    fn card_type_match(&mut self) -> PResult<CardTypeMatch> {
        if self.at_name() {
            return Ok(CardTypeMatch::Named);
        }
        if self.eat_one_of(&["this", "it"]).is_some() {
            return Ok(CardTypeMatch::This);
        }
        self.card_filter().map(CardTypeMatch::Filter)
    }

    /// `("a" | "an")? Selector? Prefix* ("card" | "cards")? Without? With? ("that targets" CardMatch)*`
    ///
    /// Must consume something past the article.
    fn card_filter(&mut self) -> PResult<CardFilter> {
        self.eat_one_of(&["a", "an"]);
        let start = self.pos;
        let selector = if self.eat_words(&["the", "sacrificed"]) {
            Some(Selector::Sacrificed)
        } else if self.eat_word("target") {
            Some(Selector::Target)
        } else {
            None
        };
        let prefixes = self.many(Self::prefix);
        self.eat_one_of(&["card", "cards"]);
        let without = self.attempt(|p| {
            p.expect_word("without")?;
            p.keyword()
        });
        let with = self.attempt(Self::with_clause);
        let targets = self.many(|p| {
            p.expect_words(&["that", "targets"])?;
            p.card_match()
        });
        if self.pos == start {
            self.expected("card description");
            return Err(());
        }
        Ok(CardFilter {
            selector,
            prefixes,
            without,
            with,
            targets,
        })
    }

    fn prefix(&mut self) -> PResult<Prefix> {
        if let Some(c) = self.attempt(Self::color) {
            return Ok(Prefix::Color(c));
        }
        if let Some(c) = self.attempt(|p| {
            p.non()?;
            p.color()
        }) {
            return Ok(Prefix::NonColor(c));
        }
        if let Some(t) = self.attempt(Self::card_type) {
            return Ok(Prefix::Type(t));
        }
        if let Some(t) = self.attempt(|p| {
            p.non()?;
            p.card_type()
        }) {
            return Ok(Prefix::NonType(t));
        }
        if self.eat_word("activated") {
            return Ok(Prefix::Activated);
        }
        if self.eat_word("deactivated") {
            return Ok(Prefix::Deactivated);
        }
        self.stats().map(Prefix::Stats)
    }

    fn non(&mut self) -> PResult<()> {
        self.expect_word("non")?;
        self.expect_punct('-')
    }

    fn color(&mut self) -> PResult<Color> {
        self.word_as("color", Color::from_word)
    }

    /// `"with" (Keyword list | Numerical Compare)`
    fn with_clause(&mut self) -> PResult<With> {
        self.expect_word("with")?;
        if let Some(keywords) = self.attempt(|p| {
            let mut keywords = vec![p.keyword()?];
            let tail = p.attempt(|p| {
                let mut rest = p.many(|p| {
                    p.expect_punct(',')?;
                    p.keyword()
                });
                p.expect_word("and")?;
                rest.push(p.keyword()?);
                Ok(rest)
            });
            keywords.extend(tail.unwrap_or_default());
            Ok(keywords)
        }) {
            return Ok(With::Keywords(keywords));
        }
        let numerical = self.numerical()?;
        let compare = self.compare()?;
        Ok(With::Compare { numerical, compare })
    }

    pub(crate) fn numerical(&mut self) -> PResult<Numerical> {
        self.word_as("damage or health", |w| match w {
            "damage" => Some(Numerical::Damage),
            "health" => Some(Numerical::Health),
            _ => None,
        })
    }

    // ── Comparisons ──────────────────────────────────────────────

    /// `(Direction ("then" | "than"))? Count ("or" Direction)?`
    pub(crate) fn compare(&mut self) -> PResult<Compare> {
        let prefix = self.attempt(|p| {
            let d = p.direction()?;
            p.expect_one_of(&["then", "than"])?;
            Ok(d)
        });
        let count = self.count()?;
        let suffix = self.attempt(|p| {
            p.expect_word("or")?;
            p.direction()
        });
        Ok(Compare { prefix, count, suffix })
    }

    fn direction(&mut self) -> PResult<Direction> {
        self.word_as("greater or less", |w| match w {
            "greater" => Some(Direction::Greater),
            "less" => Some(Direction::Less),
            _ => None,
        })
    }

    fn count(&mut self) -> PResult<Count> {
        if let Some(m) = self.attempt(|p| {
            p.expect_words(&["the", "number", "of"])?;
            p.card_match()
        }) {
            return Ok(Count::NumberOf(m));
        }
        if let Some((owner, numerical)) = self.attempt(|p| {
            let owner = p.card_match()?;
            p.possessive()?;
            Ok((owner, p.numerical()?))
        }) {
            return Ok(Count::Attribute { owner, numerical });
        }
        self.quantity().map(Count::Value)
    }

    /// `"'" "s"`
    fn possessive(&mut self) -> PResult<()> {
        self.expect_punct('\'')?;
        self.expect_word("s")
    }

    // ── Players, any, zones ──────────────────────────────────────

    /// `PlayerTypeMatch (("," PlayerTypeMatch)* ("and" | "or") PlayerTypeMatch)?`
    pub(crate) fn player_match(&mut self) -> PResult<PlayerMatch> {
        let mut alternatives = vec![self.player_type_match()?];
        let tail = self.attempt(|p| {
            let mut rest = p.many(|p| {
                p.expect_punct(',')?;
                p.player_type_match()
            });
            p.expect_one_of(&["and", "or"])?;
            rest.push(p.player_type_match()?);
            Ok(rest)
        });
        alternatives.extend(tail.unwrap_or_default());
        Ok(PlayerMatch(alternatives))
    }

    fn player_type_match(&mut self) -> PResult<PlayerTypeMatch> {
        if self.eat_words(&["each", "player"]) {
            Ok(PlayerTypeMatch::Each)
        } else if self.eat_word("you") {
            Ok(PlayerTypeMatch::You)
        } else if self.eat_words(&["your", "opponent"]) {
            Ok(PlayerTypeMatch::Opponent)
        } else if self.eat_words(&["its", "controller"]) {
            Ok(PlayerTypeMatch::Controller)
        } else {
            Err(())
        }
    }

    /// `PlayerMatch | CardMatch | "any target"`
    pub(crate) fn any_match(&mut self) -> PResult<AnyMatch> {
        if let Some(m) = self.attempt(Self::player_match) {
            return Ok(AnyMatch::Player(m));
        }
        if let Some(m) = self.attempt(Self::card_match) {
            return Ok(AnyMatch::Card(m));
        }
        self.expect_words(&["any", "target"])?;
        Ok(AnyMatch::AnyTarget)
    }

    /// `(("your" | "the")? Zone)+`
    pub(crate) fn zone_match(&mut self) -> PResult<ZoneMatch> {
        self.many1(|p| {
            p.eat_one_of(&["your", "the"]);
            p.word_as("zone", Zone::from_word)
        })
        .map(ZoneMatch)
    }

    // ── Triggers ─────────────────────────────────────────────────

    /// `("when" | "whenever") (Play | GainLife | LoseLife | DealtDamage | Condition)`
    pub(crate) fn trigger(&mut self) -> PResult<Trigger> {
        self.expect_one_of(&["when", "whenever"])?;
        if let Some(m) = self.attempt(|p| {
            p.expect_words(&["you", "play"])?;
            p.card_match()
        }) {
            return Ok(Trigger::Play(m));
        }
        if let Some(m) = self.attempt(|p| {
            let m = p.player_match()?;
            p.expect_one_of(&["gain", "gains"])?;
            p.expect_word("life")?;
            Ok(m)
        }) {
            return Ok(Trigger::GainLife(m));
        }
        if let Some(m) = self.attempt(|p| {
            let m = p.player_match()?;
            p.expect_one_of(&["lost", "loses", "lose"])?;
            p.expect_word("life")?;
            Ok(m)
        }) {
            return Ok(Trigger::LoseLife(m));
        }
        if let Some(m) = self.attempt(|p| {
            let m = p.card_match()?;
            p.expect_words(&["is", "dealt", "damage"])?;
            Ok(m)
        }) {
            return Ok(Trigger::DealtDamage(m));
        }
        self.condition().map(Trigger::Condition)
    }

    fn condition(&mut self) -> PResult<Condition> {
        if self.eat_its_turn(false) {
            return Ok(Condition::YourTurn);
        }
        if self.eat_its_turn(true) {
            return Ok(Condition::NotYourTurn);
        }
        if let Some((who, action)) = self.attempt(|p| {
            let who = p.player_match()?;
            let action = if p.eat_one_of(&["sacrifice", "sacrifices"]).is_some() {
                PlayerAction::Sacrifice(p.card_match()?)
            } else {
                p.expect_one_of(&["draw", "draws"])?;
                p.expect_words(&["a", "card"])?;
                PlayerAction::Draw
            };
            Ok((who, action))
        }) {
            return Ok(Condition::Player { who, action });
        }
        if let Some((which, action)) = self.attempt(|p| {
            let which = p.card_match()?;
            let action = if p.eat_one_of(&["is", "are"]).is_some() {
                p.expect_words(&["put", "on", "the", "board"])?;
                CardAction::EntersBoard
            } else {
                p.expect_one_of(&["leave", "leaves"])?;
                p.expect_words(&["the", "board"])?;
                CardAction::LeavesBoard
            };
            Ok((which, action))
        }) {
            return Ok(Condition::Card { which, action });
        }
        let numerical = self.numerical()?;
        self.expect_word("is")?;
        let compare = self.compare()?;
        Ok(Condition::Numerical { numerical, compare })
    }

    /// "it's your turn" or "it's not your turn".
    fn eat_its_turn(&mut self, negated: bool) -> bool {
        self.attempt(|p| {
            p.expect_word("it")?;
            p.possessive()?;
            if negated {
                p.expect_word("not")?;
            }
            p.expect_words(&["your", "turn"])
        })
        .is_some()
    }
}
