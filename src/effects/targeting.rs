//! Match expressions: which players and cards a clause refers to.
//!
//! - `CardMatch`: disjunction of `CardTypeMatch` alternatives
//! - `PlayerMatch`: disjunction of `PlayerTypeMatch` alternatives
//! - `AnyMatch`: player, card or "any target"
//! - `ZoneMatch`: zones a clause searches
//!
//! Only the grammar shape lives here. Evaluation against a game is in
//! `crate::query`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cards::definition::{write_list, NAME_PLACEHOLDER};
use crate::cards::{CardType, Color, Keyword, Quantity, Stats};
use crate::zones::Zone;

/// Designator that ties a card filter to the ability instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Selector {
    /// "the sacrificed": cards sacrificed while paying this ability.
    Sacrificed,
    /// "target": chosen by the controller when the ability is played.
    Target,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Prefix {
    Color(Color),
    NonColor(Color),
    Type(CardType),
    NonType(CardType),
    Activated,
    Deactivated,
    /// Exact printed stats.
    Stats(Stats),
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prefix::Color(c) => f.write_str(c.word()),
            Prefix::NonColor(c) => write!(f, "non-{}", c.word()),
            Prefix::Type(t) => write!(f, "{t}"),
            Prefix::NonType(t) => write!(f, "non-{t}"),
            Prefix::Activated => f.write_str("activated"),
            Prefix::Deactivated => f.write_str("deactivated"),
            Prefix::Stats(s) => write!(f, "{s}"),
        }
    }
}

/// Stat read by numeric comparisons. "damage" reads power.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Numerical {
    Damage,
    Health,
}

impl fmt::Display for Numerical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Numerical::Damage => "damage",
            Numerical::Health => "health",
        })
    }
}

/// Right-hand side of a comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Count {
    /// "the number of" cards matching.
    NumberOf(CardMatch),
    /// "X's damage", "X's health".
    Attribute { owner: CardMatch, numerical: Numerical },
    Value(Quantity),
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Count::NumberOf(m) => write!(f, "the number of {m}"),
            Count::Attribute { owner, numerical } => write!(f, "{owner}'s {numerical}"),
            Count::Value(q) => write!(f, "{q}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Greater,
    Less,
}

impl Direction {
    fn word(self) -> &'static str {
        match self {
            Direction::Greater => "greater",
            Direction::Less => "less",
        }
    }
}

/// `(greater than | less than)? Count (or greater | or less)?`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compare {
    pub prefix: Option<Direction>,
    pub count: Count,
    pub suffix: Option<Direction>,
}

impl Compare {
    /// Compare `value` against an already evaluated count.
    #[must_use]
    pub fn holds(&self, value: i64, count: i64) -> bool {
        let inclusive = self.prefix.is_none() || self.suffix.is_some();
        match self.prefix.or(self.suffix) {
            None => value == count,
            Some(Direction::Greater) if inclusive => value >= count,
            Some(Direction::Greater) => value > count,
            Some(Direction::Less) if inclusive => value <= count,
            Some(Direction::Less) => value < count,
        }
    }
}

impl fmt::Display for Compare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(d) = self.prefix {
            write!(f, "{} than ", d.word())?;
        }
        write!(f, "{}", self.count)?;
        if let Some(d) = self.suffix {
            write!(f, " or {}", d.word())?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum With {
    /// Every listed keyword is present.
    Keywords(Vec<Keyword>),
    Compare { numerical: Numerical, compare: Compare },
}

impl fmt::Display for With {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("with ")?;
        match self {
            With::Keywords(keywords) => write_list(f, keywords, "and"),
            With::Compare { numerical, compare } => write!(f, "{numerical} {compare}"),
        }
    }
}

/// The general card filter: designator, prefixes and qualifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFilter {
    pub selector: Option<Selector>,
    pub prefixes: Vec<Prefix>,
    pub without: Option<Keyword>,
    pub with: Option<With>,
    /// "that targets X" clauses.
    pub targets: Vec<CardMatch>,
}

impl CardFilter {
    #[must_use]
    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = Some(selector);
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.prefixes.push(prefix);
        self
    }
}

impl fmt::Display for CardFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<String> = Vec::new();
        match self.selector {
            Some(Selector::Sacrificed) => words.push("the sacrificed".into()),
            Some(Selector::Target) => words.push("target".into()),
            None => {}
        }
        words.extend(self.prefixes.iter().map(ToString::to_string));
        if !self.prefixes.iter().any(|p| matches!(p, Prefix::Type(_))) {
            words.push("card".into());
        }
        if let Some(k) = self.without {
            words.push(format!("without {k}"));
        }
        if let Some(w) = &self.with {
            words.push(w.to_string());
        }
        for m in &self.targets {
            words.push(format!("that targets {m}"));
        }
        f.write_str(&words.join(" "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardTypeMatch {
    /// The card's own name: the ability's source.
    Named,
    /// "this" / "it": the cards bound by a trigger.
    This,
    Filter(CardFilter),
}

impl CardTypeMatch {
    #[must_use]
    pub fn has_target(&self) -> bool {
        matches!(self, CardTypeMatch::Filter(f) if f.selector == Some(Selector::Target))
    }
}

impl fmt::Display for CardTypeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardTypeMatch::Named => f.write_str(NAME_PLACEHOLDER),
            CardTypeMatch::This => f.write_str("this"),
            CardTypeMatch::Filter(filter) => write!(f, "{filter}"),
        }
    }
}

/// Any of the alternatives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardMatch(pub Vec<CardTypeMatch>);

impl CardMatch {
    #[must_use]
    pub fn one(alternative: CardTypeMatch) -> Self {
        Self(vec![alternative])
    }

    /// The source card itself.
    #[must_use]
    pub fn named() -> Self {
        Self::one(CardTypeMatch::Named)
    }

    /// Any card at all.
    #[must_use]
    pub fn any() -> Self {
        Self::one(CardTypeMatch::Filter(CardFilter::default()))
    }

    #[must_use]
    pub fn filter(filter: CardFilter) -> Self {
        Self::one(CardTypeMatch::Filter(filter))
    }

    #[must_use]
    pub fn has_target(&self) -> bool {
        self.0.iter().any(CardTypeMatch::has_target)
    }

    /// 1 when the match asks for a chosen target, -1 for "everything that qualifies".
    #[must_use]
    pub fn target_count(&self) -> i32 {
        if self.has_target() {
            1
        } else {
            -1
        }
    }
}

impl fmt::Display for CardMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.0, "or")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerTypeMatch {
    Each,
    You,
    Opponent,
    /// Controller of a card bound by a trigger.
    Controller,
}

impl fmt::Display for PlayerTypeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlayerTypeMatch::Each => "each player",
            PlayerTypeMatch::You => "you",
            PlayerTypeMatch::Opponent => "your opponent",
            PlayerTypeMatch::Controller => "its controller",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMatch(pub Vec<PlayerTypeMatch>);

impl PlayerMatch {
    #[must_use]
    pub fn one(alternative: PlayerTypeMatch) -> Self {
        Self(vec![alternative])
    }

    /// The ability's controller.
    #[must_use]
    pub fn you() -> Self {
        Self::one(PlayerTypeMatch::You)
    }

    /// Players are never chosen as targets through a player match.
    #[must_use]
    pub fn has_target(&self) -> bool {
        false
    }

    #[must_use]
    pub fn target_count(&self) -> i32 {
        -1
    }
}

impl fmt::Display for PlayerMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_list(f, &self.0, "or")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnyMatch {
    Player(PlayerMatch),
    Card(CardMatch),
    /// "any target": one chosen player or card.
    AnyTarget,
}

impl AnyMatch {
    #[must_use]
    pub fn has_target(&self) -> bool {
        match self {
            AnyMatch::Player(m) => m.has_target(),
            AnyMatch::Card(m) => m.has_target(),
            AnyMatch::AnyTarget => true,
        }
    }

    #[must_use]
    pub fn target_count(&self) -> i32 {
        if self.has_target() {
            1
        } else {
            -1
        }
    }
}

impl fmt::Display for AnyMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyMatch::Player(m) => write!(f, "{m}"),
            AnyMatch::Card(m) => write!(f, "{m}"),
            AnyMatch::AnyTarget => f.write_str("any target"),
        }
    }
}

/// Zones searched by a clause.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMatch(pub Vec<Zone>);

impl ZoneMatch {
    #[must_use]
    pub fn one(zone: Zone) -> Self {
        Self(vec![zone])
    }

    #[must_use]
    pub fn contains(&self, zone: Zone) -> bool {
        self.0.contains(&zone)
    }

    /// The zone a card is moved into. Falls back to the pile for an empty match.
    #[must_use]
    pub fn first(&self) -> Zone {
        self.0.first().copied().unwrap_or(Zone::Pile)
    }
}

impl fmt::Display for ZoneMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self.0.iter().map(|z| z.name()).collect();
        f.write_str(&words.join(" "))
    }
}

/// Any of the three match families, as carried by effect instances.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Match {
    Player(PlayerMatch),
    Card(CardMatch),
    Any(AnyMatch),
}

impl Match {
    #[must_use]
    pub fn has_target(&self) -> bool {
        match self {
            Match::Player(m) => m.has_target(),
            Match::Card(m) => m.has_target(),
            Match::Any(m) => m.has_target(),
        }
    }

    #[must_use]
    pub fn target_count(&self) -> i32 {
        match self {
            Match::Player(m) => m.target_count(),
            Match::Card(m) => m.target_count(),
            Match::Any(m) => m.target_count(),
        }
    }
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Match::Player(m) => write!(f, "{m}"),
            Match::Card(m) => write!(f, "{m}"),
            Match::Any(m) => write!(f, "{m}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardKind;

    fn target_unit() -> CardMatch {
        CardMatch::filter(
            CardFilter::default()
                .with_selector(Selector::Target)
                .with_prefix(Prefix::Type(CardType::new(CardKind::Unit))),
        )
    }

    #[test]
    fn test_target_count() {
        assert_eq!(target_unit().target_count(), 1);
        assert_eq!(CardMatch::any().target_count(), -1);
        assert_eq!(PlayerMatch::you().target_count(), -1);
        assert_eq!(AnyMatch::AnyTarget.target_count(), 1);
        assert_eq!(AnyMatch::Card(target_unit()).target_count(), 1);
    }

    #[test]
    fn test_disjunction_targets_if_any_alternative_does() {
        let m = CardMatch(vec![CardTypeMatch::Named, target_unit().0.remove(0)]);
        assert!(m.has_target());
    }

    #[test]
    fn test_display() {
        assert_eq!(target_unit().to_string(), "target unit");
        assert_eq!(CardMatch::any().to_string(), "card");
        let m = CardMatch::filter(
            CardFilter::default()
                .with_prefix(Prefix::NonColor(Color::Cup))
                .with_prefix(Prefix::Type(CardType::plural(CardKind::Unit))),
        );
        assert_eq!(m.to_string(), "non-cup units");
        let both = PlayerMatch(vec![PlayerTypeMatch::You, PlayerTypeMatch::Opponent]);
        assert_eq!(both.to_string(), "you or your opponent");
    }

    #[test]
    fn test_compare() {
        let cmp = |prefix, suffix| Compare {
            prefix,
            count: Count::Value(Quantity::Number(3)),
            suffix,
        };
        assert!(cmp(None, None).holds(3, 3));
        assert!(!cmp(None, None).holds(4, 3));
        assert!(cmp(None, Some(Direction::Greater)).holds(3, 3));
        assert!(cmp(Some(Direction::Greater), None).holds(4, 3));
        assert!(!cmp(Some(Direction::Greater), None).holds(3, 3));
        assert!(cmp(Some(Direction::Less), None).holds(2, 3));
        assert!(cmp(None, Some(Direction::Less)).holds(3, 3));
        assert_eq!(cmp(Some(Direction::Greater), None).to_string(), "greater than 3");
    }
}
