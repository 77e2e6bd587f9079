//! Card templates - the immutable result of parsing card text.
//!
//! A `Card` holds what the printed card says: name, costs, types, subtypes,
//! abilities and base stats. Everything that changes during a game (zone,
//! damage, modifiers, activation) lives on `CardInstance`.
//!
//! Every type here renders back to card text through `Display`, and parsing
//! that text yields an equal value.
//!
//! ```
//! use ccg_rules::cards::{Card, CardKind, CardType, CostType, Essence, Quantity, Stats};
//!
//! let soldier = Card::new("Soldier")
//!     .with_cost(CostType::Essence(Essence::Sword))
//!     .with_type(CardType::new(CardKind::Unit))
//!     .with_stats(Stats::new(Quantity::Number(1), Quantity::Number(1)));
//!
//! assert_eq!(soldier.to_string(), "Soldier {s}\nunit\n1/1");
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::effects::{Ability, Activated, Triggered};

/// Token the parser substitutes for the card's own name.
pub const NAME_PLACEHOLDER: &str = "NAME";

/// A number printed on a card: a literal, "a"/"an" (one), or X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantity {
    Number(i64),
    A,
    X,
}

impl Quantity {
    /// Concrete value given the instance's X.
    #[must_use]
    pub const fn value(self, x: i64) -> i64 {
        match self {
            Quantity::Number(n) => n,
            Quantity::A => 1,
            Quantity::X => x,
        }
    }

    #[must_use]
    pub const fn is_x(self) -> bool {
        matches!(self, Quantity::X)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Number(n) => write!(f, "{n}"),
            Quantity::A => f.write_str("a"),
            Quantity::X => f.write_str("x"),
        }
    }
}

/// The four essence colors a cost or token can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Essence {
    Cup,
    Coin,
    Sword,
    Wand,
}

impl Essence {
    pub const ALL: [Essence; 4] = [Essence::Cup, Essence::Coin, Essence::Sword, Essence::Wand];

    /// Letter used inside cost braces.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Essence::Cup => 'c',
            Essence::Coin => 'o',
            Essence::Sword => 's',
            Essence::Wand => 'w',
        }
    }

    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "c" => Some(Essence::Cup),
            "o" => Some(Essence::Coin),
            "s" => Some(Essence::Sword),
            "w" => Some(Essence::Wand),
            _ => None,
        }
    }

    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Essence::Cup => "cup",
            Essence::Coin => "coin",
            Essence::Sword => "sword",
            Essence::Wand => "wand",
        }
    }
}

/// A color word as used by match prefixes. `Wild` means "no colored cost".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Cup,
    Coin,
    Sword,
    Wand,
    Wild,
}

impl Color {
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "cup" => Some(Color::Cup),
            "coin" => Some(Color::Coin),
            "sword" => Some(Color::Sword),
            "wand" => Some(Color::Wand),
            "wild" => Some(Color::Wild),
            _ => None,
        }
    }

    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Color::Cup => "cup",
            Color::Coin => "coin",
            Color::Sword => "sword",
            Color::Wand => "wand",
            Color::Wild => "wild",
        }
    }

    /// The essence this color stands for, `None` for wild.
    #[must_use]
    pub const fn essence(self) -> Option<Essence> {
        match self {
            Color::Cup => Some(Essence::Cup),
            Color::Coin => Some(Essence::Coin),
            Color::Sword => Some(Essence::Sword),
            Color::Wand => Some(Essence::Wand),
            Color::Wild => None,
        }
    }
}

/// One symbol of a cost or essence list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CostType {
    /// `{c}`, `{o}`, `{s}` or `{w}`.
    Essence(Essence),
    /// `{q}`: activate this card. Requires it to be deactivated.
    Activate,
    /// `{t}`: deactivate this card. Requires it to be activated.
    Deactivate,
    /// `{2}`, `{x}`: generic essence.
    Generic(Quantity),
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostType::Essence(e) => write!(f, "{{{}}}", e.symbol()),
            CostType::Activate => f.write_str("{q}"),
            CostType::Deactivate => f.write_str("{t}"),
            CostType::Generic(q) => write!(f, "{{{q}}}"),
        }
    }
}

/// Printed card kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Unit,
    Item,
    Source,
    Spell,
    Token,
}

impl CardKind {
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            CardKind::Unit => "unit",
            CardKind::Item => "item",
            CardKind::Source => "source",
            CardKind::Spell => "spell",
            CardKind::Token => "token",
        }
    }
}

/// A card type word as written, singular or plural.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardType {
    pub kind: CardKind,
    pub plural: bool,
}

impl CardType {
    #[must_use]
    pub const fn new(kind: CardKind) -> Self {
        Self { kind, plural: false }
    }

    #[must_use]
    pub const fn plural(kind: CardKind) -> Self {
        Self { kind, plural: true }
    }

    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        let (stem, plural) = match word.strip_suffix('s') {
            Some(stem) => (stem, true),
            None => (word, false),
        };
        let kind = match stem {
            "unit" => CardKind::Unit,
            "item" => CardKind::Item,
            "source" => CardKind::Source,
            "spell" => CardKind::Spell,
            "token" => CardKind::Token,
            _ => return None,
        };
        Some(Self { kind, plural })
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.word())?;
        if self.plural {
            f.write_str("s")?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubType {
    Human,
    Dwarf,
    Elf,
    Orc,
    Gnome,
    Undead,
    Demon,
    Dragon,
    Golem,
    Spirit,
    Soldier,
    Wizard,
    Warrior,
    Merchant,
    Cleric,
    Rogue,
    Beast,
}

impl SubType {
    pub const ALL: [SubType; 17] = [
        SubType::Human,
        SubType::Dwarf,
        SubType::Elf,
        SubType::Orc,
        SubType::Gnome,
        SubType::Undead,
        SubType::Demon,
        SubType::Dragon,
        SubType::Golem,
        SubType::Spirit,
        SubType::Soldier,
        SubType::Wizard,
        SubType::Warrior,
        SubType::Merchant,
        SubType::Cleric,
        SubType::Rogue,
        SubType::Beast,
    ];

    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            SubType::Human => "human",
            SubType::Dwarf => "dwarf",
            SubType::Elf => "elf",
            SubType::Orc => "orc",
            SubType::Gnome => "gnome",
            SubType::Undead => "undead",
            SubType::Demon => "demon",
            SubType::Dragon => "dragon",
            SubType::Golem => "golem",
            SubType::Spirit => "spirit",
            SubType::Soldier => "soldier",
            SubType::Wizard => "wizard",
            SubType::Warrior => "warrior",
            SubType::Merchant => "merchant",
            SubType::Cleric => "cleric",
            SubType::Rogue => "rogue",
            SubType::Beast => "beast",
        }
    }

    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        SubType::ALL.into_iter().find(|s| s.word() == word)
    }
}

impl fmt::Display for SubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    Fly,
    Siege,
    Poison,
    /// May be cast whenever its owner holds priority.
    Ambush,
}

impl Keyword {
    #[must_use]
    pub const fn word(self) -> &'static str {
        match self {
            Keyword::Fly => "fly",
            Keyword::Siege => "siege",
            Keyword::Poison => "poison",
            Keyword::Ambush => "ambush",
        }
    }

    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "fly" => Some(Keyword::Fly),
            "siege" => Some(Keyword::Siege),
            "poison" => Some(Keyword::Poison),
            "ambush" => Some(Keyword::Ambush),
            _ => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.word())
    }
}

/// Printed power and health.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stats {
    pub power: Quantity,
    pub health: Quantity,
}

impl Stats {
    #[must_use]
    pub const fn new(power: Quantity, health: Quantity) -> Self {
        Self { power, health }
    }
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.power, self.health)
    }
}

/// An immutable card template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub costs: SmallVec<[CostType; 4]>,
    pub types: Vec<CardType>,
    pub subtypes: Vec<SubType>,
    pub abilities: Vec<Ability>,
    pub stats: Option<Stats>,
}

impl Card {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            costs: SmallVec::new(),
            types: Vec::new(),
            subtypes: Vec::new(),
            abilities: Vec::new(),
            stats: None,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: CostType) -> Self {
        self.costs.push(cost);
        self
    }

    #[must_use]
    pub fn with_type(mut self, card_type: CardType) -> Self {
        self.types.push(card_type);
        self
    }

    #[must_use]
    pub fn with_subtype(mut self, subtype: SubType) -> Self {
        self.subtypes.push(subtype);
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = Some(stats);
        self
    }

    #[must_use]
    pub fn has_kind(&self, kind: CardKind) -> bool {
        self.types.iter().any(|t| t.kind == kind)
    }

    #[must_use]
    pub fn has_subtype(&self, subtype: SubType) -> bool {
        self.subtypes.contains(&subtype)
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.abilities
            .iter()
            .any(|a| matches!(a, Ability::Keyword(k) if *k == keyword))
    }

    /// Colored essence symbols in the cost, in printed order and deduplicated.
    #[must_use]
    pub fn colors(&self) -> Vec<Essence> {
        let mut colors = Vec::new();
        for cost in &self.costs {
            if let CostType::Essence(e) = cost {
                if !colors.contains(e) {
                    colors.push(*e);
                }
            }
        }
        colors
    }

    #[must_use]
    pub fn has_color(&self, color: Color) -> bool {
        match color.essence() {
            Some(essence) => self.costs.contains(&CostType::Essence(essence)),
            None => self.colors().is_empty(),
        }
    }

    /// Spells resolve and go to the pile instead of entering the board.
    #[must_use]
    pub fn is_spell(&self) -> bool {
        self.has_kind(CardKind::Spell)
    }

    pub fn activated(&self) -> impl Iterator<Item = &Activated> {
        self.abilities.iter().filter_map(|a| match a {
            Ability::Activated(act) => Some(act),
            _ => None,
        })
    }

    pub fn triggered(&self) -> impl Iterator<Item = &Triggered> {
        self.abilities.iter().filter_map(|a| match a {
            Ability::Triggered(t) => Some(t),
            _ => None,
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.costs.is_empty() {
            f.write_str(" ")?;
            for cost in &self.costs {
                write!(f, "{cost}")?;
            }
        }
        f.write_str("\n")?;
        write_joined(f, &self.types, " ")?;
        if !self.subtypes.is_empty() {
            f.write_str(" - ")?;
            write_joined(f, &self.subtypes, " ")?;
        }
        for ability in &self.abilities {
            let text = ability.to_string().replace(NAME_PLACEHOLDER, &self.name);
            write!(f, "\n{text}")?;
        }
        if let Some(stats) = &self.stats {
            write!(f, "\n{stats}")?;
        }
        Ok(())
    }
}

/// Write `items` separated by `sep`.
pub(crate) fn write_joined<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    sep: &str,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Write a list as `a`, `a and b`, or `a, b and c`.
pub(crate) fn write_list<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    conjunction: &str,
) -> fmt::Result {
    let last = items.len().saturating_sub(1);
    for (i, item) in items.iter().enumerate() {
        if i > 0 && i == last {
            write!(f, " {conjunction} ")?;
        } else if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
