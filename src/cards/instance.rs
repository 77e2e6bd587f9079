//! Card instances: runtime card state.
//!
//! `CardInstance` is a specific copy of a card in a game. It tracks the
//! mutable state the template does not: zone, board slot, activation,
//! damage and stat modifiers.
//!
//! ## Flipped cards
//!
//! A card played as a source is *flipped*: it counts only as a source,
//! loses its printed keywords, triggers and activated abilities, and gains
//! one essence ability per color in its cost.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::definition::{Card, CardKind, Keyword};
use super::registry::BuiltinAbilities;
use crate::core::{CardId, PlayerId};
use crate::effects::{Activated, Triggered};
use crate::zones::Zone;

/// A `gets +P/+H` bonus. Lasts until the card leaves the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifier {
    pub power: i64,
    pub health: i64,
}

impl Modifier {
    #[must_use]
    pub const fn new(power: i64, health: i64) -> Self {
        Self { power, health }
    }
}

/// A card in a game.
#[derive(Clone, Debug)]
pub struct CardInstance {
    pub id: CardId,

    /// Shared template.
    pub card: Arc<Card>,

    /// Player whose deck the card started in.
    pub owner: PlayerId,

    /// Player who currently controls it.
    pub controller: PlayerId,

    pub zone: Zone,

    /// Board slot while on the board.
    pub slot: Option<usize>,

    /// Ready to use `{t}` abilities.
    pub activated: bool,

    /// Played as a source.
    pub flipped: bool,

    pub damage: i64,

    pub modifiers: Vec<Modifier>,
}

impl CardInstance {
    #[must_use]
    pub fn new(id: CardId, card: Arc<Card>, owner: PlayerId, zone: Zone) -> Self {
        Self {
            id,
            card,
            owner,
            controller: owner,
            zone,
            slot: None,
            activated: false,
            flipped: false,
            damage: 0,
            modifiers: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.card.name
    }

    /// Base power plus modifiers. `X` stats count as 0.
    #[must_use]
    pub fn power(&self) -> i64 {
        let base = self.card.stats.map_or(0, |s| s.power.value(0));
        self.modifiers.iter().fold(base, |total, m| total.saturating_add(m.power))
    }

    /// Base health plus modifiers, minus damage.
    #[must_use]
    pub fn health(&self) -> i64 {
        let base = self.card.stats.map_or(0, |s| s.health.value(0));
        self.modifiers
            .iter()
            .fold(base, |total, m| total.saturating_add(m.health))
            .saturating_sub(self.damage)
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.card.stats.is_some() && self.health() <= 0
    }

    #[must_use]
    pub fn has_kind(&self, kind: CardKind) -> bool {
        if self.flipped {
            kind == CardKind::Source
        } else {
            self.card.has_kind(kind)
        }
    }

    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.has_kind(CardKind::Unit)
    }

    /// Occupies a board slot once cast.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        !self.card.is_spell()
    }

    #[must_use]
    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        !self.flipped && self.card.has_keyword(keyword)
    }

    pub fn triggered(&self) -> impl Iterator<Item = &Triggered> {
        let printed = (!self.flipped).then(|| self.card.triggered());
        printed.into_iter().flatten()
    }

    /// Every ability usable from the board: printed ones, the attack of
    /// units and the essence abilities of sources.
    #[must_use]
    pub fn activated_abilities<'a>(&'a self, builtins: &'a BuiltinAbilities) -> Vec<&'a Activated> {
        let mut abilities: Vec<&Activated> = Vec::new();
        if !self.flipped {
            abilities.extend(self.card.activated());
        }
        if self.is_unit() {
            abilities.push(builtins.attack());
        }
        if self.has_kind(CardKind::Source) {
            abilities.extend(self.card.colors().into_iter().map(|c| builtins.essence(c)));
        }
        abilities
    }

    /// Reset state tied to the board.
    pub fn leave_board(&mut self) {
        self.slot = None;
        self.damage = 0;
        self.modifiers.clear();
        self.flipped = false;
        self.activated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardType, CostType, Essence, Quantity, Stats};
    use crate::effects::{Ability, Composed};

    fn unit() -> Arc<Card> {
        Arc::new(
            Card::new("Knight")
                .with_cost(CostType::Essence(Essence::Sword))
                .with_type(CardType::new(CardKind::Unit))
                .with_ability(Ability::Keyword(Keyword::Fly))
                .with_stats(Stats::new(Quantity::Number(2), Quantity::Number(3))),
        )
    }

    #[test]
    fn test_stats_with_modifiers_and_damage() {
        let mut instance = CardInstance::new(CardId(0), unit(), PlayerId(0), Zone::Board);
        assert_eq!(instance.power(), 2);
        assert_eq!(instance.health(), 3);

        instance.modifiers.push(Modifier::new(1, 1));
        instance.damage = 2;
        assert_eq!(instance.power(), 3);
        assert_eq!(instance.health(), 2);
        assert!(!instance.is_dead());

        instance.damage = 4;
        assert!(instance.is_dead());
    }

    #[test]
    fn test_stats_saturate() {
        let mut instance = CardInstance::new(CardId(0), unit(), PlayerId(0), Zone::Board);
        instance.modifiers.push(Modifier::new(i64::MAX, i64::MAX));
        instance.modifiers.push(Modifier::new(i64::MAX, 1));
        assert_eq!(instance.power(), i64::MAX);
        assert_eq!(instance.health(), i64::MAX);

        instance.modifiers.clear();
        instance.damage = i64::MAX;
        assert_eq!(instance.health(), 3 - i64::MAX);
        assert!(instance.is_dead());
    }

    #[test]
    fn test_leave_board_clears_state() {
        let mut instance = CardInstance::new(CardId(0), unit(), PlayerId(0), Zone::Board);
        instance.slot = Some(2);
        instance.damage = 1;
        instance.modifiers.push(Modifier::new(1, 0));
        instance.leave_board();
        assert_eq!(instance.slot, None);
        assert_eq!(instance.damage, 0);
        assert!(instance.modifiers.is_empty());
    }

    #[test]
    fn test_flipped_card_is_only_a_source() {
        let builtins = BuiltinAbilities::new();
        let mut instance = CardInstance::new(CardId(0), unit(), PlayerId(0), Zone::Board);
        assert!(instance.has_keyword(Keyword::Fly));
        assert_eq!(instance.activated_abilities(&builtins).len(), 1);

        instance.flipped = true;
        assert!(!instance.is_unit());
        assert!(instance.has_kind(CardKind::Source));
        assert!(!instance.has_keyword(Keyword::Fly));
        let abilities = instance.activated_abilities(&builtins);
        assert_eq!(abilities.len(), 1);
        assert_eq!(abilities[0].to_string(), "{t}: add {s}.");
    }

    #[test]
    fn test_x_stats_count_as_zero() {
        let card = Card::new("Blob")
            .with_type(CardType::new(CardKind::Unit))
            .with_ability(Ability::Composed(Composed::new(Vec::new())))
            .with_stats(Stats::new(Quantity::X, Quantity::X));
        let instance = CardInstance::new(CardId(1), Arc::new(card), PlayerId(1), Zone::Hand);
        assert_eq!(instance.power(), 0);
        assert_eq!(instance.health(), 0);
    }
}
