//! Card registry and built-in abilities.
//!
//! The `CardRegistry` holds every compiled card template of a format. It is
//! built once from card text (or from templates), then shared read-only by
//! games. Templates can be snapshotted with bincode so a front end does
//! not need to re-parse text on every start.

use log::warn;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use thiserror::Error;

use super::definition::{Card, CostType, Essence};
use crate::effects::{
    AbilityCost, Activated, CardEffect, CardSubject, Composed, Effect, PlayerEffect, PlayerSubject,
};
use crate::parser::{self, ParseError};

/// Abilities every card of a kind has without printing them.
///
/// - Units: `{t}: attack.`
/// - Sources and flipped cards: `{t}: add {e}.` per color in their cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltinAbilities {
    attack: Activated,
    essence: [Activated; 4],
}

impl BuiltinAbilities {
    #[must_use]
    pub fn new() -> Self {
        let tap = || vec![AbilityCost::Cost(CostType::Deactivate)];
        let attack = Activated::new(
            tap(),
            Composed::new(vec![Effect::Card(CardSubject {
                subject: None,
                effects: vec![CardEffect::Attack],
            })]),
        );
        let essence = Essence::ALL.map(|e| {
            Activated::new(
                tap(),
                Composed::new(vec![Effect::Player(PlayerSubject {
                    subject: None,
                    optional: false,
                    effects: vec![PlayerEffect::Add {
                        essence: vec![CostType::Essence(e)],
                    }],
                })]),
            )
        });
        Self { attack, essence }
    }

    #[must_use]
    pub fn attack(&self) -> &Activated {
        &self.attack
    }

    #[must_use]
    pub fn essence(&self, essence: Essence) -> &Activated {
        let index = match essence {
            Essence::Cup => 0,
            Essence::Coin => 1,
            Essence::Sword => 2,
            Essence::Wand => 3,
        };
        &self.essence[index]
    }
}

impl Default for BuiltinAbilities {
    fn default() -> Self {
        Self::new()
    }
}

/// A card block that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    /// Zero-based index of the block in the input.
    pub block: usize,
    pub error: ParseError,
}

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("failed to encode card snapshot: {0}")]
    Encode(#[source] bincode::Error),

    #[error("failed to decode card snapshot: {0}")]
    Decode(#[source] bincode::Error),
}

/// Registry of card templates, looked up by case-insensitive name.
///
/// ```
/// use ccg_rules::cards::CardRegistry;
///
/// let (registry, errors) = CardRegistry::load("Land\nSource\n{t}: Add {s}.\n\nBroken\n");
/// assert_eq!(errors.len(), 1);
/// assert_eq!(errors[0].block, 1);
/// assert!(registry.get("land").is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardRegistry {
    cards: Vec<Arc<Card>>,
    by_name: FxHashMap<String, usize>,
    builtins: Arc<BuiltinAbilities>,
}

impl CardRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse blank-line separated card blocks. Blocks that fail to parse
    /// are reported and skipped.
    pub fn load(text: &str) -> (Self, Vec<LoadError>) {
        let mut registry = Self::new();
        let mut errors = Vec::new();
        for (block, source) in blocks(text).enumerate() {
            match parser::parse(&source) {
                Ok(card) => registry.register(card),
                Err(error) => errors.push(LoadError { block, error }),
            }
        }
        (registry, errors)
    }

    #[must_use]
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut registry = Self::new();
        for card in cards {
            registry.register(card);
        }
        registry
    }

    /// Add a template. A later card with the same name replaces the earlier one.
    pub fn register(&mut self, card: Card) {
        let key = card.name.to_lowercase();
        let card = Arc::new(card);
        match self.by_name.get(&key) {
            Some(&index) => {
                warn!("duplicate card name {:?}, replacing earlier definition", card.name);
                self.cards[index] = card;
            }
            None => {
                self.by_name.insert(key, self.cards.len());
                self.cards.push(card);
            }
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Card>> {
        self.by_name.get(&name.to_lowercase()).map(|&i| &self.cards[i])
    }

    /// Templates for a deck list. Unknown names are skipped with a warning.
    #[must_use]
    pub fn deck(&self, names: &[&str]) -> Vec<Arc<Card>> {
        names
            .iter()
            .filter_map(|name| {
                let card = self.get(name).cloned();
                if card.is_none() {
                    warn!("unknown card {name:?} in deck list");
                }
                card
            })
            .collect()
    }

    #[must_use]
    pub fn builtins(&self) -> &Arc<BuiltinAbilities> {
        &self.builtins
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Card>> {
        self.cards.iter()
    }

    /// Snapshot the compiled templates.
    pub fn to_bytes(&self) -> Result<Vec<u8>, RegistryError> {
        let cards: Vec<&Card> = self.cards.iter().map(AsRef::as_ref).collect();
        bincode::serialize(&cards).map_err(RegistryError::Encode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RegistryError> {
        let cards: Vec<Card> = bincode::deserialize(bytes).map_err(RegistryError::Decode)?;
        Ok(Self::from_cards(cards))
    }
}

/// Split text on blank lines, dropping empty blocks.
fn blocks(text: &str) -> impl Iterator<Item = String> + '_ {
    let mut current = Vec::new();
    let mut lines = text.lines();
    std::iter::from_fn(move || loop {
        match lines.next() {
            Some(line) if line.trim().is_empty() => {
                if !current.is_empty() {
                    return Some(std::mem::take(&mut current).join("\n"));
                }
            }
            Some(line) => current.push(line),
            None => {
                return (!current.is_empty()).then(|| std::mem::take(&mut current).join("\n"));
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardKind, CardType};

    const CARDS: &str = "\
Land
Source
{t}: Add {s}.

Knight {1}{s}
Unit - Human Soldier
Fly
2/2
";

    #[test]
    fn test_load() {
        let (registry, errors) = CardRegistry::load(CARDS);
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(registry.len(), 2);
        assert!(registry.get("KNIGHT").is_some());
        assert!(registry.get("Land").unwrap().has_kind(CardKind::Source));
    }

    #[test]
    fn test_blocks() {
        let parts: Vec<String> = blocks("a\nb\n\n\n c\n\n").collect();
        assert_eq!(parts, vec!["a\nb".to_string(), " c".to_string()]);
    }

    #[test]
    fn test_duplicate_replaces() {
        let mut registry = CardRegistry::new();
        registry.register(Card::new("Gem").with_type(CardType::new(CardKind::Item)));
        registry.register(Card::new("gem").with_type(CardType::new(CardKind::Source)));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("Gem").unwrap().has_kind(CardKind::Source));
    }

    #[test]
    fn test_deck_skips_unknown() {
        let (registry, _) = CardRegistry::load(CARDS);
        let deck = registry.deck(&["Land", "Nope", "Knight"]);
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let (registry, _) = CardRegistry::load(CARDS);
        let bytes = registry.to_bytes().unwrap();
        let restored = CardRegistry::from_bytes(&bytes).unwrap();
        assert_eq!(restored.len(), registry.len());
        for card in registry.iter() {
            assert_eq!(restored.get(&card.name).map(AsRef::as_ref), Some(card.as_ref()));
        }
    }

    #[test]
    fn test_decode_error() {
        assert!(matches!(
            CardRegistry::from_bytes(&[0xff, 0xff]),
            Err(RegistryError::Decode(_))
        ));
    }

    #[test]
    fn test_builtins() {
        let builtins = BuiltinAbilities::new();
        assert_eq!(builtins.attack().to_string(), "{t}: attacks.");
        assert_eq!(builtins.essence(Essence::Cup).to_string(), "{t}: add {c}.");
        assert!(builtins.essence(Essence::Wand).is_cost());
    }
}
