//! Ordered zones: deck, hand and pile.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::{CardId, GameRng};

/// Position for inserting a card into an ordered zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePosition {
    /// Front of the zone; the next card drawn.
    Top,
    /// Back of the zone.
    Bottom,
    /// Insert at a specific index from the top, clamped to the length.
    Index(usize),
}

/// Ordered card list whose front is the top.
///
/// Backed by a persistent vector so snapshots of a zone are cheap.
///
/// ```
/// use ccg_rules::core::CardId;
/// use ccg_rules::zones::{Pile, ZonePosition};
///
/// let mut deck = Pile::new();
/// deck.insert(CardId(1), ZonePosition::Bottom);
/// deck.insert(CardId(2), ZonePosition::Bottom);
/// deck.insert(CardId(3), ZonePosition::Top);
///
/// assert_eq!(deck.top(), Some(CardId(3)));
/// assert_eq!(deck.pop_top(), Some(CardId(3)));
/// assert_eq!(deck.to_vec(), vec![CardId(1), CardId(2)]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pile {
    cards: Vector<CardId>,
}

impl Pile {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn top(&self) -> Option<CardId> {
        self.cards.front().copied()
    }

    pub fn pop_top(&mut self) -> Option<CardId> {
        self.cards.pop_front()
    }

    /// The first `n` cards from the top.
    #[must_use]
    pub fn peek(&self, n: usize) -> Vec<CardId> {
        self.cards.iter().take(n).copied().collect()
    }

    pub fn insert(&mut self, card: CardId, position: ZonePosition) {
        match position {
            ZonePosition::Top => self.cards.push_front(card),
            ZonePosition::Bottom => self.cards.push_back(card),
            ZonePosition::Index(i) => {
                let idx = i.min(self.cards.len());
                self.cards.insert(idx, card);
            }
        }
    }

    /// Remove a card, returning the index it occupied.
    pub fn remove(&mut self, card: CardId) -> Option<usize> {
        let idx = self.position(card)?;
        self.cards.remove(idx);
        Some(idx)
    }

    #[must_use]
    pub fn position(&self, card: CardId) -> Option<usize> {
        self.cards.iter().position(|&c| c == card)
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.position(card).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = CardId> + '_ {
        self.cards.iter().copied()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<CardId> {
        self.iter().collect()
    }

    pub fn shuffle(&mut self, rng: &mut GameRng) {
        rng.shuffle_vector(&mut self.cards);
    }
}

impl FromIterator<CardId> for Pile {
    fn from_iter<I: IntoIterator<Item = CardId>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}
