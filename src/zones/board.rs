//! The board: a fixed row of slots per player.

use serde::{Deserialize, Serialize};

use crate::core::CardId;

/// Fixed-size slot array. A slot holds at most one card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    slots: Vec<Option<CardId>>,
}

impl Board {
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Card in a slot. Out-of-range slots are empty.
    #[must_use]
    pub fn get(&self, slot: usize) -> Option<CardId> {
        self.slots.get(slot).copied().flatten()
    }

    #[must_use]
    pub fn is_free(&self, slot: usize) -> bool {
        matches!(self.slots.get(slot), Some(None))
    }

    #[must_use]
    pub fn first_free(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    #[must_use]
    pub fn free_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Put a card into a free slot. Returns false if the slot is taken or
    /// out of range.
    pub fn place(&mut self, slot: usize, card: CardId) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry @ None) => {
                *entry = Some(card);
                true
            }
            _ => false,
        }
    }

    /// Empty the slot holding `card`, returning its index.
    pub fn remove(&mut self, card: CardId) -> Option<usize> {
        let slot = self.slot_of(card)?;
        self.slots[slot] = None;
        Some(slot)
    }

    #[must_use]
    pub fn slot_of(&self, card: CardId) -> Option<usize> {
        self.slots.iter().position(|s| *s == Some(card))
    }

    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.slot_of(card).is_some()
    }

    /// Occupied slots in slot order.
    pub fn cards(&self) -> impl Iterator<Item = CardId> + '_ {
        self.slots.iter().filter_map(|s| *s)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
