//! Zone transitions and the primitive state changes effects build on.
//!
//! Every card movement goes through [`Game::move_card`], which keeps the
//! containers, the card's zone tag and its board slot in agreement, and
//! emits leave-board / enter-board around board changes.

use log::debug;

use super::Game;
use crate::core::{CardId, EngineError, PlayerId, Result};
use crate::triggers::EventType;
use crate::zones::{Zone, ZonePosition};

impl Game {
    /// Move a card to `to`.
    ///
    /// Board destinations use the controller's board: `Index(slot)` asks for
    /// that slot, any other position takes the first free one. Ordered
    /// destinations use the owner's zone at `position`. Moving to the stack
    /// takes the card out of every container.
    ///
    /// # Errors
    ///
    /// [`EngineError::IllegalZoneTransition`] if the board is full, the
    /// requested slot is taken, or the card is already on the board. The
    /// state is unchanged on error.
    pub fn move_card(&mut self, card: CardId, to: Zone, position: ZonePosition) -> Result<()> {
        let instance = self.card(card)?;
        let from = instance.zone;
        let (owner, controller) = (instance.owner, instance.controller);
        let illegal = |reason| EngineError::IllegalZoneTransition { card, from, to, reason };

        let slot = if to == Zone::Board {
            if from == Zone::Board {
                return Err(illegal("already on the board"));
            }
            let board = &self.players[controller].board;
            match position {
                ZonePosition::Index(slot) if board.is_free(slot) => Some(slot),
                ZonePosition::Index(_) => return Err(illegal("slot occupied")),
                ZonePosition::Top | ZonePosition::Bottom => Some(board.first_free().ok_or(illegal("board is full"))?),
            }
        } else {
            None
        };

        if from == Zone::Board {
            self.emit(EventType::LeaveBoard, card);
            // Triggers may not move cards, but the card may have changed hands.
            let controller = self.card(card)?.controller;
            self.players[controller].board.remove(card);
            let instance = self.card_mut(card)?;
            instance.leave_board();
            instance.controller = instance.owner;
        } else if let Some(pile) = self.players[owner].pile_of_mut(from) {
            pile.remove(card);
        }

        match slot {
            Some(slot) => {
                self.players[controller].board.place(slot, card);
                self.card_mut(card)?.slot = Some(slot);
            }
            None => {
                if let Some(pile) = self.players[owner].pile_of_mut(to) {
                    pile.insert(card, position);
                }
            }
        }
        self.card_mut(card)?.zone = to;
        debug!("move {card} {from} -> {to}");

        if to == Zone::Board {
            self.emit(EventType::EnterBoard, card);
        }
        Ok(())
    }

    /// `player` draws `count` cards from the top of their deck.
    ///
    /// Drawing from an empty deck emits lose and stops.
    pub fn draw(&mut self, player: PlayerId, count: i64) -> Result<()> {
        for _ in 0..count.max(0) {
            let Some(card) = self.players[player].deck.top() else {
                self.emit(EventType::Lose, player);
                break;
            };
            self.move_card(card, Zone::Hand, ZonePosition::Bottom)?;
            self.emit(EventType::Draw, card);
        }
        Ok(())
    }

    /// Put a card into its owner's pile.
    pub fn destroy(&mut self, card: CardId) -> Result<()> {
        self.move_card(card, Zone::Pile, ZonePosition::Top)?;
        self.emit(EventType::Destroy, card);
        Ok(())
    }

    /// Mark damage on a card, destroying it if that is lethal.
    pub fn deal_damage(&mut self, card: CardId, amount: i64) -> Result<()> {
        let instance = self.card_mut(card)?;
        instance.damage = instance.damage.saturating_add(amount);
        self.emit(EventType::Damage, card);
        self.check_lethal(card)
    }

    /// Destroy a board card whose health has dropped to zero.
    pub(crate) fn check_lethal(&mut self, card: CardId) -> Result<()> {
        let instance = self.card(card)?;
        if instance.zone == Zone::Board && instance.is_dead() {
            self.destroy(card)?;
        }
        Ok(())
    }

    /// Reduce a life total. Reaching zero emits lose.
    pub fn lose_life(&mut self, player: PlayerId, amount: i64) {
        let life = &mut self.players[player].life;
        *life = life.saturating_sub(amount);
        self.emit(EventType::LoseLife, player);
        let p = &self.players[player];
        if p.life <= 0 && !p.lost {
            self.emit(EventType::Lose, player);
        }
    }

    pub fn gain_life(&mut self, player: PlayerId, amount: i64) {
        let life = &mut self.players[player].life;
        *life = life.saturating_add(amount);
        self.emit(EventType::GainLife, player);
    }

    /// Shuffle one of `player`'s ordered zones.
    pub fn shuffle_zone(&mut self, player: PlayerId, zone: Zone) {
        if let Some(pile) = self.players[player].pile_of_mut(zone) {
            pile.shuffle(&mut self.rng);
        }
    }
}
