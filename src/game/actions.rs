//! Costs and player actions.
//!
//! A player holding priority may cast a card from hand, play a card from
//! hand as a source, or activate an ability of a card they control. Each
//! action checks timing and payability first, then pays immediately and
//! irrevocably.

use log::debug;
use std::sync::Arc;

use super::player::pay_from_pool;
use super::Game;
use crate::cards::definition::NAME_PLACEHOLDER;
use crate::cards::{CardKind, CostType, Keyword};
use crate::core::{CardId, EngineError, PlayerId, Result};
use crate::effects::{Ability, AbilityInstance, Activated, ConcreteEffect, InstanceId, InstanceKind, PlayerEffect};
use crate::query::MatchMode;
use crate::rules::Phase;
use crate::triggers::EventType;
use crate::zones::{Zone, ZonePosition};

impl Game {
    // === Costs ===

    /// Whether `card`'s controller could pay `costs` right now.
    ///
    /// `{q}` needs the card deactivated and `{t}` needs it activated. Essence
    /// is checked on a copy of the pool.
    #[must_use]
    pub fn can_pay(&self, card: CardId, costs: &[CostType], x: i64) -> bool {
        let Some(instance) = self.get_card(card) else {
            return false;
        };
        let ready = costs.iter().all(|cost| match cost {
            CostType::Activate => !instance.activated,
            CostType::Deactivate => instance.activated,
            CostType::Essence(_) | CostType::Generic(_) => true,
        });
        ready && self.players[instance.controller].can_afford(costs, x)
    }

    /// Whether `player` could pay the effect costs of `ability` on `card`
    /// on top of its resource costs.
    ///
    /// Sacrifices need a matching card on the player's board, discards
    /// enough matching cards in hand, spent essence must be left after the
    /// resource costs and spent life must not exceed the life total.
    #[must_use]
    pub fn can_pay_effects(&self, player: PlayerId, card: CardId, ability: &Activated, x: i64) -> bool {
        let Some(p) = self.players.get(player) else {
            return false;
        };
        let mut inst = AbilityInstance::new(InstanceId(0), InstanceKind::Activated, card, player);
        inst.x = x;
        for cost in ability.effect_costs() {
            inst.prepare_effect(cost);
        }

        let mut essence: Vec<CostType> = ability.resource_costs().collect();
        let mut life = 0i64;
        for effect in &inst.effects {
            let candidates = || {
                self.query(&inst, effect.pending.as_ref(), effect.zone.as_ref(), None, MatchMode::Candidates)
                    .into_iter()
                    .filter_map(|o| o.as_card())
                    .filter(|&c| self.get_card(c).is_some_and(|c| c.controller == player))
                    .count()
            };
            let payable = match &effect.effect {
                ConcreteEffect::Player(PlayerEffect::Sacrifice { .. }) => candidates() > 0,
                ConcreteEffect::Player(PlayerEffect::Discard { count, filter }) => {
                    let have = if filter.is_some() { candidates() } else { p.hand.len() };
                    usize::try_from(count.value(x)).is_ok_and(|n| have >= n)
                }
                ConcreteEffect::Player(PlayerEffect::PayEssence { costs }) => {
                    essence.extend_from_slice(costs);
                    true
                }
                ConcreteEffect::Player(PlayerEffect::PayLife { amount }) => {
                    life = life.saturating_add(amount.value(x));
                    true
                }
                _ => true,
            };
            if !payable {
                return false;
            }
        }
        life <= p.life && p.can_afford(&essence, x)
    }

    /// Pay `costs` for `card`. Assumes [`can_pay`](Self::can_pay) passed.
    pub(crate) fn pay(&mut self, card: CardId, costs: &[CostType], x: i64) -> Result<()> {
        let controller = self.card(card)?.controller;
        if !pay_from_pool(&mut self.players[controller].essence, costs, x) {
            return Err(EngineError::InsufficientResources { card });
        }
        debug!("{controller} pays {} for {card}", costs.len());
        for cost in costs {
            match cost {
                CostType::Activate => {
                    self.card_mut(card)?.activated = true;
                    self.emit(EventType::Activate, card);
                }
                CostType::Deactivate => {
                    self.card_mut(card)?.activated = false;
                    self.emit(EventType::Deactivate, card);
                }
                CostType::Essence(_) | CostType::Generic(_) => {}
            }
        }
        Ok(())
    }

    /// Ask for the value of `x` when `costs` contain an `{x}`.
    ///
    /// Offers 0 up to whatever the pool holds beyond the fixed costs. A
    /// decline means 0.
    fn choose_x(&mut self, player: PlayerId, costs: &[CostType]) -> i64 {
        if !costs.iter().any(|c| matches!(c, CostType::Generic(q) if q.is_x())) {
            return 0;
        }
        let fixed: i64 = costs
            .iter()
            .map(|c| match c {
                CostType::Essence(_) => 1,
                CostType::Generic(q) => q.value(0),
                CostType::Activate | CostType::Deactivate => 0,
            })
            .fold(0, i64::saturating_add);
        let pool = i64::try_from(self.players[player].essence_count()).unwrap_or(i64::MAX);
        let max = pool.saturating_sub(fixed).max(0);
        if max == 0 {
            return 0;
        }
        let options: Vec<String> = (0..=max).map(|v| v.to_string()).collect();
        self.choose_one(player, options.len(), |c| c.mode(player, &options))
            .map_or(0, |i| i as i64)
    }

    // === Timing ===

    fn sorcery_timing(&self, player: PlayerId) -> bool {
        self.turn.active == player && self.turn.phase == Phase::Play && self.stack.is_empty()
    }

    fn check_priority(&self, player: PlayerId) -> Result<()> {
        if self.stack.priority() == player {
            Ok(())
        } else {
            Err(EngineError::NotYourPriority { player })
        }
    }

    fn in_hand(&self, player: PlayerId, card: CardId) -> Result<()> {
        let instance = self.card(card)?;
        if instance.zone == Zone::Hand && instance.owner == player {
            Ok(())
        } else {
            Err(EngineError::NotPlayable {
                card,
                reason: "not in your hand",
            })
        }
    }

    /// Whether `player` may cast `card` now, with `x` as 0.
    #[must_use]
    pub fn can_cast(&self, player: PlayerId, card: CardId) -> bool {
        let Some(instance) = self.get_card(card) else {
            return false;
        };
        self.in_hand(player, card).is_ok()
            && self.stack.priority() == player
            && (instance.has_keyword(Keyword::Ambush) || self.sorcery_timing(player))
            && (!instance.is_permanent() || self.players[player].board.first_free().is_some())
            && self.can_pay(card, &instance.card.costs, 0)
    }

    /// Whether `player` may play `card` as a source now.
    #[must_use]
    pub fn can_play_source(&self, player: PlayerId, card: CardId) -> bool {
        self.in_hand(player, card).is_ok()
            && self.stack.priority() == player
            && self.sorcery_timing(player)
            && self.turn.sources_played < self.config.sources_per_turn
            && self.players[player].board.first_free().is_some()
    }

    /// Indices into `card`'s activated abilities that `player` could use now.
    #[must_use]
    pub fn usable_abilities(&self, player: PlayerId, card: CardId) -> Vec<usize> {
        let Some(instance) = self.get_card(card) else {
            return Vec::new();
        };
        if instance.zone != Zone::Board || instance.controller != player || self.stack.priority() != player {
            return Vec::new();
        }
        instance
            .activated_abilities(&self.builtins)
            .iter()
            .enumerate()
            .filter(|(_, ability)| ability.is_cost() || self.sorcery_timing(player))
            .filter(|(_, ability)| {
                let costs: Vec<CostType> = ability.resource_costs().collect();
                self.can_pay(card, &costs, 0) && self.can_pay_effects(player, card, ability, 0)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Every card `player` could act with: board cards first, then hand.
    #[must_use]
    pub fn playable(&self, player: PlayerId) -> Vec<CardId> {
        let Some(p) = self.players.get(player) else {
            return Vec::new();
        };
        let board = p.board.cards().filter(|&c| !self.usable_abilities(player, c).is_empty());
        let hand = p
            .hand
            .iter()
            .filter(|&c| self.can_cast(player, c) || self.can_play_source(player, c));
        board.chain(hand).collect()
    }

    // === Actions ===

    /// Cast `card` from `player`'s hand onto the stack.
    ///
    /// Permanents take board slot `field`, or the first free slot when
    /// `None`. Spells prepare their effects and pick targets now.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotPlayable`] for bad timing or a missing slot,
    /// [`EngineError::NotYourPriority`] and
    /// [`EngineError::InsufficientResources`]. Nothing is paid on error.
    pub fn cast(&mut self, player: PlayerId, card: CardId, field: Option<usize>) -> Result<()> {
        self.in_hand(player, card)?;
        self.check_priority(player)?;
        let instance = self.card(card)?;
        let template = Arc::clone(&instance.card);
        let permanent = instance.is_permanent();
        if !instance.has_keyword(Keyword::Ambush) && !self.sorcery_timing(player) {
            return Err(EngineError::NotPlayable {
                card,
                reason: "not your play phase with an empty stack",
            });
        }

        let field = if permanent {
            let board = &self.players[player].board;
            let not_playable = |reason| EngineError::NotPlayable { card, reason };
            match field {
                Some(slot) if board.is_free(slot) => Some(slot),
                Some(_) => return Err(not_playable("field is taken")),
                None => Some(board.first_free().ok_or(not_playable("board is full"))?),
            }
        } else {
            None
        };

        if !self.can_pay(card, &template.costs, 0) {
            return Err(EngineError::InsufficientResources { card });
        }
        let x = self.choose_x(player, &template.costs);
        if !self.can_pay(card, &template.costs, x) {
            return Err(EngineError::InsufficientResources { card });
        }
        self.pay(card, &template.costs, x)?;

        let id = self.next_instance_id();
        let mut ability = AbilityInstance::new(id, InstanceKind::Cast, card, player);
        ability.x = x;
        ability.field = field;
        if !permanent {
            for a in &template.abilities {
                if let Ability::Composed(composed) = a {
                    ability.prepare(composed);
                }
            }
        }
        self.move_card(card, Zone::Stack, ZonePosition::Top)?;
        debug!("{player} casts {}", template.name);
        self.play_instance(ability);
        Ok(())
    }

    /// Activate ability `index` of [`Game::usable_abilities`]' numbering,
    /// i.e. of the card's full activated ability list.
    ///
    /// Cost abilities (e.g. essence abilities) resolve at once without
    /// using the stack; others are played onto it.
    pub fn activate(&mut self, player: PlayerId, card: CardId, index: usize) -> Result<()> {
        let instance = self.card(card)?;
        if instance.zone != Zone::Board || instance.controller != player {
            return Err(EngineError::NotPlayable {
                card,
                reason: "not on your board",
            });
        }
        let ability = instance
            .activated_abilities(&self.builtins)
            .get(index)
            .map(|a| (*a).clone())
            .ok_or(EngineError::NotPlayable {
                card,
                reason: "no such ability",
            })?;
        self.check_priority(player)?;
        let instant = ability.is_cost();
        if !instant && !self.sorcery_timing(player) {
            return Err(EngineError::NotPlayable {
                card,
                reason: "not your play phase with an empty stack",
            });
        }

        let costs: Vec<CostType> = ability.resource_costs().collect();
        if !self.can_pay(card, &costs, 0) || !self.can_pay_effects(player, card, &ability, 0) {
            return Err(EngineError::InsufficientResources { card });
        }
        let x = self.choose_x(player, &costs);
        if !self.can_pay(card, &costs, x) || !self.can_pay_effects(player, card, &ability, x) {
            return Err(EngineError::InsufficientResources { card });
        }
        self.pay(card, &costs, x)?;

        let id = self.next_instance_id();
        let mut inst = AbilityInstance::new(id, InstanceKind::Activated, card, player);
        inst.x = x;
        for cost in ability.effect_costs() {
            inst.prepare_effect(cost);
        }
        if !inst.effects.is_empty() {
            self.pick_instance(&mut inst);
            self.resolve_now(&mut inst)?;
            inst.clear_effects();
            inst.targeting.clear();
        }

        inst.prepare(&ability.effect);
        if instant {
            self.pick_instance(&mut inst);
            self.resolve_instance(inst)?;
            self.stack.acted();
        } else {
            self.play_instance(inst);
        }
        Ok(())
    }

    /// Play `card` from hand onto the board as a source.
    ///
    /// Non-source cards enter flipped. The card enters activated and
    /// emits play.
    pub fn play_source(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        self.in_hand(player, card)?;
        self.check_priority(player)?;
        let not_playable = |reason| EngineError::NotPlayable { card, reason };
        if !self.sorcery_timing(player) {
            return Err(not_playable("not your play phase with an empty stack"));
        }
        if self.turn.sources_played >= self.config.sources_per_turn {
            return Err(not_playable("source limit reached"));
        }
        if self.players[player].board.first_free().is_none() {
            return Err(not_playable("board is full"));
        }

        let instance = self.card_mut(card)?;
        instance.flipped = !instance.card.has_kind(CardKind::Source);
        instance.activated = true;
        self.move_card(card, Zone::Board, ZonePosition::Top)?;
        self.turn.sources_played += 1;
        self.stack.acted();
        debug!("{player} plays {card} as a source");
        self.emit(EventType::Play, card);
        Ok(())
    }

    /// Let `player` take one action through their collaborator.
    ///
    /// Returns `false` if they passed, declined a prompt, or the chosen
    /// action failed.
    pub fn take_action(&mut self, player: PlayerId) -> bool {
        let options = self.playable(player);
        let Some(choice) = self.choose_one(player, options.len(), |c| c.card(player, &options)) else {
            return false;
        };
        let card = options[choice];
        let Some(instance) = self.get_card(card) else {
            return false;
        };

        let result = if instance.zone == Zone::Board {
            let name = instance.name().to_string();
            let abilities = instance.activated_abilities(&self.builtins);
            let usable = self.usable_abilities(player, card);
            let labels: Vec<String> = usable
                .iter()
                .map(|&i| abilities[i].to_string().replace(NAME_PLACEHOLDER, &name))
                .collect();
            let Some(pick) = self.choose_one(player, labels.len(), |c| c.ability(player, card, &labels)) else {
                return false;
            };
            self.activate(player, card, usable[pick])
        } else {
            let permanent = instance.is_permanent();
            let as_source = match (self.can_cast(player, card), self.can_play_source(player, card)) {
                (true, true) => {
                    let modes = vec!["cast".to_string(), "play as source".to_string()];
                    match self.choose_one(player, modes.len(), |c| c.mode(player, &modes)) {
                        Some(mode) => mode == 1,
                        None => return false,
                    }
                }
                (cast, source) => source && !cast,
            };
            if as_source {
                self.play_source(player, card)
            } else if permanent {
                let free = self.players[player].board.free_slots();
                let Some(slot) = self.choose_one(player, free.len(), |c| c.field(player, &free)) else {
                    return false;
                };
                self.cast(player, card, Some(free[slot]))
            } else {
                self.cast(player, card, None)
            }
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                debug!("{player} action failed: {e}");
                false
            }
        }
    }
}
