//! Playing and resolving ability instances.
//!
//! Playing an instance picks its targets and pushes it onto the stack.
//! Resolving walks its effect instances in textual order, working out each
//! one's subjects and matches against the current state and applying it.

use log::{debug, warn};
use std::sync::Arc;

use super::effect::{CardEffect, PlayerEffect, PutPosition};
use super::instance::{AbilityInstance, ConcreteEffect, EffectInstance, InstanceKind};
use super::targeting::{CardMatch, CardTypeMatch, Match, Prefix, ZoneMatch};
use crate::cards::{Card, CardKind, CardType, Modifier, Stats, SubType};
use crate::core::{CardId, ObjectRef, PlayerId, Result};
use crate::game::{pay_from_pool, Game};
use crate::query::MatchMode;
use crate::triggers::EventType;
use crate::zones::{Zone, ZonePosition};

/// Optional-clause answers already given, per (group, player).
type Answers = Vec<(usize, PlayerId, bool)>;

impl Game {
    /// Pick every targeted subject and match of `inst`.
    ///
    /// A targeted subject is picked once per clause and shared by the
    /// clause's effects.
    pub(crate) fn pick_instance(&mut self, inst: &mut AbilityInstance) {
        for i in 0..inst.effects.len() {
            let effect = &inst.effects[i];
            let group = effect.group;
            let subject = effect.subject.clone().filter(Match::has_target);
            if let (Some(subject), false) = (subject, effect.subjects_picked) {
                let shared = inst.effects[..i]
                    .iter()
                    .find(|e| e.group == group && e.subjects_picked)
                    .map(|e| e.subjects.clone());
                let subjects = match shared {
                    Some(subjects) => subjects,
                    None => self.pick(inst, &subject, None),
                };
                let effect = &mut inst.effects[i];
                effect.subjects = subjects;
                effect.subjects_picked = true;
            }

            let effect = &inst.effects[i];
            let pending = effect.pending.clone().filter(|m| m.has_target() && effect.effect.has_target());
            if let (Some(pending), false) = (pending, effect.picked) {
                let zone = effect.zone.clone();
                let matches = self.pick(inst, &pending, zone.as_ref());
                let effect = &mut inst.effects[i];
                effect.matches = matches;
                effect.picked = true;
            }
        }
    }

    /// Pick targets, then push onto the stack.
    pub(crate) fn play_instance(&mut self, mut inst: AbilityInstance) {
        self.pick_instance(&mut inst);
        self.stack.push(inst);
    }

    /// Resolve a popped instance.
    ///
    /// A cast permanent is placed on the board at its field (or the first
    /// free slot) and a cast spell goes to its owner's pile, both emitting
    /// play once their effects have resolved.
    pub fn resolve_instance(&mut self, mut inst: AbilityInstance) -> Result<()> {
        let previous = self.resolving.replace(inst.source);
        let result = self.resolve_kind(&mut inst);
        self.resolving = previous;
        result
    }

    /// Resolve the effects of an instance that never touches the stack.
    pub(crate) fn resolve_now(&mut self, inst: &mut AbilityInstance) -> Result<()> {
        let previous = self.resolving.replace(inst.source);
        let result = self.resolve_effects(inst);
        self.resolving = previous;
        result
    }

    fn resolve_kind(&mut self, inst: &mut AbilityInstance) -> Result<()> {
        debug!("resolve {inst}");
        let resolved = self.resolve_effects(inst);
        if inst.kind == InstanceKind::Cast {
            // A failed effect still takes the card off the stack.
            self.finish_cast(inst)?;
        }
        resolved
    }

    /// Move a resolved cast card to the board or its pile and emit play.
    fn finish_cast(&mut self, inst: &AbilityInstance) -> Result<()> {
        let source = inst.source;
        let card = self.card(source)?;
        if card.zone != Zone::Stack {
            debug!("{source} left the stack while resolving");
        } else if card.is_permanent() {
            let board = &self.players[card.controller].board;
            match inst.field.filter(|&s| board.is_free(s)).or_else(|| board.first_free()) {
                Some(slot) => self.move_card(source, Zone::Board, ZonePosition::Index(slot))?,
                None => {
                    warn!("no free slot for {source}, it goes to the pile");
                    self.move_card(source, Zone::Pile, ZonePosition::Top)?;
                }
            }
        } else {
            self.move_card(source, Zone::Pile, ZonePosition::Top)?;
        }
        self.emit(EventType::Play, source);
        Ok(())
    }

    pub(crate) fn resolve_effects(&mut self, inst: &mut AbilityInstance) -> Result<()> {
        let mut answers = Answers::new();
        for i in 0..inst.effects.len() {
            let effect = inst.effects[i].clone();
            let subjects = self.effect_subjects(inst, &effect);
            let matches = if effect.picked {
                effect.matches.clone()
            } else {
                effect
                    .pending
                    .as_ref()
                    .map(|m| self.query(inst, Some(m), effect.zone.as_ref(), None, MatchMode::Bound))
                    .unwrap_or_default()
            };

            match &effect.effect {
                ConcreteEffect::Player(e) => {
                    for player in subjects.iter().filter_map(|o| o.as_player()) {
                        if effect.optional && !self.accepts(&mut answers, effect.group, player) {
                            continue;
                        }
                        self.resolve_player_effect(inst, e, player, &matches)?;
                    }
                }
                ConcreteEffect::Card(e) => {
                    for card in subjects.iter().filter_map(|o| o.as_card()) {
                        self.resolve_card_effect(inst, e, card, &matches)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Picked subjects, else the bound subject query, else the controller
    /// (player clauses) or the source (card clauses).
    fn effect_subjects(&self, inst: &AbilityInstance, effect: &EffectInstance) -> Vec<ObjectRef> {
        if effect.subjects_picked {
            return effect.subjects.clone();
        }
        match (&effect.subject, &effect.effect) {
            (Some(m @ Match::Card(_)), _) => {
                let zones = ZoneMatch(vec![Zone::Board, Zone::Stack]);
                self.query(inst, Some(m), Some(&zones), None, MatchMode::Bound)
            }
            (Some(m), _) => self.query(inst, Some(m), None, None, MatchMode::Bound),
            (None, ConcreteEffect::Player(_)) => vec![ObjectRef::Player(inst.controller)],
            (None, ConcreteEffect::Card(_)) => vec![ObjectRef::Card(inst.source)],
        }
    }

    /// Ask once per clause and player whether a "may" clause applies.
    fn accepts(&mut self, answers: &mut Answers, group: usize, player: PlayerId) -> bool {
        if let Some(&(_, _, accepted)) = answers.iter().find(|(g, p, _)| *g == group && *p == player) {
            return accepted;
        }
        let options = ["accept".to_string(), "decline".to_string()];
        let accepted = self.choose_one(player, options.len(), |c| c.mode(player, &options)) == Some(0);
        answers.push((group, player, accepted));
        accepted
    }

    fn resolve_player_effect(
        &mut self,
        inst: &mut AbilityInstance,
        effect: &PlayerEffect,
        player: PlayerId,
        matches: &[ObjectRef],
    ) -> Result<()> {
        let x = inst.x;
        let cards: Vec<CardId> = matches.iter().filter_map(|o| o.as_card()).collect();
        match effect {
            PlayerEffect::Draw { count } => self.draw(player, count.value(x))?,
            PlayerEffect::Token {
                count,
                stats,
                types,
                subtypes,
            } => {
                let token = Arc::new(token_card(*stats, types, subtypes));
                for _ in 0..count.value(x).max(0) {
                    if self.players[player].board.first_free().is_none() {
                        debug!("{player} has no room for {}", token.name);
                        break;
                    }
                    self.create_card(player, Arc::clone(&token), Zone::Board)?;
                }
            }
            PlayerEffect::Destroy { .. } => {
                for card in cards {
                    if self.card(card)?.zone == Zone::Board {
                        self.destroy(card)?;
                    }
                }
            }
            PlayerEffect::Discard { count, filter } => {
                let hand = self.players[player].hand.to_vec();
                let options: Vec<CardId> = match filter {
                    Some(_) => hand.into_iter().filter(|&c| cards.contains(&c)).collect(),
                    None => hand,
                };
                let n = usize::try_from(count.value(x)).unwrap_or(0).min(options.len());
                let mut chosen = self.choose_many(player, options.len(), n, |c| c.discard(player, &options, n));
                // Discarding is mandatory; fill up from the front.
                for i in 0..options.len() {
                    if chosen.len() >= n {
                        break;
                    }
                    if !chosen.contains(&i) {
                        chosen.push(i);
                    }
                }
                for i in chosen {
                    self.move_card(options[i], Zone::Pile, ZonePosition::Top)?;
                    self.emit(EventType::Discard, options[i]);
                }
            }
            PlayerEffect::Shuffle { zone, .. } => {
                let zone = zone.first();
                for card in cards {
                    if self.card(card)?.zone != zone {
                        self.move_card(card, zone, ZonePosition::Top)?;
                    }
                }
                self.shuffle_zone(player, zone);
            }
            PlayerEffect::Look { count, zone } => {
                let n = usize::try_from(count.value(x)).unwrap_or(0);
                let top = self.players[player].pile_of(zone.first()).map(|p| p.peek(n)).unwrap_or_default();
                if let Some(chooser) = self.choosers.get_mut(player) {
                    chooser.reveal(player, &top);
                }
            }
            PlayerEffect::Put {
                position,
                zone,
                random_order,
                deactivated,
                ..
            } => {
                let zone = zone.first();
                let mut cards = cards;
                if *random_order {
                    self.rng.shuffle(&mut cards);
                }
                let position = match position {
                    PutPosition::Top => ZonePosition::Top,
                    PutPosition::Bottom | PutPosition::Into => ZonePosition::Bottom,
                };
                for card in cards {
                    let instance = self.card(card)?;
                    if zone == Zone::Board
                        && (instance.zone == Zone::Board
                            || self.players[instance.controller].board.first_free().is_none())
                    {
                        continue;
                    }
                    self.move_card(card, zone, position)?;
                    if *deactivated {
                        self.card_mut(card)?.activated = false;
                    }
                }
            }
            PlayerEffect::Activate { .. } => {
                for card in cards {
                    self.card_mut(card)?.activated = true;
                    self.emit(EventType::Activate, card);
                }
            }
            PlayerEffect::Deactivate { .. } => {
                for card in cards {
                    self.card_mut(card)?.activated = false;
                    self.emit(EventType::Deactivate, card);
                }
            }
            PlayerEffect::Sacrifice { objects } => {
                let mut owned: Vec<CardId> = Vec::new();
                for card in cards {
                    let instance = self.card(card)?;
                    if instance.zone == Zone::Board && instance.controller == player {
                        owned.push(card);
                    }
                }
                if !objects.has_target() && !is_plural(objects) && owned.len() > 1 {
                    let Some(i) = self.choose_one(player, owned.len(), |c| c.card(player, &owned)) else {
                        return Ok(());
                    };
                    owned = vec![owned[i]];
                }
                for card in owned {
                    self.move_card(card, Zone::Pile, ZonePosition::Top)?;
                    inst.sacrificed.push(card);
                    self.emit(EventType::Sacrifice, card);
                }
            }
            PlayerEffect::Add { essence } => {
                for cost in essence {
                    self.players[player].add_essence(*cost, x);
                }
                debug!("{player} has {} essence", self.players[player].essence_count());
            }
            PlayerEffect::PayEssence { costs } => {
                let mut pool = self.players[player].essence.clone();
                if pay_from_pool(&mut pool, costs, x) {
                    self.players[player].essence = pool;
                } else {
                    debug!("{player} cannot spend {} essence", costs.len());
                }
            }
            PlayerEffect::GainLife { amount } => self.gain_life(player, amount.value(x)),
            PlayerEffect::LoseLife { amount } | PlayerEffect::PayLife { amount } => {
                self.lose_life(player, amount.value(x));
            }
            PlayerEffect::ExtraTurn { count } => {
                let turns = u32::try_from(count.value(x)).unwrap_or(0);
                let extra = &mut self.players[player].extra_turns;
                *extra = extra.saturating_add(turns);
            }
        }
        Ok(())
    }

    fn resolve_card_effect(
        &mut self,
        inst: &AbilityInstance,
        effect: &CardEffect,
        card: CardId,
        matches: &[ObjectRef],
    ) -> Result<()> {
        let x = inst.x;
        match effect {
            CardEffect::Damage { amount, .. } => {
                let amount = amount.value(x);
                for object in matches {
                    match *object {
                        ObjectRef::Card(target) => {
                            if self.card(target)?.zone == Zone::Board {
                                self.deal_damage(target, amount)?;
                            }
                        }
                        ObjectRef::Player(target) => {
                            self.lose_life(target, amount);
                            self.emit(EventType::PlayerDamage, target);
                        }
                    }
                }
                Ok(())
            }
            CardEffect::Gets {
                power_sign,
                power,
                health_sign,
                health,
            } => {
                let modifier = Modifier::new(power_sign.apply(power.value(x)), health_sign.apply(health.value(x)));
                self.card_mut(card)?.modifiers.push(modifier);
                self.check_lethal(card)
            }
            CardEffect::Attack => self.attack(card),
        }
    }

    /// `attacker` hits the next remaining opponent's slot at its own index:
    /// a card there blocks and takes the damage, otherwise the player does.
    fn attack(&mut self, attacker: CardId) -> Result<()> {
        let instance = self.card(attacker)?;
        let (controller, slot, power) = (instance.controller, instance.slot, instance.power());
        self.emit(EventType::Attack, attacker);

        let count = self.player_count();
        let defender = (1..count)
            .map(|i| PlayerId::new(((controller.index() + i) % count) as u8))
            .find(|&p| !self.players[p].lost);
        let Some(defender) = defender else {
            return Ok(());
        };
        match slot.and_then(|s| self.players[defender].board.get(s)) {
            Some(blocker) => {
                self.emit(EventType::Block, blocker);
                self.deal_damage(blocker, power)
            }
            None => {
                self.lose_life(defender, power);
                self.emit(EventType::PlayerDamage, defender);
                Ok(())
            }
        }
    }
}

/// "units" rather than "a unit".
fn is_plural(m: &CardMatch) -> bool {
    m.0.iter().any(|alt| match alt {
        CardTypeMatch::Filter(f) => f.prefixes.iter().any(|p| matches!(p, Prefix::Type(t) if t.plural)),
        CardTypeMatch::Named | CardTypeMatch::This => false,
    })
}

/// Template for a created token, named after its subtypes.
fn token_card(stats: Option<Stats>, types: &[CardType], subtypes: &[SubType]) -> Card {
    let mut words: Vec<String> = subtypes.iter().map(|s| capitalize(s.word())).collect();
    words.push("Token".to_string());

    let mut card = Card::new(words.join(" "));
    for t in types {
        card = card.with_type(CardType::new(t.kind));
    }
    if !card.has_kind(CardKind::Token) {
        card = card.with_type(CardType::new(CardKind::Token));
    }
    card.subtypes = subtypes.to_vec();
    card.stats = stats;
    card
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
