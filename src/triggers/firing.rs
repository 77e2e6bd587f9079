//! Emitting events and firing triggered abilities.

use log::{trace, warn};
use std::sync::Arc;

use super::condition::{Condition, PlayerAction, Trigger};
use super::event::{EventType, GameEvent};
use crate::core::{CardId, ObjectRef};
use crate::effects::{AbilityInstance, CardMatch, InstanceId, InstanceKind};
use crate::game::Game;
use crate::query::{numerical_value, MatchMode};
use crate::zones::Zone;

impl Game {
    /// Emit an event: mark losers, fire matching triggers, then run handlers.
    ///
    /// Emissions nested deeper than `max_event_depth` are dropped.
    pub(crate) fn emit(&mut self, event_type: EventType, subject: impl Into<ObjectRef>) {
        let subject = subject.into();
        if self.event_depth >= self.config.max_event_depth {
            warn!("event depth {} reached, dropping {event_type} {subject}", self.event_depth);
            return;
        }
        self.event_depth += 1;

        if event_type == EventType::Lose {
            if let Some(player) = subject.as_player().and_then(|p| self.players.get_mut(p)) {
                player.lost = true;
            }
        }
        let event = GameEvent::new(event_type, subject).with_source(self.resolving);
        trace!("{event}");

        self.fire_triggers(event_type, subject);
        self.events.dispatch(&event);
        self.event_depth -= 1;
    }

    /// Offer the event to every triggered ability on every board.
    fn fire_triggers(&mut self, event_type: EventType, subject: ObjectRef) {
        let on_board: Vec<CardId> = self
            .players
            .iter()
            .flat_map(|(_, p)| p.board.cards().collect::<Vec<_>>())
            .collect();

        for card in on_board {
            // An earlier trigger may have moved it.
            let Some(instance) = self.get_card(card) else {
                continue;
            };
            if instance.zone != Zone::Board || instance.flipped {
                continue;
            }
            let template = Arc::clone(&instance.card);
            let controller = instance.controller;

            for triggered in template.triggered() {
                let mut inst = AbilityInstance::new(InstanceId(0), InstanceKind::Triggered, card, controller);
                inst.event = event_type;
                inst.subject = Some(subject);
                if !self.trigger_matches(&triggered.trigger, &inst, subject) {
                    continue;
                }
                inst.id = self.next_instance_id();
                inst.this = vec![subject];
                inst.prepare(&triggered.effect);
                self.play_instance(inst);
            }
        }
    }

    /// Whether `trigger` fires for `inst`'s event about `subject`.
    #[must_use]
    pub fn trigger_matches(&self, trigger: &Trigger, inst: &AbilityInstance, subject: ObjectRef) -> bool {
        match trigger.event_type() {
            Some(expected) if expected != inst.event => return false,
            // Numeric conditions watch changes to the source itself.
            None if subject != ObjectRef::Card(inst.source) => return false,
            _ => {}
        }

        let card_matches = |m: &CardMatch| {
            subject
                .as_card()
                .is_some_and(|c| self.card_matches(inst, m, c, MatchMode::Bound))
        };
        match trigger {
            Trigger::Play(m) => {
                card_matches(m)
                    && subject
                        .as_card()
                        .and_then(|c| self.get_card(c))
                        .is_some_and(|c| c.controller == inst.controller)
            }
            Trigger::GainLife(m) | Trigger::LoseLife(m) => {
                subject.as_player().is_some_and(|p| self.player_matches(inst, m, p))
            }
            Trigger::DealtDamage(m) => card_matches(m),
            Trigger::Condition(condition) => match condition {
                Condition::YourTurn => self.turn.active == inst.controller,
                Condition::NotYourTurn => self.turn.active != inst.controller,
                Condition::Player { who, action } => {
                    let player = match subject {
                        ObjectRef::Player(p) => Some(p),
                        // A drawn card reports its owner, others their controller.
                        ObjectRef::Card(c) => self.get_card(c).map(|c| match action {
                            PlayerAction::Draw => c.owner,
                            PlayerAction::Sacrifice(_) => c.controller,
                        }),
                    };
                    let acted = match action {
                        PlayerAction::Draw => true,
                        PlayerAction::Sacrifice(m) => card_matches(m),
                    };
                    acted && player.is_some_and(|p| self.player_matches(inst, who, p))
                }
                Condition::Card { which, .. } => card_matches(which),
                Condition::Numerical { numerical, compare } => {
                    let Some(card) = self.get_card(inst.source) else {
                        return false;
                    };
                    let count = self.count_value(inst, &compare.count, MatchMode::Bound);
                    compare.holds(numerical_value(card, *numerical), count)
                }
            },
        }
    }
}
