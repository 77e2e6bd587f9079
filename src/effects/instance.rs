//! Ability and effect instances.
//!
//! An `AbilityInstance` is one use of an ability: a cast card, an activated
//! ability or a fired trigger. It is built when the ability is played,
//! waits on the stack and is consumed when it resolves.
//!
//! Building happens in two steps. [`AbilityInstance::prepare`] unfolds an
//! ability's text into one [`EffectInstance`] per concrete effect and
//! records what each one still has to select. Picking targets needs the
//! game and happens afterwards, in `Game::pick_instance`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ability::Composed;
use super::effect::{CardEffect, Effect, PlayerEffect};
use super::targeting::{Match, ZoneMatch};
use crate::core::{CardId, ObjectRef, PlayerId};
use crate::triggers::EventType;

/// Identifier of an ability instance, unique within a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ability({})", self.0)
    }
}

/// How the instance came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceKind {
    /// A card cast from hand.
    Cast,
    Activated,
    Triggered,
}

/// One concrete effect with its actor family.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcreteEffect {
    Player(PlayerEffect),
    Card(CardEffect),
}

impl ConcreteEffect {
    #[must_use]
    pub fn has_target(&self) -> bool {
        match self {
            ConcreteEffect::Player(e) => e.has_target(),
            ConcreteEffect::Card(e) => e.has_target(),
        }
    }

    #[must_use]
    pub fn pending_match(&self) -> Option<Match> {
        match self {
            ConcreteEffect::Player(e) => e.pending_match(),
            ConcreteEffect::Card(e) => e.pending_match(),
        }
    }

    #[must_use]
    pub fn search_zone(&self) -> Option<ZoneMatch> {
        match self {
            ConcreteEffect::Player(e) => e.search_zone(),
            ConcreteEffect::Card(e) => e.search_zone(),
        }
    }
}

impl fmt::Display for ConcreteEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcreteEffect::Player(e) => write!(f, "{e}"),
            ConcreteEffect::Card(e) => write!(f, "{e}"),
        }
    }
}

/// A concrete effect inside an ability instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub effect: ConcreteEffect,

    /// Index of the subject clause this effect came from. Effects of one
    /// clause share their subjects and their "may" answer.
    pub group: usize,

    /// "may": each subject player is asked before it applies.
    pub optional: bool,

    /// Who acts. `None` means the controller for player effects and the
    /// source for card effects.
    pub subject: Option<Match>,

    /// What the effect acts on.
    pub pending: Option<Match>,

    /// Zones searched for `pending`.
    pub zone: Option<ZoneMatch>,

    /// Subjects chosen when the ability was played.
    pub subjects: Vec<ObjectRef>,
    pub subjects_picked: bool,

    /// Objects chosen when the ability was played.
    pub matches: Vec<ObjectRef>,
    pub picked: bool,
}

impl EffectInstance {
    #[must_use]
    pub fn new(effect: ConcreteEffect, group: usize) -> Self {
        let pending = effect.pending_match();
        let zone = effect.search_zone();
        Self {
            effect,
            group,
            optional: false,
            subject: None,
            pending,
            zone,
            subjects: Vec::new(),
            subjects_picked: false,
            matches: Vec::new(),
            picked: false,
        }
    }
}

/// One use of an ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityInstance {
    pub id: InstanceId,
    pub kind: InstanceKind,
    pub source: CardId,
    pub controller: PlayerId,
    pub effects: Vec<EffectInstance>,

    /// Objects bound by the trigger that created this instance.
    pub this: Vec<ObjectRef>,

    /// Cards sacrificed while paying for this instance.
    pub sacrificed: Vec<CardId>,

    /// Every target chosen so far.
    pub targeting: Vec<ObjectRef>,

    /// Board slot a cast permanent should enter.
    pub field: Option<usize>,

    /// Value chosen for `{x}`.
    pub x: i64,

    /// Event that fired a triggered instance.
    pub event: EventType,
    pub subject: Option<ObjectRef>,

    next_group: usize,
}

impl AbilityInstance {
    #[must_use]
    pub fn new(id: InstanceId, kind: InstanceKind, source: CardId, controller: PlayerId) -> Self {
        Self {
            id,
            kind,
            source,
            controller,
            effects: Vec::new(),
            this: Vec::new(),
            sacrificed: Vec::new(),
            targeting: Vec::new(),
            field: None,
            x: 0,
            event: EventType::None,
            subject: None,
            next_group: 0,
        }
    }

    /// Unfold the effects of `composed`, in textual order.
    pub fn prepare(&mut self, composed: &Composed) {
        for effect in &composed.effects {
            self.prepare_effect(effect);
        }
    }

    /// Unfold one subject clause into effect instances.
    pub fn prepare_effect(&mut self, effect: &Effect) {
        let group = self.next_group;
        self.next_group += 1;
        match effect {
            Effect::Player(clause) => {
                let subject = clause.subject.clone().map(Match::Player);
                for e in &clause.effects {
                    let mut instance = EffectInstance::new(ConcreteEffect::Player(e.clone()), group);
                    instance.optional = clause.optional;
                    instance.subject = subject.clone();
                    self.effects.push(instance);
                }
            }
            Effect::Card(clause) => {
                let subject = clause.subject.clone().map(Match::Card);
                for e in &clause.effects {
                    let mut instance = EffectInstance::new(ConcreteEffect::Card(e.clone()), group);
                    instance.subject = subject.clone();
                    self.effects.push(instance);
                }
            }
        }
    }

    /// Drop everything produced by an earlier `prepare`, keeping bindings.
    pub fn clear_effects(&mut self) {
        self.effects.clear();
        self.next_group = 0;
    }

    /// True if any target of this instance is the given object.
    #[must_use]
    pub fn targets(&self, object: ObjectRef) -> bool {
        self.targeting.contains(&object)
    }
}

impl fmt::Display for AbilityInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} ({:?})", self.id, self.source, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Quantity;
    use crate::effects::effect::{CardSubject, PlayerSubject};
    use crate::effects::targeting::{AnyMatch, CardMatch, PlayerMatch};
    use crate::zones::Zone;

    fn instance() -> AbilityInstance {
        AbilityInstance::new(InstanceId(0), InstanceKind::Activated, CardId(3), PlayerId(0))
    }

    #[test]
    fn test_prepare_groups_clauses() {
        let composed = Composed::new(vec![
            Effect::Player(PlayerSubject {
                subject: Some(PlayerMatch::you()),
                optional: true,
                effects: vec![
                    PlayerEffect::Draw { count: Quantity::A },
                    PlayerEffect::GainLife {
                        amount: Quantity::Number(2),
                    },
                ],
            }),
            Effect::Card(CardSubject {
                subject: None,
                effects: vec![CardEffect::Damage {
                    amount: Quantity::Number(1),
                    target: AnyMatch::AnyTarget,
                }],
            }),
        ]);
        let mut inst = instance();
        inst.prepare(&composed);

        assert_eq!(inst.effects.len(), 3);
        assert_eq!(inst.effects[0].group, 0);
        assert_eq!(inst.effects[1].group, 0);
        assert!(inst.effects[1].optional);
        assert_eq!(inst.effects[2].group, 1);
        assert!(!inst.effects[2].optional);
        assert_eq!(inst.effects[2].pending, Some(Match::Any(AnyMatch::AnyTarget)));
        assert_eq!(inst.effects[2].zone, Some(ZoneMatch::one(Zone::Board)));
    }

    #[test]
    fn test_destroy_searches_board() {
        let mut inst = instance();
        inst.prepare_effect(&Effect::Player(PlayerSubject {
            subject: None,
            optional: false,
            effects: vec![PlayerEffect::Destroy {
                target: CardMatch::named(),
            }],
        }));
        let effect = &inst.effects[0];
        assert_eq!(effect.pending, Some(Match::Card(CardMatch::named())));
        assert_eq!(effect.zone, Some(ZoneMatch::one(Zone::Board)));
        assert!(effect.subject.is_none());
    }

    #[test]
    fn test_clear_effects_resets_groups() {
        let mut inst = instance();
        let draw = Effect::Player(PlayerSubject {
            subject: None,
            optional: false,
            effects: vec![PlayerEffect::Draw { count: Quantity::A }],
        });
        inst.prepare_effect(&draw);
        inst.clear_effects();
        inst.prepare_effect(&draw);
        assert_eq!(inst.effects.len(), 1);
        assert_eq!(inst.effects[0].group, 0);
    }
}
