//! Effect definitions.
//!
//! A printed clause is a *subject* (who or what acts) followed by one or
//! more concrete effects:
//!
//! - `PlayerSubject`: "you may draw a card, then gain 2 life"
//! - `CardSubject`: "NAME deals 1 damage to any target"
//!
//! ## Targets and costs
//!
//! `has_target()` tells whether resolving needs an interactive choice.
//! `is_cost()` tells whether the clause can be paid instantly without the
//! stack. Only `Add` is a cost among concrete effects.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::targeting::{AnyMatch, CardMatch, Match, PlayerMatch, ZoneMatch};
use crate::cards::definition::write_joined;
use crate::cards::{CardType, CostType, Quantity, Stats, SubType};
use crate::zones::Zone;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    #[must_use]
    pub const fn apply(self, value: i64) -> i64 {
        match self {
            Sign::Plus => value,
            Sign::Minus => value.saturating_neg(),
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        })
    }
}

/// Where `put` places cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PutPosition {
    Top,
    Bottom,
    Into,
}

/// Effects performed by players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerEffect {
    // === Cards ===
    Draw {
        count: Quantity,
    },
    Token {
        count: Quantity,
        stats: Option<Stats>,
        types: Vec<CardType>,
        subtypes: Vec<SubType>,
    },
    Destroy {
        target: CardMatch,
    },
    Discard {
        count: Quantity,
        filter: Option<CardMatch>,
    },
    Shuffle {
        objects: Option<CardMatch>,
        zone: ZoneMatch,
    },
    Look {
        count: Quantity,
        zone: ZoneMatch,
    },
    Put {
        objects: CardMatch,
        position: PutPosition,
        zone: ZoneMatch,
        any_order: bool,
        random_order: bool,
        deactivated: bool,
    },
    Activate {
        objects: CardMatch,
    },
    Deactivate {
        objects: CardMatch,
    },
    Sacrifice {
        objects: CardMatch,
    },

    // === Resources ===
    Add {
        essence: Vec<CostType>,
    },
    PayEssence {
        costs: Vec<CostType>,
    },
    GainLife {
        amount: Quantity,
    },
    LoseLife {
        amount: Quantity,
    },
    PayLife {
        amount: Quantity,
    },

    // === Turns ===
    ExtraTurn {
        count: Quantity,
    },
}

impl PlayerEffect {
    #[must_use]
    pub fn has_target(&self) -> bool {
        match self {
            // Shuffled objects are read at resolution, never chosen.
            PlayerEffect::Shuffle { .. } => false,
            _ => self.pending_match().is_some_and(|m| m.has_target()),
        }
    }

    #[must_use]
    pub fn is_cost(&self) -> bool {
        matches!(self, PlayerEffect::Add { .. })
    }

    /// Objects the effect acts on. Targeted ones are selected when the
    /// ability is played.
    #[must_use]
    pub fn pending_match(&self) -> Option<Match> {
        match self {
            PlayerEffect::Destroy { target } => Some(Match::Card(target.clone())),
            PlayerEffect::Shuffle { objects: Some(objects), .. }
            | PlayerEffect::Put { objects, .. }
            | PlayerEffect::Activate { objects }
            | PlayerEffect::Deactivate { objects }
            | PlayerEffect::Sacrifice { objects } => Some(Match::Card(objects.clone())),
            PlayerEffect::Discard { filter: Some(filter), .. } => Some(Match::Card(filter.clone())),
            _ => None,
        }
    }

    /// Zone restriction used while selecting objects.
    #[must_use]
    pub fn search_zone(&self) -> Option<ZoneMatch> {
        match self {
            PlayerEffect::Destroy { .. } | PlayerEffect::Sacrifice { .. } => Some(ZoneMatch::one(Zone::Board)),
            PlayerEffect::Discard { .. } => Some(ZoneMatch::one(Zone::Hand)),
            _ => None,
        }
    }

    /// Zones the effect moves cards to or reads from.
    #[must_use]
    pub fn destination(&self) -> Option<&ZoneMatch> {
        match self {
            PlayerEffect::Shuffle { zone, .. }
            | PlayerEffect::Look { zone, .. }
            | PlayerEffect::Put { zone, .. } => Some(zone),
            _ => None,
        }
    }
}

fn plural(count: Quantity) -> &'static str {
    match count {
        Quantity::A | Quantity::Number(1) => "",
        _ => "s",
    }
}

impl fmt::Display for PlayerEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerEffect::Draw { count } => write!(f, "draw {count} card{}", plural(*count)),
            PlayerEffect::Token {
                count,
                stats,
                types,
                subtypes,
            } => {
                write!(f, "create {count}")?;
                if let Some(stats) = stats {
                    write!(f, " {stats}")?;
                }
                for t in types {
                    write!(f, " {t}")?;
                }
                for s in subtypes {
                    write!(f, " {s}")?;
                }
                write!(f, " token{}", plural(*count))
            }
            PlayerEffect::Destroy { target } => write!(f, "destroy {target}"),
            PlayerEffect::Discard { count, filter } => {
                write!(f, "discard {count}")?;
                if let Some(filter) = filter {
                    write!(f, " {filter}")?;
                }
                Ok(())
            }
            PlayerEffect::Shuffle { objects, zone } => {
                f.write_str("shuffle ")?;
                if let Some(objects) = objects {
                    write!(f, "{objects} into ")?;
                }
                write!(f, "{zone}")
            }
            PlayerEffect::Look { count, zone } => write!(f, "look at the top {count} cards of {zone}"),
            PlayerEffect::Put {
                objects,
                position,
                zone,
                any_order,
                random_order,
                deactivated,
            } => {
                let position = match position {
                    PutPosition::Top => "on top of",
                    PutPosition::Bottom => "on the bottom of",
                    PutPosition::Into => "into",
                };
                write!(f, "put {objects} {position} {zone}")?;
                if *any_order {
                    f.write_str(" in any order")?;
                }
                if *random_order {
                    f.write_str(" in random order")?;
                }
                if *deactivated {
                    f.write_str(" deactivated")?;
                }
                Ok(())
            }
            PlayerEffect::Activate { objects } => write!(f, "activate {objects}"),
            PlayerEffect::Deactivate { objects } => write!(f, "deactivate {objects}"),
            PlayerEffect::Sacrifice { objects } => write!(f, "sacrifice {objects}"),
            PlayerEffect::Add { essence } => {
                f.write_str("add ")?;
                write_joined(f, essence, "")
            }
            PlayerEffect::PayEssence { costs } => {
                f.write_str("spend ")?;
                write_joined(f, costs, "")
            }
            PlayerEffect::GainLife { amount } => write!(f, "gain {amount} life"),
            PlayerEffect::LoseLife { amount } => write!(f, "lose {amount} life"),
            PlayerEffect::PayLife { amount } => write!(f, "spend {amount} life"),
            PlayerEffect::ExtraTurn { count } => write!(f, "take {count} extra turn{}", plural(*count)),
        }
    }
}

/// Effects performed by cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEffect {
    Damage {
        amount: Quantity,
        target: AnyMatch,
    },
    Gets {
        power_sign: Sign,
        power: Quantity,
        health_sign: Sign,
        health: Quantity,
    },
    /// Built-in unit attack; never printed on cards.
    Attack,
}

impl CardEffect {
    #[must_use]
    pub fn has_target(&self) -> bool {
        matches!(self, CardEffect::Damage { target, .. } if target.has_target())
    }

    #[must_use]
    pub fn is_cost(&self) -> bool {
        false
    }

    #[must_use]
    pub fn pending_match(&self) -> Option<Match> {
        match self {
            CardEffect::Damage { target, .. } => Some(Match::Any(target.clone())),
            _ => None,
        }
    }

    #[must_use]
    pub fn search_zone(&self) -> Option<ZoneMatch> {
        match self {
            CardEffect::Damage { .. } => Some(ZoneMatch::one(Zone::Board)),
            _ => None,
        }
    }
}

impl fmt::Display for CardEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardEffect::Damage { amount, target } => write!(f, "deals {amount} damage to {target}"),
            CardEffect::Gets {
                power_sign,
                power,
                health_sign,
                health,
            } => write!(f, "gets {power_sign}{power}/{health_sign}{health}"),
            CardEffect::Attack => f.write_str("attacks"),
        }
    }
}

/// `(PlayerMatch may?)? PlayerEffect (, then? PlayerEffect)*`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSubject {
    /// `None` means the controller.
    pub subject: Option<PlayerMatch>,
    /// "may": each subject player decides at resolution.
    pub optional: bool,
    pub effects: Vec<PlayerEffect>,
}

/// `CardMatch? CardEffect (, then? CardEffect)*`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSubject {
    /// `None` means the source card.
    pub subject: Option<CardMatch>,
    pub effects: Vec<CardEffect>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Player(PlayerSubject),
    Card(CardSubject),
}

impl Effect {
    #[must_use]
    pub fn has_target(&self) -> bool {
        match self {
            Effect::Player(p) => {
                p.subject.as_ref().is_some_and(PlayerMatch::has_target)
                    || p.effects.iter().any(PlayerEffect::has_target)
            }
            Effect::Card(c) => {
                c.subject.as_ref().is_some_and(CardMatch::has_target)
                    || c.effects.iter().any(CardEffect::has_target)
            }
        }
    }

    /// A targeted subject is never a cost. Otherwise the first cost effect
    /// decides, unless a targeted effect comes before it.
    #[must_use]
    pub fn is_cost(&self) -> bool {
        fn first_cost<'a, E: 'a>(
            effects: impl Iterator<Item = &'a E>,
            has_target: impl Fn(&E) -> bool,
            is_cost: impl Fn(&E) -> bool,
        ) -> bool {
            for effect in effects {
                if has_target(effect) {
                    return false;
                }
                if is_cost(effect) {
                    return true;
                }
            }
            false
        }

        match self {
            Effect::Player(p) => {
                !p.subject.as_ref().is_some_and(PlayerMatch::has_target)
                    && first_cost(p.effects.iter(), PlayerEffect::has_target, PlayerEffect::is_cost)
            }
            Effect::Card(c) => {
                !c.subject.as_ref().is_some_and(CardMatch::has_target)
                    && first_cost(c.effects.iter(), CardEffect::has_target, CardEffect::is_cost)
            }
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Player(p) => {
                if let Some(subject) = &p.subject {
                    write!(f, "{subject} ")?;
                    if p.optional {
                        f.write_str("may ")?;
                    }
                }
                write_joined(f, &p.effects, ", then ")
            }
            Effect::Card(c) => {
                if let Some(subject) = &c.subject {
                    write!(f, "{subject} ")?;
                }
                write_joined(f, &c.effects, ", then ")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Essence;
    use crate::effects::targeting::{CardFilter, Selector};

    fn add_sword() -> PlayerEffect {
        PlayerEffect::Add {
            essence: vec![CostType::Essence(Essence::Sword)],
        }
    }

    fn destroy_target() -> PlayerEffect {
        PlayerEffect::Destroy {
            target: CardMatch::filter(CardFilter::default().with_selector(Selector::Target)),
        }
    }

    fn player(effects: Vec<PlayerEffect>) -> Effect {
        Effect::Player(PlayerSubject {
            subject: None,
            optional: false,
            effects,
        })
    }

    #[test]
    fn test_add_is_cost() {
        assert!(player(vec![add_sword()]).is_cost());
        assert!(!player(vec![add_sword()]).has_target());
    }

    #[test]
    fn test_first_cost_decides() {
        let draw = PlayerEffect::Draw { count: Quantity::A };
        assert!(player(vec![draw.clone(), add_sword()]).is_cost());
        assert!(!player(vec![draw]).is_cost());
    }

    #[test]
    fn test_target_before_cost_is_not_cost() {
        let effect = player(vec![destroy_target(), add_sword()]);
        assert!(effect.has_target());
        assert!(!effect.is_cost());
    }

    #[test]
    fn test_shuffle_never_targets() {
        let PlayerEffect::Destroy { target } = destroy_target() else {
            unreachable!()
        };
        let shuffle = PlayerEffect::Shuffle {
            objects: Some(target.clone()),
            zone: ZoneMatch::one(Zone::Deck),
        };
        assert!(!shuffle.has_target());
        assert_eq!(shuffle.pending_match(), Some(Match::Card(target)));
        assert!(!player(vec![shuffle]).has_target());
    }

    #[test]
    fn test_card_damage_target() {
        let effect = Effect::Card(CardSubject {
            subject: None,
            effects: vec![CardEffect::Damage {
                amount: Quantity::Number(1),
                target: AnyMatch::AnyTarget,
            }],
        });
        assert!(effect.has_target());
        assert!(!effect.is_cost());
        assert_eq!(effect.to_string(), "deals 1 damage to any target");
    }

    #[test]
    fn test_display() {
        let effect = Effect::Player(PlayerSubject {
            subject: Some(PlayerMatch::you()),
            optional: true,
            effects: vec![PlayerEffect::Draw { count: Quantity::Number(2) }, add_sword()],
        });
        assert_eq!(effect.to_string(), "you may draw 2 cards, then add {s}");
    }
}
