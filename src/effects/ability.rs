//! Abilities: what a printed sentence on a card can be.
//!
//! - `Keyword`: a static tag such as "fly"
//! - `Composed`: effects that happen when the card itself resolves
//! - `Activated`: `costs: effects` usable while the card is on the board
//! - `Triggered`: `when ..., effects` fired by game events

use serde::{Deserialize, Serialize};
use std::fmt;

use super::effect::Effect;
use crate::cards::definition::write_joined;
use crate::cards::{CostType, Keyword};
use crate::triggers::Trigger;

/// Effects in textual order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composed {
    pub effects: Vec<Effect>,
}

impl Composed {
    #[must_use]
    pub fn new(effects: Vec<Effect>) -> Self {
        Self { effects }
    }

    #[must_use]
    pub fn has_target(&self) -> bool {
        self.effects.iter().any(Effect::has_target)
    }

    #[must_use]
    pub fn is_cost(&self) -> bool {
        !self.has_target() && self.effects.iter().all(Effect::is_cost)
    }
}

impl fmt::Display for Composed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.effects, ", then ")?;
        f.write_str(".")
    }
}

/// One element before the colon of an activated ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityCost {
    Cost(CostType),
    /// An action paid as a cost, e.g. "sacrifice a unit".
    Effect(Effect),
}

impl fmt::Display for AbilityCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityCost::Cost(c) => write!(f, "{c}"),
            AbilityCost::Effect(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activated {
    pub costs: Vec<AbilityCost>,
    pub effect: Composed,
}

impl Activated {
    #[must_use]
    pub fn new(costs: Vec<AbilityCost>, effect: Composed) -> Self {
        Self { costs, effect }
    }

    /// Cost symbols before the colon.
    pub fn resource_costs(&self) -> impl Iterator<Item = CostType> + '_ {
        self.costs.iter().filter_map(|c| match c {
            AbilityCost::Cost(cost) => Some(*cost),
            AbilityCost::Effect(_) => None,
        })
    }

    /// Actions before the colon.
    pub fn effect_costs(&self) -> impl Iterator<Item = &Effect> {
        self.costs.iter().filter_map(|c| match c {
            AbilityCost::Effect(e) => Some(e),
            AbilityCost::Cost(_) => None,
        })
    }

    /// Cost abilities resolve on activation and never use the stack.
    #[must_use]
    pub fn is_cost(&self) -> bool {
        !self.effect.has_target() && self.effect.is_cost()
    }
}

impl fmt::Display for Activated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.costs, " ")?;
        write!(f, ": {}", self.effect)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triggered {
    pub trigger: Trigger,
    pub effect: Composed,
}

impl fmt::Display for Triggered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.trigger, self.effect)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    Keyword(Keyword),
    Composed(Composed),
    Activated(Activated),
    Triggered(Triggered),
}

impl Ability {
    #[must_use]
    pub fn has_target(&self) -> bool {
        match self {
            Ability::Keyword(_) => false,
            Ability::Composed(c) => c.has_target(),
            Ability::Activated(a) => a.effect.has_target(),
            Ability::Triggered(t) => t.effect.has_target(),
        }
    }

    #[must_use]
    pub fn is_cost(&self) -> bool {
        match self {
            Ability::Keyword(_) => false,
            Ability::Composed(c) => c.is_cost(),
            Ability::Activated(a) => a.is_cost(),
            Ability::Triggered(t) => t.effect.is_cost(),
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ability::Keyword(k) => write!(f, "{k}"),
            Ability::Composed(c) => write!(f, "{c}"),
            Ability::Activated(a) => write!(f, "{a}"),
            Ability::Triggered(t) => write!(f, "{t}"),
        }
    }
}
