//! Ability and effect model.
//!
//! - `ability`: the four ability shapes a card sentence can take
//! - `effect`: subject clauses and concrete player/card effects
//! - `targeting`: match expressions naming players, cards and zones
//! - `instance`: ability and effect instances built when abilities are played
//! - `resolver`: the game-side halves, picking and resolving instances
//!
//! Every kind is a closed enum. `has_target()` and `is_cost()` are answered
//! structurally, without a game.

pub mod ability;
pub mod effect;
pub mod instance;
mod resolver;
pub mod targeting;

pub use ability::{Ability, AbilityCost, Activated, Composed, Triggered};
pub use effect::{CardEffect, CardSubject, Effect, PlayerEffect, PlayerSubject, PutPosition, Sign};
pub use instance::{AbilityInstance, ConcreteEffect, EffectInstance, InstanceId, InstanceKind};
pub use targeting::{
    AnyMatch, CardFilter, CardMatch, CardTypeMatch, Compare, Count, Direction, Match, Numerical,
    PlayerMatch, PlayerTypeMatch, Prefix, Selector, With, ZoneMatch,
};
