//! # ccg-rules
//!
//! A rules engine for a trading card game whose cards are written in a
//! small controlled English.
//!
//! ## Design Principles
//!
//! 1. **Card text is the program**: abilities are parsed from text into a
//!    typed AST once, then interpreted by the engine. No card has code.
//!
//! 2. **N-Player First**: seats are `PlayerId`s and per-seat state lives in
//!    a `PlayerMap`. Nothing assumes two players.
//!
//! 3. **Decisions are injected**: every choice goes through a player's
//!    `Choice` collaborator, so the same engine drives a UI, a bot or a
//!    scripted replay.
//!
//! ## Modules
//!
//! - `core`: IDs, player maps, RNG, configuration, errors
//! - `zones`: ordered piles and the slotted board
//! - `cards`: card templates, instances and the registry
//! - `parser`: card text to [`Card`]
//! - `effects`: the ability AST and ability instances
//! - `query`: evaluating match expressions against a game
//! - `triggers`: events, trigger conditions and handlers
//! - `stack`: the priority stack
//! - `game`: the [`Game`] itself, player actions and choices
//! - `rules`: turns, phases and the priority loop
//!
//! ## Example
//!
//! ```
//! use ccg_rules::{CardRegistry, FirstChoice, Game, PlayerSetup, RulesConfig};
//!
//! let (registry, errors) = CardRegistry::load(
//!     "Land\nSource\n{t}: Add {s}.\n\nRecruit {s}\nUnit - Human Soldier\n1/1\n",
//! );
//! assert!(errors.is_empty());
//!
//! let list = ["Land", "Recruit", "Land", "Recruit", "Land", "Recruit", "Land", "Recruit"];
//! let setups = vec![
//!     PlayerSetup::new(registry.deck(&list)).with_choice(Box::new(FirstChoice)),
//!     PlayerSetup::new(registry.deck(&list)).with_choice(Box::new(FirstChoice)),
//! ];
//! let mut game = Game::new(RulesConfig::default().with_max_turns(20), setups).unwrap()
//!     .with_builtins(registry.builtins().clone());
//! game.run();
//! assert!(game.turn().turn_number <= 20);
//! ```

pub mod core;
pub mod zones;
pub mod cards;
pub mod parser;
pub mod effects;
pub mod query;
pub mod triggers;
pub mod stack;
pub mod game;
pub mod rules;

// Re-export commonly used types
pub use crate::core::{CardId, EngineError, GameRng, ObjectRef, PlayerId, PlayerMap, RulesConfig};

pub use crate::zones::{Board, Pile, Zone, ZonePosition};

pub use crate::cards::{
    BuiltinAbilities, Card, CardInstance, CardKind, CardRegistry, CardType, Color, CostType, Essence, Keyword,
    Quantity, Stats, SubType,
};

pub use crate::parser::{parse, ParseError};

pub use crate::effects::{Ability, AbilityInstance, Activated, Composed, Effect, Match, Triggered};

pub use crate::query::MatchMode;

pub use crate::triggers::{EventType, GameEvent, HandlerId, Trigger};

pub use crate::stack::PriorityStack;

pub use crate::game::{Choice, ChoiceError, FirstChoice, Game, PassChoice, PlayerSetup, ScriptedChoice};

pub use crate::rules::{GameResult, Phase, TurnState};
