//! Core engine types: identifiers, per-seat storage, RNG, configuration, errors.

pub mod entity;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{CardId, ObjectRef, PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::RulesConfig;
pub use error::{EngineError, Result};
