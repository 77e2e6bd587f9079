//! Engine error taxonomy.

use thiserror::Error;

use super::{CardId, PlayerId};
use crate::zones::Zone;

/// Errors returned by state-changing game operations.
///
/// A failed operation leaves the game state as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("{card} cannot move from {from} to {to}: {reason}")]
    IllegalZoneTransition {
        card: CardId,
        from: Zone,
        to: Zone,
        reason: &'static str,
    },

    #[error("cannot pay the costs of {card}")]
    InsufficientResources { card: CardId },

    #[error("{player} chose option {index} of {options}")]
    InvalidChoice {
        player: PlayerId,
        index: usize,
        options: usize,
    },

    #[error("{card} cannot be played now: {reason}")]
    NotPlayable { card: CardId, reason: &'static str },

    #[error("a game needs 1 to 255 players, got {0}")]
    PlayerCount(usize),

    #[error("{player} does not hold priority")]
    NotYourPriority { player: PlayerId },

    #[error("unknown card {0}")]
    UnknownCard(CardId),
}

impl EngineError {
    /// True for errors caused by a bad request rather than by game state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidChoice { .. }
                | EngineError::NotYourPriority { .. }
                | EngineError::NotPlayable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
