//! Turn structure and game flow.
//!
//! A game runs turns; a turn runs the four [`Phase`]s; each phase runs a
//! priority loop in which players act until everyone passes in a row with
//! an empty stack. The loop itself lives in `scheduler` as methods on
//! [`Game`](crate::game::Game).

mod scheduler;

use std::fmt;

use crate::core::PlayerId;

/// Phases of a turn, in order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    #[default]
    Start,
    Draw,
    Play,
    End,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Start, Phase::Draw, Phase::Play, Phase::End];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Start => "start",
            Phase::Draw => "draw",
            Phase::Play => "play",
            Phase::End => "end",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the game is within the current turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnState {
    pub active: PlayerId,
    pub phase: Phase,
    /// 1-based once the first turn starts.
    pub turn_number: u32,
    /// Sources played by the active player this turn.
    pub sources_played: u32,
}

impl TurnState {
    #[must_use]
    pub fn new(active: PlayerId) -> Self {
        Self {
            active,
            phase: Phase::Start,
            turn_number: 0,
            sources_played: 0,
        }
    }
}

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerId),
    /// Multiple winners (shared victory).
    Winners(Vec<PlayerId>),
    /// No winner.
    Draw,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameResult::Winner(p) => *p == player,
            GameResult::Winners(ps) => ps.contains(&player),
            GameResult::Draw => false,
        }
    }

    /// Every winner, in seat order.
    #[must_use]
    pub fn winners(&self) -> Vec<PlayerId> {
        match self {
            GameResult::Winner(p) => vec![*p],
            GameResult::Winners(ps) => ps.clone(),
            GameResult::Draw => Vec::new(),
        }
    }
}
