//! Rules configuration.
//!
//! The engine reads every tunable number from [`RulesConfig`]. Defaults match
//! the standard format; front ends may load overrides from JSON through serde.

use serde::{Deserialize, Serialize};

/// Tunable parameters of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Number of board slots per player.
    pub board_size: usize,

    /// Cards each player draws before the first turn.
    pub start_cards: usize,

    /// Life total at game start.
    pub start_life: i64,

    /// Sources a player may play per turn.
    pub sources_per_turn: u32,

    /// Re-prompts allowed for an out-of-range choice before it counts as a skip.
    pub max_prompt_retries: u32,

    /// Nested event emissions allowed before further events are dropped.
    pub max_event_depth: usize,

    /// Actions one player may take in a single priority window before a
    /// pass is forced.
    pub max_actions_per_phase: usize,

    /// Stop the game as a draw after this many turns. `None` for no limit.
    pub max_turns: Option<u32>,

    /// Seed for shuffles and the starting seat.
    pub seed: u64,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            board_size: 5,
            start_cards: 3,
            start_life: 20,
            sources_per_turn: 1,
            max_prompt_retries: 3,
            max_event_depth: 64,
            max_actions_per_phase: 256,
            max_turns: None,
            seed: 0,
        }
    }
}

impl RulesConfig {
    #[must_use]
    pub fn with_board_size(mut self, board_size: usize) -> Self {
        self.board_size = board_size;
        self
    }

    #[must_use]
    pub fn with_start_cards(mut self, start_cards: usize) -> Self {
        self.start_cards = start_cards;
        self
    }

    #[must_use]
    pub fn with_start_life(mut self, start_life: i64) -> Self {
        self.start_life = start_life;
        self
    }

    #[must_use]
    pub fn with_sources_per_turn(mut self, sources: u32) -> Self {
        self.sources_per_turn = sources;
        self
    }

    #[must_use]
    pub fn with_max_prompt_retries(mut self, retries: u32) -> Self {
        self.max_prompt_retries = retries;
        self
    }

    #[must_use]
    pub fn with_max_event_depth(mut self, depth: usize) -> Self {
        self.max_event_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_actions_per_phase(mut self, actions: usize) -> Self {
        self.max_actions_per_phase = actions;
        self
    }

    #[must_use]
    pub fn with_max_turns(mut self, turns: u32) -> Self {
        self.max_turns = Some(turns);
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RulesConfig::default();
        assert_eq!(config.board_size, 5);
        assert_eq!(config.start_cards, 3);
        assert_eq!(config.start_life, 20);
        assert_eq!(config.sources_per_turn, 1);
        assert_eq!(config.max_turns, None);
    }

    #[test]
    fn test_builder() {
        let config = RulesConfig::default()
            .with_board_size(3)
            .with_start_life(10)
            .with_max_turns(4)
            .with_seed(99);

        assert_eq!(config.board_size, 3);
        assert_eq!(config.start_life, 10);
        assert_eq!(config.max_turns, Some(4));
        assert_eq!(config.seed, 99);
    }

    #[test]
    fn test_json_round_trip() {
        let config = RulesConfig::default().with_sources_per_turn(2);
        let json = serde_json::to_string(&config).unwrap();
        let back: RulesConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RulesConfig = serde_json::from_str(r#"{"board_size": 7}"#).unwrap();
        assert_eq!(config.board_size, 7);
        assert_eq!(config.start_life, 20);
    }
}
