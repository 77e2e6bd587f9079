//! Player decisions.
//!
//! Every decision the rules leave to a player goes through the player's
//! [`Choice`] collaborator. A collaborator answers with an index into the
//! offered options, `Ok(None)` to skip, or an error. Skips and errors both
//! mean "decline"; out-of-range answers are re-asked a few times and then
//! treated as a skip.

use log::{debug, warn};
use std::collections::VecDeque;
use thiserror::Error;

use super::Game;
use crate::core::{CardId, EngineError, ObjectRef, PlayerId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("choice declined")]
    Declined,

    #[error("player disconnected")]
    Disconnected,

    #[error("{0}")]
    Other(String),
}

pub type ChoiceResult<T> = Result<Option<T>, ChoiceError>;

/// A player's decision maker: a UI, a network peer or a bot.
pub trait Choice {
    /// Which card to act with.
    fn card(&mut self, player: PlayerId, options: &[CardId]) -> ChoiceResult<usize>;

    /// One of several labelled modes, e.g. "cast" or "play as source".
    fn mode(&mut self, player: PlayerId, options: &[String]) -> ChoiceResult<usize>;

    /// A free board slot.
    fn field(&mut self, player: PlayerId, options: &[usize]) -> ChoiceResult<usize>;

    /// Which ability of `card` to activate.
    fn ability(&mut self, player: PlayerId, card: CardId, options: &[String]) -> ChoiceResult<usize>;

    /// Up to `count` targets.
    fn target(&mut self, player: PlayerId, options: &[ObjectRef], count: usize) -> ChoiceResult<Vec<usize>>;

    /// Exactly `count` cards to discard, or fewer if there are not enough.
    fn discard(&mut self, player: PlayerId, options: &[CardId], count: usize) -> ChoiceResult<Vec<usize>>;

    /// Cards shown to the player.
    fn reveal(&mut self, _player: PlayerId, _cards: &[CardId]) {}
}

/// Declines everything. A player with this collaborator only passes.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassChoice;

impl Choice for PassChoice {
    fn card(&mut self, _: PlayerId, _: &[CardId]) -> ChoiceResult<usize> {
        Ok(None)
    }

    fn mode(&mut self, _: PlayerId, _: &[String]) -> ChoiceResult<usize> {
        Ok(None)
    }

    fn field(&mut self, _: PlayerId, _: &[usize]) -> ChoiceResult<usize> {
        Ok(None)
    }

    fn ability(&mut self, _: PlayerId, _: CardId, _: &[String]) -> ChoiceResult<usize> {
        Ok(None)
    }

    fn target(&mut self, _: PlayerId, _: &[ObjectRef], _: usize) -> ChoiceResult<Vec<usize>> {
        Ok(None)
    }

    fn discard(&mut self, _: PlayerId, _: &[CardId], _: usize) -> ChoiceResult<Vec<usize>> {
        Ok(None)
    }
}

/// Always takes the first option. Deterministic and greedy.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstChoice;

fn first(len: usize) -> ChoiceResult<usize> {
    Ok((len > 0).then_some(0))
}

fn first_n(len: usize, count: usize) -> ChoiceResult<Vec<usize>> {
    Ok((len > 0).then(|| (0..count.min(len)).collect()))
}

impl Choice for FirstChoice {
    fn card(&mut self, _: PlayerId, options: &[CardId]) -> ChoiceResult<usize> {
        first(options.len())
    }

    fn mode(&mut self, _: PlayerId, options: &[String]) -> ChoiceResult<usize> {
        first(options.len())
    }

    fn field(&mut self, _: PlayerId, options: &[usize]) -> ChoiceResult<usize> {
        first(options.len())
    }

    fn ability(&mut self, _: PlayerId, _: CardId, options: &[String]) -> ChoiceResult<usize> {
        first(options.len())
    }

    fn target(&mut self, _: PlayerId, options: &[ObjectRef], count: usize) -> ChoiceResult<Vec<usize>> {
        first_n(options.len(), count)
    }

    fn discard(&mut self, _: PlayerId, options: &[CardId], count: usize) -> ChoiceResult<Vec<usize>> {
        first_n(options.len(), count)
    }
}

/// One recorded answer for [`ScriptedChoice`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    Pick(usize),
    Many(Vec<usize>),
    Skip,
    Fail(ChoiceError),
}

/// Replays a queue of answers, then skips.
///
/// Any prompt consumes the next answer. `Pick(i)` answers a multi-select
/// prompt as `[i]`.
#[derive(Clone, Debug, Default)]
pub struct ScriptedChoice {
    answers: VecDeque<Answer>,
    revealed: Vec<CardId>,
}

impl ScriptedChoice {
    #[must_use]
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            revealed: Vec::new(),
        }
    }

    /// Shorthand for a script of single picks.
    #[must_use]
    pub fn picks(indices: impl IntoIterator<Item = usize>) -> Self {
        Self::new(indices.into_iter().map(Answer::Pick))
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    /// Every card revealed to this player so far.
    #[must_use]
    pub fn revealed(&self) -> &[CardId] {
        &self.revealed
    }

    fn one(&mut self) -> ChoiceResult<usize> {
        match self.answers.pop_front() {
            Some(Answer::Pick(i)) => Ok(Some(i)),
            Some(Answer::Many(v)) => Ok(v.first().copied()),
            Some(Answer::Fail(e)) => Err(e),
            Some(Answer::Skip) | None => Ok(None),
        }
    }

    fn many(&mut self) -> ChoiceResult<Vec<usize>> {
        match self.answers.pop_front() {
            Some(Answer::Pick(i)) => Ok(Some(vec![i])),
            Some(Answer::Many(v)) => Ok(Some(v)),
            Some(Answer::Fail(e)) => Err(e),
            Some(Answer::Skip) | None => Ok(None),
        }
    }
}

impl Choice for ScriptedChoice {
    fn card(&mut self, _: PlayerId, _: &[CardId]) -> ChoiceResult<usize> {
        self.one()
    }

    fn mode(&mut self, _: PlayerId, _: &[String]) -> ChoiceResult<usize> {
        self.one()
    }

    fn field(&mut self, _: PlayerId, _: &[usize]) -> ChoiceResult<usize> {
        self.one()
    }

    fn ability(&mut self, _: PlayerId, _: CardId, _: &[String]) -> ChoiceResult<usize> {
        self.one()
    }

    fn target(&mut self, _: PlayerId, _: &[ObjectRef], _: usize) -> ChoiceResult<Vec<usize>> {
        self.many()
    }

    fn discard(&mut self, _: PlayerId, _: &[CardId], _: usize) -> ChoiceResult<Vec<usize>> {
        self.many()
    }

    fn reveal(&mut self, _: PlayerId, cards: &[CardId]) {
        self.revealed.extend_from_slice(cards);
    }
}

// ── Prompting ────────────────────────────────────────────────────

impl Game {
    /// Ask `player` for one of `len` options. `None` means declined.
    pub(crate) fn choose_one(
        &mut self,
        player: PlayerId,
        len: usize,
        mut ask: impl FnMut(&mut dyn Choice) -> ChoiceResult<usize>,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }
        for _ in 0..=self.config.max_prompt_retries {
            let chooser = self.choosers.get_mut(player)?;
            match ask(chooser.as_mut()) {
                Ok(Some(index)) if index < len => return Some(index),
                Ok(Some(index)) => {
                    warn!("{}", EngineError::InvalidChoice { player, index, options: len });
                }
                Ok(None) => return None,
                Err(e) => {
                    debug!("{player} declined: {e}");
                    return None;
                }
            }
        }
        None
    }

    /// Ask `player` for up to `count` distinct options out of `len`.
    pub(crate) fn choose_many(
        &mut self,
        player: PlayerId,
        len: usize,
        count: usize,
        mut ask: impl FnMut(&mut dyn Choice) -> ChoiceResult<Vec<usize>>,
    ) -> Vec<usize> {
        if len == 0 || count == 0 {
            return Vec::new();
        }
        for _ in 0..=self.config.max_prompt_retries {
            let Some(chooser) = self.choosers.get_mut(player) else {
                return Vec::new();
            };
            match ask(chooser.as_mut()) {
                Ok(Some(indices)) => {
                    if let Some(&index) = indices.iter().find(|&&i| i >= len) {
                        warn!("{}", EngineError::InvalidChoice { player, index, options: len });
                        continue;
                    }
                    let mut chosen: Vec<usize> = Vec::with_capacity(count);
                    for i in indices {
                        if !chosen.contains(&i) && chosen.len() < count {
                            chosen.push(i);
                        }
                    }
                    return chosen;
                }
                Ok(None) => return Vec::new(),
                Err(e) => {
                    debug!("{player} declined: {e}");
                    return Vec::new();
                }
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_choice() {
        let mut bot = FirstChoice;
        assert_eq!(bot.card(PlayerId(0), &[CardId(4), CardId(5)]), Ok(Some(0)));
        assert_eq!(bot.card(PlayerId(0), &[]), Ok(None));
        assert_eq!(bot.discard(PlayerId(0), &[CardId(1), CardId(2), CardId(3)], 2), Ok(Some(vec![0, 1])));
    }

    #[test]
    fn test_scripted_choice() {
        let mut script = ScriptedChoice::new([
            Answer::Pick(2),
            Answer::Skip,
            Answer::Fail(ChoiceError::Disconnected),
            Answer::Pick(1),
        ]);
        assert_eq!(script.mode(PlayerId(0), &[]), Ok(Some(2)));
        assert_eq!(script.field(PlayerId(0), &[]), Ok(None));
        assert_eq!(script.card(PlayerId(0), &[]), Err(ChoiceError::Disconnected));
        assert_eq!(script.target(PlayerId(0), &[], 1), Ok(Some(vec![1])));
        assert_eq!(script.remaining(), 0);
        assert_eq!(script.card(PlayerId(0), &[]), Ok(None));
    }

    #[test]
    fn test_pass_choice() {
        let mut pass = PassChoice;
        assert_eq!(pass.mode(PlayerId(1), &["a".to_string()]), Ok(None));
    }
}
