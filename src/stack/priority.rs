//! The stack and priority bookkeeping.
//!
//! Ability instances are pushed onto a stack and resolve in LIFO order.
//! Players pass priority in seat order; when every player has passed in a
//! row, the top of the stack resolves (or, with an empty stack, the phase
//! ends).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{CardId, PlayerId};
use crate::effects::AbilityInstance;

/// LIFO stack of ability instances with priority tracking.
///
/// 1. The active player receives priority
/// 2. The holder acts any number of times; each action resets the pass count
/// 3. A pass hands priority to the next seat
/// 4. When all players have passed consecutively, the caller resolves the
///    top instance and priority returns to the active player
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PriorityStack {
    /// Index 0 is the bottom, last is the top.
    entries: Vec<AbilityInstance>,

    /// Player who currently has priority.
    current_priority: PlayerId,

    /// Players who have passed since the last action or resolution.
    consecutive_passes: usize,

    player_count: usize,

    /// Player whose turn it is.
    active: PlayerId,
}

impl PriorityStack {
    /// Priority starts with player 0.
    pub fn new(player_count: usize) -> Self {
        Self {
            entries: Vec::new(),
            current_priority: PlayerId::new(0),
            consecutive_passes: 0,
            player_count,
            active: PlayerId::new(0),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top of the stack.
    #[must_use]
    pub fn peek(&self) -> Option<&AbilityInstance> {
        self.entries.last()
    }

    /// All entries, bottom to top.
    #[must_use]
    pub fn entries(&self) -> &[AbilityInstance] {
        &self.entries
    }

    /// Entries whose source is `card`.
    pub fn sourced_by(&self, card: CardId) -> impl Iterator<Item = &AbilityInstance> {
        self.entries.iter().filter(move |e| e.source == card)
    }

    #[must_use]
    pub fn priority(&self) -> PlayerId {
        self.current_priority
    }

    #[must_use]
    pub fn active(&self) -> PlayerId {
        self.active
    }

    #[must_use]
    pub fn consecutive_passes(&self) -> usize {
        self.consecutive_passes
    }

    /// Push an instance. Passes reset; the holder keeps priority.
    pub fn push(&mut self, instance: AbilityInstance) {
        debug!("push {instance} (stack size {})", self.entries.len() + 1);
        self.entries.push(instance);
        self.consecutive_passes = 0;
    }

    /// Remove the top instance for resolution.
    pub fn pop(&mut self) -> Option<AbilityInstance> {
        self.entries.pop()
    }

    /// An action other than pushing (e.g. an instant cost ability) also
    /// restarts the pass round.
    pub fn acted(&mut self) {
        self.consecutive_passes = 0;
    }

    /// The current holder passes.
    ///
    /// Returns `true` once every player has passed in a row; priority then
    /// stays where it is until [`reset_priority`](Self::reset_priority).
    pub fn pass(&mut self) -> bool {
        self.consecutive_passes += 1;
        if self.consecutive_passes >= self.player_count {
            true
        } else {
            self.current_priority = self.current_priority.next(self.player_count);
            false
        }
    }

    /// Start a new round with the active player holding priority.
    pub fn reset_priority(&mut self, active: PlayerId) {
        self.active = active;
        self.current_priority = active;
        self.consecutive_passes = 0;
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.consecutive_passes = 0;
    }
}
