//! Query and matching engine.
//!
//! Match expressions parsed from card text (see
//! [`targeting`](crate::effects::targeting)) are evaluated here against the
//! live game, always relative to an [`AbilityInstance`](crate::effects::AbilityInstance):
//! "you" is its controller, "NAME" its source, "this" its bound objects and
//! "target" its picked targets.
//!
//! ## Modes
//!
//! - [`MatchMode::Bound`]: target designators only accept what the
//!   instance has already picked. Used at resolution.
//! - [`MatchMode::Candidates`]: target designators accept anything, so the
//!   legal choices for a pick can be listed.
//!
//! ## Result order
//!
//! [`Game::query`](crate::game::Game::query) lists players in seat order
//! first, then for each player their board, hand, pile and deck, then cards
//! they own that source a stack entry.

mod engine;
mod matcher;

pub(crate) use matcher::numerical_value;

/// How target designators are evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchMode {
    /// Only already-picked targets satisfy "target".
    Bound,
    /// Every object satisfies "target".
    Candidates,
}
