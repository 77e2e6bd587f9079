//! Trigger system for event-driven abilities.
//!
//! ## Key Components
//!
//! - [`EventType`] / [`GameEvent`]: what happened, to whom, from which source
//! - [`Trigger`] / [`Condition`]: the "when ..." half of a triggered ability
//! - [`EventBus`]: handlers registered by front ends
//! - `firing`: emitting events, matching triggers and playing what fires
//!
//! ## Firing
//!
//! Every emitted event is offered to each card on each board, in seat and
//! slot order. A triggered ability whose trigger matches binds the event
//! subject as "this" and is played like an activated ability. Handlers run
//! after triggers.

pub mod condition;
pub mod event;
mod firing;
pub mod registry;

pub use condition::{CardAction, Condition, PlayerAction, Trigger};
pub use event::{EventType, GameEvent};
pub use registry::{EventBus, EventHandler, HandlerId};
