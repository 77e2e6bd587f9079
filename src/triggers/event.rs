//! Game events.
//!
//! Every state transition that abilities can react to emits a
//! [`GameEvent`]. Events are synchronous: triggers and handlers run before
//! the emitting operation returns.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{CardId, ObjectRef};

/// Kind of event, in a fixed order with stable names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventType {
    /// No event is being processed.
    None,
    /// Handler wildcard; never emitted.
    All,

    // === Phases ===
    StartPhase,
    DrawPhase,
    PlayPhase,
    EndPhase,

    // === Cards ===
    Draw,
    Play,
    EnterBoard,
    LeaveBoard,
    Destroy,
    Sacrifice,
    Target,
    Activate,
    Deactivate,

    // === Combat ===
    Attack,
    Block,
    Damage,
    PlayerDamage,
    Heal,
    Counter,
    Discard,

    // === Players ===
    LoseLife,
    GainLife,
    Win,
    Lose,
}

impl EventType {
    pub const ALL: [EventType; 26] = [
        EventType::None,
        EventType::All,
        EventType::StartPhase,
        EventType::DrawPhase,
        EventType::PlayPhase,
        EventType::EndPhase,
        EventType::Draw,
        EventType::Play,
        EventType::EnterBoard,
        EventType::LeaveBoard,
        EventType::Destroy,
        EventType::Sacrifice,
        EventType::Target,
        EventType::Activate,
        EventType::Deactivate,
        EventType::Attack,
        EventType::Block,
        EventType::Damage,
        EventType::PlayerDamage,
        EventType::Heal,
        EventType::Counter,
        EventType::Discard,
        EventType::LoseLife,
        EventType::GainLife,
        EventType::Win,
        EventType::Lose,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            EventType::None => "none",
            EventType::All => "all",
            EventType::StartPhase => "start-phase",
            EventType::DrawPhase => "draw-phase",
            EventType::PlayPhase => "play-phase",
            EventType::EndPhase => "end-phase",
            EventType::Draw => "draw",
            EventType::Play => "play",
            EventType::EnterBoard => "enter-board",
            EventType::LeaveBoard => "leave-board",
            EventType::Destroy => "destroy",
            EventType::Sacrifice => "sacrifice",
            EventType::Target => "target",
            EventType::Activate => "activate",
            EventType::Deactivate => "deactivate",
            EventType::Attack => "attack",
            EventType::Block => "block",
            EventType::Damage => "damage",
            EventType::PlayerDamage => "player-damage",
            EventType::Heal => "heal",
            EventType::Counter => "counter",
            EventType::Discard => "discard",
            EventType::LoseLife => "lose-life",
            EventType::GainLife => "gain-life",
            EventType::Win => "win",
            EventType::Lose => "lose",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        EventType::ALL.into_iter().find(|e| e.name() == name)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An emitted event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub event_type: EventType,

    /// Source card of the ability that was resolving, if any.
    pub source: Option<CardId>,

    /// The player or card the event happened to.
    pub subject: ObjectRef,
}

impl GameEvent {
    pub fn new(event_type: EventType, subject: impl Into<ObjectRef>) -> Self {
        Self {
            event_type,
            source: None,
            subject: subject.into(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: Option<CardId>) -> Self {
        self.source = source;
        self
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.event_type, self.subject)?;
        if let Some(source) = self.source {
            write!(f, " from {source}")?;
        }
        Ok(())
    }
}
