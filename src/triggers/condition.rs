//! Trigger and condition expressions.
//!
//! A trigger names the event it waits for and a predicate over the event's
//! subject. Evaluation against a live game lives in `firing`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::EventType;
use crate::effects::targeting::{CardMatch, Compare, Numerical, PlayerMatch};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// "when you play X"
    Play(CardMatch),
    /// "when P gains life"
    GainLife(PlayerMatch),
    /// "when P loses life"
    LoseLife(PlayerMatch),
    /// "when X is dealt damage"
    DealtDamage(CardMatch),
    Condition(Condition),
}

impl Trigger {
    /// The event type this trigger listens to. `None` for state conditions,
    /// which are checked on the events described in `Condition::event_type`.
    #[must_use]
    pub fn event_type(&self) -> Option<EventType> {
        match self {
            Trigger::Play(_) => Some(EventType::Play),
            Trigger::GainLife(_) => Some(EventType::GainLife),
            Trigger::LoseLife(_) => Some(EventType::LoseLife),
            Trigger::DealtDamage(_) => Some(EventType::Damage),
            Trigger::Condition(c) => c.event_type(),
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("when ")?;
        match self {
            Trigger::Play(m) => write!(f, "you play {m}"),
            Trigger::GainLife(m) => write!(f, "{m} gains life"),
            Trigger::LoseLife(m) => write!(f, "{m} loses life"),
            Trigger::DealtDamage(m) => write!(f, "{m} is dealt damage"),
            Trigger::Condition(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAction {
    Sacrifice(CardMatch),
    Draw,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardAction {
    EntersBoard,
    LeavesBoard,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    YourTurn,
    NotYourTurn,
    Player { who: PlayerMatch, action: PlayerAction },
    Card { which: CardMatch, action: CardAction },
    /// The source card's stat compared to a count.
    Numerical { numerical: Numerical, compare: Compare },
}

impl Condition {
    /// Turn conditions are checked at the start phase. Numeric conditions
    /// are checked on any event about the source card.
    #[must_use]
    pub fn event_type(&self) -> Option<EventType> {
        match self {
            Condition::YourTurn | Condition::NotYourTurn => Some(EventType::StartPhase),
            Condition::Player {
                action: PlayerAction::Sacrifice(_),
                ..
            } => Some(EventType::Sacrifice),
            Condition::Player {
                action: PlayerAction::Draw,
                ..
            } => Some(EventType::Draw),
            Condition::Card {
                action: CardAction::EntersBoard,
                ..
            } => Some(EventType::EnterBoard),
            Condition::Card {
                action: CardAction::LeavesBoard,
                ..
            } => Some(EventType::LeaveBoard),
            Condition::Numerical { .. } => None,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::YourTurn => f.write_str("it's your turn"),
            Condition::NotYourTurn => f.write_str("it's not your turn"),
            Condition::Player { who, action } => match action {
                PlayerAction::Sacrifice(m) => write!(f, "{who} sacrifices {m}"),
                PlayerAction::Draw => write!(f, "{who} draws a card"),
            },
            Condition::Card { which, action } => match action {
                CardAction::EntersBoard => write!(f, "{which} is put on the board"),
                CardAction::LeavesBoard => write!(f, "{which} leaves the board"),
            },
            Condition::Numerical { numerical, compare } => write!(f, "{numerical} is {compare}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        let enters = Trigger::Condition(Condition::Card {
            which: CardMatch::named(),
            action: CardAction::EntersBoard,
        });
        assert_eq!(enters.event_type(), Some(EventType::EnterBoard));
        assert_eq!(Trigger::GainLife(PlayerMatch::you()).event_type(), Some(EventType::GainLife));
        assert_eq!(Trigger::Condition(Condition::YourTurn).event_type(), Some(EventType::StartPhase));
    }

    #[test]
    fn test_display() {
        let enters = Trigger::Condition(Condition::Card {
            which: CardMatch::named(),
            action: CardAction::EntersBoard,
        });
        assert_eq!(enters.to_string(), "when NAME is put on the board");
        assert_eq!(
            Trigger::Condition(Condition::NotYourTurn).to_string(),
            "when it's not your turn"
        );
    }
}
