//! Where cards live.
//!
//! Every player owns four zones: an ordered deck, hand and pile, plus a
//! board with a fixed number of slots. The stack is shared and holds ability
//! instances rather than cards; a card being cast is "on the stack" until its
//! instance resolves.
//!
//! ## Key Types
//!
//! - `Zone`: Zone tag stored on every card instance
//! - `Pile`: Ordered zone whose front is the top
//! - `Board`: Fixed-size slot array
//! - `ZonePosition`: Position specifier for ordered zones

pub mod board;
pub mod pile;

pub use board::Board;
pub use pile::{Pile, ZonePosition};

use serde::{Deserialize, Serialize};

/// Zone tag of a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Deck,
    Hand,
    Board,
    Pile,
    Stack,
}

impl Zone {
    /// Order in which queries walk a player's zones.
    pub const QUERY_ORDER: [Zone; 5] = [Zone::Board, Zone::Hand, Zone::Pile, Zone::Deck, Zone::Stack];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Zone::Deck => "deck",
            Zone::Hand => "hand",
            Zone::Board => "board",
            Zone::Pile => "pile",
            Zone::Stack => "stack",
        }
    }

    /// Parse a lower-case zone word.
    #[must_use]
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "deck" => Some(Zone::Deck),
            "hand" => Some(Zone::Hand),
            "board" => Some(Zone::Board),
            "pile" => Some(Zone::Pile),
            "stack" => Some(Zone::Stack),
            _ => None,
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_words() {
        for zone in Zone::QUERY_ORDER {
            assert_eq!(Zone::from_word(zone.name()), Some(zone));
        }
        assert_eq!(Zone::from_word("graveyard"), None);
    }
}
