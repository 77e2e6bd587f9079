//! Identifiers for the things a rule can point at.
//!
//! ## Card and player handles
//!
//! Card instances live in a single arena owned by the game and are addressed
//! by [`CardId`]. Players are addressed by seat with [`PlayerId`]. Matches,
//! targets and event subjects can refer to either, so both are wrapped in
//! [`ObjectRef`].
//!
//! ```
//! use ccg_rules::core::{CardId, ObjectRef, PlayerId};
//!
//! let card = ObjectRef::from(CardId(7));
//! let player = ObjectRef::from(PlayerId::new(1));
//!
//! assert_eq!(card.as_card(), Some(CardId(7)));
//! assert_eq!(player.as_player(), Some(PlayerId::new(1)));
//! assert!(card.as_player().is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Handle of a card instance in the game's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Position in the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Seat of a player, 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Seat that follows this one, wrapping at `player_count`.
    ///
    /// ```
    /// use ccg_rules::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(0).next(3), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(2).next(3), PlayerId::new(0));
    /// ```
    #[must_use]
    pub fn next(self, player_count: usize) -> Self {
        Self(((self.index() + 1) % player_count.max(1)) as u8)
    }

    /// All seats of a game with `player_count` players, in turn order.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..=u8::MAX).take(player_count).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Anything a match can select: a player or a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectRef {
    Player(PlayerId),
    Card(CardId),
}

impl ObjectRef {
    #[must_use]
    pub const fn as_card(self) -> Option<CardId> {
        match self {
            ObjectRef::Card(card) => Some(card),
            ObjectRef::Player(_) => None,
        }
    }

    #[must_use]
    pub const fn as_player(self) -> Option<PlayerId> {
        match self {
            ObjectRef::Player(player) => Some(player),
            ObjectRef::Card(_) => None,
        }
    }

    #[must_use]
    pub const fn is_card(self) -> bool {
        matches!(self, ObjectRef::Card(_))
    }
}

impl From<CardId> for ObjectRef {
    fn from(card: CardId) -> Self {
        ObjectRef::Card(card)
    }
}

impl From<PlayerId> for ObjectRef {
    fn from(player: PlayerId) -> Self {
        ObjectRef::Player(player)
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectRef::Player(player) => write!(f, "{player}"),
            ObjectRef::Card(card) => write!(f, "{card}"),
        }
    }
}

/// One value per seat, indexed by [`PlayerId`].
///
/// ```
/// use ccg_rules::core::{PlayerId, PlayerMap};
///
/// let mut life = PlayerMap::new(2, |_| 20);
/// life[PlayerId::new(1)] -= 3;
/// assert_eq!(life[PlayerId::new(1)], 17);
/// assert_eq!(life.player_count(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    seats: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build one entry per seat from a factory.
    pub fn new(player_count: usize, factory: impl FnMut(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");
        Self {
            seats: PlayerId::all(player_count).map(factory).collect(),
        }
    }

    /// Take ownership of already-built per-seat values.
    pub fn from_vec(seats: Vec<T>) -> Self {
        assert!(!seats.is_empty(), "Must have at least 1 player");
        assert!(seats.len() <= 255, "At most 255 players supported");
        Self { seats }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.seats.get(player.index())
    }

    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.seats.get_mut(player.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.seats
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.seats
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.seats.len())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.seats[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.seats[player.index()]
    }
}
