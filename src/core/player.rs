//! Player identification, per-player storage, and the player's card zones.
//!
//! ## PlayerId
//!
//! Seat index, which is also the turn order.
//!
//! ## PlayerMap
//!
//! Per-player data storage backed by `Vec` for O(1) access.
//!
//! ## Player
//!
//! Name, AI flag, and the three private zones: hand, face-down, face-up.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::cards::{Card, CardId, Rank};

/// Player identifier. Indices are 0-based and equal to turn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The player after this one, wrapping at `player_count`.
    #[must_use]
    pub const fn next(self, player_count: usize) -> Self {
        Self(((self.0 as usize + 1) % player_count) as u8)
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use shithead::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(4).collect();
    /// assert_eq!(players.len(), 4);
    /// assert_eq!(players[3], PlayerId::new(3));
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use shithead::core::{PlayerId, PlayerMap};
///
/// let mut score: PlayerMap<i32> = PlayerMap::new(4, |_| 0);
/// score[PlayerId::new(1)] = 15;
/// assert_eq!(score[PlayerId::new(1)], 15);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();

        Self { data }
    }

    /// Build from an existing vector, one entry per seat in turn order.
    pub fn from_vec(data: Vec<T>) -> Self {
        assert!(!data.is_empty(), "Must have at least 1 player");
        assert!(data.len() <= 255, "At most 255 players supported");
        Self { data }
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default(player_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(player_count, |_| T::default())
    }

    /// Get the number of players.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Get a reference to a player's data, `None` for an unknown seat.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Get a mutable reference to a player's data, `None` for an unknown seat.
    pub fn get_mut(&mut self, player: PlayerId) -> Option<&mut T> {
        self.data.get_mut(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data.iter().enumerate().map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over (PlayerId, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.data
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over all player IDs.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// A seated participant and their three card zones.
///
/// `hand` order only matters for display. `face_down` order is position:
/// each slot is revealed independently and the zone only ever shrinks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_ai: bool,
    pub hand: Vec<Card>,
    pub face_down: Vec<Card>,
    pub face_up: Vec<Card>,
    /// Set once the player has locked in their face-up cards during setup.
    pub face_up_confirmed: bool,
}

impl Player {
    /// Create a player with empty zones.
    pub fn new(id: PlayerId, name: impl Into<String>, is_ai: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_ai,
            hand: Vec::new(),
            face_down: Vec::new(),
            face_up: Vec::new(),
            face_up_confirmed: false,
        }
    }

    /// Total cards held across all three zones.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.hand.len() + self.face_down.len() + self.face_up.len()
    }

    /// True once hand, face-up, and face-down are all empty.
    #[must_use]
    pub fn is_out(&self) -> bool {
        self.card_count() == 0
    }

    /// True if any hand card has the given rank.
    #[must_use]
    pub fn holds_rank_in_hand(&self, rank: Rank) -> bool {
        self.hand.iter().any(|c| c.rank == rank)
    }

    /// Find a hand card by id.
    #[must_use]
    pub fn hand_card(&self, id: CardId) -> Option<&Card> {
        self.hand.iter().find(|c| c.id == id)
    }

    /// Find a face-up card by id.
    #[must_use]
    pub fn face_up_card(&self, id: CardId) -> Option<&Card> {
        self.face_up.iter().find(|c| c.id == id)
    }
}
