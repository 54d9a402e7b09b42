//! Card values: id, suit, and rank.
//!
//! A `Card` is an immutable value. Its `CardId` is unique within one deck and
//! stable for the card's lifetime, so collections remove cards by id rather
//! than by suit and rank.

use serde::{Deserialize, Serialize};

/// Unique identifier for a card within one deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Card suit. Suits never affect legality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    /// All four suits in deck-building order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

/// Card rank in `2..=14` (11 = J, 12 = Q, 13 = K, 14 = A).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(pub u8);

impl Rank {
    pub const TWO: Rank = Rank(2);
    pub const SEVEN: Rank = Rank(7);
    pub const TEN: Rank = Rank(10);
    pub const JACK: Rank = Rank(11);
    pub const QUEEN: Rank = Rank(12);
    pub const KING: Rank = Rank(13);
    pub const ACE: Rank = Rank(14);

    /// Lowest rank in the deck.
    pub const MIN: Rank = Rank::TWO;
    /// Highest rank in the deck.
    pub const MAX: Rank = Rank::ACE;

    /// Create a rank, returning `None` outside `2..=14`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= Self::MIN.0 && value <= Self::MAX.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Get the raw rank value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Iterate over every rank from 2 to ace.
    pub fn all() -> impl Iterator<Item = Rank> {
        (Self::MIN.0..=Self::MAX.0).map(Rank)
    }

    /// Wildcards and pile-clearers: 2 and 10.
    #[must_use]
    pub const fn is_special(self) -> bool {
        self.0 == Self::TWO.0 || self.0 == Self::TEN.0
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            11 => write!(f, "J"),
            12 => write!(f, "Q"),
            13 => write!(f, "K"),
            14 => write!(f, "A"),
            n => write!(f, "{n}"),
        }
    }
}

/// A single playing card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    #[must_use]
    pub const fn new(id: CardId, suit: Suit, rank: Rank) -> Self {
        Self { id, suit, rank }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let suit = match self.suit {
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Spades => 's',
        };
        write!(f, "{}{}", self.rank, suit)
    }
}
