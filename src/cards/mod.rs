//! Cards and the deck.
//!
//! ## Key Types
//!
//! - `CardId`: Unique id within one deck
//! - `Rank`, `Suit`: Card values (only rank affects the rules)
//! - `Card`: Immutable id + suit + rank
//!
//! The `deck` module builds the shuffled 52-card deck and deals it.

pub mod card;
pub mod deck;

pub use card::{Card, CardId, Rank, Suit};
pub use deck::{auto_face_up, build_deck, deal, ordered_deck, DECK_SIZE};
