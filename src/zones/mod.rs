//! Zones and card movement.
//!
//! ## Key Types
//!
//! - `Zone`: A player's hand, face-up, or face-down cards
//!
//! Transfers (`take_all`, `move_card`, `replenish`, ...) remove by card id
//! and are all-or-nothing, so a card is never in two places or lost.

pub mod transfer;

pub use transfer::{
    collect_pile, find_all, move_card, replenish, swap_hand_face_up, take_all, take_rank, Zone,
};
