//! Zone transfers: moving cards between a player's zones, the pile, and the deck.
//!
//! Every transfer removes by `CardId` and is all-or-nothing: either every
//! requested card moves or nothing does. Callers run transfers only after
//! validation, inside one state transition.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::cards::{Card, CardId, Rank};
use crate::core::Player;

/// A player-owned zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Private, replenished from the deck.
    Hand,
    /// Visible to all; playable once the hand is empty.
    FaceUp,
    /// Hidden; revealed one position at a time once hand and face-up are empty.
    FaceDown,
}

impl Zone {
    /// Borrow the zone's cards on `player`.
    #[must_use]
    pub fn cards(self, player: &Player) -> &Vec<Card> {
        match self {
            Zone::Hand => &player.hand,
            Zone::FaceUp => &player.face_up,
            Zone::FaceDown => &player.face_down,
        }
    }

    /// Mutably borrow the zone's cards on `player`.
    pub fn cards_mut(self, player: &mut Player) -> &mut Vec<Card> {
        match self {
            Zone::Hand => &mut player.hand,
            Zone::FaceUp => &mut player.face_up,
            Zone::FaceDown => &mut player.face_down,
        }
    }
}

/// Look up every id in `zone`, preserving the order of `ids`.
///
/// Returns `Err(id)` with the first id that is not present.
pub fn find_all(zone: &[Card], ids: &[CardId]) -> Result<Vec<Card>, CardId> {
    ids.iter()
        .map(|&id| zone.iter().find(|c| c.id == id).copied().ok_or(id))
        .collect()
}

/// Remove every id from `zone`, returning the cards in `ids` order.
///
/// Nothing is removed unless all ids are present.
pub fn take_all(zone: &mut Vec<Card>, ids: &[CardId]) -> Result<Vec<Card>, CardId> {
    let cards = find_all(zone, ids)?;
    zone.retain(|c| !ids.contains(&c.id));
    Ok(cards)
}

/// Remove every card of `rank` from `zone`, in zone order.
pub fn take_rank(zone: &mut Vec<Card>, rank: Rank) -> Vec<Card> {
    let (taken, kept): (Vec<Card>, Vec<Card>) = zone.drain(..).partition(|c| c.rank == rank);
    *zone = kept;
    taken
}

/// Move one card between two zones of the same player.
///
/// Returns false, changing nothing, if the card is not in `from`.
pub fn move_card(player: &mut Player, id: CardId, from: Zone, to: Zone) -> bool {
    let source = from.cards_mut(player);
    let Some(pos) = source.iter().position(|c| c.id == id) else {
        return false;
    };
    let card = source.remove(pos);
    to.cards_mut(player).push(card);
    true
}

/// Exchange a hand card with a face-up card, keeping each slot's position.
///
/// Returns false, changing nothing, if either card is missing.
pub fn swap_hand_face_up(player: &mut Player, hand_card: CardId, face_up_card: CardId) -> bool {
    let hand_pos = player.hand.iter().position(|c| c.id == hand_card);
    let up_pos = player.face_up.iter().position(|c| c.id == face_up_card);
    match (hand_pos, up_pos) {
        (Some(h), Some(u)) => {
            std::mem::swap(&mut player.hand[h], &mut player.face_up[u]);
            true
        }
        _ => false,
    }
}

/// Draw from the deck front into `hand` until it holds `min_size` cards or
/// the deck runs out. Returns the number drawn.
pub fn replenish(hand: &mut Vec<Card>, deck: &mut Vector<Card>, min_size: usize) -> usize {
    let mut drawn = 0;
    while hand.len() < min_size {
        match deck.pop_front() {
            Some(card) => {
                hand.push(card);
                drawn += 1;
            }
            None => break,
        }
    }
    drawn
}

/// Move the whole pile into `hand`, leaving the pile empty.
pub fn collect_pile(hand: &mut Vec<Card>, pile: &mut Vector<Card>) -> usize {
    let count = pile.len();
    hand.extend(std::mem::take(pile));
    count
}
