//! Legality: the effective top of the pile and what may be played on it.
//!
//! ## Rules
//!
//! - Empty effective top: anything goes.
//! - 2 is wild and resets the pile: after a 2 the next play is unconstrained.
//! - 10 may always be played (and burns the pile).
//! - On a 7, only 7 or lower.
//! - Otherwise, equal or higher.

use im::Vector;

use crate::cards::{Card, CardId, Rank};
use crate::core::{GameState, Player, PlayerId};
use crate::zones::{find_all, Zone};

/// The card that constrains the next play, after discounting trailing 2s.
///
/// A 2 on top erases itself and everything below it as a constraint, so
/// `[5, 2]` and `[5, 2, 2]` have no effective top and `[5, 2, 9]` has 9.
#[must_use]
pub fn effective_top(pile: &Vector<Card>) -> Option<Card> {
    match pile.last() {
        Some(card) if card.rank == Rank::TWO => None,
        top => top.copied(),
    }
}

/// Can a card of `rank` go on `top`?
#[must_use]
pub fn can_play_rank(rank: Rank, top: Option<Rank>) -> bool {
    let Some(top) = top else {
        return true;
    };
    if rank == Rank::TWO || rank == Rank::TEN {
        return true;
    }
    if top == Rank::SEVEN {
        rank <= Rank::SEVEN
    } else {
        rank >= top
    }
}

/// Can `card` go on `effective_top`?
#[must_use]
pub fn can_play(card: &Card, effective_top: Option<&Card>) -> bool {
    can_play_rank(card.rank, effective_top.map(|c| c.rank))
}

/// The zone a player must currently play from: hand, then face-up, then face-down.
///
/// `None` once all three are empty.
#[must_use]
pub fn active_zone(player: &Player) -> Option<Zone> {
    if !player.hand.is_empty() {
        Some(Zone::Hand)
    } else if !player.face_up.is_empty() {
        Some(Zone::FaceUp)
    } else if !player.face_down.is_empty() {
        Some(Zone::FaceDown)
    } else {
        None
    }
}

/// Would the selected cards form a legal play for `player` right now?
///
/// The selection must be non-empty, distinct, share one rank, all sit in
/// the player's active zone (hand or face-up), and beat the effective top.
/// Turn order and phase are not checked here.
#[must_use]
pub fn can_play_selected(state: &GameState, player: PlayerId, cards: &[CardId]) -> bool {
    let Some(p) = state.player(player) else {
        return false;
    };
    let zone = match active_zone(p) {
        Some(zone @ (Zone::Hand | Zone::FaceUp)) => zone,
        _ => return false,
    };
    if cards.is_empty() || has_duplicates(cards) {
        return false;
    }
    let Ok(selected) = find_all(zone.cards(p), cards) else {
        return false;
    };
    let rank = selected[0].rank;
    if selected.iter().any(|c| c.rank != rank) {
        return false;
    }
    let top = effective_top(&state.pile).map(|c| c.rank);
    can_play_rank(rank, top)
}

/// Does `player` hold any legal card in the zone they must play from?
///
/// Face-down cards are unknown until revealed, so a player left with only
/// face-down cards has no known playable card.
#[must_use]
pub fn can_play_any(state: &GameState, player: PlayerId) -> bool {
    let Some(p) = state.player(player) else {
        return false;
    };
    let top = effective_top(&state.pile).map(|c| c.rank);
    match active_zone(p) {
        Some(zone @ (Zone::Hand | Zone::FaceUp)) => {
            zone.cards(p).iter().any(|c| can_play_rank(c.rank, top))
        }
        _ => false,
    }
}

pub(crate) fn has_duplicates(ids: &[CardId]) -> bool {
    ids.iter()
        .enumerate()
        .any(|(i, id)| ids[..i].contains(id))
}
