//! Deck generation and the deal procedure.

use crate::core::config::RulesConfig;
use crate::core::{GameRng, Player, PlayerMap};
use crate::error::ConfigError;

use super::card::{Card, CardId, Rank, Suit};

/// Cards in a standard deck.
pub const DECK_SIZE: usize = 52;

/// All 52 cards in suit-major order with ids `0..52`.
#[must_use]
pub fn ordered_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| Rank::all().map(move |rank| (suit, rank)))
        .enumerate()
        .map(|(i, (suit, rank))| Card::new(CardId::new(i as u32), suit, rank))
        .collect()
}

/// Build a fresh deck and shuffle it with Fisher–Yates.
#[must_use]
pub fn build_deck(rng: &mut GameRng) -> Vec<Card> {
    let mut deck = ordered_deck();
    rng.shuffle(&mut deck);
    deck
}

/// Deal from the front of `deck`: `hand_size` cards to each hand round-robin,
/// then `face_down_count` face-down cards round-robin.
///
/// AI players immediately move their lowest cards to face-up and are marked
/// confirmed. Returns the undealt remainder, front = next draw.
pub fn deal(
    players: &mut PlayerMap<Player>,
    deck: Vec<Card>,
    rules: &RulesConfig,
) -> Result<Vec<Card>, ConfigError> {
    let seats = players.player_count();
    let needed = seats * (rules.hand_size + rules.face_down_count);
    if needed > deck.len() {
        return Err(ConfigError::DeckTooSmall {
            needed,
            available: deck.len(),
        });
    }

    let mut cards = deck.into_iter();

    for _ in 0..rules.hand_size {
        for (_, player) in players.iter_mut() {
            // Length checked above.
            if let Some(card) = cards.next() {
                player.hand.push(card);
            }
        }
    }
    for _ in 0..rules.face_down_count {
        for (_, player) in players.iter_mut() {
            if let Some(card) = cards.next() {
                player.face_down.push(card);
            }
        }
    }

    for (_, player) in players.iter_mut().filter(|(_, p)| p.is_ai) {
        auto_face_up(player, rules.face_up_count);
    }

    Ok(cards.collect())
}

/// Move the `count` lowest-rank hand cards to face-up and confirm.
///
/// Ties keep original hand order.
pub fn auto_face_up(player: &mut Player, count: usize) {
    let mut order: Vec<usize> = (0..player.hand.len()).collect();
    order.sort_by_key(|&i| player.hand[i].rank);
    let chosen: Vec<CardId> = order
        .into_iter()
        .take(count)
        .map(|i| player.hand[i].id)
        .collect();

    for id in chosen {
        if let Some(pos) = player.hand.iter().position(|c| c.id == id) {
            let card = player.hand.remove(pos);
            player.face_up.push(card);
        }
    }
    player.face_up_confirmed = true;
}
