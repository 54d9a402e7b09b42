//! Pile evaluation: burns and jump-in opportunities.

use im::Vector;

use crate::cards::{Card, Rank};

/// Cards of one rank that burn the pile.
pub const BURN_RUN: usize = 4;

/// Cards of one rank on top of the pile that open a jump-in window.
pub const JUMP_IN_RUN: usize = 3;

/// Rank shared by the last `run` cards, if they all match.
fn top_run_rank(pile: &Vector<Card>, run: usize) -> Option<Rank> {
    if pile.len() < run {
        return None;
    }
    let rank = pile.last()?.rank;
    pile.iter()
        .skip(pile.len() - run)
        .all(|c| c.rank == rank)
        .then_some(rank)
}

/// True iff the pile has at least four cards and the last four share a rank.
#[must_use]
pub fn should_burn(pile: &Vector<Card>) -> bool {
    top_run_rank(pile, BURN_RUN).is_some()
}

/// True iff any of the just-played cards is a 10.
#[must_use]
pub fn contains_ten(played: &[Card]) -> bool {
    played.iter().any(|c| c.rank == Rank::TEN)
}

/// Rank of the last three cards if they share one.
#[must_use]
pub fn jump_in_rank(pile: &Vector<Card>) -> Option<Rank> {
    top_run_rank(pile, JUMP_IN_RUN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, Suit};

    fn pile(ranks: &[u8]) -> Vector<Card> {
        ranks
            .iter()
            .enumerate()
            .map(|(i, &r)| Card::new(CardId::new(i as u32), Suit::Spades, Rank(r)))
            .collect()
    }

    #[test]
    fn test_should_burn() {
        assert!(!should_burn(&pile(&[])));
        assert!(!should_burn(&pile(&[5, 5, 5])));
        assert!(should_burn(&pile(&[5, 5, 5, 5])));
        assert!(should_burn(&pile(&[3, 9, 5, 5, 5, 5])));
        assert!(!should_burn(&pile(&[5, 5, 5, 6])));
        assert!(!should_burn(&pile(&[5, 6, 5, 5])));
    }

    #[test]
    fn test_contains_ten() {
        let cards: Vec<Card> = pile(&[4, 10]).into_iter().collect();
        assert!(contains_ten(&cards));
        let cards: Vec<Card> = pile(&[4, 11]).into_iter().collect();
        assert!(!contains_ten(&cards));
        assert!(!contains_ten(&[]));
    }

    #[test]
    fn test_jump_in_rank() {
        assert_eq!(jump_in_rank(&pile(&[5, 5])), None);
        assert_eq!(jump_in_rank(&pile(&[5, 5, 5])), Some(Rank(5)));
        assert_eq!(jump_in_rank(&pile(&[9, 5, 5, 5])), Some(Rank(5)));
        assert_eq!(jump_in_rank(&pile(&[5, 5, 6])), None);
    }
}
