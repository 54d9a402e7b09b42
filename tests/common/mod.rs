//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::OnceLock;

use shithead::cards::{Card, CardId, Rank, Suit};
use shithead::core::{GamePhase, GameState, PlayerId, SeatConfig};
use tracing_subscriber::{fmt, EnvFilter};

static LOGGING: OnceLock<()> = OnceLock::new();

/// Initialize test logging once.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

/// A card with a synthetic id. Ids only need to be unique within a test.
pub fn card(id: u32, rank: u8) -> Card {
    Card::new(CardId::new(id), Suit::ALL[(id % 4) as usize], Rank(rank))
}

/// Cards with consecutive ids starting at `first_id`.
pub fn cards(first_id: u32, ranks: &[u8]) -> Vec<Card> {
    ranks
        .iter()
        .enumerate()
        .map(|(i, &r)| card(first_id + i as u32, r))
        .collect()
}

pub fn ids(cards: &[Card]) -> Vec<CardId> {
    cards.iter().map(|c| c.id).collect()
}

/// Hand-built game in the `Playing` phase.
///
/// Every seat is human and confirmed, every zone starts empty.
pub struct Table {
    pub state: GameState,
}

impl Table {
    pub fn new(players: usize) -> Self {
        let seats: Vec<SeatConfig> = (0..players)
            .map(|i| SeatConfig::human(format!("p{i}")))
            .collect();
        let mut state = GameState::new(&seats, Vec::new());
        for (_, p) in state.players.iter_mut() {
            p.face_up_confirmed = true;
        }
        state.phase = GamePhase::Playing;
        state.turn_number = 1;
        Self { state }
    }

    pub fn hand(mut self, player: u8, hand: Vec<Card>) -> Self {
        self.state.players[PlayerId::new(player)].hand = hand;
        self
    }

    pub fn face_up(mut self, player: u8, cards: Vec<Card>) -> Self {
        self.state.players[PlayerId::new(player)].face_up = cards;
        self
    }

    pub fn face_down(mut self, player: u8, cards: Vec<Card>) -> Self {
        self.state.players[PlayerId::new(player)].face_down = cards;
        self
    }

    pub fn pile(mut self, pile: Vec<Card>) -> Self {
        self.state.pile = pile.into_iter().collect();
        self
    }

    pub fn deck(mut self, deck: Vec<Card>) -> Self {
        self.state.deck = deck.into_iter().collect();
        self
    }

    pub fn current(mut self, player: u8) -> Self {
        self.state.current_player = PlayerId::new(player);
        self
    }

    pub fn build(self) -> GameState {
        self.state
    }
}

pub fn pile_ranks(state: &GameState) -> Vec<u8> {
    state.pile.iter().map(|c| c.rank.value()).collect()
}
