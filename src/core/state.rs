//! Game state: the unit of truth.
//!
//! ## GameState
//!
//! - Players in turn order, each with hand / face-down / face-up zones
//! - The discard pile (last element = nominal top), the draw deck
//!   (front = next draw), and the burned cards out of play
//! - Phase, current player, winner and loser
//! - The open jump-in window, if any
//! - Counters the session uses to recognise stale timers
//!
//! The pile and deck use `im` persistent vectors so publishing a snapshot
//! is an O(1) clone.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::SeatConfig;
use super::player::{Player, PlayerId, PlayerMap};
use crate::cards::{Card, CardId};
use crate::jump_in::JumpInWindow;

/// Game phase. Transitions are linear: no phase is ever re-entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Dealing and face-up selection.
    Setup,
    /// Optional hand/face-up exchanges before play.
    Swapping,
    Playing,
    Finished,
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Players in turn order.
    pub players: PlayerMap<Player>,

    /// Whose turn it is.
    pub current_player: PlayerId,

    /// Discard pile. Cleared entirely on a burn.
    pub pile: Vector<Card>,

    /// Draw source. Front = next draw.
    pub deck: Vector<Card>,

    /// Cards removed from play by burns, in burn order.
    pub burned: Vector<Card>,

    pub phase: GamePhase,
    pub winner: Option<PlayerId>,
    pub loser: Option<PlayerId>,

    /// Open jump-in window.
    pub jump_in: Option<JumpInWindow>,

    /// Incremented whenever a turn is granted: rotation, retention after a
    /// burn, or seizure by a jump-in.
    pub turn_number: u32,

    /// Last jump-in window generation handed out.
    pub jump_in_generation: u64,

    /// Number of accepted transitions.
    pub revision: u64,
}

impl GameState {
    /// Create an undealt game: every card sits in the deck, phase is `Setup`.
    #[must_use]
    pub fn new(seats: &[SeatConfig], deck: Vec<Card>) -> Self {
        let players = PlayerMap::new(seats.len(), |p| {
            let seat = &seats[p.index()];
            Player::new(p, seat.name.clone(), seat.is_ai)
        });

        Self {
            players,
            current_player: PlayerId::new(0),
            pile: Vector::new(),
            deck: deck.into_iter().collect(),
            burned: Vector::new(),
            phase: GamePhase::Setup,
            winner: None,
            loser: None,
            jump_in: None,
            turn_number: 0,
            jump_in_generation: 0,
            revision: 0,
        }
    }

    /// Get player count.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Look up a player, `None` for an unknown seat.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current(&self) -> &Player {
        &self.players[self.current_player]
    }

    /// True once any card has left the deck for a player.
    #[must_use]
    pub fn is_dealt(&self) -> bool {
        self.players
            .iter()
            .any(|(_, p)| !p.hand.is_empty() || !p.face_down.is_empty() || !p.face_up.is_empty())
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == GamePhase::Finished
    }

    /// Every card id in every zone, the pile, the deck, and the burned heap.
    ///
    /// With no bugs this is always the full deck, each id exactly once.
    #[must_use]
    pub fn all_card_ids(&self) -> Vec<CardId> {
        let mut ids = Vec::with_capacity(crate::cards::DECK_SIZE);
        for (_, player) in self.players.iter() {
            ids.extend(player.hand.iter().map(|c| c.id));
            ids.extend(player.face_down.iter().map(|c| c.id));
            ids.extend(player.face_up.iter().map(|c| c.id));
        }
        ids.extend(self.pile.iter().map(|c| c.id));
        ids.extend(self.deck.iter().map(|c| c.id));
        ids.extend(self.burned.iter().map(|c| c.id));
        ids
    }
}
