//! Game event types.
//!
//! Events describe what an accepted transition did. They are emitted after
//! the transition is fully applied and have no feedback path into the
//! engine: presentation layers use them to drive rendering and sound.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank};
use crate::core::{GamePhase, PlayerId};
use crate::zones::Zone;

/// Why the pile was cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BurnReason {
    /// The last four cards share a rank.
    FourOfAKind,
    /// A 10 was played.
    Ten,
    /// A jump-in completed the four-of-a-kind.
    JumpIn,
}

/// Why a jump-in window closed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowCloseReason {
    /// The deadline passed with nobody jumping.
    Expired,
    /// A player jumped in.
    Consumed,
    /// A newer window replaced it.
    Superseded,
    /// The pile changed underneath it.
    Invalidated,
}

/// A discrete notification from the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Cards were dealt; `deck_remaining` cards are left to draw.
    Dealt { deck_remaining: usize },

    PhaseChanged { phase: GamePhase },

    /// Cards landed on the pile.
    CardsPlayed {
        player: PlayerId,
        cards: Vec<Card>,
        from: Zone,
    },

    /// A face-down card was turned over.
    FaceDownRevealed {
        player: PlayerId,
        card: Card,
        playable: bool,
    },

    /// The pile was cleared.
    Burned {
        player: PlayerId,
        reason: BurnReason,
        cards: usize,
    },

    /// A player took the pile into hand.
    PickedUp { player: PlayerId, cards: usize },

    JumpInOpened { rank: Rank, generation: u64 },

    JumpInClosed {
        rank: Rank,
        generation: u64,
        reason: WindowCloseReason,
    },

    /// A turn was granted to `player`.
    TurnStarted { player: PlayerId, turn_number: u32 },

    GameFinished {
        winner: PlayerId,
        loser: Option<PlayerId>,
    },
}

impl GameEvent {
    /// The player most directly associated with the event, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            GameEvent::CardsPlayed { player, .. }
            | GameEvent::FaceDownRevealed { player, .. }
            | GameEvent::Burned { player, .. }
            | GameEvent::PickedUp { player, .. }
            | GameEvent::TurnStarted { player, .. } => Some(*player),
            GameEvent::GameFinished { winner, .. } => Some(*winner),
            GameEvent::Dealt { .. }
            | GameEvent::PhaseChanged { .. }
            | GameEvent::JumpInOpened { .. }
            | GameEvent::JumpInClosed { .. } => None,
        }
    }

    /// True for events that clear the pile.
    #[must_use]
    pub fn is_burn(&self) -> bool {
        matches!(self, GameEvent::Burned { .. })
    }
}
