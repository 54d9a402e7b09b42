//! Intents: what a participant asks the engine to do.
//!
//! Intents are a closed set, one variant per action kind, each carrying
//! exactly the fields it needs. They carry no legality claims: the
//! authoritative process re-validates every intent against its own state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::cards::{CardId, Rank};

/// Card ids selected for a play. Most plays are 1-4 cards.
pub type CardSelection = SmallVec<[CardId; 4]>;

/// A player intent.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Deal the shuffled deck (setup, once).
    DealCards,
    /// Move a card between hand and face-up during setup.
    ToggleFaceUp { card: CardId },
    /// Lock in the current face-up selection.
    ConfirmFaceUp,
    /// Exchange one hand card for one face-up card before play begins.
    SwapFaceUp { hand_card: CardId, face_up_card: CardId },
    /// Leave the swapping window and begin play.
    StartGame,
    /// Play same-rank cards, in selection order.
    PlayCards { cards: CardSelection },
    /// Take the whole pile into hand.
    PickupPile,
    /// Turn over the face-down card at `index`.
    RevealFaceDown { index: usize },
    /// Complete a four-of-a-kind out of turn.
    JumpIn { rank: Rank },
}

impl Intent {
    /// Convenience constructor for `PlayCards`.
    #[must_use]
    pub fn play(cards: &[CardId]) -> Self {
        Intent::PlayCards {
            cards: SmallVec::from_slice(cards),
        }
    }

    /// Short lowercase name for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Intent::DealCards => "deal_cards",
            Intent::ToggleFaceUp { .. } => "toggle_face_up",
            Intent::ConfirmFaceUp => "confirm_face_up",
            Intent::SwapFaceUp { .. } => "swap_face_up",
            Intent::StartGame => "start_game",
            Intent::PlayCards { .. } => "play_cards",
            Intent::PickupPile => "pickup_pile",
            Intent::RevealFaceDown { .. } => "reveal_face_down",
            Intent::JumpIn { .. } => "jump_in",
        }
    }
}

/// Identity of a submitted intent, used to apply it exactly once under
/// at-least-once delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentId {
    pub player: PlayerId,
    /// Picked by the submitter once per connection. A reconnecting client
    /// starts a new session, so its restarted nonces stay distinct.
    pub session: u64,
    /// Per-session counter assigned by the submitter.
    pub nonce: u64,
}

/// An intent as it travels through the shared log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentEnvelope {
    pub id: IntentId,
    pub intent: Intent,
}

impl IntentEnvelope {
    /// Envelope in submitter session 0.
    #[must_use]
    pub fn new(player: PlayerId, nonce: u64, intent: Intent) -> Self {
        Self {
            id: IntentId {
                player,
                session: 0,
                nonce,
            },
            intent,
        }
    }

    #[must_use]
    pub fn with_session(mut self, session: u64) -> Self {
        self.id.session = session;
        self
    }

    /// The acting player.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.id.player
    }
}
