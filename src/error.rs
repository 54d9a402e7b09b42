//! Error types.
//!
//! - `Rejection`: an intent the rules refuse. Expected, not a fault; the
//!   state is left untouched.
//! - `TransportError`: the persistence/transport boundary failed.
//! - `SessionError`: the session task is gone or did not answer.
//! - `ConfigError`: configuration is out of range.

use thiserror::Error;

use crate::cards::{CardId, Rank};
use crate::core::{GamePhase, PlayerId};

/// Why an intent was dropped.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("game is finished")]
    GameFinished,

    #[error("intent requires phase {expected:?}, game is in {actual:?}")]
    WrongPhase { expected: GamePhase, actual: GamePhase },

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("not {player}'s turn (current: {current})")]
    NotYourTurn { player: PlayerId, current: PlayerId },

    #[error("no cards selected")]
    EmptySelection,

    #[error("{0} selected more than once")]
    DuplicateCard(CardId),

    #[error("selected cards do not share a rank")]
    MixedRanks,

    #[error("{0} is not held in a zone the player may use")]
    CardNotHeld(CardId),

    #[error("rank {rank} cannot be played on {top:?}")]
    Unplayable { rank: Rank, top: Option<Rank> },

    #[error("face-down cards are locked while hand or face-up cards remain")]
    FaceDownLocked,

    #[error("no face-down card at index {0}")]
    InvalidFaceDownIndex(usize),

    #[error("player holds a playable card")]
    HasPlayableCard,

    #[error("only face-down cards remain; reveal one instead")]
    MustRevealFaceDown,

    #[error("no jump-in window is open")]
    NoJumpInWindow,

    #[error("jump-in window is for rank {window}, not {requested}")]
    JumpInRankMismatch { window: Rank, requested: Rank },

    #[error("player holds no {0} to jump in with")]
    NoMatchingCards(Rank),

    #[error("cards have already been dealt")]
    AlreadyDealt,

    #[error("deck cannot cover the deal")]
    DeckExhausted,

    #[error("face-up selection already holds {0} cards")]
    FaceUpFull(usize),

    #[error("exactly {required} face-up cards are required, {actual} chosen")]
    FaceUpIncomplete { required: usize, actual: usize },

    #[error("face-up cards are already confirmed")]
    AlreadyConfirmed,
}

/// Failure at the persistence/transport boundary.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport unavailable: {0}")]
    Unavailable(String),

    #[error("no such match: {0}")]
    UnknownMatch(String),

    #[error("channel closed")]
    Closed,

    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// Failure talking to a running session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has shut down")]
    Closed,

    #[error("intent rejected: {0}")]
    Rejected(#[from] Rejection),
}

/// Invalid configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    #[error("player count must be 2-4, got {0}")]
    InvalidPlayerCount(usize),

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("{name} range is empty ({min}..={max})")]
    EmptyRange { name: &'static str, min: u64, max: u64 },

    #[error("{0} must be non-zero")]
    Zero(&'static str),

    #[error("deal needs {needed} cards, deck has {available}")]
    DeckTooSmall { needed: usize, available: usize },
}
