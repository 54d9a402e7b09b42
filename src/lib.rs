//! # shithead
//!
//! Rules engine and multiplayer session for the card game Shithead.
//!
//! ## Design Principles
//!
//! 1. **Pure Rules**: `RulesEngine::apply_intent` is a deterministic state
//!    transition. It validates first and either rejects without touching
//!    the state or applies the whole move.
//!
//! 2. **Single Writer**: One session task owns the canonical `GameState`.
//!    Humans, AI seats, and timers all feed intents into it.
//!
//! 3. **Host Authority**: In a replicated match only the host applies
//!    intents; everyone else renders the newest snapshot.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: The pile and deck are `im` vectors, so
//!   publishing a snapshot is an O(1) clone.
//!
//! - **Generation-Stamped Timers**: Jump-in windows and AI turns carry the
//!   generation or turn they were armed for; stale timers are no-ops.
//!
//! ## Modules
//!
//! - `core`: Players, state, intents, RNG, configuration
//! - `cards`: Cards, the deck, and dealing
//! - `zones`: Atomic card transfers between zones
//! - `rules`: Legality, pile evaluation, and the `RulesEngine`
//! - `jump_in`: The out-of-turn four-of-a-kind window
//! - `events`: Notifications for the presentation layer
//! - `ai`: Opponent policies
//! - `session`: The async single-writer game task
//! - `replication`: Transport boundary, host, and participants

pub mod core;
pub mod cards;
pub mod zones;
pub mod rules;
pub mod jump_in;
pub mod events;
pub mod ai;
pub mod session;
pub mod replication;
pub mod error;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, PlayerMap, Player,
    GameRng, GameRngState,
    GameConfig, RulesConfig, AiConfig, PublishConfig, SeatConfig,
    Intent, IntentEnvelope, IntentId,
    GamePhase, GameState,
};

pub use crate::cards::{Card, CardId, Rank, Suit};

pub use crate::zones::Zone;

pub use crate::rules::{
    RulesEngine, ShitheadRules, GameResult,
    effective_top, can_play, can_play_any, can_play_selected,
};

pub use crate::jump_in::JumpInWindow;

pub use crate::events::{BurnReason, GameEvent, WindowCloseReason};

pub use crate::ai::{HeuristicPolicy, OpponentPolicy, UniformOpponent};

pub use crate::session::{GameSession, SessionHandle};

pub use crate::replication::{
    Host, HostHandle, InMemoryTransport, IntentLog, MatchId, Participant, Snapshot, Transport,
};

pub use crate::error::{ConfigError, Rejection, SessionError, TransportError};
