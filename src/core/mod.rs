//! Core engine types: players, state, intents, RNG, configuration.

pub mod config;
pub mod intent;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{AiConfig, GameConfig, PublishConfig, RulesConfig, SeatConfig};
pub use intent::{CardSelection, Intent, IntentEnvelope, IntentId};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{GamePhase, GameState};
