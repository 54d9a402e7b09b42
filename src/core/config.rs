//! Game configuration.
//!
//! Configuration is plain data with `Default` values matching the reference
//! behaviour and `with_*` builders for overrides:
//! - `RulesConfig`: deal sizes and the hand replenishment floor
//! - `AiConfig`: opponent timings and probabilities
//! - `PublishConfig`: snapshot publish retry policy
//! - `GameConfig`: seats, seed, and all of the above

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::cards::deck::DECK_SIZE;
use crate::error::ConfigError;

/// Supported seat counts.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// One seat at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatConfig {
    pub name: String,
    pub is_ai: bool,
}

impl SeatConfig {
    pub fn human(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_ai: false,
        }
    }

    pub fn ai(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_ai: true,
        }
    }
}

/// Deal sizes and hand replenishment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Cards dealt to each hand before face-up selection.
    pub hand_size: usize,
    /// Face-down cards dealt to each player.
    pub face_down_count: usize,
    /// Face-up cards each player designates from their hand.
    pub face_up_count: usize,
    /// Hands are topped up from the deck to this size after a play.
    pub min_hand_size: usize,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            hand_size: 6,
            face_down_count: 3,
            face_up_count: 3,
            min_hand_size: 3,
        }
    }
}

/// Opponent policy timings and probabilities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Delay before an AI acts on its turn.
    pub think_delay_ms: u64,
    /// Chance of playing every legal card of the chosen rank instead of one.
    pub play_all_probability: f64,
    /// Chance, per tick, that an eligible AI decides to jump in.
    pub jump_in_probability: f64,
    /// Interval between jump-in ticks, drawn uniformly from this range.
    pub jump_tick_ms: (u64, u64),
    /// Reaction delay between deciding to jump and jumping.
    pub jump_delay_ms: (u64, u64),
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            think_delay_ms: 1000,
            play_all_probability: 0.9,
            jump_in_probability: 0.7,
            jump_tick_ms: (200, 500),
            jump_delay_ms: (100, 600),
        }
    }
}

impl AiConfig {
    #[must_use]
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    #[must_use]
    pub fn with_think_delay_ms(mut self, ms: u64) -> Self {
        self.think_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn with_play_all_probability(mut self, p: f64) -> Self {
        self.play_all_probability = p;
        self
    }

    #[must_use]
    pub fn with_jump_in_probability(mut self, p: f64) -> Self {
        self.jump_in_probability = p;
        self
    }

    #[must_use]
    pub fn with_jump_tick_ms(mut self, min: u64, max: u64) -> Self {
        self.jump_tick_ms = (min, max);
        self
    }

    #[must_use]
    pub fn with_jump_delay_ms(mut self, min: u64, max: u64) -> Self {
        self.jump_delay_ms = (min, max);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("play_all_probability", self.play_all_probability),
            ("jump_in_probability", self.jump_in_probability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { name, value });
            }
        }
        for (name, (min, max)) in [
            ("jump_tick_ms", self.jump_tick_ms),
            ("jump_delay_ms", self.jump_delay_ms),
        ] {
            if min > max {
                return Err(ConfigError::EmptyRange { name, min, max });
            }
        }
        if self.jump_tick_ms.1 == 0 {
            return Err(ConfigError::Zero("jump_tick_ms"));
        }
        Ok(())
    }
}

/// Snapshot publish retry policy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishConfig {
    /// Attempts per snapshot before giving up until the next change.
    pub max_attempts: u32,
    /// Base backoff, doubled on each retry.
    pub backoff_ms: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_ms: 100,
        }
    }
}

impl PublishConfig {
    /// Backoff before retry number `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(10);
        Duration::from_millis(self.backoff_ms.saturating_mul(factor))
    }
}

/// Complete game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Seats in turn order.
    pub seats: Vec<SeatConfig>,
    /// Seed for the shuffle and the opponent policy.
    pub seed: u64,
    pub rules: RulesConfig,
    pub ai: AiConfig,
    pub publish: PublishConfig,
    /// How long a jump-in window stays open.
    pub jump_in_window_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seats: vec![
                SeatConfig::human("You"),
                SeatConfig::ai("West"),
                SeatConfig::ai("North"),
                SeatConfig::ai("East"),
            ],
            seed: 42,
            rules: RulesConfig::default(),
            ai: AiConfig::default(),
            publish: PublishConfig::default(),
            jump_in_window_ms: 2000,
        }
    }
}

impl GameConfig {
    /// Create a config for the given seats with default rules and timings.
    pub fn new(seats: Vec<SeatConfig>) -> Self {
        Self {
            seats,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_ai(mut self, ai: AiConfig) -> Self {
        self.ai = ai;
        self
    }

    #[must_use]
    pub fn with_publish(mut self, publish: PublishConfig) -> Self {
        self.publish = publish;
        self
    }

    #[must_use]
    pub fn with_jump_in_window_ms(mut self, ms: u64) -> Self {
        self.jump_in_window_ms = ms;
        self
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    #[must_use]
    pub fn jump_in_window(&self) -> Duration {
        Duration::from_millis(self.jump_in_window_ms)
    }

    /// Check every value is within range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let players = self.player_count();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(ConfigError::InvalidPlayerCount(players));
        }

        let needed = players * (self.rules.hand_size + self.rules.face_down_count);
        if needed > DECK_SIZE {
            return Err(ConfigError::DeckTooSmall {
                needed,
                available: DECK_SIZE,
            });
        }
        if self.rules.face_up_count == 0 || self.rules.face_up_count > self.rules.hand_size {
            return Err(ConfigError::EmptyRange {
                name: "face_up_count",
                min: 1,
                max: self.rules.hand_size as u64,
            });
        }
        if self.jump_in_window_ms == 0 {
            return Err(ConfigError::Zero("jump_in_window_ms"));
        }
        if self.publish.max_attempts == 0 {
            return Err(ConfigError::Zero("publish.max_attempts"));
        }

        self.ai.validate()
    }
}
