//! Rules: legality, pile evaluation, and the turn/phase state machine.
//!
//! Everything here is pure. Given a state and an intent, the engine either
//! rejects without touching the state or applies the whole transition and
//! returns the events it produced. Timers, logging, and I/O live in
//! `session` and `replication`.

pub mod engine;
pub mod legality;
pub mod pile;

pub use engine::{GameResult, RulesEngine, ShitheadRules};
pub use legality::{active_zone, can_play, can_play_any, can_play_rank, can_play_selected, effective_top};
pub use pile::{contains_ten, jump_in_rank, should_burn, BURN_RUN, JUMP_IN_RUN};
