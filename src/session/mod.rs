//! The running game: one async task owning one `GameState`.

pub mod actor;
pub mod scheduler;

pub use actor::{GameSession, SessionHandle};
pub use scheduler::{Scheduler, TimerFired, TimerKey};
