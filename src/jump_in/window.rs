//! Jump-in window state.
//!
//! At most one window is open. Each window gets a fresh generation from a
//! monotonic counter in the game state; timers carry the generation they
//! were scheduled for and are ignored once it is no longer current.

use serde::{Deserialize, Serialize};

use crate::cards::Rank;
use crate::core::GameState;
use crate::events::{GameEvent, WindowCloseReason};

/// An open jump-in window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JumpInWindow {
    /// Rank that completes the four-of-a-kind.
    pub rank: Rank,
    /// Identity of this window.
    pub generation: u64,
}

/// Open a window for `rank`, superseding any pending one.
pub fn open(state: &mut GameState, rank: Rank, events: &mut Vec<GameEvent>) -> JumpInWindow {
    close(state, WindowCloseReason::Superseded, events);

    state.jump_in_generation += 1;
    let window = JumpInWindow {
        rank,
        generation: state.jump_in_generation,
    };
    state.jump_in = Some(window);
    events.push(GameEvent::JumpInOpened {
        rank,
        generation: window.generation,
    });
    window
}

/// Close the pending window, if any.
pub fn close(state: &mut GameState, reason: WindowCloseReason, events: &mut Vec<GameEvent>) {
    if let Some(window) = state.jump_in.take() {
        events.push(GameEvent::JumpInClosed {
            rank: window.rank,
            generation: window.generation,
            reason,
        });
    }
}

/// Close the window because its deadline passed.
///
/// A no-op returning `None` if `generation` is not the open window.
pub fn expire(state: &mut GameState, generation: u64) -> Option<GameEvent> {
    match state.jump_in {
        Some(window) if window.generation == generation => {
            state.jump_in = None;
            Some(GameEvent::JumpInClosed {
                rank: window.rank,
                generation,
                reason: WindowCloseReason::Expired,
            })
        }
        _ => None,
    }
}

/// Is `generation` the currently open window?
#[must_use]
pub fn is_current(state: &GameState, generation: u64) -> bool {
    state.jump_in.is_some_and(|w| w.generation == generation)
}
