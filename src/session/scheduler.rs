//! Cancellable timers for the session task.
//!
//! Each timer is a tokio task that sleeps and then posts a `TimerFired`
//! back to the session. Timers are keyed: scheduling a key that is already
//! pending aborts the old task first, so at most one timer per key is live.
//! Every timer also carries the stamp (window generation or turn number)
//! it was armed for; the session compares that against current state when
//! it fires, so a timer that lost an abort race is still harmless.

use std::time::Duration;

use rustc_hash::FxHashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::PlayerId;

/// What a timer is for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKey {
    /// Deadline of the open jump-in window.
    JumpInExpiry,
    /// The acting AI finishes thinking.
    AiTurn,
    /// An AI rolls whether to jump into the open window.
    AiJumpTick(PlayerId),
    /// An AI that decided to jump in does so.
    AiJump(PlayerId),
}

impl TimerKey {
    /// Timers that die with the jump-in window.
    #[must_use]
    pub fn is_jump_in(&self) -> bool {
        matches!(
            self,
            TimerKey::JumpInExpiry | TimerKey::AiJumpTick(_) | TimerKey::AiJump(_)
        )
    }
}

/// A timer went off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerFired {
    pub key: TimerKey,
    /// Generation or turn number the timer was armed for.
    pub stamp: u64,
}

/// Keyed set of pending timers.
pub struct Scheduler {
    fired: mpsc::UnboundedSender<TimerFired>,
    pending: FxHashMap<TimerKey, JoinHandle<()>>,
}

impl Scheduler {
    /// Create a scheduler that posts fired timers to `fired`.
    pub fn new(fired: mpsc::UnboundedSender<TimerFired>) -> Self {
        Self {
            fired,
            pending: FxHashMap::default(),
        }
    }

    /// Arm `key` to fire after `delay`, replacing any pending timer for it.
    pub fn schedule(&mut self, key: TimerKey, stamp: u64, delay: Duration) {
        self.cancel(key);
        let fired = self.fired.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = fired.send(TimerFired { key, stamp });
        });
        self.pending.insert(key, handle);
    }

    /// Abort `key`. Returns true if a timer was still waiting.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        match self.pending.remove(&key) {
            Some(handle) => {
                let waiting = !handle.is_finished();
                handle.abort();
                waiting
            }
            None => false,
        }
    }

    /// Abort every timer whose key matches.
    pub fn cancel_where(&mut self, mut matches: impl FnMut(&TimerKey) -> bool) {
        self.pending.retain(|key, handle| {
            if matches(key) {
                handle.abort();
                false
            } else {
                true
            }
        });
    }

    /// Abort everything.
    pub fn cancel_all(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }

    /// Is a timer for `key` armed and not yet fired?
    #[must_use]
    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.pending.get(&key).is_some_and(|h| !h.is_finished())
    }

    /// Number of timers armed and not yet fired.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.values().filter(|h| !h.is_finished()).count()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
