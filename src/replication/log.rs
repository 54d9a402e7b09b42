//! The host's record of intents it has taken from the transport.
//!
//! Delivery is at-least-once, so the same envelope can arrive twice. The
//! log remembers every `IntentId` it has seen and refuses repeats.

use rustc_hash::FxHashSet;

use crate::core::{IntentEnvelope, IntentId};

/// Ordered, deduplicated intent history.
#[derive(Clone, Debug, Default)]
pub struct IntentLog {
    seen: FxHashSet<IntentId>,
    entries: Vec<IntentEnvelope>,
}

impl IntentLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `envelope`. Returns false, recording nothing, for a repeat.
    pub fn record(&mut self, envelope: &IntentEnvelope) -> bool {
        if !self.seen.insert(envelope.id) {
            return false;
        }
        self.entries.push(envelope.clone());
        true
    }

    #[must_use]
    pub fn contains(&self, id: &IntentId) -> bool {
        self.seen.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recorded envelopes in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &IntentEnvelope> {
        self.entries.iter()
    }
}
