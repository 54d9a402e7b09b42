//! A non-host seat: submits intents and renders the newest snapshot.
//!
//! A participant never mutates canonical state. Its only local state is the
//! newest snapshot it has seen (older or equal revisions are ignored, since
//! subscriptions may replay or reorder) and the cards it has selected but
//! not yet played.

use std::sync::Arc;

use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::debug;

use super::snapshot::{MatchId, Snapshot};
use super::transport::Transport;
use crate::cards::CardId;
use crate::core::{GameState, Intent, IntentEnvelope, IntentId, PlayerId};
use crate::error::TransportError;
use crate::rules::legality::{can_play_any, can_play_selected};

/// One seat's view of a replicated match.
pub struct Participant {
    match_id: MatchId,
    player: PlayerId,
    transport: Arc<dyn Transport>,
    session: u64,
    next_nonce: u64,
    latest: Option<Snapshot>,
    selection: Vec<CardId>,
    snapshots: Option<BoxStream<'static, Snapshot>>,
}

impl Participant {
    /// Join under a fresh random session id.
    #[must_use]
    pub fn new(match_id: MatchId, player: PlayerId, transport: Arc<dyn Transport>) -> Self {
        Self::with_session(match_id, player, transport, rand::random())
    }

    /// Join under a caller-chosen session id. Reusing a session id that
    /// already submitted intents makes the host treat new ones as repeats.
    #[must_use]
    pub fn with_session(
        match_id: MatchId,
        player: PlayerId,
        transport: Arc<dyn Transport>,
        session: u64,
    ) -> Self {
        Self {
            match_id,
            player,
            transport,
            session,
            next_nonce: 0,
            latest: None,
            selection: Vec::new(),
            snapshots: None,
        }
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    #[must_use]
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Subscribe to the match's snapshots.
    pub async fn connect(&mut self) -> Result<(), TransportError> {
        self.snapshots = Some(self.transport.subscribe_snapshots(&self.match_id).await?);
        Ok(())
    }

    /// Offer a snapshot. Returns true if it replaced the current one.
    pub fn observe(&mut self, snapshot: Snapshot) -> bool {
        if snapshot.match_id != self.match_id || !snapshot.supersedes(self.revision()) {
            debug!(
                match_id = %self.match_id,
                revision = snapshot.revision,
                "ignoring stale snapshot"
            );
            return false;
        }
        // Selected cards may have left the hand.
        let state = &snapshot.state;
        let player = self.player;
        self.selection.retain(|id| {
            state
                .player(player)
                .is_some_and(|p| p.hand_card(*id).is_some() || p.face_up_card(*id).is_some())
        });
        self.latest = Some(snapshot);
        true
    }

    /// Wait for the next snapshot newer than the current one.
    ///
    /// Returns `None` if not connected or the subscription ended.
    pub async fn next_snapshot(&mut self) -> Option<Snapshot> {
        loop {
            let snapshot = self.snapshots.as_mut()?.next().await?;
            if self.observe(snapshot) {
                return self.latest.clone();
            }
        }
    }

    /// Wait until the rendered state satisfies `done`.
    pub async fn wait_for(&mut self, mut done: impl FnMut(&GameState) -> bool) -> Option<GameState> {
        if let Some(state) = self.state().filter(|s| done(s)) {
            return Some(state.clone());
        }
        loop {
            let snapshot = self.next_snapshot().await?;
            if done(&snapshot.state) {
                return Some(snapshot.state);
            }
        }
    }

    /// The newest state seen.
    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.latest.as_ref().map(|s| &s.state)
    }

    #[must_use]
    pub fn revision(&self) -> Option<u64> {
        self.latest.as_ref().map(|s| s.revision)
    }

    /// Append an intent to the match log.
    pub async fn submit(&mut self, intent: Intent) -> Result<IntentId, TransportError> {
        self.next_nonce += 1;
        let envelope = IntentEnvelope::new(self.player, self.next_nonce, intent).with_session(self.session);
        self.transport.append_intent(&self.match_id, &envelope).await?;
        Ok(envelope.id)
    }

    // === Local selection ===

    /// Add or remove a card from the pending selection.
    pub fn toggle_selected(&mut self, card: CardId) {
        if let Some(pos) = self.selection.iter().position(|&c| c == card) {
            self.selection.remove(pos);
        } else {
            self.selection.push(card);
        }
    }

    #[must_use]
    pub fn selection(&self) -> &[CardId] {
        &self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Would the pending selection be a legal play on the newest state?
    #[must_use]
    pub fn can_play_selection(&self) -> bool {
        self.state()
            .is_some_and(|state| can_play_selected(state, self.player, &self.selection))
    }

    /// Does this seat hold any playable card on the newest state?
    #[must_use]
    pub fn can_play_any(&self) -> bool {
        self.state().is_some_and(|state| can_play_any(state, self.player))
    }

    /// Submit the pending selection as a play and clear it.
    pub async fn play_selection(&mut self) -> Result<IntentId, TransportError> {
        let intent = Intent::play(&self.selection);
        let id = self.submit(intent).await?;
        self.selection.clear();
        Ok(id)
    }
}
