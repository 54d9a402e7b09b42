//! The transport boundary and an in-process implementation.
//!
//! ## Contract
//!
//! - `publish_snapshot` replaces the match's current snapshot.
//! - `subscribe_snapshots` yields the current snapshot, if any, then every
//!   later one. Slow readers may skip intermediate snapshots.
//! - `append_intent` adds to the match's ordered intent log.
//! - `subscribe_intents` replays the whole log, then follows new appends.
//!   Delivery is at-least-once; consumers deduplicate by `IntentId`.
//!
//! The in-memory intent log is an `im::Vector` behind a `watch` channel.
//! Each subscriber keeps its own cursor into it, so a slow reader falls
//! behind but never loses an entry.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use futures::future;
use futures::stream::{self, BoxStream, StreamExt};
use im::Vector;
use rustc_hash::FxHashMap;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, warn};

use super::codec::{decode, encode};
use super::snapshot::{MatchId, Snapshot};
use crate::core::IntentEnvelope;
use crate::error::TransportError;

/// Persistence and fan-out for one or more matches.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn publish_snapshot(&self, match_id: &MatchId, snapshot: &Snapshot) -> Result<(), TransportError>;

    async fn subscribe_snapshots(
        &self,
        match_id: &MatchId,
    ) -> Result<BoxStream<'static, Snapshot>, TransportError>;

    async fn append_intent(&self, match_id: &MatchId, envelope: &IntentEnvelope) -> Result<(), TransportError>;

    async fn subscribe_intents(
        &self,
        match_id: &MatchId,
    ) -> Result<BoxStream<'static, IntentEnvelope>, TransportError>;
}

struct MatchChannels {
    snapshot: watch::Sender<Option<Vec<u8>>>,
    /// Every appended intent, encoded, in append order.
    intents: watch::Sender<Vector<Vec<u8>>>,
}

impl MatchChannels {
    fn new() -> Self {
        let (snapshot, _) = watch::channel(None);
        let (intents, _) = watch::channel(Vector::new());
        Self { snapshot, intents }
    }
}

/// Transport that keeps everything in memory, encoded as it would be on a wire.
#[derive(Default)]
pub struct InMemoryTransport {
    matches: Mutex<FxHashMap<MatchId, MatchChannels>>,
    failing_publishes: AtomicU32,
    publish_attempts: AtomicU64,
}

impl InMemoryTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a match. Idempotent.
    pub fn create_match(&self, match_id: &MatchId) {
        let mut matches = self.matches.lock().unwrap_or_else(|e| e.into_inner());
        matches
            .entry(match_id.clone())
            .or_insert_with(MatchChannels::new);
    }

    /// Make the next `count` snapshot publishes fail as unavailable.
    pub fn fail_next_publishes(&self, count: u32) {
        self.failing_publishes.store(count, Ordering::SeqCst);
    }

    /// Total `publish_snapshot` calls, failed ones included.
    #[must_use]
    pub fn publish_attempts(&self) -> u64 {
        self.publish_attempts.load(Ordering::SeqCst)
    }

    /// Append raw bytes to a match's intent log, bypassing the codec.
    ///
    /// Lets tests feed redeliveries and malformed entries.
    pub fn append_raw(&self, match_id: &MatchId, bytes: Vec<u8>) -> Result<(), TransportError> {
        self.with_match(match_id, |channels| {
            channels.intents.send_modify(|log| log.push_back(bytes));
        })
    }

    fn with_match<R>(
        &self,
        match_id: &MatchId,
        f: impl FnOnce(&mut MatchChannels) -> R,
    ) -> Result<R, TransportError> {
        let mut matches = self.matches.lock().unwrap_or_else(|e| e.into_inner());
        let channels = matches
            .get_mut(match_id)
            .ok_or_else(|| TransportError::UnknownMatch(match_id.to_string()))?;
        Ok(f(channels))
    }

    fn take_injected_failure(&self) -> bool {
        self.failing_publishes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn publish_snapshot(&self, match_id: &MatchId, snapshot: &Snapshot) -> Result<(), TransportError> {
        self.publish_attempts.fetch_add(1, Ordering::SeqCst);
        if self.take_injected_failure() {
            return Err(TransportError::Unavailable("injected publish failure".to_string()));
        }

        let bytes = encode(snapshot)?;
        self.with_match(match_id, |channels| {
            channels.snapshot.send_replace(Some(bytes));
        })
    }

    async fn subscribe_snapshots(
        &self,
        match_id: &MatchId,
    ) -> Result<BoxStream<'static, Snapshot>, TransportError> {
        let rx = self.with_match(match_id, |channels| channels.snapshot.subscribe())?;
        let stream = WatchStream::new(rx).filter_map(|bytes| {
            future::ready(bytes.and_then(|b| match decode::<Snapshot>(&b) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    warn!(error = %err, "dropping undecodable snapshot");
                    None
                }
            }))
        });
        Ok(stream.boxed())
    }

    async fn append_intent(&self, match_id: &MatchId, envelope: &IntentEnvelope) -> Result<(), TransportError> {
        let bytes = encode(envelope)?;
        self.append_raw(match_id, bytes)?;
        debug!(%match_id, player = %envelope.player(), nonce = envelope.id.nonce, "intent appended");
        Ok(())
    }

    async fn subscribe_intents(
        &self,
        match_id: &MatchId,
    ) -> Result<BoxStream<'static, IntentEnvelope>, TransportError> {
        let rx = self.with_match(match_id, |channels| channels.intents.subscribe())?;

        // Yield everything past the cursor, then wait for the log to grow.
        let entries = stream::unfold((rx, 0usize), |(mut rx, cursor)| async move {
            loop {
                let unread: Vec<Vec<u8>> = {
                    let log = rx.borrow_and_update();
                    log.iter().skip(cursor).cloned().collect()
                };
                if !unread.is_empty() {
                    let cursor = cursor + unread.len();
                    return Some((stream::iter(unread), (rx, cursor)));
                }
                if rx.changed().await.is_err() {
                    return None;
                }
            }
        })
        .flatten();

        let stream = entries.filter_map(|bytes| {
            future::ready(match decode::<IntentEnvelope>(&bytes) {
                Ok(envelope) => Some(envelope),
                Err(err) => {
                    warn!(error = %err, "dropping undecodable intent");
                    None
                }
            })
        });
        Ok(stream.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::ordered_deck;
    use crate::core::{GameState, Intent, PlayerId, SeatConfig};

    fn snapshot(match_id: &MatchId, revision: u64) -> Snapshot {
        let mut state = GameState::new(&[SeatConfig::human("a"), SeatConfig::ai("b")], ordered_deck());
        state.revision = revision;
        Snapshot::new(match_id.clone(), state)
    }

    #[tokio::test]
    async fn test_unknown_match() {
        let transport = InMemoryTransport::new();
        let err = transport
            .publish_snapshot(&MatchId::new("nope"), &snapshot(&MatchId::new("nope"), 1))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::UnknownMatch(_)));
    }

    #[tokio::test]
    async fn test_snapshot_subscriber_sees_latest() {
        let transport = InMemoryTransport::new();
        let id = MatchId::new("m");
        transport.create_match(&id);

        transport.publish_snapshot(&id, &snapshot(&id, 1)).await.unwrap();
        let mut stream = transport.subscribe_snapshots(&id).await.unwrap();
        assert_eq!(stream.next().await.map(|s| s.revision), Some(1));

        transport.publish_snapshot(&id, &snapshot(&id, 2)).await.unwrap();
        assert_eq!(stream.next().await.map(|s| s.revision), Some(2));
    }

    #[tokio::test]
    async fn test_intents_replay_then_follow() {
        let transport = InMemoryTransport::new();
        let id = MatchId::new("m");
        transport.create_match(&id);

        let first = IntentEnvelope::new(PlayerId::new(0), 1, Intent::DealCards);
        let second = IntentEnvelope::new(PlayerId::new(1), 1, Intent::ConfirmFaceUp);
        transport.append_intent(&id, &first).await.unwrap();

        let mut stream = transport.subscribe_intents(&id).await.unwrap();
        transport.append_intent(&id, &second).await.unwrap();

        assert_eq!(stream.next().await, Some(first));
        assert_eq!(stream.next().await, Some(second));
    }

    #[tokio::test]
    async fn test_slow_subscriber_misses_nothing() {
        let transport = InMemoryTransport::new();
        let id = MatchId::new("m");
        transport.create_match(&id);

        let mut stream = transport.subscribe_intents(&id).await.unwrap();
        for nonce in 1..=300 {
            let envelope = IntentEnvelope::new(PlayerId::new(0), nonce, Intent::PickupPile);
            transport.append_intent(&id, &envelope).await.unwrap();
        }

        let mut nonces = Vec::new();
        while nonces.len() < 300 {
            let envelope = stream.next().await.unwrap();
            nonces.push(envelope.id.nonce);
        }
        assert_eq!(nonces, (1..=300).collect::<Vec<u64>>());

        let late = IntentEnvelope::new(PlayerId::new(1), 1, Intent::ConfirmFaceUp);
        transport.append_intent(&id, &late).await.unwrap();
        assert_eq!(stream.next().await, Some(late));
    }

    #[tokio::test]
    async fn test_injected_failures_run_out() {
        let transport = InMemoryTransport::new();
        let id = MatchId::new("m");
        transport.create_match(&id);
        transport.fail_next_publishes(2);

        assert!(transport.publish_snapshot(&id, &snapshot(&id, 1)).await.is_err());
        assert!(transport.publish_snapshot(&id, &snapshot(&id, 1)).await.is_err());
        assert!(transport.publish_snapshot(&id, &snapshot(&id, 1)).await.is_ok());
        assert_eq!(transport.publish_attempts(), 3);
    }

    #[tokio::test]
    async fn test_malformed_intent_skipped() {
        let transport = InMemoryTransport::new();
        let id = MatchId::new("m");
        transport.create_match(&id);

        transport.append_raw(&id, vec![0xde, 0xad]).unwrap();
        let good = IntentEnvelope::new(PlayerId::new(0), 1, Intent::PickupPile);
        transport.append_intent(&id, &good).await.unwrap();

        let mut stream = transport.subscribe_intents(&id).await.unwrap();
        assert_eq!(stream.next().await, Some(good));
    }
}
