//! The host: sole consumer of a match's intent log.
//!
//! The host task reads envelopes from the transport, drops repeats, and
//! submits the rest to its session, which re-validates everything. Each
//! time the session's state changes the host publishes a snapshot, retrying
//! with exponential backoff. A snapshot that exhausts its attempts is kept
//! and retried on a longer timer until it lands or a newer state replaces it.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Sleep};
use tracing::{debug, error, info, warn};

use super::log::IntentLog;
use super::snapshot::{MatchId, Snapshot};
use super::transport::Transport;
use crate::core::{GameState, IntentEnvelope, PublishConfig};
use crate::error::{SessionError, TransportError};
use crate::session::SessionHandle;

/// Host of one match.
pub struct Host {
    match_id: MatchId,
    session: SessionHandle,
    transport: Arc<dyn Transport>,
    publish: PublishConfig,
    log: IntentLog,
}

/// A state whose publish gave up, waiting for its next retry.
struct Unpublished {
    state: GameState,
    /// Retry rounds that have failed so far.
    rounds: u32,
}

/// Handle to a running host task. Dropping it stops the host.
pub struct HostHandle {
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<Result<IntentLog, TransportError>>,
}

impl HostHandle {
    /// Stop the host and return the intents it consumed.
    pub async fn stop(self) -> Result<IntentLog, TransportError> {
        let _ = self.shutdown.send(());
        self.task.await.map_err(|_| TransportError::Closed)?
    }
}

impl Host {
    #[must_use]
    pub fn new(
        match_id: MatchId,
        session: SessionHandle,
        transport: Arc<dyn Transport>,
        publish: PublishConfig,
    ) -> Self {
        Self {
            match_id,
            session,
            transport,
            publish,
            log: IntentLog::new(),
        }
    }

    /// Run the host on its own task.
    pub fn spawn(self) -> HostHandle {
        let (shutdown, stop) = oneshot::channel();
        HostHandle {
            shutdown,
            task: tokio::spawn(self.run(stop)),
        }
    }

    /// Consume intents and publish snapshots until stopped, or until the
    /// session or the intent stream closes.
    async fn run(mut self, mut stop: oneshot::Receiver<()>) -> Result<IntentLog, TransportError> {
        let mut intents = self.transport.subscribe_intents(&self.match_id).await?;
        let mut states = self.session.watch();
        info!(match_id = %self.match_id, "host started");

        let retry = time::sleep(Duration::ZERO);
        tokio::pin!(retry);

        let initial = states.borrow_and_update().clone();
        let mut unpublished = self.publish_or_defer(initial, 0, retry.as_mut()).await;

        loop {
            tokio::select! {
                _ = &mut stop => break,
                envelope = intents.next() => match envelope {
                    Some(envelope) => {
                        if !self.consume(envelope).await {
                            break;
                        }
                    }
                    None => break,
                },
                changed = states.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let state = states.borrow_and_update().clone();
                    unpublished = self.publish_or_defer(state, 0, retry.as_mut()).await;
                }
                () = &mut retry, if unpublished.is_some() => {
                    if let Some(Unpublished { state, rounds }) = unpublished.take() {
                        unpublished = self.publish_or_defer(state, rounds, retry.as_mut()).await;
                    }
                }
            }
        }

        info!(match_id = %self.match_id, consumed = self.log.len(), "host stopped");
        Ok(self.log)
    }

    /// Apply one envelope. Returns false once the session is gone.
    async fn consume(&mut self, envelope: IntentEnvelope) -> bool {
        if !self.log.record(&envelope) {
            debug!(
                match_id = %self.match_id,
                player = %envelope.player(),
                nonce = envelope.id.nonce,
                "duplicate intent dropped"
            );
            return true;
        }

        match self.session.submit(envelope.player(), envelope.intent.clone()).await {
            Ok(_) => true,
            Err(SessionError::Rejected(rejection)) => {
                debug!(
                    match_id = %self.match_id,
                    player = %envelope.player(),
                    nonce = envelope.id.nonce,
                    %rejection,
                    "intent dropped"
                );
                true
            }
            Err(SessionError::Closed) => {
                warn!(match_id = %self.match_id, "session closed under host");
                false
            }
        }
    }

    /// Publish `state`; on failure keep it and arm `retry` for another round.
    async fn publish_or_defer(
        &self,
        state: GameState,
        rounds: u32,
        retry: Pin<&mut Sleep>,
    ) -> Option<Unpublished> {
        if self.publish(&state).await.is_ok() {
            return None;
        }
        let rounds = rounds + 1;
        let delay = self.publish.backoff(self.publish.max_attempts.saturating_add(rounds));
        debug!(
            match_id = %self.match_id,
            revision = state.revision,
            rounds,
            retry_delay_ms = delay.as_millis() as u64,
            "snapshot publish deferred"
        );
        retry.reset(Instant::now() + delay);
        Some(Unpublished { state, rounds })
    }

    async fn publish(&self, state: &GameState) -> Result<(), TransportError> {
        let snapshot = Snapshot::new(self.match_id.clone(), state.clone());
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.transport.publish_snapshot(&self.match_id, &snapshot).await {
                Ok(()) => {
                    debug!(match_id = %self.match_id, revision = snapshot.revision, "snapshot published");
                    return Ok(());
                }
                Err(err) if attempt < self.publish.max_attempts => {
                    let delay = self.publish.backoff(attempt);
                    warn!(
                        match_id = %self.match_id,
                        revision = snapshot.revision,
                        error = %err,
                        attempt,
                        retry_delay_ms = delay.as_millis() as u64,
                        "snapshot publish failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    error!(
                        match_id = %self.match_id,
                        revision = snapshot.revision,
                        error = %err,
                        attempt,
                        "snapshot publish failed, deferring"
                    );
                    return Err(err);
                }
            }
        }
    }
}
