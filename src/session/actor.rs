//! The game session: a single-writer task that owns the canonical state.
//!
//! ## Channels
//!
//! - Commands arrive on an `mpsc` channel and are applied one at a time.
//! - Every accepted transition replaces the `watch` snapshot, so readers
//!   only ever see fully applied states.
//! - Events go out on a `broadcast` channel in the order they happened.
//!
//! ## Timers
//!
//! AI thinking, AI jump-in ticks, and the jump-in deadline run on the
//! `Scheduler`. A fired timer is checked against the state before it does
//! anything: jump-in timers against the open window's generation, the AI
//! think timer against the turn number.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use super::scheduler::{Scheduler, TimerFired, TimerKey};
use crate::ai::{HeuristicPolicy, OpponentPolicy};
use crate::core::{AiConfig, GameConfig, GamePhase, GameRng, GameState, Intent, PlayerId};
use crate::error::{ConfigError, Rejection, SessionError};
use crate::events::GameEvent;
use crate::jump_in;
use crate::rules::{RulesEngine, ShitheadRules};

const COMMAND_BUFFER: usize = 64;
const EVENT_BUFFER: usize = 256;

enum Command {
    Submit {
        player: PlayerId,
        intent: Intent,
        reply: oneshot::Sender<Result<Vec<GameEvent>, Rejection>>,
    },
    Shutdown,
}

/// Cloneable handle to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<GameState>,
    events: broadcast::Sender<GameEvent>,
}

impl SessionHandle {
    /// Submit an intent on behalf of `player` and wait for the outcome.
    pub async fn submit(&self, player: PlayerId, intent: Intent) -> Result<Vec<GameEvent>, SessionError> {
        let (reply, outcome) = oneshot::channel();
        self.commands
            .send(Command::Submit {
                player,
                intent,
                reply,
            })
            .await
            .map_err(|_| SessionError::Closed)?;
        let events = outcome.await.map_err(|_| SessionError::Closed)??;
        Ok(events)
    }

    /// The latest applied state.
    #[must_use]
    pub fn state(&self) -> GameState {
        self.snapshots.borrow().clone()
    }

    /// A receiver that sees every new applied state.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<GameState> {
        self.snapshots.clone()
    }

    /// Subscribe to events from now on.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<GameEvent> {
        self.events.subscribe()
    }

    /// Wait until the state satisfies `done`, returning that state.
    pub async fn wait_until(&self, mut done: impl FnMut(&GameState) -> bool) -> Result<GameState, SessionError> {
        let mut rx = self.snapshots.clone();
        let state = rx
            .wait_for(|state| done(state))
            .await
            .map_err(|_| SessionError::Closed)?;
        Ok(state.clone())
    }

    /// Stop the session and cancel its timers.
    pub async fn shutdown(&self) {
        let _ = self.commands.send(Command::Shutdown).await;
    }

    /// True once the session task has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }
}

/// The session task state.
pub struct GameSession<P> {
    rules: ShitheadRules,
    state: GameState,
    policy: P,
    ai: AiConfig,
    jump_in_window: Duration,
    rng: GameRng,
    scheduler: Scheduler,
    /// Phase and turn the pending AI think timer was armed for.
    ai_turn_armed: Option<(GamePhase, u32)>,
    snapshots: watch::Sender<GameState>,
    events: broadcast::Sender<GameEvent>,
}

impl GameSession<HeuristicPolicy> {
    /// Start a session with the heuristic opponent for every AI seat.
    pub fn spawn(config: GameConfig) -> Result<SessionHandle, ConfigError> {
        let policy = HeuristicPolicy::new(config.ai.clone());
        Self::spawn_with_policy(config, policy)
    }

    /// Resume from `state` with the heuristic opponent.
    pub fn resume(config: GameConfig, state: GameState) -> Result<SessionHandle, ConfigError> {
        let policy = HeuristicPolicy::new(config.ai.clone());
        Self::resume_with_policy(config, policy, state)
    }
}

impl<P> GameSession<P>
where
    P: OpponentPolicy<ShitheadRules> + 'static,
{
    /// Start a session with a custom opponent policy.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_with_policy(config: GameConfig, policy: P) -> Result<SessionHandle, ConfigError> {
        let (rules, state) = ShitheadRules::new_game(&config)?;
        Ok(Self::start(config, policy, rules, state))
    }

    /// Resume a session from an existing state, such as the last published
    /// snapshot of a match whose host went away.
    ///
    /// An open jump-in window gets a full deadline from now.
    pub fn resume_with_policy(
        config: GameConfig,
        policy: P,
        state: GameState,
    ) -> Result<SessionHandle, ConfigError> {
        config.validate()?;
        if state.player_count() != config.player_count() {
            return Err(ConfigError::InvalidPlayerCount(state.player_count()));
        }
        let rules = ShitheadRules::new(config.rules.clone());
        Ok(Self::start(config, policy, rules, state))
    }

    fn start(config: GameConfig, policy: P, rules: ShitheadRules, state: GameState) -> SessionHandle {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(state.clone());
        let (event_tx, _) = broadcast::channel(EVENT_BUFFER);

        let session = Self {
            rules,
            state,
            policy,
            ai: config.ai.clone(),
            jump_in_window: config.jump_in_window(),
            rng: GameRng::new(config.seed).for_context("ai"),
            scheduler: Scheduler::new(timer_tx),
            ai_turn_armed: None,
            snapshots: snapshot_tx,
            events: event_tx.clone(),
        };

        info!(
            players = config.player_count(),
            seed = config.seed,
            revision = session.state.revision,
            "session started"
        );
        tokio::spawn(session.run(command_rx, timer_rx));

        SessionHandle {
            commands: command_tx,
            snapshots: snapshot_rx,
            events: event_tx,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut timers: mpsc::UnboundedReceiver<TimerFired>,
    ) {
        if let Some(window) = self.state.jump_in {
            self.arm_jump_in(window.generation);
        }
        if !self.state.is_finished() {
            self.schedule_ai();
        }

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Submit { player, intent, reply }) => {
                        let outcome = self.apply(player, &intent);
                        let _ = reply.send(outcome);
                    }
                    Some(Command::Shutdown) | None => break,
                },
                Some(fired) = timers.recv() => self.on_timer(fired),
            }
        }

        self.scheduler.cancel_all();
        info!(revision = self.state.revision, "session stopped");
    }

    fn apply(&mut self, player: PlayerId, intent: &Intent) -> Result<Vec<GameEvent>, Rejection> {
        match self.rules.apply_intent(&mut self.state, player, intent) {
            Ok(events) => {
                debug!(
                    %player,
                    intent = intent.kind(),
                    revision = self.state.revision,
                    events = events.len(),
                    "intent applied"
                );
                self.commit(&events);
                Ok(events)
            }
            Err(rejection) => {
                debug!(%player, intent = intent.kind(), %rejection, "intent rejected");
                Err(rejection)
            }
        }
    }

    /// Publish the new state and events, then re-arm timers.
    fn commit(&mut self, events: &[GameEvent]) {
        self.snapshots.send_replace(self.state.clone());

        for event in events {
            match event {
                GameEvent::JumpInOpened { rank, generation } => {
                    debug!(%rank, generation, "jump-in window opened");
                    self.arm_jump_in(*generation);
                }
                GameEvent::JumpInClosed {
                    generation, reason, ..
                } => {
                    debug!(generation, ?reason, "jump-in window closed");
                    self.scheduler.cancel_where(TimerKey::is_jump_in);
                }
                GameEvent::GameFinished { winner, loser } => {
                    info!(%winner, loser = ?loser, revision = self.state.revision, "game finished");
                }
                _ => {}
            }
            // No subscribers is fine.
            let _ = self.events.send(event.clone());
        }

        if self.state.is_finished() {
            self.scheduler.cancel_all();
            self.ai_turn_armed = None;
        } else {
            self.schedule_ai();
        }
    }

    fn arm_jump_in(&mut self, generation: u64) {
        self.scheduler
            .schedule(TimerKey::JumpInExpiry, generation, self.jump_in_window);

        let ai_seats: Vec<PlayerId> = self
            .state
            .players
            .iter()
            .filter(|(_, p)| p.is_ai)
            .map(|(id, _)| id)
            .collect();
        for player in ai_seats {
            let delay = self.random_delay(self.ai.jump_tick_ms);
            self.scheduler
                .schedule(TimerKey::AiJumpTick(player), generation, delay);
        }
    }

    /// The AI seat expected to act next, if any.
    fn ai_actor(&self) -> Option<PlayerId> {
        match self.state.phase {
            GamePhase::Playing => Some(self.state.current_player).filter(|&p| self.state.players[p].is_ai),
            GamePhase::Setup | GamePhase::Swapping => self
                .state
                .players
                .iter()
                .all(|(_, p)| p.is_ai)
                .then_some(PlayerId::new(0)),
            GamePhase::Finished => None,
        }
    }

    /// Arm the think timer for the acting AI, unless it is already armed
    /// for this phase and turn.
    fn schedule_ai(&mut self) {
        let turn = (self.state.phase, self.state.turn_number);
        if self.ai_actor().is_none() {
            self.scheduler.cancel(TimerKey::AiTurn);
            self.ai_turn_armed = None;
        } else if self.ai_turn_armed != Some(turn) {
            self.scheduler.schedule(
                TimerKey::AiTurn,
                u64::from(self.state.turn_number),
                self.ai.think_delay(),
            );
            self.ai_turn_armed = Some(turn);
        }
    }

    fn on_timer(&mut self, fired: TimerFired) {
        match fired.key {
            TimerKey::JumpInExpiry => match self.rules.expire_jump_in(&mut self.state, fired.stamp) {
                Some(event) => self.commit(&[event]),
                None => debug!(generation = fired.stamp, "stale jump-in expiry ignored"),
            },
            TimerKey::AiTurn => {
                if fired.stamp != u64::from(self.state.turn_number) {
                    debug!(turn = fired.stamp, "stale AI turn timer ignored");
                    return;
                }
                self.ai_turn_armed = None;
                self.run_ai_turn();
            }
            TimerKey::AiJumpTick(player) => {
                if !jump_in::is_current(&self.state, fired.stamp) {
                    return;
                }
                let decided = self
                    .policy
                    .jump_in_tick(&self.rules, &self.state, player, &mut self.rng)
                    .is_some();
                let (key, range) = if decided {
                    (TimerKey::AiJump(player), self.ai.jump_delay_ms)
                } else {
                    (TimerKey::AiJumpTick(player), self.ai.jump_tick_ms)
                };
                let delay = self.random_delay(range);
                self.scheduler.schedule(key, fired.stamp, delay);
            }
            TimerKey::AiJump(player) => {
                let Some(window) = self.state.jump_in.filter(|w| w.generation == fired.stamp) else {
                    return;
                };
                // Another jumper may have been faster; a rejection here is normal.
                let _ = self.apply(player, &Intent::JumpIn { rank: window.rank });
            }
        }
    }

    fn run_ai_turn(&mut self) {
        let Some(actor) = self.ai_actor() else {
            return;
        };
        let Some(intent) = self
            .policy
            .choose_intent(&self.rules, &self.state, actor, &mut self.rng)
        else {
            return;
        };
        if let Err(rejection) = self.apply(actor, &intent) {
            warn!(player = %actor, intent = intent.kind(), %rejection, "AI intent rejected");
        }
    }

    fn random_delay(&mut self, (min, max): (u64, u64)) -> Duration {
        Duration::from_millis(self.rng.gen_range_u64(min..=max))
    }
}
