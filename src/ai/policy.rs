//! Opponent policies: what an AI seat submits and when it jumps in.
//!
//! - `HeuristicPolicy`: the default table opponent. Plays its lowest legal
//!   rank, holding 2s and 10s back, and picks up only when it must.
//! - `UniformOpponent`: uniform over `RulesEngine::legal_intents`. Used for
//!   randomized playouts.

use crate::cards::{Card, CardId};
use crate::core::{AiConfig, GamePhase, GameRng, GameState, Intent, PlayerId};
use crate::rules::legality::{active_zone, can_play_rank, effective_top};
use crate::rules::RulesEngine;
use crate::zones::Zone;

/// Policy for choosing an AI seat's next intent.
pub trait OpponentPolicy<E: RulesEngine>: Send + Sync {
    /// Choose the intent `player` submits when its think timer fires.
    ///
    /// Returns `None` if the player has nothing to do.
    fn choose_intent(
        &self,
        engine: &E,
        state: &GameState,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Intent>;

    /// One jump-in tick: should `player` jump into the open window now?
    ///
    /// Returns the `JumpIn` intent on success.
    fn jump_in_tick(
        &self,
        engine: &E,
        state: &GameState,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Intent>;
}

/// Heuristic opponent.
#[derive(Clone, Debug, Default)]
pub struct HeuristicPolicy {
    config: AiConfig,
}

impl HeuristicPolicy {
    #[must_use]
    pub fn new(config: AiConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Setup and swapping are driven by humans unless every seat is an AI.
    fn setup_intent(state: &GameState) -> Option<Intent> {
        if !state.players.iter().all(|(_, p)| p.is_ai) {
            return None;
        }
        match state.phase {
            GamePhase::Setup if !state.is_dealt() => Some(Intent::DealCards),
            GamePhase::Swapping => Some(Intent::StartGame),
            _ => None,
        }
    }

    fn play_intent(&self, state: &GameState, player: PlayerId, rng: &mut GameRng) -> Option<Intent> {
        let p = state.player(player)?;
        match active_zone(p)? {
            Zone::FaceDown => Some(Intent::RevealFaceDown {
                index: rng.gen_range_usize(0..p.face_down.len()),
            }),
            zone => {
                let cards = zone.cards(p);
                let top = effective_top(&state.pile).map(|c| c.rank);
                let Some(choice) = cards
                    .iter()
                    .filter(|c| can_play_rank(c.rank, top))
                    .min_by_key(|c| preference(c))
                else {
                    return Some(Intent::PickupPile);
                };

                if rng.gen_bool(self.config.play_all_probability) {
                    let group: Vec<CardId> = cards
                        .iter()
                        .filter(|c| c.rank == choice.rank)
                        .map(|c| c.id)
                        .collect();
                    Some(Intent::play(&group))
                } else {
                    Some(Intent::play(&[choice.id]))
                }
            }
        }
    }
}

/// Sort key: ordinary ranks low to high, then 2s and 10s.
fn preference(card: &Card) -> (bool, crate::cards::Rank) {
    (card.rank.is_special(), card.rank)
}

impl<E: RulesEngine> OpponentPolicy<E> for HeuristicPolicy {
    fn choose_intent(
        &self,
        _engine: &E,
        state: &GameState,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Intent> {
        match state.phase {
            GamePhase::Setup | GamePhase::Swapping => Self::setup_intent(state),
            GamePhase::Playing if state.current_player == player => {
                self.play_intent(state, player, rng)
            }
            _ => None,
        }
    }

    fn jump_in_tick(
        &self,
        _engine: &E,
        state: &GameState,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Intent> {
        let window = state.jump_in?;
        let p = state.player(player)?;
        if !p.holds_rank_in_hand(window.rank) {
            return None;
        }
        rng.gen_bool(self.config.jump_in_probability)
            .then_some(Intent::JumpIn { rank: window.rank })
    }
}

/// Uniform random opponent.
///
/// Selects uniformly from legal intents.
#[derive(Clone, Debug, Default)]
pub struct UniformOpponent;

impl<E: RulesEngine> OpponentPolicy<E> for UniformOpponent {
    fn choose_intent(
        &self,
        engine: &E,
        state: &GameState,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Intent> {
        let intents = engine.legal_intents(state, player);
        rng.choose(&intents).cloned()
    }

    fn jump_in_tick(
        &self,
        _engine: &E,
        state: &GameState,
        player: PlayerId,
        rng: &mut GameRng,
    ) -> Option<Intent> {
        let window = state.jump_in?;
        let holds = state.player(player)?.holds_rank_in_hand(window.rank);
        (holds && rng.gen_bool(0.5)).then_some(Intent::JumpIn { rank: window.rank })
    }
}
