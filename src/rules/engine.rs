//! The turn/phase state machine.
//!
//! `RulesEngine` is the seam the session, the opponent policy, and the
//! tests all go through; `ShitheadRules` implements it.
//!
//! ## Transition discipline
//!
//! Each intent is validated against the current state first and only then
//! applied, so a `Rejection` always leaves the state untouched and an
//! accepted intent is applied completely before anyone can observe it.

use crate::cards::{build_deck, deal, Card, CardId, Rank};
use crate::core::config::RulesConfig;
use crate::core::{GameConfig, GamePhase, GameRng, GameState, Intent, PlayerId};
use crate::error::{ConfigError, Rejection};
use crate::events::{BurnReason, GameEvent, WindowCloseReason};
use crate::jump_in;
use crate::zones::{self, Zone};

use super::legality::{active_zone, can_play_any, can_play_rank, effective_top, has_duplicates};
use super::pile::{contains_ten, jump_in_rank, should_burn};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub winner: PlayerId,
    /// The player left holding the most cards, if there is one.
    pub loser: Option<PlayerId>,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        self.winner == player
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply_intent`: Must be deterministic and all-or-nothing
/// - `expire_jump_in`: Must ignore generations that are no longer open
/// - `legal_intents`: Return empty if the player can't act
pub trait RulesEngine {
    /// Deal and hand-size configuration.
    fn rules(&self) -> &RulesConfig;

    /// Validate and apply one intent.
    ///
    /// Returns the events produced, in order, or why the intent was dropped.
    fn apply_intent(
        &self,
        state: &mut GameState,
        player: PlayerId,
        intent: &Intent,
    ) -> Result<Vec<GameEvent>, Rejection>;

    /// Close the jump-in window `generation` because its deadline passed.
    ///
    /// Returns `None` without touching the state if that window is gone.
    fn expire_jump_in(&self, state: &mut GameState, generation: u64) -> Option<GameEvent>;

    /// Enumerate the intents `player` could submit right now.
    ///
    /// Plays are listed as single cards plus one whole-rank group per rank.
    fn legal_intents(&self, state: &GameState, player: PlayerId) -> Vec<Intent>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.winner.map(|winner| GameResult {
            winner,
            loser: state.loser,
        })
    }

    /// Would `intent` be accepted? Evaluated on a scratch copy.
    fn is_legal(&self, state: &GameState, player: PlayerId, intent: &Intent) -> bool {
        let mut scratch = state.clone();
        self.apply_intent(&mut scratch, player, intent).is_ok()
    }
}

/// Shithead rules.
#[derive(Clone, Debug, Default)]
pub struct ShitheadRules {
    config: RulesConfig,
}

impl ShitheadRules {
    #[must_use]
    pub fn new(config: RulesConfig) -> Self {
        Self { config }
    }

    /// Validate `config`, shuffle a deck from its seed, and build the
    /// undealt initial state.
    pub fn new_game(config: &GameConfig) -> Result<(Self, GameState), ConfigError> {
        config.validate()?;
        let mut rng = GameRng::new(config.seed).for_context("deck");
        let deck = build_deck(&mut rng);
        let state = GameState::new(&config.seats, deck);
        Ok((Self::new(config.rules.clone()), state))
    }

    // === Setup ===

    fn deal_cards(&self, state: &mut GameState, events: &mut Vec<GameEvent>) -> Result<(), Rejection> {
        require_phase(state, GamePhase::Setup)?;
        if state.is_dealt() {
            return Err(Rejection::AlreadyDealt);
        }

        let mut players = state.players.clone();
        let deck: Vec<Card> = state.deck.iter().copied().collect();
        let rest = deal(&mut players, deck, &self.config).map_err(|_| Rejection::DeckExhausted)?;

        state.players = players;
        state.deck = rest.into_iter().collect();
        events.push(GameEvent::Dealt {
            deck_remaining: state.deck.len(),
        });
        advance_if_all_confirmed(state, events);
        Ok(())
    }

    fn toggle_face_up(
        &self,
        state: &mut GameState,
        player: PlayerId,
        card: CardId,
    ) -> Result<(), Rejection> {
        require_phase(state, GamePhase::Setup)?;
        let p = &mut state.players[player];
        if p.face_up_confirmed {
            return Err(Rejection::AlreadyConfirmed);
        }

        if p.face_up_card(card).is_some() {
            zones::move_card(p, card, Zone::FaceUp, Zone::Hand);
            return Ok(());
        }
        if p.hand_card(card).is_none() {
            return Err(Rejection::CardNotHeld(card));
        }
        if p.face_up.len() >= self.config.face_up_count {
            return Err(Rejection::FaceUpFull(p.face_up.len()));
        }
        zones::move_card(p, card, Zone::Hand, Zone::FaceUp);
        Ok(())
    }

    fn confirm_face_up(
        &self,
        state: &mut GameState,
        player: PlayerId,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), Rejection> {
        require_phase(state, GamePhase::Setup)?;
        let p = &mut state.players[player];
        if p.face_up_confirmed {
            return Err(Rejection::AlreadyConfirmed);
        }
        if p.face_up.len() != self.config.face_up_count {
            return Err(Rejection::FaceUpIncomplete {
                required: self.config.face_up_count,
                actual: p.face_up.len(),
            });
        }

        p.face_up_confirmed = true;
        advance_if_all_confirmed(state, events);
        Ok(())
    }

    fn swap_face_up(
        &self,
        state: &mut GameState,
        player: PlayerId,
        hand_card: CardId,
        face_up_card: CardId,
    ) -> Result<(), Rejection> {
        require_phase(state, GamePhase::Swapping)?;
        let p = &mut state.players[player];
        if p.hand_card(hand_card).is_none() {
            return Err(Rejection::CardNotHeld(hand_card));
        }
        if p.face_up_card(face_up_card).is_none() {
            return Err(Rejection::CardNotHeld(face_up_card));
        }
        zones::swap_hand_face_up(p, hand_card, face_up_card);
        Ok(())
    }

    fn start_game(&self, state: &mut GameState, events: &mut Vec<GameEvent>) -> Result<(), Rejection> {
        require_phase(state, GamePhase::Swapping)?;
        state.phase = GamePhase::Playing;
        events.push(GameEvent::PhaseChanged {
            phase: GamePhase::Playing,
        });
        grant_turn(state, state.current_player, events);
        Ok(())
    }

    // === Play ===

    fn play_cards(
        &self,
        state: &mut GameState,
        player: PlayerId,
        ids: &[CardId],
        events: &mut Vec<GameEvent>,
    ) -> Result<(), Rejection> {
        require_turn(state, player)?;
        if ids.is_empty() {
            return Err(Rejection::EmptySelection);
        }
        if has_duplicates(ids) {
            let dup = ids
                .iter()
                .enumerate()
                .find(|(i, id)| ids[..*i].contains(id))
                .map(|(_, id)| *id)
                .unwrap_or(ids[0]);
            return Err(Rejection::DuplicateCard(dup));
        }

        let p = &state.players[player];
        let zone = match active_zone(p) {
            Some(zone @ (Zone::Hand | Zone::FaceUp)) => zone,
            _ => return Err(Rejection::CardNotHeld(ids[0])),
        };
        let selected = zones::find_all(zone.cards(p), ids).map_err(Rejection::CardNotHeld)?;
        let rank = selected[0].rank;
        if selected.iter().any(|c| c.rank != rank) {
            return Err(Rejection::MixedRanks);
        }
        let top = effective_top(&state.pile).map(|c| c.rank);
        if !can_play_rank(rank, top) {
            return Err(Rejection::Unplayable { rank, top });
        }

        let p = &mut state.players[player];
        let played = zones::take_all(zone.cards_mut(p), ids).map_err(Rejection::CardNotHeld)?;
        state.pile.extend(played.iter().copied());
        zones::replenish(
            &mut state.players[player].hand,
            &mut state.deck,
            self.config.min_hand_size,
        );
        events.push(GameEvent::CardsPlayed {
            player,
            cards: played.clone(),
            from: zone,
        });

        resolve_landing(state, player, &played, events);
        Ok(())
    }

    fn reveal_face_down(
        &self,
        state: &mut GameState,
        player: PlayerId,
        index: usize,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), Rejection> {
        require_turn(state, player)?;
        let p = &state.players[player];
        if !p.hand.is_empty() || !p.face_up.is_empty() {
            return Err(Rejection::FaceDownLocked);
        }
        if index >= p.face_down.len() {
            return Err(Rejection::InvalidFaceDownIndex(index));
        }

        let card = state.players[player].face_down.remove(index);
        let top = effective_top(&state.pile).map(|c| c.rank);
        let playable = can_play_rank(card.rank, top);
        events.push(GameEvent::FaceDownRevealed {
            player,
            card,
            playable,
        });

        if playable {
            state.pile.push_back(card);
            events.push(GameEvent::CardsPlayed {
                player,
                cards: vec![card],
                from: Zone::FaceDown,
            });
            resolve_landing(state, player, &[card], events);
        } else {
            let hand = &mut state.players[player].hand;
            let taken = zones::collect_pile(hand, &mut state.pile);
            hand.push(card);
            events.push(GameEvent::PickedUp {
                player,
                cards: taken + 1,
            });
            jump_in::close(state, WindowCloseReason::Invalidated, events);
            rotate(state, events);
        }
        Ok(())
    }

    fn pickup_pile(
        &self,
        state: &mut GameState,
        player: PlayerId,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), Rejection> {
        require_turn(state, player)?;
        match active_zone(&state.players[player]) {
            Some(Zone::Hand | Zone::FaceUp) => {}
            _ => return Err(Rejection::MustRevealFaceDown),
        }
        if can_play_any(state, player) {
            return Err(Rejection::HasPlayableCard);
        }

        let taken = zones::collect_pile(&mut state.players[player].hand, &mut state.pile);
        events.push(GameEvent::PickedUp {
            player,
            cards: taken,
        });
        jump_in::close(state, WindowCloseReason::Invalidated, events);
        rotate(state, events);
        Ok(())
    }

    fn jump_in(
        &self,
        state: &mut GameState,
        player: PlayerId,
        rank: Rank,
        events: &mut Vec<GameEvent>,
    ) -> Result<(), Rejection> {
        require_phase(state, GamePhase::Playing)?;
        let window = state.jump_in.ok_or(Rejection::NoJumpInWindow)?;
        if window.rank != rank {
            return Err(Rejection::JumpInRankMismatch {
                window: window.rank,
                requested: rank,
            });
        }
        if !state.players[player].holds_rank_in_hand(rank) {
            return Err(Rejection::NoMatchingCards(rank));
        }

        let played = zones::take_rank(&mut state.players[player].hand, rank);
        state.pile.extend(played.iter().copied());
        zones::replenish(
            &mut state.players[player].hand,
            &mut state.deck,
            self.config.min_hand_size,
        );
        events.push(GameEvent::CardsPlayed {
            player,
            cards: played,
            from: Zone::Hand,
        });
        jump_in::close(state, WindowCloseReason::Consumed, events);
        burn(state, player, BurnReason::JumpIn, events);

        if state.players[player].is_out() {
            finish(state, player, events);
        } else {
            state.current_player = player;
            grant_turn(state, player, events);
        }
        Ok(())
    }
}

impl RulesEngine for ShitheadRules {
    fn rules(&self) -> &RulesConfig {
        &self.config
    }

    fn apply_intent(
        &self,
        state: &mut GameState,
        player: PlayerId,
        intent: &Intent,
    ) -> Result<Vec<GameEvent>, Rejection> {
        if state.is_finished() {
            return Err(Rejection::GameFinished);
        }
        if state.player(player).is_none() {
            return Err(Rejection::UnknownPlayer(player));
        }

        let mut events = Vec::new();
        match intent {
            Intent::DealCards => self.deal_cards(state, &mut events)?,
            Intent::ToggleFaceUp { card } => self.toggle_face_up(state, player, *card)?,
            Intent::ConfirmFaceUp => self.confirm_face_up(state, player, &mut events)?,
            Intent::SwapFaceUp {
                hand_card,
                face_up_card,
            } => self.swap_face_up(state, player, *hand_card, *face_up_card)?,
            Intent::StartGame => self.start_game(state, &mut events)?,
            Intent::PlayCards { cards } => self.play_cards(state, player, cards, &mut events)?,
            Intent::PickupPile => self.pickup_pile(state, player, &mut events)?,
            Intent::RevealFaceDown { index } => {
                self.reveal_face_down(state, player, *index, &mut events)?
            }
            Intent::JumpIn { rank } => self.jump_in(state, player, *rank, &mut events)?,
        }

        state.revision += 1;
        Ok(events)
    }

    fn expire_jump_in(&self, state: &mut GameState, generation: u64) -> Option<GameEvent> {
        let event = jump_in::expire(state, generation)?;
        state.revision += 1;
        Some(event)
    }

    fn legal_intents(&self, state: &GameState, player: PlayerId) -> Vec<Intent> {
        let Some(p) = state.player(player) else {
            return Vec::new();
        };
        let mut intents = Vec::new();

        match state.phase {
            GamePhase::Finished => {}
            GamePhase::Setup => {
                if !state.is_dealt() {
                    intents.push(Intent::DealCards);
                } else if !p.face_up_confirmed {
                    if p.face_up.len() < self.config.face_up_count {
                        intents.extend(p.hand.iter().map(|c| Intent::ToggleFaceUp { card: c.id }));
                    }
                    intents.extend(p.face_up.iter().map(|c| Intent::ToggleFaceUp { card: c.id }));
                    if p.face_up.len() == self.config.face_up_count {
                        intents.push(Intent::ConfirmFaceUp);
                    }
                }
            }
            GamePhase::Swapping => {
                for h in &p.hand {
                    for u in &p.face_up {
                        intents.push(Intent::SwapFaceUp {
                            hand_card: h.id,
                            face_up_card: u.id,
                        });
                    }
                }
                intents.push(Intent::StartGame);
            }
            GamePhase::Playing => {
                if let Some(window) = state.jump_in {
                    if p.holds_rank_in_hand(window.rank) {
                        intents.push(Intent::JumpIn { rank: window.rank });
                    }
                }
                if state.current_player != player {
                    return intents;
                }

                let top = effective_top(&state.pile).map(|c| c.rank);
                match active_zone(p) {
                    Some(zone @ (Zone::Hand | Zone::FaceUp)) => {
                        let cards = zone.cards(p);
                        let mut ranks: Vec<Rank> = cards
                            .iter()
                            .map(|c| c.rank)
                            .filter(|&r| can_play_rank(r, top))
                            .collect();
                        ranks.sort_unstable();
                        ranks.dedup();

                        for rank in ranks {
                            let group: Vec<CardId> =
                                cards.iter().filter(|c| c.rank == rank).map(|c| c.id).collect();
                            intents.extend(group.iter().map(|&id| Intent::play(&[id])));
                            if group.len() > 1 {
                                intents.push(Intent::play(&group));
                            }
                        }
                        if !can_play_any(state, player) {
                            intents.push(Intent::PickupPile);
                        }
                    }
                    Some(Zone::FaceDown) => {
                        intents.extend((0..p.face_down.len()).map(|index| Intent::RevealFaceDown { index }));
                    }
                    None => {}
                }
            }
        }

        intents
    }
}

// === Shared transition steps ===

fn require_phase(state: &GameState, expected: GamePhase) -> Result<(), Rejection> {
    if state.phase == expected {
        Ok(())
    } else {
        Err(Rejection::WrongPhase {
            expected,
            actual: state.phase,
        })
    }
}

fn require_turn(state: &GameState, player: PlayerId) -> Result<(), Rejection> {
    require_phase(state, GamePhase::Playing)?;
    if state.current_player == player {
        Ok(())
    } else {
        Err(Rejection::NotYourTurn {
            player,
            current: state.current_player,
        })
    }
}

fn advance_if_all_confirmed(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.players.iter().all(|(_, p)| p.face_up_confirmed) {
        state.phase = GamePhase::Swapping;
        events.push(GameEvent::PhaseChanged {
            phase: GamePhase::Swapping,
        });
    }
}

/// Burn, win, rotate, and jump-in checks after cards land on the pile.
fn resolve_landing(state: &mut GameState, player: PlayerId, played: &[Card], events: &mut Vec<GameEvent>) {
    let reason = if should_burn(&state.pile) {
        Some(BurnReason::FourOfAKind)
    } else if contains_ten(played) {
        Some(BurnReason::Ten)
    } else {
        None
    };

    if let Some(reason) = reason {
        jump_in::close(state, WindowCloseReason::Invalidated, events);
        burn(state, player, reason, events);
    }

    if state.players[player].is_out() {
        finish(state, player, events);
        return;
    }

    if reason.is_some() {
        grant_turn(state, player, events);
        return;
    }

    rotate(state, events);
    match jump_in_rank(&state.pile) {
        Some(rank) => {
            jump_in::open(state, rank, events);
        }
        None => jump_in::close(state, WindowCloseReason::Invalidated, events),
    }
}

fn burn(state: &mut GameState, player: PlayerId, reason: BurnReason, events: &mut Vec<GameEvent>) {
    let cards = state.pile.len();
    let pile = std::mem::take(&mut state.pile);
    state.burned.append(pile);
    events.push(GameEvent::Burned {
        player,
        reason,
        cards,
    });
}

fn rotate(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let next = state.current_player.next(state.player_count());
    state.current_player = next;
    grant_turn(state, next, events);
}

fn grant_turn(state: &mut GameState, player: PlayerId, events: &mut Vec<GameEvent>) {
    state.turn_number += 1;
    events.push(GameEvent::TurnStarted {
        player,
        turn_number: state.turn_number,
    });
}

fn finish(state: &mut GameState, winner: PlayerId, events: &mut Vec<GameEvent>) {
    jump_in::close(state, WindowCloseReason::Invalidated, events);
    let loser = pick_loser(state, winner);
    state.phase = GamePhase::Finished;
    state.winner = Some(winner);
    state.loser = loser;
    events.push(GameEvent::PhaseChanged {
        phase: GamePhase::Finished,
    });
    events.push(GameEvent::GameFinished { winner, loser });
}

/// Player holding the most cards; ties go to the earliest seat after the winner.
fn pick_loser(state: &GameState, winner: PlayerId) -> Option<PlayerId> {
    let count = state.player_count();
    let mut best: Option<(PlayerId, usize)> = None;
    let mut seat = winner;
    for _ in 1..count {
        seat = seat.next(count);
        let held = state.players[seat].card_count();
        if best.map_or(true, |(_, most)| held > most) {
            best = Some((seat, held));
        }
    }
    best.map(|(p, _)| p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;
    use crate::core::SeatConfig;

    fn card(id: u32, rank: u8) -> Card {
        Card::new(CardId::new(id), Suit::Diamonds, Rank(rank))
    }

    /// A two-player game in `Playing` with hand-built zones and empty deck.
    fn playing(hands: [Vec<Card>; 2]) -> GameState {
        let seats = [SeatConfig::human("a"), SeatConfig::human("b")];
        let mut state = GameState::new(&seats, Vec::new());
        let [h0, h1] = hands;
        state.players[PlayerId::new(0)].hand = h0;
        state.players[PlayerId::new(1)].hand = h1;
        for (_, p) in state.players.iter_mut() {
            p.face_down = vec![card(900 + p.id.0 as u32, 14)];
            p.face_up_confirmed = true;
        }
        state.phase = GamePhase::Playing;
        state
    }

    #[test]
    fn test_new_game_is_undealt() {
        let (rules, state) = ShitheadRules::new_game(&GameConfig::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Setup);
        assert_eq!(state.deck.len(), 52);
        assert_eq!(rules.legal_intents(&state, PlayerId::new(0)), vec![Intent::DealCards]);
    }

    #[test]
    fn test_new_game_rejects_bad_config() {
        let config = GameConfig::new(vec![SeatConfig::human("solo")]);
        assert!(ShitheadRules::new_game(&config).is_err());
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![card(1, 9)], vec![card(2, 3)]]);
        state.pile.push_back(card(3, 12));
        let before = state.clone();

        let err = rules
            .apply_intent(&mut state, PlayerId::new(0), &Intent::play(&[CardId::new(1)]))
            .unwrap_err();

        assert_eq!(err, Rejection::Unplayable { rank: Rank(9), top: Some(Rank::QUEEN) });
        assert_eq!(state, before);
    }

    #[test]
    fn test_duplicate_selection_rejected() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![card(1, 9), card(2, 9)], vec![]]);
        let err = rules
            .apply_intent(&mut state, PlayerId::new(0), &Intent::play(&[CardId::new(1), CardId::new(1)]))
            .unwrap_err();
        assert_eq!(err, Rejection::DuplicateCard(CardId::new(1)));
    }

    #[test]
    fn test_mixed_ranks_rejected() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![card(1, 9), card(2, 8)], vec![]]);
        let err = rules
            .apply_intent(&mut state, PlayerId::new(0), &Intent::play(&[CardId::new(1), CardId::new(2)]))
            .unwrap_err();
        assert_eq!(err, Rejection::MixedRanks);
    }

    #[test]
    fn test_face_up_locked_while_hand_holds_cards() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![card(1, 9)], vec![]]);
        state.players[PlayerId::new(0)].face_up = vec![card(2, 5)];
        let err = rules
            .apply_intent(&mut state, PlayerId::new(0), &Intent::play(&[CardId::new(2)]))
            .unwrap_err();
        assert_eq!(err, Rejection::CardNotHeld(CardId::new(2)));
    }

    #[test]
    fn test_pickup_refused_when_playable() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![card(1, 9)], vec![]]);
        state.pile.push_back(card(3, 4));
        assert_eq!(
            rules.apply_intent(&mut state, PlayerId::new(0), &Intent::PickupPile),
            Err(Rejection::HasPlayableCard)
        );
    }

    #[test]
    fn test_pickup_moves_pile_and_rotates() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![card(1, 3)], vec![card(2, 5)]]);
        state.pile.push_back(card(3, 9));
        state.pile.push_back(card(4, 11));

        let events = rules
            .apply_intent(&mut state, PlayerId::new(0), &Intent::PickupPile)
            .unwrap();

        assert!(state.pile.is_empty());
        assert_eq!(state.players[PlayerId::new(0)].hand.len(), 3);
        assert_eq!(state.current_player, PlayerId::new(1));
        assert!(events.contains(&GameEvent::PickedUp { player: PlayerId::new(0), cards: 2 }));
    }

    #[test]
    fn test_pickup_refused_with_only_face_down() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![], vec![card(2, 5)]]);
        state.pile.push_back(card(3, 14));
        assert_eq!(
            rules.apply_intent(&mut state, PlayerId::new(0), &Intent::PickupPile),
            Err(Rejection::MustRevealFaceDown)
        );
    }

    #[test]
    fn test_reveal_unplayable_picks_up() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![], vec![card(2, 5)]]);
        state.players[PlayerId::new(0)].face_down = vec![card(10, 4), card(11, 13)];
        state.pile.push_back(card(3, 9));

        let events = rules
            .apply_intent(&mut state, PlayerId::new(0), &Intent::RevealFaceDown { index: 0 })
            .unwrap();

        let p0 = &state.players[PlayerId::new(0)];
        assert_eq!(p0.hand, vec![card(3, 9), card(10, 4)]);
        assert_eq!(p0.face_down, vec![card(11, 13)]);
        assert!(state.pile.is_empty());
        assert_eq!(state.current_player, PlayerId::new(1));
        assert!(events.contains(&GameEvent::FaceDownRevealed {
            player: PlayerId::new(0),
            card: card(10, 4),
            playable: false,
        }));
    }

    #[test]
    fn test_reveal_playable_lands_on_pile() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![], vec![card(2, 5)]]);
        state.players[PlayerId::new(0)].face_down = vec![card(10, 12), card(11, 13)];
        state.pile.push_back(card(3, 9));

        rules
            .apply_intent(&mut state, PlayerId::new(0), &Intent::RevealFaceDown { index: 0 })
            .unwrap();

        assert_eq!(state.pile.last(), Some(&card(10, 12)));
        assert!(state.players[PlayerId::new(0)].hand.is_empty());
        assert_eq!(state.current_player, PlayerId::new(1));
    }

    #[test]
    fn test_reveal_locked_and_bad_index() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![card(1, 3)], vec![]]);
        assert_eq!(
            rules.apply_intent(&mut state, PlayerId::new(0), &Intent::RevealFaceDown { index: 0 }),
            Err(Rejection::FaceDownLocked)
        );

        state.players[PlayerId::new(0)].hand.clear();
        assert_eq!(
            rules.apply_intent(&mut state, PlayerId::new(0), &Intent::RevealFaceDown { index: 5 }),
            Err(Rejection::InvalidFaceDownIndex(5))
        );
    }

    #[test]
    fn test_finished_rejects_everything() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![card(1, 3)], vec![]]);
        state.phase = GamePhase::Finished;
        assert_eq!(
            rules.apply_intent(&mut state, PlayerId::new(0), &Intent::play(&[CardId::new(1)])),
            Err(Rejection::GameFinished)
        );
        assert!(rules.legal_intents(&state, PlayerId::new(0)).is_empty());
    }

    #[test]
    fn test_unknown_player() {
        let rules = ShitheadRules::default();
        let mut state = playing([vec![], vec![]]);
        assert_eq!(
            rules.apply_intent(&mut state, PlayerId::new(7), &Intent::PickupPile),
            Err(Rejection::UnknownPlayer(PlayerId::new(7)))
        );
    }

    #[test]
    fn test_loser_has_most_cards() {
        let mut state = playing([vec![], vec![card(1, 3)]]);
        state.players[PlayerId::new(0)].face_down.clear();
        assert_eq!(pick_loser(&state, PlayerId::new(0)), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_setup_flow() {
        let config = GameConfig::new(vec![SeatConfig::human("me"), SeatConfig::ai("bot")]);
        let (rules, mut state) = ShitheadRules::new_game(&config).unwrap();
        let me = PlayerId::new(0);

        rules.apply_intent(&mut state, me, &Intent::DealCards).unwrap();
        assert_eq!(
            rules.apply_intent(&mut state, me, &Intent::DealCards),
            Err(Rejection::AlreadyDealt)
        );
        assert_eq!(
            rules.apply_intent(&mut state, me, &Intent::ConfirmFaceUp),
            Err(Rejection::FaceUpIncomplete { required: 3, actual: 0 })
        );

        let hand: Vec<CardId> = state.players[me].hand.iter().map(|c| c.id).collect();
        for id in &hand[..4] {
            let _ = rules.apply_intent(&mut state, me, &Intent::ToggleFaceUp { card: *id });
        }
        // The fourth toggle was refused; take one back and re-pick.
        assert_eq!(state.players[me].face_up.len(), 3);
        rules
            .apply_intent(&mut state, me, &Intent::ToggleFaceUp { card: hand[0] })
            .unwrap();
        assert_eq!(state.players[me].face_up.len(), 2);
        rules
            .apply_intent(&mut state, me, &Intent::ToggleFaceUp { card: hand[5] })
            .unwrap();

        let events = rules.apply_intent(&mut state, me, &Intent::ConfirmFaceUp).unwrap();
        assert_eq!(events, vec![GameEvent::PhaseChanged { phase: GamePhase::Swapping }]);

        let h = state.players[me].hand[0].id;
        let u = state.players[me].face_up[0].id;
        rules
            .apply_intent(&mut state, me, &Intent::SwapFaceUp { hand_card: h, face_up_card: u })
            .unwrap();
        assert_eq!(state.players[me].face_up[0].id, h);

        rules.apply_intent(&mut state, me, &Intent::StartGame).unwrap();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.turn_number, 1);
    }
}
