//! Rules engine scenarios: legality, burns, turn order, winning, dealing.

mod common;

use common::{card, cards, ids, pile_ranks, Table};
use shithead::cards::{deal, ordered_deck, CardId, Rank};
use shithead::core::{GameConfig, GamePhase, GameRng, Intent, PlayerId, PlayerMap, Player, RulesConfig, SeatConfig};
use shithead::events::{BurnReason, GameEvent};
use shithead::rules::{can_play, effective_top, RulesEngine, ShitheadRules};
use shithead::{HeuristicPolicy, OpponentPolicy, Rejection};

const P0: PlayerId = PlayerId::new(0);
const P1: PlayerId = PlayerId::new(1);
const P2: PlayerId = PlayerId::new(2);

#[test]
fn test_seven_caps_next_play() {
    let rules = ShitheadRules::default();
    let mut state = Table::new(2)
        .hand(0, cards(1, &[7, 13]))
        .hand(1, cards(10, &[8, 4]))
        .build();

    rules.apply_intent(&mut state, P0, &Intent::play(&[CardId::new(1)])).unwrap();

    let top = effective_top(&state.pile);
    assert_eq!(top.map(|c| c.rank), Some(Rank::SEVEN));
    assert!(!can_play(&card(10, 8), top.as_ref()));
    assert!(can_play(&card(11, 4), top.as_ref()));

    assert_eq!(
        rules.apply_intent(&mut state, P1, &Intent::play(&[CardId::new(10)])),
        Err(Rejection::Unplayable { rank: Rank(8), top: Some(Rank::SEVEN) })
    );
    rules.apply_intent(&mut state, P1, &Intent::play(&[CardId::new(11)])).unwrap();
    assert_eq!(pile_ranks(&state), vec![7, 4]);
    assert_eq!(state.current_player, P0);
}

#[test]
fn test_ten_burns_and_keeps_turn() {
    let rules = ShitheadRules::default();
    let mut state = Table::new(3)
        .hand(0, cards(1, &[10, 3]))
        .hand(1, cards(10, &[4]))
        .hand(2, cards(20, &[4]))
        .pile(cards(30, &[13, 14]))
        .build();
    let turn = state.turn_number;

    let events = rules.apply_intent(&mut state, P0, &Intent::play(&[CardId::new(1)])).unwrap();

    assert!(state.pile.is_empty());
    assert_eq!(state.current_player, P0);
    assert_eq!(state.turn_number, turn + 1);
    assert!(events.contains(&GameEvent::Burned { player: P0, reason: BurnReason::Ten, cards: 3 }));
    assert!(events.contains(&GameEvent::TurnStarted { player: P0, turn_number: turn + 1 }));
}

#[test]
fn test_four_of_a_kind_burns_and_keeps_turn() {
    let rules = ShitheadRules::default();
    let mut state = Table::new(2)
        .hand(0, cards(1, &[8, 8, 8, 3]))
        .hand(1, cards(10, &[4]))
        .pile(cards(30, &[6, 8]))
        .build();

    let events = rules
        .apply_intent(&mut state, P0, &Intent::play(&[CardId::new(1), CardId::new(2), CardId::new(3)]))
        .unwrap();

    assert!(state.pile.is_empty());
    assert_eq!(state.current_player, P0);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::Burned { reason: BurnReason::FourOfAKind, cards: 5, .. }
    )));
    // A burn never leaves a jump-in window behind.
    assert!(state.jump_in.is_none());
}

#[test]
fn test_win_takes_precedence_over_burn() {
    let rules = ShitheadRules::default();
    let mut state = Table::new(3)
        .face_up(0, cards(1, &[10]))
        .hand(1, cards(10, &[4, 5]))
        .hand(2, cards(20, &[4]))
        .pile(cards(30, &[9]))
        .build();

    let events = rules.apply_intent(&mut state, P0, &Intent::play(&[CardId::new(1)])).unwrap();

    assert_eq!(state.phase, GamePhase::Finished);
    assert_eq!(state.winner, Some(P0));
    assert_eq!(state.loser, Some(P1));
    assert!(state.pile.is_empty());
    assert_eq!(events.last(), Some(&GameEvent::GameFinished { winner: P0, loser: Some(P1) }));
    assert_eq!(rules.is_terminal(&state).map(|r| r.winner), Some(P0));

    assert_eq!(
        rules.apply_intent(&mut state, P1, &Intent::play(&[CardId::new(10)])),
        Err(Rejection::GameFinished)
    );
}

#[test]
fn test_loser_tie_goes_to_earliest_after_winner() {
    let rules = ShitheadRules::default();
    let mut state = Table::new(4)
        .current(2)
        .hand(2, cards(1, &[9]))
        .hand(3, cards(10, &[4, 5]))
        .hand(0, cards(20, &[4, 5]))
        .hand(1, cards(30, &[4]))
        .build();

    rules.apply_intent(&mut state, P2, &Intent::play(&[CardId::new(1)])).unwrap();

    assert_eq!(state.winner, Some(P2));
    assert_eq!(state.loser, Some(PlayerId::new(3)));
}

#[test]
fn test_two_resets_pile() {
    let rules = ShitheadRules::default();
    let mut state = Table::new(2)
        .hand(0, cards(1, &[2, 9]))
        .hand(1, cards(10, &[3, 9]))
        .pile(cards(30, &[14]))
        .build();

    rules.apply_intent(&mut state, P0, &Intent::play(&[CardId::new(1)])).unwrap();
    assert_eq!(state.current_player, P1);
    assert!(effective_top(&state.pile).is_none());

    rules.apply_intent(&mut state, P1, &Intent::play(&[CardId::new(10)])).unwrap();
    assert_eq!(pile_ranks(&state), vec![14, 2, 3]);
}

#[test]
fn test_play_replenishes_from_deck() {
    let rules = ShitheadRules::default();
    let mut state = Table::new(2)
        .hand(0, cards(1, &[5, 6, 7]))
        .hand(1, cards(10, &[9, 4]))
        .deck(cards(40, &[12]))
        .build();

    rules.apply_intent(&mut state, P0, &Intent::play(&[CardId::new(1)])).unwrap();
    assert_eq!(ids(&state.players[P0].hand), vec![CardId::new(2), CardId::new(3), CardId::new(40)]);
    assert!(state.deck.is_empty());

    // Deck exhausted: no draw and no error.
    rules.apply_intent(&mut state, P1, &Intent::play(&[CardId::new(10)])).unwrap();
    assert_eq!(ids(&state.players[P1].hand), vec![CardId::new(11)]);
}

#[test]
fn test_face_up_then_face_down() {
    let rules = ShitheadRules::default();
    let mut state = Table::new(2)
        .face_up(0, cards(1, &[6, 6]))
        .face_down(0, cards(5, &[13]))
        .hand(1, cards(10, &[3, 4]))
        .build();

    assert_eq!(
        rules.apply_intent(&mut state, P0, &Intent::RevealFaceDown { index: 0 }),
        Err(Rejection::FaceDownLocked)
    );
    rules
        .apply_intent(&mut state, P0, &Intent::play(&[CardId::new(1), CardId::new(2)]))
        .unwrap();
    assert!(state.players[P0].face_up.is_empty());

    // P1 cannot beat a 6 and picks up.
    rules.apply_intent(&mut state, P1, &Intent::PickupPile).unwrap();
    assert_eq!(state.players[P1].hand.len(), 4);

    let events = rules.apply_intent(&mut state, P0, &Intent::RevealFaceDown { index: 0 }).unwrap();
    assert!(events.iter().any(|e| matches!(e, GameEvent::FaceDownRevealed { playable: true, .. })));
    assert_eq!(state.winner, Some(P0));
}

#[test]
fn test_wrong_turn_and_phase() {
    let rules = ShitheadRules::default();
    let mut state = Table::new(2)
        .hand(0, cards(1, &[5]))
        .hand(1, cards(10, &[6]))
        .build();

    assert_eq!(
        rules.apply_intent(&mut state, P1, &Intent::play(&[CardId::new(10)])),
        Err(Rejection::NotYourTurn { player: P1, current: P0 })
    );
    assert_eq!(
        rules.apply_intent(&mut state, P0, &Intent::StartGame),
        Err(Rejection::WrongPhase { expected: GamePhase::Swapping, actual: GamePhase::Playing })
    );
    assert_eq!(
        rules.apply_intent(&mut state, P0, &Intent::PlayCards { cards: Default::default() }),
        Err(Rejection::EmptySelection)
    );
}

#[test]
fn test_revision_counts_accepted_transitions() {
    let rules = ShitheadRules::default();
    let mut state = Table::new(2)
        .hand(0, cards(1, &[5, 9]))
        .hand(1, cards(10, &[6, 9]))
        .build();

    rules.apply_intent(&mut state, P0, &Intent::play(&[CardId::new(1)])).unwrap();
    let _ = rules.apply_intent(&mut state, P0, &Intent::play(&[CardId::new(2)]));
    rules.apply_intent(&mut state, P1, &Intent::play(&[CardId::new(10)])).unwrap();

    assert_eq!(state.revision, 2);
}

#[test]
fn test_deal_is_round_robin() {
    let deck = ordered_deck();
    let seats: Vec<SeatConfig> = (0..4).map(|i| SeatConfig::human(format!("p{i}"))).collect();
    let mut players = PlayerMap::new(4, |p| Player::new(p, seats[p.index()].name.clone(), false));
    let rules = RulesConfig::default();

    let rest = deal(&mut players, deck.clone(), &rules).unwrap();

    for (id, player) in players.iter() {
        let i = id.index();
        let expected_hand: Vec<_> = (0..6).map(|k| deck[k * 4 + i]).collect();
        let expected_down: Vec<_> = (0..3).map(|k| deck[24 + k * 4 + i]).collect();
        assert_eq!(player.hand, expected_hand);
        assert_eq!(player.face_down, expected_down);
        assert!(player.face_up.is_empty());
    }
    assert_eq!(rest, deck[36..].to_vec());
}

#[test]
fn test_same_seed_same_game() {
    let config = GameConfig::default().with_seed(7);
    let (rules, mut a) = ShitheadRules::new_game(&config).unwrap();
    let (_, mut b) = ShitheadRules::new_game(&config).unwrap();
    rules.apply_intent(&mut a, P0, &Intent::DealCards).unwrap();
    rules.apply_intent(&mut b, P0, &Intent::DealCards).unwrap();
    assert_eq!(a, b);

    let (_, mut c) = ShitheadRules::new_game(&config.with_seed(8)).unwrap();
    rules.apply_intent(&mut c, P0, &Intent::DealCards).unwrap();
    assert_ne!(a.players[P0].hand, c.players[P0].hand);
}

#[test]
fn test_ai_seats_pick_face_up_at_deal() {
    let config = GameConfig::default();
    let (rules, mut state) = ShitheadRules::new_game(&config).unwrap();
    rules.apply_intent(&mut state, P0, &Intent::DealCards).unwrap();

    assert_eq!(state.phase, GamePhase::Setup);
    assert!(!state.players[P0].face_up_confirmed);
    for seat in [P1, P2, PlayerId::new(3)] {
        let p = &state.players[seat];
        assert!(p.face_up_confirmed);
        assert_eq!(p.face_up.len(), 3);
        assert_eq!(p.hand.len(), 3);
        let highest_up = p.face_up.iter().map(|c| c.rank).max().unwrap();
        let lowest_kept = p.hand.iter().map(|c| c.rank).min().unwrap();
        assert!(highest_up <= lowest_kept);
    }
    assert_eq!(state.deck.len(), 52 - 4 * 9);
}

/// A whole heuristic game runs to completion without the session.
#[test]
fn test_heuristic_playout_finishes() {
    let seats = vec![SeatConfig::ai("a"), SeatConfig::ai("b"), SeatConfig::ai("c")];
    let config = GameConfig::new(seats).with_seed(3);
    let (rules, mut state) = ShitheadRules::new_game(&config).unwrap();
    let policy = HeuristicPolicy::new(config.ai.clone());
    let mut rng = GameRng::new(config.seed).for_context("ai");

    for _ in 0..5_000 {
        if state.is_finished() {
            break;
        }
        let actor = match state.phase {
            GamePhase::Playing => state.current_player,
            _ => P0,
        };
        let intent = policy
            .choose_intent(&rules, &state, actor, &mut rng)
            .expect("AI always has a move");
        rules.apply_intent(&mut state, actor, &intent).unwrap();

        let mut all: Vec<u32> = state.all_card_ids().iter().map(|c| c.raw()).collect();
        all.sort_unstable();
        assert_eq!(all, (0..52).collect::<Vec<_>>());
    }

    assert!(state.is_finished());
    assert!(state.winner.is_some());
}
