/// Property-based tests for the match state machine using proptest
///
/// Random action sequences are driven through the dispatcher and the
/// aggregate's structural invariants are checked after every step.
use darts_engine::{
    Action, Dispatcher, MatchState, Multiplier, Player, PlayerId,
    capabilities::{FixedClock, SequentialIds},
    constants::MAX_UNDO_DEPTH,
    entities::{CheckRule, DartIndex, GameConfig, MatchFormat, PracticeConfig, StartPoints, X01Config},
};
use proptest::prelude::*;
use rand::{SeedableRng, rngs::StdRng};

fn dispatcher(seed: u64) -> Dispatcher {
    Dispatcher::with_capabilities(
        Box::new(SequentialIds::new("t")),
        Box::new(FixedClock(0)),
        StdRng::seed_from_u64(seed),
    )
}

fn players(n: usize) -> Vec<Player> {
    (1..=n)
        .map(|i| Player::new(PlayerId::new(&format!("p{i}")), &format!("Player {i}")))
        .collect()
}

fn multiplier_strategy() -> impl Strategy<Value = Multiplier> {
    prop_oneof![
        Just(Multiplier::Single),
        Just(Multiplier::Double),
        Just(Multiplier::Triple),
    ]
}

fn check_rule_strategy() -> impl Strategy<Value = CheckRule> {
    prop_oneof![
        Just(CheckRule::Straight),
        Just(CheckRule::Double),
        Just(CheckRule::Master),
    ]
}

// Raw keypad values, including some outside the dart domain
fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        6 => (-5i32..=30).prop_map(|value| Action::Throw { value }),
        2 => multiplier_strategy().prop_map(|value| Action::SetMultiplier { value }),
        1 => Just(Action::NextPlayer),
        1 => Just(Action::Undo),
    ]
}

fn x01_config_strategy() -> impl Strategy<Value = X01Config> {
    (
        prop_oneof![
            Just(StartPoints::P301),
            Just(StartPoints::P501),
            Just(StartPoints::P701)
        ],
        check_rule_strategy(),
        check_rule_strategy(),
        1u32..=3,
        1u32..=3,
        1u32..=3,
    )
        .prop_map(|(start_points, check_in, check_out, legs_per_set, sets, n)| X01Config {
            start_points,
            check_in,
            check_out,
            legs_per_set,
            sets,
            format: MatchFormat::FirstTo(n),
            random_order: false,
        })
}

fn new_match(d: &mut Dispatcher, config: GameConfig, n: usize) -> MatchState {
    d.dispatch(
        None,
        Action::NewGame {
            config,
            players: players(n),
        },
    )
    .unwrap()
    .unwrap()
}

fn assert_invariants(state: &MatchState) -> Result<(), TestCaseError> {
    prop_assert!(state.validate().is_ok(), "aggregate should stay valid");
    prop_assert!(state.undo_stack.len() <= MAX_UNDO_DEPTH);
    prop_assert!(state.current_player_index < state.players.len());
    prop_assert!(state.starting_player_index < state.players.len());
    Ok(())
}

proptest! {
    #[test]
    fn test_random_actions_keep_invariants(
        cfg in x01_config_strategy(),
        n in 2usize..=4,
        actions in prop::collection::vec(action_strategy(), 1..200),
    ) {
        let mut d = dispatcher(1);
        let mut state = new_match(&mut d, GameConfig::X01(cfg), n);

        for action in actions {
            let before = state.clone();
            let is_throw = matches!(action, Action::Throw { .. });
            let is_next = matches!(action, Action::NextPlayer);
            state = d.dispatch(Some(state), action).unwrap().unwrap();
            assert_invariants(&state)?;

            if before.is_finished && (is_throw || is_next) {
                prop_assert_eq!(&state, &before, "finished match should ignore play");
                continue;
            }
            if is_throw || is_next {
                prop_assert_eq!(state.multiplier, Multiplier::Single);
            }
            if is_throw {
                // Either the next slot of the same turn, or a fresh turn.
                let same_turn = before.darts_thrown.next() == Some(state.darts_thrown)
                    && before.current_player_index == state.current_player_index;
                prop_assert!(
                    same_turn || state.darts_thrown == DartIndex::First || state.is_finished,
                    "dart slot went from {:?} to {:?}",
                    before.darts_thrown,
                    state.darts_thrown
                );
            }
        }
    }

    #[test]
    fn test_practice_darts_cycle_through_turns(
        n in 2usize..=8,
        throws in prop::collection::vec((-5i32..=30, multiplier_strategy()), 1..60),
    ) {
        let mut d = dispatcher(2);
        let mut state = new_match(&mut d, GameConfig::Practice(PracticeConfig::default()), n);

        for (i, (value, m)) in throws.into_iter().enumerate() {
            if m != Multiplier::Single {
                state = d
                    .dispatch(Some(state), Action::SetMultiplier { value: m })
                    .unwrap()
                    .unwrap();
            }
            state = d.dispatch(Some(state), Action::Throw { value }).unwrap().unwrap();

            let thrown = i + 1;
            prop_assert_eq!(usize::from(u8::from(state.darts_thrown)), thrown % 3);
            prop_assert_eq!(state.current_player_index, (thrown / 3) % n);
            prop_assert_eq!(state.multiplier, Multiplier::Single);
            prop_assert_eq!(state.history.len(), thrown);
            prop_assert!(state.undo_stack.len() <= MAX_UNDO_DEPTH);
        }
    }

    #[test]
    fn test_thrown_values_stay_in_dart_domain(values in prop::collection::vec(any::<i32>(), 1..30)) {
        let mut d = dispatcher(3);
        let mut state = new_match(&mut d, GameConfig::Practice(PracticeConfig::default()), 2);
        for value in values {
            state = d.dispatch(Some(state), Action::Throw { value }).unwrap().unwrap();
        }
        for item in &state.history {
            prop_assert!(item.value <= 20 || item.value == 25, "value {} out of domain", item.value);
        }
    }

    #[test]
    fn test_random_order_is_a_permutation(n in 2usize..=8, seed in any::<u64>()) {
        let mut d = dispatcher(seed);
        let state = new_match(
            &mut d,
            GameConfig::Practice(PracticeConfig { random_order: true }),
            n,
        );

        let mut ids: Vec<_> = state.players.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        let mut expected: Vec<_> = players(n).into_iter().map(|p| p.id).collect();
        expected.sort();
        prop_assert_eq!(ids, expected);
        prop_assert_eq!(state.player_state.len(), n);
    }

    #[test]
    fn test_undo_then_redo_of_a_dart_is_stable(
        value in 0i32..=25,
        m in multiplier_strategy(),
    ) {
        let mut d = dispatcher(4);
        let state = new_match(&mut d, GameConfig::X01(X01Config::default()), 2);
        let armed = d
            .dispatch(Some(state), Action::SetMultiplier { value: m })
            .unwrap()
            .unwrap();

        let thrown = d.dispatch(Some(armed.clone()), Action::Throw { value }).unwrap().unwrap();
        let undone = d.dispatch(Some(thrown), Action::Undo).unwrap().unwrap();

        prop_assert_eq!(undone, armed);
    }

    #[test]
    fn test_new_game_always_starts_clean(
        actions in prop::collection::vec(action_strategy(), 0..80),
    ) {
        let mut d = dispatcher(5);
        let mut state = new_match(&mut d, GameConfig::X01(X01Config::default()), 3);
        for action in actions {
            state = d.dispatch(Some(state), action).unwrap().unwrap();
        }

        let state = d
            .dispatch(
                Some(state),
                Action::NewGame {
                    config: GameConfig::X01(X01Config::default()),
                    players: players(3),
                },
            )
            .unwrap()
            .unwrap();

        prop_assert_eq!(state.darts_thrown, DartIndex::First);
        prop_assert_eq!(state.multiplier, Multiplier::Single);
        prop_assert!(state.history.is_empty());
        prop_assert!(state.undo_stack.is_empty());
        prop_assert!(!state.is_finished);
    }
}

#[test]
fn test_undo_history_is_capped() {
    let mut d = dispatcher(6);
    let mut state = new_match(&mut d, GameConfig::Practice(PracticeConfig::default()), 2);
    for _ in 0..(MAX_UNDO_DEPTH * 2) {
        state = d.dispatch(Some(state), Action::Throw { value: 1 }).unwrap().unwrap();
    }
    assert_eq!(state.undo_stack.len(), MAX_UNDO_DEPTH);

    for _ in 0..MAX_UNDO_DEPTH {
        state = d.dispatch(Some(state), Action::Undo).unwrap().unwrap();
    }
    assert!(state.undo_stack.is_empty());
    assert_eq!(state.history.len(), MAX_UNDO_DEPTH);
}
