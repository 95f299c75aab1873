//! Play Leg Example
//!
//! Plays a short 301 leg between two players, including a bust and an
//! undo, and prints the scoreboard after every turn.

use darts_engine::{Action, Dispatcher, MatchSetup, MatchState, Multiplier, entities::StartPoints};

fn print_scores(state: &MatchState) {
    for player in &state.players {
        if let Ok(ps) = state.player_state(&player.id) {
            println!(
                "  {:<10} {:>3} left, {} darts, legs {}",
                player.name,
                ps.remaining,
                state.darts_thrown_by(&player.id),
                ps.legs_won
            );
        }
    }
}

fn main() {
    println!("=== 301 Leg Example ===\n");

    let mut dispatcher = Dispatcher::new();
    let setup = MatchSetup {
        player_names: vec!["Alice".to_string(), "Bob".to_string()],
        start_points: StartPoints::P301,
        ..MatchSetup::default()
    };
    let new_game = match setup.new_game(dispatcher.ids_mut()) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("Invalid setup: {e}");
            return;
        }
    };

    let mut state = dispatcher.dispatch(None, new_game).unwrap();
    println!("{}\n", state.as_ref().unwrap().config);

    let turns: [&[(Multiplier, i32)]; 5] = [
        &[(Multiplier::Triple, 20), (Multiplier::Triple, 20), (Multiplier::Triple, 20)],
        &[(Multiplier::Single, 5), (Multiplier::Single, 1), (Multiplier::Single, 20)],
        &[(Multiplier::Triple, 20), (Multiplier::Triple, 19), (Multiplier::Triple, 20)],
        &[(Multiplier::Single, 0), (Multiplier::Single, 0), (Multiplier::Single, 0)],
        // 4 left: the single 4 leaves nothing, but a double is needed.
        &[(Multiplier::Single, 4)],
    ];

    for darts in turns {
        let name = state
            .as_ref()
            .and_then(|s| s.current_player().ok())
            .map(|p| p.name.clone())
            .unwrap_or_default();
        print!("{name}:");
        for &(m, value) in darts {
            if m != Multiplier::Single {
                state = dispatcher
                    .dispatch(state, Action::SetMultiplier { value: m })
                    .unwrap();
            }
            let before = state.as_ref().map_or(0, |s| s.history.len());
            state = dispatcher.dispatch(state, Action::Throw { value }).unwrap();
            match state.as_ref().filter(|s| s.history.len() > before) {
                Some(s) => print!(" {}", s.history[before]),
                None => print!(" bust"),
            }
        }
        println!();
        print_scores(state.as_ref().unwrap());
    }

    println!("\nBob hits a 20, takes it back and passes.");
    state = dispatcher.dispatch(state, Action::Throw { value: 20 }).unwrap();
    state = dispatcher.dispatch(state, Action::Undo).unwrap();
    state = dispatcher.dispatch(state, Action::NextPlayer).unwrap();

    state = dispatcher
        .dispatch(
            state,
            Action::SetMultiplier {
                value: Multiplier::Double,
            },
        )
        .unwrap();
    state = dispatcher.dispatch(state, Action::Throw { value: 2 }).unwrap();

    let state = state.unwrap();
    println!("Alice checks out with D2.");
    print_scores(&state);
}
