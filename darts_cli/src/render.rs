//! Plain-text scoreboard drawing.

use darts_engine::{
    DARTS_PER_TURN, MatchSetup, MatchState, Multiplier,
    entities::{GameMode, ThrowItem},
};
use std::fmt::Write;

/// Width of the name column.
const NAME_WIDTH: usize = 16;

/// Draws the scoreboard of a match in progress.
#[must_use]
pub fn scoreboard(state: &MatchState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}    Darts: {}/{DARTS_PER_TURN}",
        state.config,
        u8::from(state.darts_thrown)
    );

    if state.is_finished {
        match state.winner() {
            Some(winner) => {
                let _ = writeln!(out, "*** MATCH FINISHED: {} wins ***", winner.name);
            }
            None => {
                let _ = writeln!(out, "*** MATCH FINISHED ***");
            }
        }
    }
    out.push('\n');

    for (idx, player) in state.players.iter().enumerate() {
        let marker = if idx == state.current_player_index && !state.is_finished {
            '>'
        } else {
            ' '
        };
        let _ = write!(out, "{marker} {:<width$}", player.name, width = NAME_WIDTH);

        let Ok(ps) = state.player_state(&player.id) else {
            let _ = writeln!(out, "(no score)");
            continue;
        };
        if state.is_x01() {
            let _ = writeln!(
                out,
                "{:>4}   Sets {} • Legs {} • In {}",
                ps.remaining,
                ps.sets_won,
                ps.legs_won,
                if ps.has_checked_in { "YES" } else { "NO" }
            );
        } else {
            let _ = writeln!(
                out,
                "   Darts {} • Points {}",
                state.darts_thrown_by(&player.id),
                state.points_scored_by(&player.id)
            );
        }
    }

    let multiplier = match state.multiplier {
        Multiplier::Single => "-".to_string(),
        m => m.to_string(),
    };
    let _ = write!(out, "\nMultiplier: {multiplier}");
    if let Some(turn) = current_turn(state) {
        let _ = write!(out, "    This turn: {turn}");
    }
    out.push('\n');
    out
}

/// Darts the current player has thrown so far this turn.
fn current_turn(state: &MatchState) -> Option<String> {
    let thrown = usize::from(u8::from(state.darts_thrown));
    if thrown == 0 || state.is_finished {
        return None;
    }
    let start = state.history.len().saturating_sub(thrown);
    let darts: Vec<String> = state.history[start..]
        .iter()
        .map(ThrowItem::to_string)
        .collect();
    Some(darts.join(" "))
}

/// Draws the setup screen shown when no match is active.
#[must_use]
pub fn setup_screen(setup: &MatchSetup, has_saved: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Darts Scoreboard ===");
    let _ = writeln!(out, "{}", setup.config());
    if setup.mode == GameMode::X01 {
        let _ = writeln!(
            out,
            "Check-in {} • Check-out {}",
            setup.check_in, setup.check_out
        );
    }
    let _ = writeln!(
        out,
        "Players: {}{}",
        setup.player_names.join(", "),
        if setup.random_order { " (random order)" } else { "" }
    );
    out.push('\n');
    if has_saved {
        let _ = writeln!(out, "A saved match is available: 'resume' or 'clear'.");
    }
    let _ = writeln!(out, "Type 'new' to start, 'help' for commands, 'q' to quit.");
    out
}
