//! A terminal darts scoreboard.
//!
//! Reads one command per line, applies it to the active match and
//! redraws the board. The match is saved after every change and picked
//! up again on the next start.

use anyhow::{Context, Result};
use ctrlc::set_handler;
use darts_cli::{
    commands::parse_command,
    config::CliConfig,
    session::{Reply, Session},
};
use darts_engine::{Dispatcher, storage::JsonFileStore};
use log::{debug, info};
use pico_args::Arguments;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
Keep score of a darts match in the terminal

USAGE:
  darts [OPTIONS]

OPTIONS:
  --mode        MODE       x01 or practice                 [default: x01]
  --points      N          301, 501 or 701                 [default: 501]
  --check-in    RULE       straight, double or master      [default: straight]
  --check-out   RULE       straight, double or master      [default: double]
  --legs        N          Legs needed to win a set        [default: 3]
  --sets        N          Sets in the match               [default: 1]
  --first-to    N          Match is won at N legs/sets     [default: 3]
  --best-of     N          Match is won by a majority of N
  --players     NAMES      Comma-separated player names    [default: env DARTS_PLAYERS or 'Player 1,Player 2']
  --save        PATH       Save file                       [default: env DARTS_SAVE_PATH or darts_scoreboard_v1.json]

FLAGS:
  --random                 Shuffle the player order at the start of a match
  --fresh                  Start at setup even if a saved match exists
  -h, --help               Print help information

ENVIRONMENT:
  DARTS_PLAYERS            Player names (e.g., Alice,Bob)
  DARTS_SAVE_PATH          Save file location
  RUST_LOG                 Log level (e.g., info, debug)
  (A .env file in the working directory is read too)
";

fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let config = CliConfig::from_env(pargs)?;

    // Catching signals for exit. Every change is already saved.
    set_handler(|| std::process::exit(0))?;

    env_logger::builder().format_target(false).init();
    info!("Saving matches to {}", config.save_path.display());

    let store = JsonFileStore::new(&config.save_path);
    let mut session = Session::new(Dispatcher::new(), store, config.setup);
    if !config.fresh && session.resume_saved()? {
        println!("Resumed the saved match. Type 'setup' to leave it.\n");
    }

    run(&mut session)
}

fn run(session: &mut Session<JsonFileStore>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        println!("{}", session.screen());
        print!("> ");
        stdout.flush()?;

        let Some(line) = lines.next() else {
            // End of input.
            return Ok(());
        };
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                debug!("Rejected input {line:?}");
                println!("{e}\n");
                continue;
            }
        };

        match session.handle(command)? {
            Reply::Redraw => {}
            Reply::Notice(msg) => println!("{msg}\n"),
            Reply::Quit => return Ok(()),
        }
    }
}
