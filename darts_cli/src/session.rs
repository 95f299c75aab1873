//! The scoreboard session: one active match (or none), the store that
//! keeps it, and the dispatcher that moves it forward.

use anyhow::{Context, Result};
use darts_engine::{
    Action, Dispatcher, MatchSetup, MatchState,
    storage::{MatchStore, PersistedMatch},
};
use log::{debug, info};

use crate::{
    commands::{COMMANDS, Command},
    render,
};

/// What the front end should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Redraw the current screen.
    Redraw,
    /// Print a message, then redraw.
    Notice(String),
    /// Exit the program.
    Quit,
}

pub struct Session<S: MatchStore> {
    dispatcher: Dispatcher,
    store: S,
    setup: MatchSetup,
    state: Option<MatchState>,
}

impl<S: MatchStore> Session<S> {
    pub fn new(dispatcher: Dispatcher, store: S, setup: MatchSetup) -> Self {
        Self {
            dispatcher,
            store,
            setup,
            state: None,
        }
    }

    /// The active match, if any.
    #[must_use]
    pub fn state(&self) -> Option<&MatchState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn has_saved(&self) -> bool {
        self.store.has_saved()
    }

    /// Current screen: the scoreboard during a match, setup otherwise.
    #[must_use]
    pub fn screen(&self) -> String {
        match &self.state {
            Some(state) => render::scoreboard(state),
            None => render::setup_screen(&self.setup, self.has_saved()),
        }
    }

    /// Continues the saved match, if there is one. Returns whether a
    /// match was resumed.
    pub fn resume_saved(&mut self) -> Result<bool> {
        let Some(saved) = self.store.load() else {
            return Ok(false);
        };
        info!(
            "Resuming saved {} match with {} players",
            saved.state.config.mode(),
            saved.state.players.len()
        );
        self.apply(Action::Resume {
            state: Box::new(saved.state),
        })?;
        Ok(true)
    }

    /// Runs one command against the active match.
    ///
    /// # Errors
    ///
    /// Fails only when the match itself is corrupt. The session can't
    /// continue after that.
    pub fn handle(&mut self, command: Command) -> Result<Reply> {
        match command {
            Command::Help => Ok(Reply::Notice(COMMANDS.to_string())),
            Command::Quit => Ok(Reply::Quit),
            Command::NewMatch => {
                let action = self.setup.new_game(self.dispatcher.ids_mut())?;
                self.apply(action)?;
                Ok(Reply::Redraw)
            }
            Command::Resume => {
                if self.state.is_some() {
                    return Ok(notice("A match is already in progress"));
                }
                if self.resume_saved()? {
                    Ok(Reply::Redraw)
                } else {
                    Ok(notice("No saved match to resume"))
                }
            }
            Command::ClearSave => {
                self.store.clear();
                self.apply(Action::ResetToSetup)?;
                Ok(notice("Saved match deleted"))
            }
            Command::Setup => {
                if self.state.is_none() {
                    return Ok(Reply::Redraw);
                }
                self.apply(Action::ResetToSetup)?;
                Ok(Reply::Redraw)
            }
            Command::Undo => self.in_match(|session| session.apply(Action::Undo)),
            Command::ToggleMultiplier(value) => self.in_play(|session| {
                session.apply(Action::SetMultiplier { value })
            }),
            Command::NextPlayer => self.in_play(|session| session.apply(Action::NextPlayer)),
            Command::Throw { value, multiplier } => self.in_play(|session| {
                if let Some(m) = multiplier {
                    // Selecting the active multiplier again would toggle it off.
                    if session.state.as_ref().is_some_and(|s| s.multiplier != m) {
                        session.apply(Action::SetMultiplier { value: m })?;
                    }
                }
                session.apply(Action::Throw { value })
            }),
        }
    }

    /// Runs `f` if a match is active.
    fn in_match<F>(&mut self, f: F) -> Result<Reply>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if self.state.is_none() {
            return Ok(notice("No match in progress. Type 'new' to start one"));
        }
        f(self)?;
        Ok(Reply::Redraw)
    }

    /// Runs `f` if a match is active and not yet decided.
    fn in_play<F>(&mut self, f: F) -> Result<Reply>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if self.state.as_ref().is_some_and(|s| s.is_finished) {
            return Ok(notice("The match is finished. Undo, or type 'new' or 'setup'"));
        }
        self.in_match(f)
    }

    /// Dispatches `action` and saves the resulting match.
    fn apply(&mut self, action: Action) -> Result<()> {
        debug!("Applying {action}");
        let state = self.state.take();
        self.state = self
            .dispatcher
            .dispatch(state, action)
            .context("Match state is corrupted")?;

        if let Some(state) = &self.state {
            self.store.save(&PersistedMatch::new(state.clone()));
        }
        Ok(())
    }
}

fn notice(msg: &str) -> Reply {
    Reply::Notice(msg.to_string())
}
