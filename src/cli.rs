//! CLI command implementations for Snarl.

pub(crate) mod local;
pub(crate) mod serve;
pub(crate) mod validate;

use std::error::Error;
use std::fmt;
use std::path::Path;

use snarl::error::{GameError, LevelFileError, SessionError};
use snarl::game::Level;

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<LevelFileError> for CliError {
    fn from(e: LevelFileError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<GameError> for CliError {
    fn from(e: GameError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SessionError> for CliError {
    fn from(e: SessionError) -> Self {
        Self::new(e.to_string())
    }
}

/// Load a levels file and drop the levels before `start`.
pub(crate) fn load_from(path: &Path, start: usize) -> Result<Vec<Level>, CliError> {
    let mut levels = snarl::levels::load_levels(path)
        .map_err(|e| CliError::new(format!("Failed to load {}: {e}", path.display())))?;
    if start >= levels.len() {
        return Err(CliError::new(format!(
            "Start level {start} does not exist ({} levels in {})",
            levels.len(),
            path.display()
        )));
    }
    Ok(levels.split_off(start))
}

/// Print the final scores.
pub(crate) fn print_outcome(outcome: &snarl::manager::GameOutcome) {
    println!("Game over after {} turns", outcome.turns);
    println!("  Levels played: {}", outcome.levels_played);
    println!("  Result:        {}", if outcome.won { "won" } else { "lost" });
    println!();
    println!("  {:<16} {:>5} {:>5} {:>6}", "Player", "Exits", "Keys", "Ejects");
    for score in &outcome.scores {
        println!(
            "  {:<16} {:>5} {:>5} {:>6}",
            score.name, score.exits, score.keys, score.ejects
        );
    }
}
