//! Local command implementation: one player over stdin and stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use super::CliError;
use snarl::manager::{self, GameConfig, LinePlayer, Observer, Player, TextObserver};
use snarl::protocol::{self, Prompt};

/// Execute the local command.
///
/// The player speaks the wire protocol on stdin and stdout. The observer, if
/// any, writes to stderr so it does not interleave with protocol lines.
///
/// # Errors
///
/// Returns an error if the levels cannot be loaded, no name is given, or the
/// game fails.
pub(crate) fn execute(
    levels: PathBuf,
    name: Option<String>,
    start: usize,
    observe: bool,
    seed: Option<u64>,
) -> Result<(), CliError> {
    let levels = super::load_from(&levels, start)?;
    let mut input = io::stdin().lock();
    let mut output = io::stdout();

    let name = match name {
        Some(name) => name,
        None => {
            protocol::write_line(&mut output, &Prompt::Name).map_err(|e| CliError::new(e.to_string()))?;
            let line = protocol::read_line(&mut input)
                .map_err(|e| CliError::new(e.to_string()))?
                .ok_or_else(|| CliError::new("No name given"))?;
            protocol::parse_name(&line).map_err(|e| CliError::new(e.to_string()))?
        }
    };

    let players: Vec<Box<dyn Player>> = vec![Box::new(LinePlayer::new(name, input, output))];
    let mut observers: Vec<Box<dyn Observer>> = Vec::new();
    if observe {
        observers.push(Box::new(TextObserver::new(io::stderr())));
    }
    let config = GameConfig {
        seed,
        ..GameConfig::default()
    };

    let outcome = manager::run_game(config, players, observers, levels)?;
    io::stdout().flush()?;
    eprintln!(
        "Game over after {} turns: {}",
        outcome.turns,
        if outcome.won { "won" } else { "lost" }
    );
    Ok(())
}
