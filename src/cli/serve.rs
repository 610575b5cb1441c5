//! Serve command implementation.

use std::path::PathBuf;
use std::time::Duration;

use super::CliError;
use snarl::manager::GameConfig;
use snarl::net::{Server, ServerConfig};

/// Execute the serve command.
///
/// # Errors
///
/// Returns an error if the levels cannot be loaded, the address cannot be
/// bound, or nobody joins.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    levels: PathBuf,
    address: String,
    port: u16,
    clients: usize,
    wait: u64,
    start: usize,
    observe: bool,
    seed: Option<u64>,
) -> Result<(), CliError> {
    let levels = super::load_from(&levels, start)?;
    let config = ServerConfig {
        address,
        port,
        clients,
        wait: Duration::from_secs(wait),
        observe,
        game: GameConfig {
            seed,
            ..GameConfig::default()
        },
    };

    let server = Server::bind(config)?;
    println!("Listening on {}", server.local_addr()?);
    println!("Waiting up to {wait}s for {clients} players...");

    let outcome = server.run(levels)?;
    println!();
    super::print_outcome(&outcome);
    Ok(())
}
