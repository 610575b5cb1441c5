//! Snarl CLI - Command-line interface for hosting and playing Snarl games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Snarl - A turn-based dungeon crawler
#[derive(Parser, Debug)]
#[command(name = "snarl")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Host a game for network clients
    Serve {
        /// Levels file
        #[arg(short, long, default_value = "snarl.levels")]
        levels: PathBuf,

        /// Address to bind
        #[arg(short, long, default_value = "127.0.0.1")]
        address: String,

        /// Port to bind
        #[arg(short, long, default_value = "45678")]
        port: u16,

        /// Number of players to wait for (1-4)
        #[arg(short, long, default_value = "4", value_parser = clap::value_parser!(u8).range(1..=4))]
        clients: u8,

        /// Seconds to wait for players before starting
        #[arg(short, long, default_value = "60")]
        wait: u64,

        /// Zero-based index of the first level to play
        #[arg(long, default_value = "0")]
        start: usize,

        /// Print the full level after every turn
        #[arg(short, long)]
        observe: bool,

        /// Random seed (default: random)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play a game on this terminal, speaking the protocol on stdin/stdout
    Local {
        /// Levels file
        #[arg(short, long, default_value = "snarl.levels")]
        levels: PathBuf,

        /// Player name (asked for on stdin if omitted)
        #[arg(short, long)]
        name: Option<String>,

        /// Zero-based index of the first level to play
        #[arg(long, default_value = "0")]
        start: usize,

        /// Print the full level to stderr after every turn
        #[arg(short, long)]
        observe: bool,

        /// Random seed (default: random)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Check a levels file and render every level
    Validate {
        /// Levels file to validate
        #[arg(required = true)]
        levels: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Serve {
            levels,
            address,
            port,
            clients,
            wait,
            start,
            observe,
            seed,
        } => cli::serve::execute(levels, address, port, usize::from(clients), wait, start, observe, seed),

        Commands::Local {
            levels,
            name,
            start,
            observe,
            seed,
        } => cli::local::execute(levels, name, start, observe, seed),

        Commands::Validate { levels } => cli::validate::execute(levels),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
