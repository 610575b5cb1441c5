// Allow unwrap in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
//! Snarl: a turn-based dungeon crawler engine.
//!
//! Up to four players guide their characters through a sequence of levels.
//! Each level is a set of rooms joined by hallways; one character must pick
//! up the key to unlock the exit, and the level ends once every character
//! has left through the exit or been caught by a zombie or ghost.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │   CLI  (serve / local / validate)   │
//! ├──────────────────┬──────────────────┤
//! │  net (TCP, NDJSON│  levels (level   │
//! │  via protocol)   │  documents)      │
//! ├──────────────────┴──────────────────┤
//! │  manager (turns, players, scoring)  │
//! ├──────────────────┬──────────────────┤
//! │  enemy (zombie,  │  game (grid,     │
//! │  ghost)          │  rules, state)   │
//! └──────────────────┴──────────────────┘
//! ```
//!
//! The game loop is single-threaded: only the manager mutates the game
//! state, and network readers merely forward lines to it.

pub mod enemy;
pub mod error;
pub mod game;
pub mod levels;
pub mod manager;
pub mod net;
pub mod protocol;

pub use error::{GameError, LevelError, LevelFileError, MoveError};

// Re-export key game types at crate root for convenience
pub use game::{Actor, ActorKind, Coord, GameState, Hallway, Level, Room, Tile, TurnOrder};
pub use manager::{GameConfig, GameManager, GameOutcome, Player, run_game};
