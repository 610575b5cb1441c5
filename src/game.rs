//! Game layer for Snarl.
//!
//! Implements the dungeon model and its rules:
//! - Tiles, rooms and hallways rasterized into a level grid
//! - Occupants: blocks, walls, doors, key, exit and actors
//! - Cyclic turn order
//! - Move legality and end-of-level checks
//! - Multi-level game state

mod hallway;
pub(crate) mod level;
mod occupant;
mod room;
pub mod rules;
mod state;
mod tile;
mod turn_order;

pub use hallway::Hallway;
pub use level::{Level, MAX_LEVEL_TILES};
pub use occupant::{Actor, ActorKind, Occupant, WallOrientation};
pub use room::Room;
pub use state::{GameState, MAX_PLAYERS};
pub use tile::{Coord, Grid, Tile};
pub use turn_order::TurnOrder;
