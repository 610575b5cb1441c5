//! Error types for the Snarl engine.
//!
//! Construction errors are fatal at load time, move errors are recoverable
//! per turn, and turn-order / strategy errors indicate programmer mistakes.

use thiserror::Error;

use crate::game::{Actor, Coord};

/// A room, hallway or level violated a geometric invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LevelError {
    /// Width or height was zero.
    #[error("room at {origin} has non-positive dimensions {width}x{height}")]
    EmptyRoom {
        /// Upper-left corner of the room.
        origin: Coord,
        /// Declared width.
        width: u16,
        /// Declared height.
        height: u16,
    },
    /// The room declares no door.
    #[error("room at {0} has no door")]
    NoDoor(Coord),
    /// A door does not sit on the room boundary.
    #[error("door {door} is not on the boundary of the room at {origin}")]
    DoorOffBoundary {
        /// Upper-left corner of the room.
        origin: Coord,
        /// The misplaced door.
        door: Coord,
    },
    /// An open tile lies on or outside the room boundary.
    #[error("open tile {tile} is not strictly inside the room at {origin}")]
    OpenTileOutside {
        /// Upper-left corner of the room.
        origin: Coord,
        /// The misplaced tile.
        tile: Coord,
    },
    /// A zero-length hallway was given waypoints.
    #[error("hallway between adjacent doors {from} and {to} cannot have waypoints")]
    WaypointsOnZeroLength {
        /// First door.
        from: Coord,
        /// Second door.
        to: Coord,
    },
    /// Two consecutive waypoints do not share a row or column.
    #[error("hallway segment {from} -> {to} is not axis-aligned")]
    DiagonalSegment {
        /// Segment start.
        from: Coord,
        /// Segment end.
        to: Coord,
    },
    /// Two rooms overlap.
    #[error("rooms at {0} and {1} overlap")]
    RoomsOverlap(Coord, Coord),
    /// A hallway waypoint lies inside a room.
    #[error("hallway waypoint {waypoint} lies inside the room at {room}")]
    WaypointInsideRoom {
        /// The offending waypoint.
        waypoint: Coord,
        /// Upper-left corner of the room.
        room: Coord,
    },
    /// Two hallways cross or touch.
    #[error("hallways {0} and {1} intersect")]
    HallwaysIntersect(usize, usize),
    /// A hallway segment runs straight across a room.
    #[error("hallway segment {from} -> {to} straddles the room at {room}")]
    HallwayStraddlesRoom {
        /// Segment start.
        from: Coord,
        /// Segment end.
        to: Coord,
        /// Upper-left corner of the room.
        room: Coord,
    },
    /// A hallway endpoint is not a declared room door.
    #[error("hallway endpoint {0} is not a room door")]
    DisconnectedHallway(Coord),
    /// The key and exit share a tile.
    #[error("key and exit are both placed at {0}")]
    KeyOnExit(Coord),
    /// A key or exit sits on a block, wall or door, or outside the grid.
    #[error("{object} at {at} is not on an open tile")]
    ObjectNotOnOpenTile {
        /// `"key"` or `"exit"`.
        object: &'static str,
        /// The declared position.
        at: Coord,
    },
    /// The level declares no rooms.
    #[error("a level needs at least one room")]
    NoRooms,
    /// A room reaches past the largest representable coordinate.
    #[error("room at {origin} of size {width}x{height} extends past coordinate {max}", max = u16::MAX)]
    RoomOutOfRange {
        /// Upper-left corner of the room.
        origin: Coord,
        /// Declared width.
        width: u16,
        /// Declared height.
        height: u16,
    },
    /// The level grid would exceed [`crate::game::MAX_LEVEL_TILES`].
    #[error("level grid of {width}x{height} exceeds the limit of {max} tiles")]
    LevelTooLarge {
        /// Grid width needed to hold every room and waypoint.
        width: u32,
        /// Grid height needed to hold every room and waypoint.
        height: u32,
        /// The tile limit.
        max: u64,
    },
}

/// A levels file could not be turned into levels.
#[derive(Debug, Error)]
pub enum LevelFileError {
    /// The file could not be read.
    #[error("cannot read levels file: {0}")]
    Io(#[from] std::io::Error),
    /// The stream is not a sequence of JSON values.
    #[error("levels file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The first value is not a level count.
    #[error("levels file must start with the number of levels")]
    MissingCount,
    /// The declared count disagrees with the number of levels found.
    #[error("levels file declares {declared} levels but contains {found}")]
    CountMismatch {
        /// Count at the head of the file.
        declared: usize,
        /// Level objects actually present.
        found: usize,
    },
    /// A level object does not have the expected shape.
    #[error("level {index}: {source}")]
    Document {
        /// Zero-based position of the level in the file.
        index: usize,
        /// What serde rejected.
        source: serde_json::Error,
    },
    /// A room layout does not match its declared bounds.
    #[error("level {index}: layout of the room at {origin} does not match its {rows}x{columns} bounds")]
    LayoutMismatch {
        /// Zero-based position of the level in the file.
        index: usize,
        /// Upper-left corner of the room.
        origin: Coord,
        /// Declared rows.
        rows: u16,
        /// Declared columns.
        columns: u16,
    },
    /// A layout cell is not 0, 1 or 2.
    #[error("level {index}: unknown layout cell {cell} at {at}")]
    UnknownCell {
        /// Zero-based position of the level in the file.
        index: usize,
        /// The cell value.
        cell: u8,
        /// Absolute position of the cell.
        at: Coord,
    },
    /// The level lacks a key or an exit, or declares one twice.
    #[error("level {index}: expected exactly one {object}, found {count}")]
    ObjectCount {
        /// Zero-based position of the level in the file.
        index: usize,
        /// `"key"` or `"exit"`.
        object: &'static str,
        /// How many were declared.
        count: usize,
    },
    /// The level violates a geometric invariant.
    #[error("level {index}: {source}")]
    Level {
        /// Zero-based position of the level in the file.
        index: usize,
        /// The violated invariant.
        source: LevelError,
    },
}

/// A move failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The actor is not placed on the current level.
    #[error("{0} is not on this level")]
    NotOnLevel(Actor),
    /// The destination is outside the grid.
    #[error("Invalid move: destination {0} is outside the level")]
    OutOfBounds(Coord),
    /// The destination is further than the step budget.
    #[error("Invalid move: destination too far ({distance} > {max})")]
    TooFar {
        /// Manhattan distance requested.
        distance: u32,
        /// Maximum allowed.
        max: u32,
    },
    /// The destination is blocked.
    #[error("Invalid move: destination {0} blocked")]
    Blocked(Coord),
    /// An adversary asked for a move its kind may not make.
    #[error("Invalid move: {actor} cannot move to {to}")]
    IllegalAdversaryMove {
        /// The adversary.
        actor: Actor,
        /// The rejected destination.
        to: Coord,
    },
}

/// Turn order misuse. These are logic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TurnOrderError {
    /// `next()` on an empty order.
    #[error("cannot advance an empty turn order")]
    Empty,
    /// `eject()` of an entity that is not in the order.
    #[error("cannot eject an entity that is not in the turn order")]
    NotFound,
    /// `add()` past the end of the order.
    #[error("cannot insert at position {position} of a turn order with {len} entries")]
    PositionOutOfRange {
        /// Requested index.
        position: usize,
        /// Current length.
        len: usize,
    },
}

/// Game state bookkeeping failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// Player count outside the allowed range.
    #[error("there must be 1-{max} players, got {count}")]
    PlayerCount {
        /// Requested number of players.
        count: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// A character with the same name is already placed.
    #[error("{0} is already on this level")]
    DuplicateActor(Actor),
    /// `next_level()` with nothing queued.
    #[error("no level is queued")]
    NoLevelQueued,
    /// No eligible tile left to place an actor on.
    #[error("no free tile left to place {0}")]
    NoSpawnTile(Actor),
    /// Placement outside the grid.
    #[error("cannot place {actor} at {at}: outside the level")]
    OutOfBounds {
        /// Actor being placed.
        actor: Actor,
        /// Requested position.
        at: Coord,
    },
}

/// An adversary controller was asked for a move before being notified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    /// No state + location notification received yet.
    #[error("{0} was asked to move before receiving any game state")]
    NotNotified(Actor),
}

/// Client input did not match the protocol.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The line was not JSON of the expected shape.
    #[error("malformed message {line:?}: {reason}")]
    Malformed {
        /// The offending input.
        line: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Serialization of an outgoing message failed.
    #[error("cannot encode message: {0}")]
    Encode(#[from] serde_json::Error),
    /// The underlying stream failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// A player channel failed.
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The client went away.
    #[error("player {0} disconnected")]
    Disconnected(String),
    /// The client replied with something that is not a move.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// The orchestrator could not continue.
#[derive(Debug, Error)]
pub enum GameError {
    /// The game was driven before `start_game`.
    #[error("the game has not been started")]
    NotStarted,
    /// `start_game` called twice or after the game ended.
    #[error("the game has already been started")]
    AlreadyStarted,
    /// Registering a player with a taken name or over the limit.
    #[error("cannot register player {name}: {reason}")]
    Registration {
        /// Name of the rejected player.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Turn order logic error.
    #[error(transparent)]
    TurnOrder(#[from] TurnOrderError),
    /// State bookkeeping error.
    #[error(transparent)]
    State(#[from] StateError),
    /// Adversary strategy logic error.
    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

/// A network session could not be set up or run.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Binding, accepting or writing failed.
    #[error("network error: {0}")]
    Io(#[from] std::io::Error),
    /// Nobody registered before the wait deadline.
    #[error("no player registered within {0:?}")]
    NoPlayers(std::time::Duration),
    /// The game itself failed.
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Result type for level construction.
pub type LevelResult<T> = Result<T, LevelError>;
