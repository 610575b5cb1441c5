//! A validated level: rooms, hallways, key, exit and everyone standing on it.
//!
//! The tile grid and the actor position map are only ever changed together,
//! through [`Level::place`], [`Level::remove_actor`] and [`Level::move_actor`].

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{LevelError, LevelResult, MoveError, StateError};
use crate::game::{Actor, ActorKind, Coord, Grid, Hallway, Occupant, Room, Tile};

/// Largest number of tiles a level grid may hold (1024 x 1024).
pub const MAX_LEVEL_TILES: u64 = 1 << 20;

/// A single dungeon level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    rooms: Vec<Room>,
    hallways: Vec<Hallway>,
    key: Coord,
    exit: Coord,
    grid: Grid,
    /// Where every active actor stands.
    positions: BTreeMap<Actor, Coord>,
    /// Characters that left through the unlocked exit, in order.
    completed: Vec<Actor>,
    /// Characters caught by an adversary, in order.
    ejected: Vec<Actor>,
    exit_unlocked: bool,
    unlocked_by: Option<Actor>,
}

impl Level {
    /// Build and validate a level.
    ///
    /// # Errors
    ///
    /// Returns a [`LevelError`] if rooms overlap, a hallway enters or
    /// crosses a room, two hallways touch, a hallway is not attached to
    /// room doors, the key and exit are misplaced, or the grid would hold
    /// more than [`MAX_LEVEL_TILES`] tiles.
    pub fn new(rooms: Vec<Room>, hallways: Vec<Hallway>, key: Coord, exit: Coord) -> LevelResult<Self> {
        if rooms.is_empty() {
            return Err(LevelError::NoRooms);
        }
        let (width, height) = dimensions(&rooms, &hallways)?;
        check_layout(&rooms, &hallways)?;
        if key == exit {
            return Err(LevelError::KeyOnExit(key));
        }

        let mut level = Self {
            rooms,
            hallways,
            key,
            exit,
            grid: Grid::filled_with_blocks(width, height),
            positions: BTreeMap::new(),
            completed: Vec::new(),
            ejected: Vec::new(),
            exit_unlocked: false,
            unlocked_by: None,
        };
        level.draw_layout();

        for (object, at) in [("key", key), ("exit", exit)] {
            let placeable = level
                .grid
                .get(at)
                .is_some_and(|tile| !tile.has_block() && !tile.has_door());
            if !placeable {
                return Err(LevelError::ObjectNotOnOpenTile { object, at });
            }
        }

        level.rasterize();
        Ok(level)
    }

    /// Rebuild the grid from rooms, hallways, key and exit, then put every
    /// actor back on its tile in the order they arrived there.
    ///
    /// Rebuilding a level that has not changed yields an identical grid.
    pub fn rasterize(&mut self) {
        let standing: Vec<(Coord, Vec<Occupant>)> = self
            .grid
            .iter()
            .filter(|tile| tile.occupants.iter().any(|occupant| occupant.actor().is_some()))
            .map(|tile| {
                let actors = tile
                    .occupants
                    .iter()
                    .filter(|occupant| occupant.actor().is_some())
                    .cloned()
                    .collect();
                (tile.coord, actors)
            })
            .collect();

        self.draw_layout();
        self.grid.set(self.key, Occupant::Key);
        self.grid.set(self.exit, Occupant::Exit);
        for (at, actors) in standing {
            if let Some(tile) = self.grid.get_mut(at) {
                tile.occupants.extend(actors);
            }
        }
    }

    fn draw_layout(&mut self) {
        self.grid = Grid::filled_with_blocks(self.grid.width(), self.grid.height());
        for room in &self.rooms {
            room.rasterize(&mut self.grid);
        }
        for hallway in &self.hallways {
            hallway.rasterize(&mut self.grid);
        }
    }

    /// Rooms of this level.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Hallways of this level.
    #[must_use]
    pub fn hallways(&self) -> &[Hallway] {
        &self.hallways
    }

    /// Position of the key.
    #[must_use]
    pub const fn key(&self) -> Coord {
        self.key
    }

    /// Position of the exit.
    #[must_use]
    pub const fn exit(&self) -> Coord {
        self.exit
    }

    /// The materialized grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The tile at a coordinate.
    #[must_use]
    pub fn tile(&self, at: Coord) -> Option<&Tile> {
        self.grid.get(at)
    }

    /// Has a character touched the key?
    #[must_use]
    pub const fn is_exit_unlocked(&self) -> bool {
        self.exit_unlocked
    }

    /// The character that unlocked the exit, if any.
    #[must_use]
    pub const fn unlocked_by(&self) -> Option<&Actor> {
        self.unlocked_by.as_ref()
    }

    /// Characters that exited, in order.
    #[must_use]
    pub fn completed(&self) -> &[Actor] {
        &self.completed
    }

    /// Characters that were caught, in order.
    #[must_use]
    pub fn ejected(&self) -> &[Actor] {
        &self.ejected
    }

    /// Where an actor stands.
    #[must_use]
    pub fn locate(&self, actor: &Actor) -> Option<Coord> {
        self.positions.get(actor).copied()
    }

    /// All active actors and their positions.
    pub fn actors(&self) -> impl Iterator<Item = (&Actor, Coord)> {
        self.positions.iter().map(|(actor, &at)| (actor, at))
    }

    /// Active characters and their positions.
    pub fn characters(&self) -> impl Iterator<Item = (&Actor, Coord)> {
        self.actors().filter(|(actor, _)| actor.is_character())
    }

    /// Active adversaries and their positions.
    pub fn adversaries(&self) -> impl Iterator<Item = (&Actor, Coord)> {
        self.actors().filter(|(actor, _)| actor.is_adversary())
    }

    /// Is any character still playing this level?
    #[must_use]
    pub fn has_active_characters(&self) -> bool {
        self.characters().next().is_some()
    }

    /// The room whose rectangle holds the coordinate.
    #[must_use]
    pub fn room_containing(&self, at: Coord) -> Option<&Room> {
        self.rooms.iter().find(|room| room.contains(at))
    }

    /// The room closest to the origin by Manhattan distance, ties going to
    /// the smaller y.
    #[must_use]
    pub fn top_left_room(&self) -> Option<&Room> {
        self.rooms.iter().min_by_key(|room| room.top_left_key())
    }

    /// Free tiles of a room that an actor may be placed on: traversable,
    /// not a door, no key or exit, nobody standing there.
    #[must_use]
    pub fn spawn_tiles(&self, room: &Room) -> Vec<Coord> {
        self.tiles_in(room)
            .filter(|tile| {
                !tile.has_block()
                    && !tile.has_door()
                    && !tile.has_key()
                    && !tile.has_exit()
                    && tile.occupants.iter().all(|occupant| occupant.actor().is_none())
            })
            .map(|tile| tile.coord)
            .collect()
    }

    fn tiles_in<'a>(&'a self, room: &'a Room) -> impl Iterator<Item = &'a Tile> + 'a {
        let origin = room.origin();
        (0..room.height()).flat_map(move |dy| {
            (0..room.width()).filter_map(move |dx| {
                self.grid
                    .get(Coord::new(origin.x + dx, origin.y + dy))
            })
        })
    }

    /// Put an actor on the level.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is already on the level or the position
    /// is outside the grid.
    pub fn place(&mut self, actor: Actor, at: Coord) -> Result<(), StateError> {
        if self.positions.contains_key(&actor) {
            return Err(StateError::DuplicateActor(actor));
        }
        let Some(tile) = self.grid.get_mut(at) else {
            return Err(StateError::OutOfBounds { actor, at });
        };
        tile.occupants.push(Occupant::Actor(actor.clone()));
        self.positions.insert(actor, at);
        Ok(())
    }

    /// Take an actor off the level, returning where it stood.
    pub fn remove_actor(&mut self, actor: &Actor) -> Option<Coord> {
        let at = self.positions.remove(actor)?;
        if let Some(tile) = self.grid.get_mut(at) {
            tile.remove_actor(actor);
        }
        Some(at)
    }

    /// Relocate an actor and resolve whatever happens on the destination.
    ///
    /// No legality check is made here; see [`crate::game::rules`].
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not on the level or the destination
    /// is outside the grid.
    pub fn move_actor<R: Rng + ?Sized>(&mut self, actor: &Actor, to: Coord, rng: &mut R) -> Result<(), MoveError> {
        if !self.grid.in_bounds(to) {
            return Err(MoveError::OutOfBounds(to));
        }
        if self.remove_actor(actor).is_none() {
            return Err(MoveError::NotOnLevel(actor.clone()));
        }
        if let Some(tile) = self.grid.get_mut(to) {
            tile.occupants.push(Occupant::Actor(actor.clone()));
        }
        self.positions.insert(actor.clone(), to);
        self.interact(to, rng);
        Ok(())
    }

    /// Resolve the occupants of a tile after someone arrived there.
    ///
    /// In order: a character meeting an adversary is ejected; a character on
    /// the key unlocks the exit; a character on the unlocked exit completes
    /// the level; a ghost on a blocked tile teleports.
    pub fn interact<R: Rng + ?Sized>(&mut self, at: Coord, rng: &mut R) {
        let Some(tile) = self.grid.get(at) else {
            return;
        };
        let characters: Vec<Actor> = tile.characters().cloned().collect();

        if !characters.is_empty() && tile.has_adversary() {
            for character in characters {
                log::debug!("{character} was caught at {at}");
                self.remove_actor(&character);
                self.ejected.push(character);
            }
        } else if !characters.is_empty() && tile.has_key() {
            if !self.exit_unlocked {
                log::debug!("{} unlocked the exit", characters[0]);
                self.exit_unlocked = true;
                self.unlocked_by = Some(characters[0].clone());
            }
        } else if !characters.is_empty() && tile.has_exit() && self.exit_unlocked {
            for character in characters {
                log::debug!("{character} exited the level");
                self.remove_actor(&character);
                self.completed.push(character);
            }
        } else if tile.has_block() {
            let ghosts: Vec<Actor> = tile
                .adversaries()
                .filter(|actor| actor.kind == ActorKind::Ghost)
                .cloned()
                .collect();
            for ghost in ghosts {
                self.teleport(&ghost, rng);
            }
        }
    }

    /// Move an actor to a random free tile of a random room that still has
    /// one. Free means no block, no adversary, no key and no exit.
    fn teleport<R: Rng + ?Sized>(&mut self, actor: &Actor, rng: &mut R) {
        let candidates: Vec<Vec<Coord>> = self
            .rooms
            .iter()
            .map(|room| {
                self.tiles_in(room)
                    .filter(|tile| {
                        !tile.has_block() && !tile.has_adversary() && !tile.has_key() && !tile.has_exit()
                    })
                    .map(|tile| tile.coord)
                    .collect::<Vec<_>>()
            })
            .filter(|tiles| !tiles.is_empty())
            .collect();

        let Some(to) = candidates
            .choose(rng)
            .and_then(|tiles| tiles.choose(rng))
            .copied()
        else {
            log::warn!("{actor} has nowhere to teleport to");
            return;
        };

        log::debug!("{actor} teleported to {to}");
        self.remove_actor(actor);
        if let Some(tile) = self.grid.get_mut(to) {
            tile.occupants.push(Occupant::Actor(actor.clone()));
        }
        self.positions.insert(actor.clone(), to);
        self.interact(to, rng);
    }

    /// Render the whole level, one line per row.
    #[must_use]
    pub fn render(&self) -> String {
        self.grid
            .rows()
            .map(|row| row.iter().map(Tile::render).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Rooms must not overlap, hallways must stay out of rooms and away from
/// each other, and must end at room doors.
fn check_layout(rooms: &[Room], hallways: &[Hallway]) -> LevelResult<()> {
    for (i, a) in rooms.iter().enumerate() {
        if let Some(b) = rooms[i + 1..].iter().find(|b| a.intersects(b)) {
            return Err(LevelError::RoomsOverlap(a.origin(), b.origin()));
        }
    }

    for hallway in hallways {
        for &waypoint in hallway.waypoints() {
            if let Some(room) = rooms.iter().find(|room| room.contains(waypoint)) {
                return Err(LevelError::WaypointInsideRoom {
                    waypoint,
                    room: room.origin(),
                });
            }
        }
    }

    for (i, a) in hallways.iter().enumerate() {
        if let Some(offset) = hallways[i + 1..].iter().position(|b| a.intersects(b)) {
            return Err(LevelError::HallwaysIntersect(i, i + 1 + offset));
        }
    }

    for hallway in hallways {
        for (from, to) in hallway.segments() {
            if let Some(room) = rooms.iter().find(|room| room.is_straddled_by(from, to)) {
                return Err(LevelError::HallwayStraddlesRoom {
                    from,
                    to,
                    room: room.origin(),
                });
            }
        }
    }

    let is_door = |at: Coord| rooms.iter().any(|room| room.doors().contains(&at));
    for hallway in hallways {
        for door in [hallway.door1(), hallway.door2()] {
            if !is_door(door) {
                return Err(LevelError::DisconnectedHallway(door));
            }
        }
    }

    Ok(())
}

/// Smallest grid holding every room and waypoint, if it is within
/// [`MAX_LEVEL_TILES`].
fn dimensions(rooms: &[Room], hallways: &[Hallway]) -> LevelResult<(u16, u16)> {
    let room_extent = rooms.iter().map(|room| {
        (
            u32::from(room.origin().x) + u32::from(room.width()),
            u32::from(room.origin().y) + u32::from(room.height()),
        )
    });
    let hallway_extent = hallways
        .iter()
        .flat_map(Hallway::waypoints)
        .map(|at| (u32::from(at.x) + 1, u32::from(at.y) + 1));

    let (width, height) = room_extent
        .chain(hallway_extent)
        .fold((0, 0), |(w, h), (x, y)| (w.max(x), h.max(y)));

    let too_large = LevelError::LevelTooLarge {
        width,
        height,
        max: MAX_LEVEL_TILES,
    };
    if u64::from(width) * u64::from(height) > MAX_LEVEL_TILES {
        return Err(too_large);
    }
    match (u16::try_from(width), u16::try_from(height)) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(too_large),
    }
}
