//! Coordinates, tiles and the rasterized tile grid.

use serde::{Deserialize, Serialize};

use crate::game::{Actor, Occupant};

/// A coordinate on the level grid.
///
/// Serialized as `[row, column]`, i.e. `[y, x]`, which is how level documents
/// and the wire protocol spell positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[u16; 2]", into = "[u16; 2]")]
pub struct Coord {
    /// X coordinate (column).
    pub x: u16,
    /// Y coordinate (row).
    pub y: u16,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another coordinate.
    #[must_use]
    pub fn manhattan(self, other: Coord) -> u32 {
        u32::from(self.x.abs_diff(other.x)) + u32::from(self.y.abs_diff(other.y))
    }

    /// Chebyshev distance to another coordinate.
    #[must_use]
    pub fn chebyshev(self, other: Coord) -> u32 {
        u32::from(self.x.abs_diff(other.x).max(self.y.abs_diff(other.y)))
    }

    /// Whether the two coordinates share a row or a column.
    #[must_use]
    pub fn shares_axis(self, other: Coord) -> bool {
        self.x == other.x || self.y == other.y
    }

    /// One unit step from `self` toward `target` on each axis that differs.
    ///
    /// A target that differs on both axes yields a diagonal step.
    #[must_use]
    pub fn step_toward(self, target: Coord) -> Coord {
        let step = |from: u16, to: u16| match from.cmp(&to) {
            std::cmp::Ordering::Less => from + 1,
            std::cmp::Ordering::Greater => from - 1,
            std::cmp::Ordering::Equal => from,
        };
        Coord::new(step(self.x, target.x), step(self.y, target.y))
    }

    /// Get the cardinal neighbours (up, down, left, right) that do not
    /// underflow the grid origin.
    ///
    /// Returns a fixed-size array and count to avoid heap allocation.
    /// The array contains valid coordinates in indices 0..count.
    #[must_use]
    #[inline]
    pub fn cardinals(&self) -> ([Coord; 4], u8) {
        let mut result = [Coord::new(0, 0); 4];
        let mut count = 0u8;

        if self.y > 0 {
            result[count as usize] = Coord::new(self.x, self.y - 1);
            count += 1;
        }
        result[count as usize] = Coord::new(self.x, self.y.saturating_add(1));
        count += 1;
        if self.x > 0 {
            result[count as usize] = Coord::new(self.x - 1, self.y);
            count += 1;
        }
        result[count as usize] = Coord::new(self.x.saturating_add(1), self.y);
        count += 1;

        (result, count)
    }
}

impl From<[u16; 2]> for Coord {
    fn from([y, x]: [u16; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Coord> for [u16; 2] {
    fn from(coord: Coord) -> Self {
        [coord.y, coord.x]
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.y, self.x)
    }
}

/// A single cell of the level grid and everything standing on it.
///
/// Occupant order matters: the first character, then the first adversary,
/// wins display priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// Position of this tile.
    pub coord: Coord,
    /// Occupants in insertion order.
    pub occupants: Vec<Occupant>,
}

impl Tile {
    /// Create an empty tile.
    #[must_use]
    pub const fn new(coord: Coord) -> Self {
        Self {
            coord,
            occupants: Vec::new(),
        }
    }

    /// Create a tile holding a single occupant.
    #[must_use]
    pub fn with(coord: Coord, occupant: Occupant) -> Self {
        Self {
            coord,
            occupants: vec![occupant],
        }
    }

    /// Create a tile filled with a block.
    #[must_use]
    pub fn block(coord: Coord) -> Self {
        Self::with(coord, Occupant::Block)
    }

    /// Does any occupant block movement?
    #[must_use]
    pub fn has_block(&self) -> bool {
        self.occupants.iter().any(Occupant::is_blocking)
    }

    /// Is there a door on this tile?
    #[must_use]
    pub fn has_door(&self) -> bool {
        self.occupants.contains(&Occupant::Door)
    }

    /// Is the level key on this tile?
    #[must_use]
    pub fn has_key(&self) -> bool {
        self.occupants.contains(&Occupant::Key)
    }

    /// Is the level exit on this tile?
    #[must_use]
    pub fn has_exit(&self) -> bool {
        self.occupants.contains(&Occupant::Exit)
    }

    /// Is a character standing here?
    #[must_use]
    pub fn has_character(&self) -> bool {
        self.characters().next().is_some()
    }

    /// Is an adversary standing here?
    #[must_use]
    pub fn has_adversary(&self) -> bool {
        self.adversaries().next().is_some()
    }

    /// Characters standing on this tile.
    pub fn characters(&self) -> impl Iterator<Item = &Actor> {
        self.occupants
            .iter()
            .filter_map(Occupant::actor)
            .filter(|actor| actor.is_character())
    }

    /// Adversaries standing on this tile.
    pub fn adversaries(&self) -> impl Iterator<Item = &Actor> {
        self.occupants
            .iter()
            .filter_map(Occupant::actor)
            .filter(|actor| actor.is_adversary())
    }

    /// Remove the given actor from this tile, if present.
    pub fn remove_actor(&mut self, actor: &Actor) {
        self.occupants
            .retain(|occupant| occupant.actor() != Some(actor));
    }

    /// Render this tile as a single glyph.
    #[must_use]
    pub fn render(&self) -> char {
        if let Some(character) = self.characters().next() {
            return character.kind.glyph();
        }
        if let Some(adversary) = self.adversaries().next() {
            return adversary.kind.glyph();
        }
        self.occupants.first().map_or(' ', Occupant::render)
    }

    /// Protocol layout code: 0 = block, 2 = door, 1 = open.
    #[must_use]
    pub fn layout_code(&self) -> u8 {
        if self.has_block() {
            0
        } else if self.has_door() {
            2
        } else {
            1
        }
    }
}

/// The materialized level grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Width of the grid in tiles.
    width: u16,
    /// Height of the grid in tiles.
    height: u16,
    /// Tiles stored in row-major order.
    tiles: Vec<Tile>,
}

impl Grid {
    /// Create a grid where every cell holds a block.
    #[must_use]
    pub fn filled_with_blocks(width: u16, height: u16) -> Self {
        let tiles = (0..height)
            .flat_map(|y| (0..width).map(move |x| Tile::block(Coord::new(x, y))))
            .collect();

        Self {
            width,
            height,
            tiles,
        }
    }

    /// Get the width of the grid.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get the height of the grid.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Check if a coordinate is within the grid bounds.
    #[must_use]
    pub const fn in_bounds(&self, coord: Coord) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Convert a coordinate to an index into the tiles array.
    fn index(&self, coord: Coord) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(usize::from(coord.y) * usize::from(self.width) + usize::from(coord.x))
        } else {
            None
        }
    }

    /// Get a reference to the tile at the given coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Tile> {
        self.index(coord).map(|idx| &self.tiles[idx])
    }

    /// Get a mutable reference to the tile at the given coordinate.
    #[must_use]
    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Tile> {
        self.index(coord).map(|idx| &mut self.tiles[idx])
    }

    /// Replace the tile at the given coordinate with an empty tile.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn clear(&mut self, coord: Coord) -> bool {
        match self.get_mut(coord) {
            Some(tile) => {
                tile.occupants.clear();
                true
            }
            None => false,
        }
    }

    /// Replace the occupants of a tile with a single occupant.
    ///
    /// Returns `false` if the coordinate is out of bounds.
    pub fn set(&mut self, coord: Coord, occupant: Occupant) -> bool {
        match self.get_mut(coord) {
            Some(tile) => {
                tile.occupants.clear();
                tile.occupants.push(occupant);
                true
            }
            None => false,
        }
    }

    /// Iterate over all tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Iterate over the rows of the grid.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles.chunks(usize::from(self.width.max(1)))
    }

    /// The `(2 * radius + 1)` square of tiles centred on `center`, row by row.
    ///
    /// Cells beyond the grid edge are blocks whose coordinates are clamped
    /// into the grid space, so the window has the same shape everywhere.
    #[must_use]
    pub fn window(&self, center: Coord, radius: u16) -> Vec<Vec<Tile>> {
        let radius = i32::from(radius);
        let clamp = |value: i32| u16::try_from(value.max(0)).unwrap_or(u16::MAX);

        (-radius..=radius)
            .map(|dy| {
                (-radius..=radius)
                    .map(|dx| {
                        let x = i32::from(center.x) + dx;
                        let y = i32::from(center.y) + dy;
                        let coord = Coord::new(clamp(x), clamp(y));
                        let clamped = i32::from(coord.x) != x || i32::from(coord.y) != y;
                        match self.get(coord) {
                            Some(tile) if !clamped => tile.clone(),
                            _ => Tile::block(coord),
                        }
                    })
                    .collect()
            })
            .collect()
    }
}
