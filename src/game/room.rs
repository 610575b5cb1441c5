//! Rectangular rooms.

use crate::error::{LevelError, LevelResult};
use crate::game::{Coord, Grid, Occupant, WallOrientation};

/// An axis-aligned rectangular room.
///
/// The boundary ring is wall except where doors are declared. Interior cells
/// are solid unless listed as open tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Upper-left corner.
    origin: Coord,
    /// Size on the x-axis.
    width: u16,
    /// Size on the y-axis.
    height: u16,
    /// Doors on the boundary ring.
    doors: Vec<Coord>,
    /// Traversable interior tiles.
    open_tiles: Vec<Coord>,
}

impl Room {
    /// Create a room, validating its invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero, the room reaches past
    /// `u16::MAX` on either axis, there is no door, a door is off the
    /// boundary, or an open tile is not strictly inside the boundary.
    pub fn new(
        origin: Coord,
        width: u16,
        height: u16,
        doors: Vec<Coord>,
        open_tiles: Vec<Coord>,
    ) -> LevelResult<Self> {
        if width == 0 || height == 0 {
            return Err(LevelError::EmptyRoom {
                origin,
                width,
                height,
            });
        }
        let fits = |start: u16, len: u16| u32::from(start) + u32::from(len) <= u32::from(u16::MAX);
        if !fits(origin.x, width) || !fits(origin.y, height) {
            return Err(LevelError::RoomOutOfRange {
                origin,
                width,
                height,
            });
        }
        if doors.is_empty() {
            return Err(LevelError::NoDoor(origin));
        }

        let room = Self {
            origin,
            width,
            height,
            doors,
            open_tiles,
        };

        if let Some(&door) = room.doors.iter().find(|&&door| !room.is_on_boundary(door)) {
            return Err(LevelError::DoorOffBoundary { origin, door });
        }
        if let Some(&tile) = room
            .open_tiles
            .iter()
            .find(|&&tile| !room.is_strictly_inside(tile))
        {
            return Err(LevelError::OpenTileOutside { origin, tile });
        }

        Ok(room)
    }

    /// Upper-left corner of the room.
    #[must_use]
    pub const fn origin(&self) -> Coord {
        self.origin
    }

    /// Width of the room.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height of the room.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Doors on the boundary.
    #[must_use]
    pub fn doors(&self) -> &[Coord] {
        &self.doors
    }

    /// Traversable interior tiles.
    #[must_use]
    pub fn open_tiles(&self) -> &[Coord] {
        &self.open_tiles
    }

    /// Exclusive right edge.
    fn x_end(&self) -> u32 {
        u32::from(self.origin.x) + u32::from(self.width)
    }

    /// Exclusive bottom edge.
    fn y_end(&self) -> u32 {
        u32::from(self.origin.y) + u32::from(self.height)
    }

    /// Ordering key used to find the top-left room: Manhattan distance of the
    /// origin from (0, 0), ties broken by the smaller y.
    #[must_use]
    pub fn top_left_key(&self) -> (u32, u16) {
        (
            u32::from(self.origin.x) + u32::from(self.origin.y),
            self.origin.y,
        )
    }

    /// Is the coordinate inside the room rectangle, boundary included?
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        let (x, y) = (u32::from(coord.x), u32::from(coord.y));
        x >= u32::from(self.origin.x) && x < self.x_end() && y >= u32::from(self.origin.y) && y < self.y_end()
    }

    /// Is the coordinate on the boundary ring?
    #[must_use]
    pub fn is_on_boundary(&self, coord: Coord) -> bool {
        self.contains(coord) && !self.is_strictly_inside(coord)
    }

    /// Is the coordinate inside the boundary ring?
    #[must_use]
    pub fn is_strictly_inside(&self, coord: Coord) -> bool {
        let (x, y) = (u32::from(coord.x), u32::from(coord.y));
        x > u32::from(self.origin.x)
            && x + 1 < self.x_end()
            && y > u32::from(self.origin.y)
            && y + 1 < self.y_end()
    }

    /// Do the two room rectangles share any cell?
    #[must_use]
    pub fn intersects(&self, other: &Room) -> bool {
        let x_overlap =
            u32::from(self.origin.x) < other.x_end() && u32::from(other.origin.x) < self.x_end();
        let y_overlap =
            u32::from(self.origin.y) < other.y_end() && u32::from(other.origin.y) < self.y_end();
        x_overlap && y_overlap
    }

    /// Does the segment between two waypoints start outside the room on one
    /// side and end outside on the opposite side while crossing its span?
    #[must_use]
    pub fn is_straddled_by(&self, a: Coord, b: Coord) -> bool {
        let (ax, ay, bx, by) = (
            u32::from(a.x),
            u32::from(a.y),
            u32::from(b.x),
            u32::from(b.y),
        );
        let (min_x, min_y) = (u32::from(self.origin.x), u32::from(self.origin.y));

        let spans = |lo: u32, hi: u32, start: u32, end: u32| {
            (start <= lo && end >= hi) || (end <= lo && start >= hi)
        };

        let vertical = ax == bx
            && ax >= min_x
            && ax < self.x_end()
            && spans(min_y, self.y_end(), ay, by);
        let horizontal = ay == by
            && ay >= min_y
            && ay < self.y_end()
            && spans(min_x, self.x_end(), ax, bx);

        vertical || horizontal
    }

    /// Stamp this room onto the grid: walls on the ring, doors where
    /// declared, solid interior except the open tiles.
    pub fn rasterize(&self, grid: &mut Grid) {
        for dy in 0..self.height {
            for dx in 0..self.width {
                let coord = Coord::new(self.origin.x + dx, self.origin.y + dy);
                let occupant = if dy == 0 || dy == self.height - 1 {
                    Occupant::Wall(WallOrientation::Horizontal)
                } else if dx == 0 || dx == self.width - 1 {
                    Occupant::Wall(WallOrientation::Vertical)
                } else {
                    Occupant::Block
                };
                grid.set(coord, occupant);
            }
        }

        for &tile in &self.open_tiles {
            grid.clear(tile);
        }
        for &door in &self.doors {
            grid.set(door, Occupant::Door);
        }
    }
}
