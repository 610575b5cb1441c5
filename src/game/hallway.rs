//! Orthogonal hallways between room doors.

use crate::error::{LevelError, LevelResult};
use crate::game::{Coord, Grid};

/// A hallway connecting two doors through a list of axis-aligned segments.
///
/// The stored waypoints include the two cells adjacent to each door, which
/// are inserted on construction. Adjacent doors form a zero-length hallway
/// with no waypoints at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hallway {
    door1: Coord,
    door2: Coord,
    waypoints: Vec<Coord>,
}

impl Hallway {
    /// Create a hallway from `door1` to `door2` through the given corners.
    ///
    /// # Errors
    ///
    /// Returns an error if adjacent doors are given waypoints or if any
    /// segment of the resulting path is diagonal.
    pub fn new(door1: Coord, door2: Coord, corners: Vec<Coord>) -> LevelResult<Self> {
        let waypoints = if door1.chebyshev(door2) <= 1 {
            if !corners.is_empty() {
                return Err(LevelError::WaypointsOnZeroLength {
                    from: door1,
                    to: door2,
                });
            }
            corners
        } else {
            let (first, last) = match (corners.first(), corners.last()) {
                (Some(&first), Some(&last)) => (first, last),
                _ => (door2, door1),
            };
            let mut waypoints = Vec::with_capacity(corners.len() + 2);
            waypoints.push(door1.step_toward(first));
            waypoints.extend(corners);
            waypoints.push(door2.step_toward(last));
            waypoints
        };

        if waypoints.len() < 2 && !door1.shares_axis(door2) {
            return Err(LevelError::DiagonalSegment {
                from: door1,
                to: door2,
            });
        }

        let hallway = Self {
            door1,
            door2,
            waypoints,
        };
        if let Some((from, to)) = hallway.segments().find(|(a, b)| !a.shares_axis(*b)) {
            return Err(LevelError::DiagonalSegment { from, to });
        }

        Ok(hallway)
    }

    /// The door this hallway starts from.
    #[must_use]
    pub const fn door1(&self) -> Coord {
        self.door1
    }

    /// The door this hallway leads to.
    #[must_use]
    pub const fn door2(&self) -> Coord {
        self.door2
    }

    /// Waypoints including the two door-adjacent endpoints.
    #[must_use]
    pub fn waypoints(&self) -> &[Coord] {
        &self.waypoints
    }

    /// Consecutive waypoint pairs.
    pub fn segments(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        self.waypoints.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Do any segments of the two hallways touch?
    #[must_use]
    pub fn intersects(&self, other: &Hallway) -> bool {
        self.segments().any(|(a, b)| {
            other
                .segments()
                .any(|(c, d)| segments_overlap(a, b, c, d))
        })
    }

    /// Clear every cell covered by the hallway.
    pub fn rasterize(&self, grid: &mut Grid) {
        for (a, b) in self.segments() {
            for y in a.y.min(b.y)..=a.y.max(b.y) {
                for x in a.x.min(b.x)..=a.x.max(b.x) {
                    grid.clear(Coord::new(x, y));
                }
            }
        }
    }
}

/// Inclusive bounding-box overlap of two axis-aligned segments.
fn segments_overlap(a: Coord, b: Coord, c: Coord, d: Coord) -> bool {
    let overlap = |a1: u16, a2: u16, b1: u16, b2: u16| {
        a1.min(a2) <= b1.max(b2) && b1.min(b2) <= a1.max(a2)
    };
    overlap(a.x, b.x, c.x, d.x) && overlap(a.y, b.y, c.y, d.y)
}
