//! Property-based tests for level construction.
//!
//! Run with: cargo test --release prop_level

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use snarl::error::LevelError;
use snarl::{Actor, ActorKind, Coord, Hallway, Level, Room};

/// A room with every interior tile open and a door in the middle of its
/// left wall.
fn open_room(x: u16, y: u16, width: u16, height: u16) -> Room {
    let open = (y + 1..y + height - 1)
        .flat_map(|ty| (x + 1..x + width - 1).map(move |tx| Coord::new(tx, ty)))
        .collect();
    Room::new(Coord::new(x, y), width, height, vec![Coord::new(x, y + height / 2)], open).unwrap()
}

/// The fixed 5x5 room at the origin that holds the key and exit.
fn home() -> Room {
    open_room(0, 0, 5, 5)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2000))]

    /// Two rooms are rejected exactly when their rectangles share a cell.
    #[test]
    fn prop_overlap_is_rejected(x in 0u16..12, y in 0u16..12, w in 3u16..7, h in 3u16..7) {
        let overlaps = x < 5 && y < 5;
        let result = Level::new(vec![home(), open_room(x, y, w, h)], vec![], Coord::new(1, 1), Coord::new(3, 3));

        if overlaps {
            prop_assert!(matches!(result, Err(LevelError::RoomsOverlap(..))));
        } else {
            let level = result.unwrap();
            prop_assert_eq!(level.grid().width(), (x + w).max(5));
            prop_assert_eq!(level.grid().height(), (y + h).max(5));
        }
    }

    /// Re-rasterizing a level without changes reproduces the same grid,
    /// including actors piled onto shared tiles in any arrival order.
    #[test]
    fn prop_rasterize_idempotent(
        x in 5u16..12,
        y in 0u16..12,
        w in 3u16..7,
        h in 3u16..7,
        spots in prop::collection::vec((1u16..4, 1u16..4, any::<bool>()), 0..8),
    ) {
        let mut level = Level::new(vec![home(), open_room(x, y, w, h)], vec![], Coord::new(1, 1), Coord::new(3, 3)).unwrap();
        // Later arrivals get smaller numbers so arrival order disagrees
        // with name order.
        for (i, &(sx, sy, ghost)) in spots.iter().enumerate() {
            let kind = if ghost { ActorKind::Ghost } else { ActorKind::Zombie };
            let actor = Actor::new(kind, format!("{}-{}", kind.as_str(), spots.len() - i));
            level.place(actor, Coord::new(sx, sy)).unwrap();
        }
        let before = level.clone();
        level.rasterize();
        prop_assert_eq!(&level, &before);
    }

    /// Every open tile and door of a valid level is passable and every
    /// other room tile is not.
    #[test]
    fn prop_rooms_rasterize_faithfully(x in 5u16..12, y in 0u16..12, w in 3u16..7, h in 3u16..7) {
        let room = open_room(x, y, w, h);
        let level = Level::new(vec![home(), room.clone()], vec![], Coord::new(1, 1), Coord::new(3, 3)).unwrap();

        for ty in y..y + h {
            for tx in x..x + w {
                let at = Coord::new(tx, ty);
                let tile = level.tile(at).unwrap();
                let passable = room.open_tiles().contains(&at) || room.doors().contains(&at);
                prop_assert_eq!(!tile.has_block(), passable, "tile {}", at);
                prop_assert_eq!(tile.has_door(), room.doors().contains(&at));
            }
        }
    }

    /// A waypoint inside any room is rejected.
    #[test]
    fn prop_waypoint_inside_room_is_rejected(wx in 1u16..4, wy in 1u16..4) {
        let right = open_room(10, 0, 5, 5);
        let hallway = Hallway::new(Coord::new(0, 2), Coord::new(10, 2), vec![Coord::new(wx, wy)]);
        if let Ok(hallway) = hallway {
            let result = Level::new(vec![home(), right], vec![hallway], Coord::new(1, 1), Coord::new(3, 3));
            prop_assert!(result.is_err());
        }
    }
}

#[test]
fn test_hallway_must_end_at_doors() {
    let left = Room::new(Coord::new(0, 0), 5, 5, vec![Coord::new(4, 2)], home().open_tiles().to_vec()).unwrap();
    let right = open_room(10, 0, 5, 5);

    let joined = Hallway::new(Coord::new(4, 2), Coord::new(10, 2), vec![]).unwrap();
    assert!(Level::new(vec![left.clone(), right.clone()], vec![joined], Coord::new(1, 1), Coord::new(3, 3)).is_ok());

    let loose = Hallway::new(Coord::new(4, 1), Coord::new(10, 1), vec![]).unwrap();
    let result = Level::new(vec![left, right], vec![loose], Coord::new(1, 1), Coord::new(3, 3));
    assert_eq!(result.unwrap_err(), LevelError::DisconnectedHallway(Coord::new(4, 1)));
}

#[test]
fn test_key_and_exit_must_differ() {
    let result = Level::new(vec![home()], vec![], Coord::new(2, 2), Coord::new(2, 2));
    assert_eq!(result.unwrap_err(), LevelError::KeyOnExit(Coord::new(2, 2)));
}

#[test]
fn test_key_on_wall_is_rejected() {
    let result = Level::new(vec![home()], vec![], Coord::new(0, 0), Coord::new(2, 2));
    assert_eq!(
        result.unwrap_err(),
        LevelError::ObjectNotOnOpenTile {
            object: "key",
            at: Coord::new(0, 0)
        }
    );
}

#[test]
fn test_no_rooms() {
    let result = Level::new(vec![], vec![], Coord::new(1, 1), Coord::new(2, 2));
    assert_eq!(result.unwrap_err(), LevelError::NoRooms);
}
