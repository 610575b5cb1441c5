//! Ghosts: wall-walkers that chase across rooms.

use rand::Rng;
use rand::seq::SliceRandom;

use super::legal_cardinals;
use crate::game::{Actor, Coord, Level};

/// Manhattan range within which a ghost notices characters.
const CHASE_RANGE: u32 = 10;

/// Chase the nearest character in range, preferring steps that do not
/// increase the distance and do not land on a block. With nobody in range,
/// step toward the closest block along the four cardinal rays.
pub(super) fn choose_move<R: Rng + ?Sized>(level: &Level, ghost: &Actor, at: Coord, rng: &mut R) -> Option<Coord> {
    let moves = legal_cardinals(level, ghost, at);
    if moves.is_empty() {
        return None;
    }

    let target = level
        .characters()
        .map(|(_, position)| position)
        .filter(|position| position.manhattan(at) <= CHASE_RANGE)
        .min_by_key(|position| position.manhattan(at));

    if let Some(target) = target {
        let here = at.manhattan(target);
        let closer: Vec<Coord> = moves
            .iter()
            .copied()
            .filter(|to| to.manhattan(target) <= here)
            .collect();
        let clear = closer
            .iter()
            .copied()
            .filter(|&to| !is_blocked(level, to))
            .min_by_key(|to| to.manhattan(target));

        return clear
            .or_else(|| closer.choose(rng).copied())
            .or_else(|| moves.choose(rng).copied());
    }

    nearest_block_step(level, at).or_else(|| moves.choose(rng).copied())
}

fn is_blocked(level: &Level, at: Coord) -> bool {
    level.tile(at).is_some_and(|tile| tile.has_block())
}

/// First step along the cardinal ray that reaches a block soonest.
fn nearest_block_step(level: &Level, at: Coord) -> Option<Coord> {
    const DIRECTIONS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

    let offset = |(dx, dy): (i32, i32), k: i32| -> Option<Coord> {
        let x = u16::try_from(i32::from(at.x) + dx * k).ok()?;
        let y = u16::try_from(i32::from(at.y) + dy * k).ok()?;
        let coord = Coord::new(x, y);
        level.grid().in_bounds(coord).then_some(coord)
    };

    DIRECTIONS
        .iter()
        .filter_map(|&direction| {
            let (distance, _) = (1..)
                .map_while(|k| offset(direction, k).map(|coord| (k, coord)))
                .find(|&(_, coord)| is_blocked(level, coord))?;
            Some((distance, offset(direction, 1)?))
        })
        .min_by_key(|&(distance, _)| distance)
        .map(|(_, first)| first)
}
