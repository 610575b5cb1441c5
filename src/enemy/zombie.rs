//! Zombies: room-bound chasers.

use rand::Rng;
use rand::seq::SliceRandom;

use super::legal_cardinals;
use crate::game::{Actor, Coord, Level};

/// Step toward the nearest character in the zombie's room, or wander when
/// the room is empty. Passes when boxed in.
pub(super) fn choose_move<R: Rng + ?Sized>(level: &Level, zombie: &Actor, at: Coord, rng: &mut R) -> Option<Coord> {
    let moves = legal_cardinals(level, zombie, at);

    let target = level.room_containing(at).and_then(|room| {
        level
            .characters()
            .map(|(_, position)| position)
            .filter(|&position| room.contains(position))
            .min_by_key(|position| position.manhattan(at))
    });

    match target {
        Some(target) => moves.into_iter().min_by_key(|to| to.manhattan(target)),
        None => moves.choose(rng).copied(),
    }
}
