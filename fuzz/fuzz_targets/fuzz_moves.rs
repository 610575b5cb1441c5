#![no_main]

//! Move sequence fuzzer.
//!
//! Applies arbitrary moves for characters and adversaries to a two-room
//! level and checks after every step that:
//! 1. A rejected move leaves the level untouched
//! 2. Every actor on the level occupies exactly one tile
//! 3. Characters never end up inside walls

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use snarl::game::rules;
use snarl::{Actor, ActorKind, Coord, GameState, Hallway, Level, Room};

/// A fuzzer-generated move.
#[derive(Arbitrary, Debug)]
struct FuzzMove {
    /// Index into the actors on the level.
    actor: u8,
    x: u8,
    y: u8,
}

#[derive(Arbitrary, Debug)]
struct MovesInput {
    seed: u64,
    moves: Vec<FuzzMove>,
}

fn two_rooms() -> Option<Level> {
    let room = |ox: u16, door: Coord| {
        let open = (1..4)
            .flat_map(|y| (1..4).map(move |x| Coord::new(ox + x, y)))
            .collect();
        Room::new(Coord::new(ox, 0), 5, 5, vec![door], open).ok()
    };
    let left = room(0, Coord::new(4, 1))?;
    let right = room(10, Coord::new(10, 1))?;
    let hallway = Hallway::new(Coord::new(4, 1), Coord::new(10, 1), vec![]).ok()?;
    Level::new(vec![left, right], vec![hallway], Coord::new(12, 2), Coord::new(13, 3)).ok()
}

fuzz_target!(|input: MovesInput| {
    let Some(level) = two_rooms() else {
        return;
    };
    let roster = vec![Actor::character("ann"), Actor::character("bob")];
    let Ok(mut state) = GameState::new(level, [], roster, ChaCha8Rng::seed_from_u64(input.seed)) else {
        return;
    };
    for adversary in [
        Actor::new(ActorKind::Zombie, "zombie-1"),
        Actor::new(ActorKind::Ghost, "ghost-1"),
    ] {
        let _ = state.spawn_adversary(adversary);
    }

    for mv in input.moves.iter().take(64) {
        if rules::is_level_over(state.level()) {
            break;
        }
        let actors: Vec<Actor> = state.level().actors().map(|(actor, _)| actor.clone()).collect();
        let Some(actor) = actors.get(usize::from(mv.actor) % actors.len().max(1)) else {
            break;
        };
        let to = Coord::new(u16::from(mv.x % 16), u16::from(mv.y % 6));

        let before = state.level().clone();
        if state.apply_move(actor, to).is_err() {
            assert_eq!(state.level(), &before, "rejected move changed the level");
        }

        for (actor, at) in state.level().actors() {
            let tile = state.level().tile(at).expect("actor inside the grid");
            let here = tile.characters().chain(tile.adversaries()).filter(|a| *a == actor).count();
            assert_eq!(here, 1, "{actor:?} missing from its tile");
            if actor.is_character() {
                assert!(!tile.has_block(), "character inside a wall at {at}");
            }
        }
    }
});
