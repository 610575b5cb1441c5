//! Move legality and end-of-level / end-of-game checks.
//!
//! Every function here is a read-only query. Character moves fail with a
//! descriptive [`MoveError`]; adversary moves are a plain yes or no.

use crate::error::MoveError;
use crate::game::{Actor, ActorKind, Coord, GameState, Level, Tile};

/// Cardinal steps a character may take per turn.
pub const CHARACTER_STEPS: u32 = 2;

/// Cardinal steps an adversary may take per turn.
pub const ADVERSARY_STEPS: u32 = 1;

/// Can an actor of this kind stand on the tile?
///
/// Blocks and walls stop everyone. Characters also may not share a tile
/// with another character; adversaries may, which catches the character.
#[must_use]
pub fn is_open_tile(tile: &Tile, kind: ActorKind) -> bool {
    !tile.has_block() && (kind.is_adversary() || !tile.has_character())
}

/// Check a character move from the character's tracked position.
///
/// Staying in place is allowed.
///
/// # Errors
///
/// Returns a [`MoveError`] naming why the move is illegal.
pub fn validate_character_move(level: &Level, character: &Actor, to: Coord) -> Result<(), MoveError> {
    let from = level
        .locate(character)
        .ok_or_else(|| MoveError::NotOnLevel(character.clone()))?;
    let tile = level.tile(to).ok_or(MoveError::OutOfBounds(to))?;

    let distance = from.manhattan(to);
    if distance > CHARACTER_STEPS {
        return Err(MoveError::TooFar {
            distance,
            max: CHARACTER_STEPS,
        });
    }
    if to != from && !is_open_tile(tile, character.kind) {
        return Err(MoveError::Blocked(to));
    }
    Ok(())
}

/// Is the adversary allowed to step to `to`?
///
/// Zombies stay inside their room: doors, the key and the exit count as
/// blocked for them. Ghosts may step anywhere adjacent on the grid,
/// including onto blocks, which teleports them.
#[must_use]
pub fn is_valid_adversary_move(level: &Level, adversary: &Actor, to: Coord) -> bool {
    let Some(from) = level.locate(adversary) else {
        return false;
    };
    let Some(tile) = level.tile(to) else {
        return false;
    };
    if from.manhattan(to) > ADVERSARY_STEPS {
        return false;
    }

    match adversary.kind {
        ActorKind::Zombie => {
            is_open_tile(tile, adversary.kind) && !tile.has_door() && !tile.has_key() && !tile.has_exit()
        }
        ActorKind::Ghost => true,
        ActorKind::Player => false,
    }
}

/// Validate a move for any actor.
///
/// # Errors
///
/// Returns the character's [`MoveError`], or
/// [`MoveError::IllegalAdversaryMove`] for a rejected adversary step.
pub fn check_move(level: &Level, actor: &Actor, to: Coord) -> Result<(), MoveError> {
    if actor.is_character() {
        validate_character_move(level, actor, to)
    } else if is_valid_adversary_move(level, actor, to) {
        Ok(())
    } else {
        Err(MoveError::IllegalAdversaryMove {
            actor: actor.clone(),
            to,
        })
    }
}

/// A level is over once no character is left on it.
#[must_use]
pub fn is_level_over(level: &Level) -> bool {
    !level.has_active_characters()
}

/// The game is over once the current level is over and either no level is
/// queued or nobody made it through the exit.
#[must_use]
pub fn is_game_over(state: &GameState) -> bool {
    is_level_over(state.level()) && (!state.has_next_level() || state.level().completed().is_empty())
}

/// Did the players win? Only meaningful once [`is_game_over`] holds.
#[must_use]
pub fn did_players_win(state: &GameState) -> bool {
    is_game_over(state) && !state.has_next_level() && !state.level().completed().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::tests::two_room_level;

    fn level_with(actors: &[(Actor, Coord)]) -> Level {
        let mut level = two_room_level();
        for (actor, at) in actors {
            level.place(actor.clone(), *at).unwrap();
        }
        level
    }

    #[test]
    fn test_character_two_steps() {
        let ann = Actor::character("ann");
        let level = level_with(&[(ann.clone(), Coord::new(1, 1))]);
        assert_eq!(validate_character_move(&level, &ann, Coord::new(2, 2)), Ok(()));
        assert_eq!(validate_character_move(&level, &ann, Coord::new(3, 1)), Ok(()));
        assert_eq!(validate_character_move(&level, &ann, Coord::new(1, 1)), Ok(()));
        assert_eq!(
            validate_character_move(&level, &ann, Coord::new(3, 2)),
            Err(MoveError::TooFar { distance: 3, max: 2 })
        );
    }

    #[test]
    fn test_character_blocked_by_wall_and_other_character() {
        let ann = Actor::character("ann");
        let bob = Actor::character("bob");
        let level = level_with(&[(ann.clone(), Coord::new(1, 1)), (bob, Coord::new(2, 1))]);
        assert_eq!(
            validate_character_move(&level, &ann, Coord::new(0, 1)),
            Err(MoveError::Blocked(Coord::new(0, 1)))
        );
        assert_eq!(
            validate_character_move(&level, &ann, Coord::new(2, 1)),
            Err(MoveError::Blocked(Coord::new(2, 1)))
        );
    }

    #[test]
    fn test_character_may_walk_into_adversary() {
        let ann = Actor::character("ann");
        let zombie = Actor::new(ActorKind::Zombie, "z");
        let level = level_with(&[(ann.clone(), Coord::new(1, 1)), (zombie, Coord::new(2, 1))]);
        assert_eq!(validate_character_move(&level, &ann, Coord::new(2, 1)), Ok(()));
    }

    #[test]
    fn test_unknown_character() {
        let level = two_room_level();
        let ghost = Actor::character("ghost");
        assert_eq!(
            validate_character_move(&level, &ghost, Coord::new(1, 1)),
            Err(MoveError::NotOnLevel(ghost))
        );
    }

    #[test]
    fn test_zombie_stays_in_room() {
        let zombie = Actor::new(ActorKind::Zombie, "z");
        let level = level_with(&[(zombie.clone(), Coord::new(3, 1))]);
        assert!(is_valid_adversary_move(&level, &zombie, Coord::new(3, 2)));
        assert!(!is_valid_adversary_move(&level, &zombie, Coord::new(4, 1)));
        assert!(!is_valid_adversary_move(&level, &zombie, Coord::new(3, 0)));
        assert!(!is_valid_adversary_move(&level, &zombie, Coord::new(2, 2)));
    }

    #[test]
    fn test_zombie_avoids_key_and_exit() {
        let zombie = Actor::new(ActorKind::Zombie, "z");
        let level = level_with(&[(zombie.clone(), Coord::new(12, 3))]);
        assert!(!is_valid_adversary_move(&level, &zombie, Coord::new(12, 2)));
        assert!(!is_valid_adversary_move(&level, &zombie, Coord::new(13, 3)));
        assert!(is_valid_adversary_move(&level, &zombie, Coord::new(11, 3)));
    }

    #[test]
    fn test_ghost_walks_through_walls_and_doors() {
        let ghost = Actor::new(ActorKind::Ghost, "g");
        let level = level_with(&[(ghost.clone(), Coord::new(3, 1))]);
        assert!(is_valid_adversary_move(&level, &ghost, Coord::new(4, 1)));
        assert!(is_valid_adversary_move(&level, &ghost, Coord::new(3, 0)));
        assert!(!is_valid_adversary_move(&level, &ghost, Coord::new(3, 3)));
    }

    #[test]
    fn test_check_move_dispatch() {
        let zombie = Actor::new(ActorKind::Zombie, "z");
        let level = level_with(&[(zombie.clone(), Coord::new(3, 1))]);
        assert_eq!(
            check_move(&level, &zombie, Coord::new(4, 1)),
            Err(MoveError::IllegalAdversaryMove {
                actor: zombie.clone(),
                to: Coord::new(4, 1)
            })
        );
        assert_eq!(check_move(&level, &zombie, Coord::new(2, 1)), Ok(()));
    }

    #[test]
    fn test_level_over_when_no_characters() {
        let ann = Actor::character("ann");
        let mut level = level_with(&[(ann.clone(), Coord::new(1, 1))]);
        assert!(!is_level_over(&level));
        level.remove_actor(&ann);
        assert!(is_level_over(&level));
    }
}
