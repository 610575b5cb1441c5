//! Game state: the live level, the levels still to play, and the roster.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

use crate::error::{MoveError, StateError};
use crate::game::{Actor, Coord, Level, Tile, rules};

/// Maximum number of characters in a game.
pub const MAX_PLAYERS: usize = 4;

/// Complete game state.
#[derive(Debug, Clone)]
pub struct GameState {
    /// The level being played.
    level: Level,
    /// Levels still to play, in order.
    upcoming: VecDeque<Level>,
    /// Number of levels finished so far.
    levels_completed: usize,
    /// Characters registered for the whole run.
    roster: Vec<Actor>,
    /// Source of every random choice made by the engine.
    rng: ChaCha8Rng,
}

impl GameState {
    /// Create a game and place the roster in the top-left room of the first
    /// level.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster is empty, larger than
    /// [`MAX_PLAYERS`], holds a name twice, or does not fit in the room.
    pub fn new(
        first: Level,
        upcoming: impl IntoIterator<Item = Level>,
        roster: Vec<Actor>,
        rng: ChaCha8Rng,
    ) -> Result<Self, StateError> {
        check_roster(&roster)?;
        let mut state = Self {
            level: first,
            upcoming: upcoming.into_iter().collect(),
            levels_completed: 0,
            roster,
            rng,
        };
        let roster = state.roster.clone();
        state.admit_characters(&roster)?;
        Ok(state)
    }

    /// Create a game from a level whose characters are already placed.
    ///
    /// # Errors
    ///
    /// Returns an error if the level holds no characters or more than
    /// [`MAX_PLAYERS`].
    pub fn from_level(
        level: Level,
        upcoming: impl IntoIterator<Item = Level>,
        rng: ChaCha8Rng,
    ) -> Result<Self, StateError> {
        let roster: Vec<Actor> = level.characters().map(|(actor, _)| actor.clone()).collect();
        check_roster(&roster)?;
        Ok(Self {
            level,
            upcoming: upcoming.into_iter().collect(),
            levels_completed: 0,
            roster,
            rng,
        })
    }

    /// The level being played.
    #[must_use]
    pub const fn level(&self) -> &Level {
        &self.level
    }

    /// Characters registered for the run.
    #[must_use]
    pub fn roster(&self) -> &[Actor] {
        &self.roster
    }

    /// Number of levels finished so far.
    #[must_use]
    pub const fn levels_completed(&self) -> usize {
        self.levels_completed
    }

    /// One-based number of the level being played.
    #[must_use]
    pub const fn level_number(&self) -> usize {
        self.levels_completed + 1
    }

    /// Is another level queued?
    #[must_use]
    pub fn has_next_level(&self) -> bool {
        !self.upcoming.is_empty()
    }

    /// The engine's random source.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Place a character at a given position.
    ///
    /// # Errors
    ///
    /// Returns an error if the character is already placed or the position
    /// is off the grid.
    pub fn add_character(&mut self, character: Actor, at: Coord) -> Result<(), StateError> {
        if !self.roster.contains(&character) {
            self.roster.push(character.clone());
        }
        self.level.place(character, at)
    }

    /// Place an adversary at a given position.
    ///
    /// # Errors
    ///
    /// Returns an error if the adversary is already placed or the position
    /// is off the grid.
    pub fn add_adversary(&mut self, adversary: Actor, at: Coord) -> Result<(), StateError> {
        self.level.place(adversary, at)
    }

    /// Take an actor off the level, returning where it stood.
    pub fn remove_actor(&mut self, actor: &Actor) -> Option<Coord> {
        self.level.remove_actor(actor)
    }

    /// Relocate an actor without checking legality, then resolve the
    /// destination.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not on the level or the destination
    /// is off the grid.
    pub fn move_actor(&mut self, actor: &Actor, to: Coord) -> Result<(), MoveError> {
        self.level.move_actor(actor, to, &mut self.rng)
    }

    /// Validate a move and apply it. An illegal move leaves the state
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`MoveError`] explaining why the move is illegal.
    pub fn apply_move(&mut self, actor: &Actor, to: Coord) -> Result<(), MoveError> {
        rules::check_move(&self.level, actor, to)?;
        self.move_actor(actor, to)
    }

    /// Swap in the next queued level.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoLevelQueued`] if there is none.
    pub fn next_level(&mut self) -> Result<(), StateError> {
        let next = self.upcoming.pop_front().ok_or(StateError::NoLevelQueued)?;
        self.level = next;
        self.levels_completed += 1;
        log::info!("advancing to level {}", self.level_number());
        Ok(())
    }

    /// Place characters on random free tiles of the top-left room.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoSpawnTile`] if the room runs out of space.
    pub fn admit_characters(&mut self, characters: &[Actor]) -> Result<(), StateError> {
        for character in characters {
            let tiles = self
                .level
                .top_left_room()
                .map(|room| self.level.spawn_tiles(room))
                .unwrap_or_default();
            let &at = tiles
                .choose(&mut self.rng)
                .ok_or_else(|| StateError::NoSpawnTile(character.clone()))?;
            self.add_character(character.clone(), at)?;
        }
        Ok(())
    }

    /// Place an adversary on a random free tile, away from the top-left room
    /// when the level has other rooms.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::NoSpawnTile`] if no room has space left.
    pub fn spawn_adversary(&mut self, adversary: Actor) -> Result<Coord, StateError> {
        let start = self.level.top_left_room().cloned();
        let rooms = self.level.rooms();
        let away: Vec<Coord> = rooms
            .iter()
            .filter(|room| rooms.len() == 1 || Some(*room) != start.as_ref())
            .flat_map(|room| self.level.spawn_tiles(room))
            .collect();
        let tiles = if away.is_empty() {
            rooms.iter().flat_map(|room| self.level.spawn_tiles(room)).collect()
        } else {
            away
        };

        let &at = tiles
            .choose(&mut self.rng)
            .ok_or_else(|| StateError::NoSpawnTile(adversary.clone()))?;
        self.add_adversary(adversary, at)?;
        Ok(at)
    }

    /// The `(2 * radius + 1)` square of tiles centred on a character.
    ///
    /// Cells beyond the grid edge are filled with blocks so the window has
    /// the same shape everywhere; their coordinates are clamped to the grid
    /// space. Returns `None` if the character is not on the level.
    #[must_use]
    pub fn get_character_surroundings(&self, character: &Actor, radius: u16) -> Option<Vec<Vec<Tile>>> {
        let center = self.level.locate(character)?;
        Some(self.level.grid().window(center, radius))
    }

    /// Render the current level.
    #[must_use]
    pub fn render(&self) -> String {
        self.level.render()
    }
}

fn check_roster(roster: &[Actor]) -> Result<(), StateError> {
    if roster.is_empty() || roster.len() > MAX_PLAYERS {
        return Err(StateError::PlayerCount {
            count: roster.len(),
            max: MAX_PLAYERS,
        });
    }
    for (i, actor) in roster.iter().enumerate() {
        if roster[..i].contains(actor) {
            return Err(StateError::DuplicateActor(actor.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::ActorKind;
    use crate::game::level::tests::two_room_level;
    use rand::SeedableRng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn test_new_places_roster_in_top_left_room() {
        let roster = vec![Actor::character("ann"), Actor::character("bob")];
        let state = GameState::new(two_room_level(), [], roster.clone(), rng()).unwrap();
        for character in &roster {
            let at = state.level().locate(character).unwrap();
            assert_eq!(state.level().room_containing(at).unwrap().origin(), Coord::new(0, 0));
        }
        assert_eq!(state.level_number(), 1);
    }

    #[test]
    fn test_player_count_bounds() {
        let err = GameState::new(two_room_level(), [], vec![], rng());
        assert_eq!(err.unwrap_err(), StateError::PlayerCount { count: 0, max: 4 });

        let five = (0..5).map(|i| Actor::character(format!("p{i}"))).collect();
        let err = GameState::new(two_room_level(), [], five, rng());
        assert_eq!(err.unwrap_err(), StateError::PlayerCount { count: 5, max: 4 });
    }

    #[test]
    fn test_duplicate_roster_names() {
        let roster = vec![Actor::character("ann"), Actor::character("ann")];
        let err = GameState::new(two_room_level(), [], roster, rng());
        assert_eq!(err.unwrap_err(), StateError::DuplicateActor(Actor::character("ann")));
    }

    #[test]
    fn test_next_level() {
        let roster = vec![Actor::character("ann")];
        let mut state = GameState::new(two_room_level(), [two_room_level()], roster, rng()).unwrap();
        assert!(state.has_next_level());
        state.next_level().unwrap();
        assert_eq!(state.levels_completed(), 1);
        assert_eq!(state.level_number(), 2);
        assert!(!state.level().has_active_characters());
        assert_eq!(state.next_level(), Err(StateError::NoLevelQueued));
    }

    #[test]
    fn test_spawn_adversary_avoids_start_room() {
        let roster = vec![Actor::character("ann")];
        let mut state = GameState::new(two_room_level(), [], roster, rng()).unwrap();
        for i in 0..5 {
            let at = state
                .spawn_adversary(Actor::new(ActorKind::Zombie, format!("z{i}")))
                .unwrap();
            assert_eq!(state.level().room_containing(at).unwrap().origin(), Coord::new(10, 0));
        }
    }

    #[test]
    fn test_surroundings_are_padded() {
        let mut level = two_room_level();
        let ann = Actor::character("ann");
        level.place(ann.clone(), Coord::new(1, 1)).unwrap();
        let state = GameState::from_level(level, [], rng()).unwrap();

        let window = state.get_character_surroundings(&ann, 2).unwrap();
        assert_eq!(window.len(), 5);
        assert!(window.iter().all(|row| row.len() == 5));
        assert!(window[0].iter().all(Tile::has_block));
        assert!(window[1].iter().all(Tile::has_block));
        assert_eq!(window[2][2].coord, Coord::new(1, 1));
        assert!(window[2][2].has_character());
        assert!(!window[3][4].has_block());
    }

    #[test]
    fn test_apply_move_rejects_without_mutation() {
        let mut level = two_room_level();
        let ann = Actor::character("ann");
        level.place(ann.clone(), Coord::new(1, 1)).unwrap();
        let mut state = GameState::from_level(level, [], rng()).unwrap();
        let before = state.level().clone();

        let err = state.apply_move(&ann, Coord::new(3, 2));
        assert_eq!(err, Err(MoveError::TooFar { distance: 3, max: 2 }));
        assert_eq!(state.level(), &before);
    }
}
