//! Game configuration.

use crate::game::MAX_PLAYERS;

/// Configuration for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Radius of the square window sent in `update` messages.
    pub view_radius: u16,
    /// Maximum number of registered players.
    pub max_players: usize,
    /// Number of actor turns after which the game is called off as lost.
    pub max_turns: u64,
    /// Invalid replies a player may send in one turn before losing it.
    pub max_move_attempts: u32,
    /// Spawn zombies and ghosts at the start of every level.
    pub spawn_adversaries: bool,
    /// Seed for every random choice. Entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            view_radius: 2,
            max_players: MAX_PLAYERS,
            max_turns: 10_000,
            max_move_attempts: 5,
            spawn_adversaries: true,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Adversaries for a one-based level number: `n / 2 + 1` zombies and
    /// `n / 2` ghosts.
    #[must_use]
    pub const fn adversaries_for_level(level: usize) -> (usize, usize) {
        (level / 2 + 1, level / 2)
    }
}
