//! Sequential names for spawned adversaries.

use crate::game::{Actor, ActorKind};

/// Hands out `zombie-1`, `zombie-2`, `ghost-1`, ... with one counter per
/// kind. Owned by whoever spawns adversaries, so two games never share
/// counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameGenerator {
    zombies: u32,
    ghosts: u32,
    players: u32,
}

impl NameGenerator {
    /// Create a generator with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The next actor of the given kind.
    pub fn next_actor(&mut self, kind: ActorKind) -> Actor {
        let counter = match kind {
            ActorKind::Zombie => &mut self.zombies,
            ActorKind::Ghost => &mut self.ghosts,
            ActorKind::Player => &mut self.players,
        };
        *counter += 1;
        Actor::new(kind, format!("{}-{counter}", kind.as_str()))
    }
}
