//! Adversary controllers.
//!
//! Each adversary is driven by an [`Enemy`] that is told the level and its
//! own position before every turn, then asked for a move. The decision
//! procedure depends on the adversary kind:
//!
//! - Zombies chase a character sharing their room, otherwise wander.
//! - Ghosts chase any character within range, otherwise head for the
//!   nearest wall to teleport.

mod ghost;
mod names;
mod zombie;

pub use names::NameGenerator;

use rand::Rng;

use crate::error::StrategyError;
use crate::game::{Actor, ActorKind, Coord, Level, rules};

/// The last state an enemy was told about.
#[derive(Debug, Clone)]
struct View {
    level: Level,
    location: Coord,
}

/// Decision-making for one adversary.
#[derive(Debug, Clone)]
pub struct Enemy {
    actor: Actor,
    view: Option<View>,
}

impl Enemy {
    /// Create a controller for an adversary.
    #[must_use]
    pub const fn new(actor: Actor) -> Self {
        Self { actor, view: None }
    }

    /// The adversary this controller drives.
    #[must_use]
    pub const fn actor(&self) -> &Actor {
        &self.actor
    }

    /// Record the current level and the adversary's position on it.
    pub fn notify(&mut self, level: &Level, location: Coord) {
        self.view = Some(View {
            level: level.clone(),
            location,
        });
    }

    /// Decide where to go. `None` passes the turn.
    ///
    /// # Errors
    ///
    /// Returns [`StrategyError::NotNotified`] if [`Enemy::notify`] has not
    /// been called yet.
    pub fn choose_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Option<Coord>, StrategyError> {
        let view = self
            .view
            .as_ref()
            .ok_or_else(|| StrategyError::NotNotified(self.actor.clone()))?;

        let choice = match self.actor.kind {
            ActorKind::Zombie => zombie::choose_move(&view.level, &self.actor, view.location, rng),
            ActorKind::Ghost => ghost::choose_move(&view.level, &self.actor, view.location, rng),
            ActorKind::Player => None,
        };
        Ok(choice)
    }
}

/// Cardinal neighbours the adversary may legally step to.
fn legal_cardinals(level: &Level, actor: &Actor, from: Coord) -> Vec<Coord> {
    let (neighbours, count) = from.cardinals();
    neighbours[..usize::from(count)]
        .iter()
        .copied()
        .filter(|&to| rules::is_valid_adversary_move(level, actor, to))
        .collect()
}
