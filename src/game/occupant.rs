//! Everything that can stand on a tile.

use serde::{Deserialize, Serialize};

/// Orientation of a room wall segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallOrientation {
    /// Top or bottom edge of a room.
    Horizontal,
    /// Left or right edge of a room.
    Vertical,
}

/// The class of an actor. Wire names are `player`, `zombie` and `ghost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    /// A character controlled by a (possibly remote) player.
    Player,
    /// Wall-respecting adversary that stays inside its room.
    Zombie,
    /// Wall-ignoring adversary that teleports when it walks into a wall.
    Ghost,
}

impl ActorKind {
    /// Is this the character class?
    #[must_use]
    pub const fn is_character(self) -> bool {
        matches!(self, ActorKind::Player)
    }

    /// Is this one of the adversary classes?
    #[must_use]
    pub const fn is_adversary(self) -> bool {
        !self.is_character()
    }

    /// Glyph used by ASCII rendering.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            ActorKind::Player => 'P',
            ActorKind::Zombie => 'Z',
            ActorKind::Ghost => 'G',
        }
    }

    /// Lowercase name, matching the wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ActorKind::Player => "player",
            ActorKind::Zombie => "zombie",
            ActorKind::Ghost => "ghost",
        }
    }
}

/// A named character or adversary. Identity is kind + name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Actor {
    /// Class of the actor.
    pub kind: ActorKind,
    /// Name, unique within its kind.
    pub name: String,
}

impl Actor {
    /// Create a new actor.
    #[must_use]
    pub fn new(kind: ActorKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Create a player character.
    #[must_use]
    pub fn character(name: impl Into<String>) -> Self {
        Self::new(ActorKind::Player, name)
    }

    /// Is this a player character?
    #[must_use]
    pub const fn is_character(&self) -> bool {
        self.kind.is_character()
    }

    /// Is this an adversary?
    #[must_use]
    pub const fn is_adversary(&self) -> bool {
        self.kind.is_adversary()
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.name)
    }
}

/// Anything that can occupy a tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Occupant {
    /// Solid rock: the void between rooms and unopened room interior.
    Block,
    /// Room boundary. Blocks movement like [`Occupant::Block`].
    Wall(WallOrientation),
    /// Opening in a room boundary.
    Door,
    /// The level key; touching it unlocks the exit.
    Key,
    /// The level exit.
    Exit,
    /// A character or adversary.
    Actor(Actor),
}

impl Occupant {
    /// Does this occupant block movement?
    #[must_use]
    pub const fn is_blocking(&self) -> bool {
        matches!(self, Occupant::Block | Occupant::Wall(_))
    }

    /// The actor, if this occupant is one.
    #[must_use]
    pub const fn actor(&self) -> Option<&Actor> {
        match self {
            Occupant::Actor(actor) => Some(actor),
            _ => None,
        }
    }

    /// Glyph used by ASCII rendering.
    #[must_use]
    pub const fn render(&self) -> char {
        match self {
            Occupant::Block => 'X',
            Occupant::Wall(WallOrientation::Horizontal) => '-',
            Occupant::Wall(WallOrientation::Vertical) => '|',
            Occupant::Door => 'D',
            Occupant::Key => 'K',
            Occupant::Exit => 'E',
            Occupant::Actor(actor) => actor.kind.glyph(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_identity_is_kind_and_name() {
        let zombie = Actor::new(ActorKind::Zombie, "bob");
        let ghost = Actor::new(ActorKind::Ghost, "bob");
        assert_ne!(zombie, ghost);
        assert_eq!(zombie, Actor::new(ActorKind::Zombie, "bob"));
        assert!(Actor::character("bob").is_character());
        assert!(ghost.is_adversary());
    }

    #[test]
    fn test_blocking_occupants() {
        assert!(Occupant::Block.is_blocking());
        assert!(Occupant::Wall(WallOrientation::Horizontal).is_blocking());
        assert!(!Occupant::Door.is_blocking());
        assert!(!Occupant::Key.is_blocking());
        assert!(!Occupant::Actor(Actor::character("a")).is_blocking());
    }

    #[test]
    fn test_kind_wire_names() {
        assert_eq!(serde_json::to_string(&ActorKind::Ghost).unwrap(), "\"ghost\"");
        assert_eq!(ActorKind::Player.as_str(), "player");
    }
}
