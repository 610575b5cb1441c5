//! Server messages and the shapes nested inside them.

use serde::{Deserialize, Serialize};

use crate::game::{Actor, ActorKind, Coord, GameState};

/// A bare-string request for client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prompt {
    /// Ask for the player's name.
    Name,
    /// Ask for the player's next move.
    Move,
}

/// Everything the server sends besides prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// First message on a new connection.
    Welcome {
        /// Free-form server description.
        info: String,
    },
    /// A level begins.
    StartLevel {
        /// One-based level number.
        level: usize,
        /// Names of the characters on the level.
        players: Vec<String>,
    },
    /// The outcome of the recipient's move.
    MoveResult {
        /// Classification of the move.
        result: MoveOutcome,
        /// The move that was attempted.
        #[serde(rename = "move")]
        mv: PlayerMove,
        /// The mover.
        name: String,
        /// Why the move was rejected, if it was.
        error: Option<String>,
    },
    /// The recipient's view of the level.
    Update {
        /// Window layout: 0 block, 1 open, 2 door.
        layout: Vec<Vec<u8>>,
        /// The recipient's position, if still on the level.
        position: Option<Coord>,
        /// Key and exit inside the window.
        objects: Vec<ObjectInfo>,
        /// Other actors inside the window.
        actors: Vec<ActorInfo>,
        /// Optional note for the player.
        message: Option<String>,
    },
    /// A level ended.
    EndLevel {
        /// Who unlocked the exit.
        key: Option<String>,
        /// Who exited, in order.
        exits: Vec<String>,
        /// Who was caught, in order.
        ejects: Vec<String>,
    },
    /// The game ended.
    EndGame {
        /// Per-character totals, in registration order.
        scores: Vec<Score>,
        /// Did somebody make it out of the final level?
        won: bool,
    },
    /// The last client input could not be understood.
    Error {
        /// Description of the problem.
        error: String,
    },
}

/// Classification of a move, as reported in `move-result`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// A plain successful move.
    #[serde(rename = "OK")]
    Ok,
    /// The mover unlocked the exit.
    Key,
    /// The mover left through the exit.
    Exit,
    /// The mover was caught.
    Eject,
    /// The move was rejected.
    Invalid,
}

/// `{"type":"move","to":[y,x]|null}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "move")]
pub struct PlayerMove {
    /// Destination, or `None` to stay put.
    pub to: Option<Coord>,
}

/// Static objects a player can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    /// The level key.
    Key,
    /// The level exit.
    Exit,
}

/// An object inside a player's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// What it is.
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    /// Where it is.
    pub position: Coord,
}

/// Another actor inside a player's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorInfo {
    /// Player, zombie or ghost.
    #[serde(rename = "type")]
    pub kind: ActorKind,
    /// Where it stands.
    pub position: Coord,
}

/// End-of-game totals for one character.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    /// Character name.
    pub name: String,
    /// Levels exited.
    pub exits: u32,
    /// Keys collected.
    pub keys: u32,
    /// Times caught.
    pub ejects: u32,
}

impl ServerMessage {
    /// Build the `update` a character sees: the layout of its surroundings
    /// plus the objects and other actors inside that window.
    #[must_use]
    pub fn update(state: &GameState, recipient: &Actor, radius: u16, message: Option<String>) -> Self {
        let level = state.level();
        let Some(center) = level.locate(recipient) else {
            return ServerMessage::Update {
                layout: Vec::new(),
                position: None,
                objects: Vec::new(),
                actors: Vec::new(),
                message,
            };
        };

        let layout = state
            .get_character_surroundings(recipient, radius)
            .unwrap_or_default()
            .iter()
            .map(|row| row.iter().map(crate::game::Tile::layout_code).collect())
            .collect();

        let visible = |at: Coord| at.chebyshev(center) <= u32::from(radius);
        let objects = [(ObjectKind::Key, level.key()), (ObjectKind::Exit, level.exit())]
            .into_iter()
            .filter(|&(_, position)| visible(position))
            .map(|(kind, position)| ObjectInfo { kind, position })
            .collect();
        let actors = level
            .actors()
            .filter(|&(actor, position)| actor != recipient && visible(position))
            .map(|(actor, position)| ActorInfo {
                kind: actor.kind,
                position,
            })
            .collect();

        ServerMessage::Update {
            layout,
            position: Some(center),
            objects,
            actors,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::level::tests::two_room_level;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    #[test]
    fn test_start_level_shape() {
        let message = ServerMessage::StartLevel {
            level: 1,
            players: vec!["ann".into()],
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"type": "start-level", "level": 1, "players": ["ann"]})
        );
    }

    #[test]
    fn test_move_result_shape() {
        let message = ServerMessage::MoveResult {
            result: MoveOutcome::Ok,
            mv: PlayerMove {
                to: Some(Coord::new(3, 1)),
            },
            name: "ann".into(),
            error: None,
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "type": "move-result",
                "result": "OK",
                "move": {"type": "move", "to": [1, 3]},
                "name": "ann",
                "error": null
            })
        );
    }

    #[test]
    fn test_end_game_shape() {
        let message = ServerMessage::EndGame {
            scores: vec![Score {
                name: "ann".into(),
                exits: 2,
                keys: 1,
                ejects: 0,
            }],
            won: true,
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "type": "end-game",
                "scores": [{"name": "ann", "exits": 2, "keys": 1, "ejects": 0}],
                "won": true
            })
        );
    }

    #[test]
    fn test_prompts_are_bare_strings() {
        assert_eq!(serde_json::to_string(&Prompt::Move).unwrap(), "\"move\"");
        assert_eq!(serde_json::to_string(&Prompt::Name).unwrap(), "\"name\"");
    }

    #[test]
    fn test_update_lists_visible_things_only() {
        let mut level = two_room_level();
        let ann = Actor::character("ann");
        let bob = Actor::character("bob");
        let zombie = Actor::new(ActorKind::Zombie, "z");
        level.place(ann.clone(), Coord::new(11, 1)).unwrap();
        level.place(bob, Coord::new(1, 1)).unwrap();
        level.place(zombie, Coord::new(13, 1)).unwrap();
        let state = GameState::from_level(level, [], ChaCha8Rng::seed_from_u64(0)).unwrap();

        let ServerMessage::Update {
            layout,
            position,
            objects,
            actors,
            ..
        } = ServerMessage::update(&state, &ann, 2, None)
        else {
            panic!("expected an update");
        };

        assert_eq!(position, Some(Coord::new(11, 1)));
        assert_eq!(layout.len(), 5);
        assert_eq!(layout[2], vec![1, 2, 1, 1, 1]);
        assert_eq!(
            objects,
            vec![
                ObjectInfo {
                    kind: ObjectKind::Key,
                    position: Coord::new(12, 2)
                },
                ObjectInfo {
                    kind: ObjectKind::Exit,
                    position: Coord::new(13, 3)
                },
            ]
        );
        assert_eq!(
            actors,
            vec![ActorInfo {
                kind: ActorKind::Zombie,
                position: Coord::new(13, 1)
            }]
        );
    }
}
