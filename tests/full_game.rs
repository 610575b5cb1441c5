//! Complete games played by scripted players through the game manager.
//!
//! Run with: cargo test --release full_game

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use snarl::error::PlayerError;
use snarl::levels;
use snarl::manager::{GameConfig, GameManager, Observer, Phase, Player, TextObserver, run_game};
use snarl::protocol::{MoveOutcome, ServerMessage};
use snarl::{Coord, Level};

const KEY: Coord = Coord::new(5, 1);
const EXIT: Coord = Coord::new(5, 5);

/// One 7x7 room with an open 5x5 interior, the key top-right and the exit
/// bottom-right.
const ONE_ROOM: &str = r#"
{
  "type": "level",
  "rooms": [{
    "type": "room",
    "origin": [0, 0],
    "bounds": {"rows": 7, "columns": 7},
    "layout": [
      [0, 0, 0, 0, 0, 0, 0],
      [0, 1, 1, 1, 1, 1, 0],
      [0, 1, 1, 1, 1, 1, 0],
      [0, 1, 1, 1, 1, 1, 2],
      [0, 1, 1, 1, 1, 1, 0],
      [0, 1, 1, 1, 1, 1, 0],
      [0, 0, 0, 0, 0, 0, 0]
    ]
  }],
  "hallways": [],
  "objects": [
    {"type": "key", "position": [1, 5]},
    {"type": "exit", "position": [5, 5]}
  ]
}
"#;

fn levels(count: usize) -> Vec<Level> {
    let text = format!("{count}\n{}", ONE_ROOM.repeat(count));
    levels::parse_levels(&text).unwrap()
}

/// Walks the open interior toward the key on the levels it is assigned,
/// otherwise waits until somebody unlocks the exit and then heads there.
struct Bot {
    name: String,
    key_levels: Vec<usize>,
    unlocked: Rc<Cell<bool>>,
    inbox: Rc<RefCell<Vec<ServerMessage>>>,
    level: usize,
    position: Option<Coord>,
    others: Vec<Coord>,
}

impl Bot {
    fn new(name: &str, key_levels: Vec<usize>, unlocked: &Rc<Cell<bool>>) -> Self {
        Self {
            name: name.to_owned(),
            key_levels,
            unlocked: Rc::clone(unlocked),
            inbox: Rc::default(),
            level: 0,
            position: None,
            others: Vec::new(),
        }
    }
}

/// The interior tile within two steps of `from` that gets closest to `target`.
fn step(from: Coord, target: Coord, avoid: &[Coord]) -> Coord {
    (1..=5)
        .flat_map(|y| (1..=5).map(move |x| Coord::new(x, y)))
        .filter(|&to| from.manhattan(to) <= 2)
        .filter(|to| *to == from || !avoid.contains(to))
        .min_by_key(|&to| (to.manhattan(target), to.y, to.x))
        .unwrap_or(from)
}

impl Player for Bot {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_move(&mut self) -> Result<Option<Coord>, PlayerError> {
        let Some(at) = self.position else {
            return Ok(None);
        };
        let fetching = self.key_levels.contains(&self.level);
        let mut avoid = self.others.clone();
        let target = if self.unlocked.get() {
            EXIT
        } else if fetching {
            KEY
        } else {
            return Ok(None);
        };
        if !fetching {
            avoid.push(KEY);
        }
        Ok(Some(step(at, target, &avoid)))
    }

    fn send(&mut self, message: &ServerMessage) -> Result<(), PlayerError> {
        match message {
            ServerMessage::StartLevel { level, .. } => {
                self.level = *level;
                self.unlocked.set(false);
            }
            ServerMessage::Update { position, actors, .. } => {
                self.position = *position;
                self.others = actors.iter().map(|actor| actor.position).collect();
            }
            ServerMessage::MoveResult {
                result: MoveOutcome::Key,
                ..
            } => self.unlocked.set(true),
            _ => {}
        }
        self.inbox.borrow_mut().push(message.clone());
        Ok(())
    }
}

/// Never moves.
struct Idler(&'static str);

impl Player for Idler {
    fn name(&self) -> &str {
        self.0
    }

    fn request_move(&mut self) -> Result<Option<Coord>, PlayerError> {
        Ok(None)
    }

    fn send(&mut self, _message: &ServerMessage) -> Result<(), PlayerError> {
        Ok(())
    }
}

fn quiet_config(seed: u64) -> GameConfig {
    GameConfig {
        spawn_adversaries: false,
        max_turns: 1_000,
        seed: Some(seed),
        ..GameConfig::default()
    }
}

#[test]
fn test_two_levels_end_game_statistics() {
    for seed in [1, 7, 42] {
        let unlocked = Rc::new(Cell::new(false));
        let ann = Bot::new("ann", vec![1], &unlocked);
        let bob = Bot::new("bob", vec![2], &unlocked);
        let ann_inbox = Rc::clone(&ann.inbox);

        let outcome = run_game(
            quiet_config(seed),
            vec![Box::new(ann), Box::new(bob)],
            Vec::new(),
            levels(2),
        )
        .unwrap();

        assert!(outcome.won);
        assert_eq!(outcome.levels_played, 2);
        let score = |name: &str| outcome.scores.iter().find(|s| s.name == name).unwrap().clone();
        let ann = score("ann");
        assert_eq!((ann.exits, ann.keys, ann.ejects), (2, 1, 0));
        let bob = score("bob");
        assert_eq!((bob.exits, bob.keys, bob.ejects), (2, 1, 0));

        let inbox = ann_inbox.borrow();
        let starts = inbox
            .iter()
            .filter(|m| matches!(m, ServerMessage::StartLevel { .. }))
            .count();
        assert_eq!(starts, 2);
        let Some(ServerMessage::EndGame { scores, won }) = inbox.last() else {
            panic!("last message was not end-game: {:?}", inbox.last());
        };
        assert!(*won);
        assert_eq!(scores, &outcome.scores);
    }
}

#[test]
fn test_end_level_reports_key_and_exits() {
    let unlocked = Rc::new(Cell::new(false));
    let ann = Bot::new("ann", vec![1], &unlocked);
    let inbox = Rc::clone(&ann.inbox);

    run_game(quiet_config(3), vec![Box::new(ann)], Vec::new(), levels(1)).unwrap();

    let inbox = inbox.borrow();
    let end = inbox
        .iter()
        .find(|m| matches!(m, ServerMessage::EndLevel { .. }))
        .unwrap();
    assert_eq!(
        end,
        &ServerMessage::EndLevel {
            key: Some("ann".into()),
            exits: vec!["ann".into()],
            ejects: vec![],
        }
    );
    assert!(inbox.iter().any(|m| matches!(
        m,
        ServerMessage::MoveResult {
            result: MoveOutcome::Exit,
            ..
        }
    )));
}

#[test]
fn test_idle_players_are_caught_or_time_out() {
    let config = GameConfig {
        max_turns: 500,
        seed: Some(9),
        ..GameConfig::default()
    };
    let mut manager = GameManager::new(config);
    manager.register_player(Box::new(Idler("ann"))).unwrap();
    manager.register_player(Box::new(Idler("bob"))).unwrap();
    let mut all = levels(2).into_iter();
    manager.start_game(all.next().unwrap(), all.collect()).unwrap();
    assert_eq!(manager.phase(), Phase::Running);

    let outcome = manager.run().unwrap();
    assert_eq!(manager.phase(), Phase::GameOver);
    assert!(!outcome.won);
    assert!(outcome.turns <= 500);
    assert!(outcome.scores.iter().all(|s| s.exits == 0 && s.keys == 0));
}

#[test]
fn test_registration_rules() {
    let mut manager = GameManager::new(quiet_config(0));
    manager.register_player(Box::new(Idler("ann"))).unwrap();
    assert!(manager.register_player(Box::new(Idler("ann"))).is_err());
    assert!(manager.register_player(Box::new(Idler(""))).is_err());
    for name in ["b", "c", "d"] {
        manager.register_player(Box::new(Idler(name))).unwrap();
    }
    assert!(manager.register_player(Box::new(Idler("e"))).is_err());
    assert!(manager.play_turn().is_err());
}

#[test]
fn test_observer_sees_every_turn() {
    struct Counter(Rc<Cell<u64>>);
    impl Observer for Counter {
        fn observe(&mut self, _state: &snarl::GameState, turn: u64) {
            self.0.set(turn);
        }
    }

    let seen = Rc::new(Cell::new(0));
    let unlocked = Rc::new(Cell::new(false));
    let observers: Vec<Box<dyn Observer>> = vec![
        Box::new(Counter(Rc::clone(&seen))),
        Box::new(TextObserver::new(std::io::sink())),
    ];
    let outcome = run_game(
        quiet_config(5),
        vec![Box::new(Bot::new("ann", vec![1], &unlocked))],
        observers,
        levels(1),
    )
    .unwrap();
    assert_eq!(seen.get(), outcome.turns);
}
