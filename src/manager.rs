//! Game orchestration.
//!
//! The [`GameManager`] owns the game state, the turn order and the adversary
//! controllers. Each call to [`GameManager::play_turn`] runs exactly one
//! actor's turn:
//!
//! 1. Pull the next actor from the turn order.
//! 2. Obtain its move, from its [`Enemy`] or from its [`Player`].
//! 3. Validate and apply the move, classify the result, tell the mover.
//! 4. Drop whoever left the level from the turn order.
//! 5. Send every active character its surroundings; notify observers.
//! 6. End the level or the game when nobody is left.

mod config;
mod observer;
mod player;
mod stats;

pub use config::GameConfig;
pub use observer::{Observer, TextObserver};
pub use player::{LinePlayer, Player};
pub use stats::Scoreboard;

use std::collections::{BTreeMap, BTreeSet};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::enemy::{Enemy, NameGenerator};
use crate::error::{GameError, PlayerError, StateError};
use crate::game::{Actor, ActorKind, Coord, GameState, Level, TurnOrder, rules};
use crate::protocol::{MoveOutcome, PlayerMove, Score, ServerMessage};

/// Where the game is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Players may still register.
    NotStarted,
    /// Turns are being played.
    Running,
    /// The game has ended.
    GameOver,
}

/// Final result of a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    /// Per-character totals, in registration order.
    pub scores: Vec<Score>,
    /// Did somebody get out of the final level?
    pub won: bool,
    /// Levels finished, including the last one played.
    pub levels_played: usize,
    /// Actor turns taken.
    pub turns: u64,
}

/// Level-local counters captured before a move, used to classify it.
#[derive(Debug, Clone, Copy)]
struct Snapshot {
    ejected: usize,
    completed: usize,
    unlocked: bool,
}

impl Snapshot {
    fn of(level: &Level) -> Self {
        Self {
            ejected: level.ejected().len(),
            completed: level.completed().len(),
            unlocked: level.is_exit_unlocked(),
        }
    }
}

/// Runs a game from registration to the end-game message.
pub struct GameManager {
    config: GameConfig,
    players: Vec<Box<dyn Player>>,
    observers: Vec<Box<dyn Observer>>,
    names: NameGenerator,
    scoreboard: Scoreboard,
    phase: Phase,
    state: Option<GameState>,
    turns: TurnOrder<Actor>,
    enemies: BTreeMap<Actor, Enemy>,
    /// Players whose connection failed; they take no further turns.
    forfeited: BTreeSet<String>,
    turn_count: u64,
    won: bool,
}

impl std::fmt::Debug for GameManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameManager")
            .field("config", &self.config)
            .field("players", &self.players.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("phase", &self.phase)
            .field("turn_count", &self.turn_count)
            .finish_non_exhaustive()
    }
}

impl GameManager {
    /// Create a manager with no players.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            players: Vec::new(),
            observers: Vec::new(),
            names: NameGenerator::new(),
            scoreboard: Scoreboard::default(),
            phase: Phase::NotStarted,
            state: None,
            turns: TurnOrder::new(),
            enemies: BTreeMap::new(),
            forfeited: BTreeSet::new(),
            turn_count: 0,
            won: false,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// The game state, once started.
    #[must_use]
    pub const fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Per-character totals so far.
    #[must_use]
    pub const fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    /// Actor turns taken so far.
    #[must_use]
    pub const fn turn_count(&self) -> u64 {
        self.turn_count
    }

    /// Is a name already registered?
    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.players.iter().any(|player| player.name() == name)
    }

    /// Register a player before the game starts.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Registration`] if the name is taken or empty or
    /// the game is full, and [`GameError::AlreadyStarted`] after
    /// [`GameManager::start_game`].
    pub fn register_player(&mut self, player: Box<dyn Player>) -> Result<(), GameError> {
        if self.phase != Phase::NotStarted {
            return Err(GameError::AlreadyStarted);
        }
        let name = player.name().to_owned();
        let reason = if name.is_empty() {
            Some("name cannot be empty")
        } else if self.is_registered(&name) {
            Some("name already taken")
        } else if self.players.len() >= self.config.max_players {
            Some("the game is full")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(GameError::Registration {
                name,
                reason: reason.to_owned(),
            });
        }

        log::info!("registered player {name}");
        self.scoreboard.register(&name);
        self.players.push(player);
        Ok(())
    }

    /// Add an observer.
    pub fn add_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Place the registered players on the first level and begin.
    ///
    /// # Errors
    ///
    /// Returns an error if the game already started or the players cannot be
    /// placed.
    pub fn start_game(&mut self, first: Level, upcoming: Vec<Level>) -> Result<(), GameError> {
        if self.phase != Phase::NotStarted {
            return Err(GameError::AlreadyStarted);
        }
        let rng = self
            .config
            .seed
            .map_or_else(ChaCha8Rng::from_entropy, ChaCha8Rng::seed_from_u64);
        let roster: Vec<Actor> = self
            .players
            .iter()
            .map(|player| Actor::character(player.name()))
            .collect();

        self.state = Some(GameState::new(first, upcoming, roster, rng)?);
        self.phase = Phase::Running;
        log::info!("game started with {} players", self.players.len());
        self.begin_level()
    }

    /// Play turns until the game ends.
    ///
    /// # Errors
    ///
    /// Returns an error on a logic error, which aborts the game.
    pub fn run(&mut self) -> Result<GameOutcome, GameError> {
        while self.phase == Phase::Running {
            self.play_turn()?;
        }
        self.outcome()
    }

    /// The final result.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotStarted`] before the game ends.
    pub fn outcome(&self) -> Result<GameOutcome, GameError> {
        let state = self.state.as_ref().ok_or(GameError::NotStarted)?;
        if self.phase != Phase::GameOver {
            return Err(GameError::NotStarted);
        }
        Ok(GameOutcome {
            scores: self.scoreboard.scores().to_vec(),
            won: self.won,
            levels_played: state.level_number(),
            turns: self.turn_count,
        })
    }

    /// Run one actor's turn.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotStarted`] before [`GameManager::start_game`],
    /// or a logic error from the turn order or a strategy.
    pub fn play_turn(&mut self) -> Result<(), GameError> {
        match self.phase {
            Phase::NotStarted => return Err(GameError::NotStarted),
            Phase::GameOver => return Ok(()),
            Phase::Running => {}
        }

        let actor = self.turns.next()?.clone();
        if actor.is_adversary() {
            self.adversary_turn(&actor)?;
        } else {
            self.player_turn(&actor);
        }
        self.turn_count += 1;

        self.sync_turn_order()?;
        self.broadcast_updates(None);
        self.notify_observers();
        self.check_progress()
    }

    fn state_mut(&mut self) -> Result<&mut GameState, GameError> {
        self.state.as_mut().ok_or(GameError::NotStarted)
    }

    fn state_ref(&self) -> Result<&GameState, GameError> {
        self.state.as_ref().ok_or(GameError::NotStarted)
    }

    /// Spawn adversaries, rebuild the turn order and announce the level.
    fn begin_level(&mut self) -> Result<(), GameError> {
        let level_number = self.state_ref()?.level_number();

        if self.config.spawn_adversaries {
            let (zombies, ghosts) = GameConfig::adversaries_for_level(level_number);
            let kinds = std::iter::repeat_n(ActorKind::Zombie, zombies)
                .chain(std::iter::repeat_n(ActorKind::Ghost, ghosts));
            for kind in kinds {
                let adversary = self.names.next_actor(kind);
                match self.state_mut()?.spawn_adversary(adversary.clone()) {
                    Ok(at) => log::debug!("spawned {adversary} at {at}"),
                    Err(e) => log::warn!("could not spawn {adversary}: {e}"),
                }
            }
        }

        let state = self.state_ref()?;
        let characters: Vec<Actor> = self
            .players
            .iter()
            .map(|player| Actor::character(player.name()))
            .filter(|actor| state.level().locate(actor).is_some())
            .collect();
        let adversaries: Vec<Actor> = state
            .level()
            .adversaries()
            .map(|(actor, _)| actor.clone())
            .collect();

        self.enemies = adversaries
            .iter()
            .map(|actor| (actor.clone(), Enemy::new(actor.clone())))
            .collect();
        self.turns = characters.iter().chain(&adversaries).cloned().collect();

        log::info!(
            "level {level_number} begins with {} characters and {} adversaries",
            characters.len(),
            adversaries.len()
        );
        let start = ServerMessage::StartLevel {
            level: level_number,
            players: characters.iter().map(|actor| actor.name.clone()).collect(),
        };
        for name in characters.iter().map(|actor| actor.name.clone()) {
            self.send_to(&name, &start);
        }

        self.broadcast_updates(Some(format!("Level {level_number}")));
        self.notify_observers();
        Ok(())
    }

    fn adversary_turn(&mut self, actor: &Actor) -> Result<(), GameError> {
        let state = self.state.as_mut().ok_or(GameError::NotStarted)?;
        let Some(at) = state.level().locate(actor) else {
            return Ok(());
        };
        let Some(enemy) = self.enemies.get_mut(actor) else {
            return Ok(());
        };

        enemy.notify(state.level(), at);
        let Some(to) = enemy.choose_move(state.rng_mut())? else {
            log::debug!("{actor} passes");
            return Ok(());
        };

        let before = Snapshot::of(state.level());
        match state.apply_move(actor, to) {
            Ok(()) => {
                log::debug!("{actor} moved to {to}");
                self.record_stats(before);
            }
            Err(e) => log::warn!("{actor} skipped its turn: {e}"),
        }
        Ok(())
    }

    fn player_turn(&mut self, actor: &Actor) {
        let name = actor.name.as_str();
        if self.forfeited.contains(name) {
            return;
        }

        for _ in 0..self.config.max_move_attempts {
            let Some(player) = self.players.iter_mut().find(|player| player.name() == name) else {
                return;
            };
            let to = match player.request_move() {
                Ok(to) => to,
                Err(PlayerError::Protocol(e)) => {
                    log::warn!("{name} sent a malformed move: {e}");
                    self.send_to(name, &ServerMessage::Error { error: e.to_string() });
                    continue;
                }
                Err(PlayerError::Disconnected(_)) => {
                    self.forfeit(name);
                    return;
                }
            };

            let Some(to) = to else {
                log::debug!("{name} skips");
                self.send_move_result(name, MoveOutcome::Ok, None, None);
                return;
            };

            let Some(state) = self.state.as_mut() else {
                return;
            };
            let before = Snapshot::of(state.level());
            match state.apply_move(actor, to) {
                Ok(()) => {
                    log::debug!("{name} moved to {to}");
                    let outcome = classify(state.level(), actor, before);
                    self.record_stats(before);
                    self.send_move_result(name, outcome, Some(to), None);
                    return;
                }
                Err(e) => {
                    self.send_move_result(name, MoveOutcome::Invalid, Some(to), Some(e.to_string()));
                }
            }
        }
        log::warn!("{name} lost the turn after {} invalid moves", self.config.max_move_attempts);
    }

    fn send_move_result(&mut self, name: &str, result: MoveOutcome, to: Option<Coord>, error: Option<String>) {
        let message = ServerMessage::MoveResult {
            result,
            mv: PlayerMove { to },
            name: name.to_owned(),
            error,
        };
        self.send_to(name, &message);
    }

    /// Deliver a message; a failed send forfeits the player.
    fn send_to(&mut self, name: &str, message: &ServerMessage) {
        if self.forfeited.contains(name) {
            return;
        }
        let Some(player) = self.players.iter_mut().find(|player| player.name() == name) else {
            return;
        };
        if let Err(e) = player.send(message) {
            log::warn!("cannot reach {name}: {e}");
            self.forfeit(name);
        }
    }

    /// Stop asking a disconnected player for moves and take its character
    /// off the level.
    fn forfeit(&mut self, name: &str) {
        log::warn!("{name} disconnected and forfeits the game");
        self.forfeited.insert(name.to_owned());
        if let Some(state) = self.state.as_mut() {
            state.remove_actor(&Actor::character(name));
        }
    }

    /// Credit keys, exits and ejections that happened since the snapshot.
    fn record_stats(&mut self, before: Snapshot) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let level = state.level();
        if !before.unlocked
            && let Some(unlocker) = level.unlocked_by()
        {
            self.scoreboard.record_key(&unlocker.name);
        }
        for actor in &level.completed()[before.completed..] {
            self.scoreboard.record_exit(&actor.name);
        }
        for actor in &level.ejected()[before.ejected..] {
            self.scoreboard.record_eject(&actor.name);
        }
    }

    /// Remove everyone no longer on the level from the turn order.
    fn sync_turn_order(&mut self) -> Result<(), GameError> {
        let state = self.state_ref()?;
        let gone: Vec<Actor> = self
            .turns
            .iter()
            .filter(|actor| state.level().locate(actor).is_none())
            .cloned()
            .collect();
        for actor in gone {
            self.turns.eject(&actor)?;
            self.enemies.remove(&actor);
        }
        Ok(())
    }

    /// Send each active character its surroundings and refresh every
    /// adversary's view.
    fn broadcast_updates(&mut self, message: Option<String>) {
        let Some(state) = self.state.as_ref() else {
            return;
        };
        let updates: Vec<(String, ServerMessage)> = state
            .level()
            .characters()
            .map(|(actor, _)| {
                (
                    actor.name.clone(),
                    ServerMessage::update(state, actor, self.config.view_radius, message.clone()),
                )
            })
            .collect();
        for (actor, enemy) in &mut self.enemies {
            if let Some(at) = state.level().locate(actor) {
                enemy.notify(state.level(), at);
            }
        }

        for (name, update) in updates {
            self.send_to(&name, &update);
        }
    }

    fn notify_observers(&mut self) {
        if let Some(state) = self.state.as_ref() {
            for observer in &mut self.observers {
                observer.observe(state, self.turn_count);
            }
        }
    }

    /// Move to the next level or end the game when the level is over, and
    /// call the game off after too many turns.
    fn check_progress(&mut self) -> Result<(), GameError> {
        let state = self.state_ref()?;
        if !rules::is_level_over(state.level()) {
            if self.turn_count >= self.config.max_turns {
                log::warn!("turn limit of {} reached", self.config.max_turns);
                self.finish(false);
            }
            return Ok(());
        }

        let level = state.level();
        let end = ServerMessage::EndLevel {
            key: level.unlocked_by().map(|actor| actor.name.clone()),
            exits: level.completed().iter().map(|actor| actor.name.clone()).collect(),
            ejects: level.ejected().iter().map(|actor| actor.name.clone()).collect(),
        };
        log::info!("level {} over", state.level_number());
        self.broadcast(&end);

        let state = self.state_ref()?;
        if rules::is_game_over(state) {
            let won = rules::did_players_win(state);
            self.finish(won);
            return Ok(());
        }

        let survivors: Vec<Actor> = state.level().completed().to_vec();
        let state = self.state_mut()?;
        state.next_level()?;
        state.admit_characters(&survivors)?;
        self.begin_level()
    }

    fn finish(&mut self, won: bool) {
        self.won = won;
        self.phase = Phase::GameOver;
        let end = ServerMessage::EndGame {
            scores: self.scoreboard.scores().to_vec(),
            won,
        };
        log::info!("game over after {} turns, won: {won}", self.turn_count);
        self.broadcast(&end);
    }

    /// Send a message to every registered player still connected.
    fn broadcast(&mut self, message: &ServerMessage) {
        let names: Vec<String> = self
            .players
            .iter()
            .map(|player| player.name().to_owned())
            .collect();
        for name in names {
            self.send_to(&name, message);
        }
    }
}

/// Classify a completed move by what changed on the level.
fn classify(level: &Level, mover: &Actor, before: Snapshot) -> MoveOutcome {
    if level.ejected()[before.ejected..].contains(mover) {
        MoveOutcome::Eject
    } else if level.completed()[before.completed..].contains(mover) {
        MoveOutcome::Exit
    } else if !before.unlocked && level.unlocked_by() == Some(mover) {
        MoveOutcome::Key
    } else {
        MoveOutcome::Ok
    }
}

/// Register players, play every level and return the result.
///
/// # Errors
///
/// Returns an error if there are no levels, registration fails, or the game
/// hits a logic error.
pub fn run_game(
    config: GameConfig,
    players: Vec<Box<dyn Player>>,
    observers: Vec<Box<dyn Observer>>,
    levels: Vec<Level>,
) -> Result<GameOutcome, GameError> {
    let mut levels = levels.into_iter();
    let first = levels.next().ok_or(GameError::State(StateError::NoLevelQueued))?;

    let mut manager = GameManager::new(config);
    for player in players {
        manager.register_player(player)?;
    }
    for observer in observers {
        manager.add_observer(observer);
    }
    manager.start_game(first, levels.collect())?;
    manager.run()
}
