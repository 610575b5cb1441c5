//! TCP sessions.
//!
//! A [`Server`] binds a listener, waits a bounded time for clients, performs
//! the name handshake with each one, then hands the [`RemotePlayer`]s to a
//! [`GameManager`](crate::manager::GameManager) and plays the game on the
//! calling thread.

mod remote;

pub use remote::RemotePlayer;

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{GameError, PlayerError, SessionError, StateError};
use crate::game::Level;
use crate::manager::{self, GameConfig, GameOutcome, Observer, Player, TextObserver};

/// How often the accept loop checks for new connections.
const ACCEPT_POLL: Duration = Duration::from_millis(25);

/// Configuration for a network session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind.
    pub address: String,
    /// Port to bind; `0` picks a free one.
    pub port: u16,
    /// Number of clients to wait for.
    pub clients: usize,
    /// How long to wait for clients before starting with whoever joined.
    pub wait: Duration,
    /// Print the level to stdout after every turn.
    pub observe: bool,
    /// Settings for the game itself.
    pub game: GameConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_owned(),
            port: 45678,
            clients: 4,
            wait: Duration::from_secs(60),
            observe: false,
            game: GameConfig::default(),
        }
    }
}

/// A bound game server.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    /// Bind the listener.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub fn bind(config: ServerConfig) -> Result<Self, SessionError> {
        let listener = TcpListener::bind((config.address.as_str(), config.port))?;
        log::info!("listening on {}", listener.local_addr()?);
        Ok(Self { listener, config })
    }

    /// The address actually bound.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot report its address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Session settings.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Accept clients until enough have registered or the wait runs out.
    ///
    /// A client that disconnects during the handshake is dropped and does
    /// not count.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails.
    pub fn accept_players(&self) -> Result<Vec<RemotePlayer>, SessionError> {
        let wanted = self.config.clients.min(self.config.game.max_players);
        let deadline = Instant::now() + self.config.wait;
        let info = format!("snarl {}", env!("CARGO_PKG_VERSION"));
        self.listener.set_nonblocking(true)?;

        let mut players: Vec<RemotePlayer> = Vec::with_capacity(wanted);
        while players.len() < wanted {
            match self.listener.accept() {
                Ok((stream, peer)) => {
                    log::info!("connection from {peer}");
                    match greet(stream, &info, &players) {
                        Ok(player) => {
                            log::info!("{} joined ({}/{wanted})", player.name(), players.len() + 1);
                            players.push(player);
                        }
                        Err(e) => log::warn!("handshake with {peer} failed: {e}"),
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        log::info!("stopped waiting with {} of {wanted} players", players.len());
                        break;
                    }
                    thread::sleep(ACCEPT_POLL);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(players)
    }

    /// Accept clients and play the levels with them.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no levels, nobody joins, the listener
    /// fails, or the game hits a logic error.
    pub fn run(self, levels: Vec<Level>) -> Result<GameOutcome, SessionError> {
        if levels.is_empty() {
            return Err(GameError::State(StateError::NoLevelQueued).into());
        }
        let players = self.accept_players()?;
        if players.is_empty() {
            return Err(SessionError::NoPlayers(self.config.wait));
        }

        let players: Vec<Box<dyn Player>> = players
            .into_iter()
            .map(|player| Box::new(player) as Box<dyn Player>)
            .collect();
        let mut observers: Vec<Box<dyn Observer>> = Vec::new();
        if self.config.observe {
            observers.push(Box::new(TextObserver::new(io::stdout())));
        }

        let outcome = manager::run_game(self.config.game, players, observers, levels)?;
        log::info!("session finished after {} turns", outcome.turns);
        Ok(outcome)
    }
}

fn greet(stream: TcpStream, info: &str, joined: &[RemotePlayer]) -> Result<RemotePlayer, PlayerError> {
    let gone = |e: io::Error| {
        log::debug!("cannot set up connection: {e}");
        PlayerError::Disconnected(String::new())
    };
    stream.set_nonblocking(false).map_err(gone)?;
    let mut player = RemotePlayer::connect(stream).map_err(gone)?;
    player.handshake(info, |name| joined.iter().any(|other| other.name() == name))?;
    Ok(player)
}
