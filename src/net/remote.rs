//! A player on the far end of a TCP connection.

use std::io::{self, BufReader};
use std::net::{Shutdown, TcpStream};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::error::PlayerError;
use crate::game::Coord;
use crate::manager::Player;
use crate::protocol::{self, Prompt, ServerMessage};

/// A connected client.
///
/// A dedicated thread performs the blocking reads and forwards each line
/// over a channel; the game loop only ever receives from that channel, so
/// it stays the sole owner of the game state.
#[derive(Debug)]
pub struct RemotePlayer {
    name: String,
    lines: Receiver<String>,
    writer: TcpStream,
}

impl RemotePlayer {
    /// Take over an accepted connection and start its reader thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the socket cannot be cloned or the thread cannot
    /// be spawned.
    pub fn connect(stream: TcpStream) -> io::Result<Self> {
        let peer = stream.peer_addr()?;
        let reader = BufReader::new(stream.try_clone()?);
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name(format!("reader-{peer}"))
            .spawn(move || forward_lines(reader, &tx))?;
        Ok(Self {
            name: String::new(),
            lines: rx,
            writer: stream,
        })
    }

    /// Greet the client and ask for a name until it sends one that is
    /// non-empty and not `taken`.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Disconnected`] if the client goes away first.
    pub fn handshake(&mut self, info: &str, taken: impl Fn(&str) -> bool) -> Result<&str, PlayerError> {
        self.send(&ServerMessage::Welcome { info: info.to_owned() })?;
        loop {
            self.write(&Prompt::Name)?;
            let line = self.recv()?;
            let error = match protocol::parse_name(&line) {
                Ok(name) if taken(&name) => format!("name {name:?} is already taken"),
                Ok(name) => {
                    self.name = name;
                    return Ok(&self.name);
                }
                Err(e) => e.to_string(),
            };
            log::debug!("rejected name: {error}");
            self.send(&ServerMessage::Error { error })?;
        }
    }

    fn disconnected(&self) -> PlayerError {
        PlayerError::Disconnected(self.name.clone())
    }

    fn recv(&self) -> Result<String, PlayerError> {
        self.lines.recv().map_err(|_| self.disconnected())
    }

    fn write<T: serde::Serialize>(&mut self, value: &T) -> Result<(), PlayerError> {
        protocol::write_line(&mut self.writer, value).map_err(|_| self.disconnected())
    }
}

impl Player for RemotePlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_move(&mut self) -> Result<Option<Coord>, PlayerError> {
        self.write(&Prompt::Move)?;
        let line = self.recv()?;
        Ok(protocol::parse_move(&line)?)
    }

    fn send(&mut self, message: &ServerMessage) -> Result<(), PlayerError> {
        self.write(message)
    }
}

impl Drop for RemotePlayer {
    fn drop(&mut self) {
        // Unblocks the reader thread.
        let _ = self.writer.shutdown(Shutdown::Both);
    }
}

fn forward_lines(mut reader: BufReader<TcpStream>, tx: &Sender<String>) {
    loop {
        match protocol::read_line(&mut reader) {
            Ok(Some(line)) => {
                if tx.send(line).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                log::debug!("read failed: {e}");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, Write};
    use std::net::TcpListener;

    fn pair() -> (RemotePlayer, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        let (server, _) = listener.accept().unwrap();
        (RemotePlayer::connect(server).unwrap(), client)
    }

    fn read_all(client: TcpStream) -> Vec<String> {
        BufReader::new(client).lines().map(Result::unwrap).collect()
    }

    #[test]
    fn test_handshake_retries_bad_names() {
        let (mut player, mut client) = pair();
        client.write_all(b"\"\"\nbob\n\"ann\"\n").unwrap();

        let name = player.handshake("test", |name| name == "bob").unwrap().to_owned();
        assert_eq!(name, "ann");
        assert_eq!(player.name(), "ann");
        drop(player);

        let lines = read_all(client);
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("\"welcome\""));
        assert_eq!(lines[1], "\"name\"");
        assert!(lines[2].contains("\"error\""));
        assert_eq!(lines[3], "\"name\"");
        assert!(lines[4].contains("already taken"));
        assert_eq!(lines[5], "\"name\"");
    }

    #[test]
    fn test_request_move_over_socket() {
        let (mut player, mut client) = pair();
        client.write_all(b"[2, 3]\n").unwrap();
        assert_eq!(player.request_move().unwrap(), Some(Coord::new(3, 2)));

        drop(client);
        assert!(matches!(player.request_move(), Err(PlayerError::Disconnected(_))));
    }
}
