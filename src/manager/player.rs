//! The player seam: anything that can choose a character's moves.

use std::io::{BufRead, Write};

use crate::error::PlayerError;
use crate::game::Coord;
use crate::protocol::{self, Prompt, ServerMessage};

/// A participant controlling one character.
pub trait Player {
    /// Name of the character this player controls.
    fn name(&self) -> &str;

    /// Ask for the next move. `Ok(None)` skips the turn.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Disconnected`] if the player went away, or
    /// [`PlayerError::Protocol`] if the reply was not a move.
    fn request_move(&mut self) -> Result<Option<Coord>, PlayerError>;

    /// Deliver a message.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerError::Disconnected`] if the player went away.
    fn send(&mut self, message: &ServerMessage) -> Result<(), PlayerError>;
}

/// A player speaking the wire protocol over any line-oriented stream pair,
/// such as stdin and stdout.
#[derive(Debug)]
pub struct LinePlayer<R, W> {
    name: String,
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePlayer<R, W> {
    /// Create a player with an already-known name.
    pub fn new(name: impl Into<String>, reader: R, writer: W) -> Self {
        Self {
            name: name.into(),
            reader,
            writer,
        }
    }

    /// Consume the player, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn disconnected(&self) -> PlayerError {
        PlayerError::Disconnected(self.name.clone())
    }
}

impl<R: BufRead, W: Write> Player for LinePlayer<R, W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn request_move(&mut self) -> Result<Option<Coord>, PlayerError> {
        protocol::write_line(&mut self.writer, &Prompt::Move).map_err(|_| self.disconnected())?;
        let line = protocol::read_line(&mut self.reader)
            .map_err(|_| self.disconnected())?
            .ok_or_else(|| self.disconnected())?;
        Ok(protocol::parse_move(&line)?)
    }

    fn send(&mut self, message: &ServerMessage) -> Result<(), PlayerError> {
        protocol::write_line(&mut self.writer, message).map_err(|_| self.disconnected())
    }
}
