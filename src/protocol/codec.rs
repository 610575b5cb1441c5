//! Newline-delimited JSON framing.
//!
//! Every value travels as a single line of JSON in both directions. Client
//! replies are parsed leniently: a move may be `[y, x]`, a full
//! `{"type":"move","to":...}` object, `null`, `"skip"` or a bare `skip`.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;
use crate::game::Coord;
use crate::protocol::PlayerMove;

/// Write one value as a line of JSON and flush.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_line<W: Write + ?Sized, T: Serialize + ?Sized>(writer: &mut W, value: &T) -> Result<(), ProtocolError> {
    let mut line = serde_json::to_vec(value)?;
    line.push(b'\n');
    writer.write_all(&line)?;
    writer.flush()?;
    Ok(())
}

/// Read one line, without its terminator. `None` at end of stream.
///
/// # Errors
///
/// Returns an error if the read fails.
pub fn read_line<R: BufRead + ?Sized>(reader: &mut R) -> Result<Option<String>, ProtocolError> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MoveReply {
    Position(Coord),
    Move(PlayerMove),
    Word(String),
    Pass(()),
}

/// Parse a client move reply. `None` means the player skips the turn.
///
/// # Errors
///
/// Returns [`ProtocolError::Malformed`] if the line is not a move.
pub fn parse_move(line: &str) -> Result<Option<Coord>, ProtocolError> {
    let text = line.trim();
    if text == "skip" {
        return Ok(None);
    }

    let malformed = |reason: String| ProtocolError::Malformed {
        line: line.to_owned(),
        reason,
    };
    match serde_json::from_str::<MoveReply>(text) {
        Ok(MoveReply::Position(to)) => Ok(Some(to)),
        Ok(MoveReply::Move(PlayerMove { to })) => Ok(to),
        Ok(MoveReply::Pass(())) => Ok(None),
        Ok(MoveReply::Word(word)) if word == "skip" => Ok(None),
        Ok(MoveReply::Word(word)) => Err(malformed(format!("unknown command {word:?}"))),
        Err(_) => Err(malformed(
            "expected [row, column], null or \"skip\"".to_owned(),
        )),
    }
}

/// Parse a client name reply: a JSON string, or raw text.
///
/// # Errors
///
/// Returns [`ProtocolError::Malformed`] if the name is empty or is JSON
/// other than a string.
pub fn parse_name(line: &str) -> Result<String, ProtocolError> {
    let text = line.trim();
    let name = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(serde_json::Value::String(name)) => name.trim().to_owned(),
        Ok(_) => {
            return Err(ProtocolError::Malformed {
                line: line.to_owned(),
                reason: "a name must be a string".to_owned(),
            });
        }
        Err(_) => text.to_owned(),
    };

    if name.is_empty() {
        return Err(ProtocolError::Malformed {
            line: line.to_owned(),
            reason: "a name cannot be empty".to_owned(),
        });
    }
    Ok(name)
}
