//! Wire protocol.
//!
//! The server and its clients exchange newline-delimited JSON. The server
//! sends [`ServerMessage`]s and bare-string [`Prompt`]s; clients answer
//! prompts with a name or a move.
//!
//! # Session
//!
//! ```text
//! server                               client
//! {"type":"welcome",...}   ───────►
//! "name"                   ───────►
//!                          ◄───────    "ann"
//! {"type":"start-level",...} ─────►
//! {"type":"update",...}    ───────►
//! "move"                   ───────►
//!                          ◄───────    [3, 4]
//! {"type":"move-result",...} ─────►
//! ...
//! {"type":"end-game",...}  ───────►
//! ```

mod codec;
mod message;

pub use codec::{parse_move, parse_name, read_line, write_line};
pub use message::{
    ActorInfo, MoveOutcome, ObjectInfo, ObjectKind, PlayerMove, Prompt, Score, ServerMessage,
};
