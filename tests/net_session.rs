//! A real TCP session against a server bound to an ephemeral port.
//!
//! Run with: cargo test net_session

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;
use std::thread;
use std::time::Duration;

use serde_json::Value;

use snarl::manager::GameConfig;
use snarl::net::{Server, ServerConfig};

const LEVELS: &str = r#"1
{
  "type": "level",
  "rooms": [{
    "type": "room",
    "origin": [0, 0],
    "bounds": {"rows": 5, "columns": 5},
    "layout": [
      [0, 0, 0, 0, 0],
      [0, 1, 1, 1, 2],
      [0, 1, 1, 1, 0],
      [0, 1, 1, 1, 0],
      [0, 0, 0, 0, 0]
    ]
  }],
  "hallways": [],
  "objects": [
    {"type": "key", "position": [1, 3]},
    {"type": "exit", "position": [3, 3]}
  ]
}"#;

struct Client {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Client {
    fn connect(addr: std::net::SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
        Self {
            reader: BufReader::new(stream.try_clone().unwrap()),
            writer: stream,
        }
    }

    fn recv(&mut self) -> Value {
        let mut line = String::new();
        assert_ne!(self.reader.read_line(&mut line).unwrap(), 0, "server hung up");
        serde_json::from_str(&line).unwrap()
    }

    fn send(&mut self, line: &str) {
        writeln!(self.writer, "{line}").unwrap();
    }
}

fn server() -> Server {
    let config = ServerConfig {
        port: 0,
        clients: 1,
        wait: Duration::from_secs(10),
        game: GameConfig {
            spawn_adversaries: false,
            seed: Some(17),
            ..GameConfig::default()
        },
        ..ServerConfig::default()
    };
    Server::bind(config).unwrap()
}

#[test]
fn test_session_handshake_invalid_move_and_disconnect() {
    let server = server();
    let addr = server.local_addr().unwrap();
    let levels = snarl::levels::parse_levels(LEVELS).unwrap();
    let handle = thread::spawn(move || server.run(levels));

    let mut client = Client::connect(addr);
    assert_eq!(client.recv()["type"], "welcome");
    assert_eq!(client.recv(), "name");
    client.send("\"ann\"");

    let start = client.recv();
    assert_eq!(start["type"], "start-level");
    assert_eq!(start["level"], 1);
    assert_eq!(start["players"], serde_json::json!(["ann"]));

    let update = client.recv();
    assert_eq!(update["type"], "update");
    assert_eq!(update["layout"].as_array().unwrap().len(), 5);
    assert_eq!(update["message"], "Level 1");

    assert_eq!(client.recv(), "move");
    client.send("[0, 0]");
    let result = client.recv();
    assert_eq!(result["type"], "move-result");
    assert_eq!(result["result"], "Invalid");
    assert_eq!(result["move"]["to"], serde_json::json!([0, 0]));
    assert!(result["error"].is_string());

    assert_eq!(client.recv(), "move");
    client.send("not json at all");
    assert_eq!(client.recv()["type"], "error");

    assert_eq!(client.recv(), "move");
    drop(client);

    let outcome = handle.join().unwrap().unwrap();
    assert!(!outcome.won);
    assert_eq!(outcome.scores.len(), 1);
    assert_eq!(outcome.scores[0].name, "ann");
}

#[test]
fn test_session_plays_to_the_end() {
    let server = server();
    let addr = server.local_addr().unwrap();
    let levels = snarl::levels::parse_levels(LEVELS).unwrap();
    let handle = thread::spawn(move || server.run(levels));

    let mut client = Client::connect(addr);
    client.recv();
    client.recv();
    client.send("ann");

    // Head for the key at [1, 3], then the exit at [3, 3], one legal step
    // at a time, always through the open interior.
    let mut position = None;
    let mut target = [1u64, 3];
    let mut won = None;
    while won.is_none() {
        let message = client.recv();
        match message["type"].as_str() {
            Some("update") => {
                if let Some(at) = message["position"].as_array() {
                    position = Some([at[0].as_u64().unwrap(), at[1].as_u64().unwrap()]);
                }
            }
            Some("move-result") if message["result"] == "Key" => target = [3, 3],
            Some("end-game") => won = message["won"].as_bool(),
            None if message == "move" => {
                let [row, col] = position.unwrap();
                let next = if row == target[0] {
                    [row, step(col, target[1])]
                } else {
                    [step(row, target[0]), col]
                };
                client.send(&serde_json::to_string(&next).unwrap());
            }
            _ => {}
        }
    }

    assert_eq!(won, Some(true));
    let outcome = handle.join().unwrap().unwrap();
    assert!(outcome.won);
    let score = &outcome.scores[0];
    assert_eq!((score.exits, score.keys, score.ejects), (1, 1, 0));
}

/// One cell toward `to`.
fn step(from: u64, to: u64) -> u64 {
    match from.cmp(&to) {
        std::cmp::Ordering::Less => from + 1,
        std::cmp::Ordering::Greater => from - 1,
        std::cmp::Ordering::Equal => from,
    }
}
