//! Level documents.
//!
//! A levels file is a stream of whitespace-separated JSON values: the number
//! of levels, then that many level objects.
//!
//! ```text
//! 2
//! {"type": "level", "rooms": [...], "hallways": [...], "objects": [...]}
//! {"type": "level", ...}
//! ```
//!
//! Positions are `[row, column]`. A room layout is a `rows x columns` matrix
//! relative to the room origin where `2` marks a door, `1` an open tile and
//! `0` anything else.

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::LevelFileError;
use crate::game::{Coord, Hallway, Level, Room};
use crate::protocol::ObjectKind;

#[derive(Debug, Deserialize)]
struct LevelDoc {
    rooms: Vec<RoomDoc>,
    #[serde(default)]
    hallways: Vec<HallwayDoc>,
    objects: Vec<ObjectDoc>,
}

#[derive(Debug, Deserialize)]
struct RoomDoc {
    origin: Coord,
    bounds: Bounds,
    layout: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
struct Bounds {
    rows: u16,
    columns: u16,
}

#[derive(Debug, Deserialize)]
struct HallwayDoc {
    from: Coord,
    to: Coord,
    #[serde(default)]
    waypoints: Vec<Coord>,
}

#[derive(Debug, Deserialize)]
struct ObjectDoc {
    #[serde(rename = "type")]
    kind: ObjectKind,
    position: Coord,
}

impl RoomDoc {
    fn into_room(self, index: usize) -> Result<Room, LevelFileError> {
        let Bounds { rows, columns } = self.bounds;
        let origin = self.origin;
        let fits = self.layout.len() == usize::from(rows)
            && self.layout.iter().all(|row| row.len() == usize::from(columns));
        if !fits {
            return Err(LevelFileError::LayoutMismatch {
                index,
                origin,
                rows,
                columns,
            });
        }

        let mut doors = Vec::new();
        let mut open_tiles = Vec::new();
        for (dy, row) in (0..rows).zip(&self.layout) {
            for (dx, &cell) in (0..columns).zip(row) {
                let at = Coord::new(origin.x.saturating_add(dx), origin.y.saturating_add(dy));
                match cell {
                    0 => {}
                    1 => open_tiles.push(at),
                    2 => doors.push(at),
                    cell => return Err(LevelFileError::UnknownCell { index, cell, at }),
                }
            }
        }

        Room::new(origin, columns, rows, doors, open_tiles).map_err(|source| LevelFileError::Level { index, source })
    }
}

impl LevelDoc {
    fn into_level(self, index: usize) -> Result<Level, LevelFileError> {
        let key = single_object(&self.objects, ObjectKind::Key, index)?;
        let exit = single_object(&self.objects, ObjectKind::Exit, index)?;

        let rooms = self
            .rooms
            .into_iter()
            .map(|room| room.into_room(index))
            .collect::<Result<Vec<_>, _>>()?;
        let hallways = self
            .hallways
            .into_iter()
            .map(|hall| Hallway::new(hall.from, hall.to, hall.waypoints))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| LevelFileError::Level { index, source })?;

        Level::new(rooms, hallways, key, exit).map_err(|source| LevelFileError::Level { index, source })
    }
}

fn single_object(objects: &[ObjectDoc], kind: ObjectKind, index: usize) -> Result<Coord, LevelFileError> {
    let mut found = objects.iter().filter(|object| object.kind == kind);
    match (found.next(), found.count()) {
        (Some(object), 0) => Ok(object.position),
        (first, rest) => Err(LevelFileError::ObjectCount {
            index,
            object: match kind {
                ObjectKind::Key => "key",
                ObjectKind::Exit => "exit",
            },
            count: usize::from(first.is_some()) + rest,
        }),
    }
}

/// Parse a single level object.
///
/// # Errors
///
/// Returns an error if the value is not a level object or the level it
/// describes is invalid. `index` is reported in the error.
pub fn parse_level(value: Value, index: usize) -> Result<Level, LevelFileError> {
    let doc: LevelDoc = serde_json::from_value(value).map_err(|source| LevelFileError::Document { index, source })?;
    doc.into_level(index)
}

/// Split a levels file into its declared count and raw level objects,
/// without interpreting the levels.
///
/// # Errors
///
/// Returns an error if the text is not a JSON stream or does not start with
/// a level count.
pub fn split_documents(text: &str) -> Result<(usize, Vec<Value>), LevelFileError> {
    let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
    let declared = stream
        .next()
        .transpose()?
        .and_then(|count| count.as_u64())
        .and_then(|count| usize::try_from(count).ok())
        .ok_or(LevelFileError::MissingCount)?;
    let documents = stream.collect::<Result<Vec<_>, _>>()?;
    Ok((declared, documents))
}

/// Parse the contents of a levels file.
///
/// # Errors
///
/// Returns an error if the text is not a JSON stream, does not start with a
/// level count, the count is wrong, or any level is invalid.
pub fn parse_levels(text: &str) -> Result<Vec<Level>, LevelFileError> {
    let (declared, documents) = split_documents(text)?;
    if documents.len() != declared {
        return Err(LevelFileError::CountMismatch {
            declared,
            found: documents.len(),
        });
    }

    let levels = documents
        .into_iter()
        .enumerate()
        .map(|(index, value)| parse_level(value, index))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("parsed {declared} levels");
    Ok(levels)
}

/// Read and parse a levels file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails to parse.
pub fn load_levels(path: &Path) -> Result<Vec<Level>, LevelFileError> {
    let text = std::fs::read_to_string(path)?;
    let levels = parse_levels(&text)?;
    log::info!("loaded {} levels from {}", levels.len(), path.display());
    Ok(levels)
}
