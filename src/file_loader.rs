//! Map source parsing into [`Level`] values.
//!
//! A map is plain text read row by row. Each character is one cell:
//!
//! | Character        | Tile                              |
//! |------------------|-----------------------------------|
//! | space, tab       | [`Tile::Blank`]                   |
//! | `#`              | [`Tile::StoneWall`]               |
//! | `|`              | [`Tile::ClosedDoor`]              |
//! | `/`              | [`Tile::OpenDoor`]                |
//! | `.`              | [`Tile::DirtFloor`]               |
//! | `P`              | player start, floor once resolved |
//!
//! Rows may differ in length; the grid is as wide as the longest row and shorter rows are padded
//! with blank cells.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

use crate::{
    level::Level,
    types::{Position, Tile},
};

/// Reasons a map source cannot become a level.
#[derive(Debug, Error)]
pub enum MalformedMapError {
    /// The map file could not be read.
    #[error("failed to read map file {}: {source}", .path.display())]
    Unreadable {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// A character outside the map alphabet was found.
    #[error("unrecognized tile {character:?} at line {line}, column {column}")]
    UnrecognizedTile {
        /// The offending character.
        character: char,
        /// One-based line number.
        line: usize,
        /// One-based column number.
        column: usize,
    },
    /// No `P` marker was found.
    #[error("map has no player start")]
    MissingPlayerStart,
    /// More than one `P` marker was found.
    #[error("map has more than one player start: {first} and {second}")]
    MultiplePlayerStarts {
        /// The first marker, in reading order.
        first: Position,
        /// The next marker found after it.
        second: Position,
    },
    /// The player start has no floor tile next to it.
    #[error("player start at {position} has no adjacent floor")]
    UnresolvedStart {
        /// Position of the unresolved marker.
        position: Position,
    },
    /// The grid cannot be addressed with grid coordinates.
    #[error("map of {width}x{height} cells is too large")]
    Oversized {
        /// Length of the longest row.
        width: usize,
        /// Number of rows.
        height: usize,
    },
}

/// Reads a map file into memory.
///
/// # Errors
///
/// Returns [`MalformedMapError::Unreadable`] when the file cannot be read as UTF-8 text.
pub fn read_source(path: &Path) -> Result<String, MalformedMapError> {
    fs::read_to_string(path).map_err(|source| MalformedMapError::Unreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and parses a map file.
///
/// # Errors
///
/// Returns any error of [`read_source`] or [`load_level`].
pub fn load_level_from_file(path: &Path) -> Result<Level, MalformedMapError> {
    load_level(&read_source(path)?)
}

/// Parses a map source into a level.
///
/// Exactly one `P` must be present. Its cell is resolved to [`Tile::DirtFloor`] when at least one
/// of its eight neighbours already is floor; the neighbourhood scan is clamped to the grid and is
/// not transitive.
///
/// # Errors
///
/// Returns a [`MalformedMapError`] describing the first problem found.
pub fn load_level(source: &str) -> Result<Level, MalformedMapError> {
    let lines: Vec<&str> = source.lines().collect();
    let width = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0);
    let height = lines.len();
    if i32::try_from(width).is_err() || i32::try_from(height).is_err() {
        return Err(MalformedMapError::Oversized { width, height });
    }

    let mut rows = vec![vec![Tile::Blank; width]; height];
    let mut start = None;
    for (row, (line, cells)) in lines.iter().zip(rows.iter_mut()).enumerate() {
        for (column, (character, cell)) in line.chars().zip(cells.iter_mut()).enumerate() {
            let tile =
                Tile::from_char(character).ok_or(MalformedMapError::UnrecognizedTile {
                    character,
                    line: row + 1,
                    column: column + 1,
                })?;

            if tile == Tile::Pending {
                let here = position_of(row, column)
                    .ok_or(MalformedMapError::Oversized { width, height })?;
                if let Some(first) = start {
                    return Err(MalformedMapError::MultiplePlayerStarts {
                        first,
                        second: here,
                    });
                }
                start = Some(here);
            }

            *cell = tile;
        }
    }

    let start = start.ok_or(MalformedMapError::MissingPlayerStart)?;
    resolve_pending(&mut rows)?;

    debug!(width, height, player = %start, "loaded level");

    Ok(Level::from_rows(rows, start))
}

/// Converts row and column indices into a grid position.
fn position_of(row: usize, column: usize) -> Option<Position> {
    Some(Position::new(
        i32::try_from(column).ok()?,
        i32::try_from(row).ok()?,
    ))
}

/// Turns every pending cell into floor, provided one of its neighbours is floor.
fn resolve_pending(rows: &mut [Vec<Tile>]) -> Result<(), MalformedMapError> {
    let pending: Vec<(usize, usize)> = rows
        .iter()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, tile)| **tile == Tile::Pending)
                .map(move |(column, _)| (row, column))
        })
        .collect();

    for (row, column) in pending {
        if !has_floor_neighbour(rows, row, column) {
            return Err(MalformedMapError::UnresolvedStart {
                position: position_of(row, column).unwrap_or_default(),
            });
        }
        if let Some(cell) = rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *cell = Tile::DirtFloor;
        }
    }

    Ok(())
}

/// Scans the 3x3 block around a cell, skipping the cell itself and anything outside the grid.
fn has_floor_neighbour(rows: &[Vec<Tile>], row: usize, column: usize) -> bool {
    (row.saturating_sub(1)..=row.saturating_add(1)).any(|scan_row| {
        (column.saturating_sub(1)..=column.saturating_add(1)).any(|scan_column| {
            (scan_row, scan_column) != (row, column)
                && rows
                    .get(scan_row)
                    .and_then(|cells| cells.get(scan_column))
                    .is_some_and(|tile| *tile == Tile::DirtFloor)
        })
    })
}
