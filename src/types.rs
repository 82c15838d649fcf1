//! Value types shared by the loader, the movement engine and the pathfinder.

use std::{fmt, num::ParseIntError, str::FromStr};

use thiserror::Error;

/// Integer grid coordinate.
///
/// Positions are plain values; equality is structural and the ordering is row-major (by `y`, then
/// by `x`) so that ordered sets of positions iterate the way a map is read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Position {
    /// Column, growing to the right.
    pub x: i32,
    /// Row, growing downwards.
    pub y: i32,
}

impl Position {
    /// Builds a position from its column and row.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the neighbouring position one step towards `direction`.
    ///
    /// Coordinates saturate at the numeric limits, which always lie outside any loadable grid.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Manhattan distance between two positions.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y))
    }

    /// Returns `true` when the two positions share an edge.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.manhattan(other) == 1
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{},{}", self.x, self.y)
    }
}

/// Failure to read a [`Position`] from its `X,Y` text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsePositionError {
    /// The text did not contain exactly one comma.
    #[error("expected a coordinate pair written as X,Y")]
    MissingSeparator,
    /// One of the two halves was not an integer.
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] ParseIntError),
}

impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (x, y) = text
            .split_once(',')
            .ok_or(ParsePositionError::MissingSeparator)?;
        if y.contains(',') {
            return Err(ParsePositionError::MissingSeparator);
        }

        Ok(Self::new(x.trim().parse()?, y.trim().parse()?))
    }
}

/// Terrain occupying a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Tile {
    /// Impassable rock, written `#`.
    StoneWall,
    /// Passable ground, written `.`.
    DirtFloor,
    /// Impassable until opened, written `|`.
    ClosedDoor,
    /// Passable door, written `/`.
    OpenDoor,
    /// Padding outside the drawn map, written as whitespace or implied by short rows.
    #[default]
    Blank,
    /// Player start marker; only exists while a map is being loaded.
    Pending,
}

impl Tile {
    /// Maps a map-source character to its tile.
    ///
    /// Returns [`None`] for characters outside the map alphabet. The player marker `P` maps to
    /// [`Tile::Pending`]; recording the start position is the loader's job.
    #[must_use]
    pub const fn from_char(character: char) -> Option<Self> {
        match character {
            ' ' | '\t' | '\r' => Some(Self::Blank),
            '#' => Some(Self::StoneWall),
            '|' => Some(Self::ClosedDoor),
            '/' => Some(Self::OpenDoor),
            '.' => Some(Self::DirtFloor),
            'P' => Some(Self::Pending),
            _ => None,
        }
    }

    /// Whether an entity may stand on this tile.
    ///
    /// This is the only walkability rule in the crate; movement and search both defer to it.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        !matches!(self, Self::StoneWall | Self::ClosedDoor | Self::Blank)
    }
}

/// One of the four grid directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards smaller `y`.
    Up,
    /// Towards larger `y`.
    Down,
    /// Towards smaller `x`.
    Left,
    /// Towards larger `x`.
    Right,
}

impl Direction {
    /// Neighbour expansion order used by every search: right, left, up, down.
    pub const SEARCH_ORDER: [Self; 4] = [Self::Right, Self::Left, Self::Up, Self::Down];

    /// Column and row offset of a single step.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Discrete command produced by the user interface.
///
/// The vocabulary is closed: adding a command means extending this enumeration and the dispatch
/// in the game loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Input {
    /// Nothing to do this tick.
    #[default]
    None,
    /// Step or interact upwards.
    Up,
    /// Step or interact downwards.
    Down,
    /// Step or interact to the left.
    Left,
    /// Step or interact to the right.
    Right,
    /// Leave the game.
    Quit,
    /// Run the configured search from the player's position.
    Search,
}

impl Input {
    /// The direction carried by a movement command, if any.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        match self {
            Self::Up => Some(Direction::Up),
            Self::Down => Some(Direction::Down),
            Self::Left => Some(Direction::Left),
            Self::Right => Some(Direction::Right),
            Self::None | Self::Quit | Self::Search => None,
        }
    }
}
