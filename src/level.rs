//! Level state: the tile grid, the player and the search overlay.

use std::collections::BTreeSet;

use crate::types::{Direction, Position, Tile};

/// The controllable entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Player {
    /// Cell the player currently stands on.
    position: Position,
}

/// A loaded level.
///
/// The grid is rectangular: every row has the same length, shorter source rows having been padded
/// with [`Tile::Blank`] by the loader. Every lookup goes through [`Level::tile`], which treats
/// coordinates outside the grid as absent rather than indexing out of range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    /// Tiles stored row by row.
    rows: Vec<Vec<Tile>>,
    /// Length shared by every row.
    width: usize,
    /// The single player entity.
    player: Player,
    /// Cells touched by the last search run; only read by renderers.
    overlay: BTreeSet<Position>,
}

impl Level {
    /// Assembles a level from already validated rows.
    ///
    /// Callers guarantee that every row has the same length and that `player` lies inside the
    /// grid; the loader is the only producer.
    pub(crate) fn from_rows(rows: Vec<Vec<Tile>>, player: Position) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        Self {
            rows,
            width,
            player: Player { position: player },
            overlay: BTreeSet::new(),
        }
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Rows of the grid, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    /// Converts a position into row and column indices, if it lies inside the grid.
    fn index(&self, position: Position) -> Option<(usize, usize)> {
        let column = usize::try_from(position.x).ok()?;
        let row = usize::try_from(position.y).ok()?;

        (column < self.width && row < self.rows.len()).then_some((row, column))
    }

    /// Tile at `position`, or [`None`] outside the grid.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<Tile> {
        let (row, column) = self.index(position)?;
        self.rows.get(row)?.get(column).copied()
    }

    /// Replaces the tile at `position`. Returns `false` when the position is outside the grid.
    pub(crate) fn set_tile(&mut self, position: Position, tile: Tile) -> bool {
        let Some((row, column)) = self.index(position) else {
            return false;
        };
        if let Some(cell) = self.rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
            *cell = tile;
            true
        } else {
            false
        }
    }

    /// Whether an entity may stand at `position`. Cells outside the grid are never walkable.
    #[must_use]
    pub fn can_walk(&self, position: Position) -> bool {
        self.tile(position).is_some_and(Tile::is_walkable)
    }

    /// Walkable cells next to `position`, in search expansion order.
    pub(crate) fn walkable_neighbours(
        &self,
        position: Position,
    ) -> impl Iterator<Item = Position> + '_ {
        Direction::SEARCH_ORDER
            .into_iter()
            .map(move |direction| position.step(direction))
            .filter(|neighbour| self.can_walk(*neighbour))
    }

    /// Every cell of the grid with its position, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().filter_map(move |(column, tile)| {
                let x = i32::try_from(column).ok()?;
                let y = i32::try_from(row).ok()?;
                Some((Position::new(x, y), *tile))
            })
        })
    }

    /// Current player position.
    #[must_use]
    pub const fn player(&self) -> Position {
        self.player.position
    }

    /// Moves the player without any rule checks; the movement engine decides legality.
    pub(crate) const fn place_player(&mut self, position: Position) {
        self.player.position = position;
    }

    /// Cells recorded by the most recent search.
    #[must_use]
    pub const fn overlay(&self) -> &BTreeSet<Position> {
        &self.overlay
    }

    /// Forgets the previous search trace.
    pub(crate) fn clear_overlay(&mut self) {
        self.overlay.clear();
    }

    /// Records a cell in the search trace. Returns `true` if it was not already present.
    pub(crate) fn mark(&mut self, position: Position) -> bool {
        self.overlay.insert(position)
    }
}
