//! Movement and door interaction rules.

use tracing::{debug, trace};

use crate::{
    level::Level,
    types::{Direction, Input, Tile},
};

/// What a single command did to the level.
///
/// Callers are free to ignore the outcome; the game loop does, since every outcome is already
/// visible in the level it redraws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The player advanced one cell.
    Moved,
    /// A closed door was opened; the player stayed put.
    OpenedDoor,
    /// A move was attempted but the target cell cannot be entered or opened.
    Blocked,
    /// The command carries no direction and was not attempted.
    Ignored,
}

/// Applies a command to the level.
///
/// Directional commands move the player onto walkable cells and open closed doors in their way.
/// Every other command is left to the game loop, changes nothing here and reports
/// [`Step::Ignored`]. Invalid moves are absorbed silently as [`Step::Blocked`].
pub fn apply_input(level: &mut Level, input: Input) -> Step {
    input
        .direction()
        .map_or(Step::Ignored, |direction| step(level, direction))
}

/// Attempts one step of the player towards `direction`.
///
/// A walkable target is entered. A closed door is opened in place instead, so walking through it
/// takes two commands. Walls, blank padding and the outside of the grid block the move.
pub fn step(level: &mut Level, direction: Direction) -> Step {
    let target = level.player().step(direction);

    if level.can_walk(target) {
        level.place_player(target);
        trace!(to = %target, "player moved");
        return Step::Moved;
    }

    if level.tile(target) == Some(Tile::ClosedDoor) && level.set_tile(target, Tile::OpenDoor) {
        debug!(door = %target, "door opened");
        return Step::OpenedDoor;
    }

    Step::Blocked
}
