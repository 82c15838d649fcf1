//! Command-line interface and the run settings derived from it.

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};

use crate::types::Position;

/// Pause between two frames of a search animation, in milliseconds.
pub(crate) const DEFAULT_FRAME_DELAY_MS: u64 = 100;

/// Explore a tile-grid dungeon in the terminal.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Map file to play; the built-in level is used when omitted.
    pub map: Option<PathBuf>,
    /// Cell the search command heads for, written as X,Y.
    #[arg(long, value_name = "X,Y", allow_hyphen_values = true)]
    pub goal: Option<Position>,
    /// Search run by the search command.
    #[arg(long, value_enum, default_value_t = SearchMode::AStar)]
    pub search: SearchMode,
    /// Pause between two frames of a search animation, in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_FRAME_DELAY_MS)]
    pub frame_delay_ms: u64,
    /// Write diagnostics to this file; filtered by `RUST_LOG`, `info` by default.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Resolves the run settings.
    ///
    /// An explicit `--goal` wins over the goal that ships with the map.
    #[must_use]
    pub fn settings(&self, map_goal: Option<Position>) -> Settings {
        Settings {
            goal: self.goal.or(map_goal),
            search: self.search,
            frame_delay: Duration::from_millis(self.frame_delay_ms),
        }
    }
}

/// Which search the search command runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SearchMode {
    /// Shortest path from the player to the goal.
    #[default]
    #[value(name = "astar")]
    AStar,
    /// Everything reachable from the player.
    Flood,
}

/// Settings the game loop runs with.
///
/// Built from the command line by [`Cli::settings`], or constructed directly when the loop is
/// driven by something other than the terminal front-end.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Goal of the A* search; searching without one is a logged no-op.
    pub goal: Option<Position>,
    /// Search run by the search command.
    pub search: SearchMode,
    /// Pause after each animation frame of a search.
    ///
    /// A zero delay draws every frame without waiting.
    pub frame_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            goal: None,
            search: SearchMode::AStar,
            frame_delay: Duration::from_millis(DEFAULT_FRAME_DELAY_MS),
        }
    }
}
