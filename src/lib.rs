//! Logic core of a tile-grid adventure game, with a terminal front-end.
//!
//! A level is loaded from a small text format ([`load_level`]), a single player walks it and opens
//! doors ([`apply_input`]), and a search command either finds the shortest route to a goal with A*
//! ([`find_path`]) or floods everything reachable ([`explore`]). The game loop ([`run`]) talks to
//! the outside world only through the [`GameUi`] trait; [`TerminalFrontend`] implements it on top
//! of ratatui.

#![expect(
    clippy::cargo_common_metadata,
    reason = "The crate is not published and has no repository URL to declare."
)]

mod app;
mod config;
mod events;
mod file_loader;
mod level;
mod logging;
mod map;
mod movement;
mod pathfinding;
mod types;
mod ui;

pub use app::{run, Game, GameUi};
pub use config::{Cli, SearchMode, Settings};
pub use file_loader::{load_level, load_level_from_file, read_source, MalformedMapError};
pub use level::Level;
pub use logging::install as install_logging;
pub use map::LevelSource;
pub use movement::{apply_input, step, Step};
pub use pathfinding::{explore, find_path, NoopObserver, Path, PathObserver};
pub use types::{Direction, Input, ParsePositionError, Position, Tile};
pub use ui::TerminalFrontend;
