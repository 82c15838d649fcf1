//! Map sources: the built-in level and map files picked on the command line.

use std::path::Path;

use crate::{
    file_loader::{self, MalformedMapError},
    types::Position,
};

/// Goal the search command heads for on the built-in level.
const BUILTIN_GOAL: Position = Position::new(13, 3);

/// Built-in level used when no map file is given.
const BUILTIN_MAP: &str = "\
################
#..............#
#..P...|.......#
#......#.......#
####/###.......#
   #...#########
   #...|.......#
   #####.......#
       #########";

/// Raw map text together with a display name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelSource {
    /// Display name, the file name without its extension.
    name: String,
    /// Unparsed map text.
    text: String,
    /// Search goal that ships with the map, if any.
    demo_goal: Option<Position>,
}

impl LevelSource {
    /// The level compiled into the binary.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            name: "Default".to_owned(),
            text: BUILTIN_MAP.to_owned(),
            demo_goal: Some(BUILTIN_GOAL),
        }
    }

    /// Reads a map file.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedMapError::Unreadable`] when the file cannot be read.
    pub fn read(path: &Path) -> Result<Self, MalformedMapError> {
        let text = file_loader::read_source(path)?;
        let name = path
            .file_stem()
            .map_or_else(|| path.display().to_string(), |stem| stem.to_string_lossy().into_owned());

        Ok(Self {
            name,
            text,
            demo_goal: None,
        })
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unparsed map text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Search goal that ships with the map.
    #[must_use]
    pub const fn demo_goal(&self) -> Option<Position> {
        self.demo_goal
    }
}
