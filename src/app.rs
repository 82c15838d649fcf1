//! The game loop and the interface it expects from a front-end.

use std::{thread, time::Duration};

use color_eyre::eyre::{Report, Result};
use tracing::{info, warn};

use crate::{
    config::{SearchMode, Settings},
    file_loader,
    level::Level,
    movement,
    pathfinding::{self, PathObserver},
    types::Input,
};

/// What the game loop needs from a user interface.
///
/// The loop calls [`GameUi::draw`] once per tick and then [`GameUi::get_input`], and additionally
/// draws once per step while a search is being animated. Implementations only ever get shared
/// access to the level, so rendering cannot change the game state.
pub trait GameUi {
    /// Renders the current state of the level.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying output device.
    fn draw(&mut self, level: &Level) -> Result<()>;

    /// Reads the next command. [`None`] means nothing happened this tick.
    ///
    /// # Errors
    ///
    /// Any failure of the underlying input device.
    fn get_input(&mut self) -> Result<Option<Input>>;
}

/// Loads `source` and plays it on `ui` until the player quits.
///
/// This is the whole game from a front-end's point of view: the map text is parsed into a fresh
/// [`Level`] and handed to a [`Game`], which keeps it until the loop ends.
///
/// # Errors
///
/// Fails when the map is malformed or the interface reports an error; neither is retried.
pub fn run(source: &str, ui: &mut dyn GameUi, settings: &Settings) -> Result<()> {
    let level = file_loader::load_level(source)?;
    info!(
        width = level.width(),
        height = level.height(),
        player = %level.player(),
        "level loaded"
    );

    Game::new(level, settings.clone()).run(ui)
}

/// A level being played.
///
/// The game owns its level exclusively; front-ends see it through [`Game::level`] or through the
/// borrows handed to [`GameUi::draw`].
#[derive(Debug)]
pub struct Game {
    /// The level, exclusively owned by the loop.
    level: Level,
    /// Search goal, search mode and animation pacing.
    settings: Settings,
}

impl Game {
    /// Starts a game on an already loaded level.
    #[must_use]
    pub const fn new(level: Level, settings: Settings) -> Self {
        Self { level, settings }
    }

    /// Current level state.
    #[must_use]
    pub const fn level(&self) -> &Level {
        &self.level
    }

    /// Draws, polls and applies commands until [`Input::Quit`] arrives.
    ///
    /// # Errors
    ///
    /// Propagates drawing and input failures of `ui`.
    pub fn run(&mut self, ui: &mut dyn GameUi) -> Result<()> {
        loop {
            ui.draw(&self.level)?;

            let Some(input) = ui.get_input()? else {
                continue;
            };
            if !self.handle_input(input, ui)? {
                info!("quit requested");
                return Ok(());
            }
        }
    }

    /// Applies one command. Returns `false` once the player asked to quit.
    ///
    /// Movement commands go to the movement rules and never fail. A search animates through `ui`,
    /// one frame per overlay cell, and always runs to completion; a frame that cannot be drawn
    /// stops the animation and is reported once the search is over.
    ///
    /// # Errors
    ///
    /// The first drawing failure of `ui` during a search.
    pub fn handle_input(&mut self, input: Input, ui: &mut dyn GameUi) -> Result<bool> {
        match input {
            Input::Quit => return Ok(false),
            Input::Search => self.search(ui)?,
            Input::None | Input::Up | Input::Down | Input::Left | Input::Right => {
                let _ = movement::apply_input(&mut self.level, input);
            }
        }

        Ok(true)
    }

    /// Runs the configured search from the player's cell.
    ///
    /// A missing goal or an unreachable one is logged and otherwise absorbed.
    fn search(&mut self, ui: &mut dyn GameUi) -> Result<()> {
        let start = self.level.player();
        let mut trace = FrameTrace::new(ui, self.settings.frame_delay);

        match self.settings.search {
            SearchMode::AStar => {
                let Some(goal) = self.settings.goal else {
                    warn!("search requested but no goal is configured");
                    return Ok(());
                };
                if let Some(path) = pathfinding::find_path(&mut self.level, start, goal, &mut trace)
                {
                    info!(%start, %goal, steps = path.len().saturating_sub(1), "search finished");
                }
            }
            SearchMode::Flood => {
                let reachable = pathfinding::explore(&mut self.level, start, &mut trace);
                info!(%start, reachable = reachable.len(), "exploration finished");
            }
        }

        trace.finish()
    }
}

/// Search observer that draws a frame for every step and then waits.
///
/// [`PathObserver::on_step`] cannot fail, so the first drawing error is kept here instead. From
/// then on no more frames are drawn or waited for, and [`FrameTrace::finish`] hands the error back
/// to the game loop, which treats it like any other drawing failure.
struct FrameTrace<'ui, U: GameUi + ?Sized> {
    /// Front-end receiving the frames.
    ui: &'ui mut U,
    /// Pause after each frame.
    delay: Duration,
    /// First drawing failure, if any.
    failure: Option<Report>,
}

impl<'ui, U: GameUi + ?Sized> FrameTrace<'ui, U> {
    /// Starts tracing a search on `ui`.
    const fn new(ui: &'ui mut U, delay: Duration) -> Self {
        Self {
            ui,
            delay,
            failure: None,
        }
    }

    /// Ends the trace, returning the drawing failure that interrupted it.
    fn finish(self) -> Result<()> {
        self.failure.map_or(Ok(()), Err)
    }
}

impl<U: GameUi + ?Sized> PathObserver for FrameTrace<'_, U> {
    fn on_step(&mut self, level: &Level) {
        if self.failure.is_some() {
            return;
        }
        if let Err(err) = self.ui.draw(level) {
            warn!(%err, "failed to draw search frame");
            self.failure = Some(err);
            return;
        }
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}
