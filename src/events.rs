//! Keyboard polling and the key bindings of the terminal front-end.

use std::time::Duration;

use color_eyre::eyre::Result;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::types::Input;

/// How long a single poll waits for a key before reporting no command.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Key-binding summary shown in the footer.
pub(crate) const KEY_HELP: &str = "(hjkl/wasd/arrows) move / (f) search / (q) quit";

/// Waits briefly for a key press and translates it.
///
/// Returns [`None`] when nothing was pressed within the poll timeout or the event was not a key
/// press.
///
/// # Errors
///
/// - [`std::io::Error`]
pub(crate) fn poll_input() -> Result<Option<Input>> {
    if event::poll(POLL_TIMEOUT)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(Some(input_for_key(key.code)));
            }
        }
    }

    Ok(None)
}

/// Maps a key to a game command. Unbound keys produce [`Input::None`].
pub(crate) const fn input_for_key(code: KeyCode) -> Input {
    match code {
        KeyCode::Char('k' | 'w') | KeyCode::Up => Input::Up,
        KeyCode::Char('j' | 's') | KeyCode::Down => Input::Down,
        KeyCode::Char('h' | 'a') | KeyCode::Left => Input::Left,
        KeyCode::Char('l' | 'd') | KeyCode::Right => Input::Right,
        KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
        KeyCode::Char('f' | ' ') => Input::Search,
        _ => Input::None,
    }
}
