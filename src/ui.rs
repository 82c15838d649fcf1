//! Terminal front-end: renders a level on a ratatui canvas and reads keys through crossterm.

use std::io::{self, Stdout};

use color_eyre::eyre::{OptionExt as _, Result};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style},
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Borders, Clear,
    },
    Frame, Terminal,
};

use crate::{
    app::GameUi,
    events,
    level::Level,
    types::{Input, Position, Tile},
};

/// A terminal owned for the duration of a game.
///
/// The terminal is the single device context of the front-end: it is acquired by
/// [`TerminalFrontend::init`] and handed back by [`TerminalFrontend::restore`].
pub struct TerminalFrontend<B: Backend> {
    /// The ratatui terminal drawn on.
    terminal: Terminal<B>,
    /// Map name shown above the key help.
    title: String,
}

impl TerminalFrontend<CrosstermBackend<Stdout>> {
    /// Switches the terminal to raw mode and the alternate screen.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn init(title: &str) -> Result<Self> {
        Ok(Self::with_terminal(ratatui::try_init()?, title))
    }

    /// Gives the terminal back to the shell.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn restore(self) -> Result<()> {
        drop(self.terminal);
        ratatui::try_restore()?;
        Ok(())
    }
}

impl<B: Backend> TerminalFrontend<B> {
    /// Wraps an already prepared terminal.
    #[must_use]
    pub fn with_terminal(terminal: Terminal<B>, title: &str) -> Self {
        Self {
            terminal,
            title: title.to_owned(),
        }
    }
}

impl<B: Backend> GameUi for TerminalFrontend<B> {
    fn draw(&mut self, level: &Level) -> Result<()> {
        let title = &self.title;
        let _ = self
            .terminal
            .try_draw(|frame| render(frame, level, title).map_err(io::Error::other))?;
        Ok(())
    }

    fn get_input(&mut self) -> Result<Option<Input>> {
        events::poll_input()
    }
}

/// Canvas layers, drawn in this order so later layers cover earlier ones.
const LAYERS: [(Layer, Color); 5] = [
    (Layer::Floor, Color::DarkGray),
    (Layer::Wall, Color::Green),
    (Layer::Door, Color::Yellow),
    (Layer::Overlay, Color::Red),
    (Layer::Player, Color::White),
];

/// Groups of cells sharing a colour on the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layer {
    /// Walkable ground.
    Floor,
    /// Stone walls.
    Wall,
    /// Doors, open or closed.
    Door,
    /// Cells recorded by the last search.
    Overlay,
    /// The player.
    Player,
}

/// Cells belonging to `layer`, in grid coordinates.
fn layer_cells(level: &Level, layer: Layer) -> Vec<Position> {
    match layer {
        Layer::Floor => cells_where(level, |tile| tile == Tile::DirtFloor),
        Layer::Wall => cells_where(level, |tile| tile == Tile::StoneWall),
        Layer::Door => cells_where(level, |tile| {
            matches!(tile, Tile::ClosedDoor | Tile::OpenDoor)
        }),
        Layer::Overlay => level.overlay().iter().copied().collect(),
        Layer::Player => vec![level.player()],
    }
}

/// Positions of every tile accepted by `keep`.
fn cells_where(level: &Level, keep: fn(Tile) -> bool) -> Vec<Position> {
    level
        .cells()
        .filter(|(_, tile)| keep(*tile))
        .map(|(position, _)| position)
        .collect()
}

/// Converts grid positions into canvas coordinates centred on the origin.
///
/// Rows follow `y[i] = (n - 1) / 2 - i` so that row 0 ends up at the top, and columns follow
/// `x[i] = i - (n - 1) / 2`.
fn to_canvas_coords(cells: &[Position], columns: u16, rows: u16) -> Vec<(f64, f64)> {
    let half_width = (f64::from(columns) - 1.) / 2.;
    let half_height = (f64::from(rows) - 1.) / 2.;

    cells
        .iter()
        .map(|position| {
            (
                f64::from(position.x) - half_width,
                half_height - f64::from(position.y),
            )
        })
        .collect()
}

/// Draws the level centred in the frame with the key help underneath.
///
/// # Errors
///
/// Fails when the level is too large to be measured in terminal cells.
fn render(frame: &mut Frame, level: &Level, title: &str) -> Result<()> {
    frame.render_widget(Clear, frame.area());

    let columns = u16::try_from(level.width())?;
    let rows = u16::try_from(level.height())?;
    let footer = format!("{title} @ {} | {}", level.player(), events::KEY_HELP);
    let footer_width = u16::try_from(footer.chars().count())?
        .saturating_add(2)
        .max(columns);

    let overall_layout = Layout::vertical([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());
    let content_area = *overall_layout
        .first()
        .ok_or_eyre("failed to get level area from layout")?;
    let footer_full_area = *overall_layout
        .last()
        .ok_or_eyre("failed to get footer area from layout")?;

    let grid_area = centered(content_area, columns, rows)?;
    let footer_area = centered(footer_full_area, footer_width, footer_full_area.height)?;

    let layers: Vec<(Vec<(f64, f64)>, Color)> = LAYERS
        .iter()
        .map(|(layer, color)| {
            (
                to_canvas_coords(&layer_cells(level, *layer), columns, rows),
                *color,
            )
        })
        .collect();

    let canvas = Canvas::default()
        .x_bounds([
            (-rounded_div::i32(grid_area.width.into(), 2)).into(),
            (rounded_div::i32(grid_area.width.into(), 2)).into(),
        ])
        .y_bounds([
            (-rounded_div::i32(grid_area.height.into(), 2)).into(),
            (rounded_div::i32(grid_area.height.into(), 2)).into(),
        ])
        .marker(Marker::Block)
        .paint(|ctx| {
            for (coords, color) in &layers {
                ctx.draw(&Points {
                    coords,
                    color: *color,
                });
                ctx.layer();
            }
        });
    frame.render_widget(canvas, grid_area);

    let footer_block = Block::bordered()
        .title(footer)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(Color::Green))
        .border_type(BorderType::Plain)
        .borders(Borders::TOP);
    frame.render_widget(footer_block, footer_area);

    Ok(())
}

/// Centres a `width` by `height` rectangle inside `area`, clipping it when `area` is smaller.
fn centered(area: Rect, width: u16, height: u16) -> Result<Rect> {
    let row = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area)
        .first()
        .copied()
        .ok_or_eyre("failed to get centered row from vertical layout")?;

    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(row)
        .first()
        .copied()
        .ok_or_eyre("failed to get centered cell from horizontal layout")
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::{file_loader::load_level, map::LevelSource};

    /// Creates a test terminal with known dimensions.
    fn create_test_terminal() -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 24);
        Terminal::new(backend).expect("failed to create test terminal")
    }

    /// Concatenates every symbol of the terminal buffer.
    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn test_draw_builtin_level() {
        let source = LevelSource::builtin();
        let level = load_level(source.text()).expect("built-in map should load");
        let mut frontend = TerminalFrontend::with_terminal(create_test_terminal(), source.name());

        frontend.draw(&level).expect("drawing should succeed");

        let text = screen_text(&frontend.terminal);
        assert!(text.contains("Default @ 3,2"), "footer should name map and player");
        assert!(text.contains("(q) quit"), "footer should list key bindings");
    }

    #[test]
    fn test_draw_level_larger_than_screen() {
        let wide_row = "#".repeat(200);
        let source = format!("{wide_row}\n#P.\n{wide_row}");
        let level = load_level(&source).expect("wide map should load");
        let mut frontend = TerminalFrontend::with_terminal(create_test_terminal(), "wide");

        frontend
            .draw(&level)
            .expect("oversized levels should be clipped, not rejected");
    }

    #[test]
    fn test_render_rejects_unmeasurable_level() {
        let source = format!("P{}", ".".repeat(70_000));
        let level = load_level(&source).expect("long row should load");
        let mut terminal = create_test_terminal();

        let result = terminal.draw(|frame| {
            assert!(
                render(frame, &level, "long").is_err(),
                "a level wider than u16::MAX cells cannot be laid out"
            );
        });

        assert!(result.is_ok(), "terminal drawing should succeed even if render fails");
    }

    #[test]
    fn test_to_canvas_coords_centres_grid() {
        let coords = to_canvas_coords(
            &[Position::new(0, 0), Position::new(4, 2), Position::new(2, 1)],
            5,
            3,
        );

        assert_eq!(coords, vec![(-2., 1.), (2., -1.), (0., 0.)]);
    }

    #[test]
    fn test_layer_cells_split_tiles() {
        let level = load_level("#|/\n#P.").expect("map should load");

        assert_eq!(
            layer_cells(&level, Layer::Wall),
            vec![Position::new(0, 0), Position::new(0, 1)]
        );
        assert_eq!(
            layer_cells(&level, Layer::Door),
            vec![Position::new(1, 0), Position::new(2, 0)]
        );
        assert_eq!(
            layer_cells(&level, Layer::Floor),
            vec![Position::new(1, 1), Position::new(2, 1)]
        );
        assert_eq!(layer_cells(&level, Layer::Player), vec![Position::new(1, 1)]);
        assert!(layer_cells(&level, Layer::Overlay).is_empty());
    }

    #[test]
    fn test_centered_clips_to_area() {
        let area = Rect::new(0, 0, 10, 4);

        let inner = centered(area, 4, 2).expect("layout should split");
        assert_eq!(inner, Rect::new(3, 1, 4, 2));

        let clipped = centered(area, 40, 20).expect("layout should split");
        assert!(clipped.width <= area.width && clipped.height <= area.height);
    }
}
