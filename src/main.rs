//! This crate contains the source code for the binary for the game dungeontui.

#![expect(
    clippy::cargo_common_metadata,
    reason = "The crate is not published and has no repository URL to declare."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use dungeontui::{install_logging, run, Cli, LevelSource, TerminalFrontend};

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        install_logging(path)?;
    }

    let source = match &cli.map {
        Some(path) => LevelSource::read(path)?,
        None => LevelSource::builtin(),
    };
    let settings = cli.settings(source.demo_goal());

    let mut frontend = TerminalFrontend::init(source.name())?;
    let result = run(source.text(), &mut frontend, &settings);
    frontend.restore()?;

    result
}
