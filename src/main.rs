//! Binary entry point: read the configuration, start file logging, open the
//! library and hand the terminal to the TUI until the user quits.
use anyhow::Context;
use clap::Parser;
use estante_virtual::logging::init_file_logging;
use estante_virtual::{run_app, App, Config, Library};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    init_file_logging(&config.log_path()?, config.log_level)?;

    let library = Library::open(config.store, config.seed()).context("failed to open library")?;
    let actor = config.actor();
    info!(%actor, "starting session");

    let mut app = App::new(library, actor)?;
    run_app(&mut app)
}
