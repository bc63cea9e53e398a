use clap::Parser;
use galaxy_collision::app::App;
use galaxy_collision::config::Cli;
use galaxy_collision::error::Result;
use galaxy_collision::logging;
use galaxy_collision::random::RngSource;
use galaxy_collision::render::{TerminalRenderer, TerminalSession};
use galaxy_collision::state::AppState;
use galaxy_collision::viewport::Viewport;
use std::io;

/// Main function
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;
    cli.validate()?;
    let (primary, companion) = cli.galaxy_parameters()?;

    let viewport = Viewport::detect(cli.pixel_ratio)?;
    let mut state = AppState::new(primary, companion, viewport);
    state.debug = cli.debug;
    let mut app = App::new(state, RngSource::new(cli.seed), cli.approach_speed);

    let res = {
        let mut session = TerminalSession::enter(io::stdout())?;
        session.enable_raw_mode()?;
        let mut renderer = TerminalRenderer::new(io::stdout(), viewport, cli.exposure);
        app.run(&mut renderer, cli.fps)
    };

    if let Err(e) = &res {
        tracing::error!(target: "app", error = %e, "frame loop failed");
    }
    res
}
