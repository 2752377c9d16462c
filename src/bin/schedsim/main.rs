use schedsim::utils;
use schedsim::utils::prelude::*;

mod cli;
mod commands;

fn main() -> Result<()> {
    // panic setup should be done early
    utils::panic::setup();
    // basic logging setup, the guard flushes logs when main returns
    let logging = utils::logging::setup()?;

    // initialize Configuration
    utils::app_config::setup()?;

    trace!("Start cli execution");

    // Match Commands
    cli::execute(logging)
}
