use std::path::PathBuf;

use structopt::StructOpt;

use crate::commands::{self, Cmd};
use schedsim::utils::logging::GlobalLoggingContext;
use schedsim::utils::prelude::*;

#[derive(StructOpt)]
#[structopt(name = "schedsim")]
pub struct Cli {
    /// Set a custom config file
    #[structopt(short, long, value_name = "FILE", parse(from_os_str))]
    config: Option<PathBuf>,

    /// Apply a named preset from the config
    #[structopt(short, long, value_name = "NAME")]
    preset: Option<String>,

    #[structopt(subcommand)]
    command: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Show the effective configuration
    Config(commands::Config),
    /// Run one scheduling algorithm
    Run(commands::Run),
    /// Run FCFS and RR on the same workload
    Compare(commands::Compare),
}

/// Parse arguments, finish configuration, and run the subcommand
pub fn execute(mut logging: GlobalLoggingContext) -> Result<()> {
    let cli = Cli::from_args();

    {
        let mut cfg = config_mut();
        if let Some(path) = &cli.config {
            cfg.use_file(path)?;
        }
        if let Some(preset) = &cli.preset {
            cfg.use_preset(preset)?;
        }
    }

    // every subcommand prints its result on stdout
    logging.reconfigure(true)?;

    match cli.command {
        Command::Config(cmd) => cmd.run(),
        Command::Run(cmd) => cmd.run(),
        Command::Compare(cmd) => cmd.run(),
    }
}
