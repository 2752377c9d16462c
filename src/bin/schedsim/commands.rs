use std::io;

use parse_display::{Display, FromStr};
use structopt::StructOpt;

use schedsim::output::{self, Format};
use schedsim::utils::prelude::*;
use schedsim::workload::{self, WorkloadConfig};
use schedsim::{Quantum, SchedulerConfig, SimConfig, Time};

/// Should be implemented by individual subcommand
pub trait Cmd {
    fn run(self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Display, FromStr)]
#[display(style = "lowercase")]
pub enum Algorithm {
    Fcfs,
    Rr,
}

/// Show the configuration
#[derive(StructOpt)]
pub struct Config {}

impl Cmd for Config {
    fn run(self) -> Result<()> {
        let cfg: SimConfig = config().fetch()?;
        serde_yaml::to_writer(io::stdout(), &cfg)?;
        println!();

        Ok(())
    }
}

/// Run one scheduling algorithm end-to-end
#[derive(StructOpt)]
pub struct Run {
    /// Comma separated burst lengths, replaces the configured workload
    #[structopt(short, long, use_delimiter = true)]
    bursts: Option<Vec<Time>>,

    /// Scheduling algorithm, fcfs or rr
    #[structopt(short, long)]
    algorithm: Option<Algorithm>,

    /// Round-Robin time slice
    #[structopt(short, long)]
    quantum: Option<Time>,

    /// Output format, text, json or yaml
    #[structopt(short, long)]
    format: Option<Format>,

    /// Also print the final process table
    #[structopt(long)]
    dump_table: bool,
}

impl Cmd for Run {
    fn run(self) -> Result<()> {
        let mut cfg: SimConfig = config().fetch()?;
        if let Some(bursts) = self.bursts {
            cfg.workload = WorkloadConfig::Fixed { bursts };
        }
        cfg.scheduler = select_scheduler(cfg.scheduler, self.algorithm, self.quantum)?;
        if let Some(format) = self.format {
            cfg.output.format = format;
        }
        cfg.output.dump_table |= self.dump_table;

        let report = schedsim::run_sim(&cfg)?;
        info!(
            scheduler = %report.algorithm,
            elapsed = report.elapsed,
            average_wait = report.average_wait,
            "simulation done"
        );
        Ok(())
    }
}

/// Run FCFS and RR on independent copies of the same workload
#[derive(StructOpt)]
pub struct Compare {
    /// Comma separated burst lengths, replaces the configured workload
    #[structopt(short, long, use_delimiter = true)]
    bursts: Option<Vec<Time>>,

    /// Round-Robin time slice
    #[structopt(short, long)]
    quantum: Option<Time>,

    /// Output format, text, json or yaml
    #[structopt(short, long)]
    format: Option<Format>,
}

impl Cmd for Compare {
    fn run(self) -> Result<()> {
        let mut cfg: SimConfig = config().fetch()?;
        let bursts = match self.bursts {
            Some(bursts) => bursts,
            None => workload::bursts(&cfg.workload)?,
        };
        let quantum = rr_quantum(cfg.scheduler, self.quantum)?;
        if let Some(format) = self.format {
            cfg.output.format = format;
        }

        let reports = schedsim::compare(&bursts, quantum)?;
        output::render_comparison(&reports, &cfg.output, io::stdout().lock())
    }
}

/// Command line choices win over the configured scheduler.
///
/// A quantum alone retunes a configured RR and is ignored for FCFS.
fn select_scheduler(
    configured: SchedulerConfig,
    algorithm: Option<Algorithm>,
    quantum: Option<Time>,
) -> Result<SchedulerConfig> {
    Ok(match (algorithm, configured) {
        (Some(Algorithm::Fcfs), _) | (None, SchedulerConfig::FCFS) => SchedulerConfig::FCFS,
        (Some(Algorithm::Rr), _) | (None, SchedulerConfig::RR { .. }) => SchedulerConfig::RR {
            quantum: rr_quantum(configured, quantum)?,
        },
    })
}

/// The quantum from the command line, or else the configured one
fn rr_quantum(configured: SchedulerConfig, quantum: Option<Time>) -> Result<Quantum> {
    match (quantum, configured) {
        (Some(ticks), _) => Quantum::new(ticks),
        (None, SchedulerConfig::RR { quantum }) => Ok(quantum),
        (None, SchedulerConfig::FCFS) => Err(Error::invalid_argument("round-robin needs a quantum")),
    }
}
