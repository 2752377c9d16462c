use serde::Serialize;

use crate::table::ProcessTable;
use crate::types::{Pid, Quantum, Slice, Time};
use crate::utils::prelude::*;

mod fcfs;
mod from_config;
mod rr;

pub use fcfs::Fcfs;
pub use from_config::{from_config, SchedulerConfig};
pub use rr::RoundRobin;

/// A scheduling discipline, runs every process in the table to completion
pub trait Scheduler {
    fn run(&mut self, table: &mut ProcessTable) -> Result<Schedule>;
}

impl Scheduler for Box<dyn Scheduler> {
    #[inline]
    fn run(&mut self, table: &mut ProcessTable) -> Result<Schedule> {
        (**self).run(table)
    }
}

/// What happened on the CPU during one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schedule {
    /// Makespan, the end of the last slice
    pub elapsed: Time,
    /// Back to back, in execution order
    pub slices: Vec<Slice>,
}

impl Schedule {
    /// When `pid` ran for the last time, 0 if it never got any CPU time
    pub fn completion_time(&self, pid: Pid) -> Time {
        self.slices
            .iter()
            .rev()
            .find(|s| s.pid == pid && s.duration > 0)
            .map(Slice::end)
            .unwrap_or(0)
    }
}

/// Applies slices to the table while keeping the clock and the trace
struct Cpu<'a> {
    table: &'a mut ProcessTable,
    schedule: Schedule,
}

impl<'a> Cpu<'a> {
    fn new(table: &'a mut ProcessTable) -> Self {
        Self {
            table,
            schedule: Default::default(),
        }
    }

    fn dispatch(&mut self, pid: Pid, amount: Time) -> Result<()> {
        self.table.run_proc(pid, amount)?;

        let slice = Slice {
            pid,
            start: self.schedule.elapsed,
            duration: amount,
        };
        debug!(%slice, "dispatched");
        self.schedule.slices.push(slice);
        self.schedule.elapsed += amount;
        Ok(())
    }

    fn finish(self) -> Schedule {
        info!(
            elapsed = self.schedule.elapsed,
            slices.len = self.schedule.slices.len(),
            "all processes done"
        );
        self.schedule
    }
}

/// Run the table first-come-first-served, returns the total elapsed time
pub fn fcfs_run(table: &mut ProcessTable) -> Result<Time> {
    Ok(Fcfs.run(table)?.elapsed)
}

/// Run the table round-robin with the given quantum, returns the total elapsed time
pub fn rr_run(table: &mut ProcessTable, quantum: Quantum) -> Result<Time> {
    Ok(RoundRobin::new(quantum).run(table)?.elapsed)
}
