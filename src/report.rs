use serde::Serialize;
use statrs::statistics::Statistics;

use crate::schedulers::{Schedule, SchedulerConfig};
use crate::table::ProcessTable;
use crate::types::{Pid, Time};

/// Final state of one process after a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessReport {
    pub pid: Pid,
    pub burst: Time,
    pub wait: Time,
    /// Completion time, as every process arrives at 0
    pub turnaround: Time,
}

/// Summary of one scheduling run
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub algorithm: SchedulerConfig,
    pub elapsed: Time,
    pub processes: Vec<ProcessReport>,
    pub average_wait: f64,
    pub wait_std_dev: f64,
    pub average_turnaround: f64,
    pub schedule: Schedule,
    /// Final state of the table the run operated on
    #[serde(skip)]
    pub table: ProcessTable,
}

impl Report {
    pub fn new(algorithm: SchedulerConfig, bursts: &[Time], table: ProcessTable, schedule: Schedule) -> Self {
        let processes: Vec<_> = table
            .iter()
            .zip(bursts)
            .map(|(p, &burst)| ProcessReport {
                pid: p.id(),
                burst,
                wait: p.wait(),
                turnaround: schedule.completion_time(p.id()),
            })
            .collect();

        let waits: Vec<f64> = processes.iter().map(|p| p.wait as f64).collect();
        let turnarounds: Vec<f64> = processes
            .iter()
            .map(|p| p.turnaround as f64)
            .collect();

        Self {
            algorithm,
            elapsed: schedule.elapsed,
            average_wait: mean(&waits),
            wait_std_dev: if waits.len() < 2 { 0.0 } else { waits.iter().std_dev() },
            average_turnaround: mean(&turnarounds),
            processes,
            schedule,
            table,
        }
    }
}

/// statrs gives NaN for no data, which reads badly in a report
fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        0.0
    } else {
        data.iter().mean()
    }
}
