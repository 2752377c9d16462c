use crate::schedulers::Scheduler;
use crate::utils::prelude::*;

pub mod output;
pub mod report;
pub mod schedulers;
pub mod table;
pub mod types;
pub mod utils;
pub mod workload;

pub use crate::report::{ProcessReport, Report};
pub use crate::schedulers::{fcfs_run, rr_run, Schedule, SchedulerConfig};
pub use crate::table::ProcessTable;
pub use crate::types::{Pid, Process, Quantum, Slice, Time};

/// Everything a run needs, fetched from the global config
#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct SimConfig {
    pub workload: workload::WorkloadConfig,
    pub scheduler: SchedulerConfig,
    pub output: output::OutputConfig,
}

/// Run one algorithm on a fresh table built from `bursts`
pub fn simulate(bursts: &[Time], scheduler: &SchedulerConfig) -> Result<Report> {
    let _g = info_span!("simulate", %scheduler).entered();

    let mut table = ProcessTable::init_procs(bursts)?;
    let schedule = schedulers::from_config(scheduler).run(&mut table)?;
    Ok(Report::new(*scheduler, bursts, table, schedule))
}

/// Run FCFS and RR side by side, each on its own table
pub fn compare(bursts: &[Time], quantum: Quantum) -> Result<Vec<Report>> {
    [SchedulerConfig::FCFS, SchedulerConfig::RR { quantum }]
        .iter()
        .map(|scheduler| simulate(bursts, scheduler))
        .collect()
}

/// Run end-to-end as configured and render the outputs
pub fn run_sim(cfg: &SimConfig) -> Result<Report> {
    let _g = info_span!("sim").entered();

    let bursts = workload::bursts(&cfg.workload)?;
    let report = simulate(&bursts, &cfg.scheduler)?;

    {
        let _g = info_span!("output").entered();
        output::render(&report, &cfg.output, std::io::stdout().lock())?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_uses_independent_tables() {
        let reports = compare(&[5, 3, 8], Quantum::new(4).unwrap()).unwrap();
        assert_eq!(reports.len(), 2);

        let fcfs = &reports[0];
        assert_eq!(fcfs.algorithm, SchedulerConfig::FCFS);
        assert_eq!(fcfs.elapsed, 16);
        let waits: Vec<_> = fcfs.processes.iter().map(|p| p.wait).collect();
        assert_eq!(waits, vec![0, 5, 8]);

        let rr = &reports[1];
        assert_eq!(rr.elapsed, 16);
        let waits: Vec<_> = rr.processes.iter().map(|p| p.wait).collect();
        assert_eq!(waits, vec![7, 4, 8]);
    }

    #[test]
    fn sim_config_deserialize() {
        let cfg: SimConfig = serde_json::from_str(
            r#"{
                "workload": {"type": "Fixed", "bursts": [1, 2]},
                "scheduler": {"type": "RR", "quantum": 1},
                "output": {"format": "json"}
            }"#,
        )
        .unwrap();
        assert_eq!(workload::bursts(&cfg.workload).unwrap(), vec![1, 2]);
        assert_eq!(cfg.scheduler.algorithm(), "rr");
        assert_eq!(cfg.output.format, output::Format::Json);
    }
}
