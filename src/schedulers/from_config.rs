use parse_display::Display;

use super::*;

pub fn from_config(cfg: &SchedulerConfig) -> Box<dyn Scheduler + 'static> {
    info!(scheduler = %cfg, "using");
    match cfg {
        SchedulerConfig::FCFS => Box::new(Fcfs),
        SchedulerConfig::RR { quantum } => Box::new(RoundRobin::new(*quantum)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize, Display)]
#[serde(tag = "type")]
pub enum SchedulerConfig {
    #[display("FCFS")]
    FCFS,
    #[display("RR(quantum={quantum})")]
    RR { quantum: Quantum },
}

impl SchedulerConfig {
    /// Short lowercase name, used for file names
    pub fn algorithm(&self) -> &'static str {
        match self {
            SchedulerConfig::FCFS => "fcfs",
            SchedulerConfig::RR { .. } => "rr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_tagged() {
        let cfg: SchedulerConfig = serde_json::from_str(r#"{"type": "RR", "quantum": 4}"#).unwrap();
        assert_eq!(cfg.to_string(), "RR(quantum=4)");
        assert_eq!(cfg.algorithm(), "rr");

        let cfg: SchedulerConfig = serde_json::from_str(r#"{"type": "FCFS"}"#).unwrap();
        assert_eq!(cfg, SchedulerConfig::FCFS);

        assert!(serde_json::from_str::<SchedulerConfig>(r#"{"type": "RR", "quantum": 0}"#).is_err());
    }

    #[test]
    fn builds_matching_scheduler() {
        let mut table = ProcessTable::init_procs(&[5, 3, 8]).unwrap();
        let cfg = SchedulerConfig::RR {
            quantum: Quantum::new(4).unwrap(),
        };
        let schedule = from_config(&cfg).run(&mut table).unwrap();
        assert_eq!(schedule.slices.len(), 5);
    }
}
