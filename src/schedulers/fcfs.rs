use super::{Cpu, Schedule, Scheduler};
use crate::table::ProcessTable;
use crate::utils::prelude::*;

/// Runs every process to completion in PID order
#[derive(Debug, Default, Clone, Copy)]
pub struct Fcfs;

impl Scheduler for Fcfs {
    #[instrument(level = "debug", skip(self, table), fields(table.len = table.len()))]
    fn run(&mut self, table: &mut ProcessTable) -> Result<Schedule> {
        let mut cpu = Cpu::new(table);
        for pid in 0..cpu.table.len() {
            // processes with nothing left are visited anyway, for zero ticks
            let burst = cpu.table[pid].burst_left();
            cpu.dispatch(pid, burst)?;
        }
        Ok(cpu.finish())
    }
}
