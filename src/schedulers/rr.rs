use std::cmp::min;

use super::{Cpu, Schedule, Scheduler};
use crate::table::ProcessTable;
use crate::types::Quantum;
use crate::utils::prelude::*;

/// Time-sliced rotation in circular PID order.
///
/// The process that just ran goes to the back, the next one is always the first unfinished
/// process after it, no matter how much work or waiting any process has.
#[derive(Debug, Clone, Copy)]
pub struct RoundRobin {
    quantum: Quantum,
}

impl RoundRobin {
    pub fn new(quantum: Quantum) -> Self {
        Self { quantum }
    }
}

impl Scheduler for RoundRobin {
    #[instrument(
        level = "debug",
        skip(self, table),
        fields(
            %self.quantum,
            table.len = table.len()
        )
    )]
    fn run(&mut self, table: &mut ProcessTable) -> Result<Schedule> {
        let mut cpu = Cpu::new(table);
        // the selector needs at least one process to scan
        if cpu.table.is_empty() {
            return Ok(cpu.finish());
        }

        let mut current = 0;
        loop {
            let burst_left = cpu.table[current].burst_left();
            if burst_left > 0 {
                cpu.dispatch(current, min(self.quantum.get(), burst_left))?;
            }

            match cpu.table.rr_next(current) {
                Some(next) => current = next,
                None => break,
            }
        }
        Ok(cpu.finish())
    }
}
