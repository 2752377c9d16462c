use std::convert::TryFrom;
use std::num::NonZeroU64;

use parse_display::Display;
use serde::{Deserialize, Serialize};

use crate::utils::{Error, Result};

/// A time point or a duration in simulation, in abstract ticks
pub type Time = u64;

/// Process ID, which is also the index in the process table
pub type Pid = usize;

/// One schedulable unit of work
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display("PID {id}: burst_left={burst_left}, wait={wait}")]
pub struct Process {
    id: Pid,
    burst_left: Time,
    wait: Time,
}

impl Process {
    pub(crate) fn new(id: Pid, burst: Time) -> Self {
        Self {
            id,
            burst_left: burst,
            wait: 0,
        }
    }

    pub fn id(&self) -> Pid {
        self.id
    }

    /// CPU time still required
    pub fn burst_left(&self) -> Time {
        self.burst_left
    }

    /// Time spent ready but not running, frozen once the process completes
    pub fn wait(&self) -> Time {
        self.wait
    }

    pub fn is_done(&self) -> bool {
        self.burst_left == 0
    }

    pub(crate) fn execute(&mut self, amount: Time) {
        debug_assert!(amount <= self.burst_left);
        self.burst_left -= amount;
    }

    pub(crate) fn accrue_wait(&mut self, amount: Time) {
        self.wait += amount;
    }
}

/// Round-Robin time slice, always at least one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
#[display("{0}")]
pub struct Quantum(NonZeroU64);

impl Quantum {
    pub fn new(ticks: Time) -> Result<Self> {
        NonZeroU64::new(ticks)
            .map(Self)
            .ok_or_else(|| Error::invalid_argument("quantum must be positive"))
    }

    pub fn get(self) -> Time {
        self.0.get()
    }
}

impl TryFrom<u64> for Quantum {
    type Error = Error;

    fn try_from(ticks: u64) -> Result<Self> {
        Self::new(ticks)
    }
}

impl From<Quantum> for u64 {
    fn from(q: Quantum) -> Self {
        q.get()
    }
}

/// A contiguous stretch of CPU time given to one process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[display("[{start}, +{duration}) -> PID {pid}")]
pub struct Slice {
    pub pid: Pid,
    pub start: Time,
    pub duration: Time,
}

impl Slice {
    pub fn end(&self) -> Time {
        self.start + self.duration
    }
}
