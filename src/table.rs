use std::fmt;
use std::io;
use std::ops::Index;

use crate::types::{Pid, Process, Time};
use crate::utils::prelude::*;

/// The fixed set of processes a scheduling run operates on.
///
/// Only `burst_left` and `wait` of each record change during a run, and both only through
/// [`ProcessTable::run_proc`]. A table is consumed destructively, so every algorithm needs
/// its own table built from the same bursts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTable {
    procs: Vec<Process>,
}

impl ProcessTable {
    /// One process per burst, in order, with PIDs assigned by position.
    ///
    /// Fails with [`Error::InvalidArgument`] when the bursts add up to more than `Time` can
    /// hold, every clock value, wait and slice end of a run is bounded by that sum. Fails with
    /// [`Error::Allocation`] when the table can not be allocated.
    pub fn init_procs(bursts: &[Time]) -> Result<Self> {
        if bursts.iter().try_fold(0 as Time, |total, &b| total.checked_add(b)).is_none() {
            return Err(Error::invalid_argument("total burst time overflows the clock"));
        }

        let mut procs = Vec::new();
        procs.try_reserve_exact(bursts.len())?;
        procs.extend(
            bursts
                .iter()
                .enumerate()
                .map(|(id, &burst)| Process::new(id, burst)),
        );
        debug!(procs.len = procs.len(), "process table initialized");
        Ok(Self { procs })
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> + '_ {
        self.procs.iter()
    }

    pub fn all_done(&self) -> bool {
        self.procs.iter().all(Process::is_done)
    }

    /// Run `current` for `amount` ticks, and let every other unfinished process wait that long.
    ///
    /// Whether a process is unfinished is decided before `current` is charged, so `current`
    /// never waits on itself and finished processes never wait. Nothing changes on error.
    pub fn run_proc(&mut self, current: Pid, amount: Time) -> Result<()> {
        let burst_left = self
            .procs
            .get(current)
            .map(Process::burst_left)
            .ok_or_else(|| Error::invalid_argument(format!("no process with PID {}", current)))?;
        if amount > burst_left {
            return Err(Error::invalid_argument(format!(
                "PID {} has {} ticks left, can not run for {}",
                current, burst_left, amount
            )));
        }

        for p in self.procs.iter_mut() {
            if p.id() == current {
                p.execute(amount);
            } else if !p.is_done() {
                p.accrue_wait(amount);
            }
        }
        trace!(pid = current, amount, "ran process");
        Ok(())
    }

    /// The next unfinished process after `current` in circular PID order.
    ///
    /// The scan covers every PID once, ending at `current` itself. `None` means all processes
    /// are done, which includes an empty table.
    pub fn rr_next(&self, current: Pid) -> Option<Pid> {
        let n = self.procs.len();
        (1..=n)
            .map(|offset| (current + offset) % n)
            .find(|&pid| !self.procs[pid].is_done())
    }

    /// Dump one line per process in table order
    pub fn printall(&self, mut writer: impl io::Write) -> io::Result<()> {
        for p in self.procs.iter() {
            writeln!(writer, "{}", p)?;
        }
        Ok(())
    }

    pub fn waits(&self) -> impl Iterator<Item = Time> + '_ {
        self.procs.iter().map(Process::wait)
    }
}

impl Index<Pid> for ProcessTable {
    type Output = Process;

    fn index(&self, pid: Pid) -> &Self::Output {
        &self.procs[pid]
    }
}

impl fmt::Display for ProcessTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.procs
            .iter()
            .try_for_each(|p| writeln!(f, "{}", p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(bursts: &[Time]) -> ProcessTable {
        ProcessTable::init_procs(bursts).unwrap()
    }

    #[test]
    fn init_assigns_pids_by_position() {
        let t = table(&[5, 0, 8]);
        assert_eq!(t.len(), 3);
        for (pid, (p, burst)) in t.iter().zip([5, 0, 8].iter()).enumerate() {
            assert_eq!(p.id(), pid);
            assert_eq!(p.burst_left(), *burst);
            assert_eq!(p.wait(), 0);
        }
    }

    #[test]
    fn init_empty() {
        let t = table(&[]);
        assert!(t.is_empty());
        assert!(t.all_done());
        assert_eq!(t.waits().count(), 0);
    }

    #[test]
    fn init_rejects_overflowing_total() {
        for bursts in [&[Time::MAX, 1][..], &[Time::MAX, Time::MAX][..], &[1, Time::MAX - 1, 1][..]].iter() {
            assert!(
                matches!(ProcessTable::init_procs(bursts), Err(Error::InvalidArgument(_))),
                "{:?}",
                bursts
            );
        }
    }

    #[test]
    fn init_accepts_total_up_to_max() {
        assert_eq!(table(&[Time::MAX]).len(), 1);
        assert_eq!(table(&[Time::MAX - 1, 1, 0]).len(), 3);
    }

    #[test]
    fn run_proc_charges_current_and_waits_others() {
        let mut t = table(&[5, 3, 0, 8]);
        t.run_proc(0, 4).unwrap();
        assert_eq!(t[0].burst_left(), 1);
        assert_eq!(t[0].wait(), 0);
        assert_eq!(t[1].wait(), 4);
        // finished processes do not wait
        assert_eq!(t[2].wait(), 0);
        assert_eq!(t[3].wait(), 4);
    }

    #[test]
    fn run_proc_finishing_process_does_not_wait() {
        let mut t = table(&[2, 3]);
        t.run_proc(0, 2).unwrap();
        t.run_proc(1, 3).unwrap();
        assert_eq!(t[0].wait(), 0);
        assert_eq!(t[1].wait(), 2);
        assert!(t.all_done());
    }

    #[test]
    fn run_proc_zero_on_done_process_is_noop() {
        let mut t = table(&[0, 3]);
        let before = t.clone();
        t.run_proc(0, 0).unwrap();
        assert_eq!(t, before);
    }

    #[test]
    fn run_proc_rejects_overrun() {
        let mut t = table(&[2, 3]);
        let before = t.clone();
        assert!(matches!(t.run_proc(0, 3), Err(Error::InvalidArgument(_))));
        assert!(matches!(t.run_proc(5, 1), Err(Error::InvalidArgument(_))));
        assert_eq!(t, before);
    }

    #[test]
    fn rr_next_skips_done() {
        let mut t = table(&[1, 0, 4, 2]);
        assert_eq!(t.rr_next(0), Some(2));
        assert_eq!(t.rr_next(3), Some(0));
        t.run_proc(0, 1).unwrap();
        t.run_proc(3, 2).unwrap();
        // only PID 2 left, found from anywhere, including itself
        assert_eq!(t.rr_next(2), Some(2));
        assert_eq!(t.rr_next(3), Some(2));
        t.run_proc(2, 4).unwrap();
        assert_eq!(t.rr_next(2), None);
    }

    #[test]
    fn rr_next_empty_table() {
        assert_eq!(table(&[]).rr_next(0), None);
    }

    #[test]
    fn printall_format() {
        let mut t = table(&[5, 3]);
        t.run_proc(1, 3).unwrap();
        let mut out = vec![];
        t.printall(&mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "PID 0: burst_left=5, wait=3\nPID 1: burst_left=0, wait=0\n");
        assert_eq!(t.to_string(), out);
    }

    #[test]
    fn printall_empty_and_read_only() {
        let t = table(&[]);
        let mut out = vec![];
        t.printall(&mut out).unwrap();
        assert!(out.is_empty());

        let t = table(&[1, 2]);
        let before = t.clone();
        t.printall(io::sink()).unwrap();
        assert_eq!(t, before);
    }
}
