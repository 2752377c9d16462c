use assert_cmd::prelude::*;
use predicates::prelude::*;

use std::process::Command;

fn schedsim() -> Command {
    let mut cmd = Command::cargo_bin("schedsim").expect("Calling binary failed");
    // keep runs independent of the caller's environment
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli() {
    schedsim().assert().failure();
}

#[test]
fn test_version() {
    let expected_version = "schedsim 0.1.0\n";
    schedsim()
        .arg("--version")
        .assert()
        .stdout(expected_version);
}

#[test]
fn test_run_fcfs() {
    schedsim()
        .args(&["run", "--bursts", "5,3,8", "--algorithm", "fcfs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("== FCFS =="))
        .stdout(predicate::str::contains("PID 1: burst=3, wait=5, turnaround=8"))
        .stdout(predicate::str::contains("Total elapsed time: 16"));
}

#[test]
fn test_run_rr() {
    schedsim()
        .args(&["run", "-b", "5,3,8", "-a", "rr", "-q", "4", "--dump-table"])
        .assert()
        .success()
        .stdout(predicate::str::contains("== RR(quantum=4) =="))
        .stdout(predicate::str::contains("PID 0: burst_left=0, wait=7"))
        .stdout(predicate::str::contains("Total elapsed time: 16"));
}

#[test]
fn test_run_json() {
    schedsim()
        .args(&["run", "--bursts", "0,0,0", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"elapsed\": 0"));
}

#[test]
fn test_preset() {
    schedsim()
        .args(&["--preset", "fcfs", "run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("== FCFS =="));
}

#[test]
fn test_compare() {
    schedsim()
        .args(&["compare", "--bursts", "5,3,8", "--quantum", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Average wait time: FCFS 4.33, RR(quantum=4) 6.33",
        ));
}

#[test]
fn test_config_dump() {
    schedsim()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("quantum: 4"));
}

#[test]
fn test_rejects_zero_quantum() {
    schedsim()
        .args(&["run", "--algorithm", "rr", "--quantum", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quantum must be positive"));
}

#[test]
fn test_rejects_negative_burst() {
    schedsim()
        .args(&["run", "--bursts=5,-3,8"])
        .assert()
        .failure();
}

#[test]
fn test_rejects_overflowing_total_burst() {
    schedsim()
        .args(&["run", "--bursts", "18446744073709551615,1", "--algorithm", "fcfs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("total burst time overflows the clock"))
        .stderr(predicate::str::contains("panicked").not());

    schedsim()
        .args(&["compare", "--bursts", "18446744073709551615,18446744073709551615"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("total burst time overflows the clock"));
}

#[test]
fn test_run_total_burst_at_max() {
    schedsim()
        .args(&["run", "--bursts", "18446744073709551614,1", "--algorithm", "fcfs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total elapsed time: 18446744073709551615"));
}
