//! Integration tests for the probe binaries.
//!
//! These run the real binaries against the real platform, so they only assert on the structure
//! of the output, never on specific processor or memory values.

#![cfg(not(miri))]

use std::process::{Command, Output};
use std::time::{Duration, Instant};

fn print_resources(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_print-resources"))
        .args(args)
        .output()
        .unwrap()
}

fn spawn_threads(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spawn-threads"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8(output.stdout.clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Parses the number at the end of `line` after `prefix`, ignoring `suffix`.
fn number_after(line: &str, prefix: &str, suffix: &str) -> u64 {
    line.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(suffix))
        .unwrap_or_else(|| panic!("unexpected line: {line}"))
        .parse()
        .unwrap()
}

#[test]
fn print_resources_reports_two_lines() {
    let output = print_resources(&[]);

    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2, "{lines:?}");

    let processors = number_after(lines.first().unwrap(), "Number of processors: ", "");
    assert!(processors >= 1);

    let memory = number_after(lines.get(1).unwrap(), "Max memory: ", " bytes");
    assert!(memory > 0);
}

#[test]
fn print_resources_is_stable_across_runs() {
    let first = stdout_lines(&print_resources(&[]));
    let second = stdout_lines(&print_resources(&[]));

    assert_eq!(first, second);
}

#[test]
fn print_resources_verbose_keeps_stdout_clean() {
    let output = print_resources(&["--verbose"]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 2);
}

#[test]
fn spawn_threads_rejects_non_numeric_count() {
    let output = spawn_threads(&["abc"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("invalid argument"), "{stderr}");
}

#[test]
fn spawn_threads_rejects_missing_count() {
    let output = spawn_threads(&[]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn spawn_threads_with_zero_workers_exits_immediately() {
    let started = Instant::now();
    let output = spawn_threads(&["0"]);

    assert!(output.status.success());
    assert!(started.elapsed() < Duration::from_secs(2));

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines.first().unwrap().starts_with("Number of processors: "));
}

#[test]
fn spawn_threads_accepts_explicit_plus_sign() {
    let output = spawn_threads(&["+0"]);

    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 1);
}

#[test]
fn spawn_threads_starts_each_worker_once() {
    let started = Instant::now();
    let output = spawn_threads(&["3", "--spawn-interval-ms", "50", "--spin-iterations", "1000"]);
    let elapsed = started.elapsed();

    assert!(output.status.success());
    assert!(elapsed >= Duration::from_millis(150), "elapsed only {elapsed:?}");

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 4, "{lines:?}");
    assert!(lines.first().unwrap().starts_with("Number of processors: "));

    let mut identities = lines.get(1..).unwrap().to_vec();
    identities.sort();
    assert_eq!(
        identities,
        vec![
            "Thread worker-0".to_string(),
            "Thread worker-1".to_string(),
            "Thread worker-2".to_string(),
        ]
    );
}

#[test]
fn spawn_threads_enforces_worker_limit() {
    let output = spawn_threads(&["5", "--max-workers", "4"]);

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("at most 4"), "{stderr}");
}
