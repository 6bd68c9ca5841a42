#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point for the `spawn-threads` probe.
//!
//! Covered by the integration tests in `tests/integration_tests.rs` rather than by unit tests.

use std::num::NonZero;
use std::process::ExitCode;
use std::time::Duration;

use argh::FromArgs;
use host_capabilities::HostCapabilities;
use limit_probes::{ReportSink, SpawnThreadsInput, init_logging, spawn_threads};
use tracing::warn;

/// Starts worker threads that spin forever, pausing before each one. Stop it with Ctrl+C.
#[derive(FromArgs)]
struct Args {
    /// how many worker threads to start
    #[argh(positional)]
    worker_count: Option<String>,

    /// milliseconds to pause before starting each worker
    #[argh(option, default = "2000")]
    spawn_interval_ms: u64,

    /// stop each worker after this many spin iterations instead of spinning forever
    #[argh(option)]
    spin_iterations: Option<u64>,

    /// refuse to start more than this many workers
    #[argh(option)]
    max_workers: Option<NonZero<usize>>,

    /// log diagnostics at debug level to standard error
    #[argh(switch, short = 'v')]
    verbose: bool,
}

#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    let args: Args = argh::from_env();

    init_logging(args.verbose);

    let input = SpawnThreadsInput {
        worker_count: args.worker_count,
        spawn_interval: Duration::from_millis(args.spawn_interval_ms),
        spin_iterations: args.spin_iterations,
        max_workers: args.max_workers,
    };

    let workers = match spawn_threads(&input, &HostCapabilities::current(), &ReportSink::stdout()) {
        Ok(workers) => workers,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    // The process lives for as long as any worker does.
    let mut all_succeeded = true;

    for worker in workers {
        let name = worker.thread().name().unwrap_or_default().to_string();

        if worker.join().is_err() {
            warn!(worker = name, "worker panicked");
            all_succeeded = false;
        }
    }

    if all_succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
