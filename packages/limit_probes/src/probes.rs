// Entry points of the two probe binaries, extracted from `main()` for testability.

use std::num::NonZero;
use std::thread::JoinHandle;
use std::time::Duration;

use host_capabilities::HostCapabilities;
use tracing::debug;

use crate::{ReportSink, Spawner, WorkerCount, WorkerLimit, WorkerLoop};

/// Reports the processor count and the maximum memory of the host.
///
/// # Errors
///
/// Returns [`Error::Output`][crate::Error::Output] if the report cannot be written.
pub fn print_resources(capabilities: &HostCapabilities, sink: &ReportSink) -> crate::Result<()> {
    sink.processor_count(capabilities)?;
    sink.max_memory(capabilities)?;

    Ok(())
}

/// Input parameters for [`spawn_threads`].
///
/// This is the parsed command line that the core logic operates on.
#[doc(hidden)]
#[derive(Debug)]
#[allow(
    clippy::exhaustive_structs,
    reason = "This is a hidden struct for internal/test use only"
)]
pub struct SpawnThreadsInput {
    /// The worker count exactly as received, not yet validated.
    pub worker_count: Option<String>,
    /// Pause before each worker is started.
    pub spawn_interval: Duration,
    /// Bound on each worker's spin loop, `None` to spin forever.
    pub spin_iterations: Option<u64>,
    /// Bound on the worker count, `None` for no bound.
    pub max_workers: Option<NonZero<usize>>,
}

/// Validates the input, reports the processor count and starts the requested workers.
///
/// The worker count is validated before anything is written, so invalid input produces no
/// report at all. The returned handles are never joined here.
///
/// # Errors
///
/// * [`Error::InvalidArgument`][crate::Error::InvalidArgument] if the worker count is missing or
///   malformed.
/// * [`Error::WorkerLimitExceeded`][crate::Error::WorkerLimitExceeded] if the worker count is
///   above `max_workers`.
/// * [`Error::SpawnFailed`][crate::Error::SpawnFailed] if a worker thread cannot be created.
/// * [`Error::Output`][crate::Error::Output] if the report cannot be written.
pub fn spawn_threads(
    input: &SpawnThreadsInput,
    capabilities: &HostCapabilities,
    sink: &ReportSink,
) -> crate::Result<Vec<JoinHandle<()>>> {
    let worker_count = WorkerCount::from_argument(input.worker_count.as_deref())?;

    let worker_loop = input
        .spin_iterations
        .map_or(WorkerLoop::Forever, WorkerLoop::Iterations);
    let worker_limit = input
        .max_workers
        .map_or(WorkerLimit::Unbounded, WorkerLimit::AtMost);

    let mut spawner = Spawner::builder(worker_count)
        .spawn_interval(input.spawn_interval)
        .worker_loop(worker_loop)
        .worker_limit(worker_limit)
        .report_to(sink.clone())
        .build()?;

    sink.processor_count(capabilities)?;

    debug!(
        %worker_count,
        interval_ms = input.spawn_interval.as_millis(),
        ?worker_loop,
        "spawning workers"
    );

    spawner.spawn_all()
}
