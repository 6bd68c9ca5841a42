use std::num::NonZero;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info};

use crate::{Error, ReportSink, Worker, WorkerCount, WorkerLoop};

/// How long the spawner pauses before starting each worker, unless configured otherwise.
pub const DEFAULT_SPAWN_INTERVAL: Duration = Duration::from_secs(2);

// Upper bound on handle storage reserved up front. Requested counts may be arbitrarily large.
const MAX_PREALLOCATED_HANDLES: usize = 1024;

/// Upper bound on how many workers a spawner may be asked to start.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum WorkerLimit {
    /// Any number of workers may be started.
    #[default]
    Unbounded,

    /// At most this many workers may be started.
    AtMost(NonZero<usize>),
}

/// Progress of a [`Spawner`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SpawnerState {
    /// No worker has been requested yet.
    NotStarted,

    /// Some but not all workers have been started.
    Spawning,

    /// Every requested worker has been started. Terminal.
    AllSpawned,
}

/// Starts workers one at a time, pausing for a fixed interval before each one.
///
/// The pause is simple rate limiting of thread creation. The spawner does not coordinate with
/// its workers after starting them and never waits for them to finish.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use limit_probes::{ReportSink, Spawner, SpawnerState, WorkerCount, WorkerLoop};
///
/// let mut spawner = Spawner::builder(WorkerCount::new(2))
///     .spawn_interval(Duration::from_millis(10))
///     .worker_loop(WorkerLoop::Iterations(1_000))
///     .report_to(ReportSink::stdout())
///     .build()
///     .unwrap();
///
/// let workers = spawner.spawn_all().unwrap();
/// assert_eq!(workers.len(), 2);
/// assert_eq!(spawner.state(), SpawnerState::AllSpawned);
/// #
/// # for worker in workers {
/// #     worker.join().unwrap();
/// # }
/// ```
#[derive(Debug)]
pub struct Spawner {
    worker_count: WorkerCount,
    spawn_interval: Duration,
    worker_loop: WorkerLoop,
    sink: ReportSink,

    spawned: usize,
    state: SpawnerState,
}

impl Spawner {
    /// Starts configuring a spawner that will start `worker_count` workers.
    pub fn builder(worker_count: WorkerCount) -> SpawnerBuilder {
        SpawnerBuilder::new(worker_count)
    }

    /// Current progress of the spawner.
    #[must_use]
    pub fn state(&self) -> SpawnerState {
        self.state
    }

    /// How many workers have been started so far.
    #[must_use]
    pub fn spawned_count(&self) -> usize {
        self.spawned
    }

    /// Pauses for the spawn interval and starts the next worker.
    ///
    /// Returns `Ok(None)` without pausing once every requested worker has been started.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SpawnFailed`] if the operating system refuses to create the thread. The
    /// spawner stays in its current state and the same worker index is attempted again on the
    /// next call.
    pub fn spawn_next(&mut self) -> crate::Result<Option<JoinHandle<()>>> {
        if self.spawned >= self.worker_count.get() {
            self.finish();
            return Ok(None);
        }

        self.state = SpawnerState::Spawning;

        thread::sleep(self.spawn_interval);

        let handle = Worker::new(self.spawned, self.worker_loop, self.sink.clone()).start()?;

        // Bounded by worker_count, so this never actually saturates.
        self.spawned = self.spawned.saturating_add(1);

        debug!(
            spawned = self.spawned,
            requested = self.worker_count.get(),
            "started worker"
        );

        if self.spawned == self.worker_count.get() {
            self.finish();
        }

        Ok(Some(handle))
    }

    /// Starts every remaining worker, returning their handles.
    ///
    /// The handles may be dropped to detach the workers. Nothing here joins them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SpawnFailed`] if the operating system refuses to create a thread.
    /// Workers started before the failure keep running.
    pub fn spawn_all(&mut self) -> crate::Result<Vec<JoinHandle<()>>> {
        let mut handles = Vec::with_capacity(self.handle_capacity_hint());

        while let Some(handle) = self.spawn_next()? {
            handles.push(handle);
        }

        Ok(handles)
    }

    fn handle_capacity_hint(&self) -> usize {
        self.worker_count
            .get()
            .saturating_sub(self.spawned)
            .min(MAX_PREALLOCATED_HANDLES)
    }

    fn finish(&mut self) {
        if self.state != SpawnerState::AllSpawned {
            info!(workers = self.spawned, "all workers started");
            self.state = SpawnerState::AllSpawned;
        }
    }
}

/// Configures and creates a [`Spawner`].
///
/// The defaults reproduce the behavior of a resource exhaustion probe: a two second pause before
/// each worker, workers that spin forever and no limit on the worker count.
#[derive(Debug)]
#[must_use]
pub struct SpawnerBuilder {
    worker_count: WorkerCount,
    spawn_interval: Duration,
    worker_loop: WorkerLoop,
    worker_limit: WorkerLimit,
    sink: Option<ReportSink>,
}

impl SpawnerBuilder {
    fn new(worker_count: WorkerCount) -> Self {
        Self {
            worker_count,
            spawn_interval: DEFAULT_SPAWN_INTERVAL,
            worker_loop: WorkerLoop::default(),
            worker_limit: WorkerLimit::default(),
            sink: None,
        }
    }

    /// Sets the pause before each worker is started.
    pub fn spawn_interval(mut self, spawn_interval: Duration) -> Self {
        self.spawn_interval = spawn_interval;
        self
    }

    /// Sets what each worker does after reporting its identity.
    pub fn worker_loop(mut self, worker_loop: WorkerLoop) -> Self {
        self.worker_loop = worker_loop;
        self
    }

    /// Sets an upper bound on the worker count.
    pub fn worker_limit(mut self, worker_limit: WorkerLimit) -> Self {
        self.worker_limit = worker_limit;
        self
    }

    /// Sets where workers report their identity. Defaults to standard output.
    pub fn report_to(mut self, sink: ReportSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Creates the spawner. No worker is started yet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WorkerLimitExceeded`] if the worker count is above the worker limit.
    pub fn build(self) -> crate::Result<Spawner> {
        if let WorkerLimit::AtMost(limit) = self.worker_limit {
            if self.worker_count.get() > limit.get() {
                return Err(Error::WorkerLimitExceeded {
                    requested: self.worker_count.get(),
                    limit,
                });
            }
        }

        Ok(Spawner {
            worker_count: self.worker_count,
            spawn_interval: self.spawn_interval,
            worker_loop: self.worker_loop,
            sink: self.sink.unwrap_or_else(ReportSink::stdout),
            spawned: 0,
            state: SpawnerState::NotStarted,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Instant;

    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::report::CapturedOutput;

    const SHORT_INTERVAL: Duration = Duration::from_millis(20);

    assert_impl_all!(Spawner: Send);

    fn bounded_spawner(count: usize, output: &CapturedOutput) -> Spawner {
        Spawner::builder(WorkerCount::new(count))
            .spawn_interval(SHORT_INTERVAL)
            .worker_loop(WorkerLoop::Iterations(1_000))
            .report_to(output.sink())
            .build()
            .unwrap()
    }

    fn join_all(handles: Vec<JoinHandle<()>>) {
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[test]
    fn defaults_match_exhaustion_probe() {
        let builder = Spawner::builder(WorkerCount::new(1));

        assert_eq!(builder.spawn_interval, DEFAULT_SPAWN_INTERVAL);
        assert_eq!(builder.worker_loop, WorkerLoop::Forever);
        assert_eq!(builder.worker_limit, WorkerLimit::Unbounded);
    }

    #[test]
    fn zero_workers_finishes_without_spawning() {
        let output = CapturedOutput::default();
        let mut spawner = bounded_spawner(0, &output);

        assert_eq!(spawner.state(), SpawnerState::NotStarted);

        let started = Instant::now();
        assert!(spawner.spawn_next().unwrap().is_none());

        // No pause when there is nothing to spawn.
        assert!(started.elapsed() < DEFAULT_SPAWN_INTERVAL);
        assert_eq!(spawner.state(), SpawnerState::AllSpawned);
        assert_eq!(spawner.spawned_count(), 0);
        assert!(output.lines().is_empty());
    }

    #[test]
    fn states_progress_in_order() {
        let output = CapturedOutput::default();
        let mut spawner = bounded_spawner(2, &output);

        assert_eq!(spawner.state(), SpawnerState::NotStarted);

        let first = spawner.spawn_next().unwrap().unwrap();
        assert_eq!(spawner.state(), SpawnerState::Spawning);
        assert_eq!(spawner.spawned_count(), 1);

        let second = spawner.spawn_next().unwrap().unwrap();
        assert_eq!(spawner.state(), SpawnerState::AllSpawned);
        assert_eq!(spawner.spawned_count(), 2);

        assert!(spawner.spawn_next().unwrap().is_none());
        assert_eq!(spawner.state(), SpawnerState::AllSpawned);

        join_all(vec![first, second]);
    }

    #[test]
    fn three_workers_each_report_once() {
        let output = CapturedOutput::default();
        let mut spawner = bounded_spawner(3, &output);

        let handles = spawner.spawn_all().unwrap();
        assert_eq!(handles.len(), 3);
        join_all(handles);

        let mut lines = output.lines();
        lines.sort();

        assert_eq!(
            lines,
            vec![
                "Thread worker-0".to_string(),
                "Thread worker-1".to_string(),
                "Thread worker-2".to_string(),
            ]
        );
    }

    #[test]
    fn workers_are_spaced_by_interval() {
        let output = CapturedOutput::default();
        let mut spawner = bounded_spawner(3, &output);

        let started = Instant::now();
        let handles = spawner.spawn_all().unwrap();
        let elapsed = started.elapsed();

        // The pause happens before each worker, including the first.
        assert!(elapsed >= SHORT_INTERVAL * 3, "elapsed only {elapsed:?}");

        join_all(handles);
    }

    #[test]
    fn huge_worker_count_does_not_preallocate() {
        let output = CapturedOutput::default();
        let mut spawner = bounded_spawner(usize::MAX, &output);

        assert_eq!(spawner.handle_capacity_hint(), MAX_PREALLOCATED_HANDLES);

        let first = spawner.spawn_next().unwrap().unwrap();
        assert_eq!(spawner.state(), SpawnerState::Spawning);
        assert_eq!(spawner.spawned_count(), 1);
        assert_eq!(spawner.handle_capacity_hint(), MAX_PREALLOCATED_HANDLES);

        join_all(vec![first]);
        assert_eq!(output.lines(), vec!["Thread worker-0".to_string()]);
    }

    #[test]
    fn capacity_hint_matches_small_remaining_count() {
        let output = CapturedOutput::default();
        let mut spawner = bounded_spawner(3, &output);

        assert_eq!(spawner.handle_capacity_hint(), 3);

        let first = spawner.spawn_next().unwrap().unwrap();
        assert_eq!(spawner.handle_capacity_hint(), 2);

        join_all(vec![first]);
    }

    #[test]
    fn limit_is_enforced_before_spawning() {
        let output = CapturedOutput::default();

        let result = Spawner::builder(WorkerCount::new(5))
            .worker_limit(WorkerLimit::AtMost(nz!(4)))
            .report_to(output.sink())
            .build();

        match result {
            Err(Error::WorkerLimitExceeded { requested, limit }) => {
                assert_eq!(requested, 5);
                assert_eq!(limit, nz!(4));
            }
            other => panic!("expected WorkerLimitExceeded, got {other:?}"),
        }

        assert!(output.lines().is_empty());
    }

    #[test]
    fn limit_allows_exact_count() {
        let output = CapturedOutput::default();

        let mut spawner = Spawner::builder(WorkerCount::new(2))
            .spawn_interval(SHORT_INTERVAL)
            .worker_loop(WorkerLoop::Iterations(0))
            .worker_limit(WorkerLimit::AtMost(nz!(2)))
            .report_to(output.sink())
            .build()
            .unwrap();

        join_all(spawner.spawn_all().unwrap());

        assert_eq!(output.lines().len(), 2);
    }
}
