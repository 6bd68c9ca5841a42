use std::hint;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::{Error, ReportSink};

/// What a worker does after it has reported its identity.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum WorkerLoop {
    /// Spin on an empty loop forever. The worker never yields and never terminates.
    #[default]
    Forever,

    /// Spin on an empty loop for the given number of iterations, then terminate.
    Iterations(u64),
}

/// One unit of concurrent execution, not yet started.
///
/// A worker shares nothing with other workers except the report sink. Once started via
/// [`start()`][Self::start], it owns a dedicated operating system thread named after the worker
/// index, announces that thread name as its identity and then spins according to its
/// [`WorkerLoop`].
///
/// # Example
///
/// ```
/// use limit_probes::{ReportSink, Worker, WorkerLoop};
///
/// let worker = Worker::new(0, WorkerLoop::Iterations(1_000), ReportSink::stdout());
/// assert_eq!(worker.name(), "worker-0");
///
/// worker.start().unwrap().join().unwrap();
/// ```
#[derive(Debug)]
pub struct Worker {
    index: usize,
    worker_loop: WorkerLoop,
    sink: ReportSink,
}

impl Worker {
    /// Creates a worker with the given zero-based index.
    #[must_use]
    pub fn new(index: usize, worker_loop: WorkerLoop, sink: ReportSink) -> Self {
        Self {
            index,
            worker_loop,
            sink,
        }
    }

    /// The name of the thread the worker runs on, which is also the identity it reports.
    #[must_use]
    pub fn name(&self) -> String {
        format!("worker-{}", self.index)
    }

    /// Starts the worker on a new thread.
    ///
    /// Nothing ever joins the returned handle unless the caller chooses to. With
    /// [`WorkerLoop::Forever`], joining blocks forever.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SpawnFailed`] if the operating system refuses to create the thread.
    pub fn start(self) -> crate::Result<JoinHandle<()>> {
        let name = self.name();

        let Self {
            index,
            worker_loop,
            sink,
        } = self;

        thread::Builder::new()
            .name(name)
            .spawn(move || run(&sink, worker_loop))
            .map_err(|source| Error::SpawnFailed { index, source })
    }
}

fn run(sink: &ReportSink, worker_loop: WorkerLoop) {
    let current = thread::current();
    let identity = current.name().unwrap_or("<unnamed>");

    if let Err(e) = sink.worker_identity(identity) {
        warn!(identity, error = %e, "worker failed to report its identity");
    }

    debug!(identity, ?worker_loop, "worker spinning");
    spin(worker_loop);
    debug!(identity, "worker finished spinning");
}

#[cfg_attr(test, mutants::skip)] // Mutating the loop bounds can only cause hangs.
fn spin(worker_loop: WorkerLoop) {
    match worker_loop {
        WorkerLoop::Forever => loop {
            hint::spin_loop();
        },
        WorkerLoop::Iterations(iterations) => {
            for iteration in 0..iterations {
                // Keeps the optimizer from collapsing the loop into nothing.
                hint::black_box(iteration);
                hint::spin_loop();
            }
        }
    }
}
