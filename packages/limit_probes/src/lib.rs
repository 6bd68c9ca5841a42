#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Diagnostic probes for the resource limits of a host or container.
//!
//! Two binaries are built from this package:
//!
//! * `print-resources` prints how many processors and how much memory the process may use.
//! * `spawn-threads N` starts `N` worker threads, pausing two seconds before each one. Every
//!   worker announces its thread name and then spins on an empty loop forever. This is a
//!   deliberate resource exhaustion probe: run it under a container or cgroup limit and watch
//!   how the limit is enforced.
//!
//! ```text
//! $ spawn-threads 3
//! Number of processors: 8
//! Thread worker-0
//! Thread worker-1
//! Thread worker-2
//! ^C
//! ```
//!
//! The library exposes the same building blocks for use in tests and custom harnesses. The
//! unbounded behavior of the binaries is the default, but the worker loop and the worker count
//! can be bounded explicitly:
//!
//! ```rust
//! use std::time::Duration;
//!
//! use limit_probes::{ReportSink, Spawner, WorkerCount, WorkerLimit, WorkerLoop};
//! use new_zealand::nz;
//!
//! let mut spawner = Spawner::builder(WorkerCount::new(4))
//!     .spawn_interval(Duration::from_millis(1))
//!     .worker_loop(WorkerLoop::Iterations(10_000))
//!     .worker_limit(WorkerLimit::AtMost(nz!(16)))
//!     .report_to(ReportSink::stdout())
//!     .build()
//!     .unwrap();
//!
//! for worker in spawner.spawn_all().unwrap() {
//!     worker.join().unwrap();
//! }
//! ```

mod error;
mod logging;
mod probes;
mod report;
mod spawner;
mod worker;
mod worker_count;

pub use error::*;
pub use logging::*;
pub use probes::*;
pub use report::*;
pub use spawner::*;
pub use worker::*;
pub use worker_count::*;
