#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Inspect the processor and memory capacity that the operating system makes available to the
//! current process.
//!
//! Hardware counts are rarely the numbers a process actually gets to use. Containers, CPU affinity
//! masks, cgroup quotas and resource limits all shrink the budget, often silently. This package
//! reports the effective budget as a single immutable snapshot:
//!
//! ```rust
//! use host_capabilities::HostCapabilities;
//!
//! let capabilities = HostCapabilities::current();
//!
//! println!("Number of processors: {}", capabilities.processor_count());
//! println!("Max memory: {} bytes", capabilities.max_memory_bytes());
//! ```
//!
//! # Processor count
//!
//! On Linux, the processor count starts from the set of processors the process is allowed to
//! execute on (as listed in `/proc/self/status`) and is then capped by any cgroup CPU quota,
//! rounded up to the next whole processor. A process restricted to 1.5 processors worth of time
//! therefore reports 2 processors. The count is never zero.
//!
//! # Max memory
//!
//! On Linux, the memory ceiling is the smallest of:
//!
//! * the physical memory installed in the system (`MemTotal` in `/proc/meminfo`),
//! * the cgroup memory limit (v1 or v2), considering every ancestor cgroup,
//! * the soft address space limit of the process (`RLIMIT_AS`).
//!
//! # Unsupported platforms
//!
//! On operating systems without native support, this package falls back to
//! `std::thread::available_parallelism()` for the processor count and reports `u64::MAX` as the
//! memory ceiling, meaning that no limit is known.
//!
//! # Testing with fake capabilities
//!
//! When the `test-util` Cargo feature is enabled, `HostCapabilities::fake()` creates a snapshot
//! with arbitrary values. Accept `HostCapabilities` as a value in your own logic instead of always
//! calling [`HostCapabilities::current()`] to make that logic testable.

mod host_capabilities;
mod pal;

pub use host_capabilities::HostCapabilities;
