use std::fmt::Debug;
use std::num::NonZero;

/// The operating system facing half of the capability query.
///
/// Implementations never fail: missing or malformed operating system data degrades to
/// "no constraint" for the affected input, after logging why.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Platform: Debug + Send + Sync + 'static {
    /// Number of processors the current process may execute on in parallel.
    fn available_processor_count(&self) -> NonZero<usize>;

    /// Maximum number of bytes the current process may allocate, `u64::MAX` if unknown.
    fn max_memory_bytes(&self) -> u64;
}
