use std::num::NonZero;
use std::thread;

use tracing::debug;

use crate::pal::Platform;

/// Fallback platform implementation for operating systems without native support.
///
/// * The processor count comes from `std::thread::available_parallelism()`, or 1 if even that
///   is unavailable.
/// * No memory ceiling is known, so `u64::MAX` is reported.
#[derive(Debug)]
pub(crate) struct BuildTargetPlatform;

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform = BuildTargetPlatform;

impl Platform for BuildTargetPlatform {
    fn available_processor_count(&self) -> NonZero<usize> {
        thread::available_parallelism().unwrap_or_else(|e| {
            debug!(error = %e, "available parallelism is unknown, assuming a single processor");
            NonZero::<usize>::MIN
        })
    }

    #[cfg_attr(test, mutants::skip)] // Constant, nothing to mutate meaningfully.
    fn max_memory_bytes(&self) -> u64 {
        u64::MAX
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn has_at_least_one_processor() {
        assert!(BUILD_TARGET_PLATFORM.available_processor_count().get() >= 1);
    }

    #[test]
    fn matches_std_parallelism() {
        if let Ok(expected) = thread::available_parallelism() {
            assert_eq!(BUILD_TARGET_PLATFORM.available_processor_count(), expected);
        }
    }

    #[test]
    fn memory_is_unlimited() {
        assert_eq!(BUILD_TARGET_PLATFORM.max_memory_bytes(), u64::MAX);
    }
}
