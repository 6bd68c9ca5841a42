use std::num::NonZero;

use crate::pal::{Platform, PlatformFacade};

/// Snapshot of the processor and memory capacity available to the current process.
///
/// The snapshot is taken when the value is created and never changes afterwards. Operating
/// system constraints may change at runtime (e.g. a container may be resized), in which case
/// you need to call [`HostCapabilities::current()`] again to observe the new values.
///
/// # Example
///
/// ```
/// use host_capabilities::HostCapabilities;
///
/// let capabilities = HostCapabilities::current();
///
/// if capabilities.has_memory_limit() {
///     println!(
///         "{} processors, {} bytes of memory",
///         capabilities.processor_count(),
///         capabilities.max_memory_bytes()
///     );
/// } else {
///     println!("{} processors, no known memory limit", capabilities.processor_count());
/// }
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct HostCapabilities {
    processor_count: NonZero<usize>,
    max_memory_bytes: u64,
}

impl HostCapabilities {
    /// Queries the operating system for the capabilities currently available to the process.
    ///
    /// Every call performs a fresh query. Callers that want a stable view should take the
    /// snapshot once and pass it around.
    #[must_use]
    pub fn current() -> Self {
        Self::from_platform(&PlatformFacade::target())
    }

    /// Creates a snapshot with arbitrary values, for testing code that depends on the
    /// host capabilities without depending on the machine the tests happen to run on.
    ///
    /// This constructor is only available with the `test-util` feature.
    #[cfg(any(test, feature = "test-util"))]
    #[must_use]
    pub fn fake(processor_count: NonZero<usize>, max_memory_bytes: u64) -> Self {
        Self {
            processor_count,
            max_memory_bytes,
        }
    }

    pub(crate) fn from_platform(platform: &impl Platform) -> Self {
        Self {
            processor_count: platform.available_processor_count(),
            max_memory_bytes: platform.max_memory_bytes(),
        }
    }

    /// How many processors the process may execute on in parallel.
    ///
    /// This accounts for processor affinity and for any processor time quota, rounded up to
    /// the next whole processor.
    #[must_use]
    #[inline]
    pub fn processor_count(&self) -> NonZero<usize> {
        self.processor_count
    }

    /// The maximum number of bytes of memory the process may allocate.
    ///
    /// `u64::MAX` means that no limit is known.
    #[must_use]
    #[inline]
    pub fn max_memory_bytes(&self) -> u64 {
        self.max_memory_bytes
    }

    /// Whether any memory ceiling was detected.
    #[must_use]
    #[inline]
    pub fn has_memory_limit(&self) -> bool {
        self.max_memory_bytes != u64::MAX
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use new_zealand::nz;
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::pal::MockPlatform;

    assert_impl_all!(HostCapabilities: Send, Sync, Copy);

    #[test]
    fn snapshot_reflects_platform() {
        let mut platform = MockPlatform::new();
        platform
            .expect_available_processor_count()
            .times(1)
            .return_const(nz!(6_usize));
        platform
            .expect_max_memory_bytes()
            .times(1)
            .return_const(1_073_741_824_u64);

        let capabilities = HostCapabilities::from_platform(&PlatformFacade::from_mock(platform));

        assert_eq!(capabilities.processor_count().get(), 6);
        assert_eq!(capabilities.max_memory_bytes(), 1_073_741_824);
        assert!(capabilities.has_memory_limit());
    }

    #[test]
    fn unlimited_memory_is_reported_as_no_limit() {
        let capabilities = HostCapabilities::fake(nz!(1), u64::MAX);

        assert!(!capabilities.has_memory_limit());
    }

    #[test]
    fn fallback_platform_yields_usable_snapshot() {
        let capabilities = HostCapabilities::from_platform(&PlatformFacade::fallback());

        assert!(capabilities.processor_count().get() >= 1);
        assert!(!capabilities.has_memory_limit());
    }

    #[cfg(not(miri))] // Real platform is not supported under Miri.
    #[test]
    fn current_is_consistent_between_calls() {
        let first = HostCapabilities::current();
        let second = HostCapabilities::current();

        // Nothing in the test environment should be resizing us between two calls.
        assert_eq!(first.processor_count(), second.processor_count());
        assert!(first.max_memory_bytes() > 0);
    }
}
