use std::fmt::Debug;
use std::io;

use libc::{rlim_t, rlimit};

use crate::pal::linux::Bindings;

/// FFI bindings that target the real operating system that the build is targeting.
///
/// You would only use different bindings in PAL unit tests that need to use mock bindings.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

// Real OS bindings are excluded from coverage measurement because:
// 1. They are tested via integration tests running on actual Linux.
// 2. Error paths require OS-level failures that are impractical to trigger in tests.
#[cfg_attr(coverage_nightly, coverage(off))]
impl Bindings for BuildTargetBindings {
    fn getrlimit_address_space(&self) -> Result<rlim_t, io::Error> {
        let mut limit = rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };

        // SAFETY: No safety requirements beyond passing valid arguments.
        let result = unsafe { libc::getrlimit(libc::RLIMIT_AS, &raw mut limit) };

        if result == 0 {
            Ok(limit.rlim_cur)
        } else {
            Err(io::Error::last_os_error())
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn address_space_limit_is_queryable() {
        let limit = BuildTargetBindings.getrlimit_address_space().unwrap();

        // Either unlimited or some real value, never zero for a running process.
        assert!(limit == libc::RLIM_INFINITY || limit > 0);
    }
}
