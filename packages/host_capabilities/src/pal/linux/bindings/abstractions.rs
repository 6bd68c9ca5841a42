use std::fmt::Debug;
use std::io;

use libc::rlim_t;

/// Bindings for FFI calls into the operating system.
///
/// All PAL FFI calls must go through this trait, enabling them to be mocked.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Bindings: Debug + Send + Sync + 'static {
    // getrlimit(RLIMIT_AS), soft limit only
    fn getrlimit_address_space(&self) -> Result<rlim_t, io::Error>;
}
