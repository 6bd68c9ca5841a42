use std::io;

use tracing::Level;

/// Installs the diagnostic log subscriber for a probe binary.
///
/// Diagnostics go to standard error so they never mix with the report on standard output.
/// Only warnings and errors are shown unless `verbose` is set, in which case debug events are
/// shown as well.
///
/// If a global subscriber is already installed, it is kept.
#[cfg_attr(test, mutants::skip)] // Only observable via process-global state.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    // Fails only if a global subscriber is already set.
    drop(
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .with_thread_names(true)
            .try_init(),
    );
}
