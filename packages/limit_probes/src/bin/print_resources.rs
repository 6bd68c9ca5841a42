#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point for the `print-resources` probe.
//!
//! Covered by the integration tests in `tests/integration_tests.rs` rather than by unit tests.

use std::process::ExitCode;

use argh::FromArgs;
use host_capabilities::HostCapabilities;
use limit_probes::{ReportSink, init_logging, print_resources};

/// Prints how many processors and how much memory this process may use.
#[derive(FromArgs)]
struct Args {
    /// log diagnostics at debug level to standard error
    #[argh(switch, short = 'v')]
    verbose: bool,
}

#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    let args: Args = argh::from_env();

    init_logging(args.verbose);

    match print_resources(&HostCapabilities::current(), &ReportSink::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
