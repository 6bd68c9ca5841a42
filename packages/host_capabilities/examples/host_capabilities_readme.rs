//! Prints the processor and memory budget of the current process.
//!
//! Try running it under constraints to see them reflected, for example:
//!
//! * `taskset 0x3 target/debug/examples/host_capabilities_readme`
//! * `systemd-run --user --scope -p CPUQuota=150% -p MemoryMax=512M \
//!   target/debug/examples/host_capabilities_readme`

use host_capabilities::HostCapabilities;

fn main() {
    let capabilities = HostCapabilities::current();

    println!("Processors: {}", capabilities.processor_count());

    if capabilities.has_memory_limit() {
        println!("Memory: {} bytes", capabilities.max_memory_bytes());
    } else {
        println!("Memory: no known limit");
    }
}
