//! Benchmarking the capability query exposed by `HostCapabilities`.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use criterion::{Criterion, criterion_group, criterion_main};
use host_capabilities::HostCapabilities;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("HostCapabilities");

    // Every call reads a handful of virtual files. This should stay in the microseconds,
    // anything more suggests we are walking far more of the cgroup tree than expected.
    group.bench_function("current", |b| {
        b.iter(HostCapabilities::current);
    });

    group.finish();
}
