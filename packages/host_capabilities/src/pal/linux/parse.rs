//! Parsers for the virtual files that describe process limits on Linux.
//!
//! These are pure functions over file contents. Whether a file exists at all is the caller's
//! concern; here we only decide what the content means.

use std::iter;
use std::num::NonZero;

use thiserror::Error;

/// Period used by the kernel when `cpu.max` lists only the quota.
const DEFAULT_CPU_PERIOD_US: NonZero<u64> = new_zealand::nz!(100_000);

const BYTES_PER_KIB: u64 = 1024;

/// A virtual file held content we do not know how to interpret.
#[derive(Debug, Error)]
#[error("{file} contains unexpected content '{content}': {problem}")]
pub(crate) struct MalformedContent {
    file: &'static str,
    content: String,
    problem: &'static str,
}

impl MalformedContent {
    fn new(file: &'static str, content: &str, problem: &'static str) -> Self {
        Self {
            file,
            content: content.to_string(),
            problem,
        }
    }
}

type Result<T> = std::result::Result<T, MalformedContent>;

/// One line of `/proc/self/cgroup`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum CgroupMembership {
    /// A cgroup v1 hierarchy with the listed controllers (e.g. `cpu`, `cpuacct`, `memory`).
    V1 { controllers: Vec<String>, name: String },

    /// The unified cgroup v2 hierarchy.
    V2 { name: String },
}

impl CgroupMembership {
    pub(crate) fn name(&self) -> &str {
        match self {
            Self::V1 { name, .. } | Self::V2 { name } => name,
        }
    }

    pub(crate) fn is_v1_with_controller(&self, controller: &str) -> bool {
        match self {
            Self::V1 { controllers, .. } => controllers.iter().any(|c| c == controller),
            Self::V2 { .. } => false,
        }
    }
}

/// A CPU bandwidth limit: `quota_us` of processor time per `period_us` of real time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CpuQuota {
    quota_us: u64,
    period_us: NonZero<u64>,
}

impl CpuQuota {
    pub(crate) fn new(quota_us: u64, period_us: NonZero<u64>) -> Self {
        Self {
            quota_us,
            period_us,
        }
    }

    /// Whole processors worth of time, rounded up. Never zero.
    pub(crate) fn processor_count(self) -> NonZero<usize> {
        let whole = self.quota_us.div_ceil(self.period_us.get());
        let whole = usize::try_from(whole).unwrap_or(usize::MAX);

        NonZero::new(whole).unwrap_or(NonZero::<usize>::MIN)
    }
}

/// Parses `/proc/self/cgroup`, skipping lines that do not have the expected three fields.
pub(crate) fn cgroup_memberships(contents: &str) -> Vec<CgroupMembership> {
    contents
        .lines()
        .map(str::trim)
        .filter_map(|line| {
            // Example content:
            // 12:cpu,cpuacct:/docker/4a3f
            // 11:memory:/docker/4a3f
            // 1:name=systemd:/docker/4a3f
            // 0::/user.slice/user-1000.slice/session-2.scope
            let mut parts = line.splitn(3, ':');
            let hierarchy_id = parts.next()?;
            let controllers = parts.next()?;
            let path = parts.next()?;

            let name = path.trim_start_matches('/').to_string();

            if hierarchy_id == "0" && controllers.is_empty() {
                Some(CgroupMembership::V2 { name })
            } else {
                Some(CgroupMembership::V1 {
                    controllers: controllers.split(',').map(str::to_string).collect(),
                    name,
                })
            }
        })
        .collect()
}

/// Yields the cgroup name itself followed by each of its ancestors, ending with the root ("").
pub(crate) fn self_and_ancestors(name: &str) -> impl Iterator<Item = &str> {
    iter::successors(Some(name), |current| {
        if current.is_empty() {
            None
        } else {
            Some(current.rsplit_once('/').map_or("", |(parent, _)| parent))
        }
    })
}

/// Parses cgroup v2 `cpu.max`. `Ok(None)` means no quota.
pub(crate) fn v2_cpu_max(contents: &str) -> Result<Option<CpuQuota>> {
    const FILE: &str = "cpu.max";

    let contents = contents.trim();
    let mut fields = contents.split_whitespace();

    let quota = fields
        .next()
        .ok_or_else(|| MalformedContent::new(FILE, contents, "file is empty"))?;

    if quota == "max" {
        return Ok(None);
    }

    let quota_us = quota
        .parse::<u64>()
        .map_err(|_| MalformedContent::new(FILE, contents, "quota is not an integer"))?;

    let period_us = match fields.next() {
        Some(period) => period.parse::<NonZero<u64>>().map_err(|_| {
            MalformedContent::new(FILE, contents, "period is not a positive integer")
        })?,
        None => DEFAULT_CPU_PERIOD_US,
    };

    Ok(Some(CpuQuota::new(quota_us, period_us)))
}

/// Parses the cgroup v1 `cpu.cfs_quota_us` and `cpu.cfs_period_us` pair. `Ok(None)` means no
/// quota. A negative quota (conventionally -1) is how v1 says "unlimited".
pub(crate) fn v1_cpu_quota(quota: &str, period: &str) -> Result<Option<CpuQuota>> {
    let quota = quota.trim();
    let period = period.trim();

    let quota_us = quota.parse::<i64>().map_err(|_| {
        MalformedContent::new("cpu.cfs_quota_us", quota, "quota is not an integer")
    })?;

    let Ok(quota_us) = u64::try_from(quota_us) else {
        return Ok(None);
    };

    let period_us = period.parse::<NonZero<u64>>().map_err(|_| {
        MalformedContent::new("cpu.cfs_period_us", period, "period is not a positive integer")
    })?;

    Ok(Some(CpuQuota::new(quota_us, period_us)))
}

/// Parses cgroup v2 `memory.max`. `Ok(None)` means no limit.
pub(crate) fn v2_memory_max(contents: &str) -> Result<Option<u64>> {
    let contents = contents.trim();

    if contents == "max" {
        return Ok(None);
    }

    contents
        .parse::<u64>()
        .map(Some)
        .map_err(|_| MalformedContent::new("memory.max", contents, "limit is not an integer"))
}

/// Parses cgroup v1 `memory.limit_in_bytes`.
///
/// There is no explicit "unlimited" marker in v1. An unlimited cgroup reports a huge number
/// that is larger than any real memory size, so it naturally loses to the physical memory size.
pub(crate) fn v1_memory_limit(contents: &str) -> Result<u64> {
    let contents = contents.trim();

    contents.parse::<u64>().map_err(|_| {
        MalformedContent::new("memory.limit_in_bytes", contents, "limit is not an integer")
    })
}

/// Extracts `MemTotal` from `/proc/meminfo`, converted to bytes.
pub(crate) fn meminfo_total_bytes(contents: &str) -> Result<u64> {
    const FILE: &str = "/proc/meminfo";

    // Example content:
    // MemTotal:       16318100 kB
    // MemFree:         9213952 kB
    // MemAvailable:   13425172 kB
    let value = contents
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find_map(|(key, value)| (key.trim() == "MemTotal").then_some(value.trim()))
        .ok_or_else(|| MalformedContent::new(FILE, "", "MemTotal not found"))?;

    let kib = value
        .strip_suffix("kB")
        .unwrap_or(value)
        .trim()
        .parse::<u64>()
        .map_err(|_| MalformedContent::new(FILE, value, "MemTotal is not an integer"))?;

    Ok(kib.saturating_mul(BYTES_PER_KIB))
}

/// Counts the processors in `Cpus_allowed_list` from `/proc/self/status`.
pub(crate) fn allowed_processor_count(status: &str) -> Result<NonZero<usize>> {
    const FILE: &str = "/proc/self/status";

    // Example content:
    // Cpus_allowed:   ffffffff
    // Cpus_allowed_list:      0-31
    // Mems_allowed:   1
    let cpus_allowed_list = status
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find_map(|(key, value)| (key.trim() == "Cpus_allowed_list").then_some(value.trim()))
        .ok_or_else(|| MalformedContent::new(FILE, "", "Cpus_allowed_list not found"))?;

    let processors = cpulist::parse(cpus_allowed_list).map_err(|_| {
        MalformedContent::new(FILE, cpus_allowed_list, "Cpus_allowed_list is not a cpulist")
    })?;

    NonZero::new(processors.len())
        .ok_or_else(|| MalformedContent::new(FILE, cpus_allowed_list, "no processors allowed"))
}
