use std::num::NonZero;

use tracing::{debug, warn};

use crate::pal::Platform;
use crate::pal::linux::parse::{self, CgroupMembership, CpuQuota};
use crate::pal::linux::{Bindings, BindingsFacade, Filesystem, FilesystemFacade};

/// Singleton instance of `BuildTargetPlatform`, used by public API types
/// to hook up to the correct PAL implementation.
pub(crate) static BUILD_TARGET_PLATFORM: BuildTargetPlatform =
    BuildTargetPlatform::new(BindingsFacade::target(), FilesystemFacade::target());

/// The platform that matches the crate's build target.
///
/// You would only use a different platform in unit tests that need to mock the platform.
#[derive(Debug)]
pub(crate) struct BuildTargetPlatform {
    bindings: BindingsFacade,
    fs: FilesystemFacade,
}

impl Platform for BuildTargetPlatform {
    fn available_processor_count(&self) -> NonZero<usize> {
        let allowed = parse::allowed_processor_count(&self.fs.get_proc_self_status_contents())
            .expect("platform provided invalid Cpus_allowed_list - cannot continue execution");

        match self.cgroup_cpu_quota_processor_count() {
            Some(quota) if quota < allowed => {
                debug!(
                    allowed = allowed.get(),
                    quota = quota.get(),
                    "processor count limited by cgroup CPU quota"
                );
                quota
            }
            _ => allowed,
        }
    }

    fn max_memory_bytes(&self) -> u64 {
        [
            self.physical_memory_bytes(),
            self.cgroup_memory_limit_bytes(),
            self.address_space_limit_bytes(),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(u64::MAX)
    }
}

impl BuildTargetPlatform {
    pub(super) const fn new(bindings: BindingsFacade, fs: FilesystemFacade) -> Self {
        Self { bindings, fs }
    }

    fn cgroup_memberships(&self) -> Vec<CgroupMembership> {
        self.fs
            .get_proc_self_cgroup()
            .map(|contents| parse::cgroup_memberships(&contents))
            .unwrap_or_else(|| {
                debug!("process is not in any cgroup");
                Vec::new()
            })
    }

    /// The tightest CPU quota found on the process cgroup or any of its ancestors, expressed as
    /// whole processors. `None` if no quota applies.
    fn cgroup_cpu_quota_processor_count(&self) -> Option<NonZero<usize>> {
        self.cgroup_memberships()
            .iter()
            .flat_map(|membership| {
                parse::self_and_ancestors(membership.name())
                    .filter_map(|name| self.cpu_quota(membership, name))
                    .collect::<Vec<_>>()
            })
            .map(CpuQuota::processor_count)
            .min()
    }

    fn cpu_quota(&self, membership: &CgroupMembership, cgroup_name: &str) -> Option<CpuQuota> {
        let parsed = match membership {
            CgroupMembership::V2 { .. } => {
                let contents = self.fs.get_v2_cgroup_cpu_quota_and_period(cgroup_name)?;
                parse::v2_cpu_max(&contents)
            }
            CgroupMembership::V1 { .. } if membership.is_v1_with_controller("cpu") => {
                let quota = self.fs.get_v1_cgroup_cpu_quota(cgroup_name)?;
                let period = self.fs.get_v1_cgroup_cpu_period(cgroup_name)?;
                parse::v1_cpu_quota(&quota, &period)
            }
            CgroupMembership::V1 { .. } => return None,
        };

        parsed.unwrap_or_else(|e| {
            warn!(cgroup_name, error = %e, "ignoring unreadable cgroup CPU quota");
            None
        })
    }

    /// The tightest memory limit found on the process cgroup or any of its ancestors.
    fn cgroup_memory_limit_bytes(&self) -> Option<u64> {
        self.cgroup_memberships()
            .iter()
            .flat_map(|membership| {
                parse::self_and_ancestors(membership.name())
                    .filter_map(|name| self.memory_limit(membership, name))
                    .collect::<Vec<_>>()
            })
            .min()
    }

    fn memory_limit(&self, membership: &CgroupMembership, cgroup_name: &str) -> Option<u64> {
        let parsed = match membership {
            CgroupMembership::V2 { .. } => {
                let contents = self.fs.get_v2_cgroup_memory_max(cgroup_name)?;
                parse::v2_memory_max(&contents)
            }
            CgroupMembership::V1 { .. } if membership.is_v1_with_controller("memory") => {
                let contents = self.fs.get_v1_cgroup_memory_limit(cgroup_name)?;
                parse::v1_memory_limit(&contents).map(Some)
            }
            CgroupMembership::V1 { .. } => return None,
        };

        parsed.unwrap_or_else(|e| {
            warn!(cgroup_name, error = %e, "ignoring unreadable cgroup memory limit");
            None
        })
    }

    fn physical_memory_bytes(&self) -> Option<u64> {
        let Some(contents) = self.fs.get_meminfo_contents() else {
            debug!("/proc/meminfo is not available, physical memory size unknown");
            return None;
        };

        parse::meminfo_total_bytes(&contents)
            .inspect_err(|e| warn!(error = %e, "ignoring unreadable physical memory size"))
            .ok()
    }

    fn address_space_limit_bytes(&self) -> Option<u64> {
        match self.bindings.getrlimit_address_space() {
            Ok(limit) if limit == libc::RLIM_INFINITY => None,
            Ok(limit) => Some(limit),
            Err(e) => {
                warn!(error = %e, "ignoring unreadable address space limit");
                None
            }
        }
    }
}
