use std::fmt::Debug;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::pal::linux::MockFilesystem;
use crate::pal::linux::{BuildTargetFilesystem, Filesystem};

/// Enum to hide the different filesystem implementations behind a single wrapper type.
#[derive(Clone)]
pub(crate) enum FilesystemFacade {
    Target(&'static BuildTargetFilesystem),

    #[cfg(test)]
    Mock(Arc<MockFilesystem>),
}

impl FilesystemFacade {
    pub(crate) const fn target() -> Self {
        Self::Target(&BuildTargetFilesystem)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockFilesystem) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

// Facade types are trivial pass-through layers, not worth testing.
#[cfg_attr(test, mutants::skip)]
#[cfg_attr(coverage_nightly, coverage(off))]
impl Filesystem for FilesystemFacade {
    fn get_proc_self_status_contents(&self) -> String {
        match self {
            Self::Target(filesystem) => filesystem.get_proc_self_status_contents(),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_proc_self_status_contents(),
        }
    }

    fn get_proc_self_cgroup(&self) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_proc_self_cgroup(),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_proc_self_cgroup(),
        }
    }

    fn get_meminfo_contents(&self) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_meminfo_contents(),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_meminfo_contents(),
        }
    }

    fn get_v1_cgroup_cpu_quota(&self, cgroup_name: &str) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_v1_cgroup_cpu_quota(cgroup_name),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_v1_cgroup_cpu_quota(cgroup_name),
        }
    }

    fn get_v1_cgroup_cpu_period(&self, cgroup_name: &str) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_v1_cgroup_cpu_period(cgroup_name),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_v1_cgroup_cpu_period(cgroup_name),
        }
    }

    fn get_v1_cgroup_memory_limit(&self, cgroup_name: &str) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_v1_cgroup_memory_limit(cgroup_name),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_v1_cgroup_memory_limit(cgroup_name),
        }
    }

    fn get_v2_cgroup_cpu_quota_and_period(&self, cgroup_name: &str) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_v2_cgroup_cpu_quota_and_period(cgroup_name),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_v2_cgroup_cpu_quota_and_period(cgroup_name),
        }
    }

    fn get_v2_cgroup_memory_max(&self, cgroup_name: &str) -> Option<String> {
        match self {
            Self::Target(filesystem) => filesystem.get_v2_cgroup_memory_max(cgroup_name),
            #[cfg(test)]
            Self::Mock(mock) => mock.get_v2_cgroup_memory_max(cgroup_name),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))] // No API contract to test.
impl Debug for FilesystemFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(inner) => inner.fmt(f),
            #[cfg(test)]
            Self::Mock(inner) => inner.fmt(f),
        }
    }
}
