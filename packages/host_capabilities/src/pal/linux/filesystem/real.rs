use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use crate::pal::linux::Filesystem;

const CGROUP_ROOT: &str = "/sys/fs/cgroup";

/// The virtual filesystem for the real operating system that the build is targeting.
///
/// You would only use different filesystems in PAL unit tests that need to use a mock filesystem.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetFilesystem;

impl BuildTargetFilesystem {
    fn cgroup_file(controller_dir: Option<&str>, cgroup_name: &str, file_name: &str) -> PathBuf {
        let mut path = PathBuf::from(CGROUP_ROOT);

        if let Some(controller_dir) = controller_dir {
            path.push(controller_dir);
        }

        // The root cgroup has an empty name, which `join` treats as a no-op.
        path.join(cgroup_name).join(file_name)
    }

    fn read_optional(path: &Path) -> Option<String> {
        fs::read_to_string(path).ok()
    }
}

// Real filesystem bindings are excluded from coverage measurement because:
// 1. They are tested via integration tests running on actual Linux.
// 2. Which cgroup version (if any) is present depends on the test system.
#[cfg_attr(coverage_nightly, coverage(off))]
impl Filesystem for BuildTargetFilesystem {
    fn get_proc_self_status_contents(&self) -> String {
        fs::read_to_string("/proc/self/status")
            .expect("failed to read /proc/self/status - cannot continue execution")
    }

    fn get_proc_self_cgroup(&self) -> Option<String> {
        fs::read_to_string("/proc/self/cgroup").ok()
    }

    fn get_meminfo_contents(&self) -> Option<String> {
        fs::read_to_string("/proc/meminfo").ok()
    }

    fn get_v1_cgroup_cpu_quota(&self, cgroup_name: &str) -> Option<String> {
        Self::read_optional(&Self::cgroup_file(
            Some("cpu"),
            cgroup_name,
            "cpu.cfs_quota_us",
        ))
    }

    fn get_v1_cgroup_cpu_period(&self, cgroup_name: &str) -> Option<String> {
        Self::read_optional(&Self::cgroup_file(
            Some("cpu"),
            cgroup_name,
            "cpu.cfs_period_us",
        ))
    }

    fn get_v1_cgroup_memory_limit(&self, cgroup_name: &str) -> Option<String> {
        Self::read_optional(&Self::cgroup_file(
            Some("memory"),
            cgroup_name,
            "memory.limit_in_bytes",
        ))
    }

    fn get_v2_cgroup_cpu_quota_and_period(&self, cgroup_name: &str) -> Option<String> {
        Self::read_optional(&Self::cgroup_file(None, cgroup_name, "cpu.max"))
    }

    fn get_v2_cgroup_memory_max(&self, cgroup_name: &str) -> Option<String> {
        Self::read_optional(&Self::cgroup_file(None, cgroup_name, "memory.max"))
    }
}
