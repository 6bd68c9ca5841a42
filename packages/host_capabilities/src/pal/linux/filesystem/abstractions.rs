use std::fmt::Debug;

/// Linux exposes process limits through a virtual filesystem. This trait abstracts that virtual
/// filesystem to allow it to be mocked.
///
/// The scope of this trait is limited to only the virtual filesystem exposed by the OS. All I/O is
/// synchronous and blocking because we expect it to hit a fast path in the OS, given the data is
/// never on a real storage device.
///
/// Cgroup names are paths relative to the cgroup filesystem mount point, without a leading
/// slash. The root cgroup is the empty string.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Filesystem: Debug + Send + Sync + 'static {
    /// Gets the contents of the /proc/self/status file for the current process.
    ///
    /// This is a plaintext file with "key:     value" pairs.
    fn get_proc_self_status_contents(&self) -> String;

    /// Gets the contents of the /proc/self/cgroup file for the current process.
    ///
    /// Each line is "hierarchy-id:controller-list:cgroup-path".
    fn get_proc_self_cgroup(&self) -> Option<String>;

    /// Gets the contents of the /proc/meminfo file.
    ///
    /// This is a plaintext file with "key:     value kB" pairs.
    fn get_meminfo_contents(&self) -> Option<String>;

    /// Contents of `/sys/fs/cgroup/cpu/{name}/cpu.cfs_quota_us`.
    fn get_v1_cgroup_cpu_quota(&self, cgroup_name: &str) -> Option<String>;

    /// Contents of `/sys/fs/cgroup/cpu/{name}/cpu.cfs_period_us`.
    fn get_v1_cgroup_cpu_period(&self, cgroup_name: &str) -> Option<String>;

    /// Contents of `/sys/fs/cgroup/memory/{name}/memory.limit_in_bytes`.
    fn get_v1_cgroup_memory_limit(&self, cgroup_name: &str) -> Option<String>;

    /// Contents of `/sys/fs/cgroup/{name}/cpu.max`.
    fn get_v2_cgroup_cpu_quota_and_period(&self, cgroup_name: &str) -> Option<String>;

    /// Contents of `/sys/fs/cgroup/{name}/memory.max`.
    fn get_v2_cgroup_memory_max(&self, cgroup_name: &str) -> Option<String>;
}
