use sysinfo::System;

use crate::models::metrics::HostInfo;

/// Cores and memory (bytes) of the machine generating the load.
pub fn get_host_info() -> HostInfo {
    let sys = System::new_all();

    HostInfo {
        cpu_cores: sys.cpus().len() as u64,
        total_memory: sys.total_memory(),
        available_memory: sys.available_memory(),
    }
}
