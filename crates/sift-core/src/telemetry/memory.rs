//! Process memory readings for the performance report

use sysinfo::{ProcessesToUpdate, System};

/// Resident memory of the current process in bytes
///
/// Returns `None` when the platform does not expose process information.
pub fn resident_memory_bytes() -> Option<u64> {
    let pid = match sysinfo::get_current_pid() {
        Ok(pid) => pid,
        Err(e) => {
            tracing::debug!("Cannot determine current pid: {}", e);
            return None;
        }
    };

    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system.process(pid).map(|process| process.memory())
}
