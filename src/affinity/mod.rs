#![doc = include_str!("README.md")]

use crate::config::WorkerCore;

/// A CPU core the worker may be pinned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreId {
    pub id: usize,
}

/// Cores the current process may run on. Empty when the platform does
/// not expose them (common on macOS and in some containers).
pub fn available_cores() -> Vec<CoreId> {
    core_affinity::get_core_ids()
        .unwrap_or_default()
        .into_iter()
        .map(|c| CoreId { id: c.id })
        .collect()
}

/// Pins the *current* thread to `core`. Returns `true` on success.
pub fn pin_current_thread(core: CoreId) -> bool {
    core_affinity::set_for_current(core_affinity::CoreId { id: core.id })
}

/// Resolves `choice` against the available cores.
pub fn resolve(choice: WorkerCore, cores: &[CoreId]) -> Option<CoreId> {
    match choice {
        WorkerCore::Unpinned => None,
        WorkerCore::LastCore => cores.last().copied(),
        WorkerCore::Index(i) => cores.get(i).copied(),
    }
}

/// Best-effort pinning of the calling (worker) thread.
///
/// Returns the core actually pinned to. Failure is not an error: the
/// worker keeps running wherever the OS schedules it.
pub fn pin_worker(choice: WorkerCore) -> Option<CoreId> {
    if choice == WorkerCore::Unpinned {
        return None;
    }
    let Some(core) = resolve(choice, &available_cores()) else {
        tracing::warn!(?choice, "requested worker core is not available");
        return None;
    };
    if pin_current_thread(core) {
        tracing::debug!(core = core.id, "logger worker pinned");
        Some(core)
    } else {
        tracing::warn!(core = core.id, "failed to pin logger worker");
        None
    }
}
