//! CPU pinning and pinned-thread launch.
//!
//! Pinning the producer and consumer of an SPSC queue to distinct physical
//! cores keeps each cursor's cache line resident on one core and removes
//! migration jitter. The queue itself carries no knowledge of threads, cores,
//! or affinity; this module is a free-standing collaborator.
//!
//! Uses `core_affinity` for portable pinning. On platforms where per-thread
//! affinity is unsupported, [`pin_to_core`] reports failure instead of
//! silently succeeding.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

/// Error types for pinned spawns.
#[derive(Debug, Error)]
pub enum SpawnError {
    /// The spawned thread could not be pinned to the requested core. The
    /// thread has already exited without running its task.
    #[error("failed to pin thread {name:?} to core {core}")]
    Pin {
        /// Thread name passed to [`spawn_pinned`].
        name: String,
        /// The requested core id.
        core: usize,
    },
    /// The OS refused to spawn the thread at all.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Core ids the current process may pin to.
///
/// Empty when the platform exposes no affinity interface. In containerized
/// environments this reflects the allowed cpuset, which may be a strict
/// subset of the host's cores.
pub fn available_cores() -> Vec<usize> {
    core_affinity::get_core_ids()
        .map(|ids| ids.into_iter().map(|id| id.id).collect())
        .unwrap_or_default()
}

/// Pins the calling thread to `core`. Returns false if the core is not in the
/// allowed set or the platform refuses the request.
pub fn pin_to_core(core: usize) -> bool {
    match core_affinity::get_core_ids() {
        Some(cores) if !cores.iter().any(|c| c.id == core) => false,
        _ => core_affinity::set_for_current(core_affinity::CoreId { id: core }),
    }
}

/// Handle to a thread spawned by [`spawn_pinned`].
///
/// Wraps [`JoinHandle`]; the inner result is `Some` whenever the spawn call
/// returned successfully, because the task only runs after the pin succeeded.
pub struct PinnedThread<T> {
    inner: JoinHandle<Option<T>>,
}

impl<T> PinnedThread<T> {
    /// Waits for the thread to finish and returns the task's value.
    pub fn join(self) -> thread::Result<T> {
        self.inner.join().map(|value| match value {
            Some(v) => v,
            // spawn_pinned never hands out a handle for a thread whose pin
            // failed, so the task always ran.
            None => unreachable!("pinned thread exited before running its task"),
        })
    }

    /// The underlying thread.
    pub fn thread(&self) -> &thread::Thread {
        self.inner.thread()
    }
}

/// Spawns a named thread, optionally pinned to `core`, and runs `task` on it.
///
/// The pin happens inside the new thread, before `task` starts. The call does
/// not return until the pin outcome is known: on failure the thread exits
/// without running `task` and the error is returned here, so a returned
/// handle always refers to a thread running on the requested core.
///
/// `core: None` leaves scheduling to the OS.
pub fn spawn_pinned<F, T>(
    name: &str,
    core: Option<usize>,
    task: F,
) -> Result<PinnedThread<T>, SpawnError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let (pin_tx, pin_rx) = mpsc::channel();
    let thread_name = name.to_string();

    let inner = thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            if let Some(id) = core {
                if !pin_to_core(id) {
                    let _ = pin_tx.send(false);
                    return None;
                }
            }
            let _ = pin_tx.send(true);
            Some(task())
        })?;

    // A RecvError means the thread died before reporting; surface that as a
    // pin failure too rather than handing back a dead handle.
    if pin_rx.recv().unwrap_or(false) {
        Ok(PinnedThread { inner })
    } else {
        let _ = inner.join();
        Err(SpawnError::Pin {
            name: thread_name,
            core: core.unwrap_or_default(),
        })
    }
}
